//! Voucher book loading
//!
//! A book is a YAML or JSON file listing accounts and vouchers. Files may
//! pull in other files through an `include:` list, which is resolved
//! relative to the including file and may contain glob patterns. A file
//! is never loaded while it is already being loaded further up the include
//! chain: glob matches of such a file are skipped, a plain include of one
//! is an [`StoreError::IncludeCycle`].

use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

pub mod error;
pub mod records;

pub use error::StoreError;
pub use records::{AccountRecord, BookFile, BookRecords, ChequeRecord, VoucherRecord};

/// Serialization format of a book file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFormat {
    Yaml,
    Json,
}

impl BookFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(BookFormat::Yaml),
            "json" => Ok(BookFormat::Json),
            _ => Err(StoreError::UnsupportedFormat { extension }),
        }
    }
}

/// Parse a single book file body without following includes
pub fn parse_book(content: &str, format: BookFormat, location: &str) -> Result<BookFile, StoreError> {
    let result = match format {
        BookFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        BookFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    result.map_err(|message| StoreError::SyntaxError {
        location: location.to_string(),
        message,
    })
}

// ==================== Source Trait ====================

/// Shared source reference
pub type SourceRef = Arc<dyn BookSource>;

/// Data-access collaborator that supplies account and voucher records
#[async_trait]
pub trait BookSource: Send + Sync {
    /// Load records from in-memory content (includes are not followed)
    async fn load_str(&self, content: &str, format: BookFormat) -> Result<BookRecords, StoreError>;

    /// Load a book file and everything it includes
    async fn load_file(&self, path: PathBuf) -> Result<BookRecords, StoreError>;

    /// Load a book file resolving includes against `base_dir`
    async fn load_file_with_base(&self, path: PathBuf, base_dir: PathBuf) -> Result<BookRecords, StoreError>;
}

/// File-system book source
#[derive(Debug, Default)]
pub struct FileBookSource;

#[async_trait]
impl BookSource for FileBookSource {
    async fn load_str(&self, content: &str, format: BookFormat) -> Result<BookRecords, StoreError> {
        let file = parse_book(content, format, "<memory>")?;
        if !file.include.is_empty() {
            log::warn!("Ignoring {} include(s) in in-memory book", file.include.len());
        }
        Ok(BookRecords {
            accounts: file.accounts,
            vouchers: file.vouchers,
        })
    }

    async fn load_file(&self, path: PathBuf) -> Result<BookRecords, StoreError> {
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        self.load_file_with_base(path, base_dir).await
    }

    async fn load_file_with_base(&self, path: PathBuf, base_dir: PathBuf) -> Result<BookRecords, StoreError> {
        let mut loading = Vec::new();
        self.load_tree(path, base_dir, &mut loading).await
    }
}

type LoadFuture<'a> = Pin<Box<dyn Future<Output = Result<BookRecords, StoreError>> + Send + 'a>>;

impl FileBookSource {
    /// Load `path` and its includes; `loading` holds the canonical paths of
    /// the files currently open up the include chain
    fn load_tree<'a>(&'a self, path: PathBuf, base_dir: PathBuf, loading: &'a mut Vec<PathBuf>) -> LoadFuture<'a> {
        Box::pin(async move {
            let format = BookFormat::from_path(&path)?;
            let canonical = tokio::fs::canonicalize(&path).await?;
            let content = tokio::fs::read_to_string(&path).await?;
            let location = path.to_string_lossy().to_string();

            let file = parse_book(&content, format, &location)?;
            log::debug!(
                "Parsed {}: {} accounts, {} vouchers, {} includes",
                location,
                file.accounts.len(),
                file.vouchers.len(),
                file.include.len()
            );

            let mut records = BookRecords {
                accounts: file.accounts,
                vouchers: file.vouchers,
            };

            loading.push(canonical);
            for include in &file.include {
                let pattern = is_pattern(include);
                for included_path in resolve_include(&base_dir, include)? {
                    let included_canonical = tokio::fs::canonicalize(&included_path).await?;
                    if loading.contains(&included_canonical) {
                        if pattern {
                            log::debug!("Skipping {}: already being loaded", included_path.display());
                            continue;
                        }
                        return Err(StoreError::IncludeCycle {
                            path: included_path.to_string_lossy().to_string(),
                        });
                    }
                    let included_base = included_path.parent().unwrap_or(base_dir.as_path()).to_path_buf();
                    let included = self.load_tree(included_path, included_base, loading).await?;
                    records.extend(included);
                }
            }
            loading.pop();

            Ok(records)
        })
    }
}

fn is_pattern(include: &str) -> bool {
    include.contains('*') || include.contains('?')
}

/// Expand one include entry into concrete file paths
fn resolve_include(base_dir: &Path, include: &str) -> Result<Vec<PathBuf>, StoreError> {
    let target = base_dir.join(include);

    if is_pattern(include) {
        let pattern = target.to_string_lossy().to_string();
        let paths = glob::glob(&pattern)
            .map_err(|_| StoreError::InvalidPattern { pattern: pattern.clone() })?;
        // glob yields paths in alphabetical order
        Ok(paths.flatten().filter(|p| p.is_file()).collect())
    } else if target.is_file() {
        Ok(vec![target])
    } else {
        Err(StoreError::IncludeNotFound {
            path: target.to_string_lossy().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MAIN_BOOK: &str = r#"
include:
  - vouchers/*.yaml
accounts:
  - id: 1
    name: Al Noor Jewellers
    type: Market
  - id: 2
    name: Star Casting
    type: Casting
vouchers:
  - id: 100
    date: 2024-01-02
    type: INV
    account_id: 1
    gold: "10.500"
    kwd: "45.250"
"#;

    #[tokio::test]
    async fn test_load_str_yaml() {
        let source = FileBookSource;
        let records = source.load_str(MAIN_BOOK, BookFormat::Yaml).await.unwrap();
        assert_eq!(records.accounts.len(), 2);
        assert_eq!(records.vouchers.len(), 1);
        assert_eq!(records.accounts[0].account_type, "Market");
        assert_eq!(records.vouchers[0].gold.to_string(), "10.500");
        assert_eq!(records.vouchers[0].gold_rate, None);
    }

    #[tokio::test]
    async fn test_load_str_json() {
        let json = r#"{"accounts":[{"id":7,"name":"Gulf Gold","type":"Gold Fixing"}],
            "vouchers":[{"id":1,"date":"2024-03-01","type":"REC","account_id":7,"gold":"5"}]}"#;
        let records = FileBookSource.load_str(json, BookFormat::Json).await.unwrap();
        assert_eq!(records.accounts[0].account_type, "Gold Fixing");
        assert!(records.vouchers[0].kwd.is_zero());
    }

    #[tokio::test]
    async fn test_syntax_error_reports_location() {
        let err = FileBookSource
            .load_str("accounts: [", BookFormat::Yaml)
            .await
            .unwrap_err();
        match err {
            StoreError::SyntaxError { location, .. } => assert_eq!(location, "<memory>"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_file_follows_glob_includes_in_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("vouchers")).unwrap();
        fs::write(dir.path().join("book.yaml"), MAIN_BOOK).unwrap();
        fs::write(
            dir.path().join("vouchers/2024-02.yaml"),
            "vouchers:\n  - {id: 102, date: 2024-02-10, type: REC, account_id: 1, gold: \"3\", payment_method: cash}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("vouchers/2024-01.yaml"),
            "vouchers:\n  - {id: 101, date: 2024-01-20, type: REC, account_id: 2, gold: \"1\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("vouchers/notes.txt"), "not a book").unwrap();

        let records = FileBookSource
            .load_file(dir.path().join("book.yaml"))
            .await
            .unwrap();

        let ids: Vec<u64> = records.vouchers.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
        assert_eq!(records.vouchers[2].payment_method.as_deref(), Some("cash"));
    }

    #[tokio::test]
    async fn test_missing_plain_include_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("book.yaml"), "include:\n  - missing.yaml\n").unwrap();

        let err = FileBookSource
            .load_file(dir.path().join("book.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IncludeNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("book.toml"), "").unwrap();

        let err = FileBookSource
            .load_file(dir.path().join("book.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_glob_matching_the_including_file_skips_it() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("book.yaml"),
            "include:\n  - \"*.yaml\"\naccounts:\n  - {id: 1, name: Al Noor Jewellers, type: Market}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("january.yaml"),
            "vouchers:\n  - {id: 1, date: 2024-01-05, type: INV, account_id: 1, gold: \"2\"}\n",
        )
        .unwrap();

        let records = FileBookSource
            .load_file(dir.path().join("book.yaml"))
            .await
            .unwrap();
        assert_eq!(records.accounts.len(), 1);
        assert_eq!(records.vouchers.len(), 1);
    }

    #[tokio::test]
    async fn test_include_cycle_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.yaml"), "include:\n  - b.yaml\n").unwrap();
        fs::write(dir.path().join("b.yaml"), "include:\n  - a.yaml\n").unwrap();

        let err = FileBookSource
            .load_file(dir.path().join("a.yaml"))
            .await
            .unwrap_err();
        match err {
            StoreError::IncludeCycle { path } => assert!(path.ends_with("a.yaml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_self_include_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("book.yaml"), "include:\n  - ./book.yaml\n").unwrap();

        let err = FileBookSource
            .load_file(dir.path().join("book.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IncludeCycle { .. }));
    }

    #[tokio::test]
    async fn test_sibling_included_twice_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("book.yaml"), "include:\n  - a.yaml\n  - b.yaml\n").unwrap();
        fs::write(dir.path().join("a.yaml"), "include:\n  - shared.yaml\n").unwrap();
        fs::write(dir.path().join("b.yaml"), "include:\n  - shared.yaml\n").unwrap();
        fs::write(
            dir.path().join("shared.yaml"),
            "accounts:\n  - {id: 1, name: Star Casting, type: Casting}\n",
        )
        .unwrap();

        let records = FileBookSource
            .load_file(dir.path().join("book.yaml"))
            .await
            .unwrap();
        assert_eq!(records.accounts.len(), 2);
    }
}
