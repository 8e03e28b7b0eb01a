//! Goldbook main entry point

use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use goldbook_config::{Config, TimeRange};
use goldbook_core::{AccountType, Book, BookOperations, ChequeStatus, DateRange, LedgerScope, TimeContext};
use goldbook_store::FileBookSource;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "goldbook")]
#[command(version = "0.1.0")]
#[command(about = "Running-balance ledgers and statements for a jewellery workshop", long_about = None)]
struct Args {
    /// Configuration file path (defaults apply when config.yaml is absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Book file, overriding data.path/data.book_file from the config
    #[arg(short, long)]
    book: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Date selection shared by the ledger commands
#[derive(clap::Args, Debug)]
struct RangeArgs {
    /// First date shown (inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last date shown (inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Named period: month, quarter, year or all
    #[arg(long, conflicts_with_all = ["from", "to"])]
    range: Option<TimeRange>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summary of the loaded book
    Info,
    /// List accounts
    Accounts {
        /// Only accounts of this type
        #[arg(long = "type")]
        account_type: Option<AccountType>,
        /// Match name, phone or CRN
        #[arg(long)]
        search: Option<String>,
    },
    /// Gold and currency balance ledger of one account
    Ledger {
        #[arg(long)]
        account: u64,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Gold-fixing ledger of a Market account
    OpenBalance {
        #[arg(long)]
        account: u64,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Locker gold ledger across all accounts
    Locker {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Closing balances of every account of one type
    Summary {
        #[arg(long = "type")]
        account_type: AccountType,
        /// Include vouchers up to and including this date
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Paginated statement: balance, open-balance or locker
    Statement {
        /// Account to print; required unless the scope is locker
        #[arg(long)]
        account: Option<u64>,
        #[arg(long, default_value_t = LedgerScope::Balance)]
        scope: LedgerScope,
        /// Rows per page, overriding statement.rows_per_page
        #[arg(long)]
        rows: Option<usize>,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Cheque register
    Cheques {
        #[arg(long)]
        status: Option<ChequeStatus>,
        /// Outstanding cheques due within this many days (overdue included)
        #[arg(long)]
        due_within: Option<i64>,
    },
    /// Print the default configuration file
    DefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.clone(),
        None if PathBuf::from(DEFAULT_CONFIG).exists() => PathBuf::from(DEFAULT_CONFIG),
        None => return Ok(Config::default()),
    };
    Config::load(&path).map_err(|e| anyhow!("{}", e.to_details()).context(format!("loading {}", path.display())))
}

fn resolve_range(book: &Book, args: &RangeArgs) -> anyhow::Result<DateRange> {
    let context = match args.range {
        Some(range) => {
            TimeContext::new(range).with_fiscal_year_start(book.config().time_range.fiscal_year_start)
        }
        None if args.from.is_some() || args.to.is_some() => {
            TimeContext::custom(args.from, args.to)
                .with_fiscal_year_start(book.config().time_range.fiscal_year_start)
        }
        None => book.time_context().clone(),
    };
    log::info!("Period: {}", context.description());
    Ok(context.current_range()?)
}

fn open_book(args: &Args) -> anyhow::Result<Book> {
    let config = load_config(args.config.as_ref())?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    let book_path = args.book.clone().unwrap_or_else(|| config.book_path());
    log::info!("Loading book: {}", book_path.display());

    let rt = Runtime::new()?;
    let mut book = Book::new(config, Arc::new(FileBookSource));
    rt.block_on(book.load(book_path.clone()))
        .map_err(|e| anyhow!("{}", e.to_details()))
        .with_context(|| format!("loading book {}", book_path.display()))?;
    Ok(book)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    match &args.command {
        Command::DefaultConfig => {
            print!("{}", Config::generate_default());
            Ok(())
        }
        Command::Info => print_json(&open_book(args)?.summary()?),
        Command::Accounts { account_type, search } => {
            let book = open_book(args)?;
            let mut accounts = match search {
                Some(query) => book.search_accounts(query)?,
                None => book.accounts()?.iter().collect(),
            };
            if let Some(account_type) = account_type {
                accounts.retain(|a| a.account_type == *account_type);
            }
            print_json(&accounts)
        }
        Command::Ledger { account, range } => {
            let book = open_book(args)?;
            let range = resolve_range(&book, range)?;
            print_json(&book.account_ledger(*account, &range)?)
        }
        Command::OpenBalance { account, range } => {
            let book = open_book(args)?;
            let range = resolve_range(&book, range)?;
            print_json(&book.open_balance_ledger(*account, &range)?)
        }
        Command::Locker { range } => {
            let book = open_book(args)?;
            let range = resolve_range(&book, range)?;
            print_json(&book.locker_ledger(&range)?)
        }
        Command::Summary { account_type, as_of } => {
            print_json(&open_book(args)?.type_summary(*account_type, *as_of)?)
        }
        Command::Statement { account, scope, rows, range } => {
            let book = open_book(args)?;
            let range = resolve_range(&book, range)?;
            let statement = match (scope, account) {
                (LedgerScope::Locker, _) => book.locker_statement(&range, *rows)?,
                (LedgerScope::Balance, Some(id)) => book.statement(*id, &range, *rows)?,
                (LedgerScope::OpenBalance, Some(id)) => book.open_balance_statement(*id, &range, *rows)?,
                (_, None) => return Err(anyhow!("--account is required for a {} statement", scope)),
            };
            print_json(&statement)
        }
        Command::Cheques { status, due_within } => {
            let register = open_book(args)?.cheques()?;
            let mut entries = match due_within {
                Some(days) => register.due_within(Local::now().date_naive(), *days),
                None => register.entries().iter().collect(),
            };
            if let Some(status) = status {
                entries.retain(|e| e.status == *status);
            }
            print_json(&serde_json::json!({
                "cheques": entries,
                "totals": register.totals(),
            }))
        }
    }
}

fn main() -> anyhow::Result<()> {
    run(&Args::parse())
}
