//! Named report periods (current month, quarter, fiscal year, custom)

use chrono::{Datelike, Local, NaiveDate};
use goldbook_config::TimeRange;

use crate::error::CoreResult;
use crate::period::DateRange;

/// Report period selection
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    /// Current time range
    pub range: TimeRange,
    /// Custom start date (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// Custom end date (when range is Custom)
    pub custom_end: Option<NaiveDate>,
    /// First month of the fiscal year (1-12), used by `Year`
    pub fiscal_year_start: u32,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::new(TimeRange::All)
    }
}

/// First day of the month `months` after `year`/`month` (month is 1-based)
fn month_start(year: i32, month: u32, months: i32) -> Option<NaiveDate> {
    let index = year * 12 + month as i32 - 1 + months;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

impl TimeContext {
    /// Create a new time context
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
            fiscal_year_start: 1,
        }
    }

    /// Create with custom date range
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: start,
            custom_end: end,
            fiscal_year_start: 1,
        }
    }

    pub fn with_fiscal_year_start(mut self, month: u32) -> Self {
        self.fiscal_year_start = month.clamp(1, 12);
        self
    }

    /// Effective start date as of `today`
    pub fn start_on(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => month_start(today.year(), today.month(), 0),
            TimeRange::Quarter => {
                let quarter_start = (today.month0() / 3) * 3 + 1;
                month_start(today.year(), quarter_start, 0)
            }
            TimeRange::Year => {
                let year = if today.month() >= self.fiscal_year_start {
                    today.year()
                } else {
                    today.year() - 1
                };
                month_start(year, self.fiscal_year_start, 0)
            }
            TimeRange::All => None,
            TimeRange::Custom => self.custom_start,
        }
    }

    /// Effective end date as of `today`
    pub fn end_on(&self, today: NaiveDate) -> Option<NaiveDate> {
        let span = match self.range {
            TimeRange::Month => 1,
            TimeRange::Quarter => 3,
            TimeRange::Year => 12,
            TimeRange::All => return None,
            TimeRange::Custom => return self.custom_end,
        };
        let start = self.start_on(today)?;
        month_start(start.year(), start.month(), span).and_then(|d| d.pred_opt())
    }

    /// Date range as of `today`
    pub fn range_on(&self, today: NaiveDate) -> CoreResult<DateRange> {
        DateRange::new(self.start_on(today), self.end_on(today))
    }

    /// Date range as of the local calendar date
    pub fn current_range(&self) -> CoreResult<DateRange> {
        self.range_on(Local::now().date_naive())
    }

    /// Get a human-readable description of the time range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Fiscal Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => match (self.custom_start, self.custom_end) {
                (Some(start), Some(end)) => format!("{} to {}", start, end),
                (Some(start), None) => format!("From {}", start),
                (None, Some(end)) => format!("Until {}", end),
                (None, None) => "Custom Range".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range() {
        let ctx = TimeContext::new(TimeRange::Month);
        let range = ctx.range_on(date(2024, 2, 14)).unwrap();
        assert_eq!(range.start, Some(date(2024, 2, 1)));
        assert_eq!(range.end, Some(date(2024, 2, 29)));

        let december = ctx.range_on(date(2023, 12, 31)).unwrap();
        assert_eq!(december.end, Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_quarter_range() {
        let ctx = TimeContext::new(TimeRange::Quarter);
        let range = ctx.range_on(date(2024, 11, 3)).unwrap();
        assert_eq!(range.start, Some(date(2024, 10, 1)));
        assert_eq!(range.end, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_calendar_year() {
        let range = TimeContext::new(TimeRange::Year).range_on(date(2024, 6, 1)).unwrap();
        assert_eq!(range.start, Some(date(2024, 1, 1)));
        assert_eq!(range.end, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_fiscal_year_spans_calendar_years() {
        let ctx = TimeContext::new(TimeRange::Year).with_fiscal_year_start(4);
        let early = ctx.range_on(date(2024, 2, 10)).unwrap();
        assert_eq!(early.start, Some(date(2023, 4, 1)));
        assert_eq!(early.end, Some(date(2024, 3, 31)));

        let late = ctx.range_on(date(2024, 4, 1)).unwrap();
        assert_eq!(late.start, Some(date(2024, 4, 1)));
        assert_eq!(late.end, Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_all_is_unbounded() {
        let range = TimeContext::default().range_on(date(2024, 1, 1)).unwrap();
        assert!(range.is_unbounded());
    }

    #[test]
    fn test_custom_range_validated() {
        let ctx = TimeContext::custom(Some(date(2024, 3, 1)), Some(date(2024, 2, 1)));
        assert!(matches!(
            ctx.range_on(date(2024, 5, 1)),
            Err(CoreError::InvalidDateRange { .. })
        ));
        assert_eq!(ctx.description(), "2024-03-01 to 2024-02-01");
    }
}
