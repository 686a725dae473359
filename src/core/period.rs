// FortiRep - core/period.rs
//
// Calendar arguments and period arithmetic.
//
// External invokers (cron lines, the dashboard trigger) pass dates as
// `YYYY_MM_DD` for daily runs and `YYYYMM`/`YYYY_MM`/`YYYY-MM` for monthly
// runs; those conventions are normalized here and nowhere else. The
// "yesterday" / "last full month" defaults also live here so the pipeline
// itself never touches the clock.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::util::constants;
use crate::util::error::ArgumentError;

/// Report cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Monthly,
}

impl Period {
    /// Parse a CLI period argument, case-insensitively.
    pub fn from_arg(arg: &str) -> Option<Period> {
        match arg.to_ascii_lowercase().as_str() {
            "daily" => Some(Period::Daily),
            "monthly" => Some(Period::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
        })
    }
}

// =============================================================================
// Month key
// =============================================================================

/// One calendar month. Always holds a validated month number (1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build from components; `None` when the month number is invalid.
    pub fn new(year: i32, month: u32) -> Option<MonthKey> {
        if (1..=12).contains(&month) {
            Some(MonthKey { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> MonthKey {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The preceding calendar month.
    pub fn prev(self) -> MonthKey {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Compact `YYYYMM` stamp used in monthly artifact filenames.
    pub fn stamp(self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated month number always forms a date")
    }

    pub fn days_in_month(self) -> u32 {
        let next = if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        };
        next.first_day()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// =============================================================================
// Argument parsing and defaults
// =============================================================================

/// Parse a daily date argument (`YYYY_MM_DD`, also accepting `YYYY-MM-DD`).
pub fn parse_day_arg(arg: &str) -> Result<NaiveDate, ArgumentError> {
    let normalized = arg.replace('_', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").map_err(|_| ArgumentError::InvalidDay {
        given: arg.to_string(),
    })
}

/// Parse a monthly argument. `YYYYMM`, `YYYY_MM`, and `YYYY-MM` are all
/// accepted; separators are stripped before interpretation.
pub fn parse_month_arg(arg: &str) -> Result<MonthKey, ArgumentError> {
    let digits: String = arg.chars().filter(|c| *c != '_' && *c != '-').collect();
    let invalid = || ArgumentError::InvalidMonth {
        given: arg.to_string(),
    };

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = digits[..4].parse().map_err(|_| invalid())?;
    let month: u32 = digits[4..].parse().map_err(|_| invalid())?;
    MonthKey::new(year, month).ok_or_else(invalid)
}

/// Default day for a daily run with no date argument.
pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

/// Default month for a monthly run with no month argument.
pub fn last_full_month() -> MonthKey {
    MonthKey::from_date(Local::now().date_naive()).prev()
}

/// Compact `YYYYMMDD` stamp used in daily artifact filenames.
pub fn day_stamp(date: NaiveDate) -> String {
    date.format(constants::DAY_STAMP_FORMAT).to_string()
}

/// Underscore day string used in raw log filenames (`2025_06_01`).
pub fn day_token(date: NaiveDate) -> String {
    date.format(constants::DAY_TOKEN_FORMAT).to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_arg_is_case_insensitive() {
        assert_eq!(Period::from_arg("daily"), Some(Period::Daily));
        assert_eq!(Period::from_arg("Monthly"), Some(Period::Monthly));
        assert_eq!(Period::from_arg("weekly"), None);
    }

    #[test]
    fn day_arg_accepts_underscores_and_dashes() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(parse_day_arg("2025_06_01").unwrap(), expected);
        assert_eq!(parse_day_arg("2025-06-01").unwrap(), expected);
    }

    #[test]
    fn day_arg_rejects_malformed_input() {
        assert!(parse_day_arg("2025_13_01").is_err());
        assert!(parse_day_arg("20250601").is_err());
        assert!(parse_day_arg("yesterday").is_err());
        assert!(parse_day_arg("").is_err());
    }

    #[test]
    fn month_arg_accepts_all_three_forms() {
        let expected = MonthKey::new(2025, 6).unwrap();
        assert_eq!(parse_month_arg("202506").unwrap(), expected);
        assert_eq!(parse_month_arg("2025_06").unwrap(), expected);
        assert_eq!(parse_month_arg("2025-06").unwrap(), expected);
    }

    #[test]
    fn month_arg_rejects_malformed_input() {
        assert!(parse_month_arg("202513").is_err());
        assert!(parse_month_arg("202500").is_err());
        assert!(parse_month_arg("2025").is_err());
        assert!(parse_month_arg("2025_06_01").is_err());
        assert!(parse_month_arg("june").is_err());
    }

    #[test]
    fn prev_month_wraps_january_to_december() {
        let jan = MonthKey::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), MonthKey::new(2024, 12).unwrap());
        let jun = MonthKey::new(2025, 6).unwrap();
        assert_eq!(jun.prev(), MonthKey::new(2025, 5).unwrap());
    }

    #[test]
    fn days_in_month_handles_leap_february() {
        assert_eq!(MonthKey::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthKey::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthKey::new(2025, 6).unwrap().days_in_month(), 30);
        assert_eq!(MonthKey::new(2025, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn month_contains_only_its_own_days() {
        let jun = MonthKey::new(2025, 6).unwrap();
        assert!(jun.contains(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(jun.contains(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
        assert!(!jun.contains(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
        assert!(!jun.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    }

    #[test]
    fn stamps_format_compactly() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(day_stamp(date), "20250601");
        assert_eq!(day_token(date), "2025_06_01");
        assert_eq!(MonthKey::new(2025, 6).unwrap().stamp(), "202506");
    }
}
