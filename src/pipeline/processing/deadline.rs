use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DEADLINE_SKIP_TOKENS, MONTH_NAMES};

/// Injectable time source. The deadline normalizer and the day-window
/// filter take their notion of "now" from here so tests stay
/// deterministic.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn current_month(&self) -> u32 {
        self.today().month()
    }
}

/// Wall-clock implementation used outside of tests.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

static YEAR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year regex"));

/// Outcome of normalizing one deadline string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeadline {
    pub value: String,
    /// Whether a year was inferred and injected rather than already
    /// present or skipped.
    pub year_injected: bool,
}

/// Normalize a deadline string so every date-like deadline is
/// year-qualified.
///
/// Strings carrying a schedule token ("Rolling", "Varies", ...) pass
/// through unchanged. A 4-digit year strictly before the cutoff is
/// rewritten to the cutoff year; later years are left alone. A month
/// name without a year gets the cutoff year when the month has not yet
/// passed this calendar year, otherwise the following year. Strings with
/// neither get a two-year range marker appended. Re-running the
/// normalizer on its own output is a no-op.
pub fn normalize_deadline(raw: &str, cutoff_year: i32, clock: &dyn Clock) -> NormalizedDeadline {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedDeadline {
            value: raw.to_string(),
            year_injected: false,
        };
    }

    let lowered = trimmed.to_lowercase();
    if DEADLINE_SKIP_TOKENS.iter().any(|t| lowered.contains(t)) {
        return NormalizedDeadline {
            value: trimmed.to_string(),
            year_injected: false,
        };
    }

    if let Some(found) = YEAR_TOKEN.find(trimmed) {
        let year: i32 = found.as_str().parse().unwrap_or(cutoff_year);
        if year < cutoff_year {
            let mut value = trimmed.to_string();
            value.replace_range(found.range(), &cutoff_year.to_string());
            return NormalizedDeadline {
                value,
                year_injected: true,
            };
        }
        return NormalizedDeadline {
            value: trimmed.to_string(),
            year_injected: false,
        };
    }

    if let Some(month) = find_month(&lowered) {
        let year = if month >= clock.current_month() {
            cutoff_year
        } else {
            cutoff_year + 1
        };
        return NormalizedDeadline {
            value: format!("{} {}", trimmed, year),
            year_injected: true,
        };
    }

    NormalizedDeadline {
        value: format!("{} {}/{}", trimmed, cutoff_year, cutoff_year + 1),
        year_injected: true,
    }
}

/// Find the first recognized month name in the lowercased text,
/// comparing whole words so "mar" does not fire inside "market".
fn find_month(lowered: &str) -> Option<u32> {
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    for token in &tokens {
        for (number, names) in MONTH_NAMES.iter() {
            if names.contains(token) {
                return Some(*number);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    pub struct FixedClock(pub NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    fn august_2025() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2025, 8, 6).unwrap())
    }

    #[test]
    fn test_schedule_tokens_pass_through() {
        let clock = august_2025();
        assert_eq!(normalize_deadline("Rolling", 2025, &clock).value, "Rolling");
        assert_eq!(normalize_deadline("Varies by institution", 2025, &clock).value, "Varies by institution");
        assert_eq!(normalize_deadline("Open year-round", 2025, &clock).value, "Open year-round");
    }

    #[test]
    fn test_stale_year_is_replaced_with_cutoff() {
        let clock = august_2025();
        let result = normalize_deadline("March 2024", 2025, &clock);
        assert_eq!(result.value, "March 2025");
        assert!(result.year_injected);
    }

    #[test]
    fn test_current_and_future_years_are_kept() {
        let clock = august_2025();
        assert_eq!(normalize_deadline("October 31, 2025", 2025, &clock).value, "October 31, 2025");
        assert_eq!(normalize_deadline("15 January 2027", 2025, &clock).value, "15 January 2027");
    }

    #[test]
    fn test_passed_month_gets_following_year() {
        // Current month is August; March has already passed.
        let clock = august_2025();
        let result = normalize_deadline("March", 2025, &clock);
        assert_eq!(result.value, "March 2026");
    }

    #[test]
    fn test_upcoming_month_gets_cutoff_year() {
        let clock = august_2025();
        assert_eq!(normalize_deadline("October 31", 2025, &clock).value, "October 31 2025");
        assert_eq!(normalize_deadline("Aug-Oct", 2025, &clock).value, "Aug-Oct 2025");
    }

    #[test]
    fn test_month_abbreviations_are_whole_words() {
        let clock = august_2025();
        // "mar" inside "market" must not be read as March.
        let result = normalize_deadline("after the market review", 2025, &clock);
        assert_eq!(result.value, "after the market review 2025/2026");
    }

    #[test]
    fn test_dateless_string_gets_range_marker() {
        let clock = august_2025();
        let result = normalize_deadline("End of winter term", 2025, &clock);
        assert_eq!(result.value, "End of winter term 2025/2026");
        assert!(result.year_injected);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let clock = august_2025();
        for input in [
            "March 2024",
            "March",
            "Rolling",
            "End of winter term",
            "October 31",
        ] {
            let once = normalize_deadline(input, 2025, &clock);
            let twice = normalize_deadline(&once.value, 2025, &clock);
            assert_eq!(once.value, twice.value, "input: {}", input);
        }
    }
}
