use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::processing::deadline::Clock;
use crate::pipeline::processing::score::ScoredListing;

/// Post-hoc filter criteria applied to ranked results on behalf of the
/// API layer. All criteria are optional; an empty filter keeps
/// everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilters {
    /// Keep listings whose funding text mentions at least this amount.
    #[serde(default)]
    pub min_funding: Option<f64>,
    /// Keep listings whose deadline falls within this many days. Only
    /// strictly formatted deadlines (YYYY-MM-DD) can be excluded; all
    /// other deadlines are conservatively retained.
    #[serde(default)]
    pub max_deadline_days: Option<i64>,
    /// Keep listings mentioning any of these keywords in their title,
    /// description, or field.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Keep listings whose degree contains this value.
    #[serde(default)]
    pub degree: Option<String>,
    /// Keep listings whose country contains this value.
    #[serde(default)]
    pub country: Option<String>,
}

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?").expect("valid numeric token regex")
});

impl ListingFilters {
    /// Apply all configured criteria, preserving order.
    pub fn apply(&self, records: Vec<ScoredListing>, clock: &dyn Clock) -> Vec<ScoredListing> {
        let before = records.len();
        let kept: Vec<ScoredListing> = records
            .into_iter()
            .filter(|record| self.matches(record, clock))
            .collect();
        debug!(before, after = kept.len(), "applied listing filters");
        kept
    }

    fn matches(&self, record: &ScoredListing, clock: &dyn Clock) -> bool {
        if let Some(min_funding) = self.min_funding {
            if funding_amount(&record.listing.funding) < min_funding {
                return false;
            }
        }

        if let Some(window_days) = self.max_deadline_days {
            if let Some(date) = parse_strict_deadline(&record.listing.deadline) {
                let days_until = (date - clock.today()).num_days();
                if days_until < 0 || days_until > window_days {
                    return false;
                }
            }
        }

        if !self.keywords.is_empty() {
            let haystack = format!(
                "{} {} {}",
                record.listing.title, record.listing.description, record.listing.field
            )
            .to_lowercase();
            if !self
                .keywords
                .iter()
                .any(|kw| haystack.contains(&kw.to_lowercase()))
            {
                return false;
            }
        }

        if let Some(degree) = &self.degree {
            if !record
                .listing
                .degree
                .to_lowercase()
                .contains(&degree.to_lowercase())
            {
                return false;
            }
        }

        if let Some(country) = &self.country {
            if !record
                .listing
                .country
                .to_lowercase()
                .contains(&country.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

/// First numeric token of the funding text, allowing thousands
/// separators. Funding strings with no numeric token parse as zero.
pub fn funding_amount(funding: &str) -> f64 {
    NUMERIC_TOKEN
        .find(funding)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}

/// Deadlines are only machine-comparable in the one strict format the
/// standardizer's upstream validators emit.
fn parse_strict_deadline(deadline: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(deadline.trim(), "%Y-%m-%d").ok()
}
