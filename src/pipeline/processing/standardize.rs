use serde::{Deserialize, Serialize};

use crate::config::DeadlineConfig;
use crate::constants::NOT_SPECIFIED;
use crate::domain::Listing;
use crate::pipeline::processing::deadline::{normalize_deadline, Clock};
use crate::pipeline::processing::resolve::CanonicalListing;

/// Country spellings mapped to their canonical names. Lookup is exact
/// and case-insensitive; unmapped values pass through trimmed.
pub static COUNTRY_SYNONYMS: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("us", "United States"),
    ("u.s.", "United States"),
    ("u.s.a.", "United States"),
    ("america", "United States"),
    ("united states of america", "United States"),
    ("uk", "United Kingdom"),
    ("u.k.", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("england", "United Kingdom"),
    ("deutschland", "Germany"),
    ("holland", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("turkiye", "Turkey"),
];

/// A canonical listing with its fields normalized to the shared
/// vocabulary and its deadline year-qualified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardizedListing {
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternate_urls: Vec<String>,
}

/// Field standardizer. Every transformation degrades to pass-through on
/// missing or malformed input and is idempotent, so re-standardizing an
/// already-standardized record changes nothing.
pub struct Standardizer {
    deadline: DeadlineConfig,
}

impl Standardizer {
    pub fn new(deadline: DeadlineConfig) -> Self {
        Self { deadline }
    }

    /// Produce a standardized copy of a canonical listing. Returns the
    /// new value together with whether a deadline year was injected, for
    /// stage metrics.
    pub fn standardize(
        &self,
        canonical: CanonicalListing,
        clock: &dyn Clock,
    ) -> (StandardizedListing, bool) {
        let listing = canonical.listing;
        let deadline = normalize_deadline(&listing.deadline, self.deadline.cutoff_year, clock);

        let standardized = Listing {
            title: clean_text(&listing.title),
            country: standardize_country(&listing.country),
            degree: standardize_degree(&listing.degree),
            field: clean_text(&listing.field),
            duration: clean_text(&listing.duration),
            funding: clean_text(&listing.funding),
            eligibility: clean_text(&listing.eligibility),
            documents: clean_text(&listing.documents),
            deadline: deadline.value,
            url: absolute_url(&listing.url),
            description: collapse_whitespace(&listing.description),
            source_id: listing.source_id,
        };

        (
            StandardizedListing {
                listing: standardized,
                alternate_urls: canonical.alternate_urls,
            },
            deadline.year_injected,
        )
    }
}

/// Map a country spelling onto its canonical name; unrecognized values
/// pass through trimmed.
pub fn standardize_country(country: &str) -> String {
    let trimmed = country.trim();
    let lowered = trimmed.to_lowercase();
    COUNTRY_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Ordered substring classification of degree levels. The first matching
/// tier wins; unmatched values pass through unchanged.
pub fn standardize_degree(degree: &str) -> String {
    let lowered = degree.to_lowercase();

    if lowered.contains("bachelor") || lowered.contains("undergraduate") {
        "Bachelor's".to_string()
    } else if lowered.contains("master") || lowered.contains("postgraduate") {
        "Master's".to_string()
    } else if lowered.contains("phd")
        || lowered.contains("doctoral")
        || lowered.contains("doctorate")
    {
        "PhD".to_string()
    } else if lowered.contains("postdoc") {
        "Postdoctoral".to_string()
    } else {
        degree.to_string()
    }
}

/// Clean a free-text field: unescape the common HTML entities, collapse
/// whitespace runs, trim; empty values become "Not specified".
pub fn clean_text(text: &str) -> String {
    let cleaned = collapse_whitespace(text);
    if cleaned.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        cleaned
    }
}

/// Entity unescape happens before the whitespace collapse so a
/// non-breaking space cannot leave a double space behind.
fn collapse_whitespace(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix a scheme onto scheme-less URLs; empty URLs pass through.
pub fn absolute_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
