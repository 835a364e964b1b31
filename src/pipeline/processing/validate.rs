use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ValidationConfig;
use crate::constants::{NAV_LABELS, SOCIAL_DOMAINS};
use crate::domain::RawListing;

/// Why a raw listing was rejected by the validity filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectionReason {
    /// Title missing or empty
    MissingTitle,
    /// Title below the minimum usable length
    TitleTooShort,
    /// Title is a known navigation label ("Home", "Privacy Policy", ...)
    NavigationLabel,
    /// Title or URL points at a social media property
    SocialMediaHandle,
    /// Single-word fragment too short to be a listing title
    ShortFragment,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectionReason::MissingTitle => "missing title",
            RejectionReason::TitleTooShort => "title too short",
            RejectionReason::NavigationLabel => "navigation label",
            RejectionReason::SocialMediaHandle => "social media handle",
            RejectionReason::ShortFragment => "short fragment",
        };
        write!(f, "{}", reason)
    }
}

/// Structural validity and noise filter for scraped listings.
///
/// Scrapers deliver anchors wholesale: next to real listings come menu
/// labels, share buttons, and social links. This stage drops those before
/// any grouping happens; it never modifies a record.
pub struct NoiseFilter {
    config: ValidationConfig,
}

impl NoiseFilter {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check a raw listing. Returns `None` when the record is usable,
    /// otherwise the reason it must be dropped.
    pub fn check(&self, raw: &RawListing) -> Option<RejectionReason> {
        let title = raw.title.as_deref().unwrap_or("").trim();

        if title.is_empty() {
            return Some(RejectionReason::MissingTitle);
        }
        if title.chars().count() < self.config.min_title_chars {
            return Some(RejectionReason::TitleTooShort);
        }

        let title_lower = title.to_lowercase();
        if NAV_LABELS.iter().any(|label| title_lower == *label) {
            return Some(RejectionReason::NavigationLabel);
        }

        if title_lower.starts_with('@')
            || SOCIAL_DOMAINS.iter().any(|d| title_lower.contains(d))
        {
            return Some(RejectionReason::SocialMediaHandle);
        }
        if let Some(url) = raw.url.as_deref() {
            let url_lower = url.to_lowercase();
            if SOCIAL_DOMAINS.iter().any(|d| url_lower.contains(d)) {
                return Some(RejectionReason::SocialMediaHandle);
            }
        }

        // A lone word under the fragment threshold is link chrome, not a
        // program name.
        if !title.contains(char::is_whitespace)
            && title.chars().count() < self.config.short_fragment_chars
        {
            return Some(RejectionReason::ShortFragment);
        }

        None
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
