/// Fixed vocabulary tables shared across pipeline stages.
///
/// These are declared as plain static slices rather than built at runtime
/// so the classification and standardization rules stay auditable in one
/// place and independently testable.

/// Placeholder values that carry no information for duplicate resolution.
/// A field whose trimmed value matches one of these (case-insensitive)
/// contributes nothing to a record's completeness score.
pub const PLACEHOLDER_VALUES: &[&str] = &[
    "n/a",
    "na",
    "none",
    "varies",
    "rolling",
    "see website",
    "see official website",
    "see official site",
    "see daad portal",
    "check website",
    "check official website",
    "not specified",
    "not available",
    "tba",
    "-",
];

/// Single-phrase navigation labels that mark a scraped anchor as site
/// chrome rather than a scholarship listing.
pub const NAV_LABELS: &[&str] = &[
    "home",
    "about",
    "about us",
    "contact",
    "contact us",
    "login",
    "log in",
    "register",
    "menu",
    "search",
    "subscribe",
    "share",
    "follow us",
    "read more",
    "learn more",
    "apply now",
    "news",
    "events",
    "sitemap",
    "cookie policy",
    "privacy policy",
    "terms",
    "terms of use",
];

/// Social media host fragments; titles or URLs carrying these are
/// scraper noise, never listings.
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "flickr.com",
];

/// Filler words stripped from titles before computing the fallback
/// deduplication signature.
pub const TITLE_FILLER_WORDS: &[&str] = &[
    "scholarship",
    "scholarships",
    "program",
    "programme",
    "the",
    "and",
    "for",
    "in",
    "at",
    "to",
    "of",
];

/// Number of leading signature words kept for fallback deduplication.
/// Titles differing only beyond this window are not merged.
pub const SIGNATURE_WORD_LIMIT: usize = 5;

/// Deadline values that are schedules rather than dates; the deadline
/// normalizer passes strings containing any of these through unchanged.
pub const DEADLINE_SKIP_TOKENS: &[&str] = &[
    "n/a",
    "varies",
    "rolling",
    "open year-round",
    "year-round",
    "check website",
    "see website",
    "multiple deadlines",
    "to be announced",
    "tba",
];

/// Month names with their standard abbreviations, in calendar order.
/// Matched token-wise against deadline strings.
pub const MONTH_NAMES: [(u32, &[&str]); 12] = [
    (1, &["january", "jan"]),
    (2, &["february", "feb"]),
    (3, &["march", "mar"]),
    (4, &["april", "apr"]),
    (5, &["may"]),
    (6, &["june", "jun"]),
    (7, &["july", "jul"]),
    (8, &["august", "aug"]),
    (9, &["september", "sept", "sep"]),
    (10, &["october", "oct"]),
    (11, &["november", "nov"]),
    (12, &["december", "dec"]),
];

/// Substitute text for free-text fields that arrive empty.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Check whether a field value is a placeholder from the blacklist.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    PLACEHOLDER_VALUES
        .iter()
        .any(|p| trimmed.eq_ignore_ascii_case(p))
}
