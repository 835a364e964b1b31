use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{Listing, Profile};
use crate::pipeline::processing::standardize::StandardizedListing;

/// Degree tiers with the record-side keywords that earn partial credit
/// when the requested tier does not appear verbatim.
pub static DEGREE_TIERS: &[(&str, &[&str])] = &[
    ("bachelor", &["undergraduate", "bachelor"]),
    ("master", &["master", "graduate", "postgraduate"]),
    ("phd", &["phd", "doctoral", "doctorate"]),
    ("postdoctoral", &["postdoc", "postdoctoral"]),
];

/// Related-field keywords that earn partial credit when the requested
/// and offered fields share no terms directly.
pub static FIELD_GROUPS: &[(&str, &[&str])] = &[
    ("engineering", &["technology", "technical", "stem"]),
    ("computer", &["it", "technology", "data", "software"]),
    ("science", &["natural", "stem", "research"]),
    ("business", &["management", "mba", "commerce"]),
    ("medical", &["health", "medicine", "clinical"]),
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// A standardized listing with its relevance score against a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternate_urls: Vec<String>,
    pub match_score: f64,
}

/// Computes the 0-100 relevance score from five independently capped
/// components: country (30), degree (25), field of study (20), academic
/// standing (15), and funding coverage (10). Missing fields on either
/// side take the documented neutral or minimal branch; scoring never
/// fails.
pub struct MatchScorer;

impl MatchScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, record: &StandardizedListing, profile: &Profile) -> ScoredListing {
        let listing = &record.listing;
        let score = self.score_country(listing, profile)
            + self.score_degree(listing, profile)
            + self.score_field(listing, profile)
            + self.score_cgpa(profile)
            + self.score_funding(listing);

        ScoredListing {
            listing: listing.clone(),
            alternate_urls: record.alternate_urls.clone(),
            match_score: score.clamp(0.0, 100.0),
        }
    }

    /// Country match, max 30.
    fn score_country(&self, listing: &Listing, profile: &Profile) -> f64 {
        let desired = profile.country.trim();
        if desired.is_empty() || desired.eq_ignore_ascii_case("any country") {
            return 15.0;
        }

        let country = listing.country.to_lowercase();
        if country.contains(&desired.to_lowercase()) {
            30.0
        } else if country.contains("various") || country.contains("multiple") {
            20.0
        } else {
            5.0
        }
    }

    /// Degree level match, max 25.
    fn score_degree(&self, listing: &Listing, profile: &Profile) -> f64 {
        let desired = profile.degree_level.trim().to_lowercase();
        let offered = listing.degree.trim().to_lowercase();

        if desired.is_empty() || offered.is_empty() {
            return 10.0;
        }
        if offered.contains(&desired) {
            return 25.0;
        }

        for (tier, keywords) in DEGREE_TIERS {
            if desired.contains(tier) && keywords.iter().any(|kw| offered.contains(kw)) {
                return 20.0;
            }
        }

        if offered.contains("all") || offered.contains("various") {
            return 12.0;
        }

        5.0
    }

    /// Field of study match, max 20.
    fn score_field(&self, listing: &Listing, profile: &Profile) -> f64 {
        let desired = profile.field_of_study.trim().to_lowercase();
        let offered = listing.field.to_lowercase();

        if desired == "all fields" || offered.contains("all") {
            return 10.0;
        }

        let desired_terms = word_set(&desired);
        let offered_terms = word_set(&offered);
        if desired_terms.intersection(&offered_terms).next().is_some() {
            return 20.0;
        }

        for (key, related) in FIELD_GROUPS {
            if desired.contains(key) && related.iter().any(|r| offered.contains(r)) {
                return 15.0;
            }
        }

        5.0
    }

    /// Academic standing, max 15.
    fn score_cgpa(&self, profile: &Profile) -> f64 {
        if profile.cgpa >= 3.5 {
            15.0
        } else if profile.cgpa >= 3.0 {
            12.0
        } else if profile.cgpa >= 2.5 {
            8.0
        } else {
            5.0
        }
    }

    /// Funding coverage, max 10.
    fn score_funding(&self, listing: &Listing) -> f64 {
        let funding = listing.funding.to_lowercase();
        if funding.contains("full") || funding.contains("fully funded") {
            10.0
        } else if funding.contains("partial") {
            6.0
        } else {
            3.0
        }
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn word_set(text: &str) -> HashSet<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            degree_level: "Master's".to_string(),
            field_of_study: "Computer Science & IT".to_string(),
            nationality: "Pakistani".to_string(),
            country: "Germany".to_string(),
            cgpa: 3.8,
        }
    }

    fn record(country: &str, degree: &str, field: &str, funding: &str) -> StandardizedListing {
        StandardizedListing {
            listing: Listing {
                title: "Test Scholarship Listing".to_string(),
                country: country.to_string(),
                degree: degree.to_string(),
                field: field.to_string(),
                funding: funding.to_string(),
                ..Default::default()
            },
            alternate_urls: Vec::new(),
        }
    }

    #[test]
    fn test_full_match_scores_maximum() {
        let scorer = MatchScorer::new();
        let scored = scorer.score(
            &record("Germany", "Master's", "Computer Science", "Fully funded"),
            &profile(),
        );
        // 30 country + 25 degree + 20 field + 15 cgpa + 10 funding
        assert_eq!(scored.match_score, 100.0);
    }

    #[test]
    fn test_any_country_is_neutral() {
        let scorer = MatchScorer::new();
        let mut wanted = profile();
        wanted.country = "Any Country".to_string();

        let scored = scorer.score(
            &record("Pitcairn", "Master's", "Computer Science", "Fully funded"),
            &wanted,
        );
        assert_eq!(scored.match_score, 15.0 + 25.0 + 20.0 + 15.0 + 10.0);
    }

    #[test]
    fn test_various_country_gets_partial_credit() {
        let scorer = MatchScorer::new();
        let scored = scorer.score(
            &record("Various countries", "Master's", "Computer Science", "Fully funded"),
            &profile(),
        );
        assert_eq!(scored.match_score, 20.0 + 25.0 + 20.0 + 15.0 + 10.0);
    }

    #[test]
    fn test_degree_tier_synonyms() {
        let scorer = MatchScorer::new();
        // "Postgraduate" is in the master tier but does not contain the
        // literal "master's"
        let scored = scorer.score(
            &record("Germany", "Postgraduate", "Computer Science", "Fully funded"),
            &profile(),
        );
        assert_eq!(scored.match_score, 30.0 + 20.0 + 20.0 + 15.0 + 10.0);
    }

    #[test]
    fn test_unspecified_degree_is_neutral() {
        let scorer = MatchScorer::new();
        let scored = scorer.score(
            &record("Germany", "", "Computer Science", "Fully funded"),
            &profile(),
        );
        assert_eq!(scored.match_score, 30.0 + 10.0 + 20.0 + 15.0 + 10.0);
    }

    #[test]
    fn test_related_field_partial_credit() {
        let scorer = MatchScorer::new();
        let scored = scorer.score(
            &record("Germany", "Master's", "Data & Software Engineering", "Partial funding"),
            &profile(),
        );
        // "computer" group relates to "data"/"software"; funding partial
        assert_eq!(scored.match_score, 30.0 + 25.0 + 15.0 + 15.0 + 6.0);
    }

    #[test]
    fn test_low_cgpa_floor() {
        let scorer = MatchScorer::new();
        let mut weak = profile();
        weak.cgpa = 1.9;

        let scored = scorer.score(&record("Nowhere", "Culinary", "Folklore", ""), &weak);
        assert_eq!(scored.match_score, 5.0 + 5.0 + 5.0 + 5.0 + 3.0);
    }

    #[test]
    fn test_score_bounds_hold_for_arbitrary_records() {
        let scorer = MatchScorer::new();
        let records = [
            record("", "", "", ""),
            record("Germany Germany Germany", "Master's Master's", "all", "full full full"),
            record("Various", "All levels", "All fields", "Partial"),
        ];
        for r in &records {
            let scored = scorer.score(r, &profile());
            assert!((0.0..=100.0).contains(&scored.match_score));
        }
    }
}
