use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Listing;

/// How sub-keys are derived for listings inside one family.
#[derive(Debug, Clone, Copy)]
pub enum SubKeyRule {
    /// Named program variants recognized by title keywords, tried in
    /// order; listings matching none fall back to their degree level.
    Variants(&'static [(&'static str, &'static [&'static str])]),
    /// Every listing in the family refers to the same award; all merge
    /// under the fixed "main" token.
    MergeAll,
    /// No named variants; listings are split by their degree level.
    DegreeLevel,
}

/// A recognized scholarship program family and the keywords that identify
/// it in scraped listings.
#[derive(Debug, Clone, Copy)]
pub struct FamilyRule {
    pub id: &'static str,
    /// Literal substrings searched for in the lowercased title + URL.
    pub keywords: &'static [&'static str],
    pub sub_key: SubKeyRule,
}

/// Sub-key used when neither a variant keyword nor a degree level applies.
pub const GENERIC_SUB_KEY: &str = "general";

/// Sub-key for merge-all families.
pub const MERGED_SUB_KEY: &str = "main";

/// The family table. Declaration order is a documented contract: rules
/// are evaluated top to bottom and the first family with any matching
/// keyword wins, so more specific programs must be listed before the
/// broader aggregators that may mention them.
pub static FAMILY_RULES: &[FamilyRule] = &[
    FamilyRule {
        id: "daad",
        keywords: &["daad", "german academic exchange"],
        sub_key: SubKeyRule::Variants(&[
            ("epos", &["epos", "development-related postgraduate"]),
            ("graduate-school", &["graduate school"]),
            ("research-grant", &["research grant", "research stay"]),
            ("study-scholarship", &["study scholarship"]),
            ("helmut-schmidt", &["helmut schmidt", "public policy"]),
        ]),
    },
    FamilyRule {
        id: "hec",
        keywords: &["higher education commission", "hec.gov", "hec "],
        sub_key: SubKeyRule::Variants(&[
            ("overseas", &["overseas"]),
            ("indigenous", &["indigenous"]),
            ("commonwealth", &["commonwealth"]),
            ("chinese-government", &["chinese government"]),
            ("turkey", &["turkey", "turkiye"]),
        ]),
    },
    FamilyRule {
        id: "chevening",
        keywords: &["chevening"],
        sub_key: SubKeyRule::MergeAll,
    },
    FamilyRule {
        id: "fulbright",
        keywords: &["fulbright"],
        sub_key: SubKeyRule::Variants(&[
            ("foreign-student", &["foreign student"]),
            ("visiting-scholar", &["visiting scholar", "scholar program"]),
        ]),
    },
    FamilyRule {
        id: "commonwealth",
        keywords: &["commonwealth scholarship", "cscuk", "commonwealth fellowship"],
        sub_key: SubKeyRule::Variants(&[
            ("split-site", &["split-site", "split site"]),
            ("shared", &["shared"]),
            ("distance-learning", &["distance learning"]),
            ("phd", &["phd", "doctoral"]),
            ("masters", &["master"]),
        ]),
    },
    FamilyRule {
        id: "erasmus",
        keywords: &["erasmus"],
        sub_key: SubKeyRule::Variants(&[
            ("mundus", &["mundus", "joint master"]),
            ("mobility", &["mobility", "exchange"]),
        ]),
    },
    FamilyRule {
        id: "csc-china",
        keywords: &[
            "china scholarship council",
            "chinese government scholarship",
            "csc.edu.cn",
        ],
        sub_key: SubKeyRule::DegreeLevel,
    },
    FamilyRule {
        id: "mext",
        keywords: &["mext", "monbukagakusho"],
        sub_key: SubKeyRule::Variants(&[
            ("research-student", &["research student"]),
            ("undergraduate", &["undergraduate"]),
        ]),
    },
    FamilyRule {
        id: "swedish-institute",
        keywords: &["swedish institute", "si scholarship"],
        sub_key: SubKeyRule::DegreeLevel,
    },
    FamilyRule {
        id: "australia-awards",
        keywords: &["australia awards"],
        sub_key: SubKeyRule::DegreeLevel,
    },
    FamilyRule {
        id: "vanier",
        keywords: &["vanier"],
        sub_key: SubKeyRule::MergeAll,
    },
    FamilyRule {
        id: "gates-cambridge",
        keywords: &["gates cambridge"],
        sub_key: SubKeyRule::MergeAll,
    },
];

/// Identity of a canonical scholarship program: a known family plus the
/// disambiguator for the program variant within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyKey {
    pub family_id: String,
    pub sub_key: String,
}

/// A validated listing tagged with its program identity, when one was
/// recognized. `family: None` defers the listing to the title-similarity
/// fallback in the group resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedListing {
    pub listing: Listing,
    pub family: Option<FamilyKey>,
}

/// Classifies listings against the family table.
pub struct FamilyClassifier {
    rules: &'static [FamilyRule],
}

impl FamilyClassifier {
    pub fn new() -> Self {
        Self {
            rules: FAMILY_RULES,
        }
    }

    /// Tag a listing with its family key, scanning the table in declared
    /// order and accepting the first family with any keyword present in
    /// the combined lowercased title + URL.
    pub fn classify(&self, listing: Listing) -> ClassifiedListing {
        let haystack = format!("{} {}", listing.title, listing.url).to_lowercase();

        let family = self
            .rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| haystack.contains(kw)))
            .map(|rule| {
                let sub_key = derive_sub_key(rule, &listing);
                debug!(
                    family = rule.id,
                    sub_key = %sub_key,
                    title = %listing.title,
                    "classified listing"
                );
                FamilyKey {
                    family_id: rule.id.to_string(),
                    sub_key,
                }
            });

        ClassifiedListing { listing, family }
    }
}

impl Default for FamilyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the sub-key distinguishing program variants within a family.
///
/// Order of resolution: named variant keyword in the title, then the
/// listing's own degree level, then the generic token.
fn derive_sub_key(rule: &FamilyRule, listing: &Listing) -> String {
    match rule.sub_key {
        SubKeyRule::MergeAll => MERGED_SUB_KEY.to_string(),
        SubKeyRule::Variants(variants) => {
            let title_lower = listing.title.to_lowercase();
            for (token, keywords) in variants {
                if keywords.iter().any(|kw| title_lower.contains(kw)) {
                    return token.to_string();
                }
            }
            degree_sub_key(listing)
        }
        SubKeyRule::DegreeLevel => degree_sub_key(listing),
    }
}

fn degree_sub_key(listing: &Listing) -> String {
    let degree = listing.degree.trim().to_lowercase();
    if degree.is_empty() {
        GENERIC_SUB_KEY.to_string()
    } else {
        degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, url: &str, degree: &str) -> Listing {
        Listing {
            title: title.to_string(),
            url: url.to_string(),
            degree: degree.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_family_recognized_from_title() {
        let classifier = FamilyClassifier::new();
        let classified =
            classifier.classify(listing("DAAD EPOS Scholarships", "", "Master's"));

        let key = classified.family.unwrap();
        assert_eq!(key.family_id, "daad");
        assert_eq!(key.sub_key, "epos");
    }

    #[test]
    fn test_family_recognized_from_url() {
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "Overseas PhD Scholarship Phase III",
            "https://hec.gov.pk/english/scholarshipsgrants/OSHD/Pages/default.aspx",
            "PhD",
        ));

        let key = classified.family.unwrap();
        assert_eq!(key.family_id, "hec");
        assert_eq!(key.sub_key, "overseas");
    }

    #[test]
    fn test_unrecognized_listing_defers_to_fallback() {
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "Municipal Arts Bursary for Local Students",
            "https://example.org/bursary",
            "",
        ));

        assert!(classified.family.is_none());
    }

    #[test]
    fn test_first_match_in_declaration_order_wins() {
        // "german academic exchange" (daad) appears before "chevening" in
        // the table, so a title carrying both resolves to daad.
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "German Academic Exchange and Chevening joint information session",
            "",
            "",
        ));

        assert_eq!(classified.family.unwrap().family_id, "daad");
    }

    #[test]
    fn test_merge_all_family_uses_fixed_token() {
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "Chevening Scholarships 2025 - Fully Funded",
            "https://www.chevening.org/scholarships/",
            "Master's",
        ));

        assert_eq!(classified.family.unwrap().sub_key, MERGED_SUB_KEY);
    }

    #[test]
    fn test_variant_fallback_uses_degree_level() {
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "DAAD funding opportunities for international students",
            "https://www2.daad.de/",
            "PhD",
        ));

        let key = classified.family.unwrap();
        assert_eq!(key.family_id, "daad");
        assert_eq!(key.sub_key, "phd");
    }

    #[test]
    fn test_variant_fallback_without_degree_is_generic() {
        let classifier = FamilyClassifier::new();
        let classified = classifier.classify(listing(
            "Fulbright opportunities overview",
            "https://foreign.fulbrightonline.org/",
            "",
        ));

        let key = classified.family.unwrap();
        assert_eq!(key.family_id, "fulbright");
        assert_eq!(key.sub_key, GENERIC_SUB_KEY);
    }

    #[test]
    fn test_distinct_variants_get_distinct_keys() {
        let classifier = FamilyClassifier::new();
        let graduate = classifier.classify(listing(
            "DAAD Graduate School Scholarship Programme",
            "",
            "PhD",
        ));
        let research = classifier.classify(listing(
            "DAAD Research Grants for Doctoral Candidates",
            "",
            "PhD",
        ));

        let graduate_key = graduate.family.unwrap();
        let research_key = research.family.unwrap();
        assert_eq!(graduate_key.family_id, research_key.family_id);
        assert_ne!(graduate_key.sub_key, research_key.sub_key);
    }
}
