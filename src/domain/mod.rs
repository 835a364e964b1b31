use serde::{Deserialize, Serialize};

/// A raw scholarship listing as delivered by the fetch layer.
///
/// Every field is optional: upstream sources are heterogeneous and
/// unreliable, and nothing beyond the shape of the map is guaranteed
/// until the record has passed the validity filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub documents: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Identifier of the source that delivered this listing, when known.
    #[serde(default)]
    pub source_id: Option<String>,
}

/// A scholarship listing with every field materialized.
///
/// Missing raw fields become empty strings; the standardizer is the only
/// stage that substitutes human-facing defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub country: String,
    pub degree: String,
    pub field: String,
    pub duration: String,
    pub funding: String,
    pub eligibility: String,
    pub documents: String,
    pub deadline: String,
    pub url: String,
    pub description: String,
    pub source_id: String,
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            country: raw.country.unwrap_or_default(),
            degree: raw.degree.unwrap_or_default(),
            field: raw.field.unwrap_or_default(),
            duration: raw.duration.unwrap_or_default(),
            funding: raw.funding.unwrap_or_default(),
            eligibility: raw.eligibility.unwrap_or_default(),
            documents: raw.documents.unwrap_or_default(),
            deadline: raw.deadline.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            source_id: raw.source_id.unwrap_or_default(),
        }
    }
}

impl Listing {
    /// The informative fields considered by the completeness score, in the
    /// fixed order used for duplicate resolution. Description is excluded:
    /// it is presentation text, not listing data.
    pub fn informative_fields(&self) -> [(&'static str, &str); 10] {
        [
            ("title", &self.title),
            ("country", &self.country),
            ("degree", &self.degree),
            ("field", &self.field),
            ("duration", &self.duration),
            ("funding", &self.funding),
            ("eligibility", &self.eligibility),
            ("documents", &self.documents),
            ("deadline", &self.deadline),
            ("url", &self.url),
        ]
    }
}

/// The requester profile that ranked results are matched against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub degree_level: String,
    pub field_of_study: String,
    pub nationality: String,
    pub country: String,
    pub cgpa: f64,
}

impl Profile {
    /// Validate the profile shape. Returns a list of human-readable
    /// violations; an empty list means the profile is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let required = [
            ("degree_level", &self.degree_level),
            ("field_of_study", &self.field_of_study),
            ("nationality", &self.nationality),
            ("country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("Missing required field: {}", name));
            }
        }

        if !(0.0..=4.0).contains(&self.cgpa) {
            errors.push("CGPA must be between 0.0 and 4.0".to_string());
        }

        errors
    }
}
