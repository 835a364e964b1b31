use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::constants::{is_placeholder, SIGNATURE_WORD_LIMIT, TITLE_FILLER_WORDS};
use crate::domain::Listing;
use crate::pipeline::processing::classify::{ClassifiedListing, FamilyKey};

/// The grouping identity a canonical listing was resolved under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    /// Listings sharing a recognized (family, sub_key) program identity.
    Family(FamilyKey),
    /// Unclassified listings sharing a normalized-title signature.
    Signature(String),
}

/// One representative listing chosen for a candidate group, carrying the
/// distinct URLs of the members it replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalListing {
    pub listing: Listing,
    /// Distinct URLs of other group members, in first-seen order. Empty
    /// unless the group held more than one distinct URL.
    pub alternate_urls: Vec<String>,
    pub group: GroupKey,
    /// How many validated listings the group contained.
    pub group_size: usize,
}

/// Statistics from one resolution pass, for run summaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionStats {
    pub family_groups: usize,
    pub signature_groups: usize,
    pub duplicates_merged: usize,
}

/// Groups classified listings by program identity and selects one
/// canonical representative per group.
pub struct GroupResolver;

impl GroupResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve all groups. Output order follows the first appearance of
    /// each group in the input, which keeps downstream tie-breaks
    /// deterministic for a deterministically ordered input.
    pub fn resolve(
        &self,
        records: Vec<ClassifiedListing>,
    ) -> (Vec<CanonicalListing>, ResolutionStats) {
        let mut groups: Vec<(GroupKey, Vec<Listing>)> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();

        for record in records {
            let key = match record.family {
                Some(family) => GroupKey::Family(family),
                None => GroupKey::Signature(title_signature(&record.listing.title)),
            };

            let slot = match index.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let slot = groups.len();
                    groups.push((entry.key().clone(), Vec::new()));
                    entry.insert(slot);
                    slot
                }
            };
            groups[slot].1.push(record.listing);
        }

        let mut stats = ResolutionStats::default();
        let mut canonical = Vec::with_capacity(groups.len());

        for (key, members) in groups {
            match key {
                GroupKey::Family(_) => stats.family_groups += 1,
                GroupKey::Signature(_) => stats.signature_groups += 1,
            }
            stats.duplicates_merged += members.len() - 1;
            canonical.push(resolve_group(key, members));
        }

        (canonical, stats)
    }
}

impl Default for GroupResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Select the canonical listing for one group.
///
/// Family groups keep the most complete member; the earliest member wins
/// ties, which makes the choice deterministic for a fixed input order.
/// Signature groups keep the first member encountered: an identical
/// reduced signature means the later listings add nothing.
fn resolve_group(key: GroupKey, members: Vec<Listing>) -> CanonicalListing {
    let group_size = members.len();

    let chosen = match key {
        GroupKey::Family(_) => members
            .iter()
            .enumerate()
            .max_by_key(|(position, listing)| {
                // Reversed position makes the earliest member win score ties.
                (completeness_score(listing), std::cmp::Reverse(*position))
            })
            .map(|(position, _)| position)
            .unwrap_or(0),
        GroupKey::Signature(_) => 0,
    };

    let alternate_urls = match key {
        GroupKey::Family(_) => collect_alternate_urls(&members, chosen),
        GroupKey::Signature(_) => Vec::new(),
    };

    if group_size > 1 {
        debug!(
            group = ?key,
            members = group_size,
            kept = %members[chosen].title,
            "merged duplicate listings"
        );
    }

    let mut members = members;
    let listing = members.swap_remove(chosen);

    CanonicalListing {
        listing,
        alternate_urls,
        group: key,
        group_size,
    }
}

/// Sum of character lengths of informative, non-placeholder fields. The
/// most detailed duplicate scores highest.
pub fn completeness_score(listing: &Listing) -> usize {
    listing
        .informative_fields()
        .iter()
        .filter(|(_, value)| !value.trim().is_empty() && !is_placeholder(value))
        .map(|(_, value)| value.chars().count())
        .sum()
}

/// Distinct non-empty URLs of the non-canonical members, in first-seen
/// order. Returns nothing unless the group spans more than one distinct
/// URL.
fn collect_alternate_urls(members: &[Listing], chosen: usize) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for member in members {
        let url = member.url.trim();
        if !url.is_empty() && !distinct.contains(&url) {
            distinct.push(url);
        }
    }
    if distinct.len() <= 1 {
        return Vec::new();
    }

    let canonical_url = members[chosen].url.trim();
    distinct
        .into_iter()
        .filter(|url| *url != canonical_url)
        .map(|url| url.to_string())
        .collect()
}

/// Reduced title signature for fallback deduplication: lowercase, strip
/// punctuation and filler words, keep the first five remaining words.
/// This is exact-match deduplication; word reorderings and differences
/// beyond the window are not merged.
pub fn title_signature(title: &str) -> String {
    let lowered = title.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty() && !TITLE_FILLER_WORDS.contains(w))
        .take(SIGNATURE_WORD_LIMIT)
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(words.join(" ").as_bytes());
    hex::encode(hasher.finalize())
}
