use chrono::NaiveDate;
use std::sync::Arc;

use scholar_pipeline::config::PipelineConfig;
use scholar_pipeline::domain::{Profile, RawListing};
use scholar_pipeline::pipeline::pipeline::SearchPipeline;
use scholar_pipeline::pipeline::processing::deadline::Clock;

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

fn pipeline() -> SearchPipeline {
    // August 2025: months January through July have already passed.
    SearchPipeline::with_clock(
        PipelineConfig::default(),
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 8, 6).unwrap())),
    )
}

fn profile() -> Profile {
    Profile {
        degree_level: "Master's".to_string(),
        field_of_study: "Computer Science & IT".to_string(),
        nationality: "Pakistani".to_string(),
        country: "Germany".to_string(),
        cgpa: 3.8,
    }
}

fn raw(title: &str, url: &str) -> RawListing {
    RawListing {
        title: Some(title.to_string()),
        url: Some(url.to_string()),
        ..Default::default()
    }
}

#[test]
fn deduplication_is_idempotent() {
    let batch = vec![
        raw("Chevening Scholarships", "https://chevening.example/a"),
        raw("Chevening Scholarships 2025", "https://chevening.example/b"),
        raw("Erasmus Mundus Joint Masters", "https://erasmus.example"),
        raw("Municipal Arts Bursary of Anywhereville", "https://anywhere.example"),
    ];

    let first = pipeline().run(batch, &profile()).unwrap();
    assert!(first.summary.duplicates_merged > 0);

    // Feed the deduplicated output back in as raw records
    let again: Vec<RawListing> = first
        .records
        .iter()
        .map(|r| RawListing {
            title: Some(r.listing.title.clone()),
            country: Some(r.listing.country.clone()),
            degree: Some(r.listing.degree.clone()),
            field: Some(r.listing.field.clone()),
            duration: Some(r.listing.duration.clone()),
            funding: Some(r.listing.funding.clone()),
            eligibility: Some(r.listing.eligibility.clone()),
            documents: Some(r.listing.documents.clone()),
            deadline: Some(r.listing.deadline.clone()),
            url: Some(r.listing.url.clone()),
            description: Some(r.listing.description.clone()),
            source_id: Some(r.listing.source_id.clone()),
        })
        .collect();

    let second = pipeline().run(again, &profile()).unwrap();
    assert_eq!(second.records.len(), first.records.len());
    assert_eq!(second.summary.duplicates_merged, 0);
}

#[test]
fn different_sub_keys_of_one_family_both_survive() {
    let batch = vec![
        raw("DAAD Graduate School Scholarship Programme", "https://daad.example/gssp"),
        raw("DAAD Research Grants for Doctoral Candidates", "https://daad.example/grants"),
    ];

    let outcome = pipeline().run(batch, &profile()).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.summary.duplicates_merged, 0);
}

#[test]
fn family_duplicates_collapse_to_the_most_detailed_record() {
    let sparse = raw("Chevening Scholarships", "https://mirror-one.example/chevening");
    let mut detailed = raw(
        "Chevening Scholarships 2025",
        "https://www.chevening.org/scholarships/",
    );
    detailed.country = Some("United Kingdom".to_string());
    detailed.degree = Some("Master's".to_string());
    detailed.funding =
        Some("Full funding: tuition + monthly stipend + travel costs".to_string());
    detailed.deadline = Some("2025-11-04".to_string());
    let mirrored = raw("UK Chevening Scholarships", "https://mirror-two.example/chevening");

    let outcome = pipeline()
        .run(vec![sparse, detailed, mirrored], &profile())
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.listing.url, "https://www.chevening.org/scholarships/");
    assert_eq!(record.listing.country, "United Kingdom");
    assert_eq!(
        record.alternate_urls,
        vec![
            "https://mirror-one.example/chevening",
            "https://mirror-two.example/chevening"
        ]
    );
}

#[test]
fn match_scores_stay_in_bounds() {
    let mut batch = vec![
        raw("Fully Funded Germany Masters in Computer Science", "https://a.example"),
        raw("Obscure Culinary Apprenticeship of Elbonia", "https://b.example"),
    ];
    batch[0].country = Some("Germany".to_string());
    batch[0].degree = Some("Master's".to_string());
    batch[0].field = Some("Computer Science".to_string());
    batch[0].funding = Some("Fully funded".to_string());
    batch[1].country = Some("Elbonia".to_string());

    let outcome = pipeline().run(batch, &profile()).unwrap();
    for record in &outcome.records {
        assert!(
            (0.0..=100.0).contains(&record.match_score),
            "score out of bounds: {}",
            record.match_score
        );
    }
}

#[test]
fn deadlines_are_year_qualified() {
    let mut stale = raw("Northern Lights Masters Bursary", "https://n.example");
    stale.deadline = Some("March 2024".to_string());
    let mut monthly = raw("Southern Cross Doctoral Bursary", "https://s.example");
    monthly.deadline = Some("March".to_string());
    let mut rolling = raw("Eastern Plains Research Bursary", "https://e.example");
    rolling.deadline = Some("Rolling".to_string());

    let outcome = pipeline()
        .run(vec![stale, monthly, rolling], &profile())
        .unwrap();

    let deadline_for = |needle: &str| {
        outcome
            .records
            .iter()
            .find(|r| r.listing.title.contains(needle))
            .map(|r| r.listing.deadline.clone())
            .unwrap()
    };

    assert_eq!(deadline_for("Northern"), "March 2025");
    // Current month is August, so a bare "March" means next spring
    assert_eq!(deadline_for("Southern"), "March 2026");
    assert_eq!(deadline_for("Eastern"), "Rolling");
}

#[test]
fn countries_are_standardized() {
    let mut usa = raw("Liberty Fellowship for Graduate Students", "https://l.example");
    usa.country = Some("usa".to_string());
    let mut germany = raw("Rhine Valley Masters Fellowship", "https://r.example");
    germany.country = Some("Deutschland".to_string());
    let mut unknown = raw("Crown Fellowship of Ruritania City", "https://c.example");
    unknown.country = Some("Ruritania".to_string());

    let outcome = pipeline()
        .run(vec![usa, germany, unknown], &profile())
        .unwrap();

    let country_for = |needle: &str| {
        outcome
            .records
            .iter()
            .find(|r| r.listing.title.contains(needle))
            .map(|r| r.listing.country.clone())
            .unwrap()
    };

    assert_eq!(country_for("Liberty"), "United States");
    assert_eq!(country_for("Rhine"), "Germany");
    assert_eq!(country_for("Crown"), "Ruritania");
}

#[test]
fn equal_scores_keep_input_order() {
    // Two unclassified listings that differ only in title wording beyond
    // the signature window score identically and must keep their order.
    let first = raw("Harbor City Fellowship Alpha Cohort", "https://h.example/a");
    let second = raw("Harbor Town Fellowship Alpha Cohort", "https://h.example/b");

    let outcome = pipeline().run(vec![first, second], &profile()).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].match_score, outcome.records[1].match_score);
    assert!(outcome.records[0].listing.title.contains("Harbor City"));
    assert!(outcome.records[1].listing.title.contains("Harbor Town"));
}
