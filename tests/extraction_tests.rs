/// Assembler and extractor tests against in-memory records
mod common;

use common::{dental_record, test_company_record, InMemoryStore};
use serde_json::json;
use shortforge_api::errors::AppError;
use shortforge_api::extraction::{
    extract_decision_makers, extract_goals, extract_key_products, extract_pain_points,
    extract_social_media, DEFAULT_INDUSTRY_PROFILE, INDUSTRY_PROFILES,
};
use shortforge_api::intelligence::{
    self, assemble, DEFAULT_DESCRIPTION, DEFAULT_INDUSTRY, DEFAULT_LOCATION,
};
use shortforge_api::models::{DecisionMaker, EnrichmentRecord};

#[tokio::test]
async fn test_company_lookup_scenario() {
    let store = InMemoryStore {
        records: vec![test_company_record()],
        ..Default::default()
    };

    let bi = intelligence::get_business_intelligence(&store, "1")
        .await
        .expect("record exists");

    assert_eq!(bi.company_name, "Test Company");
    assert_eq!(bi.industry, "Technology");
    assert_eq!(bi.key_products, vec!["Business Services"]);
    assert_eq!(bi.description, DEFAULT_DESCRIPTION);
    assert_eq!(bi.location, DEFAULT_LOCATION);
    assert_eq!(bi.website, "https://testcompany.com");
    assert_eq!(
        bi.decision_makers,
        vec![DecisionMaker::new("Business Owner", "Decision Maker")]
    );
}

#[tokio::test]
async fn unknown_domain_is_not_found() {
    let store = InMemoryStore {
        records: vec![test_company_record()],
        ..Default::default()
    };

    let err = intelligence::get_business_intelligence(&store, "999")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn blank_domain_id_is_bad_request() {
    let store = InMemoryStore::default();
    let err = intelligence::get_business_intelligence(&store, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn store_failure_is_generic_internal_error() {
    let store = InMemoryStore {
        failing: true,
        ..Default::default()
    };

    let err = intelligence::get_business_intelligence(&store, "1")
        .await
        .unwrap_err();
    match err {
        AppError::InternalError(msg) => assert!(!msg.contains("pool")),
        other => panic!("expected InternalError, got {:?}", other),
    }
}

#[tokio::test]
async fn lookup_is_idempotent() {
    let store = InMemoryStore {
        records: vec![dental_record(), test_company_record()],
        ..Default::default()
    };

    let first = intelligence::get_business_intelligence(&store, "42").await.unwrap();
    let second = intelligence::get_business_intelligence(&store, "42").await.unwrap();
    assert_eq!(first, second);
}

#[test]
fn dental_record_is_fully_extracted() {
    let bi = assemble(dental_record());

    assert_eq!(bi.company_name, "Bright Smile Dental");
    assert_eq!(bi.location, "Austin, TX");
    assert_eq!(
        bi.key_products,
        vec!["Teeth Whitening", "Dental Implants", "Invisalign", "Cleanings"]
    );
    assert_eq!(bi.pain_points, INDUSTRY_PROFILES[0].pain_points);
    assert_eq!(bi.goals, INDUSTRY_PROFILES[0].goals);
    assert_eq!(
        bi.decision_makers,
        vec![
            DecisionMaker::new("Dr. Maria Lopez", "Owner"),
            DecisionMaker::new("Tom Reed", "Office Manager"),
        ]
    );
    assert_eq!(
        bi.social_media.get("linkedin").map(String::as_str),
        Some("https://www.linkedin.com/company/bright-smile-dental")
    );
    assert_eq!(
        bi.social_media.get("twitter").map(String::as_str),
        Some("https://twitter.com/brightsmile-dental")
    );
    assert!(bi.raw_data.is_some());
}

#[test]
fn missing_company_falls_back_to_domain() {
    let bi = assemble(EnrichmentRecord {
        domain_id: "5".to_string(),
        domain: "acme.io".to_string(),
        lead_company: Some("  ".to_string()),
        ..Default::default()
    });

    assert_eq!(bi.company_name, "acme.io");
    assert_eq!(bi.industry, DEFAULT_INDUSTRY);
    assert_eq!(bi.pain_points, DEFAULT_INDUSTRY_PROFILE.pain_points);
}

#[test]
fn keywords_used_when_services_absent() {
    let record = EnrichmentRecord {
        keyword_signals: Some(json!({ "top_keywords": ["payroll", 7, "hr software", "benefits", "ats"] })),
        ..Default::default()
    };
    assert_eq!(
        extract_key_products(&record),
        vec!["payroll", "hr software", "benefits"]
    );
}

#[test]
fn lead_without_title_is_skipped() {
    let record = EnrichmentRecord {
        lead_name: Some("Sam".to_string()),
        ..Default::default()
    };
    assert_eq!(
        extract_decision_makers(&record),
        vec![DecisionMaker::new("Business Owner", "Decision Maker")]
    );
}

#[test]
fn generic_lists_for_unmatched_industry() {
    let record = EnrichmentRecord {
        lead_industry: Some("Software".to_string()),
        ..Default::default()
    };
    assert_eq!(extract_pain_points(&record).len(), 4);
    assert_eq!(extract_goals(&record), DEFAULT_INDUSTRY_PROFILE.goals);
}

#[test]
fn empty_domain_has_no_twitter_guess() {
    let social = extract_social_media(&EnrichmentRecord::default());
    assert_eq!(social.get("website").map(String::as_str), Some("https://"));
    assert!(!social.contains_key("twitter"));
}
