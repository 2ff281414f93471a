//! End-to-end pipeline tests.
//!
//! These drive the full analysis-and-repair flow through the public API:
//! validation, classification, fix generation and selection, learning
//! feedback, explanation synthesis, and analytics rollups.

use std::sync::Arc;

use mender::analytics::{AnalyticsAggregator, StoreDataSource};
use mender::config::MenderConfig;
use mender::fix::{FixPreferences, FixStyle};
use mender::learning::{JsonFileBackend, LearningConfig, PatternKey, PatternStore};
use mender::pipeline::{BugFixRequest, BugFixer};
use mender::{ErrorKind, Language, MenderError, Severity};
use tempfile::TempDir;

fn fixer() -> BugFixer {
    let config = MenderConfig::default();
    let store = Arc::new(PatternStore::new(LearningConfig::default()));
    BugFixer::with_store(&config, store)
}

fn request(code: &str, language: &str, error: Option<&str>) -> BugFixRequest {
    BugFixRequest {
        code: code.to_string(),
        language: language.to_string(),
        error: error.map(|e| e.to_string()),
        context: None,
        team: None,
        preferences: None,
    }
}

// ============================================================
// Input validation
// ============================================================

#[test]
fn test_missing_code_rejected_without_fix() {
    let f = fixer();
    for code in ["", "   ", "\n\t"] {
        let err = f.fix(&request(code, "javascript", None)).unwrap_err();
        assert!(err.is_client_error(), "expected client error for {:?}", code);
    }
    // Nothing was learned from rejected requests.
    assert_eq!(f.store().metrics().total_events, 0);
}

#[test]
fn test_missing_language_rejected() {
    let err = fixer()
        .fix(&request("let x = 1;", "", None))
        .unwrap_err();
    assert!(matches!(
        err,
        MenderError::InvalidRequest { ref field, .. } if field == "language"
    ));
}

#[test]
fn test_unsupported_language_lists_supported_set() {
    // Scenario: a cobol request is refused and the caller learns what is
    // supported.
    let err = fixer()
        .fix(&request("MOVE A TO B.", "cobol", None))
        .unwrap_err();
    match err {
        MenderError::UnsupportedLanguage {
            language,
            supported,
        } => {
            assert_eq!(language, "cobol");
            assert!(supported.contains(&"javascript".to_string()));
            assert!(supported.contains(&"python".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================
// End-to-end repair scenarios
// ============================================================

#[test]
fn test_javascript_null_reference_end_to_end() {
    let response = fixer()
        .fix(&request(
            "user.name",
            "javascript",
            Some("TypeError: Cannot read property 'name' of undefined"),
        ))
        .expect("response");

    assert!(response.success);
    assert_eq!(response.analysis.error_type, ErrorKind::NullReference);
    assert_eq!(response.analysis.severity, Severity::High);
    assert!(
        response.fixed_code.contains("?."),
        "expected null-safe access in {:?}",
        response.fixed_code
    );
    assert!(response.applied_fixes[0].confidence >= 0.8);
}

#[test]
fn test_python_missing_key_end_to_end() {
    let response = fixer()
        .fix(&request(
            "value = config['timeout']",
            "python",
            Some("KeyError: 'timeout'"),
        ))
        .expect("response");

    assert!(response.success);
    assert_eq!(response.analysis.error_type, ErrorKind::MissingKey);
    assert!(response.fixed_code.contains(".get("));
}

#[test]
fn test_no_error_unrecognized_code_degrades_gracefully() {
    // Scenario: nothing to classify still yields a usable response.
    let response = fixer()
        .fix(&request("some opaque code", "java", None))
        .expect("response");

    assert_eq!(response.analysis.error_type, ErrorKind::Unknown);
    assert!(!response.applied_fixes.is_empty());
    assert!(!response.fixed_code.is_empty());
    assert_eq!(response.original_code, "some opaque code");
}

#[test]
fn test_aggressive_style_offers_more_candidates() {
    let f = fixer();
    let mut req = request(
        "user.name",
        "javascript",
        Some("TypeError: Cannot read property 'name' of undefined"),
    );
    let conservative = f.fix(&req).expect("conservative");

    req.preferences = Some(FixPreferences {
        style: FixStyle::Aggressive,
        ..Default::default()
    });
    let aggressive = f.fix(&req).expect("aggressive");

    assert!(
        aggressive.analysis.suggested_fixes.len() > conservative.analysis.suggested_fixes.len()
    );
    // Selection still picks the strongest candidate.
    assert!(aggressive.applied_fixes[0].confidence >= 0.8);
}

#[test]
fn test_all_candidates_stay_within_confidence_bounds() {
    let f = fixer();
    let cases = [
        ("javascript", "user.name", Some("TypeError: Cannot read property 'name' of undefined")),
        ("javascript", "count += 1;", Some("ReferenceError: count is not defined")),
        ("typescript", "let x = 1;", Some("error TS2322: Type 'string' is not assignable to type 'number'")),
        ("python", "items[10]", Some("IndexError: list index out of range")),
        ("python", "print(", Some("SyntaxError: unexpected EOF while parsing")),
        ("java", "obj.method();", Some("java.lang.NullPointerException")),
        ("java", "plain code", None),
    ];
    for (language, code, error) in cases {
        let response = f.fix(&request(code, language, error)).expect("response");
        for candidate in &response.analysis.suggested_fixes {
            assert!(
                (0.0..=1.0).contains(&candidate.confidence),
                "{} candidate confidence {} out of bounds",
                language,
                candidate.confidence
            );
        }
    }
}

// ============================================================
// Learning feedback
// ============================================================

#[test]
fn test_consecutive_successes_grow_pattern_monotonically() {
    // Scenario: two successful fixes for the same defect class bump the
    // pattern's usage by one each without ever lowering confidence.
    let f = fixer();
    let req = request(
        "user.name",
        "javascript",
        Some("TypeError: Cannot read property 'name' of undefined"),
    );
    let key = PatternKey::new(Language::JavaScript, ErrorKind::NullReference);

    f.fix(&req).expect("first fix");
    let first = f.store().pattern(&key).expect("pattern after first fix");
    assert_eq!(first.usage_count, 1);

    f.fix(&req).expect("second fix");
    let second = f.store().pattern(&key).expect("pattern after second fix");
    assert_eq!(second.usage_count, 2);
    assert!(second.confidence >= first.confidence);
    assert!((second.success_rate - 1.0).abs() < 1e-9);
}

#[test]
fn test_pattern_example_window_never_exceeds_ten() {
    let f = fixer();
    let req = request(
        "user.name",
        "javascript",
        Some("TypeError: Cannot read property 'name' of undefined"),
    );
    for _ in 0..25 {
        f.fix(&req).expect("fix");
    }

    let key = PatternKey::new(Language::JavaScript, ErrorKind::NullReference);
    let pattern = f.store().pattern(&key).expect("pattern");
    assert_eq!(pattern.examples.len(), 10);
    assert_eq!(pattern.usage_count, 25);
}

#[test]
fn test_learning_survives_restart_via_durable_store() {
    let temp = TempDir::new().unwrap();
    let config = MenderConfig::default();
    let req = request(
        "user.name",
        "javascript",
        Some("TypeError: Cannot read property 'name' of undefined"),
    );
    let key = PatternKey::new(Language::JavaScript, ErrorKind::NullReference);

    {
        let store = Arc::new(PatternStore::with_backend(
            LearningConfig::default(),
            Box::new(JsonFileBackend::new(temp.path())),
        ));
        let f = BugFixer::with_store(&config, store);
        f.fix(&req).expect("fix");
    }

    let store = Arc::new(PatternStore::with_backend(
        LearningConfig::default(),
        Box::new(JsonFileBackend::new(temp.path())),
    ));
    let f = BugFixer::with_store(&config, store);
    assert_eq!(f.store().pattern(&key).expect("restored").usage_count, 1);

    f.fix(&req).expect("fix after restart");
    assert_eq!(f.store().pattern(&key).expect("updated").usage_count, 2);
}

// ============================================================
// Explanation synthesis
// ============================================================

#[test]
fn test_explanation_traces_applied_fix() {
    let f = fixer();
    let req = request(
        "user.name",
        "javascript",
        Some("TypeError: Cannot read property 'name' of undefined"),
    );
    let response = f.fix(&req).expect("response");
    let explanation = f.explain(&req, &response).expect("explanation");

    assert_eq!(explanation.fix_id, response.applied_fixes[0].id);
    assert_eq!(explanation.reasoning.len(), 4);
    assert_eq!(explanation.alternatives.len(), 3);
    assert!((0.0..=1.0).contains(&explanation.confidence));
    assert_eq!(
        explanation.educational_value.concept,
        "Null and undefined safety"
    );

    // Retrievable again by the applied fix id.
    assert!(f
        .cached_explanation(&response.applied_fixes[0].id)
        .is_some());
}

// ============================================================
// Analytics over real fix history
// ============================================================

#[test]
fn test_insight_list_capped_after_many_ticks() {
    let config = MenderConfig::default();
    let store = Arc::new(PatternStore::new(LearningConfig::default()));
    let f = BugFixer::with_store(&config, Arc::clone(&store));

    // A weak python pattern and a strong javascript one give the rules
    // something to say on every tick.
    for _ in 0..3 {
        f.fix(&request(
            "user.name",
            "javascript",
            Some("TypeError: Cannot read property 'name' of undefined"),
        ))
        .expect("js fix");
    }
    f.fix(&request("some opaque code", "python", None))
        .expect("python fix");

    let aggregator = AnalyticsAggregator::new(
        config.analytics.clone(),
        Box::new(StoreDataSource::new(store)),
    );
    for _ in 0..30 {
        aggregator.tick();
    }

    assert!(aggregator.insights().len() <= 10);
    let report = aggregator.last_report().expect("report");
    assert_eq!(report.total_fixes, 4);
    assert_eq!(report.by_language[&Language::JavaScript].total, 3);
}
