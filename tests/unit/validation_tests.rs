/*!
 * Tests for validation through the public API
 */

use screenplay_formatter::validation::ValidationService;
use screenplay_formatter::{ElementKind, ErrorCode, ScreenplayElement, ValidationConfig, parse, validate};

use crate::common;

#[test]
fn test_validate_cleanScreenplay_shouldPass() {
    let report = validate(&parse(common::CLEAN_SCREENPLAY), false);
    assert!(report.passed, "{}", report.to_text());
    assert_eq!(report.total_errors, 0);
}

#[test]
fn test_validate_passedIffNoFindings() {
    for text in [common::CLEAN_SCREENPLAY, common::BROKEN_HEADING_SCREENPLAY, common::MESSY_SCREENPLAY] {
        let report = validate(&parse(text), false);
        assert_eq!(report.passed, report.findings.is_empty());
        assert_eq!(report.total_errors, report.findings.len());
    }
}

#[test]
fn test_validate_forcedLowercaseHeading_shouldSuggestRepair() {
    let elements = vec![ScreenplayElement::new(ElementKind::SceneHeading, "int office day", 1)];
    let report = validate(&elements, false);

    assert_eq!(report.count(ErrorCode::InvalidSceneHeading), 1);
    let finding = &report.findings[0];
    let suggestion = finding.suggested_fix.as_deref().unwrap();
    assert!(suggestion.contains("INT."));
    assert!(suggestion.contains("DAY"));
    assert!(finding.confidence >= 0.5);
}

#[test]
fn test_validate_messyScreenplay_shouldReportMetaCommentAndNames() {
    let report = validate(&parse(common::MESSY_SCREENPLAY), false);

    assert!(!report.passed);
    assert_eq!(report.count(ErrorCode::MetaCommentPresent), 1);
    assert!(report.count(ErrorCode::CharacterNameInconsistency) >= 1);
    assert!(report.errors_by_type.contains_key("META_COMMENT_PRESENT"));
}

#[test]
fn test_validate_unknownTransition_shouldHaveLowConfidenceAndNoSuggestion() {
    let elements = vec![ScreenplayElement::new(ElementKind::Transition, "RANDOM TRANSITION", 1)];
    let report = validate(&elements, false);

    assert_eq!(report.count(ErrorCode::NonStandardTransition), 1);
    assert!((report.findings[0].confidence - 0.4).abs() < f64::EPSILON);
    assert!(report.findings[0].suggested_fix.is_none());
}

#[test]
fn test_report_toJson_shouldUseShortCodes() {
    let report = validate(&parse(common::BROKEN_HEADING_SCREENPLAY), false);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["total_errors"], 1);
    assert_eq!(json["passed"], false);
    assert_eq!(json["errors"][0]["error_code"], "E1");
    assert_eq!(json["errors_by_type"]["INVALID_SCENE_HEADING"], 1);
}

#[test]
fn test_validationService_disabledRules_shouldBeSkipped() {
    let config = ValidationConfig {
        disabled_rules: vec!["META_COMMENT_PRESENT".to_string()],
        ..Default::default()
    };
    let report = ValidationService::with_config(config).validate(&parse(common::MESSY_SCREENPLAY));
    assert_eq!(report.count(ErrorCode::MetaCommentPresent), 0);
}
