/*!
 * Tests for chunking, guardrails and prompt building
 */

use screenplay_formatter::correction::prompts::{CorrectionPromptBuilder, fingerprint};
use screenplay_formatter::correction::{
    CorrectionPolicy, CorrectionResponse, FixSpan, FixVerdict, ValidationChunker,
};
use screenplay_formatter::providers::{Corrector, MockCorrector};
use screenplay_formatter::screenplay::cleaner::clean_text;
use screenplay_formatter::{parse, validate};

use crate::common;

fn chunks_for(text: &str) -> Vec<screenplay_formatter::correction::Chunk> {
    let elements = parse(text);
    let report = validate(&elements, false);
    let cleaned = clean_text(text);
    let lines: Vec<&str> = cleaned.split('\n').collect();
    let chunker = ValidationChunker::new();
    chunker.validate_chunks(chunker.create_chunks(&elements, &report.findings, &lines))
}

#[test]
fn test_chunker_shouldCoverEveryFinding() {
    let chunks = chunks_for(common::BROKEN_HEADING_SCREENPLAY);

    assert_eq!(chunks.len(), 1);
    let chunk = &chunks[0];
    assert!(chunk.start_line <= 4 && chunk.end_line >= 4);
    assert_eq!(chunk.lines.len(), chunk.end_line - chunk.start_line + 1);
    assert_eq!(chunk.error_codes(), vec!["E1"]);
    assert!(chunk.text().contains("int kitchen night"));
}

#[test]
fn test_chunker_cleanScreenplay_shouldProduceNoChunks() {
    assert!(chunks_for(common::CLEAN_SCREENPLAY).is_empty());
}

#[test]
fn test_policy_shouldSortFixesIntoVerdicts() {
    let chunk = chunks_for(common::BROKEN_HEADING_SCREENPLAY).remove(0);
    let index = chunk.lines.iter().position(|l| l == "int kitchen night").unwrap();
    let span = |revised: &str, confidence: f64| FixSpan {
        start_line: index,
        end_line: index,
        original: vec!["int kitchen night".to_string()],
        revised: vec![revised.to_string()],
        issues: vec!["E1".to_string()],
        confidence,
    };
    let policy = CorrectionPolicy::default();

    assert_eq!(policy.evaluate(&chunk, &span("INT. KITCHEN - NIGHT", 0.9)), FixVerdict::Applied);
    assert_eq!(policy.evaluate(&chunk, &span("INT. KITCHEN - NIGHT", 0.5)), FixVerdict::Suggested);
    assert!(matches!(
        policy.evaluate(&chunk, &span("INT. KITCHEN - NIGHT RAINING", 0.95)),
        FixVerdict::Rejected(_)
    ));
}

#[test]
fn test_correctionResponse_fromJson_shouldAcceptSchema() {
    let payload = r#"{
        "version": "1.0",
        "model": "gpt-4o-mini",
        "fixes": [{"start_line": 0, "end_line": 0, "original": ["int lab"], "revised": ["INT. LAB - DAY"], "issues": ["E1"], "confidence": 0.9}],
        "unchanged_lines": [1, 2],
        "notes": "one heading"
    }"#;
    let response = CorrectionResponse::from_json(payload).unwrap();

    assert_eq!(response.fixes.len(), 1);
    assert_eq!(response.unchanged_lines, vec![1, 2]);
    assert!((response.average_confidence() - 0.9).abs() < f64::EPSILON);
}

#[test]
fn test_promptBuilder_shouldEmbedChunkAndCodes() {
    let chunk = chunks_for(common::BROKEN_HEADING_SCREENPLAY).remove(0);
    let (system, user) = CorrectionPromptBuilder::new().with_chunk(&chunk).build();

    assert!(!system.is_empty());
    assert!(user.contains("DETECTED_ISSUES: E1"));
    assert!(user.contains("int kitchen night"));
    assert_eq!(fingerprint(&user).len(), 8);
    assert_eq!(fingerprint(&user), fingerprint(&user));
}

#[test]
fn test_mockCorrector_onRealChunk_shouldProposeHeadingRepair() {
    let chunk = chunks_for(common::BROKEN_HEADING_SCREENPLAY).remove(0);
    let response = tokio_test::block_on(MockCorrector::working().correct(&chunk)).unwrap();

    assert_eq!(response.fixes.len(), 1);
    assert_eq!(response.fixes[0].revised, vec!["INT. KITCHEN - NIGHT".to_string()]);
    assert_eq!(CorrectionPolicy::default().evaluate(&chunk, &response.fixes[0]), FixVerdict::Applied);
}
