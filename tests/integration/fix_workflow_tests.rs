/*!
 * Integration tests for the fix workflow with a mock corrector
 */

use anyhow::Result;
use std::time::Duration;

use screenplay_formatter::correction::{CorrectionPolicy, CorrectionResponse, FixEngine, FixSpan};
use screenplay_formatter::file_utils::FileManager;
use screenplay_formatter::providers::MockCorrector;

use crate::common;

/// A draft with a broken heading is repaired and written next to the input
#[tokio::test]
async fn test_fixWorkflow_withBrokenHeading_shouldWriteFixedFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "draft.txt", common::BROKEN_HEADING_SCREENPLAY)?;

    let engine = FixEngine::new(MockCorrector::working());
    let result = engine.fix_screenplay(&FileManager::read_screenplay(&input)?).await;

    assert!(result.success);
    assert_eq!(result.original_errors, 1);
    assert_eq!(result.remaining_errors, 0);
    assert!(result.final_report.passed);

    let output = FileManager::sibling_path(&input, "_fixed", "txt");
    FileManager::write_to_file(&output, &result.corrected_text)?;
    let fixed = FileManager::read_screenplay(&output)?;
    assert_eq!(fixed, common::BROKEN_HEADING_SCREENPLAY.replace("int kitchen night", "INT. KITCHEN - NIGHT"));
    Ok(())
}

/// Fixes land on the right lines even when a preamble was dropped
#[tokio::test]
async fn test_fixWorkflow_withPreamble_shouldAlignFixesToCleanedText() {
    let engine = FixEngine::new(MockCorrector::working());
    let result = engine.fix_screenplay(common::MESSY_SCREENPLAY).await;

    assert_eq!(result.applied_fixes(), 1);
    assert_eq!(result.applied[0].original_lines, vec!["Dr. Vance paces. [NOTE: tighten this]".to_string()]);
    assert!(result.corrected_text.starts_with("INT. LAB - NIGHT"));
    assert!(result.corrected_text.contains("\nDr. Vance paces.\n"));
    assert!(result.remaining_errors < result.original_errors);
}

/// The audit export carries the run summary and every applied fix
#[tokio::test]
async fn test_fixWorkflow_exportAudit_shouldWriteJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let audit_path = temp_dir.path().join("audit.json");

    let engine = FixEngine::new(MockCorrector::working()).with_strict(true);
    let result = engine.fix_screenplay(common::BROKEN_HEADING_SCREENPLAY).await;
    result.export_audit(&audit_path)?;

    let audit: serde_json::Value = serde_json::from_str(&FileManager::read_to_string(&audit_path)?)?;
    assert_eq!(audit["summary"]["applied_fixes"], 1);
    assert_eq!(audit["detailed_log"]["operation"], "fix_complete");
    assert_eq!(audit["detailed_log"]["strict_validation"], true);
    assert_eq!(audit["detailed_log"]["model"], "mock-corrector");
    assert_eq!(audit["applied"][0]["revised_lines"][0], "INT. KITCHEN - NIGHT");
    Ok(())
}

/// Low-confidence fixes are suggested, never applied
#[tokio::test]
async fn test_fixWorkflow_withStrictPolicy_shouldOnlySuggest() {
    let engine = FixEngine::new(MockCorrector::working()).with_policy(CorrectionPolicy::new(0.99, 8));
    let result = engine.fix_screenplay(common::BROKEN_HEADING_SCREENPLAY).await;

    assert_eq!(result.applied_fixes(), 0);
    assert_eq!(result.suggested_fixes(), 1);
    assert!(result.success);
    assert_eq!(result.corrected_text, common::BROKEN_HEADING_SCREENPLAY);
}

/// A failing chunk does not stop the others
#[tokio::test]
async fn test_fixWorkflow_withIntermittentCorrector_shouldSkipFailedChunk() {
    // Two findings far enough apart to land in separate chunks
    let mut text = String::from("INT. OFFICE - DAY\n\nint kitchen night\n");
    for i in 0..20 {
        text.push_str(&format!("\nAction line number {}.", i));
    }
    text.push_str("\n\next garden day\n\nBirds sing.");

    let corrector = MockCorrector::intermittent(2);
    let engine = FixEngine::new(corrector.clone());
    let result = engine.fix_screenplay(&text).await;

    assert_eq!(result.chunks_processed, 2);
    assert_eq!(result.chunks_failed, 1);
    assert_eq!(result.applied_fixes(), 1);
    assert!(result.corrected_text.contains("INT. KITCHEN - NIGHT"));
    assert!(result.corrected_text.contains("ext garden day"));
    assert_eq!(corrector.calls(), 2);
}

/// Overlapping fixes from the model: only the first one is kept
#[tokio::test]
async fn test_fixWorkflow_withOverlappingFixes_shouldDropTheLaterOne() {
    let heading = |revised: &str, start: usize, end: usize, original: Vec<&str>| FixSpan {
        start_line: start,
        end_line: end,
        original: original.into_iter().map(str::to_string).collect(),
        revised: vec![revised.to_string()],
        issues: vec!["E1".to_string()],
        confidence: 0.9,
    };
    let response = CorrectionResponse {
        fixes: vec![
            heading("INT. KITCHEN - NIGHT", 4, 4, vec!["int kitchen night"]),
            heading("INT. KITCHEN - NIGHT", 3, 4, vec!["", "int kitchen night"]),
        ],
        ..CorrectionResponse::empty("canned", None)
    };

    let engine = FixEngine::new(MockCorrector::canned(response));
    let result = engine.fix_screenplay(common::BROKEN_HEADING_SCREENPLAY).await;

    assert_eq!(result.applied_fixes(), 1);
    assert_eq!(result.applied[0].start_line, 3);
    assert_eq!(result.rejected_fixes(), 1);
    assert_eq!(result.rejected[0].reason, "overlaps an earlier fix");
}

/// A corrector slower than the chunk timeout counts as a failed chunk
#[tokio::test]
async fn test_fixWorkflow_withMalformedOrSlowCorrector_shouldDegrade() {
    let malformed = FixEngine::new(MockCorrector::malformed());
    let result = malformed.fix_screenplay(common::BROKEN_HEADING_SCREENPLAY).await;
    assert_eq!(result.chunks_failed, 1);
    assert!(result.corrections.is_empty());

    let slow = FixEngine::new(MockCorrector::slow(1000)).with_chunk_timeout(Duration::from_millis(10));
    let result = slow.fix_screenplay(common::BROKEN_HEADING_SCREENPLAY).await;
    assert_eq!(result.chunks_failed, 1);
    assert_eq!(result.corrected_text, common::BROKEN_HEADING_SCREENPLAY);
}
