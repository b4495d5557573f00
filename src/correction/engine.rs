/*!
 * Fix engine: drives a screenplay through validation and correction.
 *
 * The engine parses and validates the draft, sends each chunk of failing
 * lines to the corrector, filters the proposed fixes through the policy and
 * applies the safe ones bottom-up to the cleaned text. Corrector failures
 * only cost the chunk they happened in.
 */

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use similar::TextDiff;
use uuid::Uuid;

use crate::file_utils::FileManager;
use crate::providers::Corrector;
use crate::screenplay::cleaner::clean_text;
use crate::screenplay::ScreenplayParser;
use crate::validation::{ValidationConfig, ValidationReport, ValidationService};

use super::chunker::{Chunk, ValidationChunker};
use super::guardrails::{CorrectionPolicy, FixVerdict};
use super::{CorrectionResponse, FixSpan};

/// Default upper bound for one corrector call
const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(180);

/// A fix that passed the policy, in absolute cleaned-text lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFix {
    /// First replaced line, 0-based
    pub start_line: usize,
    /// Last replaced line, inclusive
    pub end_line: usize,
    pub original_lines: Vec<String>,
    pub revised_lines: Vec<String>,
    pub confidence: f64,
    pub issues: Vec<String>,
    /// Unified diff of original against revised
    pub diff: String,
    pub timestamp: String,
}

impl AppliedFix {
    fn from_span(chunk: &Chunk, fix: &FixSpan) -> Self {
        Self {
            start_line: chunk.start_line + fix.start_line,
            end_line: chunk.start_line + fix.end_line,
            original_lines: fix.original.clone(),
            revised_lines: fix.revised.clone(),
            confidence: fix.confidence,
            issues: fix.issues.clone(),
            diff: unified_diff(&fix.original, &fix.revised),
            timestamp: Local::now().to_rfc3339(),
        }
    }

    fn overlaps(&self, other: &AppliedFix) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }
}

/// A fix the policy turned down
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedFix {
    pub start_line: usize,
    pub end_line: usize,
    pub reason: String,
}

/// Audit record of one engine run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLog {
    pub operation: String,
    pub run_id: String,
    pub timestamp: String,
    pub model: String,
    pub dry_run: bool,
    pub strict_validation: bool,
    pub data: serde_json::Value,
}

/// Outcome of `FixEngine::fix_screenplay`
#[derive(Debug, Clone, Serialize)]
pub struct FixResult {
    /// At least one fix was applied or suggested, or nothing needed fixing
    pub success: bool,
    pub dry_run: bool,
    pub original_errors: usize,
    pub remaining_errors: usize,
    /// Fixes that passed the policy; in a dry run, the ones that would be applied
    pub applied: Vec<AppliedFix>,
    pub suggested: Vec<AppliedFix>,
    pub rejected: Vec<RejectedFix>,
    pub chunks_processed: usize,
    pub chunks_failed: usize,
    pub corrections: Vec<CorrectionResponse>,
    /// Input with fixes applied; the input itself when nothing was applied
    pub corrected_text: String,
    pub final_report: ValidationReport,
    pub audit_log: AuditLog,
}

impl FixResult {
    pub fn applied_fixes(&self) -> usize {
        self.applied.len()
    }

    pub fn suggested_fixes(&self) -> usize {
        self.suggested.len()
    }

    pub fn rejected_fixes(&self) -> usize {
        self.rejected.len()
    }

    /// The JSON document written by `export_audit`
    pub fn audit_json(&self) -> serde_json::Value {
        json!({
            "summary": {
                "success": self.success,
                "original_errors": self.original_errors,
                "remaining_errors": self.remaining_errors,
                "applied_fixes": self.applied_fixes(),
                "suggested_fixes": self.suggested_fixes(),
                "rejected_fixes": self.rejected_fixes(),
                "chunks_processed": self.chunks_processed,
                "chunks_failed": self.chunks_failed,
            },
            "detailed_log": self.audit_log,
            "applied": self.applied,
            "suggested": self.suggested,
            "rejected": self.rejected,
            "corrections": self.corrections,
        })
    }

    /// Write the audit document as pretty JSON
    pub fn export_audit(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.audit_json()).context("Failed to serialize audit log")?;
        FileManager::write_to_file(path, &json)?;
        info!("Audit log exported to {:?}", path);
        Ok(())
    }

    /// Human-readable summary of the run
    pub fn summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![rule.clone(), "SCREENPLAY FIX SUMMARY".to_string(), rule];

        if self.dry_run {
            lines.push("MODE: Dry Run (preview only)".to_string());
            lines.push(String::new());
        }

        lines.push(format!("Original errors: {}", self.original_errors));
        lines.push(format!("Remaining errors: {}", self.remaining_errors));
        lines.push(format!("Applied fixes: {}", self.applied_fixes()));
        lines.push(format!("Suggested fixes: {}", self.suggested_fixes()));
        lines.push(format!("Rejected fixes: {}", self.rejected_fixes()));
        lines.push(format!("Chunks processed: {}", self.chunks_processed));
        if self.chunks_failed > 0 {
            lines.push(format!("Chunks failed: {}", self.chunks_failed));
        }

        if self.original_errors > 0 {
            let improvement = self.original_errors.saturating_sub(self.remaining_errors);
            let pct = improvement as f64 / self.original_errors as f64 * 100.0;
            lines.push(format!("Improvement: {} errors fixed ({:.1}%)", improvement, pct));
        }

        lines.push(String::new());
        lines.push(format!("Status: {}", if self.success { "SUCCESS" } else { "FAILED" }));

        if !self.final_report.passed {
            lines.push(String::new());
            lines.push("Remaining Issues:".to_string());
            for (name, count) in &self.final_report.errors_by_type {
                lines.push(format!("  {}: {}", name, count));
            }
        }

        lines.join("\n")
    }
}

fn unified_diff(original: &[String], revised: &[String]) -> String {
    let before = format!("{}\n", original.join("\n"));
    let after = format!("{}\n", revised.join("\n"));
    TextDiff::from_lines(&before, &after)
        .unified_diff()
        .context_radius(1)
        .header("original", "revised")
        .to_string()
}

/// Keep the earliest-starting of any overlapping fixes
fn drop_overlaps(mut fixes: Vec<AppliedFix>) -> (Vec<AppliedFix>, Vec<RejectedFix>) {
    fixes.sort_by_key(|f| f.start_line);
    let mut kept: Vec<AppliedFix> = Vec::with_capacity(fixes.len());
    let mut dropped = Vec::new();

    for fix in fixes {
        match kept.last() {
            Some(previous) if previous.overlaps(&fix) => {
                warn!(
                    "Fix at lines {}-{} overlaps lines {}-{}; dropped",
                    fix.start_line + 1,
                    fix.end_line + 1,
                    previous.start_line + 1,
                    previous.end_line + 1
                );
                dropped.push(RejectedFix {
                    start_line: fix.start_line,
                    end_line: fix.end_line,
                    reason: "overlaps an earlier fix".to_string(),
                });
            }
            _ => kept.push(fix),
        }
    }
    (kept, dropped)
}

/// Replace line ranges from the bottom up so earlier indices stay valid
fn apply_fixes(text: &str, fixes: &[AppliedFix]) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut ordered: Vec<&AppliedFix> = fixes.iter().collect();
    ordered.sort_by_key(|f| std::cmp::Reverse(f.start_line));

    for fix in ordered {
        if fix.end_line >= lines.len() {
            warn!("Fix at line {} is past the end of the text; skipped", fix.start_line + 1);
            continue;
        }
        lines.splice(fix.start_line..=fix.end_line, fix.revised_lines.iter().cloned());
    }
    lines.join("\n")
}

/// Orchestrates validation, correction and re-validation
#[derive(Debug)]
pub struct FixEngine<C: Corrector> {
    corrector: C,
    policy: CorrectionPolicy,
    strict: bool,
    dry_run: bool,
    chunk_timeout: Duration,
    parser: ScreenplayParser,
    chunker: ValidationChunker,
}

impl<C: Corrector> FixEngine<C> {
    pub fn new(corrector: C) -> Self {
        Self {
            corrector,
            policy: CorrectionPolicy::default(),
            strict: false,
            dry_run: false,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
            parser: ScreenplayParser::new(),
            chunker: ValidationChunker::new(),
        }
    }

    pub fn with_policy(mut self, policy: CorrectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Preview fixes without applying them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_chunk_timeout(mut self, timeout: Duration) -> Self {
        self.chunk_timeout = timeout;
        self
    }

    pub fn corrector(&self) -> &C {
        &self.corrector
    }

    fn validator(&self) -> ValidationService {
        ValidationService::with_config(ValidationConfig::strict(self.strict))
    }

    fn audit_log(&self, operation: &str, data: serde_json::Value) -> AuditLog {
        AuditLog {
            operation: operation.to_string(),
            run_id: Uuid::new_v4().to_string(),
            timestamp: Local::now().to_rfc3339(),
            model: self.corrector.model().to_string(),
            dry_run: self.dry_run,
            strict_validation: self.strict,
            data,
        }
    }

    /// Ask the corrector about one chunk, bounded by the chunk timeout
    async fn correct_chunk(&self, chunk: &Chunk) -> Option<CorrectionResponse> {
        match tokio::time::timeout(self.chunk_timeout, self.corrector.correct(chunk)).await {
            Ok(Ok(response)) => Some(response),
            Ok(Err(e)) => {
                error!("Correction failed for lines {}-{}: {}", chunk.start_line + 1, chunk.end_line + 1, e);
                None
            }
            Err(_) => {
                error!(
                    "Correction timed out after {:?} for lines {}-{}",
                    self.chunk_timeout,
                    chunk.start_line + 1,
                    chunk.end_line + 1
                );
                None
            }
        }
    }

    /// Validate the draft and correct what fails.
    pub async fn fix_screenplay(&self, text: &str) -> FixResult {
        info!("Starting screenplay fix process");

        let cleaned = clean_text(text);
        let elements = if text.is_empty() { Vec::new() } else { self.parser.parse_cleaned(&cleaned) };
        let validator = self.validator();
        let initial_report = validator.validate(&elements);

        if initial_report.passed {
            info!("Screenplay already passes validation");
            return FixResult {
                success: true,
                dry_run: self.dry_run,
                original_errors: 0,
                remaining_errors: 0,
                applied: Vec::new(),
                suggested: Vec::new(),
                rejected: Vec::new(),
                chunks_processed: 0,
                chunks_failed: 0,
                corrections: Vec::new(),
                corrected_text: text.to_string(),
                final_report: initial_report,
                audit_log: self.audit_log("no_fixes_needed", json!({})),
            };
        }

        info!("Found {} validation errors", initial_report.total_errors);

        let lines: Vec<&str> = cleaned.split('\n').collect();
        let chunks = self
            .chunker
            .validate_chunks(self.chunker.create_chunks(&elements, &initial_report.findings, &lines));
        info!("Created {} chunks for processing", chunks.len());

        let mut corrections = Vec::new();
        let mut applied = Vec::new();
        let mut suggested = Vec::new();
        let mut rejected = Vec::new();
        let mut chunks_failed = 0;

        for (i, chunk) in chunks.iter().enumerate() {
            info!("Processing chunk {}/{}: {}", i + 1, chunks.len(), self.chunker.summary(chunk));

            let Some(response) = self.correct_chunk(chunk).await else {
                chunks_failed += 1;
                continue;
            };

            for fix in &response.fixes {
                match self.policy.evaluate(chunk, fix) {
                    FixVerdict::Applied => applied.push(AppliedFix::from_span(chunk, fix)),
                    FixVerdict::Suggested => suggested.push(AppliedFix::from_span(chunk, fix)),
                    FixVerdict::Rejected(reason) => rejected.push(RejectedFix {
                        start_line: chunk.start_line + fix.start_line,
                        end_line: chunk.start_line + fix.end_line,
                        reason,
                    }),
                }
            }
            corrections.push(response);
        }

        let (applied, overlapping) = drop_overlaps(applied);
        rejected.extend(overlapping);

        let (corrected_text, final_report) = if !applied.is_empty() && !self.dry_run {
            let corrected = apply_fixes(&cleaned, &applied);
            let report = validator.validate(&self.parser.parse(&corrected));
            (corrected, report)
        } else {
            (text.to_string(), initial_report.clone())
        };

        let stats = self.chunker.stats(&chunks);
        let audit_log = self.audit_log(
            "fix_complete",
            json!({
                "chunks_processed": chunks.len(),
                "chunks_failed": chunks_failed,
                "applied_fixes": applied.len(),
                "suggested_fixes": suggested.len(),
                "rejected_fixes": rejected.len(),
                "chunk_stats": stats,
            }),
        );

        info!(
            "Fix process complete: {} applied, {} suggested, {} rejected, {} errors remaining",
            applied.len(),
            suggested.len(),
            rejected.len(),
            final_report.total_errors
        );

        FixResult {
            success: !applied.is_empty() || !suggested.is_empty(),
            dry_run: self.dry_run,
            original_errors: initial_report.total_errors,
            remaining_errors: final_report.total_errors,
            applied,
            suggested,
            rejected,
            chunks_processed: chunks.len(),
            chunks_failed,
            corrections,
            corrected_text,
            final_report,
            audit_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockCorrector;

    const BAD_HEADING: &str = "INT. OFFICE - DAY\n\nRain falls.\n\nint kitchen night\n\nSteam rises.";

    fn fix(start: usize, end: usize, revised: &str) -> AppliedFix {
        AppliedFix {
            start_line: start,
            end_line: end,
            original_lines: Vec::new(),
            revised_lines: vec![revised.to_string()],
            confidence: 0.9,
            issues: Vec::new(),
            diff: String::new(),
            timestamp: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fixScreenplay_withCleanInput_shouldNotCallCorrector() {
        let engine = FixEngine::new(MockCorrector::working());
        let result = engine.fix_screenplay("INT. OFFICE - DAY\n\nJOHN\nHello.").await;

        assert!(result.success);
        assert_eq!(result.original_errors, 0);
        assert_eq!(result.audit_log.operation, "no_fixes_needed");
        assert_eq!(engine.corrector().calls(), 0);
    }

    #[tokio::test]
    async fn test_fixScreenplay_shouldApplySafeFixAndRevalidate() {
        let engine = FixEngine::new(MockCorrector::working());
        let result = engine.fix_screenplay(BAD_HEADING).await;

        assert_eq!(result.original_errors, 1);
        assert_eq!(result.applied_fixes(), 1);
        assert_eq!(result.remaining_errors, 0);
        assert!(result.corrected_text.contains("\nINT. KITCHEN - NIGHT\n"));
        assert!(result.applied[0].diff.contains("-int kitchen night"));
        assert!(result.applied[0].diff.contains("+INT. KITCHEN - NIGHT"));
        assert_eq!(result.audit_log.model, "mock-corrector");
        assert_eq!(result.audit_log.run_id.len(), 36);
    }

    #[tokio::test]
    async fn test_fixScreenplay_dryRun_shouldLeaveTextUntouched() {
        let engine = FixEngine::new(MockCorrector::working()).with_dry_run(true);
        let result = engine.fix_screenplay(BAD_HEADING).await;

        assert_eq!(result.applied_fixes(), 1);
        assert_eq!(result.corrected_text, BAD_HEADING);
        assert_eq!(result.remaining_errors, result.original_errors);
        assert!(result.summary().contains("MODE: Dry Run"));
    }

    #[tokio::test]
    async fn test_fixScreenplay_withFailingCorrector_shouldDegradePerChunk() {
        let engine = FixEngine::new(MockCorrector::failing());
        let result = engine.fix_screenplay(BAD_HEADING).await;

        assert!(!result.success);
        assert_eq!(result.chunks_processed, 1);
        assert_eq!(result.chunks_failed, 1);
        assert_eq!(result.applied_fixes(), 0);
        assert_eq!(result.corrected_text, BAD_HEADING);
    }

    #[tokio::test]
    async fn test_fixScreenplay_withSlowCorrector_shouldTimeOut() {
        let engine = FixEngine::new(MockCorrector::slow(500)).with_chunk_timeout(Duration::from_millis(20));
        let result = engine.fix_screenplay(BAD_HEADING).await;
        assert_eq!(result.chunks_failed, 1);
    }

    #[tokio::test]
    async fn test_fixScreenplay_inventedWords_shouldBeRejected() {
        let engine = FixEngine::new(MockCorrector::working());
        let result = engine.fix_screenplay("INT. OFFICE - DAY\n\nJOHN\nidk, maybe.").await;

        assert_eq!(result.applied_fixes(), 0);
        assert_eq!(result.rejected_fixes(), 1);
        assert!(result.rejected[0].reason.contains("forbidden"));
        assert!(!result.success);
    }

    #[test]
    fn test_dropOverlaps_shouldKeepEarliest() {
        let (kept, dropped) = drop_overlaps(vec![fix(4, 6, "b"), fix(2, 4, "a"), fix(8, 8, "c")]);
        assert_eq!(kept.iter().map(|f| f.start_line).collect::<Vec<_>>(), vec![2, 8]);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].start_line, 4);
    }

    #[test]
    fn test_applyFixes_shouldWorkBottomUp() {
        let text = "a\nb\nc\nd";
        let mut grow = fix(0, 0, "A1");
        grow.revised_lines.push("A2".to_string());
        let fixes = vec![grow, fix(2, 3, "CD")];

        assert_eq!(apply_fixes(text, &fixes), "A1\nA2\nb\nCD");
    }

    #[test]
    fn test_summary_shouldReportImprovement() {
        let engine_result = FixResult {
            success: true,
            dry_run: false,
            original_errors: 4,
            remaining_errors: 1,
            applied: vec![fix(0, 0, "x")],
            suggested: Vec::new(),
            rejected: Vec::new(),
            chunks_processed: 2,
            chunks_failed: 0,
            corrections: Vec::new(),
            corrected_text: String::new(),
            final_report: ValidationReport::new(0, Vec::new()),
            audit_log: AuditLog {
                operation: "fix_complete".to_string(),
                run_id: String::new(),
                timestamp: String::new(),
                model: "m".to_string(),
                dry_run: false,
                strict_validation: false,
                data: json!({}),
            },
        };

        let summary = engine_result.summary();
        assert!(summary.contains("SCREENPLAY FIX SUMMARY"));
        assert!(summary.contains("Improvement: 3 errors fixed (75.0%)"));
        assert!(summary.contains("Status: SUCCESS"));
        assert_eq!(engine_result.audit_json()["summary"]["applied_fixes"], 1);
    }
}
