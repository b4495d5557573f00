/*!
 * Validation findings and the aggregated report.
 */

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::screenplay::{ElementKind, ScreenplayElement};

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "E1")]
    InvalidSceneHeading,
    #[serde(rename = "E2")]
    CharacterNotCaps,
    #[serde(rename = "E3")]
    OrphanedDialogue,
    #[serde(rename = "E4")]
    MalformedParenthetical,
    #[serde(rename = "E5")]
    NonStandardTransition,
    #[serde(rename = "E6")]
    OrphanedParenthetical,
    #[serde(rename = "E7")]
    MetaCommentPresent,
    #[serde(rename = "E8")]
    CasualLanguage,
    #[serde(rename = "E9")]
    CharacterNameInconsistency,
    #[serde(rename = "E10")]
    RedundantContent,
    #[serde(rename = "E11")]
    MisplacedActionInParenthetical,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::InvalidSceneHeading,
        ErrorCode::CharacterNotCaps,
        ErrorCode::OrphanedDialogue,
        ErrorCode::MalformedParenthetical,
        ErrorCode::NonStandardTransition,
        ErrorCode::OrphanedParenthetical,
        ErrorCode::MetaCommentPresent,
        ErrorCode::CasualLanguage,
        ErrorCode::CharacterNameInconsistency,
        ErrorCode::RedundantContent,
        ErrorCode::MisplacedActionInParenthetical,
    ];

    /// Short code, e.g. `E1`
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSceneHeading => "E1",
            ErrorCode::CharacterNotCaps => "E2",
            ErrorCode::OrphanedDialogue => "E3",
            ErrorCode::MalformedParenthetical => "E4",
            ErrorCode::NonStandardTransition => "E5",
            ErrorCode::OrphanedParenthetical => "E6",
            ErrorCode::MetaCommentPresent => "E7",
            ErrorCode::CasualLanguage => "E8",
            ErrorCode::CharacterNameInconsistency => "E9",
            ErrorCode::RedundantContent => "E10",
            ErrorCode::MisplacedActionInParenthetical => "E11",
        }
    }

    /// Descriptive name used as the key of `errors_by_type`
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSceneHeading => "INVALID_SCENE_HEADING",
            ErrorCode::CharacterNotCaps => "CHARACTER_NOT_CAPS",
            ErrorCode::OrphanedDialogue => "ORPHANED_DIALOGUE",
            ErrorCode::MalformedParenthetical => "MALFORMED_PARENTHETICAL",
            ErrorCode::NonStandardTransition => "NON_STANDARD_TRANSITION",
            ErrorCode::OrphanedParenthetical => "ORPHANED_PARENTHETICAL",
            ErrorCode::MetaCommentPresent => "META_COMMENT_PRESENT",
            ErrorCode::CasualLanguage => "CASUAL_LANGUAGE",
            ErrorCode::CharacterNameInconsistency => "CHARACTER_NAME_INCONSISTENCY",
            ErrorCode::RedundantContent => "REDUNDANT_CONTENT",
            ErrorCode::MisplacedActionInParenthetical => "MISPLACED_ACTION_IN_PARENTHETICAL",
        }
    }

    /// Look up a code by its short form or its name
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(value) || code.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single rule violation. Findings describe; they never modify elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    #[serde(rename = "line_number")]
    pub source_line: usize,

    pub error_code: ErrorCode,

    pub message: String,

    #[serde(rename = "element_type")]
    pub element_kind: ElementKind,

    #[serde(rename = "content")]
    pub original_text: String,

    #[serde(rename = "suggestion")]
    pub suggested_fix: Option<String>,

    /// How mechanically safe the suggestion is, in [0, 1]
    pub confidence: f64,
}

impl ValidationFinding {
    pub fn new(element: &ScreenplayElement, error_code: ErrorCode, message: impl Into<String>, confidence: f64) -> Self {
        Self {
            source_line: element.source_line,
            error_code,
            message: message.into(),
            element_kind: element.kind,
            original_text: element.text.clone(),
            suggested_fix: None,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggested_fix = suggestion;
        self
    }
}

/// Result of validating a screenplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_lines: usize,
    pub total_errors: usize,
    pub errors_by_type: BTreeMap<String, usize>,
    #[serde(rename = "errors")]
    pub findings: Vec<ValidationFinding>,
    pub passed: bool,
}

impl ValidationReport {
    /// Assemble a report from the findings of all rules.
    pub fn new(total_lines: usize, findings: Vec<ValidationFinding>) -> Self {
        let mut errors_by_type = BTreeMap::new();
        for finding in &findings {
            *errors_by_type.entry(finding.error_code.name().to_string()).or_insert(0) += 1;
        }

        Self {
            total_lines,
            total_errors: findings.len(),
            errors_by_type,
            passed: findings.is_empty(),
            findings,
        }
    }

    pub fn count(&self, code: ErrorCode) -> usize {
        self.errors_by_type.get(code.name()).copied().unwrap_or(0)
    }

    /// Findings on a given source line
    pub fn findings_on_line(&self, line: usize) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(move |f| f.source_line == line)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        if self.passed {
            format!("Validation passed: {} lines, no errors", self.total_lines)
        } else {
            format!(
                "Validation failed: {} error(s) across {} lines ({} type(s))",
                self.total_errors,
                self.total_lines,
                self.errors_by_type.len()
            )
        }
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            rule.clone(),
            "SCREENPLAY VALIDATION REPORT".to_string(),
            rule,
            format!("Total Lines: {}", self.total_lines),
            format!("Total Errors: {}", self.total_errors),
            format!("Status: {}", if self.passed { "PASSED" } else { "FAILED" }),
            String::new(),
        ];

        if !self.errors_by_type.is_empty() {
            lines.push("Errors by Type:".to_string());
            for (name, count) in &self.errors_by_type {
                lines.push(format!("  {}: {}", name, count));
            }
            lines.push(String::new());
        }

        if !self.findings.is_empty() {
            lines.push("Detailed Errors:".to_string());
            lines.push("-".repeat(60));
            for finding in &self.findings {
                lines.push(format!(
                    "Line {}: {} - {} (confidence {:.2})",
                    finding.source_line, finding.error_code, finding.message, finding.confidence
                ));
                if let Some(suggestion) = &finding.suggested_fix {
                    lines.push(format!("  Suggestion: {}", suggestion));
                }
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }
}
