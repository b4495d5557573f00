/*!
 * Validation service that runs the rule registry.
 *
 * Each rule is an independent function over the element sequence. The
 * service runs every enabled rule and unions the findings into a report;
 * no rule suppresses another.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::screenplay::ScreenplayElement;

use super::characters::check_character_names;
use super::content::{
    check_casual_language, check_meta_comments, check_parenthetical_action, check_redundant_content,
};
use super::findings::{ErrorCode, ValidationFinding, ValidationReport};
use super::structure::{
    check_character_caps, check_dialogue_placement, check_parenthetical_placement,
    check_parenthetical_shape, check_scene_headings, check_transitions,
};

/// Configuration for the validation service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Stricter checking. Accepted by every rule set; the baseline rules
    /// behave the same either way.
    #[serde(default)]
    pub strict: bool,

    /// Rules to skip, by short code (`E8`) or name (`CASUAL_LANGUAGE`)
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl ValidationConfig {
    pub fn strict(strict: bool) -> Self {
        Self { strict, ..Default::default() }
    }

    fn is_disabled(&self, code: ErrorCode) -> bool {
        self.disabled_rules.iter().any(|r| ErrorCode::parse(r) == Some(code))
    }
}

/// Signature shared by all validation rules
pub type RuleFn = fn(&[ScreenplayElement]) -> Vec<ValidationFinding>;

/// A registered rule
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub code: ErrorCode,
    pub check: RuleFn,
}

/// The baseline rule set, in report order
pub fn default_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule { code: ErrorCode::InvalidSceneHeading, check: check_scene_headings },
        ValidationRule { code: ErrorCode::CharacterNotCaps, check: check_character_caps },
        ValidationRule { code: ErrorCode::OrphanedDialogue, check: check_dialogue_placement },
        ValidationRule { code: ErrorCode::MalformedParenthetical, check: check_parenthetical_shape },
        ValidationRule { code: ErrorCode::OrphanedParenthetical, check: check_parenthetical_placement },
        ValidationRule { code: ErrorCode::NonStandardTransition, check: check_transitions },
        ValidationRule { code: ErrorCode::MetaCommentPresent, check: check_meta_comments },
        ValidationRule { code: ErrorCode::CasualLanguage, check: check_casual_language },
        ValidationRule { code: ErrorCode::CharacterNameInconsistency, check: check_character_names },
        ValidationRule { code: ErrorCode::RedundantContent, check: check_redundant_content },
        ValidationRule { code: ErrorCode::MisplacedActionInParenthetical, check: check_parenthetical_action },
    ]
}

/// Validation service for parsed screenplays
#[derive(Debug, Clone)]
pub struct ValidationService {
    config: ValidationConfig,
    rules: Vec<ValidationRule>,
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationService {
    /// Create a new validation service with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a new validation service with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Register an additional rule, run after the built-in ones
    pub fn add_rule(&mut self, rule: ValidationRule) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Codes of the rules that will run
    pub fn enabled_rules(&self) -> Vec<ErrorCode> {
        self.rules
            .iter()
            .filter(|r| !self.config.is_disabled(r.code))
            .map(|r| r.code)
            .collect()
    }

    /// Validate a parsed screenplay.
    pub fn validate(&self, elements: &[ScreenplayElement]) -> ValidationReport {
        if self.config.strict {
            debug!("Strict validation requested");
        }

        let mut findings = Vec::new();
        for rule in &self.rules {
            if self.config.is_disabled(rule.code) {
                debug!("Skipping disabled rule {}", rule.code.name());
                continue;
            }
            let found = (rule.check)(elements);
            if !found.is_empty() {
                debug!("Rule {} produced {} finding(s)", rule.code.name(), found.len());
            }
            findings.extend(found);
        }

        let report = ValidationReport::new(elements.len(), findings);
        info!("{}", report.summary());
        report
    }
}
