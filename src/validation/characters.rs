/*!
 * Character name consistency (E9).
 */

use std::collections::{BTreeMap, HashMap};

use crate::screenplay::element::base_character_name;
use crate::screenplay::ScreenplayElement;

use super::findings::{ErrorCode, ValidationFinding};

/// Literal spellings of one base name, in first-seen order, with counts
#[derive(Debug, Default)]
struct NameForms {
    forms: Vec<(String, usize)>,
}

impl NameForms {
    fn add(&mut self, literal: &str) {
        match self.forms.iter_mut().find(|(form, _)| form == literal) {
            Some((_, count)) => *count += 1,
            None => self.forms.push((literal.to_string(), 1)),
        }
    }

    /// Most frequent spelling; the earliest one wins ties
    fn dominant(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.forms {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(form, _)| form.as_str())
    }
}

/// E9: the same speaker spelled differently, or names that contain each other
pub fn check_character_names(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    let cues: Vec<(&ScreenplayElement, String)> = elements
        .iter()
        .filter(|e| e.kind.is_character_cue())
        .filter_map(|e| {
            let literal = base_character_name(&e.text);
            (!literal.is_empty()).then_some((e, literal))
        })
        .collect();

    let mut groups: BTreeMap<String, NameForms> = BTreeMap::new();
    let mut first_cue: HashMap<String, &ScreenplayElement> = HashMap::new();
    for (element, literal) in &cues {
        let key = literal.to_uppercase();
        groups.entry(key.clone()).or_default().add(literal);
        first_cue.entry(key).or_insert(*element);
    }

    let mut findings = Vec::new();

    for (element, literal) in &cues {
        let Some(forms) = groups.get(&literal.to_uppercase()) else {
            continue;
        };
        if forms.forms.len() < 2 {
            continue;
        }
        if let Some(dominant) = forms.dominant() {
            if dominant != literal.as_str() {
                let suggestion = element.text.replacen(literal.as_str(), dominant, 1);
                findings.push(
                    ValidationFinding::new(
                        element,
                        ErrorCode::CharacterNameInconsistency,
                        format!("Character '{}' is usually written '{}'", literal, dominant),
                        0.9,
                    )
                    .with_suggestion(Some(suggestion)),
                );
            }
        }
    }

    let names: Vec<&String> = groups.keys().collect();
    for (i, a) in names.iter().enumerate() {
        for b in names.iter().skip(i + 1) {
            let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
            if !longer.contains(shorter.as_str()) {
                continue;
            }
            if let Some(element) = first_cue.get(shorter.as_str()) {
                findings.push(ValidationFinding::new(
                    element,
                    ErrorCode::CharacterNameInconsistency,
                    format!("Possibly the same character: '{}' and '{}'", shorter, longer),
                    0.6,
                ));
            }
        }
    }

    findings
}
