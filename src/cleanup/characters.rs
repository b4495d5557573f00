/*!
 * Character name unification.
 *
 * Collects the spellings used for each speaker, merges names that look like
 * short and long forms of one another (JESS / JESSICA) and rewrites cues to
 * a single canonical spelling.
 */

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};

use crate::screenplay::patterns::{is_all_caps, TRAILING_EXTENSION_REGEX};
use crate::screenplay::ScreenplayElement;

/// Minimum number of distinct shared letters for two names to merge
const MIN_SHARED_LETTERS: usize = 3;

/// All spellings found for one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterVariant {
    pub canonical: String,
    pub variants: BTreeSet<String>,
    pub occurrences: usize,
    pub line_numbers: Vec<usize>,
}

impl CharacterVariant {
    pub fn is_inconsistent(&self) -> bool {
        self.variants.len() > 1
    }
}

/// Cue text without a trailing parenthesised extension
pub fn extract_base_name(cue: &str) -> String {
    TRAILING_EXTENSION_REGEX.replace(cue, "").trim().to_string()
}

/// The trailing extension of a cue, with a leading space, or empty
pub fn extract_extension(cue: &str) -> String {
    match TRAILING_EXTENSION_REGEX.find(cue) {
        Some(m) => format!(" {}", m.as_str().trim()),
        None => String::new(),
    }
}

fn shared_letters(a: &str, b: &str) -> usize {
    let a: BTreeSet<char> = a.chars().filter(|c| c.is_alphabetic()).collect();
    let b: BTreeSet<char> = b.chars().filter(|c| c.is_alphabetic()).collect();
    a.intersection(&b).count()
}

fn related(a: &str, b: &str) -> bool {
    a != b && (a.contains(b) || b.contains(a)) && shared_letters(a, b) >= MIN_SHARED_LETTERS
}

/// Longest spelling first, all-caps preferred, ties alphabetical
fn canonical_form(variants: &BTreeSet<String>) -> String {
    let mut sorted: Vec<&String> = variants.iter().collect();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

    sorted
        .iter()
        .find(|v| is_all_caps(v))
        .or_else(|| sorted.first())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Unifies character name spellings across a screenplay
#[derive(Debug, Default)]
pub struct CharacterNameUnifier {
    character_map: BTreeMap<String, CharacterVariant>,
}

impl CharacterNameUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group cues by name and merge related names.
    pub fn analyze(&mut self, elements: &[ScreenplayElement]) -> &BTreeMap<String, CharacterVariant> {
        // (upper-cased name, [(line, literal)]) in first-seen order
        let mut instances: Vec<(String, Vec<(usize, String)>)> = Vec::new();
        for element in elements.iter().filter(|e| e.kind.is_character_cue()) {
            let base = extract_base_name(&element.text);
            if base.is_empty() {
                continue;
            }
            let key = base.to_uppercase();
            match instances.iter_mut().find(|(name, _)| *name == key) {
                Some((_, list)) => list.push((element.source_line, base)),
                None => instances.push((key, vec![(element.source_line, base)])),
            }
        }

        self.character_map.clear();
        let mut processed: BTreeSet<String> = BTreeSet::new();

        for (name, list) in &instances {
            if processed.contains(name) {
                continue;
            }

            let mut variants: BTreeSet<String> = list.iter().map(|(_, form)| form.clone()).collect();
            let mut line_numbers: Vec<usize> = list.iter().map(|(line, _)| *line).collect();

            for (other, other_list) in &instances {
                if processed.contains(other) || !related(name, other) {
                    continue;
                }
                debug!("Merging character '{}' into '{}'", other, name);
                variants.extend(other_list.iter().map(|(_, form)| form.clone()));
                line_numbers.extend(other_list.iter().map(|(line, _)| *line));
                processed.insert(other.clone());
            }
            processed.insert(name.clone());

            line_numbers.sort_unstable();
            let canonical = canonical_form(&variants);
            self.character_map.insert(
                canonical.clone(),
                CharacterVariant {
                    canonical,
                    occurrences: line_numbers.len(),
                    variants,
                    line_numbers,
                },
            );
        }

        info!(
            "Found {} character(s), {} with inconsistent naming",
            self.character_map.len(),
            self.inconsistent().len()
        );
        &self.character_map
    }

    /// Rewrite every cue to its canonical name, keeping extensions.
    pub fn unify(&mut self, elements: &[ScreenplayElement]) -> Vec<ScreenplayElement> {
        if self.character_map.is_empty() {
            self.analyze(elements);
        }

        let lookup: HashMap<String, &str> = self
            .character_map
            .values()
            .flat_map(|cv| cv.variants.iter().map(move |v| (v.to_uppercase(), cv.canonical.as_str())))
            .collect();

        elements
            .iter()
            .map(|element| {
                if !element.kind.is_character_cue() {
                    return element.clone();
                }
                let base = extract_base_name(&element.text);
                if base.is_empty() {
                    return element.clone();
                }
                let upper = base.to_uppercase();
                let canonical = lookup.get(&upper).map(|c| c.to_string()).unwrap_or(upper);
                let mut unified = element.clone();
                unified.text = format!("{}{}", canonical, extract_extension(&element.text));
                unified
            })
            .collect()
    }

    pub fn characters(&self) -> &BTreeMap<String, CharacterVariant> {
        &self.character_map
    }

    /// Characters spelled more than one way
    pub fn inconsistent(&self) -> Vec<&CharacterVariant> {
        self.character_map.values().filter(|cv| cv.is_inconsistent()).collect()
    }

    /// Human-readable summary of the analysis
    pub fn report(&self) -> String {
        if self.character_map.is_empty() {
            return "No character analysis performed yet.".to_string();
        }

        let mut lines = vec!["Character Name Unification Report".to_string(), "=".repeat(50), String::new()];

        let mut sorted: Vec<&CharacterVariant> = self.character_map.values().collect();
        sorted.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.canonical.cmp(&b.canonical)));

        for cv in sorted {
            lines.push(format!("Character: {}", cv.canonical));
            lines.push(format!("  Occurrences: {}", cv.occurrences));
            if cv.is_inconsistent() {
                let variants: Vec<&str> = cv.variants.iter().map(String::as_str).collect();
                lines.push(format!("  Variants found: {}", variants.join(", ")));
                lines.push(format!("  Will unify to: {}", cv.canonical));
            } else {
                lines.push("  No variants (consistent naming)".to_string());
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}
