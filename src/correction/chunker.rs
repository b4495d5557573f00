/*!
 * Groups validation findings into chunks for the corrector.
 *
 * Findings close to each other share a chunk. Each chunk gets a few lines of
 * context and is stretched to the nearest natural boundary (scene heading,
 * transition or character cue) so the corrector sees whole blocks.
 */

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use crate::screenplay::{ElementKind, ScreenplayElement};
use crate::validation::ValidationFinding;

/// A contiguous range of cleaned-text lines with the findings inside it
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// First line, 0-based
    pub start_line: usize,
    /// Last line, 0-based and inclusive
    pub end_line: usize,
    pub lines: Vec<String>,
    pub findings: Vec<ValidationFinding>,
    /// Elements whose source line falls inside the range
    pub elements: Vec<ScreenplayElement>,
}

impl Chunk {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Short codes of the findings, in finding order
    pub fn error_codes(&self) -> Vec<&'static str> {
        self.findings.iter().map(|f| f.error_code.code()).collect()
    }
}

/// Aggregate numbers over a set of chunks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChunkStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_errors: usize,
    pub avg_chunk_size: f64,
    pub error_types: BTreeMap<String, usize>,
}

/// Builds chunks from a validation report
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationChunker;

impl ValidationChunker {
    /// Findings at most this many lines apart share a chunk
    pub const GROUP_DISTANCE: usize = 8;
    pub const CONTEXT_LINES: usize = 3;
    /// How far to look for a natural boundary
    pub const BOUNDARY_SEARCH: usize = 5;
    pub const MAX_CHUNK_SIZE: usize = 60;

    pub fn new() -> Self {
        Self
    }

    /// Build one chunk per group of nearby findings.
    pub fn create_chunks(
        &self,
        elements: &[ScreenplayElement],
        findings: &[ValidationFinding],
        lines: &[&str],
    ) -> Vec<Chunk> {
        if findings.is_empty() || lines.is_empty() {
            return Vec::new();
        }

        Self::group_by_proximity(findings)
            .into_iter()
            .map(|group| Self::chunk_for_group(group, elements, lines))
            .collect()
    }

    fn group_by_proximity(findings: &[ValidationFinding]) -> Vec<Vec<ValidationFinding>> {
        let mut sorted = findings.to_vec();
        sorted.sort_by_key(|f| f.source_line);

        let mut groups: Vec<Vec<ValidationFinding>> = Vec::new();
        for finding in sorted {
            match groups.last_mut() {
                Some(group)
                    if group
                        .last()
                        .is_some_and(|last| finding.source_line - last.source_line <= Self::GROUP_DISTANCE) =>
                {
                    group.push(finding)
                }
                _ => groups.push(vec![finding]),
            }
        }
        groups
    }

    fn chunk_for_group(
        group: Vec<ValidationFinding>,
        elements: &[ScreenplayElement],
        lines: &[&str],
    ) -> Chunk {
        let last_index = lines.len() - 1;
        // Source lines are 1-based
        let first = group.iter().map(|f| f.source_line).min().unwrap_or(1).saturating_sub(1).min(last_index);
        let last = group.iter().map(|f| f.source_line).max().unwrap_or(1).saturating_sub(1).min(last_index);

        let mut start = first.saturating_sub(Self::CONTEXT_LINES);
        let mut end = (last + Self::CONTEXT_LINES).min(last_index);

        start = Self::boundary_start(start, elements);
        end = Self::boundary_end(end, elements).min(last_index);

        if end - start + 1 > Self::MAX_CHUNK_SIZE {
            let center = (first + last) / 2;
            start = center.saturating_sub(Self::MAX_CHUNK_SIZE / 2);
            end = (start + Self::MAX_CHUNK_SIZE - 1).min(last_index);
        }

        debug!("Chunk lines {}-{} for {} finding(s)", start + 1, end + 1, group.len());

        Chunk {
            start_line: start,
            end_line: end,
            lines: lines[start..=end].iter().map(|l| l.to_string()).collect(),
            findings: group,
            elements: elements
                .iter()
                .filter(|e| (start..=end).contains(&(e.source_line.saturating_sub(1))))
                .cloned()
                .collect(),
        }
    }

    fn is_boundary(kind: ElementKind) -> bool {
        matches!(kind, ElementKind::SceneHeading | ElementKind::Transition) || kind.is_character_cue()
    }

    /// Nearest boundary element within the search window before `start`
    fn boundary_start(start: usize, elements: &[ScreenplayElement]) -> usize {
        let floor = start.saturating_sub(Self::BOUNDARY_SEARCH);
        elements
            .iter()
            .rev()
            .map(|e| (e.source_line.saturating_sub(1), e.kind))
            .filter(|(index, _)| *index < start && *index >= floor)
            .find(|(_, kind)| Self::is_boundary(*kind))
            .map_or(start, |(index, _)| index)
    }

    /// Line just before the next boundary element within the search window
    fn boundary_end(end: usize, elements: &[ScreenplayElement]) -> usize {
        let ceiling = end + Self::BOUNDARY_SEARCH;
        elements
            .iter()
            .map(|e| (e.source_line.saturating_sub(1), e.kind))
            .filter(|(index, _)| *index > end && *index <= ceiling)
            .find(|(_, kind)| Self::is_boundary(*kind))
            .map_or(end, |(index, _)| index - 1)
    }

    /// Drop chunks not worth sending: empty, oversized, without findings,
    /// or made only of blank lines.
    pub fn validate_chunks(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        chunks
            .into_iter()
            .filter(|chunk| {
                !chunk.lines.is_empty()
                    && chunk.lines.len() <= Self::MAX_CHUNK_SIZE
                    && !chunk.findings.is_empty()
                    && chunk.lines.iter().any(|l| !l.trim().is_empty())
            })
            .collect()
    }

    /// One-line description of a chunk
    pub fn summary(&self, chunk: &Chunk) -> String {
        let kinds: BTreeSet<&str> = chunk.elements.iter().map(|e| e.kind.name()).collect();
        format!(
            "Lines {}-{}: {} errors ({}), elements: {}",
            chunk.start_line + 1,
            chunk.end_line + 1,
            chunk.findings.len(),
            chunk.error_codes().join(", "),
            kinds.into_iter().collect::<Vec<_>>().join(", ")
        )
    }

    pub fn stats(&self, chunks: &[Chunk]) -> ChunkStats {
        if chunks.is_empty() {
            return ChunkStats::default();
        }

        let total_lines: usize = chunks.iter().map(|c| c.lines.len()).sum();
        let mut error_types = BTreeMap::new();
        for finding in chunks.iter().flat_map(|c| &c.findings) {
            *error_types.entry(finding.error_code.name().to_string()).or_insert(0) += 1;
        }

        ChunkStats {
            total_chunks: chunks.len(),
            total_lines,
            total_errors: chunks.iter().map(|c| c.findings.len()).sum(),
            avg_chunk_size: total_lines as f64 / chunks.len() as f64,
            error_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screenplay::ScreenplayParser;
    use crate::validation::ValidationService;

    fn chunks_for(text: &str) -> (Vec<Chunk>, usize) {
        let elements = ScreenplayParser::new().parse(text);
        let report = ValidationService::new().validate(&elements);
        let lines: Vec<&str> = text.split('\n').collect();
        let chunker = ValidationChunker::new();
        let chunks = chunker.validate_chunks(chunker.create_chunks(&elements, &report.findings, &lines));
        (chunks, report.total_errors)
    }

    #[test]
    fn test_createChunks_withNoFindings_shouldBeEmpty() {
        let (chunks, errors) = chunks_for("INT. OFFICE - DAY\n\nJOHN\nHello.");
        assert_eq!(errors, 0);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_createChunks_nearbyFindings_shouldShareChunk() {
        let text = "INT. OFFICE - DAY\n\nJohn walks in. [TODO: fix blocking]\n\nJOHN\nidk what to say.\n\nMARY\nlol.";
        let (chunks, errors) = chunks_for(text);

        assert_eq!(errors, 3);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].findings.len(), errors);
        assert_eq!(chunks[0].start_line, 0);
    }

    #[test]
    fn test_createChunks_distantFindings_shouldSplit() {
        let mut text = String::from("INT. OFFICE - DAY\n\nJOHN\nidk.\n");
        for i in 0..20 {
            text.push_str(&format!("\nAction line number {}.", i));
        }
        text.push_str("\n\nMARY\nlol.");

        let (chunks, _) = chunks_for(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].end_line < chunks[1].start_line);
    }

    #[test]
    fn test_createChunks_shouldExtendBackToCharacterCue() {
        // Finding on line 9; context starts at index 5, cue sits at index 4
        let text = "INT. OFFICE - DAY\n\nRain.\n\nJOHN\nOne.\nTwo.\nThree.\nidk.";
        let elements = ScreenplayParser::new().parse(text);
        let report = ValidationService::new().validate(&elements);
        let lines: Vec<&str> = text.split('\n').collect();
        let chunks = ValidationChunker::new().create_chunks(&elements, &report.findings, &lines);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 4);
        assert_eq!(chunks[0].lines[0], "JOHN");
        assert_eq!(chunks[0].end_line, 8);
    }

    #[test]
    fn test_chunkForGroup_shouldCapSize() {
        let lines: Vec<String> = (0..200).map(|i| format!("line {}", i)).collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let elements: Vec<ScreenplayElement> = lines
            .iter()
            .enumerate()
            .map(|(i, l)| ScreenplayElement::new(ElementKind::Action, l.as_str(), i + 1))
            .collect();
        let findings: Vec<ValidationFinding> = (10..150)
            .step_by(5)
            .map(|i| {
                ValidationFinding::new(&elements[i], crate::validation::ErrorCode::RedundantContent, "dup", 0.7)
            })
            .collect();

        let chunks = ValidationChunker::new().create_chunks(&elements, &findings, &line_refs);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].lines.len(), ValidationChunker::MAX_CHUNK_SIZE);
    }

    #[test]
    fn test_summaryAndStats_shouldDescribeChunks() {
        let (chunks, errors) = chunks_for("INT. OFFICE - DAY\n\nJOHN\nidk.");
        let chunker = ValidationChunker::new();

        let summary = chunker.summary(&chunks[0]);
        assert!(summary.starts_with("Lines 1-"));
        assert!(summary.contains("(E8)"));

        let stats = chunker.stats(&chunks);
        assert_eq!(stats.total_chunks, 1);
        assert_eq!(stats.total_errors, errors);
        assert_eq!(stats.error_types.get("CASUAL_LANGUAGE"), Some(&1));
        assert_eq!(chunker.stats(&[]), ChunkStats::default());
    }
}
