/*!
 * Mock corrector implementations for testing.
 *
 * This module provides a corrector that simulates different behaviors:
 * - `MockCorrector::working()` - Proposes the validator's own suggestions as fixes
 * - `MockCorrector::canned(..)` - Always returns the given response
 * - `MockCorrector::failing()` - Always fails with an error
 * - `MockCorrector::malformed()` - Returns a payload that does not parse
 */

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::correction::{Chunk, CorrectionResponse, FixSpan};
use crate::errors::ProviderError;
use crate::providers::Corrector;

/// Behavior mode for the mock corrector
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Turns every finding with a suggestion into a fix
    Working,
    /// Returns this response for every chunk
    Canned(CorrectionResponse),
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns a response that is not valid JSON
    Malformed,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock corrector for testing the fix workflow
#[derive(Debug, Clone)]
pub struct MockCorrector {
    behavior: MockBehavior,
    /// Shared with clones
    request_count: Arc<AtomicUsize>,
}

impl MockCorrector {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn canned(response: CorrectionResponse) -> Self {
        Self::new(MockBehavior::Canned(response))
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of `correct` calls so far
    pub fn calls(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// One fix per line that has a suggested repair; the first finding on
    /// a line wins.
    pub fn suggestions_as_fixes(chunk: &Chunk) -> CorrectionResponse {
        let mut seen = BTreeSet::new();
        let fixes: Vec<FixSpan> = chunk
            .findings
            .iter()
            .filter_map(|finding| {
                let suggestion = finding.suggested_fix.as_ref()?;
                let index = finding.source_line.checked_sub(1)?.checked_sub(chunk.start_line)?;
                let line = chunk.lines.get(index)?;
                if !seen.insert(index) {
                    return None;
                }
                Some(FixSpan {
                    start_line: index,
                    end_line: index,
                    original: vec![line.clone()],
                    revised: vec![suggestion.clone()],
                    issues: vec![finding.error_code.code().to_string()],
                    confidence: finding.confidence,
                })
            })
            .collect();

        let unchanged_lines = (0..chunk.lines.len()).filter(|i| !seen.contains(i)).collect();
        CorrectionResponse {
            unchanged_lines,
            fixes,
            ..CorrectionResponse::empty("mock-corrector", None)
        }
    }
}

#[async_trait]
impl Corrector for MockCorrector {
    async fn correct(&self, chunk: &Chunk) -> Result<CorrectionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(Self::suggestions_as_fixes(chunk)),

            MockBehavior::Canned(response) => Ok(response.clone()),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::suggestions_as_fixes(chunk))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Malformed => CorrectionResponse::from_json("Here are my fixes: {fixes: [oops"),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(Self::suggestions_as_fixes(chunk))
            }
        }
    }

    fn model(&self) -> &str {
        "mock-corrector"
    }
}
