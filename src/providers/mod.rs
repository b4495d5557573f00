/*!
 * Correction provider implementations.
 *
 * This module contains the clients that turn a chunk of a failing
 * screenplay into proposed fixes:
 * - OpenAI: OpenAI-compatible chat completions (OpenAI, LM Studio)
 * - Mock: scripted behaviors for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::correction::{Chunk, CorrectionResponse};
use crate::errors::ProviderError;

/// Common trait for all correction providers
///
/// This trait defines the interface the fix engine talks to, allowing
/// providers to be used interchangeably and keeping the engine testable
/// without network access.
#[async_trait]
pub trait Corrector: Send + Sync + Debug {
    /// Propose fixes for one chunk
    ///
    /// # Arguments
    /// * `chunk` - The lines, findings and elements to correct
    ///
    /// # Returns
    /// * `Result<CorrectionResponse, ProviderError>` - The proposed fixes or an error
    async fn correct(&self, chunk: &Chunk) -> Result<CorrectionResponse, ProviderError>;

    /// Identifier of the model behind this corrector
    fn model(&self) -> &str;
}

pub mod mock;
pub mod openai;

pub use mock::{MockBehavior, MockCorrector};
pub use openai::LlmCorrector;
