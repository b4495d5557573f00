/*!
 * Output renderers.
 *
 * Renderers treat `ElementKind` as closed but open-ended: kinds they have
 * no layout for are rendered as action.
 */

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::file_utils::FileManager;
use crate::screenplay::ScreenplayElement;

pub mod text;

pub use text::{TextLayout, TextRenderer};

/// Turns a parsed screenplay into an output document
pub trait Renderer {
    /// Render to a string
    fn render(&self, elements: &[ScreenplayElement]) -> String;

    /// Render and write to `path`
    fn write_to(&self, elements: &[ScreenplayElement], path: &Path) -> Result<()> {
        let output = self.render(elements);
        FileManager::write_to_file(path, &output)?;
        info!("Wrote {} elements to {:?}", elements.len(), path);
        Ok(())
    }
}
