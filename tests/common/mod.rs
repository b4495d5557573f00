/*!
 * Common test utilities for the screenplay formatter test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A short screenplay that passes validation
pub const CLEAN_SCREENPLAY: &str = "INT. COFFEE SHOP - DAY

John sips his coffee.

JOHN
(quietly)
This is good.

CUT TO:";

/// A draft with one broken scene heading and nothing else wrong
pub const BROKEN_HEADING_SCREENPLAY: &str = "INT. OFFICE - DAY

Rain falls.

int kitchen night

Steam rises.";

/// An exported draft with a preamble, a production note and two spellings of one name
pub const MESSY_SCREENPLAY: &str = "SUNSET PROJECT
Exported: 2024-03-01
====

INT. LAB - NIGHT

Dr. Vance paces. [NOTE: tighten this]

JESS
Then we go now.

JESSICA
(to Vance)
Ready?";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Installs a test logger; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
