use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling path with a suffix added to the stem
    // @params: input_file, suffix, extension
    pub fn sibling_path<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = extension.trim_start_matches('.');

        let filename = format!("{}{}.{}", stem, suffix, extension);
        match input_file.parent() {
            Some(parent) => parent.join(filename),
            None => PathBuf::from(filename),
        }
    }

    /// Read a screenplay draft.
    ///
    /// Strips a UTF-8 byte order mark and normalises Windows line endings.
    /// Input that is not valid UTF-8 is an `AppError::File`.
    pub fn read_screenplay<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;

        let text = String::from_utf8(bytes)
            .map_err(|e| AppError::File(format!("{:?} is not valid UTF-8: {}", path, e)))?;

        Ok(text.trim_start_matches('\u{feff}').replace("\r\n", "\n"))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
