/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use screenplay_formatter::file_utils::FileManager;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "draft.txt", common::CLEAN_SCREENPLAY)?;
    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_siblingPath_shouldKeepDirectory() {
    let path = FileManager::sibling_path(Path::new("/scripts/draft.txt"), "_fixed", "txt");
    assert_eq!(path, Path::new("/scripts/draft_fixed.txt"));
}

#[test]
fn test_readScreenplay_withWindowsLineEndings_shouldParseTheSame() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let windows = common::CLEAN_SCREENPLAY.replace('\n', "\r\n");
    let path = common::create_test_file(temp_dir.path(), "draft.txt", &format!("\u{feff}{}", windows))?;

    let content = FileManager::read_screenplay(&path)?;
    assert_eq!(content, common::CLEAN_SCREENPLAY);
    Ok(())
}

#[test]
fn test_readScreenplay_withMissingFile_shouldFail() {
    assert!(FileManager::read_screenplay("definitely_missing_draft.txt").is_err());
}

#[test]
fn test_writeToFile_shouldCreateNestedDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("script.txt");
    FileManager::write_to_file(&path, "FADE IN:")?;
    assert_eq!(FileManager::read_to_string(&path)?, "FADE IN:");
    Ok(())
}
