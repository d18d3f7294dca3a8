/*!
 * Tests for file utility functions
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use dualsub::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "test_file_exists.tmp",
        "test content",
    )?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for missing files and for directories
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() -> Result<()> {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));

    let temp_dir = common::create_temp_dir()?;
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("nested").join("test_subdir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.exists());
    assert!(test_subdir.is_dir());

    Ok(())
}

/// Test that read_to_string returns file content correctly
#[test]
fn test_read_to_string_withValidFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "content.txt",
        "some subtitle text",
    )?;

    let content = FileManager::read_to_string(&test_file)?;
    assert_eq!(content, "some subtitle text");

    Ok(())
}

/// Test that read_to_string fails for missing files
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("definitely_missing.srt").is_err());
}

/// Test default output path derivation
#[test]
fn test_derive_output_path_withSrtFile_shouldAppendSuffix() {
    let output = FileManager::derive_output_path(Path::new("/tmp/movies/movie.srt"));
    assert_eq!(output, PathBuf::from("/tmp/movies/movie_translated.srt"));
}

/// Test output path derivation keeps extra dots in the stem
#[test]
fn test_derive_output_path_withDottedName_shouldKeepStem() {
    let output = FileManager::derive_output_path(Path::new("show.s01e02.en.srt"));
    assert_eq!(output, PathBuf::from("show.s01e02.en_translated.srt"));
}

/// Test output path derivation falls back to the srt extension
#[test]
fn test_derive_output_path_withoutExtension_shouldUseSrt() {
    let output = FileManager::derive_output_path(Path::new("subtitles"));
    assert_eq!(output, PathBuf::from("subtitles_translated.srt"));
}
