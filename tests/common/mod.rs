/*!
 * Common test utilities for the dualsub test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use dualsub::SubtitleEntry;

/// Three-entry SRT document shared across tests
pub const SAMPLE_SRT: &str = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Builds an SRT document with `count` numbered entries
pub fn build_srt(count: usize) -> String {
    let mut content = String::new();
    for i in 0..count {
        let start = i as u64 * 2_000;
        let end = start + 1_500;
        content.push_str(&format!(
            "{}\n{} --> {}\nLine number {}\n\n",
            i + 1,
            SubtitleEntry::format_timestamp(start),
            SubtitleEntry::format_timestamp(end),
            i + 1
        ));
    }
    content
}
