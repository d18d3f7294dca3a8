/*!
 * Durable progress for long translation runs.
 *
 * The writer persists the entire entry list to the output path after every
 * successful batch, so an interrupted run loses at most one batch of work
 * and can resume from the last file on disk.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use crate::subtitle_processor::SubtitleCollection;

/// Writes the current state of a subtitle collection to a fixed output path
#[derive(Debug, Clone)]
pub struct ProgressWriter {
    output_path: PathBuf,
}

impl ProgressWriter {
    /// Create a writer targeting `output_path`
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        ProgressWriter {
            output_path: output_path.into(),
        }
    }

    /// Path the writer commits to
    pub fn path(&self) -> &Path {
        &self.output_path
    }

    /// Persist the full collection, translated and untranslated entries alike
    pub fn commit(&self, subtitles: &SubtitleCollection) -> Result<()> {
        subtitles.write_to_srt(&self.output_path)?;
        debug!(
            "Saved {} entries to {}",
            subtitles.entries.len(),
            self.output_path.display()
        );
        Ok(())
    }
}
