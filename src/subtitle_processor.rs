use crate::file_utils::FileManager;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

// @module: Subtitle parsing and serialization

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Sequence number (1-based position in the file)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Display text; gains the translated line after a merge
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        text: String,
    ) -> Result<Self> {
        if end_time_ms <= start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_time_ms,
                start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds - used by tests
    #[allow(dead_code)]
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle entries loaded from one file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries, ordered and renumbered 1..=len
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Load a collection from an SRT file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Write the whole collection to an SRT file (UTF-8), overwriting it
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            FileManager::ensure_dir(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        // Parser state: the entry being assembled, if any
        let mut seq_num: Option<usize> = None;
        let mut times: Option<(u64, u64)> = None;
        let mut text = String::new();

        let mut entries = Vec::new();
        let mut line_count = 0;

        let mut finish_entry =
            |seq_num: &mut Option<usize>, times: &mut Option<(u64, u64)>, text: &mut String| {
                if let (Some(num), Some((start_ms, end_ms))) = (seq_num.take(), times.take()) {
                    match SubtitleEntry::new_validated(num, start_ms, end_ms, std::mem::take(text))
                    {
                        Ok(entry) => entries.push(entry),
                        Err(e) => warn!("Skipping invalid subtitle entry {}: {}", num, e),
                    }
                }
            };

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            // A blank line closes the entry under assembly once it has text
            if trimmed.is_empty() {
                if !text.is_empty() {
                    finish_entry(&mut seq_num, &mut times, &mut text);
                }
                continue;
            }

            // Sequence number opens a new entry
            if seq_num.is_none() && text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    seq_num = Some(num);
                    continue;
                }
            }

            // Timestamp line follows the sequence number
            if seq_num.is_some() && times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    times = Some((
                        Self::timestamp_from_captures(&caps, 1),
                        Self::timestamp_from_captures(&caps, 5),
                    ));
                    continue;
                }
            }

            // Everything else inside an entry is subtitle text
            if seq_num.is_some() && times.is_some() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(trimmed);
            } else {
                warn!(
                    "Unexpected text at line {} before sequence number or timestamp: {}",
                    line_count, trimmed
                );
            }
        }

        // Close the final entry if the file does not end with a blank line
        finish_entry(&mut seq_num, &mut times, &mut text);

        if entries.is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        // Sort by start time, then renumber so seq_num matches position
        entries.sort_by_key(|entry| entry.start_time_ms);

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }

    /// Pull one HH:MM:SS,mmm group out of a timestamp-line match
    fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> u64 {
        let component = |idx: usize| -> u64 {
            caps.get(start_idx + idx)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        (component(0) * 3600 + component(1) * 60 + component(2)) * 1000 + component(3)
    }
}
