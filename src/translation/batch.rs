/*!
 * Batch planning over the subtitle entry list.
 *
 * A plan tiles the half-open window `[start_from-1, end_at)` with contiguous
 * index ranges of at most `batch_size` entries, in order, with no gaps or
 * overlaps. Plans are lazy and cheap to clone, so a consumer can count
 * batches up front and still iterate from the beginning.
 */

use crate::errors::TranslationError;

/// A half-open range of entry indices forming one translation batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRange {
    /// First entry index (0-based, inclusive)
    pub start: usize,

    /// One past the last entry index
    pub end: usize,
}

impl BatchRange {
    /// Number of entries in the range
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range selects nothing; a plan never yields such a range - used by tests
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Lazy sequence of batch ranges covering a resume window
#[derive(Debug, Clone)]
pub struct BatchPlan {
    next: usize,
    end: usize,
    batch_size: usize,
}

impl BatchPlan {
    /// Plan batches over an entry list of `total_count` entries.
    ///
    /// `start_from` is the 1-based position to resume from (default 1);
    /// `end_at` is an optional 1-based inclusive upper bound, clamped to
    /// `total_count`. Fails when the window selects nothing or `batch_size`
    /// is zero.
    pub fn new(
        total_count: usize,
        batch_size: usize,
        start_from: usize,
        end_at: Option<usize>,
    ) -> Result<Self, TranslationError> {
        if batch_size == 0 {
            return Err(TranslationError::InvalidRange(
                "batch size must be positive".to_string(),
            ));
        }

        let start = start_from.saturating_sub(1);
        let end = end_at.unwrap_or(total_count).min(total_count);
        if start >= end {
            return Err(TranslationError::InvalidRange(format!(
                "start_from {} selects no entries (upper bound {})",
                start_from, end
            )));
        }

        Ok(BatchPlan {
            next: start,
            end,
            batch_size,
        })
    }

    /// Number of batches the plan will yield from its current position
    pub fn batch_count(&self) -> usize {
        (self.end - self.next).div_ceil(self.batch_size)
    }
}

impl Iterator for BatchPlan {
    type Item = BatchRange;

    fn next(&mut self) -> Option<BatchRange> {
        if self.next >= self.end {
            return None;
        }

        let start = self.next;
        self.next = (start + self.batch_size).min(self.end);
        Some(BatchRange {
            start,
            end: self.next,
        })
    }
}
