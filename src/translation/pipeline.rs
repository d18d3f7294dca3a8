/*!
 * Sequential translation pipeline with retry and quota handling.
 *
 * Batches are translated strictly one at a time. A failed request is retried
 * a fixed number of times with a fixed delay, then the batch is skipped and
 * the run moves on. A quota error stops the whole run immediately so the
 * remaining entries can be translated later from the partial output file.
 */

use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, error, warn};
use tokio::time::sleep;

use crate::errors::ProviderError;
use crate::providers::{Generation, Provider};
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::batch::{BatchPlan, BatchRange};
use crate::translation::codec;
use crate::translation::progress::ProgressWriter;

/// Pacing and retry settings for one run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Language the entries are translated into
    pub target_language: String,

    /// Total attempts per batch before it is skipped
    pub retry_count: u32,

    /// Fixed wait between attempts at the same batch
    pub retry_delay: Duration,

    /// Fixed pause between consecutive batch requests
    pub request_interval: Duration,
}

/// Where and why a run stopped early on quota exhaustion
#[derive(Debug, Clone)]
pub struct QuotaStop {
    /// 1-based entry number to pass as the resume position on the next run
    pub resume_from: usize,

    /// Provider error that triggered the stop
    pub message: String,
}

/// Outcome counters for a finished run
#[derive(Debug)]
pub struct RunReport {
    pub provider: String,
    pub model: String,
    pub batches_translated: usize,
    pub batches_skipped: usize,
    pub entries_translated: usize,
    pub skipped_ranges: Vec<BatchRange>,
    pub requests: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub elapsed: Duration,
    pub quota_stop: Option<QuotaStop>,
}

impl RunReport {
    fn new(provider: &str, model: &str) -> Self {
        RunReport {
            provider: provider.to_string(),
            model: model.to_string(),
            batches_translated: 0,
            batches_skipped: 0,
            entries_translated: 0,
            skipped_ranges: Vec::new(),
            requests: 0,
            prompt_tokens: 0,
            completion_tokens: 0,
            elapsed: Duration::ZERO,
            quota_stop: None,
        }
    }

    fn record_request(&mut self) {
        self.requests += 1;
    }

    fn record_batch(&mut self, merged: usize, generation: &Generation) {
        self.batches_translated += 1;
        self.entries_translated += merged;
        self.prompt_tokens += generation.prompt_tokens.unwrap_or(0);
        self.completion_tokens += generation.completion_tokens.unwrap_or(0);
    }

    fn record_skipped(&mut self, range: BatchRange) {
        self.batches_skipped += 1;
        self.skipped_ranges.push(range);
    }

    /// Human-readable closing summary for the log
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Provider: {} ({})", self.provider, self.model),
            format!(
                "Batches: {} translated, {} skipped ({} requests)",
                self.batches_translated, self.batches_skipped, self.requests
            ),
            format!("Entries translated: {}", self.entries_translated),
        ];

        if self.prompt_tokens > 0 || self.completion_tokens > 0 {
            lines.push(format!(
                "Tokens: {} prompt, {} completion",
                self.prompt_tokens, self.completion_tokens
            ));
        }

        if !self.skipped_ranges.is_empty() {
            let ranges: Vec<String> = self
                .skipped_ranges
                .iter()
                .map(|range| format!("{}-{}", range.start + 1, range.end))
                .collect();
            lines.push(format!("Untranslated entries: {}", ranges.join(", ")));
        }

        let mut elapsed_line = format!("Elapsed: {}", format_elapsed(self.elapsed));
        let elapsed_secs = self.elapsed.as_secs_f64();
        if self.requests > 0 && elapsed_secs >= 1.0 {
            elapsed_line.push_str(&format!(
                " ({:.1} requests/min)",
                self.requests as f64 * 60.0 / elapsed_secs
            ));
        }
        lines.push(elapsed_line);
        lines.join("\n")
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 60.0 {
        format!("{}m {:02}s", elapsed.as_secs() / 60, elapsed.as_secs() % 60)
    } else {
        format!("{:.1}s", secs)
    }
}

/// How one batch request ended after retries
enum RequestOutcome {
    /// The provider answered; the response may still decode poorly
    Completed(Generation),

    /// All attempts failed, the batch is skipped
    Abandoned { last_error: Option<ProviderError> },

    /// Quota exhausted, the run must stop
    QuotaExhausted(ProviderError),
}

/// Drives batches through a provider, one request at a time
#[derive(Debug)]
pub struct TranslationPipeline<P: Provider> {
    provider: P,
    options: PipelineOptions,
}

impl<P: Provider> TranslationPipeline<P> {
    pub fn new(provider: P, options: PipelineOptions) -> Self {
        TranslationPipeline { provider, options }
    }

    /// Send one batch prompt, retrying transient failures.
    ///
    /// Quota errors return immediately without consuming further attempts.
    async fn request_batch(&self, prompt: &str, report: &mut RunReport) -> RequestOutcome {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < self.options.retry_count {
            report.record_request();
            match self.provider.generate(prompt).await {
                Ok(generation) => return RequestOutcome::Completed(generation),
                Err(error) if error.is_quota() => return RequestOutcome::QuotaExhausted(error),
                Err(error) => {
                    attempt += 1;
                    if attempt < self.options.retry_count {
                        warn!(
                            "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                            attempt, self.options.retry_count, error, self.options.retry_delay
                        );
                        sleep(self.options.retry_delay).await;
                    }
                    last_error = Some(error);
                }
            }
        }

        RequestOutcome::Abandoned { last_error }
    }

    /// Translate every batch in the plan, committing progress after each one.
    ///
    /// `progress_callback` receives `(batches_done, total_batches)` after each
    /// batch is either translated or skipped. The collection is written to the
    /// output path after every successful batch and once more before
    /// returning, so at most one batch of work is ever lost.
    pub async fn run(
        &self,
        subtitles: &mut SubtitleCollection,
        plan: BatchPlan,
        writer: &ProgressWriter,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<RunReport> {
        let total_batches = plan.batch_count();
        let mut report = RunReport::new(self.provider.name(), self.provider.model());
        let started = Instant::now();

        for (batch_index, range) in plan.enumerate() {
            let prompt = codec::encode_batch(
                &subtitles.entries[range.start..range.end],
                &self.options.target_language,
            );
            debug!(
                "Translating batch {}/{} (entries {}-{})",
                batch_index + 1,
                total_batches,
                range.start + 1,
                range.end
            );

            match self.request_batch(&prompt, &mut report).await {
                RequestOutcome::Completed(generation) => {
                    let translations = codec::decode_response(&generation.text);
                    let merged = codec::merge_translations(
                        &mut subtitles.entries[range.start..range.end],
                        &translations,
                    );
                    writer.commit(subtitles)?;
                    report.record_batch(merged, &generation);
                    progress_callback(batch_index + 1, total_batches);

                    if batch_index + 1 < total_batches {
                        sleep(self.options.request_interval).await;
                    }
                }
                RequestOutcome::Abandoned { last_error } => {
                    let reason = last_error
                        .map(|error| error.to_string())
                        .unwrap_or_else(|| "no response".to_string());
                    error!(
                        "Giving up on entries {}-{} after {} attempts: {}",
                        range.start + 1,
                        range.end,
                        self.options.retry_count,
                        reason
                    );
                    report.record_skipped(range);
                    progress_callback(batch_index + 1, total_batches);
                }
                RequestOutcome::QuotaExhausted(error) => {
                    warn!("API quota exhausted, stopping the run: {}", error);
                    report.quota_stop = Some(QuotaStop {
                        resume_from: range.start + 1,
                        message: error.to_string(),
                    });
                    break;
                }
            }
        }

        writer.commit(subtitles)?;
        report.elapsed = started.elapsed();
        Ok(report)
    }
}
