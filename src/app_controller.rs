use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::gemini::Gemini;
use crate::providers::Provider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::{BatchPlan, PipelineOptions, ProgressWriter, TranslationPipeline};
use indicatif::{ProgressBar, ProgressStyle};

// @module: Application controller for subtitle translation runs

/// Options for one translate run, mirroring the CLI arguments
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// SRT file to translate
    pub input_path: PathBuf,

    /// Output path; derived from the input when not set
    pub output_path: Option<PathBuf>,

    /// Target language name or ISO 639 code
    pub target_language: String,

    /// Maximum entries per request
    pub batch_size: usize,

    /// 1-based entry number to start from
    pub start_from: usize,

    /// Optional 1-based entry number to stop after
    pub end_at: Option<usize>,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the main workflow: load, translate batch by batch, save after each batch
    pub async fn run(&self, options: RunOptions) -> Result<()> {
        if !FileManager::file_exists(&options.input_path) {
            return Err(anyhow::anyhow!(
                "Input file does not exist: {:?}",
                options.input_path
            ));
        }

        let output_path = options
            .output_path
            .clone()
            .unwrap_or_else(|| FileManager::derive_output_path(&options.input_path));

        // An unrecognized language still goes to the model verbatim
        let target_language = match language_utils::resolve_language_name(&options.target_language)
        {
            Ok(name) => name,
            Err(e) => {
                warn!("{}; passing it to the model as-is", e);
                options.target_language.clone()
            }
        };

        let mut subtitles = SubtitleCollection::open(&options.input_path)?;
        info!(
            "Loaded {} subtitle entries from {}",
            subtitles.entries.len(),
            subtitles.source_file.display()
        );

        let plan = BatchPlan::new(
            subtitles.entries.len(),
            options.batch_size,
            options.start_from,
            options.end_at,
        )?;
        let total_batches = plan.batch_count();

        let translation = &self.config.translation;
        let pacing = translation.request_interval();
        if total_batches > 1 && !pacing.is_zero() {
            let waiting = pacing * (total_batches - 1) as u32;
            info!(
                "Planned {} batches of up to {} entries; rate limiting adds about {}s of waiting",
                total_batches,
                options.batch_size,
                waiting.as_secs()
            );
        } else {
            info!(
                "Planned {} batches of up to {} entries",
                total_batches, options.batch_size
            );
        }

        let provider = Gemini::from_config(translation);
        info!(
            "🚀 {}: {} - {} → {}",
            self.config.app_name,
            provider.name(),
            provider.model(),
            target_language
        );
        info!("Translating, please wait…");

        let pipeline = TranslationPipeline::new(
            provider,
            PipelineOptions {
                target_language,
                retry_count: translation.retry_count,
                retry_delay: translation.retry_delay(),
                request_interval: translation.request_interval(),
            },
        );
        let writer = ProgressWriter::new(&output_path);

        // Create a progress bar for batch tracking
        let progress_bar = ProgressBar::new(total_batches as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let report = pipeline
            .run(&mut subtitles, plan, &writer, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await?;

        // Clear the bar before the closing log lines
        progress_bar.finish_and_clear();

        if let Some(stop) = &report.quota_stop {
            warn!("Run stopped early: {}", stop.message);
            info!(
                "Translated entries so far are saved in {}. Rerun with --start-from {} after the quota resets.",
                writer.path().display(),
                stop.resume_from
            );
        }

        for line in report.summary().lines() {
            info!("{}", line);
        }
        if report.quota_stop.is_none() {
            info!("Success: {}", writer.path().display());
        }

        Ok(())
    }

    /// List models on the configured endpoint that can translate
    pub async fn list_models(&self) -> Result<()> {
        let provider = Gemini::from_config(&self.config.translation);
        let models = provider.list_models().await?;

        let mut usable = 0;
        for model in &models {
            if !model.supports_generation() {
                continue;
            }
            usable += 1;

            let name = model.name.strip_prefix("models/").unwrap_or(&model.name);
            if model.display_name.is_empty() {
                println!("{}", name);
            } else {
                println!("{:<40} {}", name, model.display_name);
            }
        }

        info!(
            "{} of {} models support content generation",
            usable,
            models.len()
        );
        Ok(())
    }
}
