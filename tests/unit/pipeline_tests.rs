/*!
 * Tests for the sequential translation pipeline: retries, quota stops,
 * and per-batch persistence, driven by scripted providers.
 */

use std::time::Duration;
use anyhow::Result;
use dualsub::providers::mock::MockProvider;
use dualsub::subtitle_processor::SubtitleCollection;
use dualsub::translation::{BatchPlan, PipelineOptions, ProgressWriter, TranslationPipeline};
use crate::common;

/// Options with zero pacing so tests run instantly
fn fast_options() -> PipelineOptions {
    PipelineOptions {
        target_language: "Vietnamese".to_string(),
        retry_count: 3,
        retry_delay: Duration::ZERO,
        request_interval: Duration::ZERO,
    }
}

/// Loads `count` generated entries from a temp file and prepares an output writer
fn setup_run(count: usize) -> Result<(tempfile::TempDir, SubtitleCollection, ProgressWriter)> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "input.srt",
        &common::build_srt(count),
    )?;
    let subtitles = SubtitleCollection::open(&input)?;
    let writer = ProgressWriter::new(temp_dir.path().join("output.srt"));
    Ok((temp_dir, subtitles, writer))
}

/// Test a clean run translates every entry
#[tokio::test]
async fn test_pipeline_withEchoProvider_shouldMergeEveryEntry() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(5)?;
    let provider = MockProvider::echo();
    let pipeline = TranslationPipeline::new(provider.clone(), fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 2, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    assert_eq!(report.batches_translated, 3);
    assert_eq!(report.batches_skipped, 0);
    assert_eq!(report.entries_translated, 5);
    assert_eq!(report.requests, 3);
    assert_eq!(provider.request_count(), 3);
    assert!(report.quota_stop.is_none());
    for entry in &subtitles.entries {
        assert!(
            entry.text.contains("<font color=\"yellow\">[TRANSLATED]"),
            "entry {} missing translation",
            entry.seq_num
        );
    }
    Ok(())
}

/// Test transient failures retry up to the limit, then the batch is skipped
#[tokio::test]
async fn test_pipeline_withPersistentFailure_shouldSkipBatchAfterRetries() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(4)?;
    let provider = MockProvider::failing();
    let pipeline = TranslationPipeline::new(provider.clone(), fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 4, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    // Three attempts for the single batch, no more
    assert_eq!(provider.request_count(), 3);
    assert_eq!(report.batches_skipped, 1);
    assert_eq!(report.batches_translated, 0);
    assert_eq!(report.skipped_ranges.len(), 1);
    assert!(report.quota_stop.is_none());
    for entry in &subtitles.entries {
        assert!(!entry.text.contains("<font"));
    }

    // The run still leaves a usable file behind
    assert!(writer.path().exists());
    Ok(())
}

/// Test retries within a batch recover once the provider comes back
#[tokio::test]
async fn test_pipeline_withTransientFailures_shouldRecoverWithinBatch() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(3)?;
    let provider = MockProvider::fail_then_succeed(2);
    let pipeline = TranslationPipeline::new(provider.clone(), fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 3, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    // Two failures consumed two attempts, the third succeeded
    assert_eq!(provider.request_count(), 3);
    assert_eq!(report.batches_translated, 1);
    assert_eq!(report.batches_skipped, 0);
    assert_eq!(report.entries_translated, 3);
    Ok(())
}

/// Test a quota error stops the run immediately without retrying
#[tokio::test]
async fn test_pipeline_withQuotaError_shouldStopWithoutRetries() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(6)?;
    let provider = MockProvider::quota_limited();
    let pipeline = TranslationPipeline::new(provider.clone(), fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 2, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    // One request, no retry, no further batches
    assert_eq!(provider.request_count(), 1);
    assert_eq!(report.batches_translated, 0);
    assert_eq!(report.batches_skipped, 0);

    let stop = report.quota_stop.expect("run should report a quota stop");
    assert_eq!(stop.resume_from, 1);
    assert!(stop.message.contains("429"));
    Ok(())
}

/// Test a quota stop midway reports the first untranslated entry
#[tokio::test]
async fn test_pipeline_withQuotaMidway_shouldReportResumePosition() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(6)?;
    let provider = MockProvider::quota_after(2);
    let pipeline = TranslationPipeline::new(provider.clone(), fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 2, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    assert_eq!(report.batches_translated, 2);
    let stop = report.quota_stop.expect("run should report a quota stop");
    assert_eq!(stop.resume_from, 5);

    // Entries before the stop are translated, the rest untouched
    assert!(subtitles.entries[3].text.contains("<font"));
    assert!(!subtitles.entries[4].text.contains("<font"));
    Ok(())
}

/// Test untagged responses leave the batch unmerged but finish the run
#[tokio::test]
async fn test_pipeline_withUntaggedResponse_shouldLeaveEntriesUnchanged() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(2)?;
    let provider = MockProvider::untagged();
    let pipeline = TranslationPipeline::new(provider, fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 2, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    assert_eq!(report.batches_translated, 1);
    assert_eq!(report.entries_translated, 0);
    assert!(!subtitles.entries[0].text.contains("<font"));
    Ok(())
}

/// Test a short response translates the head and leaves the tail unchanged
#[tokio::test]
async fn test_pipeline_withMissingTags_shouldTranslateOnlyAnsweredEntries() -> Result<()> {
    let (_temp_dir, mut subtitles, writer) = setup_run(5)?;
    let provider = MockProvider::missing_tags(3);
    let pipeline = TranslationPipeline::new(provider, fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 5, 1, None)?;

    let report = pipeline.run(&mut subtitles, plan, &writer, |_, _| {}).await?;

    assert_eq!(report.entries_translated, 3);
    assert!(subtitles.entries[2].text.contains("<font"));
    assert_eq!(subtitles.entries[3].text, "Line number 4");
    assert_eq!(subtitles.entries[4].text, "Line number 5");
    Ok(())
}

/// Test the progress callback sees every processed batch
#[tokio::test]
async fn test_pipeline_progressCallback_shouldReportEachBatch() -> Result<()> {
    use std::sync::Mutex;

    let (_temp_dir, mut subtitles, writer) = setup_run(6)?;
    let provider = MockProvider::echo();
    let pipeline = TranslationPipeline::new(provider, fast_options());
    let plan = BatchPlan::new(subtitles.entries.len(), 2, 1, None)?;

    let seen = Mutex::new(Vec::new());
    pipeline
        .run(&mut subtitles, plan, &writer, |done, total| {
            seen.lock().unwrap().push((done, total));
        })
        .await?;

    assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    Ok(())
}
