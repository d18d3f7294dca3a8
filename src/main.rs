// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::{Controller, RunOptions};

mod app_config;
mod translation;
mod subtitle_processor;
mod file_utils;
mod app_controller;
mod language_utils;
mod providers;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT file into dual-language subtitles (default command)
    Translate(TranslateArgs),

    /// List models on the configured endpoint that support generation
    Models,

    /// Generate shell completions for dualsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// SRT subtitle file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path (defaults to <input>_translated.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language name or ISO 639 code (e.g. 'French', 'fr', 'fra')
    #[arg(short, long, default_value = "Vietnamese")]
    language: String,

    /// Maximum subtitle entries per request
    #[arg(short, long, default_value_t = 50)]
    batch_size: usize,

    /// 1-based entry number to resume from
    #[arg(long, default_value_t = 1)]
    start_from: usize,

    /// 1-based entry number to stop after (inclusive)
    #[arg(long)]
    end_at: Option<usize>,

    /// Model name to use for translation
    #[arg(short, long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dualsub - dual-language subtitle translation
///
/// Translates SRT subtitle files with Gemini, keeping each original line and
/// adding the translation underneath it.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(version = "0.1.0")]
#[command(about = "Translate SRT subtitles into dual-language subtitles")]
#[command(long_about = "dualsub translates every entry of an SRT file and writes a copy where each
entry keeps its original text with the translation underneath in a colored
font tag.

EXAMPLES:
    dualsub movie.srt                          # Translate to Vietnamese
    dualsub movie.srt -l French                # Pick another language
    dualsub movie.srt -o movie.vi.srt          # Choose the output path
    dualsub movie.srt -b 30 -m gemini-2.5-pro  # Smaller batches, other model
    dualsub movie.srt --start-from 51          # Resume from entry 51
    dualsub models                             # List available models
    dualsub completions bash > dualsub.bash    # Generate bash completions

RESUMING:
    Progress is saved to the output file after every batch. When a run stops
    on a quota error it logs the entry number to resume from; rerun with
    --start-from against the saved output to finish the remaining entries.

CONFIGURATION:
    GEMINI_API_KEY must hold a valid API key; it can also live in a .env file
    in the working directory. GEMINI_MODEL and GEMINI_ENDPOINT override the
    model and API endpoint, and DEBUG=true raises the default log level.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// SRT subtitle file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file path (defaults to <input>_translated.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language name or ISO 639 code (e.g. 'French', 'fr', 'fra')
    #[arg(short, long, default_value = "Vietnamese")]
    language: String,

    /// Maximum subtitle entries per request
    #[arg(short, long, default_value_t = 50)]
    batch_size: usize,

    /// 1-based entry number to resume from
    #[arg(long, default_value_t = 1)]
    start_from: usize,

    /// 1-based entry number to stop after (inclusive)
    #[arg(long)]
    end_at: Option<usize>,

    /// Model name to use for translation
    #[arg(short, long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stdout = std::io::stdout();
            let _ = writeln!(
                stdout,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Build the runtime configuration and install the logger
fn setup(model_override: Option<&str>, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = Config::from_env();
    if let Some(model) = model_override {
        config.translation.model = model.to_string();
    }

    let level: LevelFilter = log_level
        .map(|cli_level| cli_level.clone().into())
        .unwrap_or_else(|| config.log_level());
    CustomLogger::init(level)?;
    debug!("{} configuration loaded ({})", config.app_name, config.app_env);

    config.validate()?;
    Ok(config)
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let config = setup(args.model.as_deref(), args.log_level.as_ref())?;

    let controller = Controller::with_config(config)?;
    controller
        .run(RunOptions {
            input_path: args.input_path,
            output_path: args.output,
            target_language: args.language,
            batch_size: args.batch_size,
            start_from: args.start_from,
            end_at: args.end_at,
        })
        .await
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values must be in place before clap resolves env-backed arguments
    dotenvy::dotenv().ok();

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dualsub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Models) => {
            let config = setup(None, None)?;
            let controller = Controller::with_config(config)?;
            controller.list_models().await
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - treat top-level args as the translate command
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output: cli.output,
                language: cli.language,
                batch_size: cli.batch_size,
                start_from: cli.start_from,
                end_at: cli.end_at,
                model: cli.model,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}
