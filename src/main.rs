// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::pipeline::orchestrator::{ProductionProgress, ProductionState};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod audio;
mod capabilities;
mod errors;
mod music;
mod pipeline;
mod segmenter;
mod timing;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Bookwave - AI-assisted audiobook production
///
/// Turns a plain-text book into a narrated audiobook with mood-matched
/// background music, using AI classification and speech synthesis.
#[derive(Parser, Debug)]
#[command(name = "bookwave")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered audiobook production tool")]
#[command(long_about = "Bookwave splits a text into paragraphs, classifies each paragraph's mood,
narrates it with AI speech synthesis, and mixes mood-matched background
music under the narration with crossfades at paragraph boundaries.

EXAMPLES:
    bookwave book.txt                    # Produce using default config
    bookwave -c prod.json book.txt       # Use a specific config file
    bookwave --log-level debug book.txt  # Verbose logging

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    /// Input text file to produce
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Terminal progress display for a production run
fn progress_callback() -> Box<dyn Fn(&ProductionProgress) + Send + Sync> {
    let bar = Arc::new(
        indicatif::ProgressBar::new_spinner().with_style(
            indicatif::ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        ),
    );

    Box::new(move |progress| {
        let message = match (progress.state, progress.segment_index, progress.total_segments) {
            (ProductionState::Classifying, Some(i), Some(n)) => {
                format!("Classifying paragraph {}/{}", i + 1, n)
            }
            (ProductionState::SynthesizingAndMixing, Some(i), Some(n)) => {
                format!("Narrating and mixing paragraph {}/{}", i + 1, n)
            }
            (state, _, _) => format!("{}", state),
        };
        match progress.state {
            ProductionState::Done => bar.finish_with_message("done"),
            ProductionState::Failed => bar.abandon_with_message("failed"),
            _ => {
                bar.set_message(message);
                bar.tick();
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let options = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and produce
    let controller = Controller::with_config(config)?;
    let outcome = controller
        .run(options.input_path, Some(progress_callback()))
        .await?;

    println!(
        "Audiobook ready: {} ({:.1}s, {} paragraphs)",
        outcome.url, outcome.duration_secs, outcome.segment_count
    );

    Ok(())
}
