// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::book::Book;

mod app_config;
mod app_controller;
mod book;
mod errors;
mod language_utils;
mod markup;
mod providers;
mod translation;

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

impl From<app_config::LogLevel> for LevelFilter {
    fn from(level: app_config::LogLevel) -> Self {
        match level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an EPUB book chapter-by-chapter
    Translate(TranslateArgs),

    /// Preview the chapters of an EPUB book without translating
    ShowChapters {
        /// Input EPUB file to inspect
        #[arg(short, long, value_name = "INPUT_PATH")]
        input: PathBuf,
    },

    /// Generate shell completions for lexibook
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input EPUB file to translate
    #[arg(short, long, value_name = "INPUT_PATH")]
    input: PathBuf,

    /// Output EPUB file to write
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    output: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// First chapter to translate (1-based, inclusive)
    #[arg(long, default_value_t = 1)]
    from_chapter: usize,

    /// Last chapter to translate (1-based, inclusive; defaults to the end of the book)
    #[arg(long)]
    to_chapter: Option<usize>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(long, default_value = "EN")]
    from_lang: String,

    /// Target language code (e.g., 'pl', 'es', 'fr')
    #[arg(long, default_value = "PL")]
    to_lang: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// lexibook - AI-powered EPUB translation
///
/// Translates the chapters of an EPUB e-book using an OpenAI-compatible
/// chat completion endpoint, preserving the book's container structure.
#[derive(Parser, Debug)]
#[command(name = "lexibook")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered EPUB book translation tool")]
#[command(long_about = "lexibook translates EPUB books chapter-by-chapter using an \
OpenAI-compatible chat completion API.

EXAMPLES:
    lexibook translate -i book.epub -o book-pl.epub          # Translate the whole book
    lexibook translate -i book.epub -o out.epub --from-chapter 2 --to-chapter 3
    lexibook translate -i book.epub -o out.epub --from-lang en --to-lang de
    lexibook show-chapters -i book.epub                      # Preview chapters before translating
    lexibook completions bash > lexibook.bash                # Generate bash completions

CONFIGURATION:
    Credentials and tuning are read from a YAML file (config.yml by default,
    override with --config). If the file doesn't exist, a default one will be
    created for you to fill in the API key.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

/// Custom logger writing colored, timestamped lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    /// Install as the global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    fn emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
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
            let emoji = Self::emoji_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // raised or lowered after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Translate(args) => run_translate(args).await,
        Commands::ShowChapters { input } => {
            let book = Book::open(&input)
                .with_context(|| format!("Failed to open book: {:?}", input))?;
            app_controller::show_chapters(&book)
        }
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lexibook", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately so it
    // covers the config loading itself
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.into());
    }

    let config_path = &options.config;
    let config = if std::path::Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_yaml::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Write a default config so the user has a template to fill in;
        // validation below still fails until the API key is set
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_yaml = serde_yaml::to_string(&config)
            .context("Failed to serialize default config to YAML")?;
        std::fs::write(config_path, config_yaml)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.clone().into());
    }

    language_utils::validate_language_code(&options.from_lang)
        .with_context(|| format!("Invalid source language code: {}", options.from_lang))?;
    language_utils::validate_language_code(&options.to_lang)
        .with_context(|| format!("Invalid target language code: {}", options.to_lang))?;

    let controller = Controller::with_config(config);
    controller
        .run(
            &options.input,
            &options.output,
            options.from_chapter,
            options.to_chapter,
            &options.from_lang,
            &options.to_lang,
        )
        .await
}
