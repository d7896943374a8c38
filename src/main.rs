// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use slides_translator::app_config::{self, Config, TranslationProvider};
use slides_translator::app_controller::{Controller, RunOutcome};
use slides_translator::auth::PendingAuth;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a Google Slides presentation into a new copy
    Translate(TranslateArgs),

    /// Translate a deck stored as JSON, without any Google account
    Local(LocalArgs),

    /// Generate shell completions for slides-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Presentation id or the full presentation URL
    #[arg(value_name = "PRESENTATION")]
    presentation_id: String,

    /// Target language name or code (e.g., 'Spanish', 'de', 'jpn')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Extra context for the translator (audience, domain, terminology)
    #[arg(short, long)]
    context: Option<String>,

    /// Authorization code, or the http://localhost/?code=... address the consent page redirected to
    #[arg(long)]
    auth_code: Option<String>,
}

#[derive(Args, Debug)]
struct LocalArgs {
    /// Deck JSON file to translate
    #[arg(value_name = "DECK_JSON")]
    input: PathBuf,

    /// Target language name or code (e.g., 'Spanish', 'de', 'jpn')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Extra context for the translator (audience, domain, terminology)
    #[arg(short, long)]
    context: Option<String>,

    /// Where to write the translated deck (default: <input>_translated.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Maximum translations in flight
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Maximum replace requests per batch update
    #[arg(short, long, global = true)]
    batch_size: Option<usize>,
}

/// slides-translator - translate slide decks with AI
///
/// Finds every distinct text in a presentation, translates each one once
/// and writes the translations back everywhere they occur.
#[derive(Parser, Debug)]
#[command(name = "slides-translator")]
#[command(version)]
#[command(about = "AI-powered slide deck translation tool")]
#[command(long_about = "slides-translator copies a Google Slides presentation and translates the copy using AI providers.

EXAMPLES:
    slides-translator translate 1AbC... -t Spanish            # Translate into a Spanish copy
    slides-translator translate 1AbC... -t de -c \"Finance\"    # Give the translator some context
    slides-translator translate 1AbC... --auth-code 4/0Ab...  # Finish the OAuth consent flow
    slides-translator translate https://docs.google.com/presentation/d/1AbC.../edit -t it
    slides-translator local deck.json -t fr -o deck.fr.json   # Translate a deck stored as JSON
    slides-translator completions bash > slides-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Secrets left empty are read from
    GEMINI_API_KEY / ANTHROPIC_API_KEY, AUTHENTICATION_CLIENT_ID and
    AUTHENTICATION_CLIENT_SECRET.

AUTHORIZATION:
    The first Google Slides run prints a consent URL. After granting access the
    browser is sent to http://localhost/?code=...; the page will not load, which
    is expected. Copy the code parameter (or the whole address) from the
    address bar and pass it with --auth-code.

SUPPORTED PROVIDERS:
    gemini    - Google Gemini API (default: gemini-2.5-flash)
    anthropic - Anthropic Claude API (default: claude-3-5-haiku-latest)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
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

    // @returns: ANSI color for log level
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Printed instead of a report while consent is outstanding
#[derive(Serialize)]
struct PendingOutput<'a> {
    pending: bool,
    message: &'a str,
    authorization_url: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything is let through here; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "slides-translator", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => {
            let config = load_config(&cli.common, args.target_language.as_deref())?;
            let controller = Controller::with_config(config).context("Configuration validation failed")?;
            let outcome = controller
                .run_google(&args.presentation_id, args.context.as_deref(), args.auth_code.as_deref())
                .await?;
            print_outcome(outcome)
        }
        Commands::Local(args) => {
            let config = load_config(&cli.common, args.target_language.as_deref())?;
            let controller = Controller::with_config(config).context("Configuration validation failed")?;
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| default_output_path(&args.input));
            let outcome = controller
                .run_local(controller.translator().await?, &args.input, &output, args.context.as_deref())
                .await?;
            print_outcome(outcome)
        }
    }
}

/// Load the config file and apply environment and CLI overrides
fn load_config(common: &CommonArgs, target_language: Option<&str>) -> Result<Config> {
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&common.config)?;
    config.apply_env_fallbacks();

    if let Some(provider) = &common.provider {
        let provider: TranslationProvider = provider.clone().into();
        if provider != config.translation.provider {
            // A model or endpoint from the file belongs to the other provider
            config.translation.model.clear();
            config.translation.endpoint.clear();
            config.translation.provider = provider;
            config.translation.api_key.clear();
            config.apply_env_fallbacks();
        }
    }
    if let Some(model) = &common.model {
        config.translation.model = model.clone();
    }
    if let Some(workers) = common.workers {
        config.translation.concurrent_workers = workers;
    }
    if let Some(batch_size) = common.batch_size {
        config.replacement.batch_size = batch_size;
    }
    if let Some(target_language) = target_language {
        config.target_language = target_language.to_string();
    }
    if let Some(level) = &common.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    input.with_file_name(format!("{}_translated.json", stem))
}

fn print_outcome(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        RunOutcome::Aborted { report, error } => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Err(anyhow!(error))
        }
        RunOutcome::AuthPending(PendingAuth {
            message,
            authorization_url,
        }) => {
            warn!(
                "Open this URL and grant access. Then copy the code parameter (or the whole \
                 http://localhost/?code=... address) and re-run with --auth-code <CODE>"
            );
            let output = PendingOutput {
                pending: true,
                message: &message,
                authorization_url: &authorization_url,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}
