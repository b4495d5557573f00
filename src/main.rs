// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use screenplay_formatter::app_config::{Config, LogLevel};
use screenplay_formatter::cleanup::{CharacterNameUnifier, MetaCommentRemover};
use screenplay_formatter::compare::compare;
use screenplay_formatter::correction::{CorrectionPolicy, FixEngine};
use screenplay_formatter::file_utils::FileManager;
use screenplay_formatter::providers::LlmCorrector;
use screenplay_formatter::render::{Renderer, TextRenderer};
use screenplay_formatter::{ScreenplayParser, ValidationConfig, ValidationService};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Validation report output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Format a screenplay from input file to output file
    Format {
        /// Raw screenplay text
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Formatted output file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Validate the parsed screenplay after formatting
        #[arg(short, long)]
        validate: bool,

        /// Use strict validation mode
        #[arg(long)]
        strict: bool,

        /// Merge character name variants into one canonical name
        #[arg(long)]
        unify_characters: bool,

        /// Strip editorial notes before rendering
        #[arg(long)]
        remove_meta_comments: bool,
    },

    /// Validate a screenplay file (exit code 1 when it fails)
    Validate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file for the validation report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Use strict validation mode
        #[arg(long)]
        strict: bool,
    },

    /// Compare two screenplay files for structural differences
    Diff {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Show all differences, not just the first 10
        #[arg(long)]
        show_all: bool,
    },

    /// Fix screenplay formatting using LLM assistance
    Fix {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file for the fixed screenplay (default: INPUT_fixed.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview fixes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Model to use (overrides the config)
        #[arg(short, long)]
        model: Option<String>,

        /// Minimum confidence for auto-apply (overrides the config)
        #[arg(short, long)]
        confidence: Option<f64>,

        /// Export the audit log to a JSON file
        #[arg(long)]
        audit: Option<PathBuf>,

        /// Use strict validation mode
        #[arg(long)]
        strict: bool,
    },

    /// Manage configuration settings
    Config {
        /// Store an API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Remove the stored API key
        #[arg(long)]
        remove_api_key: bool,

        /// Set the default model
        #[arg(long)]
        model: Option<String>,

        /// Set the default confidence threshold (0.0-1.0)
        #[arg(long)]
        confidence: Option<f64>,

        /// Set strict validation mode
        #[arg(long)]
        strict: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Generate a sample screenplay for testing
    Sample {
        /// Write the sample to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Screenplay Formatter - Convert text to industry-standard screenplay format
#[derive(Parser, Debug)]
#[command(name = "screenplay-formatter")]
#[command(version = "1.0.0")]
#[command(about = "Convert messy screenplay drafts into industry-standard format")]
#[command(long_about = "Parses raw screenplay text, validates it against formatting rules and renders
an 80-column plain-text screenplay. Failing passages can be corrected through an
OpenAI-compatible model.

EXAMPLES:
    screenplay-formatter sample -o sample.txt              # Write a sample screenplay
    screenplay-formatter format draft.txt script.txt -v     # Format and validate
    screenplay-formatter validate draft.txt --format json   # JSON validation report
    screenplay-formatter diff draft.txt reference.txt       # Structural comparison
    screenplay-formatter fix draft.txt --dry-run            # Preview model corrections
    screenplay-formatter config --set-api-key sk-...        # Store an API key

CONFIGURATION:
    Configuration is stored in ~/.screenplay_formatter/config.json by default.
    OPENAI_API_KEY overrides the stored API key.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: ANSI colour and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "✗"),
            Level::Warn => ("1;33", "!"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "·"),
            Level::Trace => ("1;35", "…"),
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
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", colour, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;

    let cli = CommandLineOptions::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(Config::default_path)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = Config::load(&config_path);

    let log_level: LogLevel = cli.log_level.clone().map(Into::into).unwrap_or(config.log_level);
    log::set_max_level(log_level.to_level_filter());

    match cli.command {
        Commands::Format { input, output, validate, strict, unify_characters, remove_meta_comments } => {
            run_format(&input, &output, validate, strict || config.validation.strict, unify_characters, remove_meta_comments)
        }
        Commands::Validate { input, output, format, strict } => {
            let mut validation = config.validation.clone();
            validation.strict |= strict;
            let passed = run_validate(&input, output.as_deref(), format, validation)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Diff { input, reference, show_all } => run_diff(&input, &reference, show_all),
        Commands::Fix { input, output, dry_run, model, confidence, audit, strict } => {
            let options = FixOptions { output, dry_run, model, confidence, audit, strict };
            run_fix(&input, config, options).await
        }
        Commands::Config { set_api_key, remove_api_key, model, confidence, strict, show, reset } => {
            let changes = ConfigChanges { set_api_key, remove_api_key, model, confidence, strict, show, reset };
            run_config(&config_path, config, changes)
        }
        Commands::Sample { output } => run_sample(output.as_deref()),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "screenplay-formatter", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_format(
    input: &Path,
    output: &Path,
    validate: bool,
    strict: bool,
    unify_characters: bool,
    remove_meta_comments: bool,
) -> Result<()> {
    let content = FileManager::read_screenplay(input)?;
    let mut elements = ScreenplayParser::new().parse(&content);
    println!("Parsed {} elements from {}", elements.len(), input.display());

    if remove_meta_comments {
        let mut remover = MetaCommentRemover::new();
        elements = remover.remove(&elements);
        println!("{}", remover.report());
    }

    if unify_characters {
        let mut unifier = CharacterNameUnifier::new();
        elements = unifier.unify(&elements);
        println!("{}", unifier.report());
    }

    TextRenderer::new()
        .write_to(&elements, output)
        .with_context(|| format!("Failed to format to {}", output.display()))?;
    println!("Successfully formatted to {}", output.display());

    if validate {
        let report = ValidationService::with_config(ValidationConfig::strict(strict)).validate(&elements);
        if report.passed {
            println!("Validation passed!");
        } else {
            println!("Validation found {} errors", report.total_errors);
            println!("{}", report.to_text());
        }
    }

    Ok(())
}

fn run_validate(input: &Path, output: Option<&Path>, format: ReportFormat, config: ValidationConfig) -> Result<bool> {
    let content = FileManager::read_screenplay(input)?;
    let elements = ScreenplayParser::new().parse(&content);
    let report = ValidationService::with_config(config).validate(&elements);

    let rendered = match format {
        ReportFormat::Json => report.to_json().context("Failed to serialize validation report")?,
        ReportFormat::Text => report.to_text(),
    };

    match output {
        Some(path) => {
            FileManager::write_to_file(path, &rendered)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(report.passed)
}

fn run_diff(input: &Path, reference: &Path, show_all: bool) -> Result<()> {
    const PREVIEW_LIMIT: usize = 10;

    let parser = ScreenplayParser::new();
    let input_elements = parser.parse(&FileManager::read_screenplay(input)?);
    let reference_elements = parser.parse(&FileManager::read_screenplay(reference)?);

    let differences = compare(&input_elements, &reference_elements);
    if differences.is_empty() {
        println!("Files are identical in structure");
        return Ok(());
    }

    println!("Found {} differences:", differences.len());
    let limit = if show_all { differences.len() } else { PREVIEW_LIMIT };
    for difference in differences.iter().take(limit) {
        println!("  {}", difference);
    }
    if !show_all && differences.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", differences.len() - PREVIEW_LIMIT);
    }

    Ok(())
}

struct FixOptions {
    output: Option<PathBuf>,
    dry_run: bool,
    model: Option<String>,
    confidence: Option<f64>,
    audit: Option<PathBuf>,
    strict: bool,
}

async fn run_fix(input: &Path, mut config: Config, options: FixOptions) -> Result<()> {
    if let Some(model) = &options.model {
        config.set_model(model)?;
    }
    if let Some(confidence) = options.confidence {
        config.set_confidence(confidence)?;
    }
    config.validate().context("Configuration validation failed")?;

    let content = FileManager::read_screenplay(input)?;

    // Fatal before any chunk is sent
    let api_key = config.require_api_key()?;
    let corrector = LlmCorrector::new(&config.llm, api_key);

    let engine = FixEngine::new(corrector)
        .with_policy(CorrectionPolicy::new(config.llm.min_confidence, config.llm.max_edit_distance))
        .with_strict(options.strict || config.validation.strict)
        .with_dry_run(options.dry_run)
        .with_chunk_timeout(config.llm.chunk_timeout());

    info!("Analyzing screenplay and identifying formatting issues...");
    let result = engine.fix_screenplay(&content).await;
    println!("{}", result.summary());

    if !options.dry_run && result.applied_fixes() > 0 {
        let output = options
            .output
            .unwrap_or_else(|| FileManager::sibling_path(input, "_fixed", "txt"));
        FileManager::write_to_file(&output, &result.corrected_text)?;
        println!("Fixed screenplay saved to {}", output.display());
    }

    if let Some(audit) = &options.audit {
        result.export_audit(audit)?;
        println!("Audit log exported to {}", audit.display());
    }

    if result.suggested_fixes() > 0 {
        println!("\n{} suggestions require manual review", result.suggested_fixes());
        for suggestion in &result.suggested {
            println!("\nSuggestion (confidence: {:.2}):", suggestion.confidence);
            println!(
                "Lines {}-{}: {}",
                suggestion.start_line + 1,
                suggestion.end_line + 1,
                suggestion.issues.join(", ")
            );
            print!("{}", suggestion.diff);
        }
    }

    Ok(())
}

struct ConfigChanges {
    set_api_key: Option<String>,
    remove_api_key: bool,
    model: Option<String>,
    confidence: Option<f64>,
    strict: Option<bool>,
    show: bool,
    reset: bool,
}

fn run_config(path: &Path, mut config: Config, changes: ConfigChanges) -> Result<()> {
    if changes.reset {
        config.reset();
        config.save(path)?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut changed = false;

    if changes.remove_api_key {
        config.remove_api_key();
        println!("API key removed");
        changed = true;
    }

    if let Some(key) = &changes.set_api_key {
        if !key.starts_with("sk-") {
            warn!("API key should start with 'sk-'");
        }
        config.set_api_key(key);
        println!("API key saved");
        changed = true;
    }

    if let Some(model) = &changes.model {
        config.set_model(model)?;
        println!("Default model set to: {}", model);
        changed = true;
    }

    if let Some(confidence) = changes.confidence {
        config.set_confidence(confidence)?;
        println!("Default confidence set to: {}", confidence);
        changed = true;
    }

    if let Some(strict) = changes.strict {
        config.set_strict(strict);
        println!("Strict validation set to: {}", strict);
        changed = true;
    }

    if changed {
        config.save(path).map_err(|e| anyhow!("Failed to save configuration: {}", e))?;
    }

    if changes.show || !changed {
        println!("{}", config.show(path));
    }

    Ok(())
}

const SAMPLE_SCREENPLAY: &str = "FADE IN:

INT. COFFEE SHOP - DAY

A cozy neighborhood coffee shop buzzing with morning activity. Sunlight streams through large windows. SARAH (30s, professional attire) enters, scanning the crowded space.

She spots an empty table by the window and hurries over.

SARAH
(to herself)
Perfect.

She sets down her laptop bag and approaches the counter where JAKE (20s, barista apron) greets her with a smile.

JAKE
Morning! The usual?

SARAH
(smiling)
You know me too well. Large coffee, black.

JAKE
Coming right up!

Jake turns to prepare the coffee. Sarah glances at her watch, concerned.

SARAH
(urgent)
Actually, could you make that to go? I just remembered I have a meeting.

JAKE
(over his shoulder)
No problem!

He hands her the coffee in a to-go cup.

JAKE (CONT'D)
That'll be $3.50.

Sarah pays and rushes toward the door.

SARAH
Thanks, Jake! See you tomorrow!

CUT TO:

EXT. CITY STREET - CONTINUOUS

Sarah emerges from the coffee shop, coffee in hand, and hails a taxi.

FADE OUT.

THE END";

fn run_sample(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            FileManager::write_to_file(path, SAMPLE_SCREENPLAY)?;
            println!("Sample screenplay saved to {}", path.display());
            println!("\nYou can now test the formatter with:");
            println!("  screenplay-formatter format {} output.txt", path.display());
            println!("  screenplay-formatter validate {}", path.display());
        }
        None => println!("{}", SAMPLE_SCREENPLAY),
    }
    Ok(())
}
