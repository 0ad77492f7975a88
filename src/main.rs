// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error};
use std::io::Write;
use std::path::PathBuf;

use annoflow::app_config::{Config, LogLevel};
use annoflow::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate text files (or the built-in sample) and write .xmi files
    Annotate(AnnotateArgs),

    /// Read .xmi files from a directory and dump every annotation
    Dump(DumpArgs),

    /// Annotate the sample, then dump the output directory (default command)
    Run,

    /// Generate shell completions for annoflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Text files or directories of .txt files; the sample document if omitted
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Directory the .xmi files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Document language code (e.g., 'en', 'de', 'cat')
    #[arg(short, long)]
    language: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Directory to read .xmi files from
    #[arg(value_name = "SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Include ([+]glob) or exclude ([-]glob) pattern; repeatable
    #[arg(short, long = "pattern")]
    patterns: Vec<String>,
}

/// annoflow - natural-language annotation pipeline
///
/// Runs documents through segmentation, paragraph splitting, lemmatization,
/// part-of-speech tagging, dependency parsing, named entity recognition and
/// coreference resolution.
#[derive(Parser, Debug)]
#[command(name = "annoflow")]
#[command(version)]
#[command(about = "Natural-language annotation pipeline orchestrator")]
#[command(long_about = "annoflow runs documents through a configurable annotation pipeline and stores them as .xmi files.

EXAMPLES:
    annoflow                                   # Annotate the sample and dump it
    annoflow annotate article.txt              # Annotate one text file
    annoflow annotate -f -o out/ corpus/       # Annotate a directory, overwriting
    annoflow dump out/ -p '[+]**/*.xmi'        # Dump all .xmi files below out/
    annoflow --log-level debug run             # Show per-stage timings
    annoflow completions bash > annoflow.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in annoflow.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "annoflow.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Info until the configuration is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "annoflow", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if let Some(Commands::Annotate(args)) = &cli.command {
        if let Some(language) = &args.language {
            config.language = language.clone();
        }
        if let Some(output_dir) = &args.output_dir {
            config.io.output_dir = output_dir.clone();
        }
    }
    if let Some(Commands::Dump(args)) = &cli.command {
        if !args.patterns.is_empty() {
            config.io.patterns = args.patterns.clone();
        }
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Annotate(args)) => {
            let output_dir = controller.config().io.output_dir.clone();
            if args.inputs.is_empty() {
                controller.annotate_sample(&output_dir, args.force_overwrite, &mut out)?;
            } else {
                controller.annotate_files(&args.inputs, &output_dir, args.force_overwrite, &mut out)?;
            }
        }
        Some(Commands::Dump(args)) => {
            let source_dir = args
                .source_dir
                .unwrap_or_else(|| controller.config().io.output_dir.clone());
            controller.dump(&source_dir, &controller.config().io.patterns, &mut out)?;
        }
        Some(Commands::Run) | None => {
            controller.run_sample(&mut out)?;
        }
        Some(Commands::Completions { .. }) => {}
    }

    Ok(())
}
