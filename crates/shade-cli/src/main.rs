//! Shade CLI - Command line interface for the shade semantic checker
//!
//! Programs arrive as serialized syntax trees (JSON), the hand-over format
//! from a parser.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use shade_ast::{Program, ToSource};
use shade_checker::{check, Checker, Diagnostic};

#[derive(Parser)]
#[command(name = "shade")]
#[command(about = "Semantic checker for the shade shading language", long_about = None)]
struct Cli {
    /// Log checker internals (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check program trees and report diagnostics
    Check {
        /// Input tree file(s)
        files: Vec<PathBuf>,
        /// Source text the spans point into, for annotated reports
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
    /// Check a tree and print it with every expression's type filled in
    Annotate {
        /// Input tree file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// List the global declarations of a tree
    Symbols {
        /// Input tree file
        file: PathBuf,
    },
    /// Print a tree back as source text
    Print {
        /// Input tree file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid program tree: {source}", .path.display())]
    Tree {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("cannot write report: {0}")]
    Render(#[from] io::Error),
}

/// Diagnostics of one input file, for `--format json`
#[derive(Serialize)]
struct FileReport {
    file: String,
    diagnostics: Vec<Diagnostic>,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            files,
            source,
            format,
        } => cmd_check(&files, source.as_deref(), format),
        Commands::Annotate { file, pretty } => cmd_annotate(&file, pretty),
        Commands::Symbols { file } => cmd_symbols(&file),
        Commands::Print { file } => cmd_print(&file),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_module_path(verbose > 1)
        .init();
}

fn load_program(path: &Path) -> Result<Program, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let program = serde_json::from_str(&text).map_err(|source| CliError::Tree {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded {}", path.display());
    Ok(program)
}

/// Returns whether every file checked clean
fn cmd_check(files: &[PathBuf], source: Option<&Path>, format: Format) -> Result<bool, CliError> {
    let source_text = match source {
        Some(path) => Some(fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?),
        None => None,
    };

    let mut all_ok = true;
    let mut reports = Vec::new();

    for file in files {
        let mut program = load_program(file)?;
        let name = file.display().to_string();

        match check(&mut program) {
            Ok(result) => {
                info!("{} checked clean", name);
                if format == Format::Human {
                    println!("✓ {} - {} global declaration(s)", name, result.globals.len());
                }
                reports.push(FileReport {
                    file: name,
                    diagnostics: Vec::new(),
                });
            }
            Err(errors) => {
                all_ok = false;
                let diagnostics: Vec<Diagnostic> = errors.iter().map(Diagnostic::from).collect();
                if format == Format::Human {
                    eprintln!("✗ {} - {} error(s):", name, diagnostics.len());
                    for diag in &diagnostics {
                        match (&source_text, source) {
                            (Some(text), Some(path)) => {
                                report_diagnostic(&path.display().to_string(), text, diag)?
                            }
                            _ => eprintln!("  {}", diag.format_simple().trim_end()),
                        }
                    }
                }
                reports.push(FileReport {
                    file: name,
                    diagnostics,
                });
            }
        }
    }

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(all_ok)
}

fn cmd_annotate(file: &Path, pretty: bool) -> Result<bool, CliError> {
    let mut program = load_program(file)?;
    let mut checker = Checker::new();
    checker.check_program(&mut program);

    for error in checker.reporter() {
        eprintln!("{}: {}", error.code(), error);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&program)?
    } else {
        serde_json::to_string(&program)?
    };
    println!("{}", json);

    Ok(checker.error_count() == 0)
}

fn cmd_symbols(file: &Path) -> Result<bool, CliError> {
    let mut program = load_program(file)?;
    let mut checker = Checker::new();
    checker.check_program(&mut program);

    for symbol in checker.globals() {
        println!("{}", symbol);
    }
    if checker.error_count() > 0 {
        eprintln!("{} error(s); run `shade check` for details", checker.error_count());
    }

    Ok(checker.error_count() == 0)
}

fn cmd_print(file: &Path) -> Result<bool, CliError> {
    let program = load_program(file)?;
    println!("{}", program.to_source(0));
    Ok(true)
}

fn report_diagnostic(file_id: &str, source: &str, diag: &Diagnostic) -> Result<(), CliError> {
    let mut report = Report::build(ReportKind::Error, file_id.to_string(), diag.span.start)
        .with_code(diag.code)
        .with_message(&diag.message)
        .with_label(
            Label::new((file_id.to_string(), diag.span.range()))
                .with_message(&diag.message)
                .with_color(Color::Red),
        );

    for related in &diag.related {
        report = report.with_label(
            Label::new((file_id.to_string(), related.span.range()))
                .with_message(&related.label)
                .with_color(Color::Blue),
        );
    }
    if !diag.explanation.is_empty() {
        report = report.with_note(&diag.explanation);
    }
    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .eprint((file_id.to_string(), Source::from(source)))?;
    Ok(())
}
