//! # CLI Module
//!
//! Command-line interface for the photo triage engine.
//!
//! ## Usage
//! ```bash
//! # Run both strategies and compare their timings (default)
//! photo-triage run photos/photo --output photos/sorted
//!
//! # Only the worker-pool strategy, with 8 workers
//! photo-triage run photos/photo --mode concurrent --workers 8
//!
//! # Stricter blur threshold, without copying anything
//! photo-triage run photos/photo --threshold 150 --dry-run
//!
//! # Plain report lines for scripting
//! photo-triage run photos/photo --format lines
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_triage::core::engine::{ClassificationEngine, ClassificationOutcome, Comparison};
use photo_triage::core::hasher::DigestAlgorithm;
use photo_triage::core::report::RunReport;
use photo_triage::core::scanner::ScanConfig;
use photo_triage::core::ExecutionMode;
use photo_triage::error::Result;
use photo_triage::events::{Event, EventChannel, FileEvent, RunEvent};
use std::path::PathBuf;
use std::thread;

/// Photo Triage - sort photos into duplicates, blurry and sharp
#[derive(Parser, Debug)]
#[command(name = "photo-triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every entry of a folder
    Run {
        /// Folder containing the photos
        input: PathBuf,

        /// Root folder for the duplicates/, blurry/ and sharp/ outputs
        #[arg(short, long, default_value = "triage-output")]
        output: PathBuf,

        /// Execution strategy
        #[arg(short, long, default_value = "compare")]
        mode: Mode,

        /// Laplacian variance below which a photo is blurry
        #[arg(short, long, default_value = "100.0")]
        threshold: f64,

        /// Worker pool size for the concurrent strategy
        #[arg(short, long, default_value = "4")]
        workers: usize,

        /// Content digest used to spot duplicates
        #[arg(short, long, default_value = "sha256")]
        algorithm: Algorithm,

        /// Only classify entries with these extensions (comma separated)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,

        /// Classify without copying any files
        #[arg(long)]
        dry_run: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// One file at a time
    Sequential,
    /// Worker pool
    Concurrent,
    /// Sequential, then concurrent, with a speedup figure
    Compare,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// SHA-256 - cryptographic (default)
    Sha256,
    /// XXH3-128 - faster, non-cryptographic
    Xxh3,
}

impl From<Algorithm> for DigestAlgorithm {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Sha256 => DigestAlgorithm::Sha256,
            Algorithm::Xxh3 => DigestAlgorithm::Xxh3,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Report lines only
    Lines,
}

/// What a `run` invocation produced
enum RunOutcome {
    Single(RunReport),
    Compared(Comparison),
}

impl RunOutcome {
    fn reports(&self) -> Vec<&RunReport> {
        match self {
            RunOutcome::Single(report) => vec![report],
            RunOutcome::Compared(comparison) => {
                vec![&comparison.sequential, &comparison.concurrent]
            }
        }
    }

    fn comparison(&self) -> Option<&Comparison> {
        match self {
            RunOutcome::Single(_) => None,
            RunOutcome::Compared(comparison) => Some(comparison),
        }
    }
}

/// Events buffered between the engine and the progress bar
const PROGRESS_EVENT_CAPACITY: usize = 256;

/// Settings for one invocation of `run`
struct RunArgs {
    input: PathBuf,
    output: PathBuf,
    mode: Mode,
    threshold: f64,
    workers: usize,
    algorithm: DigestAlgorithm,
    extensions: Option<Vec<String>>,
    format: OutputFormat,
    dry_run: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            mode,
            threshold,
            workers,
            algorithm,
            extensions,
            format,
            dry_run,
            verbose,
        } => run_triage(RunArgs {
            input,
            output,
            mode,
            threshold,
            workers,
            algorithm: algorithm.into(),
            extensions,
            format,
            dry_run,
            verbose,
        }),
    }
}

fn run_triage(args: RunArgs) -> Result<()> {
    photo_triage::init_tracing(if args.verbose { "debug" } else { "warn" });

    let term = Term::stderr();
    let pretty = matches!(args.format, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Triage").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let engine = ClassificationEngine::builder()
        .input_dir(&args.input)
        .output_root(&args.output)
        .threshold(args.threshold)
        .workers(args.workers)
        .algorithm(args.algorithm)
        .scan_config(ScanConfig {
            extensions: args.extensions.clone(),
            ..Default::default()
        })
        .dry_run(args.dry_run)
        .build()?;

    // Workers wait for the progress thread rather than queueing events
    // without limit on large folders.
    let (sender, receiver) = EventChannel::bounded(PROGRESS_EVENT_CAPACITY);

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = args.verbose;

    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            // Drain so senders never notice a missing listener.
            for _ in receiver.iter() {}
            return;
        };

        for event in receiver.iter() {
            match event {
                Event::Run(RunEvent::Started { mode, total_files }) => {
                    pb.reset();
                    pb.set_length(total_files as u64);
                    pb.set_message(mode.to_string());
                }
                Event::File(FileEvent::Classified {
                    path,
                    outcome,
                    completed,
                    ..
                }) => {
                    pb.set_position(completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{} : {}",
                            path.file_name().unwrap_or_default().to_string_lossy(),
                            outcome
                        ));
                    }
                }
                Event::File(FileEvent::SinkFailed { message, .. }) => {
                    pb.println(format!("{} {}", style("!").yellow().bold(), message));
                }
                Event::Run(RunEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
            }
        }
    });

    let outcome = match args.mode {
        Mode::Sequential => engine
            .run_with_events(ExecutionMode::Sequential, &sender)
            .map(RunOutcome::Single),
        Mode::Concurrent => engine
            .run_with_events(
                ExecutionMode::Concurrent {
                    workers: args.workers,
                },
                &sender,
            )
            .map(RunOutcome::Single),
        Mode::Compare => engine.compare(&sender).map(RunOutcome::Compared),
    };

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let outcome = outcome?;
    let reports = outcome.reports();

    match args.format {
        OutputFormat::Pretty => {
            print_pretty_results(&term, &reports, outcome.comparison(), &args)
        }
        OutputFormat::Json => print_json_results(&reports),
        OutputFormat::Lines => print_lines(&reports),
    }

    Ok(())
}

fn styled_line(line: &str, outcome: ClassificationOutcome) -> String {
    match outcome {
        ClassificationOutcome::Sharp => style(line).green().to_string(),
        ClassificationOutcome::Blurry => style(line).yellow().to_string(),
        ClassificationOutcome::Duplicate => style(line).cyan().to_string(),
        ClassificationOutcome::NotFound => style(line).red().to_string(),
    }
}

fn print_pretty_results(
    term: &Term,
    reports: &[&RunReport],
    comparison: Option<&Comparison>,
    args: &RunArgs,
) {
    for report in reports {
        term.write_line(&format!("{}", style(report.mode).bold().underlined()))
            .ok();

        for outcome in &report.outcomes {
            term.write_line(&format!(
                "  {}",
                styled_line(&outcome.to_string(), outcome.outcome)
            ))
            .ok();
        }

        let counts = report.counts();
        term.write_line(&format!(
            "  {} sharp, {} blurry, {} duplicates, {} not found",
            style(counts.sharp).green(),
            style(counts.blurry).yellow(),
            style(counts.duplicate).cyan(),
            style(counts.not_found).red()
        ))
        .ok();

        if !report.sink_failures.is_empty() {
            term.write_line(&format!(
                "  {} {} files could not be copied",
                style("!").yellow().bold(),
                report.sink_failures.len()
            ))
            .ok();
        }

        term.write_line(&format!("  {}", style(report.summary_line()).bold()))
            .ok();
        term.write_line("").ok();
    }

    if let Some(speedup) = comparison.and_then(Comparison::speedup) {
        term.write_line(&format!(
            "{} Concurrent run was {}x the speed of the sequential run",
            style("✓").green().bold(),
            style(format!("{:.2}", speedup)).cyan()
        ))
        .ok();
    }

    let footer = if args.dry_run {
        "Dry run: no files were copied.".to_string()
    } else {
        format!(
            "Copies written under {}. Originals were not modified.",
            args.output.display()
        )
    };
    term.write_line(&format!("{}", style(footer).dim())).ok();
}

fn print_json_results(reports: &[&RunReport]) {
    let output = serde_json::json!({
        "runs": reports.iter().map(|r| {
            serde_json::json!({
                "mode": r.mode.to_string(),
                "started_at": r.started_at,
                "elapsed_secs": r.elapsed_secs(),
                "counts": r.counts(),
                "outcomes": r.outcomes.iter().map(|o| {
                    serde_json::json!({
                        "name": o.file.name,
                        "path": o.file.path,
                        "outcome": o.outcome.label(),
                    })
                }).collect::<Vec<_>>(),
                "sink_failures": r.sink_failures,
                "lines": r.lines(),
            })
        }).collect::<Vec<_>>()
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

fn print_lines(reports: &[&RunReport]) {
    for report in reports {
        for line in report.lines() {
            println!("{}", line);
        }
    }
}
