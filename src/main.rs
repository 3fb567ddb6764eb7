//! lightcraft - command line front end
//!
//! Analyzes WAV files and prints the geometry each one maps to.
//! With no file arguments it prompts for paths until `exit`.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;

use clap::Parser;

use lightcraft::audio::{analyze_file, is_wav_path};
use lightcraft::render::{summarize, synthesize, GeometryPoint};
use lightcraft::{AudioMetrics, OutputFormat, Settings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lightcraft")]
#[command(about = "Map WAV loudness and activity onto spiral and hexagon geometry", long_about = None)]
struct Args {
    /// WAV files to analyze (prompts interactively when omitted)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Number of points to generate per file
    #[arg(long, value_name = "N")]
    steps: Option<usize>,

    /// Points to show at each end of the summary
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Print every point as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Persist the effective settings for future runs
    #[arg(long)]
    save_settings: bool,
}

impl Args {
    /// Apply command line overrides on top of persisted settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(steps) = self.steps {
            settings.num_steps = steps;
        }
        if let Some(preview) = self.preview {
            settings.preview_points = preview;
        }
        if self.json {
            settings.output = OutputFormat::Json;
        }
    }
}

/// Result of one file run
struct Run {
    path: PathBuf,
    metrics: AudioMetrics,
    points: Vec<GeometryPoint>,
}

fn main() {
    env_logger::init();
    log::info!("Starting lightcraft");

    let args = Args::parse();

    let mut settings = Settings::load();
    args.apply(&mut settings);
    settings.clamp();
    if args.save_settings {
        settings.save();
    }

    println!("--- Sacred Geometry Audio Visualizer ---");

    if args.files.is_empty() {
        println!("NOTE: Only 16-bit PCM WAV files are analyzed.");
        run_interactive(&settings);
    } else {
        run_batch(&args.files, &settings);
    }
}

/// Analyze every accepted path on its own thread, printing in argument order
fn run_batch(paths: &[PathBuf], settings: &Settings) {
    let accepted: Vec<&PathBuf> = paths.iter().filter(|p| check_path(p)).collect();

    let runs: Vec<Run> = thread::scope(|scope| {
        let handles: Vec<_> = accepted
            .iter()
            .map(|path| scope.spawn(move || run_file(path, settings.num_steps)))
            .collect();

        handles
            .into_iter()
            .zip(&accepted)
            .filter_map(|(handle, path)| match handle.join() {
                Ok(run) => Some(run),
                Err(_) => {
                    log::error!("Analysis thread for {:?} panicked", path);
                    None
                }
            })
            .collect()
    });

    for run in &runs {
        print_run(run, settings);
    }
}

/// Prompt for paths until `exit`, `quit` or end of input
fn run_interactive(settings: &Settings) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nEnter path to WAV audio file (or 'exit'): ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let path = PathBuf::from(input);
        if check_path(&path) {
            let run = run_file(&path, settings.num_steps);
            print_run(&run, settings);
        }
    }
}

/// Reject missing and non-WAV paths with a message
fn check_path(path: &Path) -> bool {
    if !path.exists() {
        println!("File not found at: {}", path.display());
        return false;
    }
    if !is_wav_path(path) {
        println!("Only WAV files are supported: {}", path.display());
        return false;
    }
    true
}

fn run_file(path: &Path, num_steps: usize) -> Run {
    let metrics = analyze_file(path);
    let points = synthesize(&metrics, num_steps);
    Run {
        path: path.to_path_buf(),
        metrics,
        points,
    }
}

fn print_run(run: &Run, settings: &Settings) {
    println!("\n--- Analysis for: {} ---", run.path.display());
    println!("{}", run.metrics);
    if run.metrics.is_default() {
        println!("(analysis failed or input was empty; using default metrics)");
    }

    match settings.output {
        OutputFormat::Summary => print!("{}", summarize(&run.points, settings.preview_points)),
        OutputFormat::Json => match serde_json::to_string_pretty(&run.points) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize points: {}", e),
        },
    }
}
