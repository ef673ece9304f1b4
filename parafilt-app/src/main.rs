//! Parafilt command-line entry point.
//!
//! Decodes one WAV file, runs the filter bank in the configured mode and
//! writes one output file per filter. Diagnostics go to stdout; logs go to
//! stderr through `tracing`.

mod args;
mod settings;

use std::fs;
use std::time::Instant;

use anyhow::Context;
use args::{parse_args, Args, ArgsError, Command, USAGE};
use parafilt_core::{Orchestrator, SampleSource, WavFile};
use settings::{load_settings, AppSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "parafilt=info,parafilt_core=info";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(ArgsError::MissingInput) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("parafilt failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => AppSettings::default(),
    };
    apply_overrides(&mut settings, &args);
    settings.normalize();
    let config = settings.to_run_config()?;

    info!(
        input = %args.input.display(),
        mode = config.mode.label(),
        execution = config.execution.label(),
        max_threads = settings.max_threads,
        seed = settings.seed,
        "parafilt starting"
    );

    let read_started = Instant::now();
    let buffer = WavFile.read(&args.input)?;
    let format = buffer.format();
    println!(
        "Read {} frames ({} Hz, {} ch) from {}",
        format.frames,
        format.sample_rate,
        format.channels,
        args.input.display()
    );
    println!(
        "Read: {:.3} ms",
        read_started.elapsed().as_secs_f64() * 1000.0
    );

    let orchestrator = Orchestrator::new(config, WavFile);
    let summary = orchestrator.run(&buffer)?;

    for report in &summary.filters {
        println!(
            "{}: {} thread(s), {:.3} ms -> {}",
            report.description,
            report.thread_count,
            report.elapsed_ms,
            report.output_path.display()
        );
    }
    println!("Execution: {:.3} ms", summary.total_ms);

    if let Some(path) = &args.report {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let json = summary.to_json_pretty()?;
        fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn apply_overrides(settings: &mut AppSettings, args: &Args) {
    if let Some(mode) = &args.mode {
        settings.mode = mode.clone();
    }
    if let Some(max_threads) = args.max_threads {
        settings.max_threads = max_threads;
    }
    if args.approximate {
        settings.execution = "approximate".into();
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
}
