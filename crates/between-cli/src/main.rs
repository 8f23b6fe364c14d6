#![forbid(unsafe_code)]

mod output;

use anyhow::Context;
use between_core::config::{Config, resolve_config};
use between_core::{EngineKind, ErrorCode, pipeline, timing};
use clap::Parser;
use output::{CliError, OutputMode, RunDiagnostics};
use peak_alloc::PeakAlloc;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

#[derive(Parser, Debug)]
#[command(
    name = "between",
    author,
    version,
    about = "Betweenness centrality for weighted directed graphs",
    long_about = None,
    after_help = "INPUT FORMAT:\n    N M\n    u v weight    (M lines, 1-based node ids, signed 32-bit weights)\n\nEXAMPLES:\n    # Score every node of graph.dat into scores.dat\n    between graph.dat scores.dat\n\n    # Force the sparse engine and print diagnostics as JSON\n    between --engine sparse --json graph.dat scores.dat"
)]
struct Cli {
    /// Graph description to read.
    input: PathBuf,

    /// File to write one `<id> <score>` line per node into.
    output: PathBuf,

    /// Shortest-path engine: dense (Floyd–Warshall), sparse (Johnson), or auto.
    #[arg(long, value_name = "KIND")]
    engine: Option<EngineKind>,

    /// Decimal digits per score.
    #[arg(long, value_name = "DIGITS")]
    precision: Option<usize>,

    /// Config file to use instead of ./between.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit diagnostics and errors as JSON.
    #[arg(long)]
    json: bool,

    /// Emit a per-stage timing report to stderr.
    #[arg(long)]
    timing: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }

    /// Apply command-line overrides on top of the file-based config.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(kind) = self.engine {
            config.engine.kind = kind;
        }
        if let Some(precision) = self.precision {
            config.output.precision = precision;
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BETWEEN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "between=debug,info"
        } else {
            "between=info,warn"
        })
    });

    let format = env::var("BETWEEN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir().context("Failed to resolve current directory")?;
    let mut config = resolve_config(&project_root, cli.config.as_deref())
        .context(ErrorCode::ConfigParseError)?;
    cli.apply_overrides(&mut config);
    config.validate().context(ErrorCode::ConfigParseError)?;
    debug!(?config, "configuration resolved");

    let mut rendered = Ok(());
    let centrality = pipeline::run_with(&cli.input, &cli.output, &config, |centrality, elapsed| {
        let diagnostics =
            RunDiagnostics::new(elapsed, PEAK_ALLOC.peak_usage(), centrality, &cli.output);
        rendered = output::render_diagnostics(cli.output_mode(), &diagnostics);
    })?;
    rendered?;

    debug!(
        predecessor_entries = centrality.predecessor_entries,
        output = %cli.output.display(),
        "scores written"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let result = run(&cli);

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            if cli.json {
                eprintln!("{}", report.to_json());
            }
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = CliError::from_anyhow(&err);
            if output::render_error(cli.output_mode(), &error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
