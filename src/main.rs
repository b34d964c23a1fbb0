//! @ai:module:intent CLI for the OBS benchmark smoke-test harness
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use obs_smoke::{
    benchconf, build,
    build::BuildFailure,
    error::HarnessError,
    interrupt::InterruptFlag,
    process::SystemRunner,
    report::Reporter,
    settings::SmokeConfig,
    smoke,
    workspace::RunGuard,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "obs-smoke")]
#[command(about = "Two-stage build and smoke-test harness for the OBS C benchmark")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every variant, smoke-test the cached binaries, and report
    Run {
        /// Path to harness settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Benchmark run duration in seconds
        #[arg(short, long)]
        duration: Option<u32>,

        /// Workload IDs to exercise (comma-separated)
        #[arg(long)]
        cases: Option<String>,

        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Write the default settings file
    Init {
        /// Output path for the settings file
        #[arg(short, long, default_value = "smoke.toml")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    // Bare invocation runs the harness with defaults.
    let command = cli.command.unwrap_or(Commands::Run {
        config: None,
        duration: None,
        cases: None,
        json: None,
    });

    let outcome = match command {
        Commands::Run {
            config,
            duration,
            cases,
            json,
        } => run_harness(RunArgs {
            config,
            duration,
            cases,
            json,
        }),
        Commands::Init { output } => init_settings(output).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    duration: Option<u32>,
    cases: Option<String>,
    json: Option<PathBuf>,
}

/// @ai:intent Run both stages and report; true means every record passed
/// @ai:effects io, fs:write
fn run_harness(args: RunArgs) -> Result<bool> {
    let mut settings = SmokeConfig::load_or_default(args.config)?;

    if let Some(duration) = args.duration {
        settings.run.duration_secs = duration;
    }

    if let Some(cases) = args.cases {
        settings.run.workloads = parse_cases(&cases)?;
    }

    let interrupt = InterruptFlag::new();
    interrupt.install()?;

    let work_dir = std::env::current_dir()?;
    let runner = SystemRunner::new();

    // Teardown (config restore + cache removal) runs when this guard
    // drops, on every path out of this function.
    let _guard = RunGuard::acquire(&runner, &settings)?;

    benchconf::rewrite_for_run(
        &settings.paths.bench_config,
        settings.run.duration_secs,
        &settings.paths.test_data,
    )?;

    tracing::info!(">>> Stage 1: Compilation Check (Fail-Fast)");

    if let Err(failure) = build::compile_all(
        &runner,
        build::BUILD_TASKS,
        &work_dir,
        &settings.paths.cache_dir,
    ) {
        if let BuildFailure::CommandFailed { ref log_tail, .. } = failure {
            println!("Error Log:\n{log_tail}");
        }

        tracing::error!("Aborting: {failure}");
        return Ok(false);
    }

    if interrupt.is_set() {
        tracing::warn!("Interrupted; tearing down");
        return Ok(false);
    }

    tracing::info!(">>> Stage 2: Smoke Testing (Mock -> Std -> Mock_ASan -> ASan)");

    let records = match smoke::run_all(
        &runner,
        build::BUILD_TASKS,
        &settings.run.workloads,
        &work_dir,
        &settings.paths.cache_dir,
        &settings.paths.lib_dir,
        &interrupt,
    ) {
        Ok(records) => records,
        Err(HarnessError::Interrupted) => {
            tracing::warn!("Interrupted; tearing down");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let reporter = Reporter::new();
    reporter.print_summary(&records);

    if let Some(path) = args.json {
        reporter.write_json(&records, &path)?;
    }

    Ok(reporter.all_passed(&records))
}

/// @ai:intent Write the default settings file
/// @ai:effects fs:write
fn init_settings(output: PathBuf) -> Result<()> {
    let settings = SmokeConfig::default();
    settings.save(&output)?;
    println!("Settings saved to {}", output.display());
    Ok(())
}

/// @ai:intent Parse a comma-separated workload list
/// @ai:effects pure
fn parse_cases(cases: &str) -> Result<Vec<u32>> {
    cases
        .split(',')
        .map(|c| {
            let trimmed = c.trim();
            trimmed
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("invalid workload id: {trimmed:?}"))
        })
        .collect()
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("obs_smoke=info".parse()?),
        )
        .init();
    Ok(())
}
