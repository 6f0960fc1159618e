use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod config;
mod trigger;

use config::Config;

#[derive(Parser)]
#[command(name = "edgelog", about = "Forwards zone request logs to a log collector")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Fetch and forward a single window of logs
    Run(RunArgs),
    /// Fetch and forward a window of logs on a fixed interval
    Schedule(ScheduleArgs),
}

#[derive(Args)]
struct RunArgs {
    /// YAML config file. Falls back to environment variables when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    run: RunArgs,
    /// Seconds between invocations
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        CliCommand::Run(args) => args.config.as_deref(),
        CliCommand::Schedule(args) => args.run.config.as_deref(),
    };

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _logging = match shared::logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(metrics_config) = &config.metrics {
        match shared::metrics::init(metrics_config) {
            Ok(()) => shared::metrics_defs::describe_all(forwarder::metrics_defs::ALL_METRICS),
            Err(e) => tracing::warn!(error = %e, "Metrics disabled"),
        }
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        CliCommand::Run(_) => match rt.block_on(trigger::run_once(&config.forwarder)) {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        },
        CliCommand::Schedule(args) => {
            let period = Duration::from_secs(args.interval_secs.max(1));
            rt.block_on(trigger::run_schedule(&config.forwarder, period, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
            }));
            ExitCode::SUCCESS
        }
    }
}
