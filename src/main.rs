use anyhow::Context;
use nccpa_checker::bootstrap::{self, RunExit};
use nccpa_checker::config::{load_env_file, Cli, Config};
use nccpa_checker::observability::{self, metrics};
use std::process::ExitCode;
use tracing::{error, info};

fn prepare(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::from_cli(cli, |key| std::env::var(key).ok())
        .context("Invalid configuration")?;
    if let Some(addr) = config.metrics_addr {
        metrics::init(addr).map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args(std::env::args());

    // Load the env file first so RUST_LOG and NCCPA_LOG_DIR from it apply to logging.
    let env_loaded = load_env_file(&cli.env_file);
    let _guard = observability::init_logging();

    if let Err(e) = env_loaded {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let config = match prepare(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match bootstrap::run(&config).await {
        Ok(exit) => {
            match exit {
                RunExit::Certified => info!("Certification detected, shutting down"),
                RunExit::NotYet => info!("Not certified yet, exiting after single check"),
            }
            exit.into()
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
