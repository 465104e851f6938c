use crate::apis::nccpa::NccpaRegistry;
use crate::apis::twilio::TwilioClient;
use crate::app::notifier::Notifier;
use crate::app::poller::{CheckOutcome, StatusPoller};
use crate::app::ports::NotifierPort;
use crate::app::watch::Watcher;
use crate::common::error::{CheckerError, Result};
use crate::config::Config;
use crate::infra::dry_run_notifier::DryRunNotifier;
use crate::infra::http_client::build_client;
use std::process::ExitCode;
use std::sync::Arc;

/// How the process should end after a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    Certified,
    /// Only reachable with `--once`.
    NotYet,
}

impl From<RunExit> for ExitCode {
    fn from(exit: RunExit) -> Self {
        match exit {
            RunExit::Certified => ExitCode::SUCCESS,
            RunExit::NotYet => ExitCode::from(2),
        }
    }
}

/// Wires the registry client, notifier and schedule described by `config`.
pub fn build_watcher(config: &Config) -> Result<Watcher> {
    let client = build_client(config.request_timeout)?;
    let registry = Arc::new(NccpaRegistry::with_base_url(client.clone(), &config.registry_base_url));

    let port: Arc<dyn NotifierPort> = if config.dry_run {
        Arc::new(DryRunNotifier)
    } else {
        let credentials = config.notifier.credentials.clone().ok_or_else(|| {
            CheckerError::Config("Twilio credentials are required unless --dry-run is set".into())
        })?;
        Arc::new(TwilioClient::with_api_base(client, credentials, &config.notifier.api_base))
    };
    let notifier = Notifier::new(port, &config.notifier.from, &config.notifier.to);

    let poller = StatusPoller::new(registry, notifier, config.lookup.clone());
    Ok(Watcher::new(poller, config.schedule.clone(), config.policy))
}

/// Runs the checker to completion.
pub async fn run(config: &Config) -> Result<RunExit> {
    let watcher = build_watcher(config)?;
    let outcome = if config.run_once {
        watcher.run_once().await?
    } else {
        watcher.run().await?
    };
    Ok(match outcome {
        CheckOutcome::Certified { .. } => RunExit::Certified,
        CheckOutcome::NotYet { .. } => RunExit::NotYet,
    })
}
