//! Drives the poller: one check at startup, then one per scheduled slot, until
//! the candidate is certified or a check fails in a way the policy deems fatal.

use crate::app::poller::{CheckOutcome, StatusPoller};
use crate::common::error::Result;
use crate::scheduler::{run_daily, DailySchedule, Tick};
use std::fmt;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How lookup errors are treated by the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Every lookup error ends the process.
    #[default]
    FailFast,
    /// Transport errors and 5xx answers are logged and retried at the next slot.
    RetryTransient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Checking,
    Certified,
    Failed,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatchState::Idle => "idle",
            WatchState::Checking => "checking",
            WatchState::Certified => "certified",
            WatchState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

pub struct Watcher {
    poller: StatusPoller,
    schedule: DailySchedule,
    policy: FailurePolicy,
}

impl Watcher {
    pub fn new(poller: StatusPoller, schedule: DailySchedule, policy: FailurePolicy) -> Self {
        Self { poller, schedule, policy }
    }

    /// Checks now, then on every scheduled slot. Returns only once certified or on a fatal error.
    pub async fn run(&self) -> Result<CheckOutcome> {
        info!(
            candidate = %self.poller.params().describe(),
            timezone = %self.schedule.timezone(),
            policy = ?self.policy,
            "Starting NCCPA checker"
        );

        // Immediate check so a wrong ID or name fails right away.
        if let Tick::Stop(outcome) = self.tick().await? {
            return Ok(outcome);
        }
        run_daily(&self.schedule, || self.tick()).await
    }

    /// A single check with no scheduling, for use under cron or similar.
    pub async fn run_once(&self) -> Result<CheckOutcome> {
        let check_id = Uuid::new_v4();
        self.poller
            .check()
            .instrument(info_span!("check", %check_id))
            .await
    }

    async fn tick(&self) -> Result<Tick<CheckOutcome>> {
        let check_id = Uuid::new_v4();
        let span = info_span!("check", %check_id);
        debug!(parent: &span, from = %WatchState::Idle, to = %WatchState::Checking, "state");

        let next = match self.poller.check().instrument(span.clone()).await {
            Ok(outcome) if outcome.is_certified() => (WatchState::Certified, Ok(Tick::Stop(outcome))),
            Ok(_) => (WatchState::Idle, Ok(Tick::Continue)),
            Err(e) if self.policy == FailurePolicy::RetryTransient && e.is_transient() => {
                warn!(parent: &span, error = %e, "Transient lookup failure, retrying at the next scheduled check");
                (WatchState::Idle, Ok(Tick::Continue))
            }
            Err(e) => (WatchState::Failed, Err(e)),
        };

        debug!(parent: &span, from = %WatchState::Checking, to = %next.0, "state");
        next.1
    }
}
