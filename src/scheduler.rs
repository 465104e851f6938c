//! Daily "run at the next due time" scheduling.
//!
//! A [`DailySchedule`] is an ordered set of wall-clock times in one timezone.
//! [`run_daily`] sleeps until the next of those times, runs a job, and repeats
//! until the job asks to stop or fails. Jobs never overlap: the next due time is
//! only computed after the previous run finished, so a run that overshoots a slot
//! simply skips it.

use crate::common::error::{CheckerError, Result};
use chrono::{DateTime, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{debug, info};

// A DST gap can only swallow times on a single day, so a week always finds one.
const MAX_LOOKAHEAD_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct DailySchedule {
    times: BTreeSet<NaiveTime>,
    timezone: Tz,
}

impl DailySchedule {
    pub fn new(times: impl IntoIterator<Item = NaiveTime>, timezone: Tz) -> Result<Self> {
        let times: BTreeSet<NaiveTime> = times.into_iter().collect();
        if times.is_empty() {
            return Err(CheckerError::Schedule("at least one check time is required".into()));
        }
        Ok(Self { times, timezone })
    }

    /// Parses a comma separated list like `"06:55,07:00"` and an IANA timezone name.
    pub fn parse(times: &str, timezone: &str) -> Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|e| CheckerError::Schedule(format!("unknown timezone '{}': {}", timezone, e)))?;
        Self::new(parse_times(times)?, tz)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn times(&self) -> impl Iterator<Item = &NaiveTime> {
        self.times.iter()
    }

    /// Earliest scheduled instant strictly after `after`.
    ///
    /// Local times that do not exist (spring-forward gap) are skipped for that day;
    /// ambiguous ones (fall-back overlap) fire at the earlier instant.
    pub fn next_due(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut day = after.with_timezone(&self.timezone).date_naive();
        for _ in 0..=MAX_LOOKAHEAD_DAYS {
            for time in &self.times {
                let local = match self.timezone.from_local_datetime(&day.and_time(*time)) {
                    LocalResult::Single(dt) => dt,
                    LocalResult::Ambiguous(earliest, _) => earliest,
                    LocalResult::None => continue,
                };
                let candidate = local.with_timezone(&Utc);
                if candidate > after {
                    return Some(candidate);
                }
            }
            day = day.succ_opt()?;
        }
        None
    }

    /// Next slot after `now`, never at or before `last_due`.
    ///
    /// The wall clock can step back while we sleep; the slot that just ran is
    /// never handed out again.
    pub fn next_due_since(&self, now: DateTime<Utc>, last_due: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        let floor = last_due.map_or(now, |last| last.max(now));
        self.next_due(floor)
    }
}

/// Parses `HH:MM` (or `HH:MM:SS`) entries separated by commas.
pub fn parse_times(raw: &str) -> Result<Vec<NaiveTime>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map_err(|e| CheckerError::Schedule(format!("invalid check time '{}': {}", s, e)))
        })
        .collect()
}

/// What a scheduled job wants the runner to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick<T> {
    Continue,
    Stop(T),
}

/// Runs `job` at every due time of `schedule` until it returns [`Tick::Stop`] or an error.
pub async fn run_daily<T, F, Fut>(schedule: &DailySchedule, mut job: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Tick<T>>>,
{
    let mut last_due = None;
    loop {
        let now = Utc::now();
        let due = schedule.next_due_since(now, last_due).ok_or_else(|| {
            CheckerError::Schedule("no upcoming check time could be computed".into())
        })?;
        info!(
            next_check = %due.with_timezone(&schedule.timezone()),
            "Waiting for next scheduled check"
        );

        let wait = (due - now).to_std().unwrap_or_default();
        debug!(wait_secs = wait.as_secs(), "Sleeping");
        tokio::time::sleep(wait).await;
        last_due = Some(due);

        if let Tick::Stop(value) = job().await? {
            return Ok(value);
        }
    }
}
