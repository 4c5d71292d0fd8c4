use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use crate::foundation::error::{DaybreakError, DaybreakResult};

/// Longest single sleep while waiting for the next fire; wall-clock jumps are
/// noticed within this interval.
const MAX_NAP: Duration = Duration::from_secs(60);

/// Local time of day at which the job fires once per calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
}

impl DailyTrigger {
    /// Trigger at `at` local time.
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Parse `HH:MM` (24-hour).
    pub fn parse(s: &str) -> DaybreakResult<Self> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self::new)
            .map_err(|e| DaybreakError::config(format!("send time '{s}' is not HH:MM: {e}")))
    }

    /// Configured time of day.
    pub fn time(&self) -> NaiveTime {
        self.at
    }

    /// First fire strictly after `now`: today if the time is still ahead, otherwise tomorrow.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today > now {
            today
        } else {
            today + TimeDelta::days(1)
        }
    }

    /// Next fire as a local instant.
    pub fn next_local_fire(&self, now: DateTime<Local>) -> DateTime<Local> {
        let naive = self.next_fire_after(now.naive_local());
        resolve_local(&Local, naive)
    }
}

impl std::fmt::Display for DailyTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.at.format("%H:%M"))
    }
}

/// Map a wall-clock time to an instant in `tz`.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times inside a
/// gap (clocks going forward) move to the first valid minute after the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = naive;
    // Real-world gaps are at most a few hours.
    for _ in 0..(48 * 60) {
        if let Some(t) = tz.from_local_datetime(&candidate).earliest() {
            return t;
        }
        candidate += TimeDelta::minutes(1);
    }
    tz.from_utc_datetime(&naive)
}

/// Run `job` once per day at `trigger`, forever.
///
/// With `run_now`, the job also runs once immediately. Runs never overlap:
/// the next fire is computed only after the previous run returns, so a run
/// that overshoots the trigger time does not fire twice.
pub fn run_daily<F>(trigger: DailyTrigger, run_now: bool, mut job: F) -> !
where
    F: FnMut(),
{
    if run_now {
        tracing::info!("running job immediately");
        job();
    }

    loop {
        let fire = trigger.next_local_fire(Local::now());
        tracing::info!(next = %fire.format("%Y-%m-%d %H:%M %Z"), "waiting for next run");
        sleep_until(fire);
        job();
    }
}

fn sleep_until(fire: DateTime<Local>) {
    loop {
        let remaining = fire.signed_duration_since(Local::now());
        let Ok(remaining) = remaining.to_std() else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        std::thread::sleep(remaining.min(MAX_NAP));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/daily.rs"]
mod tests;
