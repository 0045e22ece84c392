//! Daily timezone-aware trigger
//!
//! The scheduler owns a fire time and a timezone and invokes a single job
//! callback once per day. It knows nothing about the pipeline, so the same
//! pipeline entry point serves the timer, the HTTP pull path and tests.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::future::Future;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    fire_time: NaiveTime,
    tz: Tz,
}

impl Scheduler {
    pub fn new(fire_time: NaiveTime, tz: Tz) -> Self {
        Scheduler { fire_time, tz }
    }

    /// Next occurrence of the fire time at or after `now`, as a UTC instant.
    /// Ambiguous local times (daylight-saving fall-back) resolve to the
    /// earlier instant; skipped local times (spring-forward) shift one hour
    /// later.
    pub fn next_fire(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.tz);
        let mut date = local_now.date_naive();
        if local_now.time() >= self.fire_time {
            date = date.succ_opt().expect("date within chrono range");
        }

        loop {
            let naive = date.and_time(self.fire_time);
            let resolved = match self.tz.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Some(dt),
                LocalResult::Ambiguous(earlier, _) => Some(earlier),
                LocalResult::None => self
                    .tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest(),
            };
            match resolved {
                Some(dt) if dt.with_timezone(&Utc) > now => return dt.with_timezone(&Utc),
                _ => date = date.succ_opt().expect("date within chrono range"),
            }
        }
    }

    /// Run forever, firing `job` once per scheduled occurrence. Each fire is
    /// spawned so a slow run never delays or blocks the next one; runs are
    /// stateless and independent.
    pub async fn run<F, Fut>(self, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            let next = self.next_fire(Utc::now());
            info!(next = %next.with_timezone(&self.tz), "Next scheduled notification");

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            tokio::spawn(job());
        }
    }
}
