//! Tick source: fixed-rate ticks for hosts without their own update loop.
//!
//! Hosts that already run a fixed-rate loop call [`Heartbeat::tick`] from it.
//! Others create a [`TickSource`] and hand it the heartbeat with
//! [`TickSource::drive`] on the update thread. A driver that falls behind
//! skips ticks instead of bursting to catch up, so the heartbeat's tick
//! counter measures ticks run, not wall time.

use super::heartbeat::{Heartbeat, TickReport};
use crate::config::Config;
use crate::error::Result;
use crossbeam_channel::{tick, Receiver};
use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed-rate timer driving a [`Heartbeat`].
#[derive(Debug)]
pub struct TickSource {
    interval: Duration,
    fired: Receiver<Instant>,
}

impl TickSource {
    /// Fire every `interval`, starting one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            fired: tick(interval),
        }
    }

    /// Fire at the period from a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tick_interval())
    }

    /// Period between ticks.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// The raw timer channel, for hosts that `select!` over it alongside
    /// their own events.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Instant> {
        &self.fired
    }

    /// Run one heartbeat tick per timer event until `keep_going` returns
    /// `false` for a tick's report.
    ///
    /// Must be called on the heartbeat's update thread. Returns the number
    /// of ticks run; fails as soon as a tick fails, e.g. with
    /// [`Error::NotRunning`](crate::Error::NotRunning) once the heartbeat stops.
    pub fn drive<F>(&self, heartbeat: &Heartbeat, mut keep_going: F) -> Result<u64>
    where
        F: FnMut(&TickReport) -> bool,
    {
        let mut driven = 0;
        let mut previous: Option<Instant> = None;

        for fired in &self.fired {
            if let Some(previous) = previous {
                let behind = self.missed_between(previous, fired);
                if behind > 0 {
                    debug!(skipped = behind, tick = heartbeat.current_tick(), "tick source fell behind");
                }
            }
            previous = Some(fired);

            let report = heartbeat.tick()?;
            driven += 1;
            if !keep_going(&report) {
                break;
            }
        }
        Ok(driven)
    }

    /// Whole intervals skipped between two consecutive timer events.
    fn missed_between(&self, previous: Instant, fired: Instant) -> u64 {
        let gap = fired.saturating_duration_since(previous).as_nanos();
        let period = self.interval.as_nanos().max(1);
        u64::try_from(gap / period).map_or(u64::MAX, |whole| whole.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_drive_runs_until_told_to_stop() {
        let heartbeat = Heartbeat::new();
        heartbeat.start().unwrap();
        let source = TickSource::new(Duration::from_millis(1));

        let mut seen = Vec::new();
        let driven = source
            .drive(&heartbeat, |report| {
                seen.push(report.tick);
                report.tick < 3
            })
            .unwrap();

        assert_eq!(driven, 3);
        assert_eq!(seen, [1, 2, 3]);
        assert_eq!(heartbeat.current_tick(), 3);
    }

    #[test]
    fn test_drive_stopped_heartbeat_fails() {
        let heartbeat = Heartbeat::new();
        let source = TickSource::new(Duration::from_millis(1));

        let result = source.drive(&heartbeat, |_| true);
        assert_eq!(result, Err(Error::NotRunning));
        assert_eq!(heartbeat.current_tick(), 0);
    }

    #[test]
    fn test_missed_between_counts_whole_intervals() {
        let source = TickSource::new(Duration::from_millis(10));
        let start = Instant::now();

        assert_eq!(source.missed_between(start, start + Duration::from_millis(10)), 0);
        assert_eq!(source.missed_between(start, start + Duration::from_millis(35)), 2);
        assert_eq!(source.missed_between(start + Duration::from_millis(5), start), 0);
    }

    #[test]
    fn test_from_config_uses_tick_interval() {
        let config = Config {
            tick_interval_ms: 25,
            ..Config::default()
        };
        assert_eq!(TickSource::from_config(&config).interval(), Duration::from_millis(25));
    }
}
