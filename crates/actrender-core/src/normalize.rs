//! Per-CPU interval normalization.
//!
//! A CPU's own counters tell how many ticks it actually accounted for during
//! an interval. That figure, not the system-wide interval, is the divisor for
//! its percentages. Two degenerate cases exist:
//!
//! - **offline**: the CPU was absent from the data source, so every counter
//!   in the current snapshot reads zero;
//! - **tickless**: the CPU is present but accounted no ticks at all.

use log::debug;

use crate::sample::CpuStats;

/// Effective divisor for one CPU over one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityInterval {
    /// Ticks elapsed for this CPU. Zero when offline or tickless.
    pub divisor: u64,
    pub offline: bool,
}

impl EntityInterval {
    pub fn is_tickless(&self) -> bool {
        self.divisor == 0 && !self.offline
    }

    /// Percentage of the interval spent between two counter readings.
    /// Zero whenever the divisor is zero.
    pub fn percent(&self, prev: u64, curr: u64) -> f64 {
        crate::rate::percent(prev, curr, self.divisor)
    }

    /// Idle percentage, with the fallbacks for a zero divisor: fully idle when
    /// the CPU was offline, zero when it was tickless. A counter that went
    /// backwards also reads zero.
    pub fn idle_percent(&self, prev: u64, curr: u64) -> f64 {
        if self.offline {
            100.0
        } else if self.divisor == 0 || curr < prev {
            0.0
        } else {
            self.percent(prev, curr)
        }
    }
}

/// Classify one CPU for the interval between `previous` and `current`.
///
/// An offline CPU's `current` snapshot is overwritten with `previous`, so the
/// next interval measures from the last real reading instead of from zero.
pub fn normalize(current: &mut CpuStats, previous: &CpuStats) -> EntityInterval {
    if current.total() == 0 {
        *current = *previous;
        debug!("cpu offline for interval, carrying previous counters forward");
        return EntityInterval {
            divisor: 0,
            offline: true,
        };
    }

    let divisor = current.total().saturating_sub(previous.total());
    if divisor == 0 {
        debug!("cpu tickless for interval");
    }
    EntityInterval {
        divisor,
        offline: false,
    }
}
