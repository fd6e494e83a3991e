//! Rate arithmetic with defined results for degenerate inputs.
//!
//! None of these divide by zero: an empty interval or an empty whole yields
//! `0.0`. Cumulative counters that go backwards (reset, wrap) yield a zero
//! difference rather than a huge one.

/// Events per second between two cumulative counter readings taken `itv`
/// ticks apart on a host running at `hz` ticks per second.
pub fn per_second(prev: u64, curr: u64, itv: u64, hz: u64) -> f64 {
    if itv == 0 {
        return 0.0;
    }
    curr.saturating_sub(prev) as f64 / itv as f64 * hz as f64
}

/// Like [`per_second`] for gauges, where a decrease is meaningful.
pub fn per_second_signed(prev: f64, curr: f64, itv: u64, hz: u64) -> f64 {
    if itv == 0 {
        return 0.0;
    }
    (curr - prev) / itv as f64 * hz as f64
}

/// Share of `itv` ticks covered by the counter's advance, in percent.
pub fn percent(prev: u64, curr: u64, itv: u64) -> f64 {
    if itv == 0 {
        return 0.0;
    }
    curr.saturating_sub(prev) as f64 / itv as f64 * 100.0
}

/// `part / whole` in percent.
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}
