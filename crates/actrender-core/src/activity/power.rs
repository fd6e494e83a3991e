//! Power management: CPU frequency, fans, temperature and voltage sensors.
//!
//! Except for the weighted frequency these are gauges read from the current
//! sample alone. Sensors lay out differently per dialect: delimited lines
//! lead with the device name and sensor number, tabular labels name only the
//! sensor.

use std::io::{self, Write};

use super::{Pass, emit};
use crate::dialect::Dialect;
use crate::render::{Field, FieldRenderer};
use crate::sample::{FreqState, Sample};
use crate::template::{DualText, TemplateArgs};

pub(super) fn render_cpufreq<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    for (i, &freq) in current.cpufreq.iter().enumerate() {
        if !pass.options.cpus.contains(i) {
            continue;
        }
        let mhz = freq as f64 / 100.0;
        let field = if i == 0 {
            Field::rate(DualText::new("all\tMHz", "-1"), mhz)
        } else {
            Field::rate(DualText::new("cpu{}\tMHz", "{}"), mhz)
                .args(TemplateArgs::int(i as u64 - 1))
        };
        emit(r, pass.prefix, &[field])?;
    }
    Ok(())
}

/// Average frequency in MHz, weighted by the ticks spent in each state
/// between `prev` and `curr`. Zero when no time was accounted.
fn weighted_mhz(prev: &[FreqState], curr: &[FreqState]) -> f64 {
    let mut ticks = 0u64;
    let mut weighted = 0.0;
    for (k, state) in curr.iter().take_while(|s| s.freq != 0).enumerate() {
        let before = prev.get(k).map_or(0, |p| p.time_in_state);
        let spent = state.time_in_state.saturating_sub(before);
        weighted += (state.freq / 1000) as f64 * spent as f64;
        ticks = ticks.saturating_add(spent);
    }
    if ticks == 0 { 0.0 } else { weighted / ticks as f64 }
}

pub(super) fn render_wghfreq<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    for (i, curr) in current.wghfreq.iter().enumerate() {
        if !pass.options.cpus.contains(i) {
            continue;
        }
        let Some(prev) = pass.previous.wghfreq.get(i) else {
            continue;
        };
        let mhz = weighted_mhz(prev, curr);
        let field = if i == 0 {
            Field::rate(DualText::new("all\twghMHz", "-1"), mhz)
        } else {
            Field::rate(DualText::new("cpu{}\twghMHz", "{}"), mhz)
                .args(TemplateArgs::int(i as u64 - 1))
        };
        emit(r, pass.prefix, &[field])?;
    }
    Ok(())
}

pub(super) fn render_fan<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    for (i, fan) in current.fan.iter().enumerate() {
        let number = i as u64 + 1;
        let drpm = fan.rpm - fan.rpm_min;
        match r.dialect() {
            Dialect::Delimited => emit(
                r,
                pass.prefix,
                &[
                    Field::int(DualText::delimited("{}"), number)
                        .args(TemplateArgs::text(&fan.device)),
                    Field::rate(DualText::none(), fan.rpm),
                    Field::rate(DualText::none(), drpm),
                ],
            )?,
            Dialect::Tabular => {
                let n = TemplateArgs::int(number);
                emit(
                    r,
                    pass.prefix,
                    &[
                        Field::rate("fan{}\trpm", fan.rpm).args(n),
                        Field::rate("fan{}\tdrpm", drpm).args(n),
                    ],
                )?
            }
        }
    }
    Ok(())
}

pub(super) fn render_temp<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    for (i, sensor) in current.temp.iter().enumerate() {
        let number = i as u64 + 1;
        let range = sensor.temp_max - sensor.temp_min;
        let share = if range != 0.0 {
            (sensor.temp - sensor.temp_min) / range * 100.0
        } else {
            0.0
        };
        match r.dialect() {
            Dialect::Delimited => emit(
                r,
                pass.prefix,
                &[
                    Field::int(DualText::delimited("{}"), number)
                        .args(TemplateArgs::text(&sensor.device)),
                    Field::rate(DualText::none(), sensor.temp),
                    Field::rate(DualText::none(), share),
                ],
            )?,
            Dialect::Tabular => {
                let n = TemplateArgs::int(number);
                emit(
                    r,
                    pass.prefix,
                    &[
                        Field::rate("temp{}\tdegC", sensor.temp).args(n),
                        Field::rate("temp{}\t%temp", share).args(n),
                    ],
                )?
            }
        }
    }
    Ok(())
}

/// Voltage inputs, numbered from 0.
pub(super) fn render_voltage<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    for (i, input) in current.voltage.iter().enumerate() {
        let range = input.volts_max - input.volts_min;
        let share = if range != 0.0 {
            (input.volts - input.volts_min) / range * 100.0
        } else {
            0.0
        };
        match r.dialect() {
            Dialect::Delimited => emit(
                r,
                pass.prefix,
                &[
                    Field::int(DualText::delimited("{}"), i as u64)
                        .args(TemplateArgs::text(&input.device)),
                    Field::rate(DualText::none(), input.volts),
                    Field::rate(DualText::none(), share),
                ],
            )?,
            Dialect::Tabular => {
                let n = TemplateArgs::int(i as u64);
                emit(
                    r,
                    pass.prefix,
                    &[
                        Field::rate("in{}\tinV", input.volts).args(n),
                        Field::rate("in{}\t%in", share).args(n),
                    ],
                )?
            }
        }
    }
    Ok(())
}
