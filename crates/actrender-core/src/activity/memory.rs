//! Memory, swap space and huge pages.

use std::io::{self, Write};

use super::{Pass, emit};
use crate::rate::{per_second_signed, ratio_percent};
use crate::render::{Field, FieldRenderer};
use crate::sample::Sample;

/// Page-rate changes of free, buffer and cache memory. These are gauges, so
/// rates can be negative.
pub(super) fn render_memory<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.memory, current.memory) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let page_kb = iv.page_size_kb.max(1) as f64;
    let pages = |p: u64, c: u64| {
        per_second_signed(p as f64 / page_kb, c as f64 / page_kb, iv.itv, iv.hz)
    };
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tfrmpg/s", pages(prev.frmkb, curr.frmkb)),
            Field::rate("-\tbufpg/s", pages(prev.bufkb, curr.bufkb)),
            Field::rate("-\tcampg/s", pages(prev.camkb, curr.camkb)),
        ],
    )
}

pub(super) fn render_mem_usage<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(m) = current.memory else {
        return Ok(());
    };
    let used = m.tlmkb.saturating_sub(m.frmkb);
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\tkbmemfree", m.frmkb),
            Field::int("-\tkbmemused", used),
            Field::rate("-\t%memused", ratio_percent(used as f64, m.tlmkb as f64)),
            Field::int("-\tkbbuffers", m.bufkb),
            Field::int("-\tkbcached", m.camkb),
            Field::int("-\tkbcommit", m.comkb),
            Field::rate(
                "-\t%commit",
                ratio_percent(m.comkb as f64, m.tlmkb.saturating_add(m.tlskb) as f64),
            ),
        ],
    )
}

pub(super) fn render_swap_usage<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(m) = current.memory else {
        return Ok(());
    };
    let used = m.tlskb.saturating_sub(m.frskb);
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\tkbswpfree", m.frskb),
            Field::int("-\tkbswpused", used),
            Field::rate("-\t%swpused", ratio_percent(used as f64, m.tlskb as f64)),
            Field::int("-\tkbswpcad", m.caskb),
            Field::rate("-\t%swpcad", ratio_percent(m.caskb as f64, used as f64)),
        ],
    )
}

pub(super) fn render_huge<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(h) = current.huge else {
        return Ok(());
    };
    let used = h.tlhkb.saturating_sub(h.frhkb);
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\tkbhugfree", h.frhkb),
            Field::int("-\tkbhugused", used),
            Field::rate("-\t%hugused", ratio_percent(used as f64, h.tlhkb as f64)),
        ],
    )
}
