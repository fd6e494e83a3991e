//! Single-entity system activities plus interrupts.

use std::io::{self, Write};

use super::{Pass, emit};
use crate::rate::{per_second, ratio_percent};
use crate::render::{Field, FieldRenderer};
use crate::sample::Sample;
use crate::template::{DualText, TemplateArgs};

pub(super) fn render_pcsw<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.pcsw, current.pcsw) else {
        return Ok(());
    };
    let iv = pass.intervals;
    emit(
        r,
        pass.prefix,
        &[
            Field::rate(
                "-\tproc/s",
                per_second(prev.processes, curr.processes, iv.itv, iv.hz),
            ),
            Field::rate(
                "-\tcswch/s",
                per_second(prev.context_switch, curr.context_switch, iv.itv, iv.hz),
            ),
        ],
    )
}

/// Interrupt 0 in the sample is the sum; the rest are numbered from zero.
pub(super) fn render_irq<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let iv = pass.intervals;
    for (i, &curr) in current.irq.iter().enumerate() {
        if !pass.options.irqs.contains(i) {
            continue;
        }
        let Some(&prev) = pass.previous.irq.get(i) else {
            continue;
        };
        let value = per_second(prev, curr, iv.itv, iv.hz);
        let field = if i == 0 {
            Field::rate(DualText::new("sum\tintr/s", "-1"), value)
        } else {
            Field::rate(DualText::new("i{:03}\tintr/s", "{}"), value)
                .args(TemplateArgs::int(i as u64 - 1))
        };
        emit(r, pass.prefix, &[field])?;
    }
    Ok(())
}

pub(super) fn render_swap<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.swap, current.swap) else {
        return Ok(());
    };
    let iv = pass.intervals;
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tpswpin/s", per_second(prev.pswpin, curr.pswpin, iv.itv, iv.hz)),
            Field::rate("-\tpswpout/s", per_second(prev.pswpout, curr.pswpout, iv.itv, iv.hz)),
        ],
    )
}

pub(super) fn render_paging<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.paging, current.paging) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);

    let scanned = curr
        .pgscan_kswapd
        .saturating_add(curr.pgscan_direct)
        .saturating_sub(prev.pgscan_kswapd.saturating_add(prev.pgscan_direct));
    let vmeff = ratio_percent(
        curr.pgsteal.saturating_sub(prev.pgsteal) as f64,
        scanned as f64,
    );

    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\tpgpgin/s", rate(prev.pgpgin, curr.pgpgin)),
            Field::rate("-\tpgpgout/s", rate(prev.pgpgout, curr.pgpgout)),
            Field::rate("-\tfault/s", rate(prev.pgfault, curr.pgfault)),
            Field::rate("-\tmajflt/s", rate(prev.pgmajfault, curr.pgmajfault)),
            Field::rate("-\tpgfree/s", rate(prev.pgfree, curr.pgfree)),
            Field::rate("-\tpgscank/s", rate(prev.pgscan_kswapd, curr.pgscan_kswapd)),
            Field::rate("-\tpgscand/s", rate(prev.pgscan_direct, curr.pgscan_direct)),
            Field::rate("-\tpgsteal/s", rate(prev.pgsteal, curr.pgsteal)),
            Field::rate("-\t%vmeff", vmeff),
        ],
    )
}

pub(super) fn render_io<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let (Some(prev), Some(curr)) = (pass.previous.io, current.io) else {
        return Ok(());
    };
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
    emit(
        r,
        pass.prefix,
        &[
            Field::rate("-\ttps", rate(prev.dk_drive, curr.dk_drive)),
            Field::rate("-\trtps", rate(prev.dk_drive_rio, curr.dk_drive_rio)),
            Field::rate("-\twtps", rate(prev.dk_drive_wio, curr.dk_drive_wio)),
            Field::rate("-\tbread/s", rate(prev.dk_drive_rblk, curr.dk_drive_rblk)),
            Field::rate("-\tbwrtn/s", rate(prev.dk_drive_wblk, curr.dk_drive_wblk)),
        ],
    )
}

/// Kernel table sizes are gauges of the current sample only.
pub(super) fn render_ktables<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(curr) = current.ktables else {
        return Ok(());
    };
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\tdentunusd", curr.dentry_stat),
            Field::int("-\tfile-nr", curr.file_used),
            Field::int("-\tinode-nr", curr.inode_used),
            Field::int("-\tpty-nr", curr.pty_nr),
        ],
    )
}

pub(super) fn render_queue<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let Some(curr) = current.queue else {
        return Ok(());
    };
    emit(
        r,
        pass.prefix,
        &[
            Field::int("-\trunq-sz", curr.nr_running),
            Field::int("-\tplist-sz", curr.nr_threads),
            Field::rate("-\tldavg-1", curr.load_avg_1 as f64 / 100.0),
            Field::rate("-\tldavg-5", curr.load_avg_5 as f64 / 100.0),
            Field::rate("-\tldavg-15", curr.load_avg_15 as f64 / 100.0),
        ],
    )
}
