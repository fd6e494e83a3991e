//! CPU utilisation.

use std::io::{self, Write};

use log::debug;

use super::{CpuFields, Pass, emit, label};
use crate::normalize::{EntityInterval, normalize};
use crate::render::{Field, FieldRenderer};
use crate::sample::{CpuStats, Sample};
use crate::template::TemplateArgs;

/// Tabular labels of one metric: for the "all" row and for a numbered CPU.
type Labels = (&'static str, &'static str);

const USER: Labels = ("all\t%user", "cpu{}\t%user");
const USR: Labels = ("all\t%usr", "cpu{}\t%usr");
const NICE: Labels = ("all\t%nice", "cpu{}\t%nice");
const SYSTEM: Labels = ("all\t%system", "cpu{}\t%system");
const SYS: Labels = ("all\t%sys", "cpu{}\t%sys");
const IOWAIT: Labels = ("all\t%iowait", "cpu{}\t%iowait");
const STEAL: Labels = ("all\t%steal", "cpu{}\t%steal");
const IRQ: Labels = ("all\t%irq", "cpu{}\t%irq");
const SOFT: Labels = ("all\t%soft", "cpu{}\t%soft");
const GUEST: Labels = ("all\t%guest", "cpu{}\t%guest");
const IDLE: Labels = ("all\t%idle", "cpu{}\t%idle");

#[derive(Debug, Clone, Copy)]
enum Row {
    All,
    Cpu(u64),
}

impl Row {
    fn field(self, labels: Labels, first: bool, value: f64) -> Field<'static> {
        let (all, cpu) = labels;
        match self {
            Row::All => Field::rate(label(first, all, "-1"), value),
            Row::Cpu(n) => Field::rate(label(first, cpu, "{}"), value).args(TemplateArgs::int(n)),
        }
    }
}

pub(super) fn render_cpu<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let previous = &pass.previous.cpu;
    let options = pass.options;

    for (i, curr) in current.cpu.iter_mut().enumerate() {
        if !options.cpus.contains(i) {
            continue;
        }
        let Some(prev) = previous.get(i) else {
            debug!("cpu index {i} has no previous sample, skipped");
            continue;
        };

        if i == 0 {
            // The aggregate row is measured against the global interval and
            // is never offline.
            let interval = EntityInterval {
                divisor: pass.intervals.g_itv,
                offline: false,
            };
            render_row(r, pass.prefix, options.cpu_fields, Row::All, prev, curr, interval)?;
        } else {
            let interval = normalize(curr, prev);
            let row = Row::Cpu(i as u64 - 1);
            render_row(r, pass.prefix, options.cpu_fields, row, prev, curr, interval)?;
        }
    }
    Ok(())
}

fn render_row<W: Write>(
    r: &mut FieldRenderer<W>,
    prefix: &str,
    fields: CpuFields,
    row: Row,
    prev: &CpuStats,
    curr: &CpuStats,
    iv: EntityInterval,
) -> io::Result<()> {
    let mut metrics: Vec<(Labels, f64)> = match fields {
        CpuFields::Default => vec![
            (USER, iv.percent(prev.user, curr.user)),
            (NICE, iv.percent(prev.nice, curr.nice)),
            (
                SYSTEM,
                iv.percent(kernel_time(prev), kernel_time(curr)),
            ),
            (IOWAIT, iv.percent(prev.iowait, curr.iowait)),
            (STEAL, iv.percent(prev.steal, curr.steal)),
        ],
        CpuFields::All => vec![
            (
                USR,
                iv.percent(
                    prev.user.saturating_sub(prev.guest),
                    curr.user.saturating_sub(curr.guest),
                ),
            ),
            (NICE, iv.percent(prev.nice, curr.nice)),
            (SYS, iv.percent(prev.system, curr.system)),
            (IOWAIT, iv.percent(prev.iowait, curr.iowait)),
            (STEAL, iv.percent(prev.steal, curr.steal)),
            (IRQ, iv.percent(prev.hardirq, curr.hardirq)),
            (SOFT, iv.percent(prev.softirq, curr.softirq)),
            (GUEST, iv.percent(prev.guest, curr.guest)),
        ],
    };
    metrics.push((IDLE, iv.idle_percent(prev.idle, curr.idle)));

    let fields: Vec<Field<'static>> = metrics
        .into_iter()
        .enumerate()
        .map(|(k, (labels, value))| row.field(labels, k == 0, value))
        .collect();
    emit(r, prefix, &fields)
}

/// System time including hard and soft interrupt service.
fn kernel_time(c: &CpuStats) -> u64 {
    c.system.saturating_add(c.hardirq).saturating_add(c.softirq)
}
