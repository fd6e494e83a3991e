//! Serial lines, block devices and network interfaces.
//!
//! Disks and interfaces are matched to the previous sample by name. A device
//! that just appeared is compared against itself, so all its rates read zero.
//! Serial lines are matched by line number and skipped until they have a
//! previous reading.

use std::io::{self, Write};

use super::{Pass, emit, label};
use crate::rate::per_second;
use crate::render::{Field, FieldRenderer};
use crate::sample::{DiskStats, Sample};
use crate::template::TemplateArgs;

/// Extended statistics of one block device over one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskExtended {
    /// Average request size in sectors.
    pub arqsz: f64,
    /// Average time per request (queue + service), in ms.
    pub await_ms: f64,
    /// Average service time per request, in ms.
    pub svctm: f64,
    /// Share of the interval the device was busy, scaled by 10.
    pub util: f64,
}

impl DiskExtended {
    pub fn compute(prev: &DiskStats, curr: &DiskStats, itv: u64, hz: u64) -> Self {
        let ios = curr.nr_ios.saturating_sub(prev.nr_ios);
        let tput = if itv == 0 {
            0.0
        } else {
            ios as f64 * hz as f64 / itv as f64
        };
        let util = per_second(prev.tot_ticks, curr.tot_ticks, itv, hz);
        let svctm = if tput > 0.0 { util / tput } else { 0.0 };

        let (await_ms, arqsz) = if ios > 0 {
            let ticks = curr
                .rd_ticks
                .saturating_sub(prev.rd_ticks)
                .saturating_add(curr.wr_ticks.saturating_sub(prev.wr_ticks));
            let sectors = curr
                .rd_sect
                .saturating_sub(prev.rd_sect)
                .saturating_add(curr.wr_sect.saturating_sub(prev.wr_sect));
            (ticks as f64 / ios as f64, sectors as f64 / ios as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            arqsz,
            await_ms,
            svctm,
            util,
        }
    }
}

pub(super) fn render_serial<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let iv = pass.intervals;
    let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
    for curr in current.serial.iter().filter(|s| s.line != 0) {
        let Some(prev) = pass.previous.serial.iter().find(|s| s.line == curr.line) else {
            continue;
        };
        let port = TemplateArgs::int(curr.line - 1);
        emit(
            r,
            pass.prefix,
            &[
                Field::rate(label(true, "ttyS{}\trcvin/s", "{}"), rate(prev.rx, curr.rx))
                    .args(port),
                Field::rate("ttyS{}\txmtin/s", rate(prev.tx, curr.tx)).args(port),
                Field::rate("ttyS{}\tframerr/s", rate(prev.frame, curr.frame)).args(port),
                Field::rate("ttyS{}\tprtyerr/s", rate(prev.parity, curr.parity)).args(port),
                Field::rate("ttyS{}\tbrk/s", rate(prev.brk, curr.brk)).args(port),
                Field::rate("ttyS{}\tovrun/s", rate(prev.overrun, curr.overrun)).args(port),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn render_disk<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let iv = pass.intervals;
    for curr in current.disk.iter().filter(|d| !d.name.is_empty()) {
        let prev = pass
            .previous
            .disk
            .iter()
            .find(|d| d.name == curr.name)
            .unwrap_or(curr);
        let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
        let ext = DiskExtended::compute(prev, curr, iv.itv, iv.hz);
        let name = TemplateArgs::text(&curr.name);

        emit(
            r,
            pass.prefix,
            &[
                Field::rate(label(true, "{}\ttps", "{}"), rate(prev.nr_ios, curr.nr_ios))
                    .args(name),
                Field::rate("{}\trd_sec/s", rate(prev.rd_sect, curr.rd_sect)).args(name),
                Field::rate("{}\twr_sec/s", rate(prev.wr_sect, curr.wr_sect)).args(name),
                Field::rate("{}\tavgrq-sz", ext.arqsz).args(name),
                Field::rate("{}\tavgqu-sz", rate(prev.rq_ticks, curr.rq_ticks) / 1000.0)
                    .args(name),
                Field::rate("{}\tawait", ext.await_ms).args(name),
                Field::rate("{}\tsvctm", ext.svctm).args(name),
                Field::rate("{}\t%util", ext.util / 10.0).args(name),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn render_net_dev<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let iv = pass.intervals;
    for curr in current.net_dev.iter().filter(|n| !n.interface.is_empty()) {
        let prev = pass
            .previous
            .net_dev
            .iter()
            .find(|n| n.interface == curr.interface)
            .unwrap_or(curr);
        let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
        let name = TemplateArgs::text(&curr.interface);

        emit(
            r,
            pass.prefix,
            &[
                Field::rate(
                    label(true, "{}\trxpck/s", "{}"),
                    rate(prev.rx_packets, curr.rx_packets),
                )
                .args(name),
                Field::rate("{}\ttxpck/s", rate(prev.tx_packets, curr.tx_packets)).args(name),
                Field::rate("{}\trxkB/s", rate(prev.rx_bytes, curr.rx_bytes) / 1024.0)
                    .args(name),
                Field::rate("{}\ttxkB/s", rate(prev.tx_bytes, curr.tx_bytes) / 1024.0)
                    .args(name),
                Field::rate("{}\trxcmp/s", rate(prev.rx_compressed, curr.rx_compressed))
                    .args(name),
                Field::rate("{}\ttxcmp/s", rate(prev.tx_compressed, curr.tx_compressed))
                    .args(name),
                Field::rate("{}\trxmcst/s", rate(prev.multicast, curr.multicast)).args(name),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn render_net_edev<W: Write>(
    r: &mut FieldRenderer<W>,
    pass: &Pass<'_>,
    current: &mut Sample,
) -> io::Result<()> {
    let iv = pass.intervals;
    for curr in current.net_edev.iter().filter(|n| !n.interface.is_empty()) {
        let prev = pass
            .previous
            .net_edev
            .iter()
            .find(|n| n.interface == curr.interface)
            .unwrap_or(curr);
        let rate = |p: u64, c: u64| per_second(p, c, iv.itv, iv.hz);
        let name = TemplateArgs::text(&curr.interface);

        emit(
            r,
            pass.prefix,
            &[
                Field::rate(
                    label(true, "{}\trxerr/s", "{}"),
                    rate(prev.rx_errors, curr.rx_errors),
                )
                .args(name),
                Field::rate("{}\ttxerr/s", rate(prev.tx_errors, curr.tx_errors)).args(name),
                Field::rate("{}\tcoll/s", rate(prev.collisions, curr.collisions)).args(name),
                Field::rate("{}\trxdrop/s", rate(prev.rx_dropped, curr.rx_dropped)).args(name),
                Field::rate("{}\ttxdrop/s", rate(prev.tx_dropped, curr.tx_dropped)).args(name),
                Field::rate(
                    "{}\ttxcarr/s",
                    rate(prev.tx_carrier_errors, curr.tx_carrier_errors),
                )
                .args(name),
                Field::rate(
                    "{}\trxfram/s",
                    rate(prev.rx_frame_errors, curr.rx_frame_errors),
                )
                .args(name),
                Field::rate("{}\trxfifo/s", rate(prev.rx_fifo_errors, curr.rx_fifo_errors))
                    .args(name),
                Field::rate("{}\ttxfifo/s", rate(prev.tx_fifo_errors, curr.tx_fifo_errors))
                    .args(name),
            ],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::run;
    use super::super::{Activity, ActivityOptions};
    use super::*;
    use crate::dialect::Dialect;
    use crate::sample::{NetDevStats, NetEdevStats, SerialStats};

    fn disk(name: &str, nr_ios: u64, ticks: u64, sect: u64, tot_ticks: u64) -> DiskStats {
        DiskStats {
            name: name.to_string(),
            nr_ios,
            rd_sect: sect,
            rd_ticks: ticks,
            tot_ticks,
            rq_ticks: tot_ticks * 2,
            ..Default::default()
        }
    }

    #[test]
    fn extended_stats() {
        let prev = disk("sda", 100, 1000, 800, 0);
        let curr = disk("sda", 150, 1500, 1600, 500);
        let ext = DiskExtended::compute(&prev, &curr, 100, 100);
        // 50 I/Os over one second, 500 ms busy.
        assert_eq!(ext.await_ms, 10.0);
        assert_eq!(ext.arqsz, 16.0);
        assert_eq!(ext.util, 500.0);
        assert_eq!(ext.svctm, 10.0);
    }

    #[test]
    fn idle_disk_has_zero_extended_stats() {
        let d = disk("sda", 100, 1000, 800, 40);
        let ext = DiskExtended::compute(&d, &d, 100, 100);
        assert_eq!(
            ext,
            DiskExtended {
                arqsz: 0.0,
                await_ms: 0.0,
                svctm: 0.0,
                util: 0.0
            }
        );
        assert_eq!(DiskExtended::compute(&d, &d, 0, 100).util, 0.0);
    }

    #[test]
    fn disk_lines_by_dialect() {
        let prev = Sample {
            disk: vec![disk("sda", 100, 1000, 800, 0)],
            ..Default::default()
        };
        let mut curr = Sample {
            disk: vec![disk("sda", 150, 1500, 1600, 500)],
            ..Default::default()
        };
        let opts = ActivityOptions::default();
        assert_eq!(
            run(Activity::Disk, Dialect::Delimited, &opts, &prev, &mut curr),
            "P;sda;50.00;800.00;0.00;16.00;1.00;10.00;10.00;50.00\n"
        );
        let tabular = run(Activity::Disk, Dialect::Tabular, &opts, &prev, &mut curr);
        assert!(tabular.starts_with("P\tsda\ttps\t50.00\nP\tsda\trd_sec/s\t800.00\n"));
        assert!(tabular.ends_with("P\tsda\t%util\t50.00\n"));
    }

    #[test]
    fn new_device_reads_zero_and_unnamed_is_skipped() {
        let prev = Sample::default();
        let mut curr = Sample {
            disk: vec![disk("", 5, 5, 5, 5), disk("nvme0n1", 900, 10, 10, 10)],
            ..Default::default()
        };
        let out = run(
            Activity::Disk,
            Dialect::Delimited,
            &ActivityOptions::default(),
            &prev,
            &mut curr,
        );
        assert_eq!(
            out,
            "P;nvme0n1;0.00;0.00;0.00;0.00;0.00;0.00;0.00;0.00\n"
        );
    }

    #[test]
    fn interfaces_match_by_name_not_position() {
        let nic = |name: &str, rx_bytes: u64| NetDevStats {
            interface: name.to_string(),
            rx_bytes,
            rx_packets: rx_bytes / 1024,
            ..Default::default()
        };
        let prev = Sample {
            net_dev: vec![nic("lo", 0), nic("eth0", 0)],
            ..Default::default()
        };
        let mut curr = Sample {
            net_dev: vec![nic("eth0", 2048), nic("lo", 1024)],
            ..Default::default()
        };
        let out = run(
            Activity::NetDev,
            Dialect::Delimited,
            &ActivityOptions::default(),
            &prev,
            &mut curr,
        );
        assert_eq!(
            out,
            "P;eth0;2.00;0.00;2.00;0.00;0.00;0.00;0.00\n\
             P;lo;1.00;0.00;1.00;0.00;0.00;0.00;0.00\n"
        );
    }

    #[test]
    fn edev_error_rates() {
        let prev = Sample {
            net_edev: vec![NetEdevStats {
                interface: "eth0".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut curr = Sample {
            net_edev: vec![NetEdevStats {
                interface: "eth0".to_string(),
                rx_errors: 3,
                collisions: 1,
                tx_fifo_errors: 2,
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = run(
            Activity::NetEdev,
            Dialect::Tabular,
            &ActivityOptions::default(),
            &prev,
            &mut curr,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "P\teth0\trxerr/s\t3.00");
        assert_eq!(lines[2], "P\teth0\tcoll/s\t1.00");
        assert_eq!(lines[8], "P\teth0\ttxfifo/s\t2.00");
    }

    #[test]
    fn extended_stats_with_counters_near_limit() {
        let prev = DiskStats {
            name: "sda".to_string(),
            ..Default::default()
        };
        let curr = DiskStats {
            nr_ios: 1,
            rd_ticks: u64::MAX,
            wr_ticks: u64::MAX,
            rd_sect: u64::MAX,
            wr_sect: u64::MAX,
            ..prev.clone()
        };
        let ext = DiskExtended::compute(&prev, &curr, 100, 100);
        assert_eq!(ext.await_ms, u64::MAX as f64);
        assert_eq!(ext.arqsz, u64::MAX as f64);
    }

    #[test]
    fn serial_lines_by_port_number() {
        let line = |line: u64, rx: u64, overrun: u64| SerialStats {
            line,
            rx,
            overrun,
            ..Default::default()
        };
        let prev = Sample {
            serial: vec![line(1, 100, 0), line(0, 0, 0), line(3, 0, 0)],
            ..Default::default()
        };
        // Line 3 moved, line 2 is new: only the matched lines render.
        let mut curr = Sample {
            serial: vec![line(2, 50, 0), line(3, 20, 1), line(1, 150, 0), line(0, 9, 9)],
            ..Default::default()
        };
        let opts = ActivityOptions::default();
        assert_eq!(
            run(Activity::Serial, Dialect::Delimited, &opts, &prev, &mut curr),
            "P;2;20.00;0.00;0.00;0.00;0.00;1.00\n\
             P;0;50.00;0.00;0.00;0.00;0.00;0.00\n"
        );
        let tabular = run(Activity::Serial, Dialect::Tabular, &opts, &prev, &mut curr);
        assert!(tabular.starts_with("P\tttyS2\trcvin/s\t20.00\nP\tttyS2\txmtin/s\t0.00\n"));
        assert!(tabular.ends_with("P\tttyS0\tovrun/s\t0.00\n"));
    }
}
