//! Activity renderers.
//!
//! An activity turns the counters of one kind of resource (CPUs, memory,
//! disks, ...) from two consecutive samples into a run of [`Field`]s. Each
//! entity of an activity is one logical line: its first field carries the
//! entity identifier for the delimited dialect and its last field carries
//! the renderer's [`line_end`](FieldRenderer::line_end) flag.

mod cpu;
mod device;
mod memory;
mod network;
mod power;
mod system;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::Error;
use crate::render::{Field, FieldRenderer};
use crate::sample::Sample;
use crate::selection::Selection;
use crate::template::DualText;

/// Which CPU utilisation columns to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuFields {
    /// `%user %nice %system %iowait %steal %idle`.
    #[default]
    Default,
    /// `%usr %nice %sys %iowait %steal %irq %soft %guest %idle`.
    All,
}

impl FromStr for CpuFields {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidConfig(format!(
                "unknown cpu field set '{other}' (expected default or all)"
            ))),
        }
    }
}

/// Elapsed time between the two samples of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    /// Single-processor interval in ticks; the divisor of per-second rates.
    pub itv: u64,
    /// Interval summed over all processors; the divisor of the "all" CPU row.
    pub g_itv: u64,
    /// Ticks per second.
    pub hz: u64,
    /// Page size, for kB to page conversions.
    pub page_size_kb: u64,
}

/// Entity filters and column choices that apply across activities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityOptions {
    pub cpu_fields: CpuFields,
    pub cpus: Selection,
    pub irqs: Selection,
}

/// Everything an activity needs besides the current sample.
pub struct Pass<'a> {
    pub prefix: &'a str,
    pub previous: &'a Sample,
    pub intervals: Intervals,
    pub options: &'a ActivityOptions,
}

/// Every activity the renderer knows, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    Cpu,
    Pcsw,
    Irq,
    Swap,
    Paging,
    Io,
    Memory,
    MemUsage,
    SwapUsage,
    Huge,
    Ktables,
    Queue,
    Serial,
    Disk,
    NetDev,
    NetEdev,
    NetSock,
    NetIp,
    NetTcp,
    NetUdp,
    CpuFreq,
    WghFreq,
    Fan,
    Temp,
    Voltage,
}

impl Activity {
    pub const ALL: [Activity; 25] = [
        Activity::Cpu,
        Activity::Pcsw,
        Activity::Irq,
        Activity::Swap,
        Activity::Paging,
        Activity::Io,
        Activity::Memory,
        Activity::MemUsage,
        Activity::SwapUsage,
        Activity::Huge,
        Activity::Ktables,
        Activity::Queue,
        Activity::Serial,
        Activity::Disk,
        Activity::NetDev,
        Activity::NetEdev,
        Activity::NetSock,
        Activity::NetIp,
        Activity::NetTcp,
        Activity::NetUdp,
        Activity::CpuFreq,
        Activity::WghFreq,
        Activity::Fan,
        Activity::Temp,
        Activity::Voltage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Activity::Cpu => "cpu",
            Activity::Pcsw => "pcsw",
            Activity::Irq => "irq",
            Activity::Swap => "swap",
            Activity::Paging => "paging",
            Activity::Io => "io",
            Activity::Memory => "memory",
            Activity::MemUsage => "mem-usage",
            Activity::SwapUsage => "swap-usage",
            Activity::Huge => "huge",
            Activity::Ktables => "ktables",
            Activity::Queue => "queue",
            Activity::Serial => "serial",
            Activity::Disk => "disk",
            Activity::NetDev => "net-dev",
            Activity::NetEdev => "net-edev",
            Activity::NetSock => "net-sock",
            Activity::NetIp => "net-ip",
            Activity::NetTcp => "net-tcp",
            Activity::NetUdp => "net-udp",
            Activity::CpuFreq => "cpufreq",
            Activity::WghFreq => "wghfreq",
            Activity::Fan => "fan",
            Activity::Temp => "temp",
            Activity::Voltage => "in",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Activity::Cpu => "CPU utilisation per processor",
            Activity::Pcsw => "Task creation and context switches",
            Activity::Irq => "Interrupts per second",
            Activity::Swap => "Swapping activity",
            Activity::Paging => "Paging activity",
            Activity::Io => "I/O transfer rates",
            Activity::Memory => "Memory page rates",
            Activity::MemUsage => "Memory utilisation",
            Activity::SwapUsage => "Swap space utilisation",
            Activity::Huge => "Huge pages utilisation",
            Activity::Ktables => "Kernel tables",
            Activity::Queue => "Run queue and load averages",
            Activity::Serial => "Serial line interrupts and errors",
            Activity::Disk => "Block device activity",
            Activity::NetDev => "Network interface traffic",
            Activity::NetEdev => "Network interface errors",
            Activity::NetSock => "IPv4 sockets in use",
            Activity::NetIp => "IPv4 datagrams",
            Activity::NetTcp => "TCP connections and segments",
            Activity::NetUdp => "UDP datagrams",
            Activity::CpuFreq => "CPU clock frequency",
            Activity::WghFreq => "CPU frequency weighted by time in state",
            Activity::Fan => "Fan speed",
            Activity::Temp => "Device temperature",
            Activity::Voltage => "Voltage inputs",
        }
    }

    /// Whether `sample` carries any data for this activity.
    pub fn has_data(self, sample: &Sample) -> bool {
        match self {
            Activity::Cpu => !sample.cpu.is_empty(),
            Activity::Pcsw => sample.pcsw.is_some(),
            Activity::Irq => !sample.irq.is_empty(),
            Activity::Swap => sample.swap.is_some(),
            Activity::Paging => sample.paging.is_some(),
            Activity::Io => sample.io.is_some(),
            Activity::Memory | Activity::MemUsage | Activity::SwapUsage => {
                sample.memory.is_some()
            }
            Activity::Huge => sample.huge.is_some(),
            Activity::Ktables => sample.ktables.is_some(),
            Activity::Queue => sample.queue.is_some(),
            Activity::Serial => !sample.serial.is_empty(),
            Activity::Disk => !sample.disk.is_empty(),
            Activity::NetDev => !sample.net_dev.is_empty(),
            Activity::NetEdev => !sample.net_edev.is_empty(),
            Activity::NetSock => sample.net_sock.is_some(),
            Activity::NetIp => sample.net_ip.is_some(),
            Activity::NetTcp => sample.net_tcp.is_some(),
            Activity::NetUdp => sample.net_udp.is_some(),
            Activity::CpuFreq => !sample.cpufreq.is_empty(),
            Activity::WghFreq => !sample.wghfreq.is_empty(),
            Activity::Fan => !sample.fan.is_empty(),
            Activity::Temp => !sample.temp.is_empty(),
            Activity::Voltage => !sample.voltage.is_empty(),
        }
    }

    /// Render this activity for the interval ending at `current`.
    ///
    /// `current` is mutable because offline CPUs inherit their previous
    /// counters (see [`normalize`](crate::normalize::normalize)).
    pub fn render<W: Write>(
        self,
        r: &mut FieldRenderer<W>,
        pass: &Pass<'_>,
        current: &mut Sample,
    ) -> io::Result<()> {
        match self {
            Activity::Cpu => cpu::render_cpu(r, pass, current),
            Activity::Pcsw => system::render_pcsw(r, pass, current),
            Activity::Irq => system::render_irq(r, pass, current),
            Activity::Swap => system::render_swap(r, pass, current),
            Activity::Paging => system::render_paging(r, pass, current),
            Activity::Io => system::render_io(r, pass, current),
            Activity::Memory => memory::render_memory(r, pass, current),
            Activity::MemUsage => memory::render_mem_usage(r, pass, current),
            Activity::SwapUsage => memory::render_swap_usage(r, pass, current),
            Activity::Huge => memory::render_huge(r, pass, current),
            Activity::Ktables => system::render_ktables(r, pass, current),
            Activity::Queue => system::render_queue(r, pass, current),
            Activity::Serial => device::render_serial(r, pass, current),
            Activity::Disk => device::render_disk(r, pass, current),
            Activity::NetDev => device::render_net_dev(r, pass, current),
            Activity::NetEdev => device::render_net_edev(r, pass, current),
            Activity::NetSock => network::render_net_sock(r, pass, current),
            Activity::NetIp => network::render_net_ip(r, pass, current),
            Activity::NetTcp => network::render_net_tcp(r, pass, current),
            Activity::NetUdp => network::render_net_udp(r, pass, current),
            Activity::CpuFreq => power::render_cpufreq(r, pass, current),
            Activity::WghFreq => power::render_wghfreq(r, pass, current),
            Activity::Fan => power::render_fan(r, pass, current),
            Activity::Temp => power::render_temp(r, pass, current),
            Activity::Voltage => power::render_voltage(r, pass, current),
        }
    }

    /// Parse a comma-separated activity list; `ALL` selects every activity.
    pub fn parse_list(list: &str) -> Result<Vec<Activity>, Error> {
        if list.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }
        let mut out = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let activity: Activity = name.parse()?;
            if !out.contains(&activity) {
                out.push(activity);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| Error::UnknownActivity(s.to_string()))
    }
}

/// Render one entity line: every field as given, the last one also carrying
/// the renderer's end-of-line flag.
pub(crate) fn emit<W: Write>(
    r: &mut FieldRenderer<W>,
    prefix: &str,
    fields: &[Field<'_>],
) -> io::Result<()> {
    let eol = r.line_end();
    let last = fields.len().saturating_sub(1);
    for (i, field) in fields.iter().enumerate() {
        let field = if i == last { field.flags(eol) } else { *field };
        r.render(prefix, &field)?;
    }
    Ok(())
}

/// Label of a field inside an entity line. Only the first field names the
/// entity in the delimited dialect.
pub(crate) fn label<'a>(first: bool, tabular: &'a str, delimited: &'a str) -> DualText<'a> {
    if first {
        DualText::new(tabular, delimited)
    } else {
        DualText::tabular(tabular)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use crate::dialect::{Dialect, Layout};

    pub const INTERVALS: Intervals = Intervals {
        itv: 100,
        g_itv: 200,
        hz: 100,
        page_size_kb: 4,
    };

    /// Render one activity over `previous -> current` and return the text.
    pub fn run(
        activity: Activity,
        dialect: Dialect,
        options: &ActivityOptions,
        previous: &Sample,
        current: &mut Sample,
    ) -> String {
        let mut r = FieldRenderer::new(Vec::new(), dialect, Layout::Vertical);
        let pass = Pass {
            prefix: "P",
            previous,
            intervals: INTERVALS,
            options,
        };
        activity.render(&mut r, &pass, current).unwrap();
        String::from_utf8(r.into_inner()).unwrap()
    }
}
