//! Sample documents: decoded activity counters, one record per sampling pass.
//!
//! The document is plain JSON:
//!
//! ```json
//! {
//!   "hostname": "db01",
//!   "hz": 100,
//!   "samples": [
//!     { "timestamp": 1700000000, "uptime": 40000, "uptime0": 10000,
//!       "cpu": [ { "user": 100, "idle": 900 }, ... ] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Every activity section is optional and every counter defaults to zero, so
//! producers only need to emit what they collect.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

fn default_hz() -> u64 {
    100
}

fn default_page_size_kb() -> u64 {
    4
}

/// A full sample document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleFile {
    #[serde(default)]
    pub hostname: String,
    /// Clock ticks per second of the sampled host.
    #[serde(default = "default_hz")]
    pub hz: u64,
    #[serde(default = "default_page_size_kb")]
    pub page_size_kb: u64,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Default for SampleFile {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            hz: default_hz(),
            page_size_kb: default_page_size_kb(),
            samples: Vec::new(),
        }
    }
}

impl SampleFile {
    /// Read a sample document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a sample document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let file: Self = serde_json::from_reader(reader)?;
        if file.hz == 0 {
            return Err(Error::InvalidSampleFile("hz must be non-zero".to_string()));
        }
        Ok(file)
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        Self::from_reader(text.as_bytes())
    }
}

/// One sampling pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    /// Unix seconds at which the sample was taken.
    pub timestamp: u64,
    /// Uptime in ticks summed over all processors.
    pub uptime: u64,
    /// Uptime in ticks of a single processor; 0 when only `uptime` is known.
    pub uptime0: u64,
    /// Index 0 is the "all" aggregate, index `n + 1` is CPU `n`.
    pub cpu: Vec<CpuStats>,
    pub pcsw: Option<PcswStats>,
    /// Index 0 is the interrupt sum, index `n + 1` is interrupt `n`.
    pub irq: Vec<u64>,
    pub swap: Option<SwapStats>,
    pub paging: Option<PagingStats>,
    pub io: Option<IoStats>,
    pub memory: Option<MemoryStats>,
    pub huge: Option<HugeStats>,
    pub ktables: Option<KtablesStats>,
    pub queue: Option<QueueStats>,
    pub serial: Vec<SerialStats>,
    pub disk: Vec<DiskStats>,
    pub net_dev: Vec<NetDevStats>,
    pub net_edev: Vec<NetEdevStats>,
    pub net_sock: Option<NetSockStats>,
    pub net_ip: Option<NetIpStats>,
    pub net_tcp: Option<NetTcpStats>,
    pub net_udp: Option<NetUdpStats>,
    /// Same indexing as `cpu`; frequencies in units of 10 kHz.
    pub cpufreq: Vec<u64>,
    /// Same indexing as `cpu`: the frequency table of each processor.
    pub wghfreq: Vec<Vec<FreqState>>,
    pub fan: Vec<FanStats>,
    pub temp: Vec<TempStats>,
    /// Voltage inputs.
    #[serde(rename = "in")]
    pub voltage: Vec<VoltageStats>,
}

/// Cumulative CPU time counters in ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub iowait: u64,
    pub idle: u64,
    pub steal: u64,
    pub hardirq: u64,
    pub softirq: u64,
    /// Already included in `user`.
    pub guest: u64,
}

impl CpuStats {
    /// Sum of the time-base counters. `guest` is left out because `user`
    /// already accounts for it.
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.iowait)
            .saturating_add(self.idle)
            .saturating_add(self.steal)
            .saturating_add(self.hardirq)
            .saturating_add(self.softirq)
    }
}

/// Task creation and context switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcswStats {
    pub processes: u64,
    pub context_switch: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapStats {
    pub pswpin: u64,
    pub pswpout: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingStats {
    pub pgpgin: u64,
    pub pgpgout: u64,
    pub pgfault: u64,
    pub pgmajfault: u64,
    pub pgfree: u64,
    pub pgscan_kswapd: u64,
    pub pgscan_direct: u64,
    pub pgsteal: u64,
}

/// Aggregate I/O transfer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoStats {
    pub dk_drive: u64,
    pub dk_drive_rio: u64,
    pub dk_drive_wio: u64,
    pub dk_drive_rblk: u64,
    pub dk_drive_wblk: u64,
}

/// Memory and swap space, all in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub frmkb: u64,
    pub bufkb: u64,
    pub camkb: u64,
    pub tlmkb: u64,
    pub frskb: u64,
    pub tlskb: u64,
    pub caskb: u64,
    pub comkb: u64,
}

/// Huge pages, in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HugeStats {
    pub frhkb: u64,
    pub tlhkb: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KtablesStats {
    pub dentry_stat: u64,
    pub file_used: u64,
    pub inode_used: u64,
    pub pty_nr: u64,
}

/// Run queue and load averages (load averages scaled by 100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStats {
    pub nr_running: u64,
    pub nr_threads: u64,
    pub load_avg_1: u64,
    pub load_avg_5: u64,
    pub load_avg_15: u64,
}

/// Serial line interrupt and error counters. Line 0 is an unused slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialStats {
    /// Port number plus one.
    pub line: u64,
    pub rx: u64,
    pub tx: u64,
    pub frame: u64,
    pub parity: u64,
    pub brk: u64,
    pub overrun: u64,
}

/// Block device counters; ticks are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskStats {
    pub name: String,
    pub nr_ios: u64,
    pub rd_sect: u64,
    pub wr_sect: u64,
    pub rd_ticks: u64,
    pub wr_ticks: u64,
    pub tot_ticks: u64,
    pub rq_ticks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetDevStats {
    pub interface: String,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_compressed: u64,
    pub tx_compressed: u64,
    pub multicast: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetEdevStats {
    pub interface: String,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub collisions: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub tx_carrier_errors: u64,
    pub rx_frame_errors: u64,
    pub rx_fifo_errors: u64,
    pub tx_fifo_errors: u64,
}

/// Sockets in use; gauges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetSockStats {
    pub sock_inuse: u64,
    pub tcp_inuse: u64,
    pub udp_inuse: u64,
    pub raw_inuse: u64,
    pub frag_inuse: u64,
    pub tcp_tw: u64,
}

/// IPv4 datagram counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetIpStats {
    pub in_receives: u64,
    pub forw_datagrams: u64,
    pub in_delivers: u64,
    pub out_requests: u64,
    pub reasm_reqds: u64,
    pub reasm_oks: u64,
    pub frag_oks: u64,
    pub frag_creates: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetTcpStats {
    pub active_opens: u64,
    pub passive_opens: u64,
    pub in_segs: u64,
    pub out_segs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetUdpStats {
    pub in_datagrams: u64,
    pub out_datagrams: u64,
    pub no_ports: u64,
    pub in_errors: u64,
}

/// One row of a processor's frequency table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreqState {
    /// Frequency in kHz; 0 terminates the table.
    pub freq: u64,
    /// Cumulative ticks spent at `freq`.
    pub time_in_state: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanStats {
    pub device: String,
    pub rpm: f64,
    pub rpm_min: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempStats {
    pub device: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// A voltage input, in volts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltageStats {
    pub device: String,
    #[serde(rename = "in")]
    pub volts: f64,
    #[serde(rename = "in_min")]
    pub volts_min: f64,
    #[serde(rename = "in_max")]
    pub volts_max: f64,
}
