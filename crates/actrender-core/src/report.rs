//! Report driver: walks a sample document pair by pair and renders the
//! selected activities for every interval.

use std::io::Write;

use log::{debug, info, warn};

use crate::Error;
use crate::activity::{Activity, ActivityOptions, Intervals, Pass};
use crate::dialect::{Dialect, Layout};
use crate::render::FieldRenderer;
use crate::sample::{Sample, SampleFile};

/// What to render and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub dialect: Dialect,
    pub layout: Layout,
    /// Activities in output order.
    pub activities: Vec<Activity>,
    pub options: ActivityOptions,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Tabular,
            layout: Layout::Vertical,
            activities: vec![Activity::Cpu],
            options: ActivityOptions::default(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.layout == Layout::Horizontal && self.dialect != Dialect::Delimited {
            return Err(Error::InvalidConfig(
                "horizontal layout requires the delimited dialect".to_string(),
            ));
        }
        if self.activities.is_empty() {
            return Err(Error::InvalidConfig("no activity selected".to_string()));
        }
        Ok(())
    }
}

/// Render every interval of `file` to `out`. Returns the number of records
/// (sample pairs) written.
pub fn write_report<W: Write>(
    file: &SampleFile,
    config: &ReportConfig,
    out: W,
) -> Result<usize, Error> {
    config.validate()?;

    let mut r = FieldRenderer::new(out, config.dialect, config.layout);
    let Some((first, rest)) = file.samples.split_first() else {
        info!("sample document for '{}' is empty", file.hostname);
        return Ok(0);
    };

    let mut previous = first.clone();
    let mut records = 0;
    for sample in rest {
        let mut current = sample.clone();

        if current.uptime <= previous.uptime {
            warn!(
                "uptime did not advance ({} -> {}) at timestamp {}, interval skipped",
                previous.uptime, current.uptime, current.timestamp
            );
            carry_offline_cpus(&mut current, &previous);
            previous = current;
            continue;
        }

        let intervals = intervals(file, &previous, &current);
        let prefix = record_prefix(config.dialect, &file.hostname, &intervals, current.timestamp);
        write_record(&mut r, config, &prefix, &intervals, &previous, &mut current)?;
        records += 1;
        previous = current;
    }

    r.flush()?;
    debug!("wrote {records} records");
    Ok(records)
}

/// CPUs that read all zero in `current` keep their `previous` counters, as
/// they would have after a rendered interval.
fn carry_offline_cpus(current: &mut Sample, previous: &Sample) {
    for (curr, prev) in current.cpu.iter_mut().zip(&previous.cpu).skip(1) {
        if curr.total() == 0 {
            *curr = *prev;
        }
    }
}

fn intervals(file: &SampleFile, previous: &Sample, current: &Sample) -> Intervals {
    let g_itv = current.uptime - previous.uptime;
    let itv = if current.uptime0 == 0 || previous.uptime0 == 0 {
        g_itv
    } else {
        current.uptime0.saturating_sub(previous.uptime0)
    };
    Intervals {
        itv,
        g_itv,
        hz: file.hz,
        page_size_kb: file.page_size_kb,
    }
}

fn write_record<W: Write>(
    r: &mut FieldRenderer<W>,
    config: &ReportConfig,
    prefix: &str,
    intervals: &Intervals,
    previous: &Sample,
    current: &mut Sample,
) -> std::io::Result<()> {
    let pass = Pass {
        prefix,
        previous,
        intervals: *intervals,
        options: &config.options,
    };

    r.begin_record(prefix)?;
    for activity in &config.activities {
        if config.layout == Layout::Vertical {
            r.reset_line();
        }
        activity.render(r, &pass, current)?;
    }
    r.end_record()
}

/// `host<sep><seconds><sep><UTC timestamp>`, written ahead of each line.
pub fn record_prefix(
    dialect: Dialect,
    hostname: &str,
    intervals: &Intervals,
    timestamp: u64,
) -> String {
    let sep = dialect.separator();
    let secs = intervals.itv / intervals.hz.max(1);
    format!("{hostname}{sep}{secs}{sep}{}", format_utc(timestamp))
}

/// Format seconds since the Unix epoch as `YYYY-MM-DD HH:MM:SS UTC`.
/// Leap seconds are not represented.
pub fn format_utc(secs: u64) -> String {
    let (year, month, day) = civil_from_days(secs / 86_400);
    let time = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02} UTC",
        time / 3600,
        time / 60 % 60,
        time % 60
    )
}

/// Proleptic Gregorian date of a day count since 1970-01-01.
///
/// Years are counted from March so the leap day falls at the end of the
/// year; 400-year eras repeat exactly.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    // Days from 0000-03-01 to 1970-01-01.
    let z = days + 719_468;
    let era = z / 146_097;
    let day_of_era = z % 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let march_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * march_month + 2) / 5 + 1;
    let month = if march_month < 10 {
        march_month + 3
    } else {
        march_month - 9
    };
    let year = era * 400 + year_of_era + u64::from(month <= 2);
    (year, month, day)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{CpuStats, PcswStats};
    use crate::selection::Selection;

    fn cpu(user: u64, idle: u64) -> CpuStats {
        CpuStats {
            user,
            idle,
            ..Default::default()
        }
    }

    fn pcsw_sample(timestamp: u64, uptime: u64, processes: u64) -> Sample {
        Sample {
            timestamp,
            uptime,
            pcsw: Some(PcswStats {
                processes,
                context_switch: 0,
            }),
            ..Default::default()
        }
    }

    fn render(file: &SampleFile, config: &ReportConfig) -> (usize, String) {
        let mut out = Vec::new();
        let n = write_report(file, config, &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    // -----------------------------------------------------------------------
    // Timestamps
    // -----------------------------------------------------------------------

    #[test]
    fn epoch_and_known_dates() {
        assert_eq!(format_utc(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_utc(1_700_000_000), "2023-11-14 22:13:20 UTC");
        // Leap day.
        assert_eq!(format_utc(951_782_400), "2000-02-29 00:00:00 UTC");
        assert_eq!(format_utc(1_704_067_199), "2023-12-31 23:59:59 UTC");
    }

    #[test]
    fn century_leap_rules() {
        // 2000 is a leap year, 2100 is not.
        assert_eq!(format_utc(951_868_800), "2000-03-01 00:00:00 UTC");
        assert_eq!(format_utc(4_107_456_000), "2100-02-28 00:00:00 UTC");
        assert_eq!(format_utc(4_107_542_400), "2100-03-01 00:00:00 UTC");
        assert_eq!(format_utc(253_402_300_799), "9999-12-31 23:59:59 UTC");
    }

    #[test]
    fn day_counts_map_to_dates() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(59), (1970, 3, 1));
        assert_eq!(civil_from_days(10_957), (2000, 1, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
    }

    #[test]
    fn prefix_per_dialect() {
        let iv = Intervals {
            itv: 60_000,
            g_itv: 120_000,
            hz: 100,
            page_size_kb: 4,
        };
        assert_eq!(
            record_prefix(Dialect::Tabular, "db01", &iv, 0),
            "db01\t600\t1970-01-01 00:00:00 UTC"
        );
        assert_eq!(
            record_prefix(Dialect::Delimited, "db01", &iv, 0),
            "db01;600;1970-01-01 00:00:00 UTC"
        );
    }

    // -----------------------------------------------------------------------
    // Config
    // -----------------------------------------------------------------------

    #[test]
    fn horizontal_tabular_rejected() {
        let config = ReportConfig {
            layout: Layout::Horizontal,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let ok = ReportConfig {
            dialect: Dialect::Delimited,
            ..config
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn empty_activity_list_rejected() {
        let config = ReportConfig {
            activities: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    // -----------------------------------------------------------------------
    // Driver
    // -----------------------------------------------------------------------

    #[test]
    fn empty_and_single_sample_documents_render_nothing() {
        let config = ReportConfig::default();
        assert_eq!(render(&SampleFile::default(), &config), (0, String::new()));

        let file = SampleFile {
            samples: vec![pcsw_sample(0, 100, 1)],
            ..Default::default()
        };
        assert_eq!(render(&file, &config), (0, String::new()));
    }

    #[test]
    fn one_record_per_pair() {
        let file = SampleFile {
            hostname: "h".to_string(),
            samples: vec![
                pcsw_sample(0, 1000, 10),
                pcsw_sample(10, 2000, 20),
                pcsw_sample(20, 3000, 40),
            ],
            ..Default::default()
        };
        let config = ReportConfig {
            dialect: Dialect::Delimited,
            activities: vec![Activity::Pcsw],
            ..Default::default()
        };
        let (n, out) = render(&file, &config);
        assert_eq!(n, 2);
        assert_eq!(
            out,
            "h;10;1970-01-01 00:00:10 UTC;1.00;0.00\n\
             h;10;1970-01-01 00:00:20 UTC;2.00;0.00\n"
        );
    }

    #[test]
    fn stalled_uptime_skips_the_pair() {
        let file = SampleFile {
            hostname: "h".to_string(),
            samples: vec![
                pcsw_sample(0, 1000, 10),
                pcsw_sample(10, 1000, 20),
                pcsw_sample(20, 2000, 30),
            ],
            ..Default::default()
        };
        let config = ReportConfig {
            dialect: Dialect::Delimited,
            activities: vec![Activity::Pcsw],
            ..Default::default()
        };
        let (n, out) = render(&file, &config);
        assert_eq!(n, 1);
        // Measured from the skipped sample, not the first one.
        assert_eq!(out, "h;10;1970-01-01 00:00:20 UTC;1.00;0.00\n");
    }

    #[test]
    fn offline_cpu_in_skipped_pair_keeps_its_counters() {
        let mut a = pcsw_sample(0, 1000, 0);
        a.cpu = vec![cpu(0, 0), cpu(10, 90)];
        let mut b = pcsw_sample(10, 1000, 0);
        b.cpu = vec![cpu(0, 0), CpuStats::default()];
        let mut c = pcsw_sample(20, 1100, 0);
        c.cpu = vec![cpu(0, 0), cpu(30, 170)];
        let file = SampleFile {
            hostname: "h".to_string(),
            samples: vec![a, b, c],
            ..Default::default()
        };
        let config = ReportConfig {
            dialect: Dialect::Delimited,
            activities: vec![Activity::Cpu],
            options: ActivityOptions {
                cpus: Selection::entities(&[0]),
                ..Default::default()
            },
            ..Default::default()
        };
        // Measured from the last real reading: 100 ticks, 20 user.
        let (n, out) = render(&file, &config);
        assert_eq!(n, 1);
        assert_eq!(out, "h;1;1970-01-01 00:00:20 UTC;0;20.00;0.00;0.00;0.00;0.00;80.00\n");
    }

    #[test]
    fn uptime0_drives_the_per_cpu_interval() {
        let mut a = pcsw_sample(0, 4000, 0);
        a.uptime0 = 1000;
        let mut b = pcsw_sample(10, 8000, 100);
        b.uptime0 = 2000;
        let file = SampleFile {
            hostname: "h".to_string(),
            samples: vec![a, b],
            ..Default::default()
        };
        let config = ReportConfig {
            dialect: Dialect::Delimited,
            activities: vec![Activity::Pcsw],
            ..Default::default()
        };
        // itv = 1000 ticks = 10 s; 100 processes -> 10/s.
        let (_, out) = render(&file, &config);
        assert_eq!(out, "h;10;1970-01-01 00:00:10 UTC;10.00;0.00\n");
    }

    #[test]
    fn horizontal_record_joins_activities() {
        let mut a = pcsw_sample(0, 100, 0);
        a.cpu = vec![cpu(0, 0)];
        let mut b = pcsw_sample(1, 200, 5);
        b.cpu = vec![cpu(25, 75)];
        let file = SampleFile {
            hostname: "h".to_string(),
            samples: vec![a, b],
            ..Default::default()
        };
        let config = ReportConfig {
            dialect: Dialect::Delimited,
            layout: Layout::Horizontal,
            activities: vec![Activity::Cpu, Activity::Pcsw],
            ..Default::default()
        };
        let (_, out) = render(&file, &config);
        assert_eq!(
            out,
            "h;1;1970-01-01 00:00:01 UTC;-1;25.00;0.00;0.00;0.00;0.00;75.00;5.00;0.00\n"
        );
    }
}
