//! `actrender report`: render a sample document.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use actrender_core::{
    Activity, ActivityOptions, Dialect, Error, Layout, ReportConfig, Selection, write_report,
};

/// Raw command-line options of the report command.
pub struct ReportArgs<'a> {
    pub file: &'a str,
    pub format: &'a str,
    pub horizontal: bool,
    pub activities: &'a str,
    pub cpus: Option<&'a str>,
    pub irqs: Option<&'a str>,
    pub cpu_fields: &'a str,
    pub output: Option<&'a str>,
}

pub fn run(args: ReportArgs<'_>) {
    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let file = super::load_or_exit(args.file);

    let sink: Box<dyn Write> = match args.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("Failed to create {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    match write_report(&file, &config, BufWriter::new(sink)) {
        Ok(records) => {
            if let Some(path) = args.output {
                println!("{records} record(s) from {} written to {path}", file.hostname);
            }
        }
        Err(e) => {
            eprintln!("Report failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Map command-line options onto a validated [`ReportConfig`].
pub fn build_config(args: &ReportArgs<'_>) -> Result<ReportConfig, Error> {
    let config = ReportConfig {
        dialect: args.format.parse::<Dialect>()?,
        layout: if args.horizontal {
            Layout::Horizontal
        } else {
            Layout::Vertical
        },
        activities: Activity::parse_list(args.activities)?,
        options: ActivityOptions {
            cpu_fields: args.cpu_fields.parse()?,
            cpus: args.cpus.map(Selection::parse).transpose()?.unwrap_or_default(),
            irqs: args.irqs.map(Selection::parse).transpose()?.unwrap_or_default(),
        },
    };
    config.validate()?;
    Ok(config)
}
