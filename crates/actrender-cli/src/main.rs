//! CLI for actrender: turn recorded activity samples into sar-style reports.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "actrender")]
#[command(about = "actrender: render recorded system activity samples as text reports")]
#[command(version = actrender_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a sample document as a report
    Report {
        /// Sample document (JSON)
        file: String,

        /// Output dialect: tabular (one metric per line) or delimited (`;`-separated).
        /// Also accepts the aliases ppc and tab, db and csv.
        #[arg(
            long,
            default_value = "tabular",
            value_parser = ["tabular", "ppc", "tab", "delimited", "db", "csv"]
        )]
        format: String,

        /// One line per sample instead of one per entity (delimited only)
        #[arg(long)]
        horizontal: bool,

        /// Comma-separated activity names, or "all"
        #[arg(long, default_value = "cpu")]
        activities: String,

        /// CPUs to report: "all", or a comma-separated list of CPU numbers
        /// (-1 for the aggregate). Defaults to the aggregate only.
        #[arg(long)]
        cpus: Option<String>,

        /// Interrupts to report: "all", or a comma-separated list of numbers
        /// (-1 for the sum). Defaults to the sum only.
        #[arg(long)]
        irqs: Option<String>,

        /// CPU utilisation columns
        #[arg(long, default_value = "default", value_parser = ["default", "all"])]
        cpu_fields: String,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// List the activities that can be reported
    Activities,

    /// Summarise a sample document: host, sample count, time range, sections
    Inspect {
        /// Sample document (JSON)
        file: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            file,
            format,
            horizontal,
            activities,
            cpus,
            irqs,
            cpu_fields,
            output,
        } => commands::report::run(commands::report::ReportArgs {
            file: &file,
            format: &format,
            horizontal,
            activities: &activities,
            cpus: cpus.as_deref(),
            irqs: irqs.as_deref(),
            cpu_fields: &cpu_fields,
            output: output.as_deref(),
        }),
        Commands::Activities => commands::activities::run(),
        Commands::Inspect { file } => commands::inspect::run(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_format(args: &[&str]) -> Option<String> {
        let cli = Cli::try_parse_from(args).ok()?;
        match cli.command {
            Commands::Report { format, .. } => Some(format),
            _ => None,
        }
    }

    #[test]
    fn format_aliases_are_accepted() {
        for alias in ["ppc", "tab", "db", "csv"] {
            assert_eq!(
                report_format(&["actrender", "report", "s.json", "--format", alias]).as_deref(),
                Some(alias)
            );
        }
        assert_eq!(
            report_format(&["actrender", "report", "s.json"]).as_deref(),
            Some("tabular")
        );
        assert_eq!(
            report_format(&["actrender", "report", "s.json", "--format", "xml"]),
            None
        );
    }
}
