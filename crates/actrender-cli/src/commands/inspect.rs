//! `actrender inspect`: summarise a sample document.

use actrender_core::{Activity, SampleFile, format_utc};

pub fn run(path: &str) {
    let file = super::load_or_exit(path);
    print!("{}", summary(&file));
}

/// Human-readable overview of a sample document.
pub fn summary(file: &SampleFile) -> String {
    let mut out = String::new();
    let host = if file.hostname.is_empty() {
        "(unknown)"
    } else {
        file.hostname.as_str()
    };
    out.push_str(&format!("Host:        {host}\n"));
    out.push_str(&format!("Tick rate:   {} Hz\n", file.hz));
    out.push_str(&format!("Page size:   {} kB\n", file.page_size_kb));
    out.push_str(&format!("Samples:     {}\n", file.samples.len()));

    if let (Some(first), Some(last)) = (file.samples.first(), file.samples.last()) {
        out.push_str(&format!("First:       {}\n", format_utc(first.timestamp)));
        out.push_str(&format!("Last:        {}\n", format_utc(last.timestamp)));
        let cpus = first.cpu.len().saturating_sub(1);
        out.push_str(&format!("CPUs:        {cpus}\n"));
    }

    let present: Vec<&str> = Activity::ALL
        .into_iter()
        .filter(|a| file.samples.iter().any(|s| a.has_data(s)))
        .map(Activity::name)
        .collect();
    if present.is_empty() {
        out.push_str("Activities:  none\n");
    } else {
        out.push_str(&format!("Activities:  {}\n", present.join(", ")));
    }
    out
}
