//! # actrender-core
//!
//! Renders system activity samples (CPU, memory, paging, disks, network
//! interfaces, sensors, ...) as text reports in two dialects:
//!
//! - **Tabular**: one tab-separated metric per line, fully labelled.
//! - **Delimited**: one `;`-separated line per entity, ready for a database
//!   import; with [`Layout::Horizontal`] one line per sample.
//!
//! ## Quick Start
//!
//! ```no_run
//! use actrender_core::{Dialect, ReportConfig, SampleFile, write_report};
//!
//! let file = SampleFile::load("samples.json").unwrap();
//! let config = ReportConfig {
//!     dialect: Dialect::Delimited,
//!     ..Default::default()
//! };
//! let records = write_report(&file, &config, std::io::stdout().lock()).unwrap();
//! eprintln!("{records} records");
//! ```
//!
//! ## Architecture
//!
//! Samples → pairs → activities → [`FieldRenderer`] → output
//!
//! Every activity emits its metrics as [`Field`]s; the renderer alone decides
//! separators, prefixes and line breaks. Per-CPU percentages are divided by
//! the CPU's own tick count ([`normalize`]), with fixed fallbacks for offline
//! and tickless processors.

pub mod activity;
pub mod dialect;
pub mod error;
pub mod normalize;
pub mod rate;
pub mod render;
pub mod report;
pub mod sample;
pub mod selection;
pub mod template;

pub use activity::{Activity, ActivityOptions, CpuFields, Intervals};
pub use dialect::{Dialect, Layout};
pub use error::Error;
pub use normalize::{EntityInterval, normalize};
pub use render::{Field, FieldRenderer, NO_RATE, NO_VALUE, RenderFlags};
pub use report::{ReportConfig, format_utc, record_prefix, write_report};
pub use sample::{CpuStats, Sample, SampleFile};
pub use selection::Selection;
pub use template::{DualText, TemplateArgs};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
