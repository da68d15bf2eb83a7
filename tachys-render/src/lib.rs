//! Rendering of tachys results
//!
//! - Tables in plain text, Markdown or HTML
//! - Model, limit, phase and current tables
//! - SVG plot of a motion profile
//! - CSV export of profile samples

pub mod plot;
pub mod samples;
pub mod sheet;
pub mod table;

pub use plot::{profile_svg, PlotOptions};
pub use samples::write_samples;
pub use sheet::{format_value, limits_table, model_table, phases_table, thermal_table};
pub use table::{Cell, Table, TableFormat};

use tachys_core::motion::ProfileError;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown table format `{0}` (expected simple, markdown or html)")]
    UnknownFormat(String),
    #[error("cannot sample profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
