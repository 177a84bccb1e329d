//! # JV Plot Library
//!
//! `jvplots` turns photovoltaic current-voltage (JV) measurements into a
//! configurable set of statistical and curve plots. A plot request is a list
//! of short tokens (`Bpa` is a PCE boxplot grouped by sample, `Cw` the curves
//! of the best device); every token is resolved through a catalog, built,
//! styled with the session's font sizes and colors, and returned with a
//! file-safe name.
//!
//! ## Features
//!
//! - Boxplots, metric overview grids and histograms of filtered or omitted records
//! - JV curve plots per subset, best device, condition, device and substrate
//! - Uniform styling from a validated, snapshot-based style configuration
//! - Extensible catalog of plot families and aliases
//! - SVG and JSON export
//!
//! ## Example
//!
//! ```no_run
//! use jvplots::{PlotManager, RenderInput};
//!
//! let input: RenderInput = serde_json::from_str(&std::fs::read_to_string("input.json")?)?;
//! let mut manager = PlotManager::new();
//! manager.set_font_sizes(Some(14), None, None)?;
//!
//! let result = manager.render(&["Bpa", "Hist", "Cw"], &input.dataset, &input.support);
//! for warning in result.warnings() {
//!     eprintln!("skipped {warning}");
//! }
//! jvplots::plotting::export_all(&result, "plots".as_ref(), jvplots::ExportFormat::Svg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use error::{PlotError, Result};
pub use plotting::{
    ExportFormat, Figure, PlotCatalog, PlotManager, PlotResult, RenderOptions, RenderWarning,
    StyleConfig, StyleEvent,
};
pub use types::{JvCurve, JvRecord, MeasurementDataset, RenderInput, SupportData};
