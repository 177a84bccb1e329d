//! Plot selection, construction, styling and export.

pub mod catalog;
pub mod chart;
pub mod colors;
pub mod export;
pub mod figure;
pub mod jv_curves;
pub mod manager;
pub mod pipeline;
pub mod styler;
pub mod styles;

#[cfg(test)]
mod tests;

pub use catalog::{
    ArgSpec, Arity, Constructed, PlotArgs, PlotCatalog, PlotConstructor, PlotContext, RenderOptions,
    TokenInfo,
};
pub use colors::Color;
pub use export::{export_all, render_json, render_svg, ExportFormat};
pub use figure::Figure;
pub use manager::PlotManager;
pub use pipeline::{PlotResult, RenderPipeline, RenderWarning};
pub use styler::FigureStyler;
pub use styles::{FontSizes, LineStyle, StyleConfig, StyleEvent, StyleSnapshot};
