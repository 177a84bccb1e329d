use std::sync::Arc;

use tracing::debug;

use super::catalog::{PlotCatalog, RenderOptions};
use super::colors::Color;
use super::pipeline::{PlotResult, RenderPipeline};
use super::styles::{FontSizes, StyleConfig, StyleEvent, StyleSnapshot};
use crate::error::Result;
use crate::types::{MeasurementDataset, SupportData};

/// Session-level entry point: owns the style state and the plot catalog.
///
/// Style setters take `&mut self` and [`PlotManager::render`] takes `&self`,
/// so a style change can never land in the middle of a render on the same
/// manager.
#[derive(Debug, Clone)]
pub struct PlotManager {
    style: StyleConfig,
    catalog: Arc<PlotCatalog>,
    options: RenderOptions,
}

impl Default for PlotManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotManager {
    /// Manager with default style and the standard catalog.
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(PlotCatalog::standard()))
    }

    pub fn with_catalog(catalog: Arc<PlotCatalog>) -> Self {
        Self {
            style: StyleConfig::new(),
            catalog,
            options: RenderOptions::default(),
        }
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    pub fn set_font_sizes(
        &mut self,
        axis_size: Option<u32>,
        title_size: Option<u32>,
        legend_size: Option<u32>,
    ) -> Result<()> {
        self.style.set(axis_size, title_size, legend_size)?;
        debug!(fonts = ?self.style.font_sizes(), "font sizes updated");
        Ok(())
    }

    pub fn font_sizes(&self) -> FontSizes {
        self.style.font_sizes()
    }

    pub fn reset_style(&mut self) {
        self.style.reset();
        debug!("style reset to defaults");
    }

    pub fn set_line_style(&mut self, width: Option<f64>, marker_size: Option<u32>) -> Result<()> {
        self.style.set_line_style(width, marker_size)
    }

    pub fn set_color_scheme(&mut self, colors: Vec<Color>) -> Result<()> {
        self.style.set_color_scheme(colors)
    }

    /// Apply a style change sent by the UI.
    pub fn apply_style_event(&mut self, event: StyleEvent) -> Result<()> {
        debug!(?event, "style event");
        self.style.apply_event(event)
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn style_snapshot(&self) -> StyleSnapshot {
        self.style.snapshot()
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn render_options(&self) -> RenderOptions {
        self.options
    }

    pub fn catalog(&self) -> &PlotCatalog {
        &self.catalog
    }

    /// Render `request` with the current style.
    pub fn render<S: AsRef<str>>(
        &self,
        request: &[S],
        dataset: &MeasurementDataset,
        support: &SupportData,
    ) -> PlotResult {
        let snapshot = self.style.snapshot();
        RenderPipeline::new(&self.catalog, self.options).run(request, dataset, support, &snapshot)
    }
}
