//! Figure serialization: SVG through `plotters`, JSON through `serde_json`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingBackend as Backend;
use tracing::debug;

use super::colors::Color as FigureColor;
use super::figure::{
    BoxSeries, Figure, Guide, HistogramSeries, Legend, LineDash, LineTrace, MarkerShape, Panel, Series,
};
use super::pipeline::PlotResult;
use crate::error::{PlotError, Result};

type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT: &str = "sans-serif";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported format `{other}` (expected svg or json)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write every figure of `result` into `dir` as `<name>.<ext>`.
pub fn export_all(result: &PlotResult, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(result.len());
    for (name, figure) in result.iter() {
        let path = dir.join(format!("{name}.{}", format.extension()));
        let contents = match format {
            ExportFormat::Svg => render_svg(figure)?,
            ExportFormat::Json => render_json(figure)?,
        };
        fs::write(&path, contents)?;
        debug!(path = %path.display(), "figure written");
        written.push(path);
    }
    Ok(written)
}

pub fn render_json(figure: &Figure) -> Result<String> {
    Ok(serde_json::to_string_pretty(figure)?)
}

/// Draw `figure` into an SVG document.
pub fn render_svg(figure: &Figure) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, figure.size).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present().map_err(render_err)?;
    }
    Ok(buffer)
}

/// Draw `figure` onto any plotters drawing area.
pub fn draw_figure<DB: Backend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let area = match &figure.title {
        Some(title) => root
            .titled(&title.text, (FONT, title.font_size))
            .map_err(render_err)?,
        None => root.clone(),
    };

    let (rows, cols) = figure.grid;
    let cells = area.split_evenly((rows.max(1), cols.max(1)));
    for (index, (panel, cell)) in figure.panels.iter().zip(&cells).enumerate() {
        // Shared legend goes on the first panel
        let legend = if index == 0 { figure.legend.as_ref() } else { None };
        draw_panel(panel, legend, cell)?;
    }
    Ok(())
}

fn draw_panel<DB: Backend>(
    panel: &Panel,
    legend: Option<&Legend>,
    area: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let ((x_min, x_max), (y_min, y_max)) = panel.view_ranges();

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(45).y_label_area_size(60);
    if let Some(title) = &panel.title {
        builder.caption(&title.text, (FONT, title.font_size));
    }
    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    let categories = panel.x_axis.categories.clone();
    let category_formatter = move |x: &f64| {
        let nearest = x.round();
        if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
            return String::new();
        }
        categories.get(nearest as usize).cloned().unwrap_or_default()
    };
    let desc_size = panel
        .x_axis
        .label
        .as_ref()
        .or(panel.y_axis.label.as_ref())
        .map_or(panel.x_axis.tick_font_size, |l| l.font_size);

    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(BLACK.mix(0.1))
        .axis_style(BLACK.mix(0.8))
        .x_label_style((FONT, panel.x_axis.tick_font_size))
        .y_label_style((FONT, panel.y_axis.tick_font_size))
        .axis_desc_style((FONT, desc_size));
    if let Some(label) = &panel.x_axis.label {
        mesh.x_desc(label.text.as_str());
    }
    if let Some(label) = &panel.y_axis.label {
        mesh.y_desc(label.text.as_str());
    }
    if !panel.x_axis.categories.is_empty() {
        mesh.x_labels(panel.x_axis.categories.len() + 1)
            .x_label_formatter(&category_formatter);
    }
    mesh.draw().map_err(render_err)?;

    draw_guides(&mut chart, &panel.guides, (x_min, x_max), (y_min, y_max))?;
    for series in &panel.series {
        match series {
            Series::Box(b) => draw_box(&mut chart, b)?,
            Series::Histogram(h) => draw_histogram(&mut chart, h)?,
            Series::Line(l) => draw_line(&mut chart, l)?,
        }
    }

    if let Some(legend) = legend {
        for entry in &legend.entries {
            let color = plot_color(entry.color);
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(render_err)?
                .label(entry.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        }
        chart
            .configure_series_labels()
            .label_font((FONT, legend.font_size))
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_guides<DB: Backend>(
    chart: &mut PanelChart<'_, DB>,
    guides: &[Guide],
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Result<()> {
    let style = ShapeStyle::from(&BLACK.mix(0.5)).stroke_width(2);
    chart
        .draw_series(guides.iter().map(|guide| {
            let points = match *guide {
                Guide::Horizontal(y) => vec![(x_min, y), (x_max, y)],
                Guide::Vertical(x) => vec![(x, y_min), (x, y_max)],
            };
            PathElement::new(points, style)
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_box<DB: Backend>(chart: &mut PanelChart<'_, DB>, series: &BoxSeries) -> Result<()> {
    let fill = plot_color(series.fill);
    let outline = ShapeStyle::from(&BLACK).stroke_width(1);
    let s = &series.summary;
    let left = series.position - series.width / 2.0;
    let right = series.position + series.width / 2.0;
    let cap = series.width / 4.0;

    chart
        .draw_series(std::iter::once(Rectangle::new([(left, s.q1), (right, s.q3)], fill.filled())))
        .map_err(render_err)?;
    let strokes = vec![
        vec![(left, s.q1), (right, s.q1), (right, s.q3), (left, s.q3), (left, s.q1)],
        vec![(left, s.median), (right, s.median)],
        vec![(series.position, s.q3), (series.position, s.upper_whisker)],
        vec![(series.position, s.q1), (series.position, s.lower_whisker)],
        vec![(series.position - cap, s.upper_whisker), (series.position + cap, s.upper_whisker)],
        vec![(series.position - cap, s.lower_whisker), (series.position + cap, s.lower_whisker)],
    ];
    chart
        .draw_series(strokes.into_iter().map(|points| PathElement::new(points, outline)))
        .map_err(render_err)?;
    chart
        .draw_series(
            series
                .points
                .iter()
                .map(|&point| Circle::new(point, 2, BLACK.mix(0.6).filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_histogram<DB: Backend>(chart: &mut PanelChart<'_, DB>, series: &HistogramSeries) -> Result<()> {
    let fill = plot_color(series.fill);
    chart
        .draw_series(series.bins.iter().filter(|bin| bin.count > 0).map(|bin| {
            Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.count as f64)], fill.filled())
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_line<DB: Backend>(chart: &mut PanelChart<'_, DB>, trace: &LineTrace) -> Result<()> {
    let color = plot_color(trace.color);
    let style = color.stroke_width(trace.width.round().max(1.0) as u32);

    match trace.dash {
        LineDash::Solid => {
            chart
                .draw_series(LineSeries::new(trace.points.iter().copied(), style))
                .map_err(render_err)?;
        }
        LineDash::Dashed => {
            // Every other segment of the polyline
            chart
                .draw_series(
                    trace
                        .points
                        .windows(2)
                        .step_by(2)
                        .map(|pair| PathElement::new(vec![pair[0], pair[1]], style)),
                )
                .map_err(render_err)?;
        }
    }

    if let Some(marker) = trace.marker {
        let radius = (marker.size / 2).max(1) as i32;
        let drawn = match marker.shape {
            MarkerShape::Circle => chart
                .draw_series(trace.points.iter().map(|&p| Circle::new(p, radius, color.filled())))
                .map(|_| ()),
            MarkerShape::Cross => chart
                .draw_series(trace.points.iter().map(|&p| Cross::new(p, radius, color)))
                .map(|_| ()),
        };
        drawn.map_err(render_err)?;
    }
    Ok(())
}

fn plot_color(color: FigureColor) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a)
}

fn render_err<E: fmt::Display>(error: E) -> PlotError {
    PlotError::Render(error.to_string())
}
