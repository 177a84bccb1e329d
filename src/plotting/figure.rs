//! Backend-neutral figure model.
//!
//! Construction routines build [`Figure`]s; the styler only touches the font
//! and stroke attributes, and exporters translate the model into SVG or JSON.

use serde::Serialize;

use super::colors::Color;
use crate::utils::{BoxSummary, HistogramBin};

/// Font size construction routines start from; the styler overrides it.
pub const BASE_FONT_SIZE: u32 = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub font_size: u32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: BASE_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: Option<TextBlock>,
    pub tick_font_size: u32,
    /// Fixed data range; computed from the series when `None`
    pub range: Option<(f64, f64)>,
    /// Tick labels for integer positions of a categorical axis
    pub categories: Vec<String>,
}

impl Axis {
    pub fn new() -> Self {
        Self {
            label: None,
            tick_font_size: BASE_FONT_SIZE,
            range: None,
            categories: Vec::new(),
        }
    }

    pub fn labeled(text: impl Into<String>) -> Self {
        Self {
            label: Some(TextBlock::new(text)),
            ..Self::new()
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineDash {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    Circle,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub shape: MarkerShape,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub name: String,
    /// Center of the box on the x axis
    pub position: f64,
    pub width: f64,
    pub summary: BoxSummary,
    /// Individual observations, already jittered horizontally
    pub points: Vec<(f64, f64)>,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    pub bins: Vec<HistogramBin>,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub dash: LineDash,
    pub width: f64,
    pub marker: Option<Marker>,
}

impl LineTrace {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            name: name.into(),
            points,
            color,
            dash: LineDash::Solid,
            width: 2.0,
            marker: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = LineDash::Dashed;
        self
    }

    pub fn with_marker(mut self, shape: MarkerShape) -> Self {
        self.marker = Some(Marker { shape, size: 6 });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Series {
    Box(BoxSeries),
    Histogram(HistogramSeries),
    Line(LineTrace),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Box(s) => &s.name,
            Series::Histogram(s) => &s.name,
            Series::Line(s) => &s.name,
        }
    }

    /// Data-space bounding box as `((x_min, x_max), (y_min, y_max))`.
    fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut acc = Bounds::default();
        match self {
            Series::Box(s) => {
                acc.add(s.position - s.width / 2.0, s.summary.lower_whisker);
                acc.add(s.position + s.width / 2.0, s.summary.upper_whisker);
                for &(x, y) in &s.points {
                    acc.add(x, y);
                }
            }
            Series::Histogram(s) => {
                for bin in &s.bins {
                    acc.add(bin.lower, 0.0);
                    acc.add(bin.upper, bin.count as f64);
                }
            }
            Series::Line(s) => {
                for &(x, y) in &s.points {
                    acc.add(x, y);
                }
            }
        }
        acc.finish()
    }
}

/// Reference line spanning the whole panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Guide {
    Horizontal(f64),
    Vertical(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: Option<TextBlock>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub guides: Vec<Guide>,
}

impl Panel {
    pub fn new(x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            title: None,
            x_axis,
            y_axis,
            series: Vec::new(),
            guides: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(TextBlock::new(title));
        self
    }

    /// Axis ranges to draw: fixed ranges win, otherwise the data extent padded
    /// by 10% (categorical axes always cover every category).
    pub fn view_ranges(&self) -> ((f64, f64), (f64, f64)) {
        let data = self
            .series
            .iter()
            .filter_map(Series::bounds)
            .fold(Bounds::default(), |mut acc, ((x0, x1), (y0, y1))| {
                acc.add(x0, y0);
                acc.add(x1, y1);
                acc
            })
            .finish();

        let x = self.x_axis.range.unwrap_or_else(|| {
            if !self.x_axis.categories.is_empty() {
                (-0.5, self.x_axis.categories.len() as f64 - 0.5)
            } else {
                data.map(|(x, _)| pad(x)).unwrap_or((0.0, 1.0))
            }
        });
        let y = self
            .y_axis
            .range
            .unwrap_or_else(|| data.map(|(_, y)| pad(y)).unwrap_or((0.0, 1.0)));
        (x, y)
    }
}

fn pad((min, max): (f64, f64)) -> (f64, f64) {
    let span = max - min;
    let padding = if span.abs() < 1e-9 { 0.5 } else { span * 0.1 };
    (min - padding, max + padding)
}

#[derive(Default)]
struct Bounds {
    x: Option<(f64, f64)>,
    y: Option<(f64, f64)>,
}

impl Bounds {
    fn add(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.x = Some(self.x.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
        self.y = Some(self.y.map_or((y, y), |(lo, hi)| (lo.min(y), hi.max(y))));
    }

    fn finish(self) -> Option<((f64, f64), (f64, f64))> {
        self.x.zip(self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: Option<TextBlock>,
    /// Panels in row-major order
    pub panels: Vec<Panel>,
    /// `(rows, cols)` of the panel grid
    pub grid: (usize, usize),
    pub legend: Option<Legend>,
    /// Pixel size used by exporters
    pub size: (u32, u32),
}

impl Figure {
    /// A single-panel figure.
    pub fn single(title: impl Into<String>, panel: Panel) -> Self {
        Self {
            title: Some(TextBlock::new(title)),
            panels: vec![panel],
            grid: (1, 1),
            legend: None,
            size: (900, 650),
        }
    }

    /// A `rows` x `cols` grid of panels.
    pub fn grid(title: impl Into<String>, rows: usize, cols: usize, panels: Vec<Panel>) -> Self {
        Self {
            title: Some(TextBlock::new(title)),
            panels,
            grid: (rows, cols),
            legend: None,
            size: (1100, 800),
        }
    }

    /// A figure carrying only a title, used when a routine has nothing to draw.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self::single(title, Panel::new(Axis::new(), Axis::new()))
    }

    pub fn with_legend(mut self, entries: Vec<LegendEntry>) -> Self {
        if !entries.is_empty() {
            self.legend = Some(Legend {
                entries,
                font_size: BASE_FONT_SIZE,
            });
        }
        self
    }

    /// Every axis of every panel.
    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.panels.iter().flat_map(|p| [&p.x_axis, &p.y_axis])
    }

    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.panels.iter().flat_map(|p| p.series.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_ranges_pad_line_data() {
        let mut panel = Panel::new(Axis::labeled("V"), Axis::labeled("J"));
        panel.series.push(Series::Line(LineTrace::new(
            "a",
            vec![(0.0, -20.0), (1.0, 0.0)],
            Color::BLACK,
        )));
        let ((x0, x1), (y0, y1)) = panel.view_ranges();
        assert!((x0 + 0.1).abs() < 1e-9 && (x1 - 1.1).abs() < 1e-9);
        assert!((y0 + 22.0).abs() < 1e-9 && (y1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_view_ranges_fixed_and_categorical() {
        let panel = Panel::new(
            Axis::labeled("x").with_categories(vec!["a".into(), "b".into(), "c".into()]),
            Axis::labeled("y").with_range(-5.0, 25.0),
        );
        assert_eq!(panel.view_ranges(), ((-0.5, 2.5), (-5.0, 25.0)));
    }

    #[test]
    fn test_empty_panel_defaults() {
        let panel = Panel::new(Axis::new(), Axis::new());
        assert_eq!(panel.view_ranges(), ((0.0, 1.0), (0.0, 1.0)));
    }

    #[test]
    fn test_legend_omitted_when_empty() {
        let figure = Figure::placeholder("nothing").with_legend(Vec::new());
        assert!(figure.legend.is_none());
        assert_eq!(figure.axes().count(), 2);
    }
}
