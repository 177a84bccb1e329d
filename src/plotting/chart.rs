//! Statistical plot routines: boxplots, the combined metric grid and
//! histograms.

use super::catalog::{ArgSpec, Arity, Constructed, PlotArgs, PlotConstructor, PlotContext};
use super::colors::{direction_pairs, distribute, Color};
use super::figure::{Axis, BoxSeries, Figure, HistogramSeries, LegendEntry, Panel, Series};
use crate::analysis::group_records;
use crate::error::{PlotError, Result};
use crate::types::{GroupBy, JvRecord, Metric, ScanDirection};
use crate::utils::{histogram, jitter_offsets, BoxSummary};

/// Number of bars in a histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Metrics of the combined overview grid, row-major.
pub const GRID_METRICS: [Metric; 4] = [Metric::Pce, Metric::Ff, Metric::Jsc, Metric::Voc];

const BOX_WIDTH: f64 = 0.6;
const SPLIT_BOX_WIDTH: f64 = 0.35;
const SPLIT_OFFSET: f64 = 0.2;

/// Which records a statistical plot draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    /// Records that passed the filters
    Filtered,
    /// Records rejected by the filters
    Omitted,
}

impl RecordSource {
    fn records<'a>(self, ctx: &PlotContext<'a>) -> &'a [JvRecord] {
        match self {
            RecordSource::Filtered => &ctx.dataset.filtered,
            RecordSource::Omitted => &ctx.support.omitted,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            RecordSource::Filtered => "filtered",
            RecordSource::Omitted => "omitted",
        }
    }

    fn title(self, text: String) -> String {
        match self {
            RecordSource::Filtered => text,
            RecordSource::Omitted => format!("Filtered out: {text}"),
        }
    }
}

/// Boxplot of one metric over one or more groupings.
///
/// The last group letter is the x axis. With more than one group the leading
/// groups facet the records into one figure per combination.
#[derive(Debug, Clone)]
pub struct BoxplotConstructor {
    source: RecordSource,
}

impl BoxplotConstructor {
    pub fn new(source: RecordSource) -> Self {
        Self { source }
    }
}

impl PlotConstructor for BoxplotConstructor {
    fn label(&self, args: &PlotArgs) -> String {
        let metric = args.metric.map_or("metric", Metric::short_name);
        let groups: Vec<&str> = args.groups.iter().map(|g| g.column()).collect();
        format!("{metric}_by_{}", groups.join("_"))
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::MetricAndGrouping
    }

    fn arity(&self, args: &PlotArgs) -> Arity {
        if args.groups.len() > 1 {
            Arity::Multi
        } else {
            Arity::Single
        }
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        ctx.check_groups()?;
        let metric = ctx.args.require_metric()?;
        let (x_group, facets) = ctx
            .args
            .groups
            .split_last()
            .ok_or(PlotError::MissingField("group"))?;
        let records = usable_records(self.source, ctx, &[metric])?;
        require_group_values(&records, &ctx.args.groups)?;
        let title = self
            .source
            .title(format!("{} by {}", metric.short_name(), x_group.display_name()));

        if facets.is_empty() {
            let panel = box_panel(&records, metric, *x_group, ctx);
            let panel = match filter_caption(ctx) {
                Some(caption) => panel.with_title(caption),
                None => panel,
            };
            let legend = box_legend(&panel);
            return Ok(Constructed::Single(Figure::single(title, panel).with_legend(legend)));
        }

        let figures = group_records(records, facets)
            .into_iter()
            .map(|(key, members)| {
                let panel = box_panel(&members, metric, *x_group, ctx);
                let legend = box_legend(&panel);
                let figure = Figure::single(format!("{title} ({key})"), panel).with_legend(legend);
                (key, figure)
            })
            .collect();
        Ok(Constructed::Multi(figures))
    }
}

/// 2x2 grid of PCE, FF, Jsc and Voc boxplots over one grouping.
#[derive(Debug, Clone)]
pub struct CombinedGridConstructor {
    source: RecordSource,
}

impl CombinedGridConstructor {
    pub fn new(source: RecordSource) -> Self {
        Self { source }
    }
}

impl PlotConstructor for CombinedGridConstructor {
    fn label(&self, args: &PlotArgs) -> String {
        let group = args.groups.first().map_or("group", |g| g.column());
        format!("overview_by_{group}")
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::Grouping
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        ctx.check_groups()?;
        let group = ctx.args.require_group()?;
        let records = usable_records(self.source, ctx, &GRID_METRICS)?;
        require_group_values(&records, &[group])?;

        let panels: Vec<Panel> = GRID_METRICS
            .iter()
            .map(|&metric| box_panel(&records, metric, group, ctx).with_title(metric.short_name()))
            .collect();
        let legend = panels.first().map(box_legend).unwrap_or_default();
        let title = self
            .source
            .title(format!("Overview by {}", group.display_name()));
        Ok(Constructed::Single(Figure::grid(title, 2, 2, panels).with_legend(legend)))
    }
}

/// Histogram of one metric over the filtered records.
#[derive(Debug, Clone, Copy)]
pub struct HistogramConstructor;

impl PlotConstructor for HistogramConstructor {
    fn label(&self, args: &PlotArgs) -> String {
        let metric = args.metric.map_or("metric", Metric::short_name);
        format!("{metric}_histogram")
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::Metric
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        let metric = ctx.args.require_metric()?;
        let records = usable_records(RecordSource::Filtered, ctx, &[metric])?;
        let values: Vec<f64> = records.iter().filter_map(|r| r.metric(metric)).collect();

        let fill = distribute(ctx.colors, 1)
            .first()
            .copied()
            .unwrap_or(Color::GRAY);
        let mut panel = Panel::new(Axis::labeled(metric.column()), Axis::labeled("Count"));
        panel.series.push(Series::Histogram(HistogramSeries {
            name: metric.short_name().to_string(),
            bins: histogram(&values, HISTOGRAM_BINS),
            fill,
        }));
        if let Some(caption) = filter_caption(ctx) {
            panel = panel.with_title(caption);
        }
        let title = format!("{} distribution", metric.short_name());
        Ok(Constructed::Single(Figure::single(title, panel)))
    }
}

/// Records of `source`, failing when there are none or when none carries any
/// of `metrics`.
fn usable_records<'a>(
    source: RecordSource,
    ctx: &PlotContext<'a>,
    metrics: &[Metric],
) -> Result<Vec<&'a JvRecord>> {
    let records = source.records(ctx);
    if records.is_empty() {
        return Err(PlotError::NoData(format!("no {} records", source.describe())));
    }
    let has_values = records
        .iter()
        .any(|r| metrics.iter().any(|m| r.metric(*m).is_some()));
    if !has_values {
        let field = metrics.first().map_or("metric", |m| m.column());
        return Err(PlotError::MissingField(field));
    }
    Ok(records.iter().collect())
}

/// Fails on the first grouping column that no record carries.
fn require_group_values(records: &[&JvRecord], groups: &[GroupBy]) -> Result<()> {
    match groups
        .iter()
        .find(|g| records.iter().all(|r| r.group_value(**g).is_none()))
    {
        Some(group) => Err(PlotError::MissingField(group.column())),
        None => Ok(()),
    }
}

/// Value drawn on a box axis. Jsc is shown by magnitude whatever the sign
/// convention of the measurement.
fn box_value(record: &JvRecord, metric: Metric) -> Option<f64> {
    let value = record.metric(metric)?;
    Some(if metric == Metric::Jsc { value.abs() } else { value })
}

fn filter_caption(ctx: &PlotContext<'_>) -> Option<String> {
    let filters = &ctx.support.filter_descriptions;
    (!filters.is_empty()).then(|| filters.join("; "))
}

/// One box per category of `group`, or a reverse/forward pair per category
/// when scan directions are separated.
fn box_panel(records: &[&JvRecord], metric: Metric, group: GroupBy, ctx: &PlotContext<'_>) -> Panel {
    let categories = group_records(records.iter().copied(), &[group]);
    let split = ctx.options.separate_scan_direction && group != GroupBy::Direction;

    let mut series = Vec::new();
    if split {
        let pairs = direction_pairs(ctx.colors, categories.len());
        for (index, ((category, members), (reverse, forward))) in categories.iter().zip(pairs).enumerate() {
            let position = index as f64;
            let sides = [
                (ScanDirection::Reverse, position - SPLIT_OFFSET, reverse),
                (ScanDirection::Forward, position + SPLIT_OFFSET, forward),
            ];
            for (direction, center, fill) in sides {
                let values: Vec<f64> = members
                    .iter()
                    .filter(|r| r.direction == direction)
                    .filter_map(|r| box_value(r, metric))
                    .collect();
                let name = format!("{category} ({})", direction.tag());
                series.extend(box_series(name, center, SPLIT_BOX_WIDTH, &values, fill));
            }
        }
    } else {
        let fills = distribute(ctx.colors, categories.len());
        for (index, ((category, members), fill)) in categories.iter().zip(fills).enumerate() {
            let values: Vec<f64> = members.iter().filter_map(|r| box_value(r, metric)).collect();
            series.extend(box_series(category.clone(), index as f64, BOX_WIDTH, &values, fill));
        }
    }

    let labels = categories.into_iter().map(|(category, _)| category).collect();
    let mut panel = Panel::new(
        Axis::labeled(group.display_name()).with_categories(labels),
        Axis::labeled(metric.column()),
    );
    panel.series = series;
    panel
}

fn box_series(name: String, position: f64, width: f64, values: &[f64], fill: Color) -> Option<Series> {
    let summary = BoxSummary::from_values(values)?;
    let offsets = jitter_offsets(&name, values.len(), width * 0.3);
    let points = values
        .iter()
        .zip(offsets)
        .map(|(value, offset)| (position + offset, *value))
        .collect();
    Some(Series::Box(BoxSeries {
        name,
        position,
        width,
        summary,
        points,
        fill,
    }))
}

fn box_legend(panel: &Panel) -> Vec<LegendEntry> {
    panel
        .series
        .iter()
        .filter_map(|series| match series {
            Series::Box(b) => Some(LegendEntry {
                label: b.name.clone(),
                color: b.fill,
            }),
            _ => None,
        })
        .collect()
}
