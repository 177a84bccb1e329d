//! JV curve plot routines.
//!
//! Every routine draws current density over voltage with guide lines through
//! the origin. Routines that find nothing to draw return a titled placeholder
//! figure instead of failing, except the per-device and per-substrate
//! families whose figure count would be zero.

use std::collections::{HashMap, HashSet};

use super::catalog::{ArgSpec, Arity, Constructed, PlotArgs, PlotConstructor, PlotContext};
use super::colors::{distribute, Color};
use super::figure::{Axis, Figure, Guide, LegendEntry, LineTrace, MarkerShape, Panel, Series};
use crate::analysis::{
    best_per_group, best_record, curve_matches, matching_curves, same_substrate, top_devices_by_curve_count,
};
use crate::error::{PlotError, Result};
use crate::types::{GroupBy, JvCurve, Metric, ScanDirection};

pub const VOLTAGE_LABEL: &str = "Voltage [V]";
pub const CURRENT_LABEL: &str = "Current Density [mA/cm2]";

/// Current density window of every curve plot.
const CURRENT_RANGE: (f64, f64) = (-5.0, 25.0);
const VOLTAGE_START: f64 = -0.2;
const DEFAULT_VOC: f64 = 1.2;

/// Which curves a combined curve plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveSubset {
    All,
    /// Curves of records that passed the filters
    Working,
    /// Curves of records rejected by the filters
    Rejected,
}

impl CurveSubset {
    fn label(self) -> &'static str {
        match self {
            CurveSubset::All => "jv_all_cells",
            CurveSubset::Working => "jv_working_cells",
            CurveSubset::Rejected => "jv_rejected_cells",
        }
    }

    fn title(self) -> &'static str {
        match self {
            CurveSubset::All => "JV Curves - All Cells",
            CurveSubset::Working => "JV Curves - Working Cells",
            CurveSubset::Rejected => "JV Curves - Rejected Cells",
        }
    }
}

/// Every curve of a subset on one panel, one color per device, limited to the
/// first `max_curves` devices.
#[derive(Debug, Clone)]
pub struct CurveSubsetConstructor {
    subset: CurveSubset,
}

impl CurveSubsetConstructor {
    pub fn new(subset: CurveSubset) -> Self {
        Self { subset }
    }

    fn curves<'a>(&self, ctx: &PlotContext<'a>) -> Vec<&'a JvCurve> {
        let data = ctx.dataset;
        match self.subset {
            CurveSubset::All => data.curves.iter().collect(),
            CurveSubset::Working => matching_curves(&data.filtered, &data.curves),
            CurveSubset::Rejected => matching_curves(&ctx.support.omitted, &data.curves),
        }
    }
}

impl PlotConstructor for CurveSubsetConstructor {
    fn label(&self, _args: &PlotArgs) -> String {
        self.subset.label().to_string()
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        let curves = self.curves(ctx);
        let devices = first_devices(&curves, ctx.options.max_curves);
        if devices.is_empty() {
            return Ok(Constructed::Single(no_data(self.subset.title())));
        }

        let colors: HashMap<&(String, String), Color> = devices
            .iter()
            .zip(distribute(ctx.colors, devices.len()))
            .collect();
        let mut panel = curve_panel(ctx);
        let mut legend = Vec::with_capacity(devices.len());
        for device in &devices {
            legend.push(LegendEntry {
                label: format!("{} {}", device.0, device.1),
                color: colors[device],
            });
        }
        for curve in curves {
            let key = (curve.sample.clone(), curve.cell.clone());
            if let Some(color) = colors.get(&key) {
                let name = format!("{} {} ({})", curve.sample, curve.cell, curve.direction.tag());
                panel.series.push(Series::Line(scan_trace(name, curve, *color)));
            }
        }

        let title = format!("{} ({} devices)", self.subset.title(), devices.len());
        Ok(Constructed::Single(Figure::single(title, panel).with_legend(legend)))
    }
}

/// Every measurement of the highest-PCE device.
#[derive(Debug, Clone, Copy)]
pub struct BestDeviceConstructor;

impl PlotConstructor for BestDeviceConstructor {
    fn label(&self, _args: &PlotArgs) -> String {
        "jv_best_device".to_string()
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        let data = ctx.dataset;
        let Some(best) = best_record(&data.filtered) else {
            return Ok(Constructed::Single(no_data("JV Curves - Best Device")));
        };
        let device_curves: Vec<&JvCurve> = data
            .curves
            .iter()
            .filter(|c| same_substrate(best, c) && c.cell == best.cell && c.ilum == best.ilum)
            .collect();
        if device_curves.is_empty() {
            return Ok(Constructed::Single(no_data("JV Curves - Best Device")));
        }

        // The n-th reverse and n-th forward scan form measurement n
        let mut seen: HashMap<ScanDirection, usize> = HashMap::new();
        let mut measurements: Vec<(usize, ScanDirection, &JvCurve)> = device_curves
            .into_iter()
            .map(|curve| {
                let index = seen.entry(curve.direction).or_insert(0);
                *index += 1;
                (*index - 1, curve.direction, curve)
            })
            .collect();
        measurements.sort_by_key(|(index, direction, _)| (*index, *direction));

        let mut panel = curve_panel(ctx);
        let mut legend = Vec::new();
        for (index, direction, curve) in measurements {
            let base = ctx.colors.get(index % ctx.colors.len().max(1)).copied().unwrap_or(Color::GRAY);
            let name = format!("Measurement {} ({})", index + 1, direction);
            let trace = match direction {
                ScanDirection::Reverse => LineTrace::new(name.clone(), curve.points(), base.lighten(0.5))
                    .dashed()
                    .with_marker(MarkerShape::Circle),
                ScanDirection::Forward => {
                    LineTrace::new(name.clone(), curve.points(), base).with_marker(MarkerShape::Cross)
                }
            };
            legend.push(LegendEntry {
                label: name,
                color: trace.color,
            });
            panel.series.push(Series::Line(trace));
        }

        let pce = best.metric(Metric::Pce).unwrap_or_default();
        let title = format!(
            "JV Curves - Best Device: {} cell {} ({pce:.2}%)",
            best.sample, best.cell
        );
        Ok(Constructed::Single(Figure::single(title, panel).with_legend(legend)))
    }
}

/// The best measurement of every condition, or of every sample when no
/// conditions are assigned.
#[derive(Debug, Clone, Copy)]
pub struct BestPerConditionConstructor;

impl PlotConstructor for BestPerConditionConstructor {
    fn label(&self, _args: &PlotArgs) -> String {
        "jv_best_per_condition".to_string()
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        let group = if ctx.support.has_conditions {
            GroupBy::Condition
        } else {
            GroupBy::Sample
        };
        let title = format!("JV Curves - Best Measurement per {}", group.display_name());
        let best = best_per_group(&ctx.dataset.filtered, group);
        if best.is_empty() {
            return Ok(Constructed::Single(no_data(&title)));
        }

        let mut panel = curve_panel(ctx);
        let mut legend = Vec::new();
        for ((key, record), color) in best.iter().zip(distribute(ctx.colors, best.len())) {
            let pce = record.metric(Metric::Pce).unwrap_or_default();
            let mut drawn = false;
            for curve in ctx.dataset.curves.iter().filter(|c| curve_matches(record, c)) {
                let name = format!("{key} ({}, {pce:.1}%)", curve.direction);
                let trace = LineTrace::new(name, curve.points(), color).with_marker(MarkerShape::Circle);
                panel.series.push(Series::Line(trace));
                drawn = true;
            }
            if drawn {
                legend.push(LegendEntry {
                    label: key.clone(),
                    color,
                });
            }
        }
        if panel.series.is_empty() {
            return Ok(Constructed::Single(no_data(&title)));
        }
        Ok(Constructed::Single(Figure::single(title, panel).with_legend(legend)))
    }
}

/// How [`SeparatedCurvesConstructor`] splits curves into figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separation {
    /// One figure per device (sample and cell)
    Device,
    /// One figure per substrate
    Substrate,
}

/// One figure per device or substrate.
#[derive(Debug, Clone)]
pub struct SeparatedCurvesConstructor {
    by: Separation,
    working_only: bool,
}

impl SeparatedCurvesConstructor {
    pub fn new(by: Separation, working_only: bool) -> Self {
        Self { by, working_only }
    }

    fn pool<'a>(&self, ctx: &PlotContext<'a>) -> Vec<&'a JvCurve> {
        let data = ctx.dataset;
        if self.working_only {
            matching_curves(&data.filtered, &data.curves)
        } else {
            data.curves.iter().collect()
        }
    }

    fn per_device(&self, curves: &[&JvCurve], ctx: &PlotContext<'_>) -> Vec<(String, Figure)> {
        top_devices_by_curve_count(curves, ctx.options.max_devices)
            .into_iter()
            .map(|(sample, cell)| {
                let members: Vec<&JvCurve> = curves
                    .iter()
                    .copied()
                    .filter(|c| c.sample == sample && c.cell == cell)
                    .collect();
                let colors = distribute(ctx.colors, members.len());
                let mut panel = curve_panel(ctx);
                for (index, (curve, color)) in members.iter().zip(colors).enumerate() {
                    let name = format!("#{} ({})", index + 1, curve.direction.tag());
                    panel.series.push(Series::Line(scan_trace(name, curve, color)));
                }
                let title = format!("JV Curves - {sample} cell {cell}");
                (format!("{sample}_{cell}"), Figure::single(title, panel))
            })
            .collect()
    }

    fn per_substrate(&self, curves: &[&JvCurve], ctx: &PlotContext<'_>) -> Vec<(String, Figure)> {
        let mut samples: Vec<&str> = Vec::new();
        for curve in curves {
            if !samples.contains(&curve.sample.as_str()) {
                samples.push(&curve.sample);
            }
        }

        samples
            .into_iter()
            .map(|sample| {
                let members: Vec<&JvCurve> = curves.iter().copied().filter(|c| c.sample == sample).collect();
                let cells = first_seen(members.iter().map(|c| c.cell.as_str()));
                let palette: HashMap<&str, Color> = cells
                    .iter()
                    .copied()
                    .zip(distribute(ctx.colors, cells.len()))
                    .collect();

                let mut panel = curve_panel(ctx);
                for curve in &members {
                    let color = palette.get(curve.cell.as_str()).copied().unwrap_or(Color::GRAY);
                    let name = format!("Cell {} ({})", curve.cell, curve.direction.tag());
                    panel.series.push(Series::Line(scan_trace(name, curve, color)));
                }
                let legend = cells
                    .iter()
                    .map(|cell| LegendEntry {
                        label: format!("Cell {cell}"),
                        color: palette[cell],
                    })
                    .collect();
                let title = format!("JV Curves - Substrate {sample}");
                (sample.to_string(), Figure::single(title, panel).with_legend(legend))
            })
            .collect()
    }
}

impl PlotConstructor for SeparatedCurvesConstructor {
    fn label(&self, _args: &PlotArgs) -> String {
        let base = match self.by {
            Separation::Device => "jv_per_device",
            Separation::Substrate => "jv_per_substrate",
        };
        if self.working_only {
            format!("{base}_working")
        } else {
            base.to_string()
        }
    }

    fn args(&self) -> ArgSpec {
        ArgSpec::None
    }

    fn arity(&self, _args: &PlotArgs) -> Arity {
        Arity::Multi
    }

    fn construct(&self, ctx: &PlotContext<'_>) -> Result<Constructed> {
        let curves = self.pool(ctx);
        if curves.is_empty() {
            let which = if self.working_only { "working " } else { "" };
            return Err(PlotError::NoData(format!("no {which}curves")));
        }
        let figures = match self.by {
            Separation::Device => self.per_device(&curves, ctx),
            Separation::Substrate => self.per_substrate(&curves, ctx),
        };
        Ok(Constructed::Multi(figures))
    }
}

/// Empty curve panel with fixed ranges and origin guides.
fn curve_panel(ctx: &PlotContext<'_>) -> Panel {
    let max_voc = ctx
        .dataset
        .filtered
        .iter()
        .chain(&ctx.dataset.complete)
        .filter_map(|r| r.metric(Metric::Voc))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(DEFAULT_VOC);
    let x_max = (max_voc * 10.0).ceil() / 10.0 + 0.1;

    let mut panel = Panel::new(
        Axis::labeled(VOLTAGE_LABEL).with_range(VOLTAGE_START, x_max),
        Axis::labeled(CURRENT_LABEL).with_range(CURRENT_RANGE.0, CURRENT_RANGE.1),
    );
    panel.guides = vec![Guide::Horizontal(0.0), Guide::Vertical(0.0)];
    panel
}

/// Reverse scans dashed, forward scans solid.
fn scan_trace(name: String, curve: &JvCurve, color: Color) -> LineTrace {
    let trace = LineTrace::new(name, curve.points(), color);
    match curve.direction {
        ScanDirection::Reverse => trace.dashed(),
        ScanDirection::Forward => trace,
    }
}

fn no_data(what: &str) -> Figure {
    Figure::placeholder(format!("No data available for {what}"))
}

/// First `limit` distinct devices in curve order.
fn first_devices(curves: &[&JvCurve], limit: usize) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    curves
        .iter()
        .map(|c| (c.sample.clone(), c.cell.clone()))
        .filter(|device| seen.insert(device.clone()))
        .take(limit)
        .collect()
}

fn first_seen<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
