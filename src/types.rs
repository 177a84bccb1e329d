//! # Common Types
//!
//! This module contains the measurement types consumed by the plot routines.
//! Records and curves are produced by the data-loading side of the application;
//! the plotting core only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Voltage sweep direction of a JV measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScanDirection {
    Reverse,
    Forward,
}

impl ScanDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanDirection::Reverse => "Reverse",
            ScanDirection::Forward => "Forward",
        }
    }

    /// One-letter tag used in legend entries ("R" / "F").
    pub fn tag(self) -> &'static str {
        match self {
            ScanDirection::Reverse => "R",
            ScanDirection::Forward => "F",
        }
    }
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar figures of merit extracted from one JV measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JvMetrics {
    pub voc: Option<f64>,
    pub jsc: Option<f64>,
    pub ff: Option<f64>,
    pub pce: Option<f64>,
    pub vmpp: Option<f64>,
    pub jmpp: Option<f64>,
    pub pmpp: Option<f64>,
    pub rser: Option<f64>,
    pub rshu: Option<f64>,
}

/// One JV measurement of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JvRecord {
    /// Substrate name
    pub sample: String,
    /// Stable substrate identifier; preferred over `sample` when matching curves
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    /// Experimental variable assigned to the substrate
    #[serde(default)]
    pub condition: Option<String>,
    pub cell: String,
    pub direction: ScanDirection,
    /// Illumination state ("Light" / "Dark")
    pub ilum: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: JvMetrics,
    /// Why the record was filtered out, for omitted records
    #[serde(default)]
    pub filter_reason: Option<String>,
}

impl JvRecord {
    /// Value of `metric`, if measured and finite.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let m = &self.metrics;
        let value = match metric {
            Metric::Voc => m.voc,
            Metric::Jsc => m.jsc,
            Metric::Ff => m.ff,
            Metric::Pce => m.pce,
            Metric::Vmpp => m.vmpp,
            Metric::Jmpp => m.jmpp,
            Metric::Pmpp => m.pmpp,
            Metric::Rser => m.rser,
            Metric::Rshu => m.rshu,
        };
        value.filter(|v| v.is_finite())
    }

    /// Category of this record along `group`.
    pub fn group_value(&self, group: GroupBy) -> Option<String> {
        match group {
            GroupBy::Sample => Some(self.sample.clone()),
            GroupBy::Cell => Some(self.cell.clone()),
            GroupBy::Direction => Some(self.direction.to_string()),
            GroupBy::Illumination => Some(self.ilum.clone()),
            GroupBy::Batch => self.batch.clone(),
            GroupBy::Condition => self.condition.clone(),
            GroupBy::Status => self.status.clone(),
        }
    }

}

/// A measured JV curve (voltage sweep and resulting current density).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JvCurve {
    pub sample: String,
    #[serde(default)]
    pub sample_id: Option<String>,
    pub cell: String,
    pub direction: ScanDirection,
    pub ilum: String,
    #[serde(default)]
    pub status: Option<String>,
    pub voltage: Vec<f64>,
    pub current_density: Vec<f64>,
}

impl JvCurve {
    /// Paired (voltage, current density) points, skipping non-finite samples.
    ///
    /// A first or last point at the origin is an export artifact and is
    /// dropped as long as another point remains; interior zeros are kept.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .voltage
            .iter()
            .zip(&self.current_density)
            .filter(|(v, j)| v.is_finite() && j.is_finite())
            .map(|(v, j)| (*v, *j))
            .collect();
        if points.len() > 1 && points.first().is_some_and(is_origin) {
            points.remove(0);
        }
        if points.len() > 1 && points.last().is_some_and(is_origin) {
            points.pop();
        }
        points
    }
}

const ORIGIN_TOLERANCE: f64 = 1e-12;

fn is_origin(&(v, j): &(f64, f64)) -> bool {
    v.abs() <= ORIGIN_TOLERANCE && j.abs() <= ORIGIN_TOLERANCE
}

/// Parsed measurement data handed to the plot routines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementDataset {
    /// Records that passed the user's filters
    pub filtered: Vec<JvRecord>,
    /// Every loaded record
    pub complete: Vec<JvRecord>,
    /// Measured curves for the loaded records
    pub curves: Vec<JvCurve>,
}

/// Metadata accompanying a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportData {
    /// Records rejected by the filters
    pub omitted: Vec<JvRecord>,
    /// Human-readable filter descriptions, shown as plot subtitles
    pub filter_descriptions: Vec<String>,
    /// Whether samples carry condition assignments
    pub has_conditions: bool,
    pub samples: Vec<String>,
}

/// Dataset and metadata as read from one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderInput {
    pub dataset: MeasurementDataset,
    pub support: SupportData,
}

/// A scalar figure of merit that can be plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Voc,
    Jsc,
    Ff,
    Pce,
    Vmpp,
    Jmpp,
    Pmpp,
    Rser,
    Rshu,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Voc,
        Metric::Jsc,
        Metric::Ff,
        Metric::Pce,
        Metric::Vmpp,
        Metric::Jmpp,
        Metric::Pmpp,
        Metric::Rser,
        Metric::Rshu,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Token letter.
    pub fn code(self) -> char {
        match self {
            Metric::Voc => 'v',
            Metric::Jsc => 'j',
            Metric::Ff => 'f',
            Metric::Pce => 'p',
            Metric::Vmpp => 'u',
            Metric::Jmpp => 'i',
            Metric::Pmpp => 'm',
            Metric::Rser => 'r',
            Metric::Rshu => 'h',
        }
    }

    /// Column heading including the unit, used for axis labels.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Voc => "Voc(V)",
            Metric::Jsc => "Jsc(mA/cm2)",
            Metric::Ff => "FF(%)",
            Metric::Pce => "PCE(%)",
            Metric::Vmpp => "V_mpp(V)",
            Metric::Jmpp => "J_mpp(mA/cm2)",
            Metric::Pmpp => "P_mpp(mW/cm2)",
            Metric::Rser => "R_series(Ohmcm2)",
            Metric::Rshu => "R_shunt(Ohmcm2)",
        }
    }

    /// Short name without the unit, used in figure names.
    pub fn short_name(self) -> &'static str {
        match self {
            Metric::Voc => "Voc",
            Metric::Jsc => "Jsc",
            Metric::Ff => "FF",
            Metric::Pce => "PCE",
            Metric::Vmpp => "Vmpp",
            Metric::Jmpp => "Jmpp",
            Metric::Pmpp => "Pmpp",
            Metric::Rser => "Rser",
            Metric::Rshu => "Rshunt",
        }
    }
}

/// A categorical column records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Sample,
    Cell,
    Direction,
    Illumination,
    Batch,
    Condition,
    Status,
}

impl GroupBy {
    pub const ALL: [GroupBy; 7] = [
        GroupBy::Sample,
        GroupBy::Cell,
        GroupBy::Direction,
        GroupBy::Illumination,
        GroupBy::Batch,
        GroupBy::Condition,
        GroupBy::Status,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() == code)
    }

    pub fn code(self) -> char {
        match self {
            GroupBy::Sample => 'a',
            GroupBy::Cell => 'b',
            GroupBy::Direction => 'c',
            GroupBy::Illumination => 'd',
            GroupBy::Batch => 'e',
            GroupBy::Condition => 'g',
            GroupBy::Status => 's',
        }
    }

    /// Column name, used in figure names.
    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Sample => "sample",
            GroupBy::Cell => "cell",
            GroupBy::Direction => "direction",
            GroupBy::Illumination => "ilum",
            GroupBy::Batch => "batch",
            GroupBy::Condition => "condition",
            GroupBy::Status => "status",
        }
    }

    /// Axis caption.
    pub fn display_name(self) -> &'static str {
        match self {
            GroupBy::Sample => "Sample",
            GroupBy::Cell => "Cell",
            GroupBy::Direction => "Direction",
            GroupBy::Illumination => "Illumination",
            GroupBy::Batch => "Batch",
            GroupBy::Condition => "Variable",
            GroupBy::Status => "Status",
        }
    }
}
