//! Shared fixtures for unit tests.

use crate::types::{JvCurve, JvMetrics, JvRecord, MeasurementDataset, ScanDirection, SupportData};

pub(crate) fn record(
    sample: &str,
    cell: &str,
    direction: ScanDirection,
    condition: &str,
    pce: f64,
) -> JvRecord {
    JvRecord {
        sample: sample.to_string(),
        sample_id: Some(format!("id-{sample}")),
        batch: Some("B1".to_string()),
        condition: Some(condition.to_string()),
        cell: cell.to_string(),
        direction,
        ilum: "Light".to_string(),
        status: None,
        metrics: JvMetrics {
            voc: Some(1.0 + pce / 100.0),
            jsc: Some(20.0 + pce / 10.0),
            ff: Some(60.0 + pce),
            pce: Some(pce),
            ..JvMetrics::default()
        },
        filter_reason: None,
    }
}

pub(crate) fn curve(sample: &str, cell: &str, direction: ScanDirection, scale: f64) -> JvCurve {
    let voltage: Vec<f64> = (0..12).map(|i| i as f64 * 0.1).collect();
    let current_density = voltage
        .iter()
        .map(|v| 20.0 * scale - (v * 4.0).exp() * 0.02)
        .collect();
    JvCurve {
        sample: sample.to_string(),
        sample_id: Some(format!("id-{sample}")),
        cell: cell.to_string(),
        direction,
        ilum: "Light".to_string(),
        status: None,
        voltage,
        current_density,
    }
}

/// Two substrates with two cells each, both scan directions, plus one omitted
/// record.
pub(crate) fn dataset() -> (MeasurementDataset, SupportData) {
    let mut filtered = Vec::new();
    let mut curves = Vec::new();
    let layout = [("S1", "ctrl", 15.0), ("S2", "additive", 18.0)];
    for (sample, condition, base) in layout {
        for (offset, cell) in ["1", "2"].into_iter().enumerate() {
            for direction in [ScanDirection::Reverse, ScanDirection::Forward] {
                let bump = if direction == ScanDirection::Reverse { 0.5 } else { 0.0 };
                filtered.push(record(sample, cell, direction, condition, base + offset as f64 + bump));
                curves.push(curve(sample, cell, direction, 1.0 + offset as f64 * 0.05));
            }
        }
    }

    let mut rejected = record("S3", "1", ScanDirection::Reverse, "ctrl", 2.0);
    rejected.filter_reason = Some("PCE(%) < 5".to_string());
    curves.push(curve("S3", "1", ScanDirection::Reverse, 0.2));

    let mut complete = filtered.clone();
    complete.push(rejected.clone());

    let dataset = MeasurementDataset {
        filtered,
        complete,
        curves,
    };
    let support = SupportData {
        omitted: vec![rejected],
        filter_descriptions: vec!["PCE(%) >= 5".to_string()],
        has_conditions: true,
        samples: vec!["S1".into(), "S2".into(), "S3".into()],
    };
    (dataset, support)
}
