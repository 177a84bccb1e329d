//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use jvplots::types::{JvCurve, JvMetrics, JvRecord, MeasurementDataset, ScanDirection, SupportData};

/// Builder for synthetic JV datasets.
///
/// Every added device gets a reverse and a forward record plus the two
/// matching curves. PCE grows with the device index so the last device added
/// is the best one.
pub struct DatasetBuilder {
    dataset: MeasurementDataset,
    support: SupportData,
    devices: usize,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            dataset: MeasurementDataset::default(),
            support: SupportData {
                has_conditions: true,
                ..SupportData::default()
            },
            devices: 0,
        }
    }

    /// Add a working device.
    pub fn device(mut self, sample: &str, cell: &str, condition: &str) -> Self {
        let pce = 10.0 + self.devices as f64;
        for direction in [ScanDirection::Reverse, ScanDirection::Forward] {
            let record = record(sample, cell, condition, direction, pce);
            self.dataset.complete.push(record.clone());
            self.dataset.filtered.push(record);
            self.dataset.curves.push(curve(sample, cell, direction));
        }
        if !self.support.samples.iter().any(|s| s == sample) {
            self.support.samples.push(sample.to_string());
        }
        self.devices += 1;
        self
    }

    /// Add a device rejected by the filters.
    pub fn rejected(mut self, sample: &str, cell: &str, reason: &str) -> Self {
        let mut record = record(sample, cell, "ctrl", ScanDirection::Reverse, 1.0);
        record.filter_reason = Some(reason.to_string());
        self.dataset.complete.push(record.clone());
        self.support.omitted.push(record);
        self.dataset.curves.push(curve(sample, cell, ScanDirection::Reverse));
        self
    }

    pub fn without_conditions(mut self) -> Self {
        self.support.has_conditions = false;
        for record in self
            .dataset
            .filtered
            .iter_mut()
            .chain(self.dataset.complete.iter_mut())
            .chain(self.support.omitted.iter_mut())
        {
            record.condition = None;
        }
        self
    }

    pub fn filter(mut self, description: &str) -> Self {
        self.support.filter_descriptions.push(description.to_string());
        self
    }

    pub fn build(self) -> (MeasurementDataset, SupportData) {
        (self.dataset, self.support)
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn record(sample: &str, cell: &str, condition: &str, direction: ScanDirection, pce: f64) -> JvRecord {
    JvRecord {
        sample: sample.to_string(),
        sample_id: None,
        batch: Some("batch-1".to_string()),
        condition: Some(condition.to_string()),
        cell: cell.to_string(),
        direction,
        ilum: "Light".to_string(),
        status: None,
        metrics: JvMetrics {
            voc: Some(1.05),
            jsc: Some(21.0),
            ff: Some(70.0 + pce / 10.0),
            pce: Some(pce),
            vmpp: Some(0.9),
            jmpp: Some(19.0),
            pmpp: Some(pce),
            rser: Some(4.0),
            rshu: Some(2000.0),
        },
        filter_reason: None,
    }
}

fn curve(sample: &str, cell: &str, direction: ScanDirection) -> JvCurve {
    let voltage: Vec<f64> = (0..=20).map(|i| i as f64 * 0.06).collect();
    let current_density = voltage.iter().map(|v| 21.0 - 0.01 * (v * 6.0).exp()).collect();
    JvCurve {
        sample: sample.to_string(),
        sample_id: None,
        cell: cell.to_string(),
        direction,
        ilum: "Light".to_string(),
        status: None,
        voltage,
        current_density,
    }
}

/// Three substrates, two conditions, one rejected device.
pub fn standard_dataset() -> (MeasurementDataset, SupportData) {
    DatasetBuilder::new()
        .device("S1", "1", "ctrl")
        .device("S1", "2", "ctrl")
        .device("S2", "1", "additive")
        .device("S2", "2", "additive")
        .device("S3", "1", "additive")
        .rejected("S4", "1", "PCE(%) < 5")
        .filter("PCE(%) >= 5")
        .build()
}
