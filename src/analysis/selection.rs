//! Record and curve selection shared by the plot routines.

use std::collections::{HashMap, HashSet};

use crate::types::{GroupBy, JvCurve, JvRecord, Metric, ScanDirection};

/// Curves that belong to one of `records`.
///
/// A curve matches a record with the same substrate (by `sample_id` when both
/// carry one, by sample name otherwise), cell, scan direction and illumination.
/// When both sides carry a status it must match too.
pub fn matching_curves<'a>(records: &[JvRecord], curves: &'a [JvCurve]) -> Vec<&'a JvCurve> {
    if records.is_empty() {
        return Vec::new();
    }
    curves
        .iter()
        .filter(|curve| records.iter().any(|record| curve_matches(record, curve)))
        .collect()
}

/// Whether `curve` was measured for `record`.
pub fn curve_matches(record: &JvRecord, curve: &JvCurve) -> bool {
    let same_status = match (&record.status, &curve.status) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };
    same_substrate(record, curve)
        && same_status
        && record.cell == curve.cell
        && record.direction == curve.direction
        && record.ilum == curve.ilum
}

/// Whether `curve` was measured on the substrate of `record`: by `sample_id`
/// when both carry one, by sample name otherwise.
pub fn same_substrate(record: &JvRecord, curve: &JvCurve) -> bool {
    match (&record.sample_id, &curve.sample_id) {
        (Some(a), Some(b)) => a == b,
        _ => record.sample == curve.sample,
    }
}

/// Record with the highest PCE.
pub fn best_record(records: &[JvRecord]) -> Option<&JvRecord> {
    best_of(records.iter())
}

fn best_of<'a>(records: impl Iterator<Item = &'a JvRecord>) -> Option<&'a JvRecord> {
    records
        .filter_map(|r| r.metric(Metric::Pce).map(|pce| (r, pce)))
        .fold(None, |best: Option<(&JvRecord, f64)>, (r, pce)| match best {
            Some((_, top)) if top >= pce => best,
            _ => Some((r, pce)),
        })
        .map(|(r, _)| r)
}

/// Distinct `(sample, cell)` pairs in first-seen order.
pub fn devices(records: &[JvRecord]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| (r.sample.clone(), r.cell.clone()))
        .filter(|device| seen.insert(device.clone()))
        .collect()
}

/// Up to `limit` devices with the most curves, ties broken by sample then cell.
pub fn top_devices_by_curve_count(curves: &[&JvCurve], limit: usize) -> Vec<(String, String)> {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for curve in curves {
        *counts
            .entry((curve.sample.clone(), curve.cell.clone()))
            .or_insert(0) += 1;
    }
    let mut ranked: Vec<((String, String), usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));
    ranked.into_iter().take(limit).map(|(d, _)| d).collect()
}

/// Records partitioned by the joined values of `groups`.
///
/// Keys are sorted, except that a pure scan-direction grouping lists Reverse
/// before Forward. Records lacking any of the group values are skipped.
pub fn group_records<'a>(
    records: impl IntoIterator<Item = &'a JvRecord>,
    groups: &[GroupBy],
) -> Vec<(String, Vec<&'a JvRecord>)> {
    let mut buckets: HashMap<String, Vec<&'a JvRecord>> = HashMap::new();
    for record in records {
        let key: Option<Vec<String>> = groups.iter().map(|g| record.group_value(*g)).collect();
        if let Some(parts) = key {
            buckets.entry(parts.join(" | ")).or_default().push(record);
        }
    }

    let mut grouped: Vec<(String, Vec<&JvRecord>)> = buckets.into_iter().collect();
    if groups == [GroupBy::Direction] {
        grouped.sort_by_key(|(key, _)| direction_rank(key));
    } else {
        grouped.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    grouped
}

fn direction_rank(key: &str) -> (u8, String) {
    match key {
        k if k == ScanDirection::Reverse.as_str() => (0, String::new()),
        k if k == ScanDirection::Forward.as_str() => (1, String::new()),
        other => (2, other.to_string()),
    }
}

/// Best-PCE record of every group along `group`.
pub fn best_per_group(records: &[JvRecord], group: GroupBy) -> Vec<(String, &JvRecord)> {
    group_records(records, &[group])
        .into_iter()
        .filter_map(|(key, members)| best_of(members.into_iter()).map(|r| (key, r)))
        .collect()
}
