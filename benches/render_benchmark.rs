/// Benchmark module for the plot pipeline.
/// Measures token rendering with styling and SVG serialization.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jvplots::plotting::render_svg;
use jvplots::types::{JvCurve, JvMetrics, JvRecord, MeasurementDataset, ScanDirection, SupportData};
use jvplots::PlotManager;

/// Build a dataset of `substrates` x 6 cells, both scan directions
///
/// # Returns
/// * `(MeasurementDataset, SupportData)` - Records with matching curves
fn setup_large_dataset(substrates: usize) -> (MeasurementDataset, SupportData) {
    let mut dataset = MeasurementDataset::default();
    let voltage: Vec<f64> = (0..=100).map(|i| i as f64 * 0.012).collect();

    for s in 0..substrates {
        let sample = format!("S{s:03}");
        for cell in 1..=6 {
            for direction in [ScanDirection::Reverse, ScanDirection::Forward] {
                let pce = 12.0 + (s * 6 + cell) as f64 % 9.0;
                let record = JvRecord {
                    sample: sample.clone(),
                    sample_id: None,
                    batch: Some("bench".into()),
                    condition: Some(format!("cond-{}", s % 4)),
                    cell: cell.to_string(),
                    direction,
                    ilum: "Light".into(),
                    status: None,
                    metrics: JvMetrics {
                        voc: Some(1.0 + pce / 200.0),
                        jsc: Some(20.0 + pce / 10.0),
                        ff: Some(65.0 + pce / 2.0),
                        pce: Some(pce),
                        ..JvMetrics::default()
                    },
                    filter_reason: None,
                };
                dataset.complete.push(record.clone());
                dataset.filtered.push(record);
                dataset.curves.push(JvCurve {
                    sample: sample.clone(),
                    sample_id: None,
                    cell: cell.to_string(),
                    direction,
                    ilum: "Light".into(),
                    status: None,
                    voltage: voltage.clone(),
                    current_density: voltage.iter().map(|v| 21.0 - 0.01 * (v * 6.0).exp()).collect(),
                });
            }
        }
    }

    let support = SupportData {
        has_conditions: true,
        ..SupportData::default()
    };
    (dataset, support)
}

/// Benchmark figure construction for the statistical and curve families
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let (dataset, support) = setup_large_dataset(40);
    let manager = PlotManager::new();

    group.bench_function("boxplots", |b| {
        b.iter(|| manager.render(black_box(&["Bpa", "Bpg", "Bfgc", "Balla"]), &dataset, &support))
    });

    group.bench_function("jv_curves", |b| {
        b.iter(|| manager.render(black_box(&["Cy", "Cw", "Cb"]), &dataset, &support))
    });

    group.bench_function("per_device", |b| {
        b.iter(|| manager.render(black_box(&["Cx", "Cd"]), &dataset, &support))
    });

    group.finish();
}

/// Benchmark SVG serialization of rendered figures
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let (dataset, support) = setup_large_dataset(10);
    let result = PlotManager::new().render(&["Bpa", "Hp", "Cy"], &dataset, &support);

    group.bench_function("svg", |b| {
        b.iter(|| {
            for figure in result.figures() {
                black_box(render_svg(figure).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_export);
criterion_main!(benches);
