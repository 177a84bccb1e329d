use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};

/// Five-number summary plus mean for one box of a boxplot.
///
/// Whiskers follow Tukey's rule: they reach the most extreme observations
/// within 1.5 IQR of the quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub count: usize,
}

impl BoxSummary {
    /// Summarise `values`, ignoring non-finite entries. Returns `None` when no
    /// finite value remains.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let mut data = Data::new(finite.clone());
        let q1 = data.lower_quartile();
        let median = data.median();
        let q3 = data.upper_quartile();

        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;
        let lower_whisker = finite
            .iter()
            .copied()
            .filter(|v| *v >= low_fence)
            .fold(f64::INFINITY, f64::min);
        let upper_whisker = finite
            .iter()
            .copied()
            .filter(|v| *v <= high_fence)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            lower_whisker: lower_whisker.min(q1),
            q1,
            median,
            q3,
            upper_whisker: upper_whisker.max(q3),
            mean,
            count,
        })
    }
}

/// One histogram bar covering `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin finite `values` into `bins` equal-width bars spanning their range.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Constant data collapses into one unit-wide bar
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min - 0.5,
            upper: min + 0.5,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &finite {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Horizontal offsets in `[-spread, spread]` for scattering box points.
///
/// The generator is seeded from `key`, so the same group always gets the same
/// offsets and repeated renders produce identical figures.
pub fn jitter_offsets(key: &str, count: usize, spread: f64) -> Vec<f64> {
    if spread <= 0.0 {
        return vec![0.0; count];
    }
    let mut rng = StdRng::seed_from_u64(stable_seed(key));
    (0..count).map(|_| rng.gen_range(-spread..=spread)).collect()
}

// FNV-1a; `DefaultHasher` output is not guaranteed stable across releases
fn stable_seed(key: &str) -> u64 {
    key.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
