pub mod aggregation;
pub mod naming;

pub use aggregation::{histogram, jitter_offsets, BoxSummary, HistogramBin};
pub use naming::{sanitize_name, UniqueNames};
