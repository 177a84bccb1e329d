pub mod selection;


pub use selection::{
    best_per_group, best_record, curve_matches, devices, group_records, matching_curves,
    same_substrate, top_devices_by_curve_count,
};
