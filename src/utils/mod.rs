//! Small shared helpers.

mod timing;

pub use timing::{duration_to_micros, duration_to_ms_f64, serialize_duration_micros};
