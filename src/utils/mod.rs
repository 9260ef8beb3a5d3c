mod density;
mod perf;

pub use density::{label_interval, label_interval_with};
