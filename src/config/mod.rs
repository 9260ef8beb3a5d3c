//! Configuration module for the replay application.

// Can all be private now because we have a public re-export.
mod debug;
mod persistence;
mod replay;

pub use debug::DF;
pub use persistence::PERSISTENCE;
pub use replay::{REPLAY, ReplaySettings};

/// Master switch read by `trace_time!`.
pub const LOG_PERFORMANCE: bool = DF.log_performance;
