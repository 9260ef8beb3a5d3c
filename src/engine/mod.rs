mod core;
mod in_flight;
mod messages;
mod state;

pub use core::ReplayController;
pub use in_flight::{InFlightGuard, InFlightToken};
pub use messages::{AdvanceOutcome, CycleOutcome};
pub use state::{PanelPhase, PanelSnapshot};
