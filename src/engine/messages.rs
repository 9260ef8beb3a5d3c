use crate::domain::{Cursor, Panel};

/// What one panel's fetch/merge cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Page merged; cursor moved to `cursor`.
    Advanced { rows: usize, cursor: Cursor },
    /// Valid response without rows. Nothing changed.
    Empty,
    /// Fetch failed. Nothing changed.
    Failed(String),
    /// Panel was never bootstrapped.
    Skipped,
}

impl CycleOutcome {
    pub fn made_progress(&self) -> bool {
        matches!(self, CycleOutcome::Advanced { .. })
    }
}

/// The result of one advance request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Another cycle was in flight; the request was dropped.
    Coalesced,
    /// One cycle ran across the panels, in panel order.
    Completed(Vec<(Panel, CycleOutcome)>),
}

impl AdvanceOutcome {
    pub fn is_coalesced(&self) -> bool {
        matches!(self, AdvanceOutcome::Coalesced)
    }

    pub fn outcome_for(&self, panel: Panel) -> Option<&CycleOutcome> {
        match self {
            AdvanceOutcome::Coalesced => None,
            AdvanceOutcome::Completed(results) => {
                results.iter().find(|(p, _)| *p == panel).map(|(_, o)| o)
            }
        }
    }
}
