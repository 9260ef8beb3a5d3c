use crate::domain::{Cursor, Panel};
use crate::models::{Page, WindowBuffer};

/// Where a panel is in its fetch/merge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PanelPhase {
    /// No initial window yet; advance skips the panel.
    Uninitialized,
    Idle,
    Fetching,
    Merging,
    Failed,
}

/// Represents the state of a single panel in the controller.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub panel: Panel,
    pub buffer: WindowBuffer,
    /// Last confirmed position. None until bootstrap succeeds.
    pub cursor: Option<Cursor>,
    pub phase: PanelPhase,
    /// Last fetch error (if any) to show in UI
    pub last_error: Option<String>,
}

impl PanelState {
    pub fn new(panel: Panel) -> Self {
        Self {
            panel,
            buffer: WindowBuffer::new(panel.capacity()),
            cursor: None,
            phase: PanelPhase::Uninitialized,
            last_error: None,
        }
    }

    /// Replace the window with a first page and take its last timestamp as cursor.
    pub fn install_initial(&mut self, page: Page) {
        let mut buffer = WindowBuffer::new(self.buffer.capacity());
        let cursor = page.last_timestamp().cloned();
        buffer.merge(page);
        self.buffer = buffer;
        self.cursor = cursor;
        self.phase = PanelPhase::Idle;
        self.last_error = None;
    }

    /// Merge an increment and move the cursor to its last timestamp.
    /// Empty pages change nothing.
    pub fn apply_increment(&mut self, page: Page) -> usize {
        let Some(last) = page.last_timestamp().cloned() else {
            return 0;
        };
        let rows = page.len();
        self.buffer.merge(page);
        self.cursor = Some(last);
        self.last_error = None;
        rows
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            panel: self.panel,
            cursor: self.cursor.clone(),
            phase: self.phase,
            buffer: self.buffer.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Copy of a panel's state for rendering; never aliases the live buffer.
#[derive(Debug, Clone)]
pub struct PanelSnapshot {
    pub panel: Panel,
    pub cursor: Option<Cursor>,
    pub phase: PanelPhase,
    pub buffer: WindowBuffer,
    pub last_error: Option<String>,
}
