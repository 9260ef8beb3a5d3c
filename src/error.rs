use {
    crate::{data::FetchError, domain::{CursorError, Panel}},
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum ReplayError {
    /// No starting cursor from the cache or the service. Fatal for the session.
    #[error("bootstrap failed, no starting cursor: {0}")]
    Bootstrap(#[source] FetchError),
    #[error("render surface reported no width after {0} attempts")]
    SurfaceNotReady(u32),
    #[error("step must be positive")]
    InvalidStep,
    #[error(transparent)]
    InvalidCursor(#[from] CursorError),
    #[error("another replay cycle is in flight")]
    Busy,
    #[error("{panel} has no point at index {index} (window holds {len})")]
    IndexOutOfRange { panel: Panel, index: usize, len: usize },
    #[error("{0} has not been bootstrapped")]
    PanelNotReady(Panel),
}
