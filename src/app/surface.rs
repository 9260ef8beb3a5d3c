use std::sync::atomic::{AtomicU64, Ordering};

/// The chart area the windows are drawn into. Only its width matters here.
pub trait RenderSurface: Send + Sync {
    /// Current drawable width in pixels; zero until laid out.
    fn width(&self) -> f64;
}

/// A surface whose width is set from outside (terminal width, window resize).
#[derive(Debug, Default)]
pub struct SharedSurface {
    width_bits: AtomicU64,
}

impl SharedSurface {
    pub fn new(width: f64) -> Self {
        Self {
            width_bits: AtomicU64::new(width.to_bits()),
        }
    }

    pub fn resize(&self, width: f64) {
        self.width_bits.store(width.to_bits(), Ordering::Release);
    }
}

impl RenderSurface for SharedSurface {
    fn width(&self) -> f64 {
        f64::from_bits(self.width_bits.load(Ordering::Acquire))
    }
}
