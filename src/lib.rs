#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types outside of crate (for the binary)
pub use app::{
    Command, HELP, InputEvent, ReplaySession, SessionBootstrapper, SessionReply, SharedSurface,
    render_window,
};
pub use config::{PERSISTENCE, REPLAY, ReplaySettings};
pub use data::{HttpPageProvider, JsonFileCache};
pub use domain::{Cursor, Panel};
pub use engine::ReplayController;
pub use error::ReplayError;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Chart-data service root
    #[arg(long, default_value = REPLAY.endpoint.base_url)]
    pub base_url: String,

    /// JSON file holding the cached session boundaries
    #[arg(long, default_value = PERSISTENCE.cache.path)]
    pub cache_path: String,

    /// Rows fetched per advance
    #[arg(long, default_value_t = REPLAY.steps.default_step)]
    pub step: usize,

    /// Width of the render surface in pixels (drives axis label density)
    #[arg(long, default_value_t = REPLAY.layout.default_width_px)]
    pub width: f64,

    /// Start cursor (YYYYMMDDHHmmss); skips the cache and the boundary lookup
    #[arg(long)]
    pub start: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value_t = REPLAY.endpoint.timeout_ms)]
    pub timeout_ms: u64,
}

impl Cli {
    pub fn into_settings(self) -> ReplaySettings {
        ReplaySettings {
            base_url: self.base_url,
            timeout_ms: self.timeout_ms,
            cache_path: self.cache_path,
            step: self.step,
            surface_width: self.width,
            start: self.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_settings() {
        let settings = Cli::parse_from(["kline-replay"]).into_settings();
        let defaults = ReplaySettings::default();
        assert_eq!(settings.base_url, defaults.base_url);
        assert_eq!(settings.cache_path, defaults.cache_path);
        assert_eq!(settings.step, defaults.step);
        assert_eq!(settings.timeout_ms, defaults.timeout_ms);
        assert_eq!(settings.start, None);
    }

    #[test]
    fn cli_overrides() {
        let settings = Cli::parse_from([
            "kline-replay",
            "--base-url",
            "http://chart.local:8000",
            "--step",
            "5",
            "--width",
            "640",
            "--start",
            "20250121031000",
        ])
        .into_settings();
        assert_eq!(settings.base_url, "http://chart.local:8000");
        assert_eq!(settings.step, 5);
        assert_eq!(settings.surface_width, 640.0);
        assert_eq!(settings.start.as_deref(), Some("20250121031000"));
    }
}
