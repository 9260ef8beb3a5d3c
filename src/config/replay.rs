use crate::domain::Panel;

/// Remote chart-data service defaults.
pub struct EndpointConfig {
    pub base_url: &'static str,
    pub timeout_ms: u64,
}

/// Max retained points per panel window.
pub struct PanelCapacities {
    pub signal: usize,
    pub trend: usize,
    pub scope: usize,
}

impl PanelCapacities {
    pub const fn for_panel(&self, panel: Panel) -> usize {
        match panel {
            Panel::Signal => self.signal,
            Panel::Trend => self.trend,
            Panel::Scope => self.scope,
        }
    }
}

/// Step selector presets (points per advance).
pub struct StepConfig {
    pub presets: &'static [usize],
    pub default_step: usize,
}

/// How long bootstrap waits for the render surface to report a size.
pub struct LayoutConfig {
    pub retry_delay_ms: u64,
    pub max_layout_retries: u32,
    /// Surface width assumed when none is given on the command line.
    pub default_width_px: f64,
}

pub struct DensityConfig {
    /// Assumed minimum width of one axis label, in pixels.
    pub min_label_width_px: f64,
}

pub struct ReplayConfig {
    pub endpoint: EndpointConfig,
    pub capacities: PanelCapacities,
    pub steps: StepConfig,
    pub layout: LayoutConfig,
    pub density: DensityConfig,
}

pub const REPLAY: ReplayConfig = ReplayConfig {
    endpoint: EndpointConfig {
        base_url: "http://127.0.0.1:5000",
        timeout_ms: 5000,
    },
    capacities: PanelCapacities {
        signal: 300,
        trend: 200,
        scope: 100,
    },
    steps: StepConfig {
        presets: &[1, 5, 10],
        default_step: 1,
    },
    layout: LayoutConfig {
        retry_delay_ms: 100,
        max_layout_retries: 50,
        default_width_px: 1200.0,
    },
    density: DensityConfig {
        min_label_width_px: 200.0,
    },
};

/// Runtime settings: the const defaults above, overridden from the command line.
#[derive(Debug, Clone)]
pub struct ReplaySettings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub cache_path: String,
    pub step: usize,
    pub surface_width: f64,
    /// Explicit start cursor, raw; validated at bootstrap.
    pub start: Option<String>,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            base_url: REPLAY.endpoint.base_url.to_string(),
            timeout_ms: REPLAY.endpoint.timeout_ms,
            cache_path: crate::config::PERSISTENCE.cache.path.to_string(),
            step: REPLAY.steps.default_step,
            surface_width: REPLAY.layout.default_width_px,
            start: None,
        }
    }
}
