// app/bootstrap.rs

use std::time::Duration;

use crate::config::{DF, PERSISTENCE, REPLAY};
use crate::data::{BoundaryCache, BoundaryInfo, PageProvider};
use crate::domain::{Cursor, Panel};
use crate::engine::{CycleOutcome, ReplayController};
use crate::error::ReplayError;

use super::surface::RenderSurface;

/// Where the starting cursor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSource {
    /// Given on the command line.
    Explicit,
    Cache,
    Remote,
}

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub start: Cursor,
    pub source: StartSource,
    pub surface_width: f64,
    pub panels: Vec<(Panel, CycleOutcome)>,
}

impl BootstrapReport {
    pub fn ready_panels(&self) -> usize {
        self.panels.iter().filter(|(_, o)| o.made_progress()).count()
    }
}

/// Resolves the starting cursor and performs the first full-window fill.
pub struct SessionBootstrapper<'a> {
    cache: &'a dyn BoundaryCache,
    surface: &'a dyn RenderSurface,
    explicit_start: Option<Cursor>,
    retry_delay: Duration,
    max_layout_retries: u32,
}

impl<'a> SessionBootstrapper<'a> {
    pub fn new(cache: &'a dyn BoundaryCache, surface: &'a dyn RenderSurface) -> Self {
        Self {
            cache,
            surface,
            explicit_start: None,
            retry_delay: Duration::from_millis(REPLAY.layout.retry_delay_ms),
            max_layout_retries: REPLAY.layout.max_layout_retries,
        }
    }

    pub fn with_layout_retries(mut self, retry_delay: Duration, max_layout_retries: u32) -> Self {
        self.retry_delay = retry_delay;
        self.max_layout_retries = max_layout_retries;
        self
    }

    /// Start from `raw` instead of the cached or remote boundary.
    pub fn start_at(mut self, raw: &str) -> Result<Self, ReplayError> {
        self.explicit_start = Some(Cursor::parse(raw)?);
        Ok(self)
    }

    /// The cached lower boundary, if the cache holds a parseable pair.
    pub fn cached_start(&self) -> Option<Cursor> {
        let raw = self.cache.get(PERSISTENCE.cache.boundary_key)?;
        match serde_json::from_str::<BoundaryInfo>(&raw) {
            Ok(info) => Some(info.min_k_time),
            Err(e) => {
                log::warn!("Ignoring unparseable cached boundary {:?}: {}", raw, e);
                None
            }
        }
    }

    /// Explicit start, then cache, then one boundary request. No retry: failure ends the session.
    pub async fn resolve_start(
        &self,
        provider: &dyn PageProvider,
    ) -> Result<(Cursor, StartSource), ReplayError> {
        if let Some(start) = self.explicit_start.clone() {
            return Ok((start, StartSource::Explicit));
        }
        if let Some(start) = self.cached_start() {
            return Ok((start, StartSource::Cache));
        }
        let info = provider
            .fetch_boundary()
            .await
            .map_err(ReplayError::Bootstrap)?;
        Ok((info.min_k_time, StartSource::Remote))
    }

    /// Poll until the surface reports a non-zero width.
    pub async fn wait_for_layout(&self) -> Result<f64, ReplayError> {
        for attempt in 0..=self.max_layout_retries {
            let width = self.surface.width();
            if width > 0.0 {
                return Ok(width);
            }
            if attempt < self.max_layout_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        Err(ReplayError::SurfaceNotReady(self.max_layout_retries + 1))
    }

    pub async fn run(&self, controller: &ReplayController) -> Result<BootstrapReport, ReplayError> {
        let (start, source) = self.resolve_start(controller.provider().as_ref()).await?;
        if DF.log_bootstrap {
            log::info!("Replay starts at {} ({:?}).", start, source);
        }

        let surface_width = self.wait_for_layout().await?;
        let panels = controller.bootstrap(&start).await?;

        for (panel, outcome) in &panels {
            if !outcome.made_progress() {
                log::error!("{} could not load its initial window: {:?}", panel, outcome);
            }
        }

        Ok(BootstrapReport {
            start,
            source,
            surface_width,
            panels,
        })
    }
}
