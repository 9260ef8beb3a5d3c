use {
    async_trait::async_trait,
    std::time::Duration,
    thiserror::Error,
};

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    config::ReplaySettings,
    data::wire::{BoundaryInfo, decode_boundary, decode_page},
    domain::{Cursor, Panel},
    models::Page,
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response carries no xAxis timestamps")]
    MissingTimestamps,
    #[error("series {series:?} has {values} values for {timestamps} timestamps")]
    ShapeMismatch {
        series: String,
        values: usize,
        timestamps: usize,
    },
    #[error("page size must be positive")]
    InvalidSize,
}

/// Where a page starts relative to the cursor. Replay only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAnchor {
    /// Earliest slice from the cursor forward, cursor included (`front=true`).
    Front,
    /// Slice starting just after the cursor (`front=false`).
    After,
}

impl PageAnchor {
    pub fn is_front(&self) -> bool {
        matches!(self, PageAnchor::Front)
    }
}

/// Abstract interface for the remote chart-data service.
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// Fetch up to `size` points of `panel` relative to `cursor`.
    async fn fetch_page(
        &self,
        panel: Panel,
        cursor: &Cursor,
        anchor: PageAnchor,
        size: usize,
    ) -> Result<Page, FetchError>;

    /// Ask the service for the first and last available cursor.
    async fn fetch_boundary(&self) -> Result<BoundaryInfo, FetchError>;
}

pub struct HttpPageProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPageProvider {
    pub fn new(settings: &ReplaySettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(concat!("kline-replay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn page_url(
        &self,
        panel: Panel,
        cursor: &Cursor,
        anchor: PageAnchor,
        size: usize,
    ) -> String {
        format!(
            "{}/chart_data/{}/{}?front={}&size={}",
            self.base_url,
            panel.wire_name(),
            cursor,
            anchor.is_front(),
            size
        )
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageProvider for HttpPageProvider {
    async fn fetch_page(
        &self,
        panel: Panel,
        cursor: &Cursor,
        anchor: PageAnchor,
        size: usize,
    ) -> Result<Page, FetchError> {
        if size == 0 {
            return Err(FetchError::InvalidSize);
        }
        let url = self.page_url(panel, cursor, anchor, size);
        let page = decode_page(&self.get_text(&url).await?)?;

        #[cfg(debug_assertions)]
        if DF.log_fetches {
            log::info!("GET {} -> {} rows", url, page.len());
        }

        Ok(page)
    }

    async fn fetch_boundary(&self) -> Result<BoundaryInfo, FetchError> {
        let url = format!("{}/k_time_info", self.base_url);
        decode_boundary(&self.get_text(&url).await?)
    }
}
