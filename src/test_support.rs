//! Shared fixtures for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tokio::sync::Semaphore;

use crate::data::{BoundaryInfo, FetchError, PageAnchor, PageProvider};
use crate::domain::{Cursor, Panel};
use crate::models::Page;

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 21)
        .and_then(|d| d.and_hms_opt(3, 10, 0))
        .expect("valid base time")
}

/// Cursor `minute` minutes after 2025-01-21 03:10:00.
pub(crate) fn cursor_at(minute: i64) -> Cursor {
    Cursor::from_naive(base_time() + Duration::minutes(minute))
}

pub(crate) fn minute_of(cursor: &Cursor) -> i64 {
    let time = cursor.to_naive().expect("test cursor");
    (time - base_time()).num_minutes()
}

pub(crate) fn cursors(minutes: std::ops::Range<i64>) -> Vec<Cursor> {
    minutes.map(cursor_at).collect()
}

/// Page over `minutes` where every series value equals its minute.
pub(crate) fn page_of(minutes: std::ops::Range<i64>, names: &[&str]) -> Page {
    let values: Vec<f64> = minutes.clone().map(|m| m as f64).collect();
    names.iter().fold(Page::new(cursors(minutes)), |page, name| {
        page.with_series(*name, values.clone())
    })
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FetchCall {
    pub panel: Panel,
    pub cursor: Cursor,
    pub anchor: PageAnchor,
    pub size: usize,
}

/// In-memory service with one point per minute and no upper bound.
pub(crate) struct MockProvider {
    calls: Mutex<Vec<FetchCall>>,
    failing: Mutex<HashSet<Panel>>,
    exhausted: Mutex<HashSet<Panel>>,
    boundary: Option<BoundaryInfo>,
    boundary_calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            exhausted: Mutex::new(HashSet::new()),
            boundary: Some(BoundaryInfo {
                min_k_time: cursor_at(0),
                max_k_time: Some(cursor_at(10_000)),
            }),
            boundary_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Every fetch waits for a permit from `open_gate`.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn without_boundary() -> Self {
        Self {
            boundary: None,
            ..Self::new()
        }
    }

    pub fn open_gate(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn fail_panel(&self, panel: Panel) {
        self.failing.lock().unwrap().insert(panel);
    }

    pub fn exhaust_panel(&self, panel: Panel) {
        self.exhausted.lock().unwrap().insert(panel);
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn boundary_calls(&self) -> usize {
        self.boundary_calls.load(Ordering::SeqCst)
    }

    /// Yield until at least `n` fetches have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PageProvider for MockProvider {
    async fn fetch_page(
        &self,
        panel: Panel,
        cursor: &Cursor,
        anchor: PageAnchor,
        size: usize,
    ) -> Result<Page, FetchError> {
        self.calls.lock().unwrap().push(FetchCall {
            panel,
            cursor: cursor.clone(),
            anchor,
            size,
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.failing.lock().unwrap().contains(&panel) {
            return Err(FetchError::MissingTimestamps);
        }
        if self.exhausted.lock().unwrap().contains(&panel) {
            return Ok(Page::default());
        }

        let first = match anchor {
            PageAnchor::Front => minute_of(cursor),
            PageAnchor::After => minute_of(cursor) + 1,
        };
        Ok(page_of(first..first + size as i64, &["close", "ma"]))
    }

    async fn fetch_boundary(&self) -> Result<BoundaryInfo, FetchError> {
        self.boundary_calls.fetch_add(1, Ordering::SeqCst);
        self.boundary.clone().ok_or(FetchError::Status {
            status: 503,
            url: "/k_time_info".to_string(),
        })
    }
}
