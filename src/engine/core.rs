use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use strum::IntoEnumIterator;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinSet;

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::data::{PageAnchor, PageProvider};
use crate::domain::{Cursor, Panel};
use crate::error::ReplayError;
use crate::models::Page;

use super::in_flight::InFlightToken;
use super::messages::{AdvanceOutcome, CycleOutcome};
use super::state::{PanelPhase, PanelSnapshot, PanelState};

/// One panel's live state plus the lock that keeps its cycles in order.
struct PanelSlot {
    /// Held for a whole fetch/merge cycle.
    cycle: Mutex<()>,
    /// Short-lived lock; readers only ever copy out of it.
    state: RwLock<PanelState>,
}

impl PanelSlot {
    fn new(panel: Panel) -> Self {
        Self {
            cycle: Mutex::new(()),
            state: RwLock::new(PanelState::new(panel)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PanelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PanelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts the panel into its settled phase when the cycle ends or is aborted.
struct PhaseSettle<'a> {
    slot: &'a PanelSlot,
    phase: PanelPhase,
}

impl Drop for PhaseSettle<'_> {
    fn drop(&mut self) {
        self.slot.write().phase = self.phase;
    }
}

#[derive(Debug, Clone)]
enum CycleKind {
    /// Full-capacity first page from the starting cursor.
    Initial(Cursor),
    /// `step` points after the current cursor.
    Increment(usize),
}

struct ControllerInner {
    provider: Arc<dyn PageProvider>,
    slots: BTreeMap<Panel, PanelSlot>,
    in_flight: InFlightToken,
    revision: watch::Sender<u64>,
}

/// Owns every panel's cursor and window and runs fetch→merge→advance cycles.
///
/// Cheap to clone; clones drive the same panels.
#[derive(Clone)]
pub struct ReplayController {
    inner: Arc<ControllerInner>,
}

impl ReplayController {
    pub fn new(provider: Arc<dyn PageProvider>) -> Self {
        Self::with_token(provider, InFlightToken::new())
    }

    /// Use an existing in-flight token, e.g. one shared with another controller.
    pub fn with_token(provider: Arc<dyn PageProvider>, in_flight: InFlightToken) -> Self {
        let slots = Panel::iter().map(|p| (p, PanelSlot::new(p))).collect();
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(ControllerInner {
                provider,
                slots,
                in_flight,
                revision,
            }),
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = Panel> + '_ {
        self.inner.slots.keys().copied()
    }

    pub fn provider(&self) -> Arc<dyn PageProvider> {
        self.inner.provider.clone()
    }

    pub fn in_flight(&self) -> &InFlightToken {
        &self.inner.in_flight
    }

    /// Receiver whose value is bumped after every merge (the render trigger).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    pub fn snapshot(&self, panel: Panel) -> Option<PanelSnapshot> {
        self.inner.slots.get(&panel).map(|s| s.read().snapshot())
    }

    pub fn cursor(&self, panel: Panel) -> Option<Cursor> {
        self.inner.slots.get(&panel)?.read().cursor.clone()
    }

    pub fn phase(&self, panel: Panel) -> Option<PanelPhase> {
        self.inner.slots.get(&panel).map(|s| s.read().phase)
    }

    /// Fill every panel's window from `start`. Panels whose first page fails
    /// or is empty stay uninitialized; the others proceed.
    pub async fn bootstrap(
        &self,
        start: &Cursor,
    ) -> Result<Vec<(Panel, CycleOutcome)>, ReplayError> {
        let _guard = self.inner.in_flight.try_acquire().ok_or(ReplayError::Busy)?;
        Ok(self.run_all(CycleKind::Initial(start.clone())).await)
    }

    /// Move every initialized panel forward by up to `step` points.
    ///
    /// A request arriving while any cycle is in flight is dropped and reported
    /// as `Coalesced`. Failed or empty fetches leave that panel unchanged.
    pub async fn advance(&self, step: usize) -> Result<AdvanceOutcome, ReplayError> {
        if step == 0 {
            return Err(ReplayError::InvalidStep);
        }
        let Some(_guard) = self.inner.in_flight.try_acquire() else {
            #[cfg(debug_assertions)]
            if DF.log_coalesced {
                log::info!("Advance by {} dropped: a cycle is already in flight.", step);
            }
            return Ok(AdvanceOutcome::Coalesced);
        };
        let results = crate::trace_time!(&format!("Advance by {}", step), 500_000, {
            self.run_all(CycleKind::Increment(step)).await
        });
        Ok(AdvanceOutcome::Completed(results))
    }

    /// One task per panel. Dropping the returned future aborts the tasks.
    async fn run_all(&self, kind: CycleKind) -> Vec<(Panel, CycleOutcome)> {
        let mut tasks = JoinSet::new();
        for panel in self.panels() {
            let inner = self.inner.clone();
            let kind = kind.clone();
            tasks.spawn(async move { (panel, run_panel(inner, panel, kind).await) });
        }

        let mut results = Vec::with_capacity(self.inner.slots.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => log::error!("Panel cycle task ended abnormally: {}", e),
            }
        }
        results.sort_by_key(|(panel, _)| *panel);
        results
    }
}

async fn run_panel(inner: Arc<ControllerInner>, panel: Panel, kind: CycleKind) -> CycleOutcome {
    let Some(slot) = inner.slots.get(&panel) else {
        return CycleOutcome::Skipped;
    };
    let _cycle = slot.cycle.lock().await;

    let (cursor, anchor, size, settled) = {
        let state = slot.read();
        match &kind {
            CycleKind::Initial(start) => {
                let size = panel.capacity();
                (start.clone(), PageAnchor::Front, size, state.phase)
            }
            CycleKind::Increment(step) => match (&state.cursor, state.phase) {
                (Some(cursor), PanelPhase::Idle) => {
                    (cursor.clone(), PageAnchor::After, *step, PanelPhase::Idle)
                }
                _ => return CycleOutcome::Skipped,
            },
        }
    };

    slot.write().phase = PanelPhase::Fetching;
    let mut settle = PhaseSettle {
        slot,
        phase: settled,
    };

    let fetched = inner.provider.fetch_page(panel, &cursor, anchor, size).await;

    let outcome = match fetched {
        Ok(page) if page.is_empty() => {
            log::info!("{}: no data after {}.", panel, cursor);
            CycleOutcome::Empty
        }
        Ok(page) if !anchor.is_front() && ends_at_or_before(&page, &cursor) => {
            let reason = format!(
                "page ends at {} which is not after cursor {}",
                page.last_timestamp().map_or_else(String::new, |t| t.to_string()),
                cursor
            );
            log::warn!("{}: dropping stale page, {}.", panel, reason);
            slot.write().last_error = Some(reason.clone());
            CycleOutcome::Failed(reason)
        }
        Ok(page) => {
            let mut state = slot.write();
            state.phase = PanelPhase::Merging;
            let rows = page.len();
            match kind {
                CycleKind::Initial(_) => state.install_initial(page),
                CycleKind::Increment(_) => {
                    state.apply_increment(page);
                }
            }
            settle.phase = PanelPhase::Idle;
            match state.cursor.clone() {
                Some(cursor) => CycleOutcome::Advanced { rows, cursor },
                None => CycleOutcome::Empty,
            }
        }
        Err(e) => {
            log::warn!("{}: fetch from {} failed, skipping this cycle: {}", panel, cursor, e);
            let mut state = slot.write();
            state.phase = PanelPhase::Failed;
            state.last_error = Some(e.to_string());
            CycleOutcome::Failed(e.to_string())
        }
    };
    drop(settle);

    if outcome.made_progress() {
        inner.revision.send_modify(|r| *r = r.wrapping_add(1));
    }
    outcome
}

/// An increment must end strictly after the cursor it was requested from.
fn ends_at_or_before(page: &Page, cursor: &Cursor) -> bool {
    page.last_timestamp().is_some_and(|last| last <= cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockProvider, cursor_at, cursors, page_of};
    use std::time::Duration;

    fn controller(mock: &Arc<MockProvider>) -> ReplayController {
        ReplayController::new(mock.clone())
    }

    #[tokio::test]
    async fn bootstrap_fills_full_window_per_panel() {
        let mock = Arc::new(MockProvider::new());
        let ctl = controller(&mock);
        let start = cursor_at(0);

        let results = ctl.bootstrap(&start).await.unwrap();
        assert_eq!(results.len(), 3);

        for panel in Panel::iter() {
            let snap = ctl.snapshot(panel).unwrap();
            let cap = panel.capacity() as i64;
            assert_eq!(snap.buffer.len(), panel.capacity());
            assert_eq!(snap.cursor, Some(cursor_at(cap - 1)));
            assert_eq!(snap.phase, PanelPhase::Idle);
        }
        for call in mock.calls() {
            assert_eq!(call.cursor, start);
            assert_eq!(call.anchor, PageAnchor::Front);
            assert_eq!(call.size, call.panel.capacity());
        }
        assert_eq!(ctl.revision(), 3);
    }

    #[tokio::test]
    async fn advance_merges_and_moves_cursor() {
        let mock = Arc::new(MockProvider::new());
        let ctl = controller(&mock);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        mock.clear_calls();

        let outcome = ctl.advance(5).await.unwrap();
        assert!(!outcome.is_coalesced());

        let cap = Panel::Scope.capacity() as i64;
        let snap = ctl.snapshot(Panel::Scope).unwrap();
        assert_eq!(snap.cursor, Some(cursor_at(cap + 4)));
        assert_eq!(snap.buffer.len(), Panel::Scope.capacity());
        assert_eq!(snap.buffer.timestamps(), cursors(5..cap + 5).as_slice());
        assert_eq!(
            outcome.outcome_for(Panel::Scope),
            Some(&CycleOutcome::Advanced { rows: 5, cursor: cursor_at(cap + 4) })
        );

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.anchor == PageAnchor::After && c.size == 5));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_panel_unchanged() {
        let mock = Arc::new(MockProvider::new());
        let ctl = controller(&mock);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        let before = ctl.snapshot(Panel::Trend).unwrap();

        mock.fail_panel(Panel::Trend);
        let outcome = ctl.advance(3).await.unwrap();

        let after = ctl.snapshot(Panel::Trend).unwrap();
        assert_eq!(after.buffer, before.buffer);
        assert_eq!(after.cursor, before.cursor);
        assert_eq!(after.phase, PanelPhase::Idle);
        assert!(after.last_error.is_some());
        assert!(matches!(outcome.outcome_for(Panel::Trend), Some(CycleOutcome::Failed(_))));
        // Other panels still progressed.
        assert!(outcome.outcome_for(Panel::Signal).unwrap().made_progress());
    }

    #[tokio::test]
    async fn empty_page_leaves_panel_unchanged() {
        let mock = Arc::new(MockProvider::new());
        let ctl = controller(&mock);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        let before = ctl.snapshot(Panel::Signal).unwrap();
        let revision = ctl.revision();

        mock.exhaust_panel(Panel::Signal);
        let outcome = ctl.advance(1).await.unwrap();

        let after = ctl.snapshot(Panel::Signal).unwrap();
        assert_eq!(after.buffer, before.buffer);
        assert_eq!(after.cursor, before.cursor);
        assert_eq!(outcome.outcome_for(Panel::Signal), Some(&CycleOutcome::Empty));
        assert_eq!(ctl.revision(), revision + 2);
    }

    /// Serves the first page normally, then pages that start back at minute 0.
    struct RewindingProvider {
        inner: MockProvider,
    }

    #[async_trait::async_trait]
    impl PageProvider for RewindingProvider {
        async fn fetch_page(
            &self,
            panel: Panel,
            cursor: &Cursor,
            anchor: PageAnchor,
            size: usize,
        ) -> Result<Page, crate::data::FetchError> {
            match anchor {
                PageAnchor::Front => self.inner.fetch_page(panel, cursor, anchor, size).await,
                PageAnchor::After => Ok(page_of(0..size as i64, &["close", "ma"])),
            }
        }

        async fn fetch_boundary(
            &self,
        ) -> Result<crate::data::BoundaryInfo, crate::data::FetchError> {
            self.inner.fetch_boundary().await
        }
    }

    #[tokio::test]
    async fn page_behind_cursor_never_moves_it_back() {
        let provider = Arc::new(RewindingProvider {
            inner: MockProvider::new(),
        });
        let ctl = ReplayController::new(provider);
        ctl.bootstrap(&cursor_at(100)).await.unwrap();
        let before = ctl.snapshot(Panel::Scope).unwrap();
        let revision = ctl.revision();

        let outcome = ctl.advance(2).await.unwrap();

        let after = ctl.snapshot(Panel::Scope).unwrap();
        assert_eq!(after.cursor, before.cursor);
        assert_eq!(after.buffer, before.buffer);
        assert_eq!(after.phase, PanelPhase::Idle);
        assert!(after.last_error.is_some());
        assert!(matches!(outcome.outcome_for(Panel::Scope), Some(CycleOutcome::Failed(_))));
        assert_eq!(ctl.revision(), revision);
    }

    #[tokio::test]
    async fn panels_without_initial_window_are_skipped() {
        let mock = Arc::new(MockProvider::new());
        mock.fail_panel(Panel::Scope);
        let ctl = controller(&mock);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        assert_eq!(ctl.phase(Panel::Scope), Some(PanelPhase::Uninitialized));
        assert_eq!(ctl.cursor(Panel::Scope), None);

        mock.clear_calls();
        let outcome = ctl.advance(1).await.unwrap();
        assert_eq!(outcome.outcome_for(Panel::Scope), Some(&CycleOutcome::Skipped));
        assert!(mock.calls().iter().all(|c| c.panel != Panel::Scope));
    }

    #[tokio::test]
    async fn back_to_back_advances_run_one_cycle() {
        let mock = Arc::new(MockProvider::gated());
        let ctl = controller(&mock);
        mock.open_gate(3);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        mock.clear_calls();

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.advance(1).await }
        });
        mock.wait_for_calls(3).await;
        assert_eq!(ctl.phase(Panel::Signal), Some(PanelPhase::Fetching));

        let second = ctl.advance(1).await.unwrap();
        assert!(second.is_coalesced());

        mock.open_gate(3);
        let first = first.await.unwrap().unwrap();
        assert!(!first.is_coalesced());
        assert_eq!(mock.calls().len(), 3);
        assert_eq!(ctl.cursor(Panel::Signal), Some(cursor_at(Panel::Signal.capacity() as i64)));
        assert!(!ctl.in_flight().is_busy());
    }

    #[tokio::test]
    async fn shared_token_serializes_controllers() {
        let mock = Arc::new(MockProvider::gated());
        let token = InFlightToken::new();
        let a = ReplayController::with_token(mock.clone(), token.clone());
        let b = ReplayController::with_token(mock.clone(), token);

        let running = tokio::spawn({
            let a = a.clone();
            async move { a.bootstrap(&cursor_at(0)).await }
        });
        mock.wait_for_calls(3).await;

        assert!(b.advance(1).await.unwrap().is_coalesced());
        assert!(matches!(b.bootstrap(&cursor_at(0)).await, Err(ReplayError::Busy)));

        mock.open_gate(3);
        running.await.unwrap().unwrap();
        // An independent controller is unaffected.
        let c = ReplayController::new(Arc::new(MockProvider::new()));
        assert!(c.bootstrap(&cursor_at(0)).await.is_ok());
    }

    #[tokio::test]
    async fn zero_step_is_rejected() {
        let ctl = controller(&Arc::new(MockProvider::new()));
        assert!(matches!(ctl.advance(0).await, Err(ReplayError::InvalidStep)));
    }

    #[tokio::test]
    async fn cancelled_advance_releases_token_and_panels() {
        let mock = Arc::new(MockProvider::gated());
        let ctl = controller(&mock);
        mock.open_gate(3);
        ctl.bootstrap(&cursor_at(0)).await.unwrap();
        let before = ctl.snapshot(Panel::Trend).unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), ctl.advance(2)).await;
        assert!(timed_out.is_err());
        // Let the runtime drop the aborted panel tasks.
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!ctl.in_flight().is_busy());
        let after = ctl.snapshot(Panel::Trend).unwrap();
        assert_eq!(after.phase, PanelPhase::Idle);
        assert_eq!(after.cursor, before.cursor);
        assert_eq!(after.buffer, before.buffer);

        mock.open_gate(3);
        assert!(!ctl.advance(2).await.unwrap().is_coalesced());
    }
}
