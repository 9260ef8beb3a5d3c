use crate::config::{DF, REPLAY};
use crate::domain::Panel;
use crate::engine::{AdvanceOutcome, ReplayController};
use crate::error::ReplayError;
use crate::models::{OrderBook, OrderMark, OrderSide};
use crate::utils::label_interval;

/// Discrete events forwarded by the input widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Advance by the currently selected step.
    Advance,
    AdvanceBy(usize),
    SetStep(usize),
    Order {
        panel: Panel,
        index: usize,
        side: OrderSide,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionReply {
    Advanced(AdvanceOutcome),
    StepChanged(usize),
    Ordered(OrderMark),
}

/// The input surface of a replay: current step size and confirmed orders.
pub struct ReplaySession {
    controller: ReplayController,
    step: usize,
    orders: OrderBook,
}

impl ReplaySession {
    pub fn new(controller: ReplayController, step: usize) -> Result<Self, ReplayError> {
        if step == 0 {
            return Err(ReplayError::InvalidStep);
        }
        Ok(Self {
            controller,
            step,
            orders: OrderBook::new(),
        })
    }

    pub fn controller(&self) -> &ReplayController {
        &self.controller
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_presets() -> &'static [usize] {
        REPLAY.steps.presets
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub async fn handle(&mut self, event: InputEvent) -> Result<SessionReply, ReplayError> {
        match event {
            InputEvent::Advance => self.advance(self.step).await,
            InputEvent::AdvanceBy(step) => self.advance(step).await,
            InputEvent::SetStep(step) => {
                if step == 0 {
                    return Err(ReplayError::InvalidStep);
                }
                self.step = step;
                Ok(SessionReply::StepChanged(step))
            }
            InputEvent::Order { panel, index, side } => self.place_order(panel, index, side),
        }
    }

    async fn advance(&self, step: usize) -> Result<SessionReply, ReplayError> {
        let outcome = self.controller.advance(step).await?;
        Ok(SessionReply::Advanced(outcome))
    }

    fn place_order(
        &mut self,
        panel: Panel,
        index: usize,
        side: OrderSide,
    ) -> Result<SessionReply, ReplayError> {
        let snapshot = self
            .controller
            .snapshot(panel)
            .filter(|s| !s.buffer.is_empty())
            .ok_or(ReplayError::PanelNotReady(panel))?;

        let mark = self
            .orders
            .place(panel, &snapshot.buffer, index, side)
            .cloned()
            .ok_or(ReplayError::IndexOutOfRange {
                panel,
                index,
                len: snapshot.buffer.len(),
            })?;

        if DF.log_orders {
            log::info!(
                "{} {} at {} ({} = {})",
                panel,
                mark.side,
                mark.at.to_display_utc8(),
                mark.series,
                mark.price
            );
        }
        Ok(SessionReply::Ordered(mark))
    }

    /// Orders on `panel` whose point is still inside its window.
    pub fn visible_marks(&self, panel: Panel) -> Vec<OrderMark> {
        match self.controller.snapshot(panel) {
            Some(snapshot) => self
                .orders
                .visible(panel, &snapshot.buffer)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Axis label spacing for `panel` drawn `pixel_width` wide.
    pub fn label_interval(&self, panel: Panel, pixel_width: f64) -> usize {
        let len = self
            .controller
            .snapshot(panel)
            .map_or(0, |s| s.buffer.len());
        label_interval(len, pixel_width)
    }
}
