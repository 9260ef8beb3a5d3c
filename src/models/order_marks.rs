// src/models/order_marks.rs

use {
    crate::{
        domain::{Cursor, Panel},
        models::WindowBuffer,
    },
    serde::{Deserialize, Serialize},
    strum_macros::Display,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum OrderSide {
    #[strum(to_string = "Buy Long")]
    Buy,
    #[strum(to_string = "Sell Short")]
    Sell,
    #[strum(to_string = "Close")]
    Close,
}

/// A confirmed order placed on a data point of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMark {
    pub panel: Panel,
    pub at: Cursor,
    pub series: String,
    pub price: f64,
    pub side: OrderSide,
}

#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    marks: Vec<OrderMark>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// Mark the point at `index` of the panel window, priced from the first series.
    /// Returns None when the index is outside the window or no series has a value there.
    pub fn place(
        &mut self,
        panel: Panel,
        buffer: &WindowBuffer,
        index: usize,
        side: OrderSide,
    ) -> Option<&OrderMark> {
        let at = buffer.timestamps().get(index)?.clone();
        let series = buffer.series_names().first()?.clone();
        let price = buffer.value_at(&series, index)?;

        self.marks.push(OrderMark {
            panel,
            at,
            series,
            price,
            side,
        });
        self.marks.last()
    }

    pub fn all(&self) -> &[OrderMark] {
        &self.marks
    }

    /// Marks of `panel` whose point is still inside the window.
    pub fn visible<'a>(
        &'a self,
        panel: Panel,
        buffer: &'a WindowBuffer,
    ) -> impl Iterator<Item = &'a OrderMark> + 'a {
        let oldest = buffer.timestamps().first();
        self.marks
            .iter()
            .filter(move |m| m.panel == panel && oldest.is_some_and(|o| &m.at >= o))
    }
}
