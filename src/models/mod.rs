// Data models
mod order_marks;
mod page;
mod window_buffer;

pub use order_marks::{OrderBook, OrderMark, OrderSide};
pub use page::{Page, SeriesSlice};
pub use window_buffer::WindowBuffer;
