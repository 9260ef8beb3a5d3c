// Domain types and value objects
mod cursor;
mod panel;

// Re-export commonly used types to the world
pub use cursor::{CURSOR_FORMAT, Cursor, CursorError};
pub use panel::Panel;
