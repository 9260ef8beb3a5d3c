mod bootstrap;
mod commands;
mod render;
mod session;
mod surface;

pub use bootstrap::{BootstrapReport, SessionBootstrapper, StartSource};
pub use commands::{Command, HELP};
pub use render::render_window;
pub use session::{InputEvent, ReplaySession, SessionReply};
pub use surface::{RenderSurface, SharedSurface};
