pub mod clock;
pub mod reload;
pub mod render;
pub mod resource;

pub use clock::{Clock, SystemClock};
pub use reload::{reload_url, HttpReloadNotifier, ReloadError, ReloadNotifier};
pub use render::{render_to_file, RenderError};
pub use resource::{ControllerError, GenerateTarget, ResourceController};
