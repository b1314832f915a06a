pub mod hud_message;
pub mod page_canvas;

pub use hud_message::{HudMessage, HudMode};
pub use page_canvas::PageCanvas;
