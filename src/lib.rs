// Export modules for use in tests
pub mod event_source;
pub mod geometry;
pub mod main_app;
pub mod panic_handler;
pub mod pdf;
pub mod settings;
pub mod viewer;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use main_app::{AppAction, run_app_with_event_source};
pub use viewer::Viewer;
