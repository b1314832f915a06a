//! PDF layout extraction and rendering

mod backend;
#[cfg(feature = "pdf")]
mod engine;
mod error;
pub mod extractor;
pub mod rasterizer;
mod types;

pub use backend::PdfBackend;
#[cfg(feature = "pdf")]
pub use engine::MupdfBackend;
pub use error::PdfError;
pub use types::{RawTextLine, TextLine};

/// Points per inch; rasterizing at this resolution gives one pixel per point
pub const POINTS_PER_INCH: f32 = 72.0;
