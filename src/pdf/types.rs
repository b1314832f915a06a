//! Core types for PDF layout extraction

use crate::geometry::{PdfRect, ScreenRect};

/// A text line as the engine reports it, still in PDF space
#[derive(Clone, Debug, PartialEq)]
pub struct RawTextLine {
    /// Untrimmed line text
    pub text: String,
    /// Bounding box in PDF space (bottom-left origin)
    pub bbox: PdfRect,
    /// Whether glyphs advance horizontally along the baseline
    pub horizontal: bool,
}

/// A horizontal text line ready for hit testing
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Trimmed line text
    pub text: String,
    /// Bounding box in screen space (top-left origin), in points
    pub bbox: ScreenRect,
}

impl TextLine {
    /// Build a line from raw engine output, flipping its box with the page height
    #[must_use]
    pub fn from_raw(raw: &RawTextLine, page_height: f32) -> Self {
        Self {
            text: raw.text.trim().to_string(),
            bbox: raw.bbox.to_screen(page_height),
        }
    }
}
