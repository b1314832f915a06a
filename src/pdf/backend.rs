//! Seam between the viewer and the PDF engine

use image::RgbImage;

use super::error::PdfError;
use super::types::RawTextLine;
use crate::geometry::PdfRect;

/// Operations the viewer needs from a PDF engine.
///
/// Page indices are 0-based. Boxes and lines are reported in PDF space
/// with the origin at the bottom-left corner of the page box.
pub trait PdfBackend {
    /// Number of pages in the open document
    fn page_count(&self) -> Result<usize, PdfError>;

    /// Page box in PDF space, translated so its lower-left corner is the origin
    fn page_box(&self, index: usize) -> Result<PdfRect, PdfError>;

    /// Text lines found by layout analysis, in document order
    fn text_lines(&self, index: usize) -> Result<Vec<RawTextLine>, PdfError>;

    /// Rasterize the whole page at `dpi`, without any fitting
    fn rasterize(&self, index: usize, dpi: f32) -> Result<RgbImage, PdfError>;

    /// Fail with `PageOutOfRange` unless `index` names an existing page
    fn check_index(&self, index: usize) -> Result<(), PdfError> {
        let count = self.page_count()?;
        if index < count {
            Ok(())
        } else {
            Err(PdfError::PageOutOfRange {
                page: index + 1,
                count,
            })
        }
    }
}
