//! MuPDF-backed implementation of [`PdfBackend`]

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::debug;
use mupdf::text_page::TextBlockType;
use mupdf::{Colorspace, Document, Matrix, Page, Pixmap, TextPageFlags};

use super::backend::PdfBackend;
use super::error::PdfError;
use super::types::RawTextLine;
use super::POINTS_PER_INCH;
use crate::geometry::PdfRect;

/// An open document
pub struct MupdfBackend {
    path: PathBuf,
    doc: Document,
}

impl MupdfBackend {
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let doc = Document::open(path.to_string_lossy().as_ref())?;
        debug!("Opened {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, index: usize) -> Result<Page, PdfError> {
        self.check_index(index)?;
        Ok(self.doc.load_page(index as i32)?)
    }
}

impl PdfBackend for MupdfBackend {
    fn page_count(&self) -> Result<usize, PdfError> {
        Ok(self.doc.page_count()?.max(0) as usize)
    }

    fn page_box(&self, index: usize) -> Result<PdfRect, PdfError> {
        let bounds = self.load(index)?.bounds()?;
        Ok(PdfRect::new(
            0.0,
            0.0,
            bounds.x1 - bounds.x0,
            bounds.y1 - bounds.y0,
        ))
    }

    fn text_lines(&self, index: usize) -> Result<Vec<RawTextLine>, PdfError> {
        let page = self.load(index)?;
        let pb = page.bounds()?;
        let page_height = pb.y1 - pb.y0;
        let text_page = page.to_text_page(TextPageFlags::empty())?;

        // MuPDF reports the text device in a top-left space; restate each box
        // in PDF page space so every backend hands out the same convention.
        let mut lines = Vec::new();
        for block in text_page.blocks() {
            if block.r#type() != TextBlockType::Text {
                continue;
            }
            for line in block.lines() {
                let bbox = line.bounds();
                let mut text = String::new();
                let mut origins = Vec::new();
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        text.push(c);
                    }
                    let origin = ch.origin();
                    origins.push((origin.x, origin.y));
                }

                lines.push(RawTextLine {
                    text,
                    bbox: PdfRect::new(
                        bbox.x0 - pb.x0,
                        page_height - (bbox.y1 - pb.y0),
                        bbox.x1 - pb.x0,
                        page_height - (bbox.y0 - pb.y0),
                    ),
                    horizontal: is_horizontal(&origins),
                });
            }
        }

        debug!("Page {}: {} text lines", index + 1, lines.len());
        Ok(lines)
    }

    fn rasterize(&self, index: usize, dpi: f32) -> Result<RgbImage, PdfError> {
        let page = self.load(index)?;
        let mag = dpi / POINTS_PER_INCH;
        let pixmap = page.to_pixmap(
            &Matrix::new_scale(mag, mag),
            &Colorspace::device_rgb(),
            false,
            false,
        )?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let pixels = pixmap_to_rgb(&pixmap)?;
        RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| PdfError::raster("Pixmap produced an invalid buffer"))
    }
}

/// A line runs horizontally when its baseline moves more along x than y.
///
/// Origins are glyph baseline origins in reading order.
pub(crate) fn is_horizontal(origins: &[(f32, f32)]) -> bool {
    match (origins.first(), origins.last()) {
        (Some(&(fx, fy)), Some(&(lx, ly))) => (ly - fy).abs() <= (lx - fx).abs(),
        _ => true,
    }
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, PdfError> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(PdfError::raster(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    if samples.len() < stride.saturating_mul(height) || row_bytes > stride {
        return Err(PdfError::raster("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = &samples[y * stride..y * stride + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(out)
}
