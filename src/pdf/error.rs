//! Errors raised while talking to the PDF engine

/// Errors from layout extraction and rasterization
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Engine(#[from] mupdf::error::Error),

    #[error("page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("raster: {detail}")]
    Raster { detail: String },
}

impl PdfError {
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster { detail: msg.into() }
    }
}
