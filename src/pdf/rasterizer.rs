//! Page rasterization, shrunk to fit a display box

use std::num::NonZeroU32;

use fast_image_resize as fir;
use image::RgbImage;
use log::debug;

use super::backend::PdfBackend;
use super::error::PdfError;

/// Render the 1-based `page_number` so it fits within `max_width` x `max_height`.
///
/// The page is rasterized at `dpi`. If it already fits, it is returned at
/// that native resolution; otherwise it is downsized preserving its aspect
/// ratio. Pages are never upscaled.
pub fn render<B: PdfBackend + ?Sized>(
    backend: &B,
    page_number: usize,
    max_width: u32,
    max_height: u32,
    dpi: f32,
) -> Result<RgbImage, PdfError> {
    let index = page_number.checked_sub(1).ok_or(PdfError::PageOutOfRange {
        page: page_number,
        count: backend.page_count()?,
    })?;
    backend.check_index(index)?;

    let native = backend.rasterize(index, dpi)?;
    let (width, height) = native.dimensions();
    let (fit_w, fit_h) = fit_within(width, height, max_width, max_height);

    if (fit_w, fit_h) == (width, height) {
        return Ok(native);
    }

    debug!("Resizing page {page_number} from {width}x{height} to {fit_w}x{fit_h}");
    resize(native, fit_w, fit_h)
}

/// Target size for a `width` x `height` image inside the given box.
///
/// Returns the input unchanged when it already fits.
#[must_use]
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let aspect = width as f64 / height.max(1) as f64;
    let (w, h) = if f64::from(max_width) / aspect < f64::from(max_height) {
        (max_width, (f64::from(max_width) / aspect) as u32)
    } else {
        ((f64::from(max_height) * aspect) as u32, max_height)
    };

    (w.max(1), h.max(1))
}

fn resize(img: RgbImage, width: u32, height: u32) -> Result<RgbImage, PdfError> {
    let src_width = NonZeroU32::new(img.width()).ok_or_else(|| PdfError::raster("Invalid source width"))?;
    let src_height =
        NonZeroU32::new(img.height()).ok_or_else(|| PdfError::raster("Invalid source height"))?;
    let dst_width = NonZeroU32::new(width).ok_or_else(|| PdfError::raster("Invalid target width"))?;
    let dst_height =
        NonZeroU32::new(height).ok_or_else(|| PdfError::raster("Invalid target height"))?;

    let src = fir::Image::from_vec_u8(src_width, src_height, img.into_raw(), fir::PixelType::U8x3)
        .map_err(|e| PdfError::raster(format!("Resize source error: {e}")))?;
    let mut dst = fir::Image::new(dst_width, dst_height, fir::PixelType::U8x3);

    let mut resizer = fir::Resizer::new(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3));
    resizer
        .resize(&src.view(), &mut dst.view_mut())
        .map_err(|e| PdfError::raster(format!("Resize error: {e}")))?;

    RgbImage::from_raw(width, height, dst.into_vec())
        .ok_or_else(|| PdfError::raster("Resize produced an invalid buffer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::POINTS_PER_INCH;
    use crate::test_utils::fake::{FakeBackend, FakePage};

    #[test]
    fn fitting_images_are_left_alone() {
        assert_eq!(fit_within(100, 50, 200, 200), (100, 50));
        assert_eq!(fit_within(200, 200, 200, 200), (200, 200));
    }

    #[test]
    fn never_exceeds_the_box_and_keeps_aspect() {
        let cases = [
            (1700, 2200, 612, 792),
            (2200, 1700, 300, 120),
            (612, 792, 160, 90),
            (1000, 10, 50, 50),
            (10, 1000, 50, 50),
            (795, 1123, 795, 600),
        ];
        for (w, h, max_w, max_h) in cases {
            let (fw, fh) = fit_within(w, h, max_w, max_h);
            assert!(fw <= max_w && fh <= max_h, "{w}x{h} in {max_w}x{max_h} gave {fw}x{fh}");
            assert!(fw == max_w || fh == max_h, "one side should touch the box");

            // Truncation moves the free side by at most one pixel.
            let aspect = w as f64 / h as f64;
            let height_ok = (fh as f64 - fw as f64 / aspect).abs() <= 1.0;
            let width_ok = (fw as f64 - fh as f64 * aspect).abs() <= 1.0;
            assert!(height_ok || width_ok, "{w}x{h} lost its aspect: {fw}x{fh}");
        }
    }

    #[test]
    fn degenerate_sides_are_clamped_to_one_pixel() {
        assert_eq!(fit_within(1000, 1, 10, 10), (10, 1));
        assert_eq!(fit_within(1, 1000, 10, 10), (1, 10));
    }

    #[test]
    fn render_downsizes_large_pages() {
        let doc = FakeBackend::new(vec![FakePage::new(600.0, 800.0)]);
        let img = render(&doc, 1, 150, 100, POINTS_PER_INCH).unwrap();
        assert_eq!(img.dimensions(), (75, 100));
    }

    #[test]
    fn render_does_not_upscale_small_pages() {
        let doc = FakeBackend::new(vec![FakePage::new(60.0, 80.0)]);
        let img = render(&doc, 1, 600, 800, POINTS_PER_INCH).unwrap();
        assert_eq!(img.dimensions(), (60, 80));
    }

    #[test]
    fn render_honours_dpi() {
        let doc = FakeBackend::new(vec![FakePage::new(60.0, 80.0)]);
        let img = render(&doc, 1, 600, 800, 2.0 * POINTS_PER_INCH).unwrap();
        assert_eq!(img.dimensions(), (120, 160));
    }

    #[test]
    fn render_rejects_missing_pages() {
        let doc = FakeBackend::new(vec![FakePage::new(60.0, 80.0)]);
        assert!(matches!(
            render(&doc, 0, 10, 10, POINTS_PER_INCH),
            Err(PdfError::PageOutOfRange { page: 0, count: 1 })
        ));
        assert!(matches!(
            render(&doc, 2, 10, 10, POINTS_PER_INCH),
            Err(PdfError::PageOutOfRange { page: 2, count: 1 })
        ));
    }
}
