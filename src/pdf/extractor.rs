//! Layout extraction: page sizes and horizontal text lines in screen space

use std::collections::BTreeSet;

use log::debug;

use super::backend::PdfBackend;
use super::error::PdfError;
use super::types::TextLine;
use crate::geometry::PageSize;

/// Size of the 1-based `page_number` in points
pub fn dimensions<B: PdfBackend + ?Sized>(
    backend: &B,
    page_number: usize,
) -> Result<PageSize, PdfError> {
    let index = to_index(backend, page_number)?;
    Ok(backend.page_box(index)?.size())
}

/// Horizontal text lines of the requested 0-based pages, flipped to screen space.
///
/// Pages are visited in ascending order and lines keep the engine's
/// document order within a page. Each box is flipped with the height of
/// the page it came from.
pub fn extract_lines<B: PdfBackend + ?Sized>(
    backend: &B,
    page_indices: &BTreeSet<usize>,
) -> Result<Vec<TextLine>, PdfError> {
    let mut lines = Vec::new();

    for &index in page_indices {
        backend.check_index(index)?;
        let page_height = backend.page_box(index)?.height();
        let raw = backend.text_lines(index)?;
        let before = lines.len();

        lines.extend(
            raw.iter()
                .filter(|line| line.horizontal)
                .map(|line| TextLine::from_raw(line, page_height)),
        );

        debug!(
            "Extracted {} of {} lines from page {}",
            lines.len() - before,
            raw.len(),
            index + 1
        );
    }

    Ok(lines)
}

fn to_index<B: PdfBackend + ?Sized>(backend: &B, page_number: usize) -> Result<usize, PdfError> {
    match page_number.checked_sub(1) {
        Some(index) => {
            backend.check_index(index)?;
            Ok(index)
        }
        None => Err(PdfError::PageOutOfRange {
            page: page_number,
            count: backend.page_count()?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PdfRect, ScreenRect};
    use crate::test_utils::fake::{FakeBackend, FakePage};

    fn two_page_doc() -> FakeBackend {
        FakeBackend::new(vec![
            FakePage::new(600.0, 800.0)
                .with_line("  Hello\n", PdfRect::new(50.0, 700.0, 150.0, 720.0))
                .with_vertical_line("Sideways", PdfRect::new(10.0, 100.0, 20.0, 400.0))
                .with_line("World", PdfRect::new(50.0, 650.0, 120.0, 668.0)),
            FakePage::new(300.0, 400.0).with_line("Second", PdfRect::new(0.0, 0.0, 40.0, 10.0)),
        ])
    }

    #[test]
    fn dimensions_are_one_based() {
        let doc = two_page_doc();
        assert_eq!(dimensions(&doc, 1).unwrap(), PageSize::new(600.0, 800.0));
        assert_eq!(dimensions(&doc, 2).unwrap(), PageSize::new(300.0, 400.0));
    }

    #[test]
    fn dimensions_reject_page_zero_and_past_end() {
        let doc = two_page_doc();
        assert!(matches!(
            dimensions(&doc, 0),
            Err(PdfError::PageOutOfRange { page: 0, count: 2 })
        ));
        assert!(matches!(
            dimensions(&doc, 3),
            Err(PdfError::PageOutOfRange { page: 3, count: 2 })
        ));
    }

    #[test]
    fn extracts_trimmed_horizontal_lines_in_screen_space() {
        let doc = two_page_doc();
        let lines = extract_lines(&doc, &BTreeSet::from([0])).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[0].bbox, ScreenRect::new(50.0, 150.0, 80.0, 100.0));
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn each_page_flips_with_its_own_height() {
        let doc = two_page_doc();
        let lines = extract_lines(&doc, &BTreeSet::from([1, 0])).unwrap();

        let second = lines.last().unwrap();
        assert_eq!(second.text, "Second");
        assert_eq!(second.bbox, ScreenRect::new(0.0, 40.0, 390.0, 400.0));
    }

    #[test]
    fn only_requested_pages_are_processed() {
        let doc = two_page_doc();
        let lines = extract_lines(&doc, &BTreeSet::from([1])).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Second");
    }

    #[test]
    fn out_of_range_page_propagates() {
        let doc = two_page_doc();
        let err = extract_lines(&doc, &BTreeSet::from([5])).unwrap_err();
        assert!(matches!(err, PdfError::PageOutOfRange { page: 6, count: 2 }));
    }
}
