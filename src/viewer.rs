//! The viewer shell: current page, canvas, result label and their layout

use std::collections::BTreeSet;
use std::time::Duration;

use image::RgbImage;
use log::{debug, info, warn};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::geometry::{PageSize, Point};
use crate::hit_test::{CanvasTransform, hit_test_with};
use crate::pdf::{PdfBackend, PdfError, extractor, rasterizer};
use crate::settings::Settings;
use crate::widget::page_canvas::{canvas_pixels, cell_to_canvas};
use crate::widget::{HudMessage, HudMode, PageCanvas};

const TITLE: &str = "Image Viewer";
const PAGE_CHANGE_LABEL: &str = "Page change ";
const PREV_BUTTON: &str = " ‹ ";
const NEXT_BUTTON: &str = " › ";
const RESULT_HEIGHT: u16 = 3;
const HUD_DURATION: Duration = Duration::from_secs(3);

/// A rendered page placed inside the canvas area
pub struct Canvas {
    pub page: usize,
    pub image: RgbImage,
    pub page_size: PageSize,
    pub transform: CanvasTransform,
}

/// Screen regions of the viewer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewerLayout {
    pub title_bar: Rect,
    pub page_change_label: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
    pub canvas: Rect,
    pub result: Rect,
}

impl ViewerLayout {
    #[must_use]
    pub fn split(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(RESULT_HEIGHT),
            ])
            .split(area);

        let bar = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(PAGE_CHANGE_LABEL.chars().count() as u16),
                Constraint::Length(PREV_BUTTON.chars().count() as u16),
                Constraint::Length(NEXT_BUTTON.chars().count() as u16),
            ])
            .split(rows[0]);

        Self {
            title_bar: bar[0],
            page_change_label: bar[1],
            prev_button: bar[2],
            next_button: bar[3],
            canvas: rows[1],
            result: rows[2],
        }
    }
}

/// Application state for a single open document
pub struct Viewer<B: PdfBackend> {
    backend: B,
    title: String,
    settings: Settings,
    current_page: usize,
    page_count: usize,
    layout: ViewerLayout,
    canvas: Option<Canvas>,
    result: Option<String>,
    pub hud_message: Option<HudMessage>,
}

impl<B: PdfBackend> Viewer<B> {
    /// Open the viewer on page 1 of `backend`
    pub fn new(backend: B, title: impl Into<String>, settings: Settings) -> Result<Self, PdfError> {
        let page_count = backend.page_count()?;
        let first = extractor::dimensions(&backend, 1)?;
        info!(
            "Document has {page_count} pages, first page is {}x{} pt",
            first.width, first.height
        );

        Ok(Self {
            backend,
            title: title.into(),
            settings,
            current_page: 1,
            page_count,
            layout: ViewerLayout::default(),
            canvas: None,
            result: None,
            hud_message: None,
        })
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> &ViewerLayout {
        &self.layout
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lay out the viewer for `area`, re-rendering the page if the canvas moved or resized
    pub fn fit(&mut self, area: Rect) -> Result<(), PdfError> {
        let layout = ViewerLayout::split(area);
        let canvas_changed = layout.canvas != self.layout.canvas;
        self.layout = layout;

        if canvas_changed || self.canvas.is_none() {
            self.show(self.current_page)?;
        }
        Ok(())
    }

    /// Render `page_number` into the canvas, centred
    pub fn show(&mut self, page_number: usize) -> Result<(), PdfError> {
        self.canvas = None;

        let (canvas_w, canvas_h) = canvas_pixels(self.layout.canvas);
        if canvas_w == 0 || canvas_h == 0 {
            debug!("Canvas has no room, skipping render of page {page_number}");
            return Ok(());
        }

        let page_size = extractor::dimensions(&self.backend, page_number)?;
        let image = rasterizer::render(
            &self.backend,
            page_number,
            canvas_w,
            canvas_h,
            self.settings.render_dpi,
        )?;
        let transform = CanvasTransform::centered(image.dimensions(), (canvas_w, canvas_h), page_size);

        debug!(
            "Showing page {page_number} as {}x{} at offset ({}, {})",
            image.width(),
            image.height(),
            transform.offset_x,
            transform.offset_y
        );

        self.canvas = Some(Canvas {
            page: page_number,
            image,
            page_size,
            transform,
        });
        Ok(())
    }

    /// Hit test a click given in canvas pixels and update the result label
    pub fn on_click(&mut self, point: Point) -> Result<&str, PdfError> {
        let lines = extractor::extract_lines(
            &self.backend,
            &BTreeSet::from([self.current_page - 1]),
        )?;

        let hit = self.canvas.as_ref().and_then(|canvas| {
            let page_point = canvas.transform.to_page(point);
            debug!(
                "Click at ({}, {}) maps to ({:.1}, {:.1}) pt on a {}x{} pt page",
                point.x,
                point.y,
                page_point.x,
                page_point.y,
                canvas.page_size.width,
                canvas.page_size.height
            );
            hit_test_with(page_point, &lines, self.settings.tie_break)
        });

        let text = match hit {
            Some(line) => line.text.clone(),
            None => self.settings.not_found_message.clone(),
        };
        info!("Page {}: {text:?}", self.current_page);

        Ok(self.result.insert(text).as_str())
    }

    /// Route a left click at a terminal cell
    pub fn on_mouse_down(&mut self, column: u16, row: u16) -> Result<(), PdfError> {
        let position = Position::new(column, row);

        if self.layout.prev_button.contains(position) {
            self.back()
        } else if self.layout.next_button.contains(position) {
            self.next()
        } else if let Some(point) = cell_to_canvas(self.layout.canvas, column, row) {
            self.on_click(point).map(|_| ())
        } else {
            Ok(())
        }
    }

    pub fn next(&mut self) -> Result<(), PdfError> {
        self.go_to(self.current_page + 1)
    }

    pub fn back(&mut self) -> Result<(), PdfError> {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => Ok(()),
        }
    }

    /// Move to `page_number`, refusing pages outside the document
    fn go_to(&mut self, page_number: usize) -> Result<(), PdfError> {
        if !(1..=self.page_count).contains(&page_number) {
            warn!(
                "Refusing to move to page {page_number}, document has {} pages",
                self.page_count
            );
            self.show_hud(
                format!("No page {page_number} (document has {} pages)", self.page_count),
                HudMode::Error,
            );
            return Ok(());
        }

        self.current_page = page_number;
        self.result = None;
        self.canvas = None;
        self.show(page_number)
    }

    pub fn show_hud(&mut self, message: impl Into<String>, mode: HudMode) {
        self.hud_message = Some(HudMessage::new(message, HUD_DURATION, mode));
    }

    /// Drop an expired HUD message; returns true if one was removed
    pub fn update_hud_message(&mut self) -> bool {
        if self.hud_message.as_ref().is_some_and(HudMessage::is_expired) {
            self.hud_message = None;
            return true;
        }
        false
    }

    pub fn draw(&self, f: &mut Frame) {
        let layout = &self.layout;

        let title = match &self.hud_message {
            Some(hud) => hud.styled_line().left_aligned(),
            None => Line::from(vec![
                Span::styled(format!(" {TITLE} "), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(
                    "{} · page {}/{}",
                    self.title, self.current_page, self.page_count
                )),
            ]),
        };
        f.render_widget(Paragraph::new(title), layout.title_bar);
        f.render_widget(Paragraph::new(PAGE_CHANGE_LABEL), layout.page_change_label);

        let button = Style::default().add_modifier(Modifier::REVERSED);
        f.render_widget(Paragraph::new(PREV_BUTTON).style(button), layout.prev_button);
        f.render_widget(Paragraph::new(NEXT_BUTTON).style(button), layout.next_button);

        if let Some(canvas) = &self.canvas {
            f.render_widget(
                PageCanvas::new(&canvas.image, canvas.transform.offset_x, canvas.transform.offset_y),
                layout.canvas,
            );
        }

        let result = Paragraph::new(self.result.as_deref().unwrap_or_default())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(result, layout.result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PdfRect;
    use crate::hit_test::{NOT_FOUND, TieBreak};
    use crate::test_utils::fake::{FakeBackend, FakePage};

    /// 155x54 cells leaves a 155x50 cell canvas, i.e. 155x100 pixels
    const AREA: Rect = Rect::new(0, 0, 155, 54);

    fn hello_viewer() -> Viewer<FakeBackend> {
        let backend = FakeBackend::new(vec![
            FakePage::new(600.0, 800.0).with_line("Hello", PdfRect::new(50.0, 700.0, 150.0, 720.0)),
            FakePage::new(600.0, 800.0).with_line("Other", PdfRect::new(0.0, 0.0, 600.0, 800.0)),
            FakePage::new(800.0, 600.0),
        ]);
        let mut viewer = Viewer::new(backend, "hello.pdf", Settings::default()).unwrap();
        viewer.fit(AREA).unwrap();
        viewer
    }

    #[test]
    fn layout_keeps_buttons_top_right() {
        let layout = ViewerLayout::split(AREA);
        assert_eq!(layout.next_button, Rect::new(152, 0, 3, 1));
        assert_eq!(layout.prev_button, Rect::new(149, 0, 3, 1));
        assert_eq!(layout.canvas, Rect::new(0, 1, 155, 50));
        assert_eq!(layout.result, Rect::new(0, 51, 155, 3));
    }

    #[test]
    fn show_centres_the_page() {
        let viewer = hello_viewer();
        let canvas = viewer.canvas().unwrap();

        assert_eq!(canvas.image.dimensions(), (75, 100));
        assert_eq!((canvas.transform.offset_x, canvas.transform.offset_y), (40, 0));
        assert_eq!(canvas.page, 1);
        assert_eq!(canvas.page_size, PageSize::new(600.0, 800.0));
    }

    #[test]
    fn clicking_a_line_reports_its_text() {
        let mut viewer = hello_viewer();

        assert_eq!(viewer.on_click(Point::new(52.5, 11.25)).unwrap(), "Hello");
        assert_eq!(viewer.result(), Some("Hello"));
        assert_eq!(viewer.on_click(Point::new(52.5, 62.5)).unwrap(), NOT_FOUND);
    }

    #[test]
    fn margin_clicks_are_not_found() {
        let mut viewer = hello_viewer();
        assert_eq!(viewer.on_click(Point::new(5.0, 11.25)).unwrap(), NOT_FOUND);
    }

    #[test]
    fn every_click_extracts_again() {
        let mut viewer = hello_viewer();
        viewer.on_click(Point::new(52.5, 11.25)).unwrap();
        viewer.on_click(Point::new(52.5, 11.25)).unwrap();
        assert_eq!(viewer.backend().text_line_calls(), 2);
    }

    #[test]
    fn custom_not_found_message() {
        let backend = FakeBackend::new(vec![FakePage::new(100.0, 100.0)]);
        let settings = Settings {
            not_found_message: "nothing".to_string(),
            ..Settings::default()
        };
        let mut viewer = Viewer::new(backend, "x.pdf", settings).unwrap();
        viewer.fit(AREA).unwrap();
        assert_eq!(viewer.on_click(Point::new(60.0, 50.0)).unwrap(), "nothing");
    }

    fn overlapping_viewer(tie_break: TieBreak) -> Viewer<FakeBackend> {
        let backend = FakeBackend::new(vec![
            FakePage::new(600.0, 800.0)
                .with_line("Hello", PdfRect::new(50.0, 700.0, 150.0, 720.0))
                .with_line("Cover", PdfRect::new(0.0, 0.0, 600.0, 800.0)),
        ]);
        let settings = Settings {
            tie_break,
            ..Settings::default()
        };
        let mut viewer = Viewer::new(backend, "overlap.pdf", settings).unwrap();
        viewer.fit(AREA).unwrap();
        viewer
    }

    #[test]
    fn overlapping_lines_follow_the_configured_tie_break() {
        let mut last = overlapping_viewer(TieBreak::LastMatch);
        assert_eq!(last.on_click(Point::new(52.5, 11.25)).unwrap(), "Cover");

        let mut smallest = overlapping_viewer(TieBreak::SmallestArea);
        assert_eq!(smallest.on_click(Point::new(52.5, 11.25)).unwrap(), "Hello");
        assert_eq!(smallest.on_click(Point::new(52.5, 62.5)).unwrap(), "Cover");
    }

    #[test]
    fn navigation_clears_the_result_and_rerenders() {
        let mut viewer = hello_viewer();
        viewer.on_click(Point::new(52.5, 11.25)).unwrap();

        viewer.next().unwrap();
        assert_eq!(viewer.current_page(), 2);
        assert_eq!(viewer.result(), None);
        assert_eq!(viewer.canvas().unwrap().page, 2);

        viewer.on_click(Point::new(52.5, 11.25)).unwrap();
        assert_eq!(viewer.result(), Some("Other"));
    }

    #[test]
    fn forward_then_back_renders_identical_pixels() {
        let mut viewer = hello_viewer();
        let original = viewer.canvas().unwrap().image.clone();

        viewer.next().unwrap();
        assert_ne!(viewer.canvas().unwrap().image, original);
        viewer.back().unwrap();

        assert_eq!(viewer.current_page(), 1);
        assert_eq!(viewer.canvas().unwrap().image, original);
    }

    #[test]
    fn landscape_page_is_letterboxed() {
        let mut viewer = hello_viewer();
        viewer.next().unwrap();
        viewer.next().unwrap();

        let canvas = viewer.canvas().unwrap();
        assert_eq!(canvas.image.dimensions(), (133, 100));
        assert_eq!(canvas.transform.offset_x, 11);
    }

    #[test]
    fn navigation_refuses_pages_outside_the_document() {
        let mut viewer = hello_viewer();

        viewer.back().unwrap();
        assert_eq!(viewer.current_page(), 1);
        assert!(matches!(viewer.hud_message, Some(HudMessage { mode: HudMode::Error, .. })));

        viewer.next().unwrap();
        viewer.next().unwrap();
        viewer.on_click(Point::new(52.5, 11.25)).unwrap();
        viewer.next().unwrap();
        assert_eq!(viewer.current_page(), 3);
        assert_eq!(viewer.result(), Some(NOT_FOUND));
        assert!(viewer.canvas().is_some());
    }

    #[test]
    fn mouse_down_routes_to_buttons_and_canvas() {
        let mut viewer = hello_viewer();

        // Cell (52, 6) covers canvas pixels x 52..53, y 10..12.
        viewer.on_mouse_down(52, 6).unwrap();
        assert_eq!(viewer.result(), Some("Hello"));

        viewer.on_mouse_down(153, 0).unwrap();
        assert_eq!(viewer.current_page(), 2);
        viewer.on_mouse_down(150, 0).unwrap();
        assert_eq!(viewer.current_page(), 1);

        viewer.on_mouse_down(10, 52).unwrap();
        assert_eq!(viewer.result(), None);
    }

    #[test]
    fn fit_rerenders_only_when_the_canvas_changes() {
        let mut viewer = hello_viewer();
        let before = viewer.backend().raster_calls();

        viewer.fit(AREA).unwrap();
        assert_eq!(viewer.backend().raster_calls(), before);

        viewer.fit(Rect::new(0, 0, 80, 24)).unwrap();
        assert_eq!(viewer.backend().raster_calls(), before + 1);
        let canvas = viewer.canvas().unwrap();
        assert!(canvas.image.width() <= 80 && canvas.image.height() <= 40);
    }
}
