pub mod test_helpers {
    use crate::event_source::{Event, KeyCode, KeyEvent, KeyModifiers, SimulatedEventSource};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl Default for TestScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events.push(Event::Key(KeyEvent::new(code, KeyModifiers::empty())));
            self
        }

        /// Left click on a terminal cell
        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::left_click(column, row));
            self
        }

        pub fn resize(mut self, width: u16, height: u16) -> Self {
            self.events.push(Event::Resize(width, height));
            self
        }

        /// Next page (press 'n')
        pub fn next_page(self) -> Self {
            self.press_char('n')
        }

        /// Previous page (press 'p')
        pub fn prev_page(self) -> Self {
            self.press_char('p')
        }

        /// Quit the application (press 'q')
        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        /// Build the simulated event source
        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

/// In-memory stand-in for a PDF engine
pub mod fake {
    use std::cell::Cell;

    use image::{Rgb, RgbImage};

    use crate::geometry::PdfRect;
    use crate::pdf::{PdfBackend, PdfError, RawTextLine};

    pub struct FakePage {
        pub width: f32,
        pub height: f32,
        pub lines: Vec<RawTextLine>,
    }

    impl FakePage {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                width,
                height,
                lines: Vec::new(),
            }
        }

        /// Add a horizontal line with its box in PDF space
        pub fn with_line(mut self, text: &str, bbox: PdfRect) -> Self {
            self.lines.push(RawTextLine {
                text: text.to_string(),
                bbox,
                horizontal: true,
            });
            self
        }

        pub fn with_vertical_line(mut self, text: &str, bbox: PdfRect) -> Self {
            self.lines.push(RawTextLine {
                text: text.to_string(),
                bbox,
                horizontal: false,
            });
            self
        }
    }

    /// Pages render as a flat per-page colour with dark bars over each line
    pub struct FakeBackend {
        pages: Vec<FakePage>,
        text_line_calls: Cell<usize>,
        raster_calls: Cell<usize>,
    }

    impl FakeBackend {
        pub fn new(pages: Vec<FakePage>) -> Self {
            Self {
                pages,
                text_line_calls: Cell::new(0),
                raster_calls: Cell::new(0),
            }
        }

        pub fn text_line_calls(&self) -> usize {
            self.text_line_calls.get()
        }

        pub fn raster_calls(&self) -> usize {
            self.raster_calls.get()
        }

        fn page(&self, index: usize) -> Result<&FakePage, PdfError> {
            self.check_index(index)?;
            Ok(&self.pages[index])
        }
    }

    impl PdfBackend for FakeBackend {
        fn page_count(&self) -> Result<usize, PdfError> {
            Ok(self.pages.len())
        }

        fn page_box(&self, index: usize) -> Result<PdfRect, PdfError> {
            let page = self.page(index)?;
            Ok(PdfRect::new(0.0, 0.0, page.width, page.height))
        }

        fn text_lines(&self, index: usize) -> Result<Vec<RawTextLine>, PdfError> {
            self.text_line_calls.set(self.text_line_calls.get() + 1);
            Ok(self.page(index)?.lines.clone())
        }

        fn rasterize(&self, index: usize, dpi: f32) -> Result<RgbImage, PdfError> {
            self.raster_calls.set(self.raster_calls.get() + 1);
            let page = self.page(index)?;
            let mag = dpi / crate::pdf::POINTS_PER_INCH;
            let width = (page.width * mag).round().max(1.0) as u32;
            let height = (page.height * mag).round().max(1.0) as u32;

            let shade = 255u8.saturating_sub((index as u8).wrapping_mul(40));
            let mut img = RgbImage::from_pixel(width, height, Rgb([shade, 255, 255]));
            for line in &page.lines {
                let screen = line.bbox.to_screen(page.height);
                let x0 = (screen.x0 * mag).max(0.0) as u32;
                let x1 = ((screen.x1 * mag) as u32).min(width);
                let y0 = (screen.y0 * mag).max(0.0) as u32;
                let y1 = ((screen.y1 * mag) as u32).min(height);
                for y in y0..y1 {
                    for x in x0..x1 {
                        img.put_pixel(x, y, Rgb([20, 20, 20]));
                    }
                }
            }
            Ok(img)
        }
    }
}
