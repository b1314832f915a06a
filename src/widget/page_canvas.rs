//! Half-block page canvas
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as its background. A canvas area of
//! `w x h` cells therefore holds `w x 2h` pixels.

use image::RgbImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::Widget,
};

use crate::geometry::Point;

const UPPER_HALF: &str = "▀";
const LOWER_HALF: &str = "▄";

/// Pixel size of the canvas behind `area`
#[must_use]
pub fn canvas_pixels(area: Rect) -> (u32, u32) {
    (u32::from(area.width), u32::from(area.height) * 2)
}

/// Canvas pixel at the centre of the clicked cell, `None` outside `area`
#[must_use]
pub fn cell_to_canvas(area: Rect, column: u16, row: u16) -> Option<Point> {
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    Some(Point::new(
        f32::from(column - area.x) + 0.5,
        f32::from(row - area.y) * 2.0 + 1.0,
    ))
}

/// Draws a page image at a pixel offset inside the canvas area.
///
/// Cells the image does not reach are left untouched.
pub struct PageCanvas<'a> {
    image: &'a RgbImage,
    offset_x: i32,
    offset_y: i32,
}

impl<'a> PageCanvas<'a> {
    #[must_use]
    pub fn new(image: &'a RgbImage, offset_x: i32, offset_y: i32) -> Self {
        Self {
            image,
            offset_x,
            offset_y,
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let x = u32::try_from(x - self.offset_x).ok()?;
        let y = u32::try_from(y - self.offset_y).ok()?;
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b] = self.image.get_pixel(x, y).0;
        Some(Color::Rgb(r, g, b))
    }
}

impl Widget for PageCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);

        for row in 0..area.height {
            for col in 0..area.width {
                let x = i32::from(col);
                let top_y = i32::from(row) * 2;
                let cell = &mut buf[(area.x + col, area.y + row)];

                match (self.pixel(x, top_y), self.pixel(x, top_y + 1)) {
                    (None, None) => {}
                    (Some(top), Some(bottom)) => {
                        cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
                    }
                    (Some(top), None) => {
                        cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(Color::Reset);
                    }
                    (None, Some(bottom)) => {
                        cell.set_symbol(LOWER_HALF).set_fg(bottom).set_bg(Color::Reset);
                    }
                }
            }
        }
    }
}
