//! Page geometry in the two coordinate systems the viewer juggles
//!
//! PDF space has its origin at the bottom-left corner of the page and grows
//! upwards. Screen space has its origin at the top-left corner and grows
//! downwards. Both are measured in PDF points.

/// A point in screen space (top-left origin)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Page dimensions in points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in PDF space (bottom-left origin, y grows upwards)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PdfRect {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl PdfRect {
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn size(&self) -> PageSize {
        PageSize::new(self.width(), self.height())
    }

    /// Flip into screen space using the page height.
    ///
    /// The top edge in PDF space becomes the top edge on screen, so
    /// `y0_screen = H - y1_pdf` and `y1_screen = H - y0_pdf`.
    #[must_use]
    pub fn to_screen(&self, page_height: f32) -> ScreenRect {
        ScreenRect {
            x0: self.x0,
            x1: self.x1,
            y0: page_height - self.y1,
            y1: page_height - self.y0,
        }
    }
}

/// Axis-aligned box in screen space (top-left origin, y grows downwards)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

impl ScreenRect {
    #[must_use]
    pub const fn new(x0: f32, x1: f32, y0: f32, y1: f32) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// Inclusive on every edge
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.x0 <= p.x && p.x <= self.x1 && self.y0 <= p.y && p.y <= self.y1
    }

    #[must_use]
    pub fn area(&self) -> f32 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}
