/// Fixed-size square anchored near the bottom-right corner of a page.
///
/// The origin is `(page_width - size - margin, margin)` in PDF user space. Only
/// the page width matters; the height never moves the stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampPlacement {
    pub size: f64,
    pub margin: f64,
}

impl Default for StampPlacement {
    fn default() -> Self {
        StampPlacement {
            size: 100.0,
            margin: 20.0,
        }
    }
}

/// Where a stamp was drawn, in PDF user space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl StampPlacement {
    /// Lower-left corner of the stamp on a page `page_width` units wide.
    pub fn origin(&self, page_width: f64) -> (f64, f64) {
        (page_width - self.size - self.margin, self.margin)
    }

    pub fn rect_for(&self, page_width: f64) -> StampRect {
        let (x, y) = self.origin(page_width);
        StampRect {
            x,
            y,
            width: self.size,
            height: self.size,
        }
    }
}
