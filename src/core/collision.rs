//! Circle vs axis-aligned rectangle intersection.

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Closest point inside the rectangle to `(px, py)`.
    #[inline]
    pub fn nearest_point(&self, px: f64, py: f64) -> (f64, f64) {
        (px.clamp(self.x, self.right()), py.clamp(self.y, self.bottom()))
    }
}

/// True if a circle at `(cx, cy)` with radius `r` overlaps `rect`.
///
/// Touching exactly at the radius does not count as a hit.
#[inline]
pub fn circle_intersects_rect(cx: f64, cy: f64, r: f64, rect: &Rect) -> bool {
    let (nx, ny) = rect.nearest_point(cx, cy);
    let dx = cx - nx;
    let dy = cy - ny;
    dx * dx + dy * dy < r * r
}
