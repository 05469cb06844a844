//! Document-space geometry

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in document coordinates (y grows downward from
/// the top of the page, independent of scroll)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    /// Fraction of this rect's height that lies inside `root` vertically
    ///
    /// Pages only scroll vertically, so horizontal overlap is ignored. A
    /// zero-height rect counts as fully visible when its top is inside `root`.
    pub fn visible_ratio(&self, root: &Rect) -> f32 {
        if self.height <= 0.0 {
            let inside = self.top() >= root.top() && self.top() <= root.bottom();
            return if inside { 1.0 } else { 0.0 };
        }
        let overlap = self.bottom().min(root.bottom()) - self.top().max(root.top());
        (overlap / self.height).clamp(0.0, 1.0)
    }

    /// Intersection with another rect, `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

/// The browser window: its size and the current vertical scroll offset
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// The currently visible region in document coordinates
    pub fn visible_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }

    /// Visible region with its bottom edge pulled in by `margin_bottom` px
    pub fn inset_bottom(&self, margin_bottom: f32) -> Rect {
        Rect::new(
            0.0,
            self.scroll_y,
            self.width,
            (self.height - margin_bottom).max(0.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Rect::new(50.0, 50.0, 50.0, 50.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(a.intersect(&far).is_none());
    }

    #[test]
    fn test_visible_rect_follows_scroll() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.scroll_y = 250.0;
        assert_eq!(vp.visible_rect(), Rect::new(0.0, 250.0, 800.0, 600.0));
        assert_eq!(vp.inset_bottom(50.0).height, 550.0);
    }

    #[test]
    fn test_visible_ratio() {
        let root = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(Rect::new(0.0, 500.0, 100.0, 200.0).visible_ratio(&root), 0.5);
        assert_eq!(Rect::new(0.0, 700.0, 100.0, 200.0).visible_ratio(&root), 0.0);
        assert_eq!(Rect::new(0.0, 100.0, 0.0, 0.0).visible_ratio(&root), 1.0);
    }
}
