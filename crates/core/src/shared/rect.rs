/// Axis-aligned rectangle in processing-frame pixel coordinates.
///
/// Detections and tracked regions have positive width and height. Seed
/// rectangles produced by [`Rect::padded`] are deliberately not clamped to
/// frame bounds, so x and y may be negative and the far edges may lie
/// outside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Center point in f64, `(x + w/2, y + h/2)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Grows the rectangle by `pad_x` on the left and right edges and
    /// `pad_y` on the top and bottom edges. No clamping.
    #[inline]
    pub fn padded(&self, pad_x: i32, pad_y: i32) -> Self {
        Self {
            x: self.x - pad_x,
            y: self.y - pad_y,
            width: self.width + 2 * pad_x,
            height: self.height + 2 * pad_y,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_area() {
        assert_eq!(Rect::new(0, 0, 10, 10).area(), 100);
        assert_eq!(Rect::new(5, 5, 20, 20).area(), 400);
        assert_eq!(Rect::new(3, 7, 0, 50).area(), 0);
    }

    #[test]
    fn test_area_does_not_overflow_i32() {
        let r = Rect::new(0, 0, i32::MAX, 2);
        assert_eq!(r.area(), i32::MAX as i64 * 2);
    }

    #[test]
    fn test_center() {
        let (cx, cy) = Rect::new(0, 0, 100, 100).center();
        assert_relative_eq!(cx, 50.0);
        assert_relative_eq!(cy, 50.0);

        let (cx, cy) = Rect::new(590, 310, 100, 100).center();
        assert_relative_eq!(cx, 640.0);
        assert_relative_eq!(cy, 360.0);
    }

    #[test]
    fn test_center_of_odd_sized_rect_is_fractional() {
        let (cx, cy) = Rect::new(0, 0, 5, 3).center();
        assert_relative_eq!(cx, 2.5);
        assert_relative_eq!(cy, 1.5);
    }

    #[test]
    fn test_padded_expands_all_edges() {
        let padded = Rect::new(100, 200, 50, 60).padded(10, 20);
        assert_eq!(padded, Rect::new(90, 180, 70, 100));
        // Bounds in (l, t, r, b) form: (x-10, y-20, x+w+10, y+h+20)
        assert_eq!(padded.right(), 160);
        assert_eq!(padded.bottom(), 280);
    }

    #[test]
    fn test_padded_is_not_clamped_at_origin() {
        let padded = Rect::new(0, 0, 30, 30).padded(10, 20);
        assert_eq!(padded.x, -10);
        assert_eq!(padded.y, -20);
        assert_eq!(padded.width, 50);
        assert_eq!(padded.height, 70);
    }

    #[test]
    fn test_padded_zero_is_identity() {
        let r = Rect::new(15, 25, 35, 45);
        assert_eq!(r.padded(0, 0), r);
    }
}
