/// An axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Rect {
    /// The x coordinate of the left edge.
    pub left: i32,
    /// The y coordinate of the top edge.
    pub top: i32,
    /// The width, in pixels.
    pub width: u32,
    /// The height, in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Rect {
        Rect {
            left: left,
            top: top,
            width: width,
            height: height,
        }
    }

    /// Creates a rectangle of the given size with its origin at (0, 0).
    pub fn with_size(width: u32, height: u32) -> Rect {
        Rect::new(0, 0, width, height)
    }

    /// Returns true if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scales this rectangle proportionally so that it fits inside `dst`,
    /// with one axis filling `dst` exactly and the other centered.
    ///
    /// The result is width-bound when this rectangle's aspect ratio is at
    /// least that of `dst`, and height-bound otherwise.  The scaled axis is
    /// floored and the leftover space is split with the smaller half before
    /// the image.
    ///
    /// # Examples
    /// ```
    /// use png2icons::Rect;
    /// let fitted = Rect::with_size(100, 50).fit_into(&Rect::with_size(64, 64));
    /// assert_eq!(fitted, Rect::new(0, 16, 64, 32));
    /// ```
    pub fn fit_into(&self, dst: &Rect) -> Rect {
        if self.is_empty() || dst.is_empty() {
            return Rect::new(dst.left, dst.top, 0, 0);
        }
        let src_ratio = self.width as f64 / self.height as f64;
        let dst_ratio = dst.width as f64 / dst.height as f64;
        if src_ratio >= dst_ratio {
            let scale = dst.width as f64 / self.width as f64;
            let height = ((self.height as f64 * scale).floor() as u32)
                .min(dst.height);
            let top = (dst.height - height) / 2;
            Rect::new(dst.left, dst.top + top as i32, dst.width, height)
        } else {
            let scale = dst.height as f64 / self.height as f64;
            let width = ((self.width as f64 * scale).floor() as u32)
                .min(dst.width);
            let left = (dst.width - width) / 2;
            Rect::new(dst.left + left as i32, dst.top, width, dst.height)
        }
    }
}
