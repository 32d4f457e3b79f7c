use crate::error::{Error, Result};
use crate::rect::Rect;

/// The number of bytes used by a single RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded 8-bit RGBA image, stored top-down in row-major order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Bitmap {
    /// Creates a new, fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Bitmap {
        let data_bytes = BYTES_PER_PIXEL * (width as usize) * (height as usize);
        Bitmap {
            width: width,
            height: height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Wraps existing RGBA data.  Returns an error if `data` does not hold
    /// exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Bitmap> {
        let expected = BYTES_PER_PIXEL * (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::InvalidImage(format!("wrong data length for \
                                                    {}x{} bitmap ({} \
                                                    instead of {})",
                                                   width,
                                                   height,
                                                   data.len(),
                                                   expected)));
        }
        Ok(Bitmap {
            width: width,
            height: height,
            data: data.into_boxed_slice(),
        })
    }

    /// Returns the width of the bitmap, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the bitmap, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bounds of the bitmap, with its origin at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    /// Returns true if the bitmap has the same width and height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns a reference to the bitmap's RGBA data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the bitmap's RGBA data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the RGBA value of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = self.offset(x, y);
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.data[start..start + BYTES_PER_PIXEL]);
        pixel
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        BYTES_PER_PIXEL * ((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Copies `src` onto this bitmap with its top-left corner at (`left`,
    /// `top`).  Pixels falling outside either bitmap are skipped.
    pub fn blit(&mut self, src: &Bitmap, left: i64, top: i64) {
        for src_y in 0..src.height {
            let dst_y = top + src_y as i64;
            if dst_y < 0 || dst_y >= self.height as i64 {
                continue;
            }
            for src_x in 0..src.width {
                let dst_x = left + src_x as i64;
                if dst_x < 0 || dst_x >= self.width as i64 {
                    continue;
                }
                let from = src.offset(src_x, src_y);
                let to = self.offset(dst_x as u32, dst_y as u32);
                self.data[to..to + BYTES_PER_PIXEL]
                    .copy_from_slice(&src.data[from..from + BYTES_PER_PIXEL]);
            }
        }
    }

    /// Centers the bitmap on a transparent square canvas whose edge is the
    /// longer of the two sides.  Square bitmaps are returned unchanged.
    pub fn into_square(self) -> Bitmap {
        if self.is_square() {
            return self;
        }
        let edge = self.width.max(self.height);
        let left = (edge - self.width) / 2;
        let top = (edge - self.height) / 2;
        let mut canvas = Bitmap::new(edge, edge);
        canvas.blit(&self, left as i64, top as i64);
        canvas
    }

    /// Returns the alpha channel as one byte per pixel.
    pub fn alpha_plane(&self) -> Vec<u8> {
        self.channel_plane(3)
    }

    /// Returns one color channel (0 = red, 1 = green, 2 = blue, 3 = alpha)
    /// as one byte per pixel.
    pub fn channel_plane(&self, channel: usize) -> Vec<u8> {
        self.data
            .chunks(BYTES_PER_PIXEL)
            .map(|pixel| pixel[channel])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        Bitmap::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(Bitmap::from_rgba(2, 2, vec![0; 16]).is_ok());
        let error = Bitmap::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(error.to_string(),
                   "invalid image: wrong data length for 2x2 bitmap (15 \
                    instead of 16)");
    }

    #[test]
    fn square_bitmap_is_unchanged() {
        let bitmap = gradient(5, 5);
        assert_eq!(bitmap.clone().into_square(), bitmap);
    }

    #[test]
    fn pad_wide_bitmap() {
        let padded = gradient(100, 50).into_square();
        assert_eq!(padded.width(), 100);
        assert_eq!(padded.height(), 100);
        for y in 0..100 {
            for x in 0..100 {
                let pixel = padded.pixel(x, y);
                if y < 25 || y >= 75 {
                    assert_eq!(pixel, [0, 0, 0, 0]);
                } else {
                    assert_eq!(pixel, [x as u8, (y - 25) as u8, 7, 255]);
                }
            }
        }
    }

    #[test]
    fn pad_tall_bitmap_with_odd_difference() {
        let padded = gradient(2, 5).into_square();
        assert_eq!(padded.width(), 5);
        // (5 - 2) / 2 = 1 column of padding on the left.
        assert_eq!(padded.pixel(0, 0)[3], 0);
        assert_eq!(padded.pixel(1, 0), [0, 0, 7, 255]);
        assert_eq!(padded.pixel(2, 4), [1, 4, 7, 255]);
        assert_eq!(padded.pixel(3, 0)[3], 0);
        assert_eq!(padded.pixel(4, 0)[3], 0);
    }

    #[test]
    fn blit_clips_to_bounds() {
        let mut canvas = Bitmap::new(3, 3);
        canvas.blit(&gradient(3, 3), -1, 2);
        assert_eq!(canvas.pixel(0, 2), [1, 0, 7, 255]);
        assert_eq!(canvas.pixel(1, 2), [2, 0, 7, 255]);
        assert_eq!(canvas.pixel(2, 2), [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn channel_planes() {
        let bitmap = gradient(2, 1);
        assert_eq!(bitmap.channel_plane(0), vec![0, 1]);
        assert_eq!(bitmap.channel_plane(2), vec![7, 7]);
        assert_eq!(bitmap.alpha_plane(), vec![255, 255]);
    }
}
