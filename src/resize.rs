//! Resampling of RGBA bitmaps to arbitrary sizes.
//!
//! Every algorithm treats the four channels as independent 0-255 scalars
//! (no gamma or premultiplied-alpha handling), and every algorithm is a pure
//! function of the source bitmap and the destination size.  The rounding and
//! border rules below are fixed: changing any of them changes the bytes of
//! the produced icons.

use std::fmt;
use std::str::FromStr;

use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};
use crate::rect::Rect;

/// An interpolation algorithm used to scale the source image.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Picks the closest source pixel.
    NearestNeighbor,
    /// Blends the four enclosing source pixels.
    Bilinear,
    /// Two-pass cubic convolution, box-filtering large reductions.
    #[default]
    Bicubic,
    /// Two-pass cubic Bezier spline through neighbouring samples.
    Bezier,
    /// Two-pass Hermite spline.
    Hermite,
    /// Per-pixel 4x4 cubic convolution that repeats edge samples.
    Bicubic2,
}

/// All algorithms, indexed by their legacy number.
pub const ALGORITHMS: [Algorithm; 6] = [Algorithm::NearestNeighbor,
                                        Algorithm::Bilinear,
                                        Algorithm::Bicubic,
                                        Algorithm::Bezier,
                                        Algorithm::Hermite,
                                        Algorithm::Bicubic2];

impl Algorithm {
    /// Returns the algorithm with the given legacy number (0 to 5), if any.
    pub fn from_number(number: u32) -> Option<Algorithm> {
        ALGORITHMS.get(number as usize).copied()
    }

    /// Returns the legacy number of this algorithm.
    pub fn number(self) -> u32 {
        match self {
            Algorithm::NearestNeighbor => 0,
            Algorithm::Bilinear => 1,
            Algorithm::Bicubic => 2,
            Algorithm::Bezier => 3,
            Algorithm::Hermite => 4,
            Algorithm::Bicubic2 => 5,
        }
    }

    /// Returns the short name of this algorithm (e.g. `bc` for bicubic).
    pub fn short_name(self) -> &'static str {
        match self {
            Algorithm::NearestNeighbor => "nn",
            Algorithm::Bilinear => "bl",
            Algorithm::Bicubic => "bc",
            Algorithm::Bezier => "bz",
            Algorithm::Hermite => "hm",
            Algorithm::Bicubic2 => "bc2",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.short_name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(input: &str) -> Result<Algorithm, String> {
        ALGORITHMS.iter()
            .copied()
            .find(|algorithm| algorithm.short_name() == input)
            .ok_or_else(|| format!("unknown scaling algorithm: {}", input))
    }
}

/// Resamples `src` into `dst`, filling every pixel of `dst`.
pub fn resize(algorithm: Algorithm, src: &Bitmap, dst: &mut Bitmap) {
    if src.width() == 0 || src.height() == 0 || dst.width() == 0 ||
       dst.height() == 0 {
        return;
    }
    match algorithm {
        Algorithm::NearestNeighbor => nearest_neighbor(src, dst),
        Algorithm::Bilinear => bilinear(src, dst),
        Algorithm::Bicubic => interpolate_2d(src, dst, cubic),
        Algorithm::Bezier => interpolate_2d(src, dst, bezier),
        Algorithm::Hermite => interpolate_2d(src, dst, hermite),
        Algorithm::Bicubic2 => bicubic2(src, dst),
    }
}

/// Returns a new `width` by `height` bitmap holding the resampled `src`.
pub fn resized(algorithm: Algorithm,
               src: &Bitmap,
               width: u32,
               height: u32)
               -> Bitmap {
    let mut dst = Bitmap::new(width, height);
    resize(algorithm, src, &mut dst);
    dst
}

/// Scales `src` proportionally into a transparent `width` by `height`
/// canvas, centering it along the axis it does not fill.
pub fn fitted(algorithm: Algorithm,
              src: &Bitmap,
              width: u32,
              height: u32)
              -> Bitmap {
    let target = Rect::with_size(width, height);
    let rect = src.rect().fit_into(&target);
    if rect == target {
        return resized(algorithm, src, width, height);
    }
    let mut canvas = Bitmap::new(width, height);
    if !rect.is_empty() {
        let scaled = resized(algorithm, src, rect.width, rect.height);
        canvas.blit(&scaled, rect.left as i64, rect.top as i64);
    }
    canvas
}

/// Rounds half-way values up, towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Stores a kernel result the way a byte buffer does: truncating towards
/// zero after saturating into 0-255.
fn to_byte(value: f64) -> u8 {
    value as u8
}

fn nearest_neighbor(src: &Bitmap, dst: &mut Bitmap) {
    let (src_width, src_height) = (src.width() as u64, src.height() as u64);
    let (dst_width, dst_height) = (dst.width() as u64, dst.height() as u64);
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for y in 0..dst_height {
        let src_y = y * src_height / dst_height;
        for x in 0..dst_width {
            let src_x = x * src_width / dst_width;
            let from = BYTES_PER_PIXEL * (src_y * src_width + src_x) as usize;
            let to = BYTES_PER_PIXEL * (y * dst_width + x) as usize;
            dst_data[to..to + BYTES_PER_PIXEL]
                .copy_from_slice(&src_data[from..from + BYTES_PER_PIXEL]);
        }
    }
}

fn bilinear(src: &Bitmap, dst: &mut Bitmap) {
    let (src_width, src_height) = (src.width() as usize, src.height() as usize);
    let (dst_width, dst_height) = (dst.width() as usize, dst.height() as usize);
    let src_data = src.data();
    let dst_data = dst.data_mut();

    // Linear blend between two samples; an integral coordinate has no
    // neighbour to blend with.
    let interpolate = |k: f64, k_min: usize, v_min: f64, k_max: usize, v_max: f64| {
        if k_min == k_max {
            v_min
        } else {
            round_half_up((k - k_min as f64) * v_max +
                          (k_max as f64 - k) * v_min)
        }
    };
    let sample = |x: usize, y: usize, channel: usize| {
        src_data[BYTES_PER_PIXEL * (y * src_width + x) + channel] as f64
    };

    for i in 0..dst_height {
        let y = (i * src_height) as f64 / dst_height as f64;
        let y_min = y.floor() as usize;
        let y_max = (y.ceil() as usize).min(src_height - 1);
        for j in 0..dst_width {
            let x = (j * src_width) as f64 / dst_width as f64;
            let x_min = x.floor() as usize;
            let x_max = (x.ceil() as usize).min(src_width - 1);
            let pos = BYTES_PER_PIXEL * (i * dst_width + j);
            for channel in 0..BYTES_PER_PIXEL {
                let v_min = interpolate(x,
                                        x_min,
                                        sample(x_min, y_min, channel),
                                        x_max,
                                        sample(x_max, y_min, channel));
                let value = if y_max == y_min {
                    v_min
                } else {
                    let v_max = interpolate(x,
                                            x_min,
                                            sample(x_min, y_max, channel),
                                            x_max,
                                            sample(x_max, y_max, channel));
                    interpolate(y, y_min, v_min, y_max, v_max)
                };
                dst_data[pos + channel] = to_byte(value);
            }
        }
    }
}

/// A 4-tap kernel evaluated between `x1` and `x2` at offset `t` in [0, 1).
type Kernel = fn(f64, f64, f64, f64, f64) -> f64;

fn cubic(x0: f64, x1: f64, x2: f64, x3: f64, t: f64) -> f64 {
    let a0 = x3 - x2 - x0 + x1;
    let a1 = x0 - x1 - a0;
    let a2 = x2 - x0;
    let a3 = x1;
    (a0 * (t * t * t) + a1 * (t * t) + a2 * t + a3).max(0.0).min(255.0)
}

fn hermite(x0: f64, x1: f64, x2: f64, x3: f64, t: f64) -> f64 {
    let c0 = x1;
    let c1 = 0.5 * (x2 - x0);
    let c2 = x0 - 2.5 * x1 + 2.0 * x2 - 0.5 * x3;
    let c3 = 0.5 * (x3 - x0) + 1.5 * (x1 - x2);
    round_half_up(((c3 * t + c2) * t + c1) * t + c0).max(0.0).min(255.0)
}

fn bezier(x0: f64, x1: f64, x2: f64, x3: f64, t: f64) -> f64 {
    // The knots are x1 and x2; x0 and x3 only place the control points.
    let cp1 = x1 + (x2 - x0) / 4.0;
    let cp2 = x2 - (x3 - x1) / 4.0;
    let nt = 1.0 - t;
    let c0 = x1 * nt * nt * nt;
    let c1 = 3.0 * cp1 * nt * nt * t;
    let c2 = 3.0 * cp2 * nt * t * t;
    let c3 = x2 * t * t * t;
    round_half_up(c0 + c1 + c2 + c3).max(0.0).min(255.0)
}

/// Runs `kernel` over a line of `len` samples at fractional position `pos`.
/// `at(i)` returns sample `i`.  Outside the line the outer samples are
/// extrapolated linearly from the two inner ones.
fn kernel_line<F>(kernel: Kernel, len: usize, pos: f64, at: F) -> f64
    where F: Fn(usize) -> f64
{
    let index = pos.floor() as usize;
    let t = pos - index as f64;
    let last = len - 1;
    let x1 = at(index);
    let x2 = at((index + 1).min(last));
    let x0 = if index > 0 { at(index - 1) } else { 2.0 * x1 - x2 };
    let x3 = if index + 2 < len {
        at(index + 2)
    } else {
        2.0 * x2 - x1
    };
    kernel(x0, x1, x2, x3, t)
}

/// Separable two-pass interpolation shared by the bicubic, Bezier and
/// Hermite kernels.  When the destination is less than half the source size
/// the image is first interpolated to an integer multiple of the destination
/// size and then box-filtered down, averaging color only over pixels that are
/// not fully transparent.
fn interpolate_2d(src: &Bitmap, dst: &mut Bitmap, kernel: Kernel) {
    let (src_width, src_height) = (src.width() as usize, src.height() as usize);
    let (dst_width, dst_height) = (dst.width() as usize, dst.height() as usize);
    let src_data = src.data();

    let w_mul = (src_width / dst_width).max(1);
    let h_mul = (src_height / dst_height).max(1);
    let wide_width = dst_width * w_mul;
    let tall_height = dst_height * h_mul;

    // Pass 1: interpolate rows into a wide_width by src_height buffer.  The
    // two inner samples must be real, hence the (src_width - 1) span.
    let mut rows = vec![0u8; BYTES_PER_PIXEL * wide_width * src_height];
    for i in 0..src_height {
        for j in 0..wide_width {
            let x = (j * (src_width - 1)) as f64 / wide_width as f64;
            let pos = BYTES_PER_PIXEL * (i * wide_width + j);
            for channel in 0..BYTES_PER_PIXEL {
                let value = kernel_line(kernel, src_width, x, |index| {
                    src_data[BYTES_PER_PIXEL * (i * src_width + index) +
                             channel] as f64
                });
                rows[pos + channel] = to_byte(value);
            }
        }
    }

    // Pass 2: interpolate columns into a wide_width by tall_height buffer.
    let mut grid = vec![0u8; BYTES_PER_PIXEL * wide_width * tall_height];
    for i in 0..tall_height {
        let y = (i * (src_height - 1)) as f64 / tall_height as f64;
        for j in 0..wide_width {
            let pos = BYTES_PER_PIXEL * (i * wide_width + j);
            for channel in 0..BYTES_PER_PIXEL {
                let value = kernel_line(kernel, src_height, y, |index| {
                    rows[BYTES_PER_PIXEL * (index * wide_width + j) +
                         channel] as f64
                });
                grid[pos + channel] = to_byte(value);
            }
        }
    }

    let dst_data = dst.data_mut();
    let multiple = w_mul * h_mul;
    if multiple == 1 {
        dst_data.copy_from_slice(&grid);
        return;
    }

    // Pass 3: box-filter each w_mul by h_mul block down to one pixel.
    for i in 0..dst_height {
        for j in 0..dst_width {
            let mut color = [0u32; 3];
            let mut alpha = 0u32;
            let mut opaque = 0u32;
            for y in (i * h_mul)..((i + 1) * h_mul) {
                for x in (j * w_mul)..((j + 1) * w_mul) {
                    let pos = BYTES_PER_PIXEL * (y * wide_width + x);
                    let pixel_alpha = grid[pos + 3] as u32;
                    if pixel_alpha != 0 {
                        for channel in 0..3 {
                            color[channel] += grid[pos + channel] as u32;
                        }
                        opaque += 1;
                    }
                    alpha += pixel_alpha;
                }
            }
            let pos = BYTES_PER_PIXEL * (i * dst_width + j);
            for channel in 0..3 {
                dst_data[pos + channel] = if opaque > 0 {
                    to_byte(round_half_up(color[channel] as f64 /
                                          opaque as f64))
                } else {
                    0
                };
            }
            dst_data[pos + 3] =
                to_byte(round_half_up(alpha as f64 / multiple as f64));
        }
    }
}

/// 1D cubic convolution through `b` and `c` at offset `t`.
fn terp(t: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let cubic_term = 3.0 * (b - c) + d - a;
    let quadratic = 2.0 * a - 5.0 * b + 4.0 * c - d;
    0.5 * (c - a + (quadratic + cubic_term * t) * t) * t + b
}

/// Returns the four sample indices around `index` on a line of `len`
/// samples.  Near the low edge the first sample is repeated (`repeat` < 0);
/// near the high edge the last one is (`repeat` > 0), so the window never
/// leaves the line.
fn window(index: usize, len: usize) -> [usize; 4] {
    let last = len as isize - 1;
    let index = index as isize;
    let repeat = if index < 1 {
        index - 1
    } else if index + 2 > last {
        index + 2 - last
    } else {
        0
    };
    let mut taps = [0usize; 4];
    for (offset, tap) in taps.iter_mut().enumerate() {
        let mut sample = index - 1 + offset as isize;
        if repeat < 0 {
            sample = sample.max(0);
        }
        if repeat > 0 || sample > last {
            sample = sample.min(last);
        }
        *tap = sample as usize;
    }
    taps
}

fn bicubic2(src: &Bitmap, dst: &mut Bitmap) {
    let (src_width, src_height) = (src.width() as usize, src.height() as usize);
    let (dst_width, dst_height) = (dst.width() as usize, dst.height() as usize);
    let x_ratio = src_width as f64 / dst_width as f64;
    let y_ratio = src_height as f64 / dst_height as f64;
    let src_data = src.data();
    let dst_data = dst.data_mut();

    for i in 0..dst_height {
        let y = i as f64 * y_ratio;
        let y_index = y.floor() as usize;
        let dy = y - y_index as f64;
        let rows = window(y_index, src_height);
        for j in 0..dst_width {
            let x = j as f64 * x_ratio;
            let x_index = x.floor() as usize;
            let dx = x - x_index as f64;
            let columns = window(x_index, src_width);
            let pos = BYTES_PER_PIXEL * (i * dst_width + j);
            for channel in 0..BYTES_PER_PIXEL {
                let at = |row: usize, column: usize| {
                    src_data[BYTES_PER_PIXEL * (row * src_width + column) +
                             channel] as f64
                };
                let mut column_values = [0f64; 4];
                for (value, &row) in column_values.iter_mut().zip(&rows) {
                    *value = terp(dx,
                                  at(row, columns[0]),
                                  at(row, columns[1]),
                                  at(row, columns[2]),
                                  at(row, columns[3]));
                }
                let value = terp(dy,
                                 column_values[0],
                                 column_values[1],
                                 column_values[2],
                                 column_values[3]);
                dst_data[pos + channel] =
                    to_byte(round_half_up(value).max(0.0).min(255.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(width: u32, height: u32) -> Bitmap {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 37 + y * 11) as u8,
                                         (x * 5) as u8,
                                         (y * 9) as u8,
                                         if (x + y) % 3 == 0 { 0 } else { 255 }]);
            }
        }
        Bitmap::from_rgba(width, height, data).unwrap()
    }

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> Bitmap {
        let data = pixel.iter()
            .cycle()
            .take(4 * (width * height) as usize)
            .cloned()
            .collect();
        Bitmap::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn algorithm_number_round_trip() {
        for number in 0..6 {
            let algorithm = Algorithm::from_number(number).unwrap();
            assert_eq!(algorithm.number(), number);
        }
        assert_eq!(Algorithm::from_number(6), None);
    }

    #[test]
    fn algorithm_from_str() {
        assert_eq!("bc2".parse::<Algorithm>(), Ok(Algorithm::Bicubic2));
        assert_eq!("nn".parse::<Algorithm>(), Ok(Algorithm::NearestNeighbor));
        assert_eq!("xx".parse::<Algorithm>(),
                   Err("unknown scaling algorithm: xx".to_string()));
        assert_eq!(Algorithm::default().to_string(), "bc");
    }

    #[test]
    fn nearest_neighbor_identity() {
        let src = pattern(13, 7);
        let dst = resized(Algorithm::NearestNeighbor, &src, 13, 7);
        assert_eq!(dst, src);
    }

    #[test]
    fn nearest_neighbor_downscale_picks_floor() {
        let src = pattern(4, 4);
        let dst = resized(Algorithm::NearestNeighbor, &src, 2, 2);
        assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
        assert_eq!(dst.pixel(1, 0), src.pixel(2, 0));
        assert_eq!(dst.pixel(1, 1), src.pixel(2, 2));
    }

    #[test]
    fn bilinear_identity() {
        let src = pattern(9, 6);
        assert_eq!(resized(Algorithm::Bilinear, &src, 9, 6), src);
    }

    #[test]
    fn bilinear_upscale_blends_neighbours() {
        let src = Bitmap::from_rgba(2, 1, vec![0, 0, 0, 255, 101, 0, 0, 255])
            .unwrap();
        let dst = resized(Algorithm::Bilinear, &src, 4, 1);
        // Source x positions are 0, 0.5, 1 and 1.5 (clamped to the last
        // column, so it copies it).
        assert_eq!(dst.channel_plane(0), vec![0, 51, 101, 101]);
        assert_eq!(dst.alpha_plane(), vec![255, 255, 255, 255]);
    }

    #[test]
    fn solid_color_survives_every_algorithm() {
        let src = solid(40, 40, [10, 200, 30, 255]);
        for &algorithm in ALGORITHMS.iter() {
            for &size in &[16u32, 32, 40, 64] {
                let dst = resized(algorithm, &src, size, size);
                for y in 0..size {
                    for x in 0..size {
                        assert_eq!(dst.pixel(x, y), [10, 200, 30, 255],
                                   "{} at {}x{}", algorithm, size, size);
                    }
                }
            }
        }
    }

    #[test]
    fn box_filter_ignores_transparent_color() {
        // Left half is transparent red, right half opaque blue.  A 4x
        // reduction averages alpha over the whole block but color only over
        // pixels that are not fully transparent.
        let mut data = Vec::new();
        for _ in 0..8 {
            for x in 0..8 {
                if x < 4 {
                    data.extend_from_slice(&[255, 0, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        let src = Bitmap::from_rgba(8, 8, data).unwrap();
        let dst = resized(Algorithm::Hermite, &src, 2, 2);
        assert_eq!(dst.pixel(0, 0), [0, 0, 0, 0]);
        // Row pass yields alphas 128, 255, 255, 255 across the right block.
        assert_eq!(dst.pixel(1, 0), [32, 0, 223, 223]);
        assert_eq!(dst.pixel(1, 1), [32, 0, 223, 223]);
    }

    #[test]
    fn single_pixel_sources_do_not_read_out_of_bounds() {
        let src = solid(1, 1, [1, 2, 3, 4]);
        for &algorithm in ALGORITHMS.iter() {
            let dst = resized(algorithm, &src, 5, 3);
            assert_eq!(dst.pixel(4, 2), [1, 2, 3, 4], "{}", algorithm);
        }
    }

    #[test]
    fn window_repeats_edges() {
        assert_eq!(window(0, 10), [0, 0, 1, 2]);
        assert_eq!(window(1, 10), [0, 1, 2, 3]);
        assert_eq!(window(7, 10), [6, 7, 8, 9]);
        assert_eq!(window(8, 10), [7, 8, 9, 9]);
        assert_eq!(window(9, 10), [8, 9, 9, 9]);
        assert_eq!(window(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn terp_passes_through_inner_samples() {
        assert_eq!(terp(0.0, 3.0, 10.0, 20.0, 7.0), 10.0);
        assert_eq!(terp(1.0, 3.0, 10.0, 20.0, 7.0), 20.0);
    }

    #[test]
    fn bicubic2_identity() {
        let src = pattern(6, 6);
        assert_eq!(resized(Algorithm::Bicubic2, &src, 6, 6), src);
    }

    #[test]
    fn fitted_centers_wide_image() {
        let src = solid(20, 10, [9, 9, 9, 255]);
        let dst = fitted(Algorithm::NearestNeighbor, &src, 8, 8);
        assert_eq!(dst.pixel(0, 1), [0, 0, 0, 0]);
        assert_eq!(dst.pixel(0, 2), [9, 9, 9, 255]);
        assert_eq!(dst.pixel(7, 5), [9, 9, 9, 255]);
        assert_eq!(dst.pixel(7, 6), [0, 0, 0, 0]);
    }
}
