//! Windows bitmap (DIB) payloads for BMP-style ICO entries.
//!
//! An ICO bitmap entry is a `BITMAPINFOHEADER` followed by bottom-up BGRA
//! pixel rows and then a 1-bit AND mask, also bottom-up.  The header's
//! height covers both the color rows and the mask rows, so it is twice the
//! icon height.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};
use crate::error::{Error, Result};

/// The length of a `BITMAPINFOHEADER`, in bytes.
pub const BITMAP_INFO_HEADER_LENGTH: u32 = 40;

/// Pixels per meter stored in the header (72 DPI).
const PIXELS_PER_METER: i32 = 3780;

/// Returns the length of the 1-bit alpha mask for an image of the given
/// size, in bytes.  Each mask row is padded to a multiple of 32 bits.
pub fn mask_length(width: u32, height: u32) -> usize {
    ((width as usize + 31) / 32) * 32 * (height as usize) / 8
}

/// Returns the length of the BGRA pixel data, in bytes.
pub fn color_length(width: u32, height: u32) -> usize {
    BYTES_PER_PIXEL * (width as usize) * (height as usize)
}

/// Builds the 40-byte `BITMAPINFOHEADER` for `bitmap`.
pub fn bitmap_info_header(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let (width, height) = (bitmap.width(), bitmap.height());
    if width > i32::MAX as u32 || height > (i32::MAX / 2) as u32 {
        let msg = format!("bitmap too large for a DIB ({}x{})", width, height);
        return Err(Error::InvalidImage(msg));
    }
    let image_size = color_length(width, height) + mask_length(width, height);
    let mut header = Vec::with_capacity(BITMAP_INFO_HEADER_LENGTH as usize);
    header.write_u32::<LittleEndian>(BITMAP_INFO_HEADER_LENGTH)?;
    header.write_i32::<LittleEndian>(width as i32)?;
    header.write_i32::<LittleEndian>(2 * height as i32)?;
    header.write_u16::<LittleEndian>(1)?; // planes
    header.write_u16::<LittleEndian>(32)?; // bits per pixel
    header.write_u32::<LittleEndian>(0)?; // BI_RGB
    header.write_u32::<LittleEndian>(image_size as u32)?;
    header.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    header.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
    header.write_u32::<LittleEndian>(0)?; // colors used
    header.write_u32::<LittleEndian>(0)?; // important colors
    Ok(header)
}

/// Builds the bottom-up BGRA pixel data of `bitmap` followed by its AND
/// mask.  A mask bit is set for every fully transparent pixel.
pub fn dib(bitmap: &Bitmap) -> Vec<u8> {
    let (width, height) = (bitmap.width() as usize, bitmap.height() as usize);
    let mask_row_length = (width + 31) / 32 * 4;
    let mut output = Vec::with_capacity(color_length(bitmap.width(),
                                                     bitmap.height()) +
                                        mask_length(bitmap.width(),
                                                    bitmap.height()));
    let mut mask = vec![0u8; mask_row_length * height];
    let data = bitmap.data();
    for (row, y) in (0..height).rev().enumerate() {
        let mask_row = &mut mask[row * mask_row_length..][..mask_row_length];
        for x in 0..width {
            let pos = BYTES_PER_PIXEL * (y * width + x);
            let (red, green, blue, alpha) =
                (data[pos], data[pos + 1], data[pos + 2], data[pos + 3]);
            output.extend_from_slice(&[blue, green, red, alpha]);
            if alpha == 0 {
                mask_row[x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    output.extend_from_slice(&mask);
    output
}

/// Builds a complete ICO bitmap entry: header, pixel data and mask.
pub fn icon_entry(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let mut output = bitmap_info_header(bitmap)?;
    output.extend(dib(bitmap));
    Ok(output)
}
