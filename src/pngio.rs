use color_quant::NeuQuant;
use std::io::Cursor;

use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};
use crate::error::{Error, Result};

/// The largest palette an indexed PNG can hold.
pub const MAX_PALETTE_COLORS: u32 = 256;

/// NeuQuant sampling factor: 1 samples every pixel, 30 is fastest.
const QUANTIZER_SAMPLE_FACTOR: i32 = 10;

/// NeuQuant derives its learning cycles from half the network size, so a
/// single-entry network never trains.
const MIN_QUANTIZER_COLORS: u32 = 2;

/// Decodes and encodes PNG files.
pub trait PngCodec {
    /// Decodes a PNG file into an RGBA bitmap.
    fn decode(&self, input: &[u8]) -> Result<Bitmap>;

    /// Encodes a bitmap as a PNG file.  A `colors` value of 0 encodes
    /// losslessly; 1 to 256 reduces the image to a palette of at most that
    /// many colors.
    fn encode(&self, bitmap: &Bitmap, colors: u32) -> Result<Vec<u8>>;
}

/// The default codec, backed by the `png` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCrateCodec;

impl PngCodec for PngCrateCodec {
    fn decode(&self, input: &[u8]) -> Result<Bitmap> {
        read_png(input)
    }

    fn encode(&self, bitmap: &Bitmap, colors: u32) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        if colors == 0 {
            write_png_rgba(bitmap, &mut output)?;
        } else {
            write_png_indexed(bitmap, colors.min(MAX_PALETTE_COLORS), &mut output)?;
        }
        Ok(output)
    }
}

/// Reads a PNG file into an RGBA bitmap, expanding palettes, low bit depths
/// and missing channels.
pub fn read_png(input: &[u8]) -> Result<Bitmap> {
    let mut decoder = png::Decoder::new(Cursor::new(input));
    decoder.set_transformations(
        png::Transformations::STRIP_16 | png::Transformations::EXPAND,
    );
    let mut reader = decoder.read_info().map_err(decode_error)?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        let msg = format!("unsupported PNG bit depth: {:?}", bit_depth);
        return Err(Error::Decode(msg.into()));
    }
    let buffer_size = reader.output_buffer_size().ok_or_else(|| {
        Error::Decode(format!("PNG image is too large ({}x{})", width, height)
            .into())
    })?;
    let mut buffer = vec![0u8; buffer_size];
    reader.next_frame(&mut buffer).map_err(decode_error)?;

    let rgba = match color_type {
        png::ColorType::Rgba => buffer,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
            for pixel in buffer.chunks(3) {
                rgba.extend_from_slice(pixel);
                rgba.push(u8::MAX);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buffer.len() * 2);
            for pixel in buffer.chunks(2) {
                rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], pixel[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buffer.len() * 4);
            for &gray in &buffer {
                rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            // EXPAND turns palettes into RGB(A).
            let msg = "unexpected indexed PNG output";
            return Err(Error::Decode(msg.into()));
        }
    };
    let expected = BYTES_PER_PIXEL * (width as usize) * (height as usize);
    if rgba.len() < expected {
        let msg = format!("PNG frame holds {} bytes instead of {}",
                          rgba.len(),
                          expected);
        return Err(Error::Decode(msg.into()));
    }
    let mut rgba = rgba;
    rgba.truncate(expected);
    Bitmap::from_rgba(width, height, rgba)
}

/// Writes a bitmap as a lossless 8-bit RGBA PNG file.
pub fn write_png_rgba(bitmap: &Bitmap, output: &mut Vec<u8>) -> Result<()> {
    let mut encoder = png::Encoder::new(output, bitmap.width(), bitmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(encode_error)?;
    writer.write_image_data(bitmap.data()).map_err(encode_error)?;
    writer.finish().map_err(encode_error)?;
    Ok(())
}

/// Writes a bitmap as an indexed PNG file with at most `colors` palette
/// entries (but no fewer than two), carrying alpha in a `tRNS` chunk.
pub fn write_png_indexed(bitmap: &Bitmap,
                         colors: u32,
                         output: &mut Vec<u8>)
                         -> Result<()> {
    let quantizer = NeuQuant::new(QUANTIZER_SAMPLE_FACTOR,
                                  colors.max(MIN_QUANTIZER_COLORS) as usize,
                                  bitmap.data());
    let color_map = quantizer.color_map_rgba();
    let mut palette = Vec::with_capacity(color_map.len() / 4 * 3);
    let mut alphas = Vec::with_capacity(color_map.len() / 4);
    for entry in color_map.chunks(4) {
        palette.extend_from_slice(&entry[..3]);
        alphas.push(entry[3]);
    }
    let indices: Vec<u8> = bitmap.data()
        .chunks(BYTES_PER_PIXEL)
        .map(|pixel| quantizer.index_of(pixel) as u8)
        .collect();

    let mut encoder = png::Encoder::new(output, bitmap.width(), bitmap.height());
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette);
    encoder.set_trns(alphas);
    let mut writer = encoder.write_header().map_err(encode_error)?;
    writer.write_image_data(&indices).map_err(encode_error)?;
    writer.finish().map_err(encode_error)?;
    Ok(())
}

fn decode_error(error: png::DecodingError) -> Error {
    Error::Decode(Box::new(error))
}

fn encode_error(error: png::EncodingError) -> Error {
    Error::Encode(Box::new(error))
}
