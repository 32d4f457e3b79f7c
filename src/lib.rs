//! Library for converting PNG images into Apple Icon Image (.icns) and
//! Windows icon (.ico) files.
//!
//! A single source PNG of any size is padded to a square, resampled to every
//! size a container needs, encoded per entry (PNG, PackBits-compressed
//! planes, raw masks or Windows DIBs) and assembled into one file.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format and
//! https://en.wikipedia.org/wiki/ICO_(file_format) for more information about
//! the file formats.
//!
//! # Creating icons
//!
//! ```no_run
//! use png2icons::{Algorithm, IcoFormat};
//! let input = std::fs::read("icon.png").unwrap();
//! let icns = png2icons::create_icns(&input, Algorithm::Bicubic, 0, None)
//!     .expect("conversion failed");
//! std::fs::write("icon.icns", icns).unwrap();
//! let ico = png2icons::create_ico(&input,
//!                                 Algorithm::Bicubic,
//!                                 0,
//!                                 IcoFormat::ForExecutable,
//!                                 Some(log::logger()))
//!     .expect("conversion failed");
//! std::fs::write("icon.ico", ico).unwrap();
//! ```
//!
//! Repeated conversions of the same input should share a [`Converter`], which
//! keeps every resampled and encoded image between calls.

#![warn(missing_docs)]

mod bitmap;
pub mod bmp;
mod cache;
mod convert;
mod element;
mod error;
mod family;
mod ico;
mod icontype;
mod logger;
pub mod packbits;
mod pngio;
mod rect;
mod resize;

pub use crate::bitmap::{Bitmap, BYTES_PER_PIXEL};
pub use crate::cache::ImageCache;
pub use crate::convert::{ConvertOptions, Converter, OutputFormat};
pub use crate::element::{IconElement, ICON_ELEMENT_HEADER_LENGTH};
pub use crate::error::{BoxedError, Error, Result};
pub use crate::family::{IconFamily, ICON_FAMILY_HEADER_LENGTH};
pub use crate::ico::{EntryFormat, ICO_SIZES, IcoDir, IcoEntry, IcoFormat};
pub use crate::icontype::{Encoding, ICNS_ICON_TYPES, IconType, OSType};
pub use crate::logger::Logger;
pub use crate::pngio::{MAX_PALETTE_COLORS, PngCodec, PngCrateCodec};
pub use crate::rect::Rect;
pub use crate::resize::{ALGORITHMS, Algorithm, fitted, resize, resized};

/// Converts a PNG file into an ICNS file.
///
/// `colors` of 0 keeps PNG entries lossless; 1 to 256 reduces them to a
/// palette.  Progress and failures are reported to `sink`, if given.
/// Returns `None` if the conversion failed.
pub fn create_icns(input: &[u8],
                   algorithm: Algorithm,
                   colors: u32,
                   sink: Option<&dyn log::Log>)
                   -> Option<Vec<u8>> {
    Converter::new()
        .with_logger(Logger::from(sink))
        .create_icns(input, algorithm, colors)
}

/// Converts a PNG file into an ICO file whose entry formats are chosen by
/// `format`.  Returns `None` if the conversion failed.
pub fn create_ico(input: &[u8],
                  algorithm: Algorithm,
                  colors: u32,
                  format: IcoFormat,
                  sink: Option<&dyn log::Log>)
                  -> Option<Vec<u8>> {
    Converter::new()
        .with_logger(Logger::from(sink))
        .create_ico(input, algorithm, colors, format)
}

/// Converts a PNG file into the container described by `options`.  Returns
/// `None` if the conversion failed.
pub fn convert(input: &[u8],
               options: &ConvertOptions,
               sink: Option<&dyn log::Log>)
               -> Option<Vec<u8>> {
    Converter::new()
        .with_logger(Logger::from(sink))
        .convert(input, options)
}
