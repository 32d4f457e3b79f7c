//! The conversion pipeline: decode, pad to a square, resample per target
//! size, encode each entry and assemble the container.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::bitmap::Bitmap;
use crate::bmp;
use crate::cache::ImageCache;
use crate::element::IconElement;
use crate::error::{Error, Result};
use crate::family::IconFamily;
use crate::ico::{EntryFormat, ICO_SIZES, IcoDir, IcoEntry, IcoFormat};
use crate::icontype::{Encoding, ICNS_ICON_TYPES, IconType};
use crate::logger::Logger;
use crate::pngio::{MAX_PALETTE_COLORS, PngCodec, PngCrateCodec};
use crate::resize::{self, Algorithm};

/// The kind of container to produce.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OutputFormat {
    /// An Apple Icon Image file.
    #[default]
    Icns,
    /// A Windows icon with bitmap entries only.
    IcoBmp,
    /// A Windows icon with PNG entries only.
    IcoPng,
    /// A Windows icon suited to embedding in executables: bitmap entries
    /// below 64 pixels, PNG entries above.
    IcoForExecutable,
}

impl OutputFormat {
    /// Returns the ICO entry policy for this format, or `None` for ICNS.
    pub fn ico_format(self) -> Option<IcoFormat> {
        match self {
            OutputFormat::Icns => None,
            OutputFormat::IcoBmp => Some(IcoFormat::BMP),
            OutputFormat::IcoPng => Some(IcoFormat::PNG),
            OutputFormat::IcoForExecutable => Some(IcoFormat::ForExecutable),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Icns => "icns",
            _ => "ico",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            OutputFormat::Icns => "icns",
            OutputFormat::IcoBmp => "ico",
            OutputFormat::IcoPng => "icop",
            OutputFormat::IcoForExecutable => "icowe",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.short_name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<OutputFormat, String> {
        [OutputFormat::Icns,
         OutputFormat::IcoBmp,
         OutputFormat::IcoPng,
         OutputFormat::IcoForExecutable]
            .iter()
            .copied()
            .find(|format| format.short_name() == input)
            .ok_or_else(|| format!("unknown output format: {}", input))
    }
}

/// Settings for a single conversion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConvertOptions {
    /// The container to produce.
    pub format: OutputFormat,
    /// The interpolation algorithm used for every size.
    pub algorithm: Algorithm,
    /// 0 for lossless PNG entries, or the maximum palette size (up to 256)
    /// for color-reduced ones.
    pub colors: u32,
}

/// Converts PNG images into icon containers, reusing resampled and encoded
/// images between calls for the same input.
///
/// A converter is meant for one input at a time; presenting a different
/// input discards everything cached for the previous one.
pub struct Converter<'a, C = PngCrateCodec> {
    codec: C,
    cache: ImageCache,
    logger: Logger<'a>,
}

impl<'a> Converter<'a, PngCrateCodec> {
    /// Creates a silent converter using the default PNG codec.
    pub fn new() -> Converter<'a, PngCrateCodec> {
        Converter::with_codec(PngCrateCodec)
    }
}

impl<'a> Default for Converter<'a, PngCrateCodec> {
    fn default() -> Converter<'a, PngCrateCodec> {
        Converter::new()
    }
}

impl<'a, C: PngCodec> Converter<'a, C> {
    /// Creates a silent converter using the given PNG codec.
    pub fn with_codec(codec: C) -> Converter<'a, C> {
        Converter {
            codec: codec,
            cache: ImageCache::new(),
            logger: Logger::silent(),
        }
    }

    /// Replaces the logger that progress and failures are reported to.
    pub fn with_logger<'b>(self, logger: Logger<'b>) -> Converter<'b, C> {
        Converter {
            codec: self.codec,
            cache: self.cache,
            logger: logger,
        }
    }

    /// Returns the PNG codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the image cache.
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Drops every cached image.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Produces the container described by `options`, or `None` on failure.
    pub fn convert(&mut self,
                   input: &[u8],
                   options: &ConvertOptions)
                   -> Option<Vec<u8>> {
        let result = self.try_convert(input, options);
        self.report(options.format, result)
    }

    /// Produces the container described by `options`.
    pub fn try_convert(&mut self,
                       input: &[u8],
                       options: &ConvertOptions)
                       -> Result<Vec<u8>> {
        match options.format.ico_format() {
            None => self.try_create_icns(input, options.algorithm, options.colors),
            Some(ico_format) => {
                self.try_create_ico(input,
                                    options.algorithm,
                                    options.colors,
                                    ico_format)
            }
        }
    }

    /// Produces an ICNS file, or `None` on failure.
    pub fn create_icns(&mut self,
                       input: &[u8],
                       algorithm: Algorithm,
                       colors: u32)
                       -> Option<Vec<u8>> {
        let result = self.try_create_icns(input, algorithm, colors);
        self.report(OutputFormat::Icns, result)
    }

    /// Produces an ICNS file holding every icon type in
    /// [`ICNS_ICON_TYPES`], in that order.
    pub fn try_create_icns(&mut self,
                           input: &[u8],
                           algorithm: Algorithm,
                           colors: u32)
                           -> Result<Vec<u8>> {
        let colors = colors.min(MAX_PALETTE_COLORS);
        let source = self.source(input, algorithm, colors)?;
        let mut family = IconFamily::new();
        for &icon_type in ICNS_ICON_TYPES.iter() {
            let element = self.icns_element(&source, icon_type, algorithm, colors)
                .map_err(|error| error.in_entry(icon_type.ostype().to_string()))?;
            self.logger.info(format_args!("icns: {} ({}, {:?}): {} bytes",
                                          icon_type.ostype(),
                                          icon_type.label(),
                                          icon_type.encoding(),
                                          element.data().len()));
            family.push(element);
        }
        let output = family.to_bytes()?;
        self.logger.info(format_args!("icns: {} chunks, {} bytes",
                                      family.elements.len(),
                                      output.len()));
        Ok(output)
    }

    /// Produces an ICO file, or `None` on failure.
    pub fn create_ico(&mut self,
                      input: &[u8],
                      algorithm: Algorithm,
                      colors: u32,
                      ico_format: IcoFormat)
                      -> Option<Vec<u8>> {
        let result = self.try_create_ico(input, algorithm, colors, ico_format);
        let format = match ico_format {
            IcoFormat::BMP => OutputFormat::IcoBmp,
            IcoFormat::PNG => OutputFormat::IcoPng,
            IcoFormat::ForExecutable => OutputFormat::IcoForExecutable,
        };
        self.report(format, result)
    }

    /// Produces an ICO file holding every size in [`ICO_SIZES`], in that
    /// order, with entry formats chosen by `ico_format`.
    pub fn try_create_ico(&mut self,
                          input: &[u8],
                          algorithm: Algorithm,
                          colors: u32,
                          ico_format: IcoFormat)
                          -> Result<Vec<u8>> {
        let colors = colors.min(MAX_PALETTE_COLORS);
        let source = self.source(input, algorithm, colors)?;
        let mut icondir = IcoDir::new();
        for &size in ICO_SIZES.iter() {
            let format = ico_format.entry_format(size);
            let label = format!("{}x{}", size, size);
            let data = self.ico_entry_data(&source, size, format, algorithm, colors)
                .map_err(|error| error.in_entry(label.clone()))?;
            self.logger.info(format_args!("ico: {} ({}): {} bytes",
                                          label,
                                          format,
                                          data.len()));
            icondir.add_entry(IcoEntry::new(size, format, data))
                .map_err(|error| error.in_entry(label))?;
        }
        let output = icondir.to_bytes()?;
        self.logger.info(format_args!("ico: {} entries, {} bytes",
                                      icondir.entries().len(),
                                      output.len()));
        Ok(output)
    }

    fn report(&self,
              format: OutputFormat,
              result: Result<Vec<u8>>)
              -> Option<Vec<u8>> {
        match result {
            Ok(output) => Some(output),
            Err(error) => {
                self.logger.error(format_args!("failed to create {} output: {}",
                                               format,
                                               error));
                None
            }
        }
    }

    /// Returns the decoded, square-padded input, decoding it only if the
    /// input changed since the last call.
    fn source(&mut self,
              input: &[u8],
              algorithm: Algorithm,
              colors: u32)
              -> Result<Rc<Bitmap>> {
        if self.cache.use_input(input, algorithm, colors) {
            self.logger.info(format_args!("new input ({} bytes, {}, {} \
                                           colors): image cache reset",
                                          input.len(),
                                          algorithm,
                                          colors));
        }
        let codec = &self.codec;
        self.cache.source(|| {
            let bitmap = codec.decode(input)?;
            if bitmap.width() == 0 || bitmap.height() == 0 {
                let msg = format!("input image is empty ({}x{})",
                                  bitmap.width(),
                                  bitmap.height());
                return Err(Error::InvalidImage(msg));
            }
            Ok(bitmap.into_square())
        })
    }

    fn resampled(&mut self,
                 source: &Bitmap,
                 size: u32,
                 algorithm: Algorithm)
                 -> Result<Rc<Bitmap>> {
        self.cache.resampled(size, size, || {
            Ok(resize::fitted(algorithm, source, size, size))
        })
    }

    fn png(&mut self,
           source: &Bitmap,
           size: u32,
           algorithm: Algorithm,
           colors: u32)
           -> Result<Rc<[u8]>> {
        let bitmap = self.resampled(source, size, algorithm)?;
        let codec = &self.codec;
        self.cache.encoded(size, size, || codec.encode(&bitmap, colors))
    }

    fn icns_element(&mut self,
                    source: &Bitmap,
                    icon_type: IconType,
                    algorithm: Algorithm,
                    colors: u32)
                    -> Result<IconElement> {
        let size = icon_type.pixel_size();
        match icon_type.encoding() {
            Encoding::PNG => {
                let png = self.png(source, size, algorithm, colors)?;
                Ok(IconElement::new(icon_type.ostype(), png.to_vec()))
            }
            Encoding::PackBitsRGB | Encoding::PackBitsARGB |
            Encoding::RawAlpha => {
                let bitmap = self.resampled(source, size, algorithm)?;
                IconElement::encode_bitmap(&bitmap, icon_type)
            }
        }
    }

    fn ico_entry_data(&mut self,
                      source: &Bitmap,
                      size: u32,
                      format: EntryFormat,
                      algorithm: Algorithm,
                      colors: u32)
                      -> Result<Vec<u8>> {
        match format {
            EntryFormat::PNG => {
                Ok(self.png(source, size, algorithm, colors)?.to_vec())
            }
            EntryFormat::BMP => {
                let bitmap = self.resampled(source, size, algorithm)?;
                bmp::icon_entry(&bitmap)
            }
        }
    }
}
