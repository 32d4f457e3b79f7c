use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error as IoError, ErrorKind, Read, Write};

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::icontype::{Encoding, IconType, OSType};
use crate::packbits;

/// The length of an icon element header, in bytes:
pub const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// The magic prefix of a PackBits-compressed ARGB payload.
const ARGB_MAGIC_LITERAL: &[u8; 4] = b"ARGB";

/// One entry in an ICNS file.  Depending on the resource type, this may
/// represent an icon, or part of an icon (such as an alpha mask, or color
/// data without the mask).
pub struct IconElement {
    ostype: OSType,
    data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement {
            ostype: ostype,
            data: data,
        }
    }

    /// Encodes an already-resampled bitmap as an element of the given type.
    /// The bitmap must have the icon type's pixel size.
    ///
    /// PNG payloads need a PNG encoder, so `Encoding::PNG` types are
    /// rejected here with `Error::UnsupportedEncoding`; build those with
    /// [`IconElement::new`] instead.
    pub fn encode_bitmap(bitmap: &Bitmap,
                         icon_type: IconType)
                         -> Result<IconElement> {
        let size = icon_type.pixel_size();
        if bitmap.width() != size || bitmap.height() != size {
            let msg = format!("{} needs a {}x{} bitmap (was {}x{})",
                              icon_type.ostype(),
                              size,
                              size,
                              bitmap.width(),
                              bitmap.height());
            return Err(Error::InvalidImage(msg));
        }
        let data = match icon_type.encoding() {
            Encoding::PackBitsRGB => {
                packbits::encode_planes(&[bitmap.channel_plane(0),
                                          bitmap.channel_plane(1),
                                          bitmap.channel_plane(2)])
            }
            Encoding::PackBitsARGB => {
                let mut data = ARGB_MAGIC_LITERAL.to_vec();
                data.extend(packbits::encode_planes(&[bitmap.alpha_plane(),
                                                      bitmap.channel_plane(0),
                                                      bitmap.channel_plane(1),
                                                      bitmap.channel_plane(2)]));
                data
            }
            Encoding::RawAlpha => bitmap.alpha_plane(),
            Encoding::PNG => {
                return Err(Error::UnsupportedEncoding(icon_type.ostype()
                    .to_string()));
            }
        };
        Ok(IconElement::new(icon_type.ostype(), data))
    }

    /// Returns the OSType for this element (e.g. `il32` or `ic07`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this element.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Decodes the color planes of a PackBits-compressed element, returning
    /// the red, green and blue planes (preceded by alpha for `ARGB`
    /// elements).
    pub fn decode_planes(&self) -> Result<Vec<Vec<u8>>> {
        let icon_type = self.icon_type().ok_or_else(|| {
            Error::UnsupportedEncoding(self.ostype.to_string())
        })?;
        let size = icon_type.pixel_size() as usize;
        match icon_type.encoding() {
            Encoding::PackBitsRGB => {
                packbits::decode_planes(&self.data, 3, size * size)
            }
            Encoding::PackBitsARGB => {
                if !self.data.starts_with(ARGB_MAGIC_LITERAL) {
                    let msg = format!("{} payload lacks ARGB prefix",
                                      self.ostype);
                    return Err(Error::InvalidData(msg));
                }
                packbits::decode_planes(&self.data[4..], 4, size * size)
            }
            Encoding::RawAlpha => Ok(vec![self.data.clone()]),
            Encoding::PNG => {
                Err(Error::UnsupportedEncoding(self.ostype.to_string()))
            }
        }
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(IoError::new(ErrorKind::InvalidData,
                                    "invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data)?;
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_all(raw_ostype)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(size: u32) -> Bitmap {
        let mut data = Vec::new();
        for y in 0..size {
            for x in 0..size {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&[0, 0, 255, 0]);
                }
            }
        }
        Bitmap::from_rgba(size, size, data).unwrap()
    }

    #[test]
    fn encode_rgb_planes() {
        let bitmap = checker(16);
        let element = IconElement::encode_bitmap(&bitmap,
                                                 IconType::RGB24_16x16)
            .unwrap();
        assert_eq!(element.ostype(), OSType(*b"is32"));
        let planes = element.decode_planes().unwrap();
        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0], bitmap.channel_plane(0));
        assert_eq!(planes[1], vec![0u8; 256]);
        assert_eq!(planes[2], bitmap.channel_plane(2));
    }

    #[test]
    fn encode_argb_planes() {
        let bitmap = checker(32);
        let element = IconElement::encode_bitmap(&bitmap,
                                                 IconType::ARGB32_32x32)
            .unwrap();
        assert_eq!(&element.data()[..4], b"ARGB");
        let planes = element.decode_planes().unwrap();
        assert_eq!(planes[0], bitmap.alpha_plane());
        assert_eq!(planes[1], bitmap.channel_plane(0));
    }

    #[test]
    fn encode_mask() {
        let bitmap = checker(16);
        let element = IconElement::encode_bitmap(&bitmap,
                                                 IconType::Mask8_16x16)
            .unwrap();
        assert_eq!(element.data().len(), 256);
        assert_eq!(element.data()[0], 255);
        assert_eq!(element.data()[1], 0);
        assert_eq!(element.total_length(), 264);
    }

    #[test]
    fn encode_rejects_wrong_size() {
        let result = IconElement::encode_bitmap(&checker(8),
                                                IconType::RGB24_16x16);
        match result {
            Err(Error::InvalidImage(_)) => {}
            _ => panic!("expected an invalid image error"),
        }
    }

    #[test]
    fn encode_rejects_png_types() {
        let result = IconElement::encode_bitmap(&checker(128),
                                                IconType::RGBA32_128x128);
        match result {
            Err(Error::UnsupportedEncoding(ref ostype)) => {
                assert_eq!(ostype, "ic07")
            }
            _ => panic!("expected an unsupported encoding error"),
        }
    }

    #[test]
    fn decode_rle() {
        let data: Vec<u8> = vec![0, 12, 255, 0, 250, 0, 128, 34, 255, 0, 248,
                                 0, 1, 56, 99, 255, 0, 249, 0];
        let element = IconElement::new(OSType(*b"is32"), data);
        let planes = element.decode_planes().expect("failed to decode planes");
        assert_eq!(planes[0][0], 12);
        assert_eq!(planes[1][0], 34);
        assert_eq!(planes[2][0], 56);
    }

    #[test]
    fn write_and_read_element() {
        let element = IconElement::new(OSType(*b"quux"), b"foobar".to_vec());
        let mut output = Vec::new();
        element.write(&mut output).unwrap();
        assert_eq!(&output[..], b"quux\0\0\0\x0efoobar");
        let read = IconElement::read(&output[..]).unwrap();
        assert_eq!(read.ostype(), OSType(*b"quux"));
        assert_eq!(read.data(), b"foobar");
    }
}
