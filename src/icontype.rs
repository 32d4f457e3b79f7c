use std::fmt;

/// Types of icon elements written into an ICNS file.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 24-bit icon (without alpha).
    RGB24_16x16,
    /// 16x16 8-bit alpha mask.
    Mask8_16x16,
    /// 32x32 24-bit icon (without alpha).
    RGB24_32x32,
    /// 32x32 8-bit alpha mask.
    Mask8_32x32,
    /// 16x16 32-bit icon, PackBits-compressed ARGB.
    ARGB32_16x16,
    /// 32x32 32-bit icon, PackBits-compressed ARGB.
    ARGB32_32x32,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
}

/// The icon types written into every ICNS file, in file order.
///
/// Finder and Preview pick thumbnails based on this order, so it must not
/// change.  Each 24-bit icon is immediately followed by its 8-bit mask.
pub const ICNS_ICON_TYPES: [IconType; 14] = [IconType::RGBA32_512x512_2x,
                                             IconType::RGBA32_256x256_2x,
                                             IconType::RGBA32_512x512,
                                             IconType::RGBA32_128x128_2x,
                                             IconType::RGBA32_256x256,
                                             IconType::RGBA32_32x32_2x,
                                             IconType::RGBA32_128x128,
                                             IconType::RGBA32_16x16_2x,
                                             IconType::RGB24_32x32,
                                             IconType::Mask8_32x32,
                                             IconType::ARGB32_32x32,
                                             IconType::RGB24_16x16,
                                             IconType::Mask8_16x16,
                                             IconType::ARGB32_16x16];

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"is32" => Some(IconType::RGB24_16x16),
            b"s8mk" => Some(IconType::Mask8_16x16),
            b"il32" => Some(IconType::RGB24_32x32),
            b"l8mk" => Some(IconType::Mask8_32x32),
            b"ic04" => Some(IconType::ARGB32_16x16),
            b"ic05" => Some(IconType::ARGB32_32x32),
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic08" => Some(IconType::RGBA32_256x256),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            b"ic09" => Some(IconType::RGBA32_512x512),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGB24_16x16 => OSType(*b"is32"),
            IconType::Mask8_16x16 => OSType(*b"s8mk"),
            IconType::RGB24_32x32 => OSType(*b"il32"),
            IconType::Mask8_32x32 => OSType(*b"l8mk"),
            IconType::ARGB32_16x16 => OSType(*b"ic04"),
            IconType::ARGB32_32x32 => OSType(*b"ic05"),
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256 => OSType(*b"ic08"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
            IconType::RGBA32_512x512 => OSType(*b"ic09"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
        }
    }

    /// Returns the pixel data width (and height) of this icon type.
    /// Normally this is the same as the screen size, but for 2x "retina"
    /// density icons, this will be twice that value.
    ///
    /// # Examples
    /// ```
    /// use png2icons::IconType;
    /// assert_eq!(IconType::Mask8_16x16.pixel_size(), 16);
    /// assert_eq!(IconType::RGBA32_256x256.pixel_size(), 256);
    /// assert_eq!(IconType::RGBA32_512x512_2x.pixel_size(), 1024);
    /// ```
    pub fn pixel_size(self) -> u32 {
        self.screen_size() * self.pixel_density()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_16x16_2x |
            IconType::RGBA32_32x32_2x |
            IconType::RGBA32_128x128_2x |
            IconType::RGBA32_256x256_2x |
            IconType::RGBA32_512x512_2x => 2,
            _ => 1,
        }
    }

    /// Returns the screen width (and height) of this icon type.
    pub fn screen_size(self) -> u32 {
        match self {
            IconType::RGB24_16x16 |
            IconType::Mask8_16x16 |
            IconType::ARGB32_16x16 |
            IconType::RGBA32_16x16_2x => 16,
            IconType::RGB24_32x32 |
            IconType::Mask8_32x32 |
            IconType::ARGB32_32x32 |
            IconType::RGBA32_32x32_2x => 32,
            IconType::RGBA32_128x128 |
            IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 |
            IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 |
            IconType::RGBA32_512x512_2x => 512,
        }
    }

    /// Returns a human-readable size label, such as `"32x32"` or
    /// `"512x512@2"`.
    pub fn label(self) -> String {
        let size = self.screen_size();
        if self.pixel_density() > 1 {
            format!("{}x{}@{}", size, size, self.pixel_density())
        } else {
            format!("{}x{}", size, size)
        }
    }

    /// Returns the encoding used within an ICNS file for this icon type.
    pub fn encoding(self) -> Encoding {
        match self {
            IconType::RGB24_16x16 |
            IconType::RGB24_32x32 => Encoding::PackBitsRGB,
            IconType::Mask8_16x16 |
            IconType::Mask8_32x32 => Encoding::RawAlpha,
            IconType::ARGB32_16x16 |
            IconType::ARGB32_32x32 => Encoding::PackBitsARGB,
            IconType::RGBA32_16x16_2x |
            IconType::RGBA32_32x32_2x |
            IconType::RGBA32_128x128 |
            IconType::RGBA32_128x128_2x |
            IconType::RGBA32_256x256 |
            IconType::RGBA32_256x256_2x |
            IconType::RGBA32_512x512 |
            IconType::RGBA32_512x512_2x => Encoding::PNG,
        }
    }

    /// Returns the mask type that must accompany this icon type, if any.
    pub fn mask_type(self) -> Option<IconType> {
        match self {
            IconType::RGB24_16x16 => Some(IconType::Mask8_16x16),
            IconType::RGB24_32x32 => Some(IconType::Mask8_32x32),
            _ => None,
        }
    }

    /// Returns true if this is a mask type, rather than a color icon type.
    pub fn is_mask(self) -> bool {
        self.encoding() == Encoding::RawAlpha
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// Method of encoding an image within an icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Icon element data payload is a PNG file.
    PNG,
    /// Icon element data payload is `ARGB` followed by the alpha, red,
    /// green and blue planes, each PackBits-compressed.
    PackBitsARGB,
    /// Icon element data payload is the red, green and blue planes, each
    /// PackBits-compressed.
    PackBitsRGB,
    /// Icon element data payload is an uncompressed 8-bit alpha mask.
    RawAlpha,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn icon_type_ostype_round_trip() {
        for icon_type in &ICNS_ICON_TYPES {
            let ostype = icon_type.ostype();
            let from = IconType::from_ostype(ostype);
            assert_eq!(Some(*icon_type), from);
        }
    }

    #[test]
    fn icns_table_has_unique_types() {
        for (index, icon_type) in ICNS_ICON_TYPES.iter().enumerate() {
            assert!(!ICNS_ICON_TYPES[index + 1..].contains(icon_type));
        }
    }

    #[test]
    fn masks_follow_their_icons() {
        for (index, icon_type) in ICNS_ICON_TYPES.iter().enumerate() {
            if let Some(mask_type) = icon_type.mask_type() {
                assert_eq!(ICNS_ICON_TYPES[index + 1], mask_type);
                assert_eq!(mask_type.pixel_size(), icon_type.pixel_size());
                assert!(mask_type.is_mask());
            }
        }
    }

    #[test]
    fn labels() {
        assert_eq!(IconType::RGB24_16x16.label(), "16x16");
        assert_eq!(IconType::RGBA32_512x512_2x.label(), "512x512@2");
        assert_eq!(IconType::RGBA32_32x32_2x.pixel_size(), 64);
    }

    #[test]
    fn ostype_to_and_from_str() {
        let ostype = OSType::from_str("abcd").expect("failed to parse OSType");
        assert_eq!(ostype.to_string(), "abcd".to_string());
    }

    #[test]
    fn ostype_from_str_failure() {
        assert_eq!(OSType::from_str("abc"),
                   Err("OSType string must be 4 bytes (was 3)".to_string()));
        assert_eq!(OSType::from_str("abcde"),
                   Err("OSType string must be 4 bytes (was 5)".to_string()));
    }
}
