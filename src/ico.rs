use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::{Error, Result};

/// The pixel sizes written into every ICO file, in file order.
pub const ICO_SIZES: [u32; 9] = [16, 24, 32, 48, 64, 72, 96, 128, 256];

/// The length of the ICONDIR header, in bytes.
pub const ICON_DIR_HEADER_LENGTH: u32 = 6;

/// The length of one ICONDIRENTRY, in bytes.
pub const ICON_DIR_ENTRY_LENGTH: u32 = 16;

/// The ICONDIR resource type for icons (cursors use 2).
const RESOURCE_TYPE_ICON: u16 = 1;

/// Entries below this size are stored as bitmaps in executable icons.
const EXECUTABLE_PNG_MIN_SIZE: u32 = 64;

/// How the payload of a single ICO entry is stored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntryFormat {
    /// A complete PNG file.
    PNG,
    /// A `BITMAPINFOHEADER`, BGRA pixels and a 1-bit mask.
    BMP,
}

/// Which entry formats an ICO file uses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IcoFormat {
    /// Every entry is a bitmap.
    BMP,
    /// Every entry is a PNG file.
    PNG,
    /// Bitmaps below 64 pixels and PNG files from 64 pixels up, for
    /// embedding in Windows executables.
    ForExecutable,
}

impl IcoFormat {
    /// Returns the entry format used for an icon of the given size.
    pub fn entry_format(self, size: u32) -> EntryFormat {
        match self {
            IcoFormat::BMP => EntryFormat::BMP,
            IcoFormat::PNG => EntryFormat::PNG,
            IcoFormat::ForExecutable => {
                if size < EXECUTABLE_PNG_MIN_SIZE {
                    EntryFormat::BMP
                } else {
                    EntryFormat::PNG
                }
            }
        }
    }
}

impl fmt::Display for EntryFormat {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EntryFormat::PNG => out.write_str("PNG"),
            EntryFormat::BMP => out.write_str("BMP"),
        }
    }
}

impl FromStr for IcoFormat {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<IcoFormat, String> {
        match input {
            "bmp" => Ok(IcoFormat::BMP),
            "png" => Ok(IcoFormat::PNG),
            "exe" => Ok(IcoFormat::ForExecutable),
            _ => Err(format!("unknown ICO format: {}", input)),
        }
    }
}

/// One entry in an ICO file; a single icon image.
pub struct IcoEntry {
    size: u32,
    format: EntryFormat,
    data: Vec<u8>,
}

impl IcoEntry {
    /// Creates an entry for a square icon of the given size.
    pub fn new(size: u32, format: EntryFormat, data: Vec<u8>) -> IcoEntry {
        IcoEntry {
            size: size,
            format: format,
            data: data,
        }
    }

    /// Returns the width (and height) of the icon, in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns how the payload is stored.
    pub fn format(&self) -> EntryFormat {
        self.format
    }

    /// Returns the payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A collection of icon images; the contents of a single ICO file.
#[derive(Default)]
pub struct IcoDir {
    entries: Vec<IcoEntry>,
}

impl IcoDir {
    /// Creates a new, empty collection of icons.
    pub fn new() -> IcoDir {
        IcoDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection.
    pub fn entries(&self) -> &[IcoEntry] {
        &self.entries
    }

    /// Appends an entry.  Returns an error if the entry cannot be described
    /// by an ICONDIRENTRY.
    pub fn add_entry(&mut self, entry: IcoEntry) -> Result<()> {
        if entry.size == 0 || entry.size > 256 {
            let msg = format!("ICO entries must be 1 to 256 pixels (was {})",
                              entry.size);
            return Err(Error::InvalidImage(msg));
        }
        if self.entries.len() >= u16::MAX as usize {
            let msg = format!("too many ICO entries (max is {})", u16::MAX);
            return Err(Error::InvalidImage(msg));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the file offset of the first payload.
    fn first_data_offset(&self) -> u32 {
        ICON_DIR_HEADER_LENGTH +
        ICON_DIR_ENTRY_LENGTH * (self.entries.len() as u32)
    }

    /// Returns the encoded length of the file, in bytes.
    pub fn total_length(&self) -> u32 {
        self.entries
            .iter()
            .fold(self.first_data_offset(),
                  |length, entry| length + entry.data.len() as u32)
    }

    /// Writes an ICO file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(RESOURCE_TYPE_ICON)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        let mut data_offset = self.first_data_offset();
        for entry in self.entries.iter() {
            // A size byte of 0 means 256.
            let size_byte = if entry.size > 255 { 0 } else { entry.size as u8 };
            writer.write_u8(size_byte)?; // width
            writer.write_u8(size_byte)?; // height
            writer.write_u8(0)?; // colors
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(1)?; // planes
            writer.write_u16::<LittleEndian>(32)?; // bits per pixel
            let data_size = entry.data.len() as u32;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
            data_offset += data_size;
        }
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Serializes the ICO file into a new buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.total_length() as usize);
        self.write(&mut output)?;
        Ok(output)
    }
}
