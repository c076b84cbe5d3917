use std::io::{Cursor, Write};

use binread::{BinRead, BinReaderExt};
use byteorder::{LittleEndian, WriteBytesExt};
use image::RgbaImage;
use tracing::debug;

use crate::pixel_encodings::PixelFormat;
use crate::texture_settings::TextureSettings;
use crate::{texture, EndianAwareIOError, ImageFileError};

type Result<T> = std::result::Result<T, ImageFileError>;

const HEADER_SIZE: usize = 0x80;
const RESERVED_WORDS: usize = 27;

#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
pub struct JtexHeader {
    pub magic: [u8; 4],
    pub unknown1: u32,
    pub width: u16,
    pub height: u16,
    pub format: u8,
    pub orientation: u8,
    pub unknown2: u16,
    pub data_length: u32,
    #[br(count = RESERVED_WORDS)]
    pub reserved: Vec<u32>,
}

impl JtexHeader {
    fn write(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.unknown1)?;
        writer.write_u16::<LittleEndian>(self.width)?;
        writer.write_u16::<LittleEndian>(self.height)?;
        writer.write_u8(self.format)?;
        writer.write_u8(self.orientation)?;
        writer.write_u16::<LittleEndian>(self.unknown2)?;
        writer.write_u32::<LittleEndian>(self.data_length)?;
        for word in &self.reserved {
            writer.write_u32::<LittleEndian>(*word)?;
        }
        Ok(())
    }
}

/// A JTEX texture: a 128-byte little-endian header followed by texel data.
///
/// The orientation byte is kept as-is but textures are always laid out with
/// the default swizzle.
#[derive(Debug, Clone)]
pub struct Jtex {
    pub header: JtexHeader,
    pub settings: TextureSettings,
    pub image: RgbaImage,
}

impl Jtex {
    pub fn from_bytes(file: &[u8]) -> Result<Self> {
        if file.len() < HEADER_SIZE {
            return Err(ImageFileError::FileTooSmall(file.len()));
        }
        let mut cursor = Cursor::new(file);
        let header: JtexHeader = cursor
            .read_le()
            .map_err(|e| ImageFileError::ParserError(format!("{:?}", e)))?;
        let data_end = HEADER_SIZE + header.data_length as usize;
        let texels = file
            .get(HEADER_SIZE..data_end)
            .ok_or(ImageFileError::FileTooSmall(file.len()))?;

        let format = PixelFormat::try_from(header.format)?;
        let settings = TextureSettings::new(header.width as u32, header.height as u32, format)?;
        debug!(
            width = header.width,
            height = header.height,
            %format,
            orientation = header.orientation,
            "Parsed JTEX header"
        );
        let image = texture::load(texels, &settings)?;
        Ok(Jtex {
            header,
            settings,
            image,
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let texels = texture::save(&self.image, &self.settings)?;
        let mut header = self.header.clone();
        header.width =
            u16::try_from(self.image.width()).map_err(|_| EndianAwareIOError::ConversionError)?;
        header.height =
            u16::try_from(self.image.height()).map_err(|_| EndianAwareIOError::ConversionError)?;
        header.data_length =
            u32::try_from(texels.len()).map_err(|_| EndianAwareIOError::ConversionError)?;

        let mut output = Vec::with_capacity(HEADER_SIZE + texels.len());
        header.write(&mut output)?;
        output.extend_from_slice(&texels);
        Ok(output)
    }
}
