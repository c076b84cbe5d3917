use std::io::{Cursor, Read};

use image::RgbaImage;
use tracing::debug;

use crate::endian_aware_io::EndianAwareReader;
use crate::pixel_encodings::PixelFormat;
use crate::swizzle::SwizzleMode;
use crate::texture_settings::TextureSettings;
use crate::{texture, Endian, EndianAwareIOError, ImageFileError};

type Result<T> = std::result::Result<T, ImageFileError>;

const FOOTER_SIZE: usize = 40;
const IMAGE_SECTION_SIZE: u32 = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BxlimKind {
    Clim,
    Flim,
}

impl BxlimKind {
    fn from_magic(magic: &[u8]) -> Result<Self> {
        match magic {
            b"CLIM" => Ok(BxlimKind::Clim),
            b"FLIM" => Ok(BxlimKind::Flim),
            _ => Err(ImageFileError::BadMagic),
        }
    }

    fn magic(&self) -> &'static [u8; 4] {
        match self {
            BxlimKind::Clim => b"CLIM",
            BxlimKind::Flim => b"FLIM",
        }
    }
}

/// A BCLIM or BFLIM image: texel data followed by a fixed-size footer whose
/// byte order is given by its BOM.
#[derive(Debug, Clone)]
pub struct Bxlim {
    pub kind: BxlimKind,
    pub endian: Endian,
    pub header_size: u16,
    pub version: u32,
    pub unknown: u16,
    pub settings: TextureSettings,
    pub image: RgbaImage,
}

impl Bxlim {
    pub fn from_bytes(file: &[u8]) -> Result<Self> {
        if file.len() < FOOTER_SIZE {
            return Err(ImageFileError::FileTooSmall(file.len()));
        }
        let (texels, footer) = file.split_at(file.len() - FOOTER_SIZE);
        let kind = BxlimKind::from_magic(&footer[0..4])?;
        let endian =
            Endian::from_bom([footer[4], footer[5]]).ok_or(ImageFileError::BadMagic)?;

        let mut reader = Cursor::new(&footer[6..]);
        let header_size = reader.read_u16(endian)?;
        let version = reader.read_u32(endian)?;
        let _file_size = reader.read_u32(endian)?;
        let _section_count = reader.read_u32(endian)?;
        let mut section_magic = [0; 4];
        reader.read_exact(&mut section_magic)?;
        if &section_magic != b"imag" {
            return Err(ImageFileError::BadMagic);
        }
        let _section_size = reader.read_u32(endian)?;
        let width = reader.read_u16(endian)?;
        let height = reader.read_u16(endian)?;
        let (format, orientation, unknown) = match kind {
            BxlimKind::Clim => {
                let format = reader.read_u8()?;
                let orientation = reader.read_u8()?;
                (format, orientation, reader.read_u16(endian)?)
            }
            BxlimKind::Flim => {
                let unknown = reader.read_u16(endian)?;
                let format = reader.read_u8()?;
                (format, reader.read_u8()?, unknown)
            }
        };

        let format = PixelFormat::try_from(format)?;
        let swizzle = SwizzleMode::try_from(orientation)?;
        let settings =
            TextureSettings::new(width as u32, height as u32, format)?.with_swizzle(swizzle);
        debug!(?kind, ?endian, width, height, %format, %swizzle, "Parsed image footer");
        let image = texture::load(texels, &settings)?;
        Ok(Bxlim {
            kind,
            endian,
            header_size,
            version,
            unknown,
            settings,
            image,
        })
    }

    /// Re-encode the image and append a footer describing it.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let width = u16::try_from(self.image.width())
            .map_err(|_| EndianAwareIOError::ConversionError)?;
        let height = u16::try_from(self.image.height())
            .map_err(|_| EndianAwareIOError::ConversionError)?;
        let mut output = texture::save(&self.image, &self.settings)?;
        let image_size = output.len();
        let file_size = u32::try_from(image_size + FOOTER_SIZE)
            .map_err(|_| EndianAwareIOError::ConversionError)?;

        let endian = self.endian;
        output.extend_from_slice(self.kind.magic());
        output.extend_from_slice(&endian.bom());
        output.extend(endian.encode_u16(self.header_size));
        output.extend(endian.encode_u32(self.version));
        output.extend(endian.encode_u32(file_size));
        output.extend(endian.encode_u32(1));
        output.extend_from_slice(b"imag");
        output.extend(endian.encode_u32(IMAGE_SECTION_SIZE));
        output.extend(endian.encode_u16(width));
        output.extend(endian.encode_u16(height));
        let format = self.settings.format as u8;
        let orientation = self.settings.swizzle as u8;
        match self.kind {
            BxlimKind::Clim => {
                output.push(format);
                output.push(orientation);
                output.extend(endian.encode_u16(self.unknown));
            }
            BxlimKind::Flim => {
                output.extend(endian.encode_u16(self.unknown));
                output.push(format);
                output.push(orientation);
            }
        }
        output.extend(endian.encode_u32(image_size as u32));
        Ok(output)
    }
}
