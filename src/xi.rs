use std::io::Cursor;

use binread::{BinRead, BinReaderExt};
use byteorder::{ByteOrder, LittleEndian};
use image::RgbaImage;
use tracing::debug;

use crate::container;
use crate::pixel_encodings::PixelFormat;
use crate::swizzle::SwizzleMode;
use crate::texture_settings::TextureSettings;
use crate::texture_utils::align;
use crate::{texture, ImageFileError, TextureError};

type Result<T> = std::result::Result<T, ImageFileError>;

const HEADER_SIZE: usize = 0x48;

/// Map the XI numbering of pixel formats onto [`PixelFormat`].
pub fn pixel_format(value: u8) -> std::result::Result<PixelFormat, TextureError> {
    match value {
        0 => Ok(PixelFormat::RGBA8888),
        1 => Ok(PixelFormat::RGBA4444),
        2 => Ok(PixelFormat::RGBA5551),
        3 => Ok(PixelFormat::RGB888),
        4 => Ok(PixelFormat::RGB565),
        11 => Ok(PixelFormat::LA88),
        12 => Ok(PixelFormat::LA44),
        13 => Ok(PixelFormat::L8),
        14 => Ok(PixelFormat::HL88),
        15 => Ok(PixelFormat::A8),
        26 => Ok(PixelFormat::L4),
        27 => Ok(PixelFormat::A4),
        28 => Ok(PixelFormat::ETC1),
        29 => Ok(PixelFormat::ETC1A4),
        _ => Err(TextureError::UnsupportedFormat(value)),
    }
}

#[derive(BinRead, Debug, Clone)]
#[br(little, magic = b"IMGC")]
pub struct XiHeader {
    pub unknown1: u32,
    pub unknown2: u16,
    pub format: u8,
    pub swizzle: u8,
    pub combine_format: u8,
    pub bit_depth: u8,
    pub bytes_per_tile: u16,
    pub width: u16,
    pub height: u16,
    #[br(count = 8)]
    pub unknown3: Vec<u32>,
    pub table_size_1: u32,
    pub table_size_2: u32,
    pub image_data_size: u32,
    #[br(count = 2)]
    pub unknown4: Vec<u32>,
}

/// A tiled XI (IMGC) image. The tile index table and the tile data are each
/// stored as a compressed container stream.
#[derive(Debug, Clone)]
pub struct Xi {
    pub header: XiHeader,
    pub settings: TextureSettings,
    pub image: RgbaImage,
}

impl Xi {
    pub fn from_bytes(file: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(file);
        let header: XiHeader = cursor.read_le().map_err(|e| match e {
            binread::Error::BadMagic { .. } => ImageFileError::BadMagic,
            e => ImageFileError::ParserError(format!("{:?}", e)),
        })?;
        if header.combine_format != 1 {
            return Err(ImageFileError::UnsupportedCombineFormat(header.combine_format));
        }

        let table_end = HEADER_SIZE + header.table_size_1 as usize;
        let table_stream = file
            .get(HEADER_SIZE..table_end)
            .ok_or(ImageFileError::FileTooSmall(file.len()))?;
        let tile_stream = file
            .get(align(table_end, 4)..)
            .ok_or(ImageFileError::FileTooSmall(file.len()))?;
        let table = container::decompress(table_stream)?;
        let tiles = container::decompress(tile_stream)?;

        let tile_size = header.bytes_per_tile as usize;
        let mut texels = Vec::with_capacity(table.len() / 2 * tile_size);
        for entry in table.chunks_exact(2) {
            let index = LittleEndian::read_i16(entry);
            let start = usize::try_from(index)
                .map_err(|_| ImageFileError::TileIndexOutOfBounds(index))?
                * tile_size;
            let tile = tiles
                .get(start..start + tile_size)
                .ok_or(ImageFileError::TileIndexOutOfBounds(index))?;
            texels.extend_from_slice(tile);
        }

        let format = pixel_format(header.format)?;
        let swizzle = SwizzleMode::try_from(header.swizzle)?;
        let settings = TextureSettings::new(header.width as u32, header.height as u32, format)?
            .with_swizzle(swizzle)
            .with_padding(false);
        debug!(
            width = header.width,
            height = header.height,
            %format,
            %swizzle,
            tiles = table.len() / 2,
            "Assembled XI tiles"
        );
        let image = texture::load(&texels, &settings)?;
        Ok(Xi {
            header,
            settings,
            image,
        })
    }
}
