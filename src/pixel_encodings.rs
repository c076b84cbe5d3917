use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use image::Rgba;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::etc1::{self, Etc1Block, OPAQUE_ALPHA};
use crate::TextureError;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

type Result<T> = std::result::Result<T, TextureError>;

/// Texel encodings, numbered as in BCLIM/BFLIM footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum PixelFormat {
    L8 = 0,
    A8 = 1,
    LA44 = 2,
    LA88 = 3,
    HL88 = 4,
    RGB565 = 5,
    RGB888 = 6,
    RGBA5551 = 7,
    RGBA4444 = 8,
    RGBA8888 = 9,
    ETC1 = 10,
    ETC1A4 = 11,
    L4 = 12,
    A4 = 13,
}

impl TryFrom<u8> for PixelFormat {
    type Error = TextureError;

    fn try_from(value: u8) -> Result<Self> {
        PixelFormat::iter()
            .find(|format| *format as u8 == value)
            .ok_or(TextureError::UnsupportedFormat(value))
    }
}

impl PixelFormat {
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            PixelFormat::L8 | PixelFormat::A8 | PixelFormat::LA44 | PixelFormat::ETC1A4 => 8,
            PixelFormat::LA88
            | PixelFormat::HL88
            | PixelFormat::RGB565
            | PixelFormat::RGBA5551
            | PixelFormat::RGBA4444 => 16,
            PixelFormat::RGB888 => 24,
            PixelFormat::RGBA8888 => 32,
            PixelFormat::ETC1 | PixelFormat::L4 | PixelFormat::A4 => 4,
        }
    }

    /// Size in bytes of the smallest independently decodable piece of data.
    pub fn unit_size(&self) -> usize {
        match self {
            PixelFormat::ETC1 => 8,
            PixelFormat::ETC1A4 => 16,
            PixelFormat::L4 | PixelFormat::A4 => 1,
            _ => self.bits_per_pixel() / 8,
        }
    }

    pub fn is_etc1(&self) -> bool {
        matches!(self, PixelFormat::ETC1 | PixelFormat::ETC1A4)
    }
}

fn expand5(value: u16) -> u8 {
    let value = (value & 0x1F) as u8;
    (value << 3) | (value >> 2)
}

fn expand6(value: u16) -> u8 {
    let value = (value & 0x3F) as u8;
    (value << 2) | (value >> 4)
}

fn luminance(color: &Rgba<u8>) -> u16 {
    color[0] as u16 + color[1] as u16 + color[2] as u16
}

/// Lazily decodes texel data into colors in storage order.
pub struct ColorDecoder<'a> {
    format: PixelFormat,
    cursor: Cursor<&'a [u8]>,
    pending_nibble: Option<u8>,
    block: [Rgba<u8>; 16],
    block_position: usize,
}

impl<'a> ColorDecoder<'a> {
    fn new(texels: &'a [u8], format: PixelFormat) -> Self {
        ColorDecoder {
            format,
            cursor: Cursor::new(texels),
            pending_nibble: None,
            block: [Rgba([0, 0, 0, 0]); 16],
            block_position: 16,
        }
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.cursor.read_u8().ok()
    }

    fn read_u16(&mut self) -> Option<u16> {
        self.cursor.read_u16::<LittleEndian>().ok()
    }

    /// Low nibble first, then the high nibble of the same byte.
    fn read_nibble(&mut self) -> Option<u8> {
        match self.pending_nibble.take() {
            Some(nibble) => Some(nibble),
            None => {
                let value = self.read_u8()?;
                self.pending_nibble = Some(value >> 4);
                Some(value & 0xF)
            }
        }
    }

    fn next_block_color(&mut self) -> Option<Rgba<u8>> {
        if self.block_position == self.block.len() {
            let alpha = if self.format == PixelFormat::ETC1A4 {
                self.cursor.read_u64::<LittleEndian>().ok()?
            } else {
                OPAQUE_ALPHA
            };
            let mut bytes = [0; 8];
            self.cursor.read_exact(&mut bytes).ok()?;
            self.block = Etc1Block::from_bytes(bytes).decode(alpha);
            self.block_position = 0;
        }
        let color = self.block[self.block_position];
        self.block_position += 1;
        Some(color)
    }
}

impl<'a> Iterator for ColorDecoder<'a> {
    type Item = Rgba<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let color = match self.format {
            PixelFormat::L8 => {
                let l = self.read_u8()?;
                Rgba([l, l, l, 255])
            }
            PixelFormat::A8 => Rgba([255, 255, 255, self.read_u8()?]),
            PixelFormat::LA44 => {
                let a = self.read_nibble()? * 17;
                let l = self.read_nibble()? * 17;
                Rgba([l, l, l, a])
            }
            PixelFormat::LA88 => {
                let a = self.read_u8()?;
                let l = self.read_u8()?;
                Rgba([l, l, l, a])
            }
            PixelFormat::HL88 => {
                let g = self.read_u8()?;
                let r = self.read_u8()?;
                Rgba([r, g, 255, 255])
            }
            PixelFormat::RGB565 => {
                let value = self.read_u16()?;
                Rgba([expand5(value >> 11), expand6(value >> 5), expand5(value), 255])
            }
            PixelFormat::RGB888 => {
                let b = self.read_u8()?;
                let g = self.read_u8()?;
                let r = self.read_u8()?;
                Rgba([r, g, b, 255])
            }
            PixelFormat::RGBA5551 => {
                let value = self.read_u16()?;
                Rgba([
                    expand5(value >> 11),
                    expand5(value >> 6),
                    expand5(value >> 1),
                    (value & 1) as u8 * 255,
                ])
            }
            PixelFormat::RGBA4444 => {
                let a = self.read_nibble()? * 17;
                let b = self.read_nibble()? * 17;
                let g = self.read_nibble()? * 17;
                let r = self.read_nibble()? * 17;
                Rgba([r, g, b, a])
            }
            PixelFormat::RGBA8888 => {
                let a = self.read_u8()?;
                let b = self.read_u8()?;
                let g = self.read_u8()?;
                let r = self.read_u8()?;
                Rgba([r, g, b, a])
            }
            PixelFormat::ETC1 | PixelFormat::ETC1A4 => self.next_block_color()?,
            PixelFormat::L4 => {
                let l = self.read_nibble()? * 17;
                Rgba([l, l, l, 255])
            }
            PixelFormat::A4 => Rgba([255, 255, 255, self.read_nibble()? * 17]),
        };
        Some(color)
    }
}

pub fn decode(texels: &[u8], format: PixelFormat) -> Result<ColorDecoder<'_>> {
    let unit = format.unit_size();
    if texels.len() % unit != 0 {
        return Err(TextureError::UnalignedData {
            length: texels.len(),
            unit,
        });
    }
    Ok(ColorDecoder::new(texels, format))
}

struct NibbleWriter {
    output: Vec<u8>,
    pending_nibble: Option<u8>,
}

impl NibbleWriter {
    fn new(capacity: usize) -> Self {
        NibbleWriter {
            output: Vec::with_capacity(capacity),
            pending_nibble: None,
        }
    }

    fn write_u8(&mut self, value: u8) {
        self.output.push(value);
    }

    fn write_u16(&mut self, value: u16) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    fn write_nibble(&mut self, value: u8) {
        let value = value & 0xF;
        match self.pending_nibble.take() {
            Some(low) => self.output.push(low | value << 4),
            None => self.pending_nibble = Some(value),
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if let Some(low) = self.pending_nibble.take() {
            self.output.push(low);
        }
        self.output
    }
}

fn encode_etc1_block(colors: &[Rgba<u8>]) -> (u64, Etc1Block) {
    let block: [Rgba<u8>; 16] = std::array::from_fn(|i| colors[i]);
    etc1::encode_block(&block)
}

fn encode_etc1(colors: &[Rgba<u8>], with_alpha: bool) -> Result<Vec<u8>> {
    if colors.len() % 16 != 0 {
        return Err(TextureError::IncompleteBlock(colors.len()));
    }

    #[cfg(feature = "rayon")]
    let blocks: Vec<(u64, Etc1Block)> =
        colors.par_chunks_exact(16).map(encode_etc1_block).collect();
    #[cfg(not(feature = "rayon"))]
    let blocks: Vec<(u64, Etc1Block)> = colors.chunks_exact(16).map(encode_etc1_block).collect();

    let block_size = if with_alpha { 16 } else { 8 };
    let mut output = Vec::with_capacity(blocks.len() * block_size);
    for (alpha, block) in blocks {
        if with_alpha {
            output.extend_from_slice(&alpha.to_le_bytes());
        }
        output.extend_from_slice(&block.to_bytes());
    }
    Ok(output)
}

pub fn encode(colors: &[Rgba<u8>], format: PixelFormat) -> Result<Vec<u8>> {
    match format {
        PixelFormat::ETC1 => return encode_etc1(colors, false),
        PixelFormat::ETC1A4 => return encode_etc1(colors, true),
        _ => {}
    }

    let mut writer = NibbleWriter::new(colors.len() * format.bits_per_pixel() / 8 + 1);
    for color in colors {
        let [r, g, b, a] = color.0;
        match format {
            PixelFormat::L8 => writer.write_u8((luminance(color) / 3) as u8),
            PixelFormat::A8 => writer.write_u8(a),
            PixelFormat::LA44 => {
                writer.write_nibble(a / 16);
                writer.write_nibble((luminance(color) / 48) as u8);
            }
            PixelFormat::LA88 => {
                writer.write_u8(a);
                writer.write_u8((luminance(color) / 3) as u8);
            }
            PixelFormat::HL88 => {
                writer.write_u8(g);
                writer.write_u8(r);
            }
            PixelFormat::RGB565 => writer.write_u16(
                (r as u16 / 8) << 11 | (g as u16 / 4) << 5 | (b as u16 / 8),
            ),
            PixelFormat::RGB888 => {
                writer.write_u8(b);
                writer.write_u8(g);
                writer.write_u8(r);
            }
            PixelFormat::RGBA5551 => writer.write_u16(
                (r as u16 / 8) << 11 | (g as u16 / 8) << 6 | (b as u16 / 8) << 1 | (a as u16 / 128),
            ),
            PixelFormat::RGBA4444 => {
                writer.write_nibble(a / 16);
                writer.write_nibble(b / 16);
                writer.write_nibble(g / 16);
                writer.write_nibble(r / 16);
            }
            PixelFormat::RGBA8888 => {
                writer.write_u8(a);
                writer.write_u8(b);
                writer.write_u8(g);
                writer.write_u8(r);
            }
            PixelFormat::L4 => writer.write_nibble((luminance(color) / 48) as u8),
            PixelFormat::A4 => writer.write_nibble(a / 16),
            PixelFormat::ETC1 | PixelFormat::ETC1A4 => {}
        }
    }
    Ok(writer.finish())
}
