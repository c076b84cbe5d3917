use crate::huffman::{self, SymbolWidth};
use crate::{lz10, rle, CompressionError};
use tracing::debug;

type Result<T> = std::result::Result<T, CompressionError>;

const MAX_LENGTH: usize = (u32::MAX >> 3) as usize;

/// Compression method stored in the low three bits of the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMethod {
    Uncompressed = 0,
    Lzss = 1,
    Huffman4Bit = 2,
    Huffman8Bit = 3,
    Rle = 4,
}

impl TryFrom<u8> for ContainerMethod {
    type Error = CompressionError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ContainerMethod::Uncompressed),
            1 => Ok(ContainerMethod::Lzss),
            2 => Ok(ContainerMethod::Huffman4Bit),
            3 => Ok(ContainerMethod::Huffman8Bit),
            4 => Ok(ContainerMethod::Rle),
            _ => Err(CompressionError::UnsupportedMethod(value)),
        }
    }
}

/// Split a container header into its method and declared length.
pub fn read_header(bytes: &[u8]) -> Result<(ContainerMethod, usize)> {
    if bytes.len() < 4 {
        return Err(CompressionError::InvalidInput("container".to_string()));
    }
    let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let method = ContainerMethod::try_from((value & 7) as u8)?;
    Ok((method, (value >> 3) as usize))
}

pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let (method, length) = read_header(bytes)?;
    debug!(?method, length, "Decompressing container");
    if length == 0 {
        return Ok(Vec::new());
    }
    let body = &bytes[4..];
    match method {
        ContainerMethod::Uncompressed => {
            if body.len() < length {
                return Err(CompressionError::UnexpectedEnd {
                    produced: body.len(),
                    expected: length,
                });
            }
            Ok(body[..length].to_vec())
        }
        ContainerMethod::Lzss => lz10::decompress_body(body, length),
        ContainerMethod::Huffman4Bit => huffman::decompress(body, length, SymbolWidth::Nibble),
        ContainerMethod::Huffman8Bit => huffman::decompress(body, length, SymbolWidth::Byte),
        ContainerMethod::Rle => rle::decompress(body, length),
    }
}

/// Wrap `bytes` in an uncompressed (method 0) container.
pub fn compress_verbatim(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() > MAX_LENGTH {
        return Err(CompressionError::TooLarge(bytes.len(), "container".to_string()));
    }
    let header = (bytes.len() as u32) << 3 | ContainerMethod::Uncompressed as u32;
    let mut result = Vec::with_capacity(bytes.len() + 4);
    result.extend_from_slice(&header.to_le_bytes());
    result.extend_from_slice(bytes);
    Ok(result)
}

#[derive(Debug, Clone)]
pub struct ContainerCompressionFormat;

impl ContainerCompressionFormat {
    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        compress_verbatim(bytes)
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        decompress(bytes)
    }
}
