use crate::bin_streams::DecompressionStream;
use crate::lz_window::encode_tokens;
use crate::CompressionError;
use tracing::debug;

type Result<T> = std::result::Result<T, CompressionError>;

const MAX_LENGTH: usize = 0xFFFFFF;
const MAX_MATCH: usize = 0x12;

#[derive(Debug, Clone)]
pub struct LZ10CompressionFormat;

impl LZ10CompressionFormat {
    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() > MAX_LENGTH {
            return Err(CompressionError::TooLarge(bytes.len(), "LZ10".to_string()));
        }
        let length = bytes.len() as u32;
        let mut buf: Vec<u8> = Vec::with_capacity(4 + bytes.len() + bytes.len() / 8);
        buf.extend_from_slice(&(length << 8 | 0x10).to_le_bytes());
        encode_tokens(bytes, MAX_MATCH, &mut buf, |block, length, disp| {
            let reference = ((length - 3) << 12 | (disp - 1)) as u16;
            block.extend_from_slice(&reference.to_be_bytes());
        });
        debug!(input = bytes.len(), output = buf.len(), "LZ10 compressed");
        Ok(buf)
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() < 4 || bytes[0] != 0x10 {
            return Err(CompressionError::InvalidInput("LZ10".to_string()));
        }
        let length = bytes[1] as usize | (bytes[2] as usize) << 8 | (bytes[3] as usize) << 16;
        debug!(length, "LZ10 decompressing");
        decompress_body(&bytes[4..], length)
    }
}

/// Decode a headerless LZ10 body. The container format's LZSS method uses the
/// same token layout, so it shares this routine.
pub(crate) fn decompress_body(input: &[u8], length: usize) -> Result<Vec<u8>> {
    let mut stream = DecompressionStream::new(input, length);
    while !stream.is_complete() {
        let flags = stream.read_u8()?;
        for bit in 0..8 {
            if flags & (0x80 >> bit) == 0 {
                let value = stream.read_u8()?;
                stream.write_u8(value)?;
            } else {
                let reference = stream.read_u16_be()? as usize;
                let count = (reference >> 12) + 3;
                let displacement = (reference & 0xFFF) + 1;
                stream.copy_back(displacement, count)?;
            }
            if stream.is_complete() {
                break;
            }
        }
    }
    stream.finish()
}
