use crate::bin_streams::DecompressionStream;
use crate::errors::CompressionError;
use crate::lz_window::encode_tokens;
use tracing::debug;

type Result<T> = std::result::Result<T, CompressionError>;

const MAX_HEADER_LENGTH: usize = 0xFFFFFF;
const MAX_MATCH: usize = 0x1000;

#[derive(Debug, Clone)]
pub struct LZ11CompressionFormat;

impl LZ11CompressionFormat {
    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let length = bytes.len();
        let mut result: Vec<u8> = Vec::with_capacity(8 + length + (length >> 3));
        result.push(0x11);
        if length > MAX_HEADER_LENGTH {
            // Lengths that do not fit in 24 bits use the extended header.
            result.extend_from_slice(&[0, 0, 0]);
            let extended = u32::try_from(length)
                .map_err(|_| CompressionError::TooLarge(length, "LZ11".to_string()))?;
            result.extend_from_slice(&extended.to_le_bytes());
        } else {
            result.push((length & 0xFF) as u8);
            result.push(((length >> 8) & 0xFF) as u8);
            result.push(((length >> 16) & 0xFF) as u8);
        }

        encode_tokens(bytes, MAX_MATCH, &mut result, |block, length, disp| {
            let disp = disp - 1;
            if length > 0x110 {
                let length = length - 0x111;
                block.push(0x10 | (length >> 12) as u8);
                block.push((length >> 4) as u8);
                block.push(((length & 0xF) << 4 | disp >> 8) as u8);
            } else if length > 0x10 {
                let length = length - 0x11;
                block.push((length >> 4) as u8);
                block.push(((length & 0xF) << 4 | disp >> 8) as u8);
            } else {
                block.push(((length - 1) << 4 | disp >> 8) as u8);
            }
            block.push(disp as u8);
        });
        debug!(input = bytes.len(), output = result.len(), "LZ11 compressed");
        Ok(result)
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() < 4 || bytes[0] != 0x11 {
            return Err(CompressionError::InvalidInput("LZ11".to_string()));
        }
        let header = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let mut length = (header >> 8) as usize;
        let mut body = &bytes[4..];
        if length == 0 && body.len() >= 4 {
            length = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
            body = &body[4..];
        }
        debug!(length, "LZ11 decompressing");
        decompress_body(body, length)
    }
}

fn decompress_body(input: &[u8], length: usize) -> Result<Vec<u8>> {
    let mut stream = DecompressionStream::new(input, length);
    while !stream.is_complete() {
        let flags = stream.read_u8()?;
        for bit in 0..8 {
            if flags & (0x80 >> bit) == 0 {
                let value = stream.read_u8()?;
                stream.write_u8(value)?;
            } else {
                let a = stream.read_u8()? as usize;
                let (count, displacement) = match a >> 4 {
                    0 => {
                        let b = stream.read_u8()? as usize;
                        let c = stream.read_u8()? as usize;
                        (
                            (((a & 0xF) << 4) | (b >> 4)) + 0x11,
                            (((b & 0xF) << 8) | c) + 1,
                        )
                    }
                    1 => {
                        let b = stream.read_u8()? as usize;
                        let c = stream.read_u8()? as usize;
                        let d = stream.read_u8()? as usize;
                        (
                            (((a & 0xF) << 12) | (b << 4) | (c >> 4)) + 0x111,
                            (((c & 0xF) << 8) | d) + 1,
                        )
                    }
                    _ => {
                        let b = stream.read_u8()? as usize;
                        ((a >> 4) + 1, (((a & 0xF) << 8) | b) + 1)
                    }
                };
                stream.copy_back(displacement, count)?;
            }
            if stream.is_complete() {
                break;
            }
        }
    }
    stream.finish()
}
