use crate::errors::CompressionError;
use crate::{ContainerCompressionFormat, LZ10CompressionFormat, LZ11CompressionFormat};

type Result<T> = std::result::Result<T, CompressionError>;

#[derive(Debug, Clone)]
pub enum CompressionFormat {
    LZ10(LZ10CompressionFormat),
    LZ11(LZ11CompressionFormat),
    Container(ContainerCompressionFormat),
}

impl CompressionFormat {
    /// Identify a stream by its tag byte. The container format carries no
    /// tag, so it is never detected.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.first() {
            Some(0x10) => Some(CompressionFormat::LZ10(LZ10CompressionFormat {})),
            Some(0x11) => Some(CompressionFormat::LZ11(LZ11CompressionFormat {})),
            _ => None,
        }
    }

    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        match self {
            CompressionFormat::LZ10(c) => c.compress(bytes),
            CompressionFormat::LZ11(c) => c.compress(bytes),
            CompressionFormat::Container(c) => c.compress(bytes),
        }
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        match self {
            CompressionFormat::LZ10(c) => c.decompress(bytes),
            CompressionFormat::LZ11(c) => c.decompress(bytes),
            CompressionFormat::Container(c) => c.decompress(bytes),
        }
    }
}
