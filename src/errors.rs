use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Input is not compressed using {0}.")]
    InvalidInput(String),

    #[error("Compressed stream ended after producing {produced} of {expected} bytes.")]
    UnexpectedEnd { produced: usize, expected: usize },

    #[error(
        "Displacement {displacement} reaches before the start of output at position {position}."
    )]
    InvalidDisplacement { displacement: usize, position: usize },

    #[error("Decompressed data overran the declared length of {expected} bytes.")]
    Overrun { expected: usize },

    #[error("Huffman tree references node {0} outside of the tree buffer.")]
    InvalidTreeNode(usize),

    #[error("Unsupported compression method {0}.")]
    UnsupportedMethod(u8),

    #[error("Input of {0} bytes is too large for the {1} header.")]
    TooLarge(usize, String),
}

impl CompressionError {
    /// True for every failure caused by malformed compressed data, as opposed
    /// to a stream that is well formed but uses an unsupported method.
    pub fn is_corrupt_stream(&self) -> bool {
        !matches!(
            self,
            CompressionError::UnsupportedMethod(_) | CompressionError::TooLarge(_, _)
        )
    }
}

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unsupported pixel format '{0}'.")]
    UnsupportedFormat(u8),

    #[error("Unsupported swizzle mode '{0}'.")]
    UnsupportedSwizzle(u8),

    #[error("Texture dimensions must be positive, got {width}x{height}.")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Texel data of length '{length}' is not a multiple of {unit} bytes.")]
    UnalignedData { length: usize, unit: usize },

    #[error("Expected a multiple of 16 colors for an ETC1 texture, got {0}.")]
    IncompleteBlock(usize),
}

#[derive(Error, Debug)]
pub enum EndianAwareIOError {
    #[error("Unable to convert value to the requested size.")]
    ConversionError,

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ImageFileError {
    #[error("Unrecognized magic number.")]
    BadMagic,

    #[error("File of size '0x{0:x}' is too small to hold an image footer.")]
    FileTooSmall(usize),

    #[error("Failed to parse image header: {0}")]
    ParserError(String),

    #[error("Unsupported tile combine format '{0}'.")]
    UnsupportedCombineFormat(u8),

    #[error("Tile index '{0}' is out of bounds.")]
    TileIndexOutOfBounds(i16),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    EndianAwareIOError(#[from] EndianAwareIOError),

    #[error(transparent)]
    TextureError(#[from] TextureError),

    #[error(transparent)]
    CompressionError(#[from] CompressionError),
}
