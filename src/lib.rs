mod bin_streams;
mod compression_format;
mod endian_aware_io;
mod errors;
mod lz10;
mod lz11;
mod lz_window;
mod pixel_encodings;
mod texture_settings;
mod texture_utils;

pub mod bxlim;
pub mod container;
pub mod etc1;
pub mod huffman;
pub mod jtex;
pub mod rle;
pub mod swizzle;
pub mod texture;
pub mod xi;

pub use bxlim::{Bxlim, BxlimKind};
pub use compression_format::CompressionFormat;
pub use container::{ContainerCompressionFormat, ContainerMethod};
pub use endian_aware_io::{Endian, EndianAwareReader};
pub use errors::{CompressionError, EndianAwareIOError, ImageFileError, TextureError};
pub use jtex::Jtex;
pub use lz10::LZ10CompressionFormat;
pub use lz11::LZ11CompressionFormat;
pub use pixel_encodings::{decode, encode, ColorDecoder, PixelFormat};
pub use swizzle::{address_of, PointSequence, SwizzleMode};
pub use texture_settings::TextureSettings;
pub use xi::Xi;
