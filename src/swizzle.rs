use strum_macros::{Display, EnumIter};

use crate::TextureError;

/// Orientation of the 8x8 tile grid, as stored in image headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum SwizzleMode {
    Default = 0,
    TransposeTile = 1,
    Rotate90 = 4,
    Transpose = 8,
}

impl Default for SwizzleMode {
    fn default() -> Self {
        SwizzleMode::Default
    }
}

impl TryFrom<u8> for SwizzleMode {
    type Error = TextureError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SwizzleMode::Default),
            1 => Ok(SwizzleMode::TransposeTile),
            4 => Ok(SwizzleMode::Rotate90),
            8 => Ok(SwizzleMode::Transpose),
            _ => Err(TextureError::UnsupportedSwizzle(value)),
        }
    }
}

impl SwizzleMode {
    /// Whether tiles are laid out along the image width (true) or height.
    pub fn strides_by_width(&self) -> bool {
        matches!(self, SwizzleMode::Default | SwizzleMode::TransposeTile)
    }
}

/// Map a linear texel index to image coordinates. `stride` is the padded
/// extent of the dimension the tiles are laid out along.
pub fn address_of(index: u32, stride: u32, mode: SwizzleMode) -> (u32, u32) {
    let tiles_per_row = (stride / 8).max(1);
    let tile = index / 64;
    let tile_x = tile % tiles_per_row * 8;
    let tile_y = tile / tiles_per_row * 8;
    let in_x = (index >> 2 & 4) | (index >> 1 & 2) | (index & 1);
    let in_y = (index >> 3 & 4) | (index >> 2 & 2) | (index >> 1 & 1);

    match mode {
        SwizzleMode::Default => (tile_x + in_x, tile_y + in_y),
        SwizzleMode::TransposeTile => (tile_x + in_y, tile_y + in_x),
        SwizzleMode::Rotate90 => (tile_y + in_y, stride.saturating_sub(1 + tile_x + in_x)),
        SwizzleMode::Transpose => (tile_y + in_y, tile_x + in_x),
    }
}

/// Endless sequence of texel coordinates in storage order.
#[derive(Debug, Clone)]
pub struct PointSequence {
    index: u32,
    stride: u32,
    mode: SwizzleMode,
}

impl PointSequence {
    pub fn new(stride: u32, mode: SwizzleMode) -> Self {
        PointSequence {
            index: 0,
            stride,
            mode,
        }
    }
}

impl Iterator for PointSequence {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let point = address_of(self.index, self.stride, self.mode);
        self.index = self.index.checked_add(1)?;
        Some(point)
    }
}
