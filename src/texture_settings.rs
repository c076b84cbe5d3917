use crate::pixel_encodings::PixelFormat;
use crate::swizzle::{PointSequence, SwizzleMode};
use crate::texture_utils::padded_dimension;
use crate::TextureError;

type Result<T> = std::result::Result<T, TextureError>;

/// Everything needed to lay texel data out as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSettings {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub swizzle: SwizzleMode,
    pub pad_to_power_of_2: bool,
}

impl TextureSettings {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        Ok(TextureSettings {
            width,
            height,
            format,
            swizzle: SwizzleMode::default(),
            pad_to_power_of_2: true,
        })
    }

    pub fn with_swizzle(mut self, swizzle: SwizzleMode) -> Self {
        self.swizzle = swizzle;
        self
    }

    pub fn with_padding(mut self, pad_to_power_of_2: bool) -> Self {
        self.pad_to_power_of_2 = pad_to_power_of_2;
        self
    }

    /// Same settings for an image of different dimensions.
    pub fn with_dimensions(self, width: u32, height: u32) -> Result<Self> {
        Ok(TextureSettings {
            swizzle: self.swizzle,
            pad_to_power_of_2: self.pad_to_power_of_2,
            ..TextureSettings::new(width, height, self.format)?
        })
    }

    pub fn padded_width(&self) -> u32 {
        padded_dimension(self.width, self.pad_to_power_of_2)
    }

    pub fn padded_height(&self) -> u32 {
        padded_dimension(self.height, self.pad_to_power_of_2)
    }

    pub fn stride(&self) -> u32 {
        if self.swizzle.strides_by_width() {
            self.padded_width()
        } else {
            self.padded_height()
        }
    }

    pub fn padded_pixel_count(&self) -> usize {
        self.padded_width() as usize * self.padded_height() as usize
    }

    pub fn points(&self) -> PointSequence {
        PointSequence::new(self.stride(), self.swizzle)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            TextureSettings::new(0, 8, PixelFormat::RGBA8888),
            Err(TextureError::InvalidDimensions { width: 0, height: 8 })
        ));
        assert!(TextureSettings::new(8, 0, PixelFormat::RGBA8888).is_err());
    }

    #[test]
    fn defaults() {
        let settings = TextureSettings::new(20, 12, PixelFormat::ETC1).unwrap();
        assert_eq!(SwizzleMode::Default, settings.swizzle);
        assert!(settings.pad_to_power_of_2);
        assert_eq!(32, settings.padded_width());
        assert_eq!(16, settings.padded_height());
        assert_eq!(32, settings.stride());
        assert_eq!(512, settings.padded_pixel_count());
    }

    #[test]
    fn stride_follows_the_swizzle() {
        let settings = TextureSettings::new(20, 12, PixelFormat::L8)
            .unwrap()
            .with_swizzle(SwizzleMode::Rotate90);
        assert_eq!(16, settings.stride());
        let settings = settings.with_padding(false);
        assert_eq!(16, settings.stride());
        assert_eq!(24, settings.padded_width());
        assert_eq!(384, settings.padded_pixel_count());
    }

    #[test]
    fn with_dimensions_keeps_layout() {
        let settings = TextureSettings::new(8, 8, PixelFormat::A4)
            .unwrap()
            .with_swizzle(SwizzleMode::Transpose)
            .with_padding(false)
            .with_dimensions(40, 16)
            .unwrap();
        assert_eq!(40, settings.width);
        assert_eq!(SwizzleMode::Transpose, settings.swizzle);
        assert!(!settings.pad_to_power_of_2);
        assert_eq!(16, settings.stride());
    }
}
