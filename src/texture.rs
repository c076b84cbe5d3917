use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::pixel_encodings;
use crate::texture_settings::TextureSettings;
use crate::TextureError;

type Result<T> = std::result::Result<T, TextureError>;

/// Decode texel data into an image of `settings.width` by `settings.height`.
///
/// Texels whose swizzled position falls outside the image (tile padding) are
/// dropped. Pixels no texel reaches stay transparent black.
pub fn load(texels: &[u8], settings: &TextureSettings) -> Result<RgbaImage> {
    let colors = pixel_encodings::decode(texels, settings.format)?;
    let mut image = RgbaImage::new(settings.width, settings.height);
    let mut placed = 0usize;
    for (color, (x, y)) in colors.zip(settings.points()) {
        if x < settings.width && y < settings.height {
            image.put_pixel(x, y, color);
            placed += 1;
        }
    }
    debug!(
        width = settings.width,
        height = settings.height,
        format = %settings.format,
        swizzle = %settings.swizzle,
        placed,
        "Loaded texture"
    );
    Ok(image)
}

/// Encode `image` into texel data. Dimensions come from the image itself;
/// only the format, swizzle and padding are taken from `settings`.
pub fn save(image: &RgbaImage, settings: &TextureSettings) -> Result<Vec<u8>> {
    let settings = settings.with_dimensions(image.width(), image.height())?;
    let max_x = settings.width - 1;
    let max_y = settings.height - 1;
    let colors: Vec<Rgba<u8>> = settings
        .points()
        .take(settings.padded_pixel_count())
        .map(|(x, y)| {
            let color = *image.get_pixel(x.min(max_x), y.min(max_y));
            if color[3] == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                color
            }
        })
        .collect();
    let texels = pixel_encodings::encode(&colors, settings.format)?;
    debug!(
        width = settings.width,
        height = settings.height,
        format = %settings.format,
        swizzle = %settings.swizzle,
        size = texels.len(),
        "Saved texture"
    );
    Ok(texels)
}
