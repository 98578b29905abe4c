use std::path::Path;

use anyhow::Context;

use crate::{
    assets::filter::ImageFilter,
    foundation::error::{CaptionError, CaptionResult},
    foundation::math::premultiply_rgba8_in_place,
};

/// Largest edge the CPU rasterizer accepts.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Source image prepared for compositing, in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Read, decode and filter the image at `path`.
///
/// Fails with [`CaptionError::SourceNotFound`] when `path` does not exist.
pub fn load_source_image(path: &Path, filter: ImageFilter) -> CaptionResult<SourceImage> {
    if !path.exists() {
        return Err(CaptionError::source_not_found(path));
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("read source image '{}'", path.display()))?;
    decode_image(&bytes, filter)
}

/// Decode encoded image bytes, apply `filter` and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8], filter: ImageFilter) -> CaptionResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CaptionError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CaptionError::decode("source image has zero width or height"));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CaptionError::validation(format!(
            "source image is {width}x{height}; at most {MAX_DIMENSION} px per side is supported"
        )));
    }

    let mut rgba8 = rgba.into_raw();
    filter.apply_rgba8(&mut rgba8);
    premultiply_rgba8_in_place(&mut rgba8);

    Ok(SourceImage {
        width,
        height,
        rgba8_premul: rgba8,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
