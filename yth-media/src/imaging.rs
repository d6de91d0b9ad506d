//! Still image re-encoding.

use crate::error::ConvertError;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

/// Whether two file extensions name the same image format (`jpg` and `jpeg` do).
///
/// Unknown extensions fall back to a case-insensitive string comparison.
pub fn same_format(a: &str, b: &str) -> bool {
    match (ImageFormat::from_extension(a), ImageFormat::from_extension(b)) {
        (Some(fa), Some(fb)) => fa == fb,
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// Decode `src` and encode it to `dst` in the format implied by `dst`'s extension.
pub fn convert_image(src: &Path, dst: &Path) -> Result<(), ConvertError> {
    if !src.is_file() {
        return Err(ConvertError::Missing(src.to_path_buf()));
    }

    tracing::info!(src = %src.display(), dst = %dst.display(), "re-encoding image");

    let img = image::open(src).map_err(|source| ConvertError::Image {
        path: src.to_path_buf(),
        source,
    })?;

    // JPEG has no alpha channel
    let img = match ImageFormat::from_path(dst) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    img.save(dst).map_err(|source| ConvertError::Image {
        path: dst.to_path_buf(),
        source,
    })
}

/// Width and height of an image file.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), ConvertError> {
    image::image_dimensions(path).map_err(|source| ConvertError::Image {
        path: path.to_path_buf(),
        source,
    })
}
