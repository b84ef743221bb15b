//! Event thumbnail policy. Uploaded images are stored under a uuid filename
//! and, once the owning row is written, shrunk in place to fit a fixed
//! bounding box. The hook is explicit so the resize policy is testable apart
//! from persistence.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use uuid::Uuid;

pub const MAX_WIDTH: u32 = 200;
pub const MAX_HEIGHT: u32 = 100;

const THUMB_DIR: &str = "eventbro/thumbs";

#[derive(Debug, Error)]
pub enum ThumbError {
    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Media-relative storage path for an upload: the original filename is
/// discarded in favour of a uuid, keeping only the extension.
pub fn media_filename(extension: &str) -> PathBuf {
    Path::new(THUMB_DIR).join(format!("{}.{}", Uuid::new_v4(), extension))
}

/// Downscaled copy fitting within 200x100, aspect ratio preserved. `None`
/// when the image is already inside the box and must be left untouched.
pub fn fit_within(image: &DynamicImage) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    if width <= MAX_WIDTH && height <= MAX_HEIGHT {
        None
    } else {
        Some(image.thumbnail(MAX_WIDTH, MAX_HEIGHT))
    }
}

/// Post-persist hook: called by the upload handler after the event row has
/// been written. Rewrites the stored file only when it exceeds the box.
pub fn shrink_in_place(path: &Path) -> Result<(), ThumbError> {
    let image = image::open(path)?;
    if let Some(thumb) = fit_within(&image) {
        thumb.save(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::new_rgb8(width, height)
    }

    fn assert_aspect_preserved(original: (u32, u32), resized: (u32, u32)) {
        let before = original.0 as f64 / original.1 as f64;
        let after = resized.0 as f64 / resized.1 as f64;
        // Integer dimensions allow a little rounding drift.
        assert!(
            (before - after).abs() < 0.05,
            "aspect drifted: {before} vs {after}"
        );
    }

    #[test]
    fn oversized_image_fits_the_box() {
        let thumb = fit_within(&blank(400, 300)).expect("should resize");
        let (width, height) = thumb.dimensions();
        assert!(width <= MAX_WIDTH && height <= MAX_HEIGHT);
        assert_aspect_preserved((400, 300), (width, height));
    }

    #[test]
    fn wide_image_is_bounded_by_width() {
        let thumb = fit_within(&blank(1000, 50)).expect("should resize");
        let (width, height) = thumb.dimensions();
        assert!(width <= MAX_WIDTH && height <= MAX_HEIGHT);
        assert_aspect_preserved((1000, 50), (width, height));
    }

    #[test]
    fn tall_image_is_bounded_by_height() {
        let thumb = fit_within(&blank(60, 400)).expect("should resize");
        let (width, height) = thumb.dimensions();
        assert!(width <= MAX_WIDTH && height <= MAX_HEIGHT);
    }

    #[test]
    fn in_bounds_image_is_untouched() {
        assert!(fit_within(&blank(150, 80)).is_none());
        assert!(fit_within(&blank(MAX_WIDTH, MAX_HEIGHT)).is_none());
    }

    #[test]
    fn media_filenames_keep_the_extension_and_nothing_else() {
        let path = media_filename("png");
        assert!(path.starts_with(THUMB_DIR));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_ne!(media_filename("png"), path);
    }
}
