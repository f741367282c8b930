use std::path::Path;

use anyhow::Context as _;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::foundation::error::{CollageError, CollageResult};

/// Raster formats the exporter writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless, keeps alpha.
    Png,
    /// No alpha channel; pixels are written as RGB.
    Jpeg,
    /// Uncompressed.
    Bmp,
}

impl ExportFormat {
    /// Pick a format from a file extension; paths without one default to PNG.
    pub fn from_path(path: &Path) -> CollageResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            None | Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("bmp") => Ok(Self::Bmp),
            Some(other) => Err(CollageError::config(
                "output",
                format!("unsupported export format \".{other}\" for '{}'", path.display()),
            )),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Write a composited image, choosing the format from the extension.
pub fn export_image(img: &RgbaImage, path: &Path) -> CollageResult<()> {
    let format = ExportFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let dynamic = DynamicImage::ImageRgba8(img.clone());
    let encoded = match format {
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        ExportFormat::Png | ExportFormat::Bmp => dynamic,
    };
    encoded
        .save_with_format(path, format.image_format())
        .with_context(|| format!("write {format:?} '{}'", path.display()))?;
    tracing::info!(path = %path.display(), ?format, "collage exported");
    Ok(())
}
