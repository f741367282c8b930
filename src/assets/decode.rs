use std::path::Path;

use image::DynamicImage;

use crate::{
    foundation::{core::Size, error::BitmapLoadError},
    model::tile::SourceRef,
};

/// Turns a tile's [`SourceRef`] into decoded pixels.
///
/// The compositor only talks to this trait, so tests and embedding applications can
/// supply bitmaps from anywhere.
pub trait BitmapResolver {
    /// Load and decode the pixels behind `source`.
    fn resolve(&mut self, source: &SourceRef) -> Result<DynamicImage, BitmapLoadError>;
}

/// Resolver for on-disk paths and embedded project bytes.
///
/// Files are read fully into memory and closed before decoding, so no handle
/// outlives a single `resolve` call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceLoader;

impl BitmapResolver for SourceLoader {
    fn resolve(&mut self, source: &SourceRef) -> Result<DynamicImage, BitmapLoadError> {
        match source {
            SourceRef::Path(path) => {
                let bytes = read_source_bytes(path)?;
                decode_bitmap(&bytes, &source.filename())
            }
            SourceRef::Embedded { filename, bytes } => decode_bitmap(bytes, filename),
        }
    }
}

impl<F> BitmapResolver for F
where
    F: FnMut(&SourceRef) -> Result<DynamicImage, BitmapLoadError>,
{
    fn resolve(&mut self, source: &SourceRef) -> Result<DynamicImage, BitmapLoadError> {
        self(source)
    }
}

/// Decode encoded image bytes (PNG, JPEG, BMP, GIF).
pub fn decode_bitmap(bytes: &[u8], name: &str) -> Result<DynamicImage, BitmapLoadError> {
    image::load_from_memory(bytes).map_err(|source| BitmapLoadError::Decode {
        name: name.to_owned(),
        source,
    })
}

/// Read a source file, mapping a missing file to [`BitmapLoadError::NotFound`].
pub fn read_source_bytes(path: &Path) -> Result<Vec<u8>, BitmapLoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BitmapLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            BitmapLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Measure a source's pixel size without keeping it decoded.
pub fn probe_size(source: &SourceRef) -> Result<Size, BitmapLoadError> {
    match source {
        SourceRef::Path(path) => {
            if !path.exists() {
                return Err(BitmapLoadError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            let (width, height) =
                image::image_dimensions(path).map_err(|source| match source {
                    image::ImageError::IoError(io) => BitmapLoadError::Io {
                        path: path.to_path_buf(),
                        source: io,
                    },
                    other => BitmapLoadError::Decode {
                        name: path.display().to_string(),
                        source: other,
                    },
                })?;
            Ok(Size::new(width, height))
        }
        SourceRef::Embedded { filename, bytes } => {
            let img = decode_bitmap(bytes, filename)?;
            Ok(Size::new(img.width(), img.height()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
