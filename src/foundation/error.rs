use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type CollageResult<T> = Result<T, CollageError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CollageError {
    /// Non-numeric or out-of-range canvas/tile settings. Fatal to the current operation.
    #[error("configuration error: {field}: {message}")]
    Configuration {
        /// Name of the offending setting (e.g. `width`, `tiles[2].target_size`).
        field: String,
        /// Human readable reason, including the rejected value.
        message: String,
    },

    /// A source bitmap could not be opened or decoded.
    #[error(transparent)]
    BitmapLoad(#[from] BitmapLoadError),

    /// Errors when serializing or deserializing projects and templates.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollageError {
    /// Build a [`CollageError::Configuration`] value.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a [`CollageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Failure to turn a [`crate::SourceRef`] into pixels.
///
/// "Not found" is kept apart from read and decode failures so callers can tell a
/// moved file from a corrupt one.
#[derive(thiserror::Error, Debug)]
pub enum BitmapLoadError {
    /// The referenced file does not exist.
    #[error("bitmap not found: '{}'", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read bitmap '{}': {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable raster image.
    #[error("cannot decode bitmap '{name}': {source}")]
    Decode {
        /// File name or embedded label of the source.
        name: String,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
