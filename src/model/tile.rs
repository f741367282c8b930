use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::{
    core::{Pos, Size},
    error::{CollageError, CollageResult},
};

/// Where a tile's pixels come from.
///
/// Embedded bytes come from imported project files and are shared immutably.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceRef {
    /// Encoded image file on disk.
    Path(PathBuf),
    /// Encoded image bytes carried in memory.
    Embedded {
        /// Original file name, kept for display and for re-export.
        filename: String,
        /// Encoded (PNG/JPEG/...) bytes.
        bytes: Arc<[u8]>,
    },
}

impl SourceRef {
    /// Build an embedded source from owned bytes.
    pub fn embedded(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Embedded {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Display name: the path's file name or the embedded file name.
    pub fn filename(&self) -> String {
        match self {
            Self::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            Self::Embedded { filename, .. } => filename.clone(),
        }
    }

    /// Disk path for path sources.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Embedded { .. } => None,
        }
    }
}

/// User-editable tile fields, validated as a unit before a tile is created or changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileEdit {
    /// Size the tile is drawn at; both sides > 0.
    pub target_size: Size,
    /// User placement; overrides the auto position when drawing.
    pub manual_position: Option<Pos>,
    /// Locked tiles keep their position across layout passes.
    pub locked: bool,
    /// Per-tile radius; 0 defers to the canvas radius.
    pub corner_radius: u32,
    /// Template this tile follows, if any.
    pub template_tag: Option<String>,
}

impl TileEdit {
    /// Edit with only a target size set; everything else at defaults.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            target_size: Size::new(width, height),
            manual_position: None,
            locked: false,
            corner_radius: 0,
            template_tag: None,
        }
    }

    /// Reject a zero-sized target.
    pub fn validate(&self) -> CollageResult<()> {
        Size::positive(
            self.target_size.width,
            self.target_size.height,
            "target_size",
        )?;
        Ok(())
    }
}

impl Default for TileEdit {
    fn default() -> Self {
        // Default size of a freshly added image.
        Self::sized(400, 300)
    }
}

/// One placed image instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    source: SourceRef,
    original_size: Size,
    /// Size the tile is drawn at.
    pub target_size: Size,
    /// Last position assigned by the shelf layout.
    pub auto_position: Option<Pos>,
    /// User placement; wins over `auto_position` when drawing.
    pub manual_position: Option<Pos>,
    /// Excluded from layout while set.
    pub locked: bool,
    /// Per-tile radius; 0 defers to the canvas radius.
    pub corner_radius: u32,
    /// Template this tile follows, if any.
    pub template_tag: Option<String>,
}

impl Tile {
    /// Create a tile from a source and its measured size.
    pub fn new(source: SourceRef, original_size: Size, edit: TileEdit) -> CollageResult<Self> {
        edit.validate()?;
        let mut tile = Self {
            source,
            original_size,
            target_size: edit.target_size,
            auto_position: None,
            manual_position: None,
            locked: false,
            corner_radius: 0,
            template_tag: None,
        };
        tile.apply_edit(edit);
        Ok(tile)
    }

    /// Where the pixels come from.
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Pixel size of the source image.
    pub fn original_size(&self) -> Size {
        self.original_size
    }

    /// Display name of the source.
    pub fn filename(&self) -> String {
        self.source.filename()
    }

    /// Manual position when set, otherwise the last auto-layout result.
    pub fn effective_position(&self) -> Option<Pos> {
        self.manual_position.or(self.auto_position)
    }

    pub(crate) fn apply_edit(&mut self, edit: TileEdit) {
        self.target_size = edit.target_size;
        self.manual_position = edit.manual_position;
        self.locked = edit.locked;
        self.corner_radius = edit.corner_radius;
        self.template_tag = edit.template_tag;
    }

    pub(crate) fn ensure_valid(&self, index: usize) -> CollageResult<()> {
        if self.target_size.width == 0 || self.target_size.height == 0 {
            return Err(CollageError::config(
                format!("tiles[{index}].target_size"),
                format!("width and height must be > 0, got {}", self.target_size),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/tile.rs"]
mod tests;
