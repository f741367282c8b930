//! Self-contained project files.
//!
//! A project embeds every source image as base64 so it can be reopened on another
//! machine without the original files. Canvas settings are written as strings and
//! accepted as strings or numbers.

use std::path::Path;

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    assets::decode::read_source_bytes,
    foundation::{
        core::{Pos, Size},
        error::{CollageError, CollageResult},
    },
    model::{
        collage::Collage,
        settings::{CanvasSettings, CanvasSettingsInput},
        tile::{SourceRef, Tile, TileEdit},
    },
};

/// On-disk project document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectFile {
    /// Canvas settings, numbers written as strings.
    pub collage_settings: CanvasSettingsInput,
    /// Tiles in paint order.
    pub images: Vec<ProjectImage>,
}

/// One tile in a project document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProjectImage {
    /// Source width.
    pub orig_w: u32,
    /// Source height.
    pub orig_h: u32,
    /// Drawn width.
    pub target_w: u32,
    /// Drawn height.
    pub target_h: u32,
    /// Manual position, x.
    pub manual_x: Option<i64>,
    /// Manual position, y.
    pub manual_y: Option<i64>,
    /// Auto-layout position at save time.
    pub x: Option<i64>,
    /// Auto-layout position at save time, y.
    pub y: Option<i64>,
    /// False when absent.
    #[serde(default)]
    pub locked: bool,
    /// 0 when absent.
    #[serde(default)]
    pub corner_radius: u32,
    /// Source file name.
    pub filename: String,
    /// Template name, null when absent.
    #[serde(default)]
    pub template_tag: Option<String>,
    /// Standard base64 of the encoded source file.
    pub image_data: String,
}

fn pair(x: Option<i64>, y: Option<i64>) -> Option<Pos> {
    match (x, y) {
        (Some(x), Some(y)) => Some(Pos::new(x, y)),
        _ => None,
    }
}

impl ProjectFile {
    /// Snapshot a collage, reading and embedding every source file.
    pub fn from_collage(collage: &Collage) -> CollageResult<Self> {
        let mut images = Vec::with_capacity(collage.len());
        for tile in collage.tiles() {
            let raw = match tile.source() {
                SourceRef::Path(path) => read_source_bytes(path)?,
                SourceRef::Embedded { bytes, .. } => bytes.to_vec(),
            };
            images.push(ProjectImage {
                orig_w: tile.original_size().width,
                orig_h: tile.original_size().height,
                target_w: tile.target_size.width,
                target_h: tile.target_size.height,
                manual_x: tile.manual_position.map(|p| p.x),
                manual_y: tile.manual_position.map(|p| p.y),
                x: tile.auto_position.map(|p| p.x),
                y: tile.auto_position.map(|p| p.y),
                locked: tile.locked,
                corner_radius: tile.corner_radius,
                filename: tile.filename(),
                template_tag: tile.template_tag.clone(),
                image_data: STANDARD.encode(&raw),
            });
        }
        Ok(Self {
            collage_settings: collage.settings().to_input(),
            images,
        })
    }

    /// Rebuild a collage; tiles become embedded sources and keep their stored positions.
    pub fn into_collage(self) -> CollageResult<Collage> {
        let settings = CanvasSettings::try_from(&self.collage_settings)?;
        let mut tiles = Vec::with_capacity(self.images.len());
        for (idx, img) in self.images.into_iter().enumerate() {
            let bytes = STANDARD.decode(img.image_data.trim()).map_err(|e| {
                CollageError::serde(format!("images[{idx}] '{}': bad image_data: {e}", img.filename))
            })?;
            let edit = TileEdit {
                target_size: Size::new(img.target_w, img.target_h),
                manual_position: pair(img.manual_x, img.manual_y),
                locked: img.locked,
                corner_radius: img.corner_radius,
                template_tag: img.template_tag,
            };
            let mut tile = Tile::new(
                SourceRef::embedded(img.filename, bytes),
                Size::new(img.orig_w, img.orig_h),
                edit,
            )
            .map_err(|e| match e {
                CollageError::Configuration { message, .. } => {
                    CollageError::config(format!("images[{idx}].target_size"), message)
                }
                other => other,
            })?;
            tile.auto_position = pair(img.x, img.y);
            tiles.push(tile);
        }
        Collage::from_parts(settings, tiles)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CollageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CollageError::serde(format!("project: {e}")))
    }

    /// Parse a project document.
    pub fn from_json(text: &str) -> CollageResult<Self> {
        serde_json::from_str(text).map_err(|e| CollageError::serde(format!("project: {e}")))
    }
}

/// Write `collage` as a self-contained project file.
pub fn save_project(collage: &Collage, path: &Path) -> CollageResult<()> {
    let json = ProjectFile::from_collage(collage)?.to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create project dir '{}'", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("write project '{}'", path.display()))?;
    tracing::info!(path = %path.display(), tiles = collage.len(), "project saved");
    Ok(())
}

/// Load a project file, replacing nothing: the caller swaps in the returned collage.
pub fn load_project(path: &Path) -> CollageResult<Collage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read project '{}'", path.display()))?;
    let collage = ProjectFile::from_json(&text)?.into_collage()?;
    tracing::info!(path = %path.display(), tiles = collage.len(), "project loaded");
    Ok(collage)
}

#[cfg(test)]
#[path = "../../tests/unit/project/file.rs"]
mod tests;
