use std::path::PathBuf;

use image::RgbaImage;

use crate::{
    assets::decode::{BitmapResolver, probe_size},
    foundation::{
        core::{Pos, Size},
        error::{CollageError, CollageResult},
    },
    layout::shelf::layout_tiles,
    model::{
        settings::{CanvasSettings, CanvasSettingsInput},
        tile::{SourceRef, Tile, TileEdit},
    },
    render::composite::{CompositeReport, composite_with_report},
    templates::store::Template,
};

/// One editing session: the ordered tile list plus canvas settings.
///
/// Every mutating operation validates first, mutates, then re-runs the layout, so
/// positions are always current. Tile order is paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collage {
    settings: CanvasSettings,
    tiles: Vec<Tile>,
}

impl Collage {
    /// Empty collage with validated settings.
    pub fn new(settings: CanvasSettings) -> CollageResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            tiles: Vec::new(),
        })
    }

    /// Rebuild a session from parts, e.g. after loading a project.
    ///
    /// Positions are kept as given; no layout pass runs.
    pub fn from_parts(settings: CanvasSettings, tiles: Vec<Tile>) -> CollageResult<Self> {
        settings.validate()?;
        for (idx, tile) in tiles.iter().enumerate() {
            tile.ensure_valid(idx)?;
        }
        Ok(Self { settings, tiles })
    }

    /// Current canvas settings.
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Tiles in paint order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at `index`, or a configuration error naming the index.
    pub fn tile(&self, index: usize) -> CollageResult<&Tile> {
        self.tiles.get(index).ok_or_else(|| bad_index(index, self.tiles.len()))
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when there are no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Re-run the shelf layout over all unlocked tiles.
    #[tracing::instrument(skip(self), fields(tiles = self.tiles.len()))]
    pub fn recalc_layout(&mut self) -> CollageResult<()> {
        layout_tiles(&mut self.tiles, self.settings.width, self.settings.border)
    }

    /// Append a tile whose source size is already known.
    pub fn add_tile(
        &mut self,
        source: SourceRef,
        original_size: Size,
        edit: TileEdit,
    ) -> CollageResult<usize> {
        let tile = Tile::new(source, original_size, edit)?;
        self.tiles.push(tile);
        self.recalc_layout()?;
        Ok(self.tiles.len() - 1)
    }

    /// Append an image file, measuring its size first.
    pub fn add_image(&mut self, path: impl Into<PathBuf>, edit: TileEdit) -> CollageResult<usize> {
        let source = SourceRef::Path(path.into());
        let original_size = probe_size(&source)?;
        tracing::debug!(file = %source.filename(), %original_size, "adding image");
        self.add_tile(source, original_size, edit)
    }

    /// Replace a tile's editable fields.
    pub fn edit_tile(&mut self, index: usize, edit: TileEdit) -> CollageResult<()> {
        edit.validate()?;
        self.tile_mut(index)?.apply_edit(edit);
        self.recalc_layout()
    }

    /// Remove and return a tile.
    pub fn remove_tile(&mut self, index: usize) -> CollageResult<Tile> {
        self.tile(index)?;
        let removed = self.tiles.remove(index);
        self.recalc_layout()?;
        Ok(removed)
    }

    /// Move a tile to another paint-order slot.
    pub fn move_tile(&mut self, from: usize, to: usize) -> CollageResult<()> {
        self.tile(from)?;
        self.tile(to)?;
        let tile = self.tiles.remove(from);
        self.tiles.insert(to, tile);
        self.recalc_layout()
    }

    /// Set or clear a manual position. Locking is a separate decision.
    pub fn set_manual_position(&mut self, index: usize, pos: Option<Pos>) -> CollageResult<()> {
        self.tile_mut(index)?.manual_position = pos;
        self.recalc_layout()
    }

    /// Flip the lock flag and return the new state.
    pub fn toggle_lock(&mut self, index: usize) -> CollageResult<bool> {
        let tile = self.tile_mut(index)?;
        tile.locked = !tile.locked;
        let locked = tile.locked;
        self.recalc_layout()?;
        Ok(locked)
    }

    /// Replace the canvas settings from editor input.
    ///
    /// Nothing changes when the input does not parse.
    pub fn set_settings(&mut self, input: &CanvasSettingsInput) -> CollageResult<()> {
        let settings = CanvasSettings::try_from(input)?;
        self.replace_settings(settings)
    }

    /// Swap in already parsed settings.
    pub fn replace_settings(&mut self, settings: CanvasSettings) -> CollageResult<()> {
        settings.validate()?;
        self.settings = settings;
        self.recalc_layout()
    }

    /// Multiply the canvas size by `factor`; a negative factor `-n` means `1/n`.
    pub fn scale_canvas(&mut self, factor: f64) -> CollageResult<()> {
        if factor == 0.0 || !factor.is_finite() {
            return Err(CollageError::config(
                "scale",
                format!("must be a non-zero number, got {factor}"),
            ));
        }
        let effective = if factor < 0.0 { 1.0 / factor.abs() } else { factor };
        let scale_dim = |v: u32| (f64::from(v) * effective).floor();
        let (w, h) = (scale_dim(self.settings.width), scale_dim(self.settings.height));
        if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(CollageError::config(
                "scale",
                format!(
                    "factor {factor} turns {}x{} into an unusable canvas",
                    self.settings.width, self.settings.height
                ),
            ));
        }
        let next = CanvasSettings {
            width: w as u32,
            height: h as u32,
            scale: factor,
            ..self.settings
        };
        tracing::debug!(factor, width = next.width, height = next.height, "scaling canvas");
        self.replace_settings(next)
    }

    /// Apply a template's size and radius to one tile and tag it.
    pub fn apply_template(
        &mut self,
        index: usize,
        name: &str,
        template: &Template,
    ) -> CollageResult<()> {
        template.validate(name)?;
        let tile = self.tile_mut(index)?;
        tile.target_size = template.size();
        tile.corner_radius = template.corner_radius;
        tile.template_tag = Some(name.to_owned());
        self.recalc_layout()
    }

    /// Push a changed template to every tile tagged with `name`.
    pub fn sync_template(&mut self, name: &str, template: &Template) -> CollageResult<usize> {
        template.validate(name)?;
        let mut updated = 0usize;
        for tile in &mut self.tiles {
            if tile.template_tag.as_deref() == Some(name) {
                tile.target_size = template.size();
                tile.corner_radius = template.corner_radius;
                updated += 1;
            }
        }
        if updated > 0 {
            self.recalc_layout()?;
        }
        tracing::debug!(template = name, updated, "template synced");
        Ok(updated)
    }

    /// Lay out and composite the whole collage.
    pub fn build_collage<R: BitmapResolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> CollageResult<RgbaImage> {
        self.build_collage_with_report(resolver).map(|(img, _)| img)
    }

    /// Like [`Collage::build_collage`], also returning the [`CompositeReport`].
    pub fn build_collage_with_report<R: BitmapResolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> CollageResult<(RgbaImage, CompositeReport)> {
        self.recalc_layout()?;
        composite_with_report(&self.tiles, &self.settings, resolver)
    }

    fn tile_mut(&mut self, index: usize) -> CollageResult<&mut Tile> {
        let len = self.tiles.len();
        self.tiles.get_mut(index).ok_or_else(|| bad_index(index, len))
    }
}

fn bad_index(index: usize, len: usize) -> CollageError {
    CollageError::config(
        "tile_index",
        format!("index {index} out of range for {len} tiles"),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/model/collage.rs"]
mod tests;
