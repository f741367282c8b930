//! Greedy left-to-right, top-to-bottom shelf packing.

use crate::{
    foundation::{
        core::Pos,
        error::{CollageError, CollageResult},
    },
    model::tile::Tile,
};

/// A tile that would lose more than this fraction of its width past the row end
/// starts a new row instead.
pub const OVERFLOW_THRESHOLD: f64 = 0.5;

#[derive(Clone, Copy, Debug)]
struct Cursor {
    x: i64,
    y: i64,
    row_height: i64,
    border: i64,
}

impl Cursor {
    fn new(border: i64) -> Self {
        Self {
            x: border,
            y: border,
            row_height: 0,
            border,
        }
    }

    fn wrap(&mut self) {
        self.y += self.row_height + self.border;
        self.x = self.border;
        self.row_height = 0;
    }

    fn free_space(&self, canvas_width: i64) -> i64 {
        canvas_width - self.x - self.border
    }
}

/// Assign `auto_position` to every unlocked tile in sequence order.
///
/// Locked tiles are skipped and do not advance the cursor. Tiles with a manual
/// position are still laid out; the manual position only wins at render time.
/// Invalid geometry is rejected before any tile is touched.
pub fn layout_tiles(tiles: &mut [Tile], canvas_width: u32, border: u32) -> CollageResult<()> {
    if canvas_width == 0 {
        return Err(CollageError::config("width", "must be > 0, got 0"));
    }
    if u64::from(border) * 2 >= u64::from(canvas_width) {
        return Err(CollageError::config(
            "border",
            format!("2 * border must be < width, got border {border} for width {canvas_width}"),
        ));
    }
    for (idx, tile) in tiles.iter().enumerate() {
        tile.ensure_valid(idx)?;
    }

    let canvas_width = i64::from(canvas_width);
    let mut cursor = Cursor::new(i64::from(border));
    let mut rows = 1usize;

    for tile in tiles.iter_mut() {
        if tile.locked {
            continue;
        }
        let target_w = i64::from(tile.target_size.width);
        let target_h = i64::from(tile.target_size.height);

        let mut free = cursor.free_space(canvas_width);
        if free <= 0 {
            cursor.wrap();
            rows += 1;
            free = cursor.free_space(canvas_width);
        }
        if target_w > free {
            let overflow_ratio = (target_w - free) as f64 / target_w as f64;
            if overflow_ratio > OVERFLOW_THRESHOLD {
                cursor.wrap();
                rows += 1;
            }
        }

        tile.auto_position = Some(Pos::new(cursor.x, cursor.y));
        cursor.row_height = cursor.row_height.max(target_h);
        cursor.x += target_w + cursor.border;
    }

    tracing::debug!(tiles = tiles.len(), rows, "shelf layout complete");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/shelf.rs"]
mod tests;
