use image::{GrayImage, Rgba, RgbaImage};

use crate::{
    assets::decode::BitmapResolver,
    foundation::{
        core::{IRect, Pos, mul_div255},
        error::CollageResult,
    },
    model::{settings::CanvasSettings, tile::Tile},
    render::{crop::fit_tile, mask::rounded_mask},
};

/// Per-call counters, mostly for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeReport {
    /// Tiles that put at least one pixel on the canvas.
    pub painted: usize,
    /// Tiles entirely outside the safe area.
    pub clipped: usize,
    /// Tiles whose bitmap could not be loaded.
    pub load_failures: usize,
    /// Tiles without any position yet.
    pub unplaced: usize,
}

/// Composite `tiles` in paint order onto a background-filled canvas.
///
/// See [`composite_with_report`].
pub fn composite<R: BitmapResolver + ?Sized>(
    tiles: &[Tile],
    settings: &CanvasSettings,
    resolver: &mut R,
) -> CollageResult<RgbaImage> {
    composite_with_report(tiles, settings, resolver).map(|(img, _)| img)
}

/// Composite `tiles` and report what happened to each one.
///
/// Settings and tile sizes are validated before any painting. Tiles are clipped
/// against the border-inset safe area only, and the clip runs before the bitmap is
/// resolved: a tile with no visible pixels is never loaded, so a missing or corrupt
/// source on such a tile produces no load warning. A tile whose bitmap fails to load
/// is skipped with a warning; it never aborts the composite.
#[tracing::instrument(skip_all, fields(tiles = tiles.len(), width = settings.width, height = settings.height))]
pub fn composite_with_report<R: BitmapResolver + ?Sized>(
    tiles: &[Tile],
    settings: &CanvasSettings,
    resolver: &mut R,
) -> CollageResult<(RgbaImage, CompositeReport)> {
    settings.validate()?;
    for (idx, tile) in tiles.iter().enumerate() {
        tile.ensure_valid(idx)?;
    }

    let mut canvas =
        RgbaImage::from_pixel(settings.width, settings.height, settings.background.to_rgba());
    let border = i64::from(settings.border);
    let safe_area = IRect::new(
        border,
        border,
        i64::from(settings.width) - border,
        i64::from(settings.height) - border,
    );
    let mut report = CompositeReport::default();

    for (idx, tile) in tiles.iter().enumerate() {
        let Some(pos) = tile.effective_position() else {
            tracing::debug!(idx, file = %tile.filename(), "tile has no position yet, skipping");
            report.unplaced += 1;
            continue;
        };
        let placement = IRect::from_origin_size(pos, tile.target_size);
        let Some(visible) = placement.intersect(safe_area) else {
            tracing::debug!(
                idx,
                file = %tile.filename(),
                %pos,
                "tile outside safe area, source not loaded"
            );
            report.clipped += 1;
            continue;
        };

        let bitmap = match resolver.resolve(tile.source()) {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(idx, file = %tile.filename(), %err, "skipping tile");
                report.load_failures += 1;
                continue;
            }
        };
        let fitted = fit_tile(&bitmap, tile.target_size).to_rgba8();
        drop(bitmap);

        let radius = if tile.corner_radius > 0 {
            tile.corner_radius
        } else {
            settings.corner_radius
        };
        let mask = (radius > 0).then(|| rounded_mask(tile.target_size, radius));

        paint_region(&mut canvas, &fitted, mask.as_ref(), pos, visible);
        report.painted += 1;
    }

    tracing::debug!(?report, "composite done");
    Ok((canvas, report))
}

/// Blend the part of `tile` that lands on canvas rect `visible`.
fn paint_region(
    canvas: &mut RgbaImage,
    tile: &RgbaImage,
    mask: Option<&GrayImage>,
    origin: Pos,
    visible: IRect,
) {
    let local = visible.translate(origin.x.saturating_neg(), origin.y.saturating_neg());
    for dy in 0..visible.height() {
        for dx in 0..visible.width() {
            let (tx, ty) = ((local.x0 + dx) as u32, (local.y0 + dy) as u32);
            let (cx, cy) = ((visible.x0 + dx) as u32, (visible.y0 + dy) as u32);
            let src = *tile.get_pixel(tx, ty);
            let coverage = mask.map_or(255, |m| m.get_pixel(tx, ty).0[0]);
            let dst = canvas.get_pixel_mut(cx, cy);
            *dst = over_straight(*dst, src, coverage);
        }
    }
}

/// Source-over for straight (non-premultiplied) RGBA8, with `src` alpha scaled by
/// `coverage`.
pub(crate) fn over_straight(dst: Rgba<u8>, src: Rgba<u8>, coverage: u8) -> Rgba<u8> {
    let sa = mul_div255(u16::from(src[3]), u16::from(coverage));
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return Rgba([src[0], src[1], src[2], 255]);
    }

    let inv = 255 - sa;
    let da = mul_div255(u16::from(dst[3]), inv);
    let out_a = u32::from(sa + da);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(da);
        out[i] = ((c + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    Rgba(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
