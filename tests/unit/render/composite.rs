use std::path::PathBuf;

use image::DynamicImage;

use super::*;
use crate::{BitmapLoadError, Rgb8, Size, SourceRef, TileEdit};

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255])))
}

/// Resolves `red*`/`green*` names to solid bitmaps and fails for anything else.
fn palette(source: &SourceRef) -> Result<DynamicImage, BitmapLoadError> {
    let name = source.filename();
    if name.starts_with("red") {
        Ok(solid(400, 400, [255, 0, 0]))
    } else if name.starts_with("green") {
        Ok(solid(64, 32, [0, 255, 0]))
    } else {
        Err(BitmapLoadError::NotFound {
            path: PathBuf::from(name),
        })
    }
}

fn tile_at(name: &str, w: u32, h: u32, pos: Pos) -> Tile {
    let mut t = Tile::new(
        SourceRef::Path(PathBuf::from(name)),
        Size::new(400, 400),
        TileEdit::sized(w, h),
    )
    .unwrap();
    t.auto_position = Some(pos);
    t
}

fn settings(w: u32, h: u32, border: u32) -> CanvasSettings {
    CanvasSettings {
        width: w,
        height: h,
        border,
        background: Rgb8::BLACK,
        corner_radius: 0,
        scale: 1.0,
    }
}

#[test]
fn single_full_canvas_tile_is_solid_red() {
    let tiles = vec![tile_at("red.png", 200, 200, Pos::new(0, 0))];
    let mut resolver = palette;
    let out = composite(&tiles, &settings(200, 200, 0), &mut resolver).unwrap();
    assert_eq!(out.dimensions(), (200, 200));
    assert!(out.pixels().all(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn empty_collage_is_background() {
    let mut s = settings(30, 20, 2);
    s.background = Rgb8::new(1, 2, 3);
    let out = composite(&[], &s, &mut palette).unwrap();
    assert_eq!(out.dimensions(), (30, 20));
    assert!(out.pixels().all(|p| p.0 == [1, 2, 3, 255]));
}

#[test]
fn tile_outside_safe_area_paints_nothing() {
    let tiles = vec![tile_at("red.png", 50, 50, Pos::new(-1000, -1000))];
    let (out, report) = composite_with_report(&tiles, &settings(100, 100, 10), &mut palette).unwrap();
    assert_eq!(report.clipped, 1);
    assert_eq!(report.painted, 0);
    assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn tiles_are_clipped_to_the_safe_area() {
    // Tile covers the whole canvas but only the inset region may change.
    let tiles = vec![tile_at("red.png", 100, 100, Pos::new(0, 0))];
    let out = composite(&tiles, &settings(100, 100, 10), &mut palette).unwrap();
    assert_eq!(out.get_pixel(5, 50).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(95, 50).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(50, 9).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(10, 10).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(89, 89).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(90, 89).0, [0, 0, 0, 255]);
}

#[test]
fn tile_past_canvas_edge_is_partially_painted() {
    let tiles = vec![tile_at("red.png", 40, 40, Pos::new(80, 80))];
    let (out, report) = composite_with_report(&tiles, &settings(100, 100, 0), &mut palette).unwrap();
    assert_eq!(report.painted, 1);
    assert_eq!(out.get_pixel(99, 99).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(79, 79).0, [0, 0, 0, 255]);
}

#[test]
fn rounded_corners_keep_background() {
    let mut t = tile_at("red.png", 40, 40, Pos::new(10, 10));
    t.corner_radius = 20;
    let out = composite(&[t], &settings(60, 60, 0), &mut palette).unwrap();
    for (x, y) in [(10, 10), (49, 10), (10, 49), (49, 49)] {
        assert_eq!(out.get_pixel(x, y).0, [0, 0, 0, 255], "corner ({x},{y})");
    }
    assert_eq!(out.get_pixel(30, 30).0, [255, 0, 0, 255]);
}

#[test]
fn legacy_global_radius_applies_when_tile_radius_is_zero() {
    let t = tile_at("red.png", 40, 40, Pos::new(0, 0));
    let mut s = settings(40, 40, 0);
    s.corner_radius = 20;
    let out = composite(&[t], &s, &mut palette).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(20, 20).0, [255, 0, 0, 255]);
}

#[test]
fn unloadable_tile_is_skipped_not_fatal() {
    let tiles = vec![
        tile_at("missing.png", 10, 10, Pos::new(0, 0)),
        tile_at("green.png", 10, 10, Pos::new(10, 0)),
    ];
    let (out, report) = composite_with_report(&tiles, &settings(20, 10, 0), &mut palette).unwrap();
    assert_eq!(report.load_failures, 1);
    assert_eq!(report.painted, 1);
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(15, 5).0, [0, 255, 0, 255]);
}

#[test]
fn later_tiles_paint_over_earlier_ones() {
    let tiles = vec![
        tile_at("red.png", 20, 20, Pos::new(0, 0)),
        tile_at("green.png", 10, 10, Pos::new(5, 5)),
    ];
    let out = composite(&tiles, &settings(20, 20, 0), &mut palette).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(10, 10).0, [0, 255, 0, 255]);
}

#[test]
fn manual_position_wins_over_auto() {
    let mut t = tile_at("red.png", 10, 10, Pos::new(0, 0));
    t.manual_position = Some(Pos::new(10, 10));
    let out = composite(&[t], &settings(20, 20, 0), &mut palette).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(15, 15).0, [255, 0, 0, 255]);
}

#[test]
fn unplaced_tiles_are_counted() {
    let mut t = tile_at("red.png", 10, 10, Pos::new(0, 0));
    t.auto_position = None;
    let (_, report) = composite_with_report(&[t], &settings(20, 20, 0), &mut palette).unwrap();
    assert_eq!(report.unplaced, 1);
}

#[test]
fn invalid_settings_abort_before_painting() {
    let mut calls = 0usize;
    let mut counting = |source: &SourceRef| {
        calls += 1;
        palette(source)
    };
    let tiles = vec![tile_at("red.png", 10, 10, Pos::new(0, 0))];
    assert!(composite(&tiles, &settings(20, 20, 10), &mut counting).is_err());
    assert!(composite(&tiles, &settings(0, 20, 0), &mut counting).is_err());
    assert_eq!(calls, 0);
}

#[test]
fn over_straight_blends_half_alpha() {
    let dst = Rgba([0, 0, 0, 255]);
    let src = Rgba([255, 255, 255, 255]);
    let out = over_straight(dst, src, 128);
    assert_eq!(out.0[3], 255);
    assert!((126..=130).contains(&out.0[0]));
    assert_eq!(over_straight(dst, src, 0), dst);
    assert_eq!(over_straight(dst, Rgba([9, 9, 9, 0]), 255), dst);
}

#[test]
fn extreme_manual_positions_are_clipped_without_overflow() {
    let mut tiles = Vec::new();
    for pos in [
        Pos::new(i64::MAX, 0),
        Pos::new(0, i64::MAX),
        Pos::new(i64::MIN, i64::MIN),
        Pos::new(i64::MAX - 5, i64::MAX - 5),
    ] {
        let mut t = tile_at("red.png", 30, 30, Pos::new(0, 0));
        t.manual_position = Some(pos);
        tiles.push(t);
    }
    let (out, report) = composite_with_report(&tiles, &settings(40, 40, 0), &mut palette).unwrap();
    assert_eq!(report.clipped, 4);
    assert_eq!(report.painted, 0);
    assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn clipped_tiles_never_reach_the_resolver() {
    let mut calls = 0usize;
    let mut counting = |source: &SourceRef| {
        calls += 1;
        palette(source)
    };
    let tiles = vec![tile_at("missing.png", 10, 10, Pos::new(500, 500))];
    let (_, report) = composite_with_report(&tiles, &settings(40, 40, 0), &mut counting).unwrap();
    assert_eq!(report.clipped, 1);
    assert_eq!(report.load_failures, 0);
    assert_eq!(calls, 0);
}
