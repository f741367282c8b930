use std::path::PathBuf;

use super::*;
use crate::{Size, SourceRef, TileEdit};

fn tile(w: u32, h: u32) -> Tile {
    Tile::new(
        SourceRef::Path(PathBuf::from("t.png")),
        Size::new(w * 2, h * 2),
        TileEdit::sized(w, h),
    )
    .unwrap()
}

fn positions(tiles: &[Tile]) -> Vec<Option<Pos>> {
    tiles.iter().map(|t| t.auto_position).collect()
}

#[test]
fn wide_overflow_wraps_before_placing() {
    // After the first tile the cursor sits at x=70: free space 20, overflow 30/50 = 0.6.
    let mut tiles = vec![tile(50, 20), tile(50, 20), tile(50, 20)];
    layout_tiles(&mut tiles, 100, 10).unwrap();
    assert_eq!(
        positions(&tiles),
        vec![
            Some(Pos::new(10, 10)),
            Some(Pos::new(10, 40)),
            Some(Pos::new(10, 70)),
        ]
    );
}

#[test]
fn small_overflow_stays_on_the_row() {
    // Second tile: free 30, overflow 10/40 = 0.25, placed past the border.
    // Third tile: free space is negative, so the row wraps.
    let mut tiles = vec![tile(40, 20), tile(40, 20), tile(40, 20)];
    layout_tiles(&mut tiles, 100, 10).unwrap();
    assert_eq!(
        positions(&tiles),
        vec![
            Some(Pos::new(10, 10)),
            Some(Pos::new(60, 10)),
            Some(Pos::new(10, 40)),
        ]
    );
}

#[test]
fn overflow_of_exactly_half_stays() {
    // free 30 at x=60, width 60: overflow 30/60 = 0.5 is not > 0.5.
    let mut tiles = vec![tile(40, 10), tile(60, 10)];
    layout_tiles(&mut tiles, 100, 10).unwrap();
    assert_eq!(tiles[1].auto_position, Some(Pos::new(60, 10)));
}

#[test]
fn row_height_is_tallest_tile() {
    let mut tiles = vec![tile(30, 50), tile(30, 10), tile(60, 10)];
    layout_tiles(&mut tiles, 100, 5).unwrap();
    assert_eq!(tiles[0].auto_position, Some(Pos::new(5, 5)));
    assert_eq!(tiles[1].auto_position, Some(Pos::new(40, 5)));
    // x=75, free=20, overflow 40/60 > 0.5 -> new row below the 50px tile.
    assert_eq!(tiles[2].auto_position, Some(Pos::new(5, 60)));
}

#[test]
fn layout_is_deterministic() {
    let mut a = vec![tile(33, 21), tile(70, 12), tile(15, 90), tile(44, 44)];
    let mut b = a.clone();
    layout_tiles(&mut a, 150, 7).unwrap();
    layout_tiles(&mut b, 150, 7).unwrap();
    assert_eq!(positions(&a), positions(&b));
    layout_tiles(&mut a, 150, 7).unwrap();
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn positions_never_start_before_border() {
    let mut tiles: Vec<Tile> = (1..12).map(|i| tile(i * 9, i * 3)).collect();
    layout_tiles(&mut tiles, 120, 6).unwrap();
    for t in &tiles {
        let p = t.auto_position.unwrap();
        assert!(p.x >= 6);
        assert!(p.y >= 6);
    }
}

#[test]
fn locked_tiles_are_frozen_and_skipped() {
    let mut tiles = vec![tile(40, 20), tile(40, 20), tile(40, 20)];
    tiles[0].locked = true;
    tiles[0].auto_position = Some(Pos::new(500, 500));
    tiles[1].locked = true;
    tiles[1].manual_position = Some(Pos::new(-3, 7));

    for _ in 0..3 {
        layout_tiles(&mut tiles, 100, 10).unwrap();
        assert_eq!(tiles[0].auto_position, Some(Pos::new(500, 500)));
        assert_eq!(tiles[1].auto_position, None);
        assert_eq!(tiles[1].manual_position, Some(Pos::new(-3, 7)));
        // The only unlocked tile starts the first row.
        assert_eq!(tiles[2].auto_position, Some(Pos::new(10, 10)));
        tiles[2].target_size = Size::new(30 + tiles[2].target_size.width, 20);
    }
}

#[test]
fn manual_position_does_not_exclude_from_layout() {
    let mut tiles = vec![tile(40, 20), tile(40, 20)];
    tiles[0].manual_position = Some(Pos::new(0, 0));
    layout_tiles(&mut tiles, 100, 10).unwrap();
    assert_eq!(tiles[0].auto_position, Some(Pos::new(10, 10)));
    assert_eq!(tiles[1].auto_position, Some(Pos::new(60, 10)));
    assert_eq!(tiles[0].effective_position(), Some(Pos::new(0, 0)));
}

#[test]
fn invalid_geometry_mutates_nothing() {
    let mut tiles = vec![tile(40, 20)];
    assert!(layout_tiles(&mut tiles, 100, 50).is_err());
    assert!(layout_tiles(&mut tiles, 0, 0).is_err());
    assert_eq!(tiles[0].auto_position, None);

    tiles.push(tile(10, 10));
    tiles[1].target_size = Size::new(0, 10);
    let err = layout_tiles(&mut tiles, 100, 10).unwrap_err();
    assert!(err.to_string().contains("tiles[1].target_size"));
    assert_eq!(tiles[0].auto_position, None);
}
