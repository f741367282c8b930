use image::{GrayImage, Luma};
use kurbo::{Point, RoundedRect, Shape};

use crate::foundation::core::Size;

const SUBSAMPLES: u32 = 4;

/// Single-channel rounded-rectangle mask covering `size`.
///
/// Opaque inside the rounded rectangle, transparent outside. Edge pixels get
/// fractional coverage from a 4x4 subsample grid. The radius is clamped to half the
/// shorter side.
pub fn rounded_mask(size: Size, corner_radius: u32) -> GrayImage {
    let (w, h) = (size.width, size.height);
    let radius = corner_radius.min(w / 2).min(h / 2);
    let mut mask = GrayImage::from_pixel(w, h, Luma([255]));
    if radius == 0 {
        return mask;
    }

    let shape = RoundedRect::new(0.0, 0.0, f64::from(w), f64::from(h), f64::from(radius));
    let step = 1.0 / f64::from(SUBSAMPLES);
    let full = SUBSAMPLES * SUBSAMPLES;

    for y in 0..h {
        let in_corner_rows = y < radius || y >= h - radius;
        if !in_corner_rows {
            continue;
        }
        for x in 0..w {
            if x >= radius && x < w - radius {
                continue;
            }
            let mut covered = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let pt = Point::new(
                        f64::from(x) + (f64::from(sx) + 0.5) * step,
                        f64::from(y) + (f64::from(sy) + 0.5) * step,
                    );
                    if shape.contains(pt) {
                        covered += 1;
                    }
                }
            }
            let alpha = (covered * 255 + full / 2) / full;
            mask.put_pixel(x, y, Luma([alpha as u8]));
        }
    }
    mask
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
