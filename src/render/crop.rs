use image::{DynamicImage, imageops::FilterType};

use crate::foundation::core::Size;

/// Largest centered region of `img` whose aspect ratio matches `target`.
///
/// A relatively wider target trims rows top and bottom; otherwise columns are
/// trimmed left and right. Never crops more than needed and never returns an
/// empty image.
pub fn crop_to_aspect(img: &DynamicImage, target: Size) -> DynamicImage {
    let (src_w, src_h) = (img.width(), img.height());
    if src_w == 0 || src_h == 0 || target.width == 0 || target.height == 0 {
        return img.clone();
    }
    let target_aspect = target.aspect();
    let src_aspect = f64::from(src_w) / f64::from(src_h);

    if target_aspect > src_aspect {
        let new_h = ((f64::from(src_w) / target_aspect) as u32).clamp(1, src_h);
        let top = (src_h - new_h) / 2;
        img.crop_imm(0, top, src_w, new_h)
    } else {
        let new_w = ((f64::from(src_h) * target_aspect) as u32).clamp(1, src_w);
        let left = (src_w - new_w) / 2;
        img.crop_imm(left, 0, new_w, src_h)
    }
}

/// Center-crop to the target aspect, then resample to exactly `target` with Lanczos3.
pub fn fit_tile(img: &DynamicImage, target: Size) -> DynamicImage {
    let cropped = crop_to_aspect(img, target);
    if cropped.width() == target.width && cropped.height() == target.height {
        return cropped;
    }
    cropped.resize_exact(target.width, target.height, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/render/crop.rs"]
mod tests;
