use super::*;

fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
    }))
}

fn assert_aspect_close(img: &DynamicImage, target: Size) {
    // Integer rounding may cost at most one pixel on the cropped axis.
    let w = f64::from(img.width());
    let h = f64::from(img.height());
    let want = target.aspect();
    let err_w = (w - h * want).abs();
    let err_h = (h - w / want).abs();
    assert!(
        err_w <= 1.0 || err_h <= 1.0,
        "{}x{} vs target {target}",
        img.width(),
        img.height()
    );
}

#[test]
fn wider_target_crops_rows_centered() {
    let img = gradient(400, 400);
    let out = crop_to_aspect(&img, Size::new(200, 100));
    assert_eq!((out.width(), out.height()), (400, 200));
    // Top row of the crop is source row 100.
    assert_eq!(out.to_rgba8().get_pixel(0, 0).0[1], 100);
}

#[test]
fn taller_target_crops_columns_centered() {
    let img = gradient(300, 100);
    let out = crop_to_aspect(&img, Size::new(50, 50));
    assert_eq!((out.width(), out.height()), (100, 100));
    assert_eq!(out.to_rgba8().get_pixel(0, 0).0[0], 100);
}

#[test]
fn matching_aspect_is_untouched() {
    let img = gradient(120, 80);
    let out = crop_to_aspect(&img, Size::new(60, 40));
    assert_eq!((out.width(), out.height()), (120, 80));
}

#[test]
fn aspect_within_one_pixel_across_shapes() {
    let img = gradient(997, 613);
    for target in [
        Size::new(1, 1),
        Size::new(16, 9),
        Size::new(9, 16),
        Size::new(333, 7),
        Size::new(7, 333),
        Size::new(1000, 999),
    ] {
        let out = crop_to_aspect(&img, target);
        assert!(out.width() >= 1 && out.height() >= 1);
        assert!(out.width() <= 997 && out.height() <= 613);
        assert!(out.width() == 997 || out.height() == 613, "crop is maximal");
        assert_aspect_close(&out, target);
    }
}

#[test]
fn fit_tile_produces_exact_target_size() {
    let img = gradient(400, 300);
    let out = fit_tile(&img, Size::new(64, 100));
    assert_eq!((out.width(), out.height()), (64, 100));
}
