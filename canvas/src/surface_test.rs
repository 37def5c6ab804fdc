use super::*;

const WHITE: Pixel = Pixel::opaque(255, 255, 255);
const RED: Pixel = Pixel::opaque(255, 0, 0);

// =============================================================
// Pixel access
// =============================================================

#[test]
fn new_surface_is_filled_with_background() {
    let s = RasterSurface::new(3, 2, WHITE);
    assert_eq!(s.width(), 3);
    assert_eq!(s.height(), 2);
    assert_eq!(s.as_rgba().len(), 3 * 2 * 4);
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(s.get_pixel(x, y), Ok(WHITE));
        }
    }
}

#[test]
fn set_then_get_returns_written_pixel() {
    let mut s = RasterSurface::new(4, 4, WHITE);
    s.set_pixel(2, 3, RED).expect("in bounds");
    assert_eq!(s.get_pixel(2, 3), Ok(RED));
    assert_eq!(s.get_pixel(3, 2), Ok(WHITE));
}

#[test]
fn set_pixel_forces_opaque_alpha() {
    let mut s = RasterSurface::new(2, 2, WHITE);
    s.set_pixel(0, 0, Pixel { r: 1, g: 2, b: 3, a: 0 }).expect("in bounds");
    assert_eq!(s.get_pixel(0, 0), Ok(Pixel::opaque(1, 2, 3)));
}

#[test]
fn get_pixel_out_of_bounds_fails() {
    let s = RasterSurface::new(4, 3, WHITE);
    assert_eq!(
        s.get_pixel(4, 0),
        Err(SurfaceError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 })
    );
    assert!(s.get_pixel(0, 3).is_err());
}

#[test]
fn set_pixel_out_of_bounds_fails_without_writing() {
    let mut s = RasterSurface::new(2, 2, WHITE);
    let before = s.clone();
    assert!(s.set_pixel(2, 2, RED).is_err());
    assert_eq!(s, before);
}

#[test]
fn address_rejects_negative_and_overflowing_coordinates() {
    let s = RasterSurface::new(10, 5, WHITE);
    assert_eq!(s.address(0, 0), Some((0, 0)));
    assert_eq!(s.address(9, 4), Some((9, 4)));
    assert_eq!(s.address(-1, 0), None);
    assert_eq!(s.address(0, 5), None);
    assert_eq!(s.address(i64::MAX, 0), None);
}

#[test]
fn pixel_from_color_is_opaque() {
    assert_eq!(Pixel::from(frames::Color::rgb(9, 8, 7)), Pixel::opaque(9, 8, 7));
}

// =============================================================
// Snapshot / restore
// =============================================================

#[test]
fn snapshot_then_restore_leaves_pixels_unchanged() {
    let mut s = RasterSurface::new(5, 5, WHITE);
    s.set_pixel(1, 1, RED).expect("in bounds");
    let before = s.clone();
    let snap = s.snapshot();
    s.restore(&snap, WHITE);
    assert_eq!(s, before);
}

#[test]
fn snapshot_is_independent_of_later_writes() {
    let mut s = RasterSurface::new(3, 3, WHITE);
    let snap = s.snapshot();
    s.set_pixel(0, 0, RED).expect("in bounds");
    s.restore(&snap, WHITE);
    assert_eq!(s.get_pixel(0, 0), Ok(WHITE));
}

#[test]
fn restore_smaller_snapshot_pads_with_background() {
    let mut small = RasterSurface::new(2, 2, RED);
    small.set_pixel(1, 1, Pixel::opaque(0, 0, 255)).expect("in bounds");
    let snap = small.snapshot();

    let mut big = RasterSurface::new(4, 3, Pixel::opaque(0, 255, 0));
    big.restore(&snap, WHITE);

    assert_eq!(big.get_pixel(0, 0), Ok(RED));
    assert_eq!(big.get_pixel(1, 1), Ok(Pixel::opaque(0, 0, 255)));
    assert_eq!(big.get_pixel(2, 0), Ok(WHITE));
    assert_eq!(big.get_pixel(0, 2), Ok(WHITE));
    assert_eq!(big.get_pixel(3, 2), Ok(WHITE));
}

#[test]
fn restore_larger_snapshot_crops_at_origin() {
    let mut big = RasterSurface::new(4, 4, WHITE);
    big.set_pixel(0, 1, RED).expect("in bounds");
    big.set_pixel(3, 3, RED).expect("in bounds");
    let snap = big.snapshot();

    let mut small = RasterSurface::new(2, 2, WHITE);
    small.restore(&snap, WHITE);
    assert_eq!(small.get_pixel(0, 1), Ok(RED));
    assert_eq!(small.get_pixel(1, 1), Ok(WHITE));
}

#[test]
fn resize_discards_content() {
    let mut s = RasterSurface::new(2, 2, RED);
    s.resize(3, 1, WHITE);
    assert_eq!((s.width(), s.height()), (3, 1));
    assert_eq!(s.get_pixel(2, 0), Ok(WHITE));
    assert_eq!(s.get_pixel(0, 0), Ok(WHITE));
}

#[test]
fn clear_paints_everything() {
    let mut s = RasterSurface::new(3, 3, WHITE);
    s.clear(RED);
    assert!(s.as_rgba().chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
}
