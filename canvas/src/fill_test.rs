use super::*;

const WHITE: Pixel = Pixel::opaque(255, 255, 255);
const BLACK: Pixel = Pixel::opaque(0, 0, 0);
const RED: Pixel = Pixel::opaque(255, 0, 0);
const BLUE: Pixel = Pixel::opaque(0, 0, 255);

fn count(surface: &RasterSurface, pixel: Pixel) -> usize {
    let rgba = [pixel.r, pixel.g, pixel.b, pixel.a];
    surface.as_rgba().chunks_exact(4).filter(|p| *p == rgba).count()
}

/// A `size x size` white surface with a 1px black border ring.
fn bordered(size: u32) -> RasterSurface {
    let mut s = RasterSurface::new(size, size, WHITE);
    for i in 0..size {
        s.set_pixel(i, 0, BLACK).expect("in bounds");
        s.set_pixel(i, size - 1, BLACK).expect("in bounds");
        s.set_pixel(0, i, BLACK).expect("in bounds");
        s.set_pixel(size - 1, i, BLACK).expect("in bounds");
    }
    s
}

#[test]
fn fill_uniform_surface_recolors_every_pixel() {
    let mut s = RasterSurface::new(10, 10, WHITE);
    let outcome = flood_fill(&mut s, 5, 5, BLACK).expect("seed in bounds");
    assert_eq!(outcome, FillOutcome::Filled { pixels: 100 });
    assert_eq!(count(&s, BLACK), 100);
}

#[test]
fn fill_with_target_color_is_a_no_op() {
    let mut s = RasterSurface::new(6, 6, WHITE);
    s.set_pixel(2, 2, RED).expect("in bounds");
    let before = s.clone();

    assert_eq!(flood_fill(&mut s, 0, 0, WHITE), Ok(FillOutcome::Unchanged));
    assert_eq!(flood_fill(&mut s, 2, 2, RED), Ok(FillOutcome::Unchanged));
    assert_eq!(s, before);
}

#[test]
fn fill_inside_border_changes_only_interior() {
    let mut s = bordered(8);
    let outcome = flood_fill(&mut s, 3, 4, RED).expect("seed in bounds");

    assert_eq!(outcome, FillOutcome::Filled { pixels: 36 });
    assert_eq!(count(&s, RED), 36);
    assert_eq!(count(&s, BLACK), 28);
    assert_eq!(count(&s, WHITE), 0);
}

#[test]
fn fill_border_seed_recolors_only_border() {
    let mut s = bordered(5);
    flood_fill(&mut s, 0, 0, BLUE).expect("seed in bounds");
    assert_eq!(count(&s, BLUE), 16);
    assert_eq!(count(&s, WHITE), 9);
}

#[test]
fn fill_does_not_leak_through_diagonal_gaps() {
    // Two white cells touching only at a corner stay separate.
    let mut s = RasterSurface::new(2, 2, BLACK);
    s.set_pixel(0, 0, WHITE).expect("in bounds");
    s.set_pixel(1, 1, WHITE).expect("in bounds");

    assert_eq!(flood_fill(&mut s, 0, 0, RED), Ok(FillOutcome::Filled { pixels: 1 }));
    assert_eq!(s.get_pixel(1, 1), Ok(WHITE));
}

#[test]
fn fill_stops_at_any_different_color() {
    let mut s = RasterSurface::new(5, 1, WHITE);
    s.set_pixel(2, 0, Pixel::opaque(254, 255, 255)).expect("in bounds");
    flood_fill(&mut s, 0, 0, RED).expect("seed in bounds");
    assert_eq!(s.get_pixel(1, 0), Ok(RED));
    assert_eq!(s.get_pixel(3, 0), Ok(WHITE));
}

#[test]
fn fill_out_of_bounds_seed_fails() {
    let mut s = RasterSurface::new(3, 3, WHITE);
    assert!(matches!(flood_fill(&mut s, 3, 0, RED), Err(SurfaceError::OutOfBounds { .. })));
}

#[test]
fn fill_large_region_does_not_overflow_the_call_stack() {
    let mut s = RasterSurface::new(512, 512, WHITE);
    let outcome = flood_fill(&mut s, 0, 0, BLACK).expect("seed in bounds");
    assert_eq!(outcome, FillOutcome::Filled { pixels: 512 * 512 });
}

#[test]
fn fill_is_deterministic_across_replicas() {
    let mut a = bordered(16);
    let mut b = bordered(16);
    a.set_pixel(7, 7, BLACK).expect("in bounds");
    b.set_pixel(7, 7, BLACK).expect("in bounds");

    flood_fill(&mut a, 1, 1, RED).expect("seed in bounds");
    flood_fill(&mut b, 14, 14, RED).expect("seed in bounds");
    assert_eq!(a, b);
}
