#![allow(clippy::float_cmp)]

use frames::Color;

use super::*;
use crate::input::Mode;

const WHITE: Pixel = Pixel::opaque(255, 255, 255);
const BLACK: Pixel = Pixel::opaque(0, 0, 0);

fn painted(surface: &RasterSurface) -> usize {
    surface.as_rgba().chunks_exact(4).filter(|p| *p != [255, 255, 255, 255]).count()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Rasterizer
// =============================================================

#[test]
fn zero_length_segment_paints_a_dot() {
    let mut s = RasterSurface::new(10, 10, WHITE);
    draw_segment(&mut s, pt(5.0, 5.0), pt(5.0, 5.0), BLACK, 1.0);
    assert_eq!(painted(&s), 1);
    assert_eq!(s.get_pixel(5, 5), Ok(BLACK));
}

#[test]
fn round_cap_dot_has_expected_radius() {
    let mut s = RasterSurface::new(20, 20, WHITE);
    draw_segment(&mut s, pt(10.0, 10.0), pt(10.0, 10.0), BLACK, 4.0);
    // Integer lattice points within distance 2 of the center.
    assert_eq!(painted(&s), 13);
    assert_eq!(s.get_pixel(12, 10), Ok(BLACK));
    assert_eq!(s.get_pixel(12, 12), Ok(WHITE));
}

#[test]
fn horizontal_segment_covers_both_endpoints() {
    let mut s = RasterSurface::new(10, 3, WHITE);
    draw_segment(&mut s, pt(1.0, 1.0), pt(8.0, 1.0), BLACK, 1.0);
    for x in 1..=8 {
        assert_eq!(s.get_pixel(x, 1), Ok(BLACK), "x={x}");
    }
    assert_eq!(s.get_pixel(0, 1), Ok(WHITE));
    assert_eq!(s.get_pixel(9, 1), Ok(WHITE));
    assert_eq!(painted(&s), 8);
}

#[test]
fn fractional_endpoints_are_still_covered() {
    let mut s = RasterSurface::new(10, 10, WHITE);
    draw_segment(&mut s, pt(3.7, 2.2), pt(3.7, 2.2), BLACK, 1.0);
    assert_eq!(s.get_pixel(3, 2), Ok(BLACK));
}

#[test]
fn endpoint_pixel_matches_point_addressing() {
    for (x, y) in [(0.9, 0.9), (5.5, 1.49), (7.01, 8.99)] {
        let mut s = RasterSurface::new(10, 10, WHITE);
        draw_segment(&mut s, pt(x, y), pt(x, y), BLACK, 1.0);
        let (px, py) = pt(x, y).pixel();
        let (px, py) = s.address(px, py).expect("on surface");
        assert_eq!(s.get_pixel(px, py), Ok(BLACK), "({x}, {y})");
    }
}

#[test]
fn segment_is_clipped_to_surface() {
    let mut s = RasterSurface::new(5, 5, WHITE);
    draw_segment(&mut s, pt(-10.0, 2.0), pt(20.0, 2.0), BLACK, 1.0);
    assert_eq!(painted(&s), 5);
}

#[test]
fn fully_offscreen_segment_paints_nothing() {
    let mut s = RasterSurface::new(5, 5, WHITE);
    draw_segment(&mut s, pt(-20.0, -20.0), pt(-10.0, -15.0), BLACK, 3.0);
    draw_segment(&mut s, pt(50.0, 50.0), pt(60.0, 60.0), BLACK, 3.0);
    assert_eq!(painted(&s), 0);
}

#[test]
fn segment_on_empty_surface_is_a_no_op() {
    let mut s = RasterSurface::new(0, 0, WHITE);
    draw_segment(&mut s, pt(0.0, 0.0), pt(1.0, 1.0), BLACK, 3.0);
    assert!(s.as_rgba().is_empty());
}

#[test]
fn segment_direction_does_not_matter() {
    let mut a = RasterSurface::new(30, 30, WHITE);
    let mut b = RasterSurface::new(30, 30, WHITE);
    draw_segment(&mut a, pt(2.0, 3.0), pt(25.0, 17.0), BLACK, 5.0);
    draw_segment(&mut b, pt(25.0, 17.0), pt(2.0, 3.0), BLACK, 5.0);
    assert_eq!(a, b);
}

// =============================================================
// StrokeRenderer
// =============================================================

#[test]
fn extend_emits_new_endpoint_with_style() {
    let mut s = RasterSurface::new(10, 10, WHITE);
    let mut r = StrokeRenderer::new();
    let state = DrawingState { color: Color::rgb(255, 0, 0), width: 3.0, ..Default::default() };

    r.begin_stroke(pt(1.0, 1.0));
    let ev = r.extend_stroke(&mut s, pt(4.0, 1.0), &state);

    assert_eq!(ev, DrawEvent { x: 4.0, y: 1.0, color: Color::rgb(255, 0, 0), width: 3.0 });
    assert_eq!(s.get_pixel(2, 1), Ok(Pixel::opaque(255, 0, 0)));
}

#[test]
fn eraser_stroke_paints_and_emits_background() {
    let mut s = RasterSurface::new(10, 10, BLACK);
    let mut r = StrokeRenderer::new();
    let state = DrawingState { mode: Mode::Eraser, width: 1.0, ..Default::default() };

    r.begin_stroke(pt(2.0, 2.0));
    let ev = r.extend_stroke(&mut s, pt(2.0, 2.0), &state);

    assert_eq!(ev.color, Color::WHITE);
    assert_eq!(s.get_pixel(2, 2), Ok(WHITE));
}

#[test]
fn end_stroke_reports_whether_a_stroke_was_active() {
    let mut r = StrokeRenderer::new();
    assert!(!r.end_stroke());
    r.begin_stroke(pt(0.0, 0.0));
    assert!(r.is_active());
    assert!(r.end_stroke());
    assert!(!r.is_active());
    assert!(!r.end_stroke());
}

#[test]
fn strokes_are_not_connected_across_end_stroke() {
    let mut s = RasterSurface::new(20, 3, WHITE);
    let mut r = StrokeRenderer::new();
    let state = DrawingState { width: 1.0, ..Default::default() };

    r.begin_stroke(pt(1.0, 1.0));
    r.extend_stroke(&mut s, pt(1.0, 1.0), &state);
    r.end_stroke();
    r.begin_stroke(pt(18.0, 1.0));
    r.extend_stroke(&mut s, pt(18.0, 1.0), &state);

    assert_eq!(painted(&s), 2);
    assert_eq!(s.get_pixel(10, 1), Ok(WHITE));
}
