use super::*;
use crate::foundation::core::{Canvas, PixelBounds};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

fn solid_layer(w: u32, h: u32) -> Layer {
    let mut l = Layer::new("solid", &Canvas::new(w, h).unwrap());
    l.fill_rect(PixelBounds::new(0, 0, w, h), Rgba8Premul::opaque(9, 9, 9));
    l
}

#[test]
fn select_replace_and_extend() {
    let mut m = RegionMask::new(10, 10);
    assert!(!m.is_active());
    m.select(&square(0.0, 0.0, 4.0, 4.0), SelectionMode::Replace)
        .unwrap();
    assert_eq!(m.coverage_at(1, 1), 255);
    assert_eq!(m.coverage_at(7, 7), 0);

    m.select(&square(6.0, 6.0, 10.0, 10.0), SelectionMode::Extend)
        .unwrap();
    assert_eq!(m.coverage_at(1, 1), 255);
    assert_eq!(m.coverage_at(7, 7), 255);

    m.select(&square(6.0, 6.0, 10.0, 10.0), SelectionMode::Replace)
        .unwrap();
    assert_eq!(m.coverage_at(1, 1), 0);
}

#[test]
fn select_rejects_degenerate_polygons() {
    let mut m = RegionMask::new(4, 4);
    assert!(
        m.select(&[Point::ZERO, Point::new(1.0, 1.0)], SelectionMode::Replace)
            .is_err()
    );
}

#[test]
fn invert_flips_coverage_and_selects_all_when_empty() {
    let mut m = RegionMask::new(4, 4);
    m.invert();
    assert_eq!(m.coverage_at(3, 3), 255);

    m.select(&square(0.0, 0.0, 2.0, 4.0), SelectionMode::Replace)
        .unwrap();
    m.invert();
    assert_eq!(m.coverage_at(0, 0), 0);
    assert_eq!(m.coverage_at(3, 0), 255);
}

#[test]
fn clear_without_selection_is_noop() {
    let m = RegionMask::new(4, 4);
    let mut l = solid_layer(4, 4);
    let before = l.clone();
    m.clear_selected(&mut l).unwrap();
    assert_eq!(l, before);
}

#[test]
fn clear_selected_zeroes_alpha_and_shrinks_bounds() {
    let mut m = RegionMask::new(8, 8);
    let mut l = solid_layer(8, 8);
    m.select(&square(0.0, 0.0, 8.0, 4.0), SelectionMode::Replace)
        .unwrap();
    m.clear_selected(&mut l).unwrap();
    assert_eq!(l.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(l.bounds(), PixelBounds::new(0, 4, 8, 8));
}

#[test]
fn clear_selected_rejects_size_mismatch() {
    let mut m = RegionMask::new(8, 8);
    m.select_all();
    let mut l = solid_layer(4, 4);
    assert!(m.clear_selected(&mut l).is_err());
}

#[test]
fn retain_inside_keeps_polygon_and_deselects() {
    let mut m = RegionMask::new(8, 8);
    let mut l = solid_layer(8, 8);
    retain_inside(&mut m, &mut l, &square(2.0, 2.0, 6.0, 6.0)).unwrap();
    assert!(!m.is_active());
    assert_eq!(l.bounds(), PixelBounds::new(2, 2, 6, 6));
    assert_eq!(l.pixel(3, 3), Some([9, 9, 9, 255]));
}
