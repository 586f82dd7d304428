use super::*;

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn ray_endpoint_inverts_y() {
    let c = Point::new(50.0, 50.0);
    assert!(close(ray_endpoint(c, 0.0, 10.0), Point::new(60.0, 50.0)));
    assert!(close(ray_endpoint(c, 90.0, 10.0), Point::new(50.0, 40.0)));
    assert!(close(ray_endpoint(c, 180.0, 10.0), Point::new(40.0, 50.0)));
    assert!(close(ray_endpoint(c, 270.0, 10.0), Point::new(50.0, 60.0)));
}

#[test]
fn ray_runs_from_pivot() {
    let c = Point::new(5.0, 5.0);
    let line = ray(c, 45.0, 2.0);
    assert_eq!(line.p0, c);
    assert!(close(line.p1, ray_endpoint(c, 45.0, 2.0)));
}

#[test]
fn default_wedge_is_upper_left_octant() {
    let w = WedgeSpec::default();
    assert_eq!(w.sweep(), -45.0);
    assert_eq!(w.span(), 45.0);
    assert_eq!(w.bisector(), 157.5);
    assert!(w.contains_direction(150.0));
    assert!(w.contains_direction(180.0));
    assert!(w.contains_direction(135.0));
    assert!(!w.contains_direction(100.0));
    assert!(!w.contains_direction(200.0));
}

#[test]
fn new_normalizes_and_rejects_nan() {
    let w = WedgeSpec::new(-180.0, 495.0).unwrap();
    assert_eq!(w, WedgeSpec::default());
    assert!(WedgeSpec::new(f64::NAN, 0.0).is_err());
}

#[test]
fn validate_step_checks_span() {
    let w = WedgeSpec::default();
    assert!(w.validate_step(45.0).is_ok());
    assert!(w.validate_step(30.0).is_err());
}

#[test]
fn sectors_rotate_counter_clockwise() {
    let w = WedgeSpec::default();
    assert_eq!(w.sector(0, 45.0), w);
    let s3 = w.sector(3, 45.0);
    assert_eq!((s3.angle1, s3.angle2), (315.0, 270.0));
    assert!(s3.contains_direction(292.5));
    let s4 = w.sector(4, 45.0);
    assert_eq!((s4.angle1, s4.angle2), (0.0, 315.0));
    assert!(s4.contains_direction(350.0));
    assert!(!s4.contains_direction(10.0));
}

#[test]
fn narrow_wedge_polygon_is_a_triangle() {
    let c = Point::new(10.0, 10.0);
    let poly = wedge_polygon(c, 180.0, 135.0, 100.0);
    assert_eq!(poly.points().len(), 3);
    assert_eq!(poly.points()[0], c);
    assert!(close(poly.points()[1], ray_endpoint(c, 180.0, 100.0)));
    assert!(close(poly.points()[2], ray_endpoint(c, 135.0, 100.0)));
}

#[test]
fn wide_wedges_get_arc_vertices() {
    let c = Point::new(0.0, 0.0);
    // half plane, counter-clockwise from 0 through 90 to 180
    let poly = wedge_polygon(c, 0.0, 180.0, 10.0);
    assert_eq!(poly.points().len(), 6);
    assert!(close(poly.points()[3], ray_endpoint(c, 90.0, 10.0)));
}

#[test]
fn covering_radius_scales_diagonal() {
    let canvas = Canvas::new(30, 40).unwrap();
    assert_eq!(covering_radius(&canvas, 2.0), 100.0);
}
