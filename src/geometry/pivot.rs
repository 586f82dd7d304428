use crate::foundation::core::{Canvas, Point};

/// Canonical rotation center: the exact canvas center, in pixels.
///
/// Recompute it on every run; canvas dimensions can change between runs.
pub fn resolve_pivot(canvas: &Canvas) -> Point {
    Point::new(
        f64::from(canvas.width) / 2.0,
        f64::from(canvas.height) / 2.0,
    )
}
