//! Angular sectors around the pivot.
//!
//! Angles are degrees measured counter-clockwise from the +x axis in mathematical convention.
//! Raster y grows downward, so a ray at `θ` ends at `(cx + r·cos θ, cy − r·sin θ)`.

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::foundation::math::{ANGLE_EPS_DEG, angular_distance, normalize_degrees};

/// Widest arc a single polygon edge may subtend; wider sweeps get intermediate vertices.
const MAX_EDGE_ARC_DEG: f64 = 45.0;

/// One sector, swept from `angle1` to `angle2` along the shorter arc.
///
/// A sweep of exactly 180° runs counter-clockwise from `angle1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WedgeSpec {
    /// First boundary, degrees in `[0, 360)`.
    pub angle1: f64,
    /// Second boundary, degrees in `[0, 360)`.
    pub angle2: f64,
}

impl Default for WedgeSpec {
    /// The upper-left octant, between the horizontal and the up-left diagonal.
    fn default() -> Self {
        Self {
            angle1: 180.0,
            angle2: 135.0,
        }
    }
}

impl WedgeSpec {
    /// Build a wedge, folding both angles into `[0, 360)`.
    pub fn new(angle1: f64, angle2: f64) -> KaleidoResult<Self> {
        if !angle1.is_finite() || !angle2.is_finite() {
            return Err(KaleidoError::validation("wedge angles must be finite"));
        }
        Ok(Self {
            angle1: normalize_degrees(angle1),
            angle2: normalize_degrees(angle2),
        })
    }

    /// Signed sweep from `angle1` to `angle2`, in `(-180, 180]`.
    pub fn sweep(&self) -> f64 {
        let ccw = normalize_degrees(self.angle2 - self.angle1);
        if ccw <= 180.0 { ccw } else { ccw - 360.0 }
    }

    /// Angular width of the sector.
    pub fn span(&self) -> f64 {
        self.sweep().abs()
    }

    /// Check that the sector spans exactly one pattern step.
    pub fn validate_step(&self, step: f64) -> KaleidoResult<()> {
        if (self.span() - step).abs() > ANGLE_EPS_DEG {
            return Err(KaleidoError::validation(format!(
                "wedge ({}, {}) spans {}°, expected one step of {step}°",
                self.angle1,
                self.angle2,
                self.span()
            )));
        }
        Ok(())
    }

    /// The same sector turned counter-clockwise by `degrees`.
    pub fn rotated(&self, degrees: f64) -> Self {
        Self {
            angle1: normalize_degrees(self.angle1 + degrees),
            angle2: normalize_degrees(self.angle2 + degrees),
        }
    }

    /// Sector `k` of a pattern with the given step.
    pub fn sector(&self, k: u32, step: f64) -> Self {
        self.rotated(step * f64::from(k))
    }

    /// Direction halfway through the sweep.
    pub fn bisector(&self) -> f64 {
        normalize_degrees(self.angle1 + self.sweep() / 2.0)
    }

    /// Whether the direction `degrees` lies inside the sector (boundaries included).
    pub fn contains_direction(&self, degrees: f64) -> bool {
        let sweep = self.sweep();
        let offset = if sweep >= 0.0 {
            normalize_degrees(degrees - self.angle1)
        } else {
            normalize_degrees(self.angle1 - degrees)
        };
        offset <= sweep.abs() + ANGLE_EPS_DEG
            || angular_distance(degrees, self.angle1) <= ANGLE_EPS_DEG
    }

    /// Enclosing polygon at `radius` around `pivot`.
    pub fn polygon(&self, pivot: Point, radius: f64) -> WedgePolygon {
        wedge_polygon(pivot, self.angle1, self.angle2, radius)
    }
}

/// Polygon covering one sector: the pivot followed by points on the bounding rays.
///
/// For sweeps up to 45° this is the triangle `(pivot, ray(angle1), ray(angle2))`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WedgePolygon {
    /// Vertices in order, starting at the pivot.
    pub points: Vec<Point>,
}

impl WedgePolygon {
    /// Vertices, starting at the pivot.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// End of a ray from `pivot` at `degrees` with length `radius`.
pub fn ray_endpoint(pivot: Point, degrees: f64, radius: f64) -> Point {
    let (s, c) = degrees.to_radians().sin_cos();
    Point::new(pivot.x + radius * c, pivot.y - radius * s)
}

/// Segment from `pivot` along `degrees` with length `radius`.
pub fn ray(pivot: Point, degrees: f64, radius: f64) -> kurbo::Line {
    kurbo::Line::new(pivot, ray_endpoint(pivot, degrees, radius))
}

/// Radius that reaches past every canvas corner: the diagonal times `factor` (> 1).
pub fn covering_radius(canvas: &Canvas, factor: f64) -> f64 {
    canvas.diagonal() * factor
}

/// Polygon for the sector swept from `angle1` to `angle2`.
///
/// `radius` must exceed the canvas diagonal so the polygon covers the sector edge to edge.
pub fn wedge_polygon(pivot: Point, angle1: f64, angle2: f64, radius: f64) -> WedgePolygon {
    let spec = WedgeSpec {
        angle1: normalize_degrees(angle1),
        angle2: normalize_degrees(angle2),
    };
    let sweep = spec.sweep();
    let segments = ((sweep.abs() / MAX_EDGE_ARC_DEG).ceil() as u32).max(1);

    let mut points = Vec::with_capacity(segments as usize + 2);
    points.push(pivot);
    for i in 0..=segments {
        let t = f64::from(i) / f64::from(segments);
        points.push(ray_endpoint(pivot, spec.angle1 + sweep * t, radius));
    }
    WedgePolygon { points }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/wedge.rs"]
mod tests;
