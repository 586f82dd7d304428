//! Guide geometry for orienting the painter. Guides are vector-only and never rasterized.

use crate::foundation::core::{BezPath, Canvas, Point};
use crate::geometry::pivot::resolve_pivot;
use crate::geometry::wedge::{WedgeSpec, covering_radius, ray_endpoint};

/// Shortest crosshair arm, in pixels.
const MIN_CROSSHAIR_PX: f64 = 6.0;
/// Crosshair arm as a fraction of the shorter canvas edge.
const CROSSHAIR_FRACTION: f64 = 0.01;

/// What a guide path marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideRole {
    /// One of the base wedge's boundary rays.
    WedgeBorder,
    /// Arm of the center marker.
    Crosshair,
    /// Regular polygon approximating a circle around the pivot.
    Ring,
}

/// One open or closed polyline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GuidePath {
    /// What this path marks.
    pub role: GuideRole,
    /// Vertices in order.
    pub points: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

/// The named guide entity of a document. A document holds at most one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GuideOverlay {
    /// Entity name.
    pub name: String,
    /// Guide polylines.
    pub paths: Vec<GuidePath>,
}

impl GuideOverlay {
    /// Paths with the given role.
    pub fn paths_with_role(&self, role: GuideRole) -> impl Iterator<Item = &GuidePath> {
        self.paths.iter().filter(move |p| p.role == role)
    }

    /// All guides as one path, e.g. for an external preview.
    pub fn to_bezpath(&self) -> BezPath {
        let mut out = BezPath::new();
        for p in &self.paths {
            let mut it = p.points.iter();
            let Some(&first) = it.next() else {
                continue;
            };
            out.move_to(first);
            for &pt in it {
                out.line_to(pt);
            }
            if p.closed {
                out.close_path();
            }
        }
        out
    }
}

/// Ring settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingOptions {
    /// Radius as a fraction of the shorter canvas edge, in `(0, 1)`.
    pub scale: f64,
    /// Polygon segment count.
    pub segments: u32,
}

/// What to put in the overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayOptions {
    /// Wedge whose borders are drawn.
    pub wedge: WedgeSpec,
    /// Border length as a multiple of the canvas diagonal.
    pub radius_factor: f64,
    /// Optional ring around the pivot.
    pub ring: Option<RingOptions>,
}

/// Compute guides for `canvas`: wedge borders, a center crosshair, and optionally a ring.
pub fn build_overlay(canvas: &Canvas, opts: &OverlayOptions, name: &str) -> GuideOverlay {
    let c = resolve_pivot(canvas);
    let r = covering_radius(canvas, opts.radius_factor);
    let min_edge = f64::from(canvas.width.min(canvas.height));

    let mut paths = Vec::with_capacity(5);
    for angle in [opts.wedge.angle1, opts.wedge.angle2] {
        paths.push(GuidePath {
            role: GuideRole::WedgeBorder,
            points: vec![c, ray_endpoint(c, angle, r)],
            closed: false,
        });
    }

    let arm = MIN_CROSSHAIR_PX.max(min_edge * CROSSHAIR_FRACTION);
    paths.push(GuidePath {
        role: GuideRole::Crosshair,
        points: vec![Point::new(c.x - arm, c.y), Point::new(c.x + arm, c.y)],
        closed: false,
    });
    paths.push(GuidePath {
        role: GuideRole::Crosshair,
        points: vec![Point::new(c.x, c.y - arm), Point::new(c.x, c.y + arm)],
        closed: false,
    });

    if let Some(ring) = opts.ring {
        let radius = ring.scale * min_edge;
        let n = ring.segments.max(3);
        let points = (0..n)
            .map(|i| ray_endpoint(c, 360.0 * f64::from(i) / f64::from(n), radius))
            .collect();
        paths.push(GuidePath {
            role: GuideRole::Ring,
            points,
            closed: true,
        });
    }

    GuideOverlay {
        name: name.to_string(),
        paths,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/overlay.rs"]
mod tests;
