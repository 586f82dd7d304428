//! Layer rotation about an explicit pivot.
//!
//! Angles are degrees, counter-clockwise as seen on screen (y grows downward), matching
//! [`ray_endpoint`](crate::ray_endpoint). The layer is drawn as a `vello_cpu` image paint under
//! the rotation, so resampling happens on premultiplied pixels.

use vello_cpu::peniko::ImageQuality;

use crate::foundation::core::{Affine, PixelBounds, Point};
use crate::foundation::error::KaleidoResult;
use crate::foundation::math::normalize_degrees;
use crate::raster::fill::draw_transformed;
use crate::raster::layer::Layer;
use crate::raster::mask::RegionMask;

/// Where a rotation is anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformPivot {
    /// A caller-supplied point, independent of the layer content.
    Explicit(Point),
    /// Center of the layer's own content bounds.
    ContentCenter,
}

/// Resampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear interpolation of the four nearest source pixels.
    #[default]
    Bilinear,
}

impl Resample {
    fn quality(self) -> ImageQuality {
        match self {
            Self::Nearest => ImageQuality::Low,
            Self::Bilinear => ImageQuality::Medium,
        }
    }
}

/// Why a rotation did not touch the layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The layer is not a plain raster surface.
    NotRaster,
    /// The layer has no pixels.
    Empty,
}

/// Result of a rotation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotateOutcome {
    /// The layer was resampled; `bounds` are its new content bounds.
    Rotated {
        /// Content bounds after rotation.
        bounds: PixelBounds,
    },
    /// Nothing to transform. Expected for empty duplicates; not an error.
    Skipped(SkipReason),
}

impl RotateOutcome {
    /// Whether the rotation was skipped.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Rotate `layer` about `pivot` after dropping any active selection.
///
/// This is the form the engine uses: the pivot is always explicit, so content is carried
/// around the document center rather than spun about its own bounding box.
pub fn rotate_about_pivot(
    selection: &mut RegionMask,
    layer: &mut Layer,
    pivot: Point,
    degrees: f64,
    resample: Resample,
) -> KaleidoResult<RotateOutcome> {
    selection.deselect();
    rotate_layer(layer, TransformPivot::Explicit(pivot), degrees, resample)
}

/// Rotate the pixels of `layer` in place.
///
/// Content carried past the edge of the surface is lost.
pub fn rotate_layer(
    layer: &mut Layer,
    pivot: TransformPivot,
    degrees: f64,
    resample: Resample,
) -> KaleidoResult<RotateOutcome> {
    if !layer.is_raster() {
        tracing::trace!(layer = %layer.name, "rotation skipped: not a raster layer");
        return Ok(RotateOutcome::Skipped(SkipReason::NotRaster));
    }
    let bounds = layer.bounds();
    if bounds.is_empty() {
        tracing::trace!(layer = %layer.name, "rotation skipped: empty layer");
        return Ok(RotateOutcome::Skipped(SkipReason::Empty));
    }
    let turn = normalize_degrees(degrees);
    if turn == 0.0 {
        return Ok(RotateOutcome::Rotated { bounds });
    }

    let center = match pivot {
        TransformPivot::Explicit(p) => p,
        TransformPivot::ContentCenter => bounds.center(),
    };
    // quarter turns land pixel centers on pixel centers
    let quality = if turn % 90.0 == 0.0 {
        ImageQuality::Low
    } else {
        resample.quality()
    };
    let rotated = draw_transformed(
        layer.data(),
        layer.width(),
        layer.height(),
        rotation_about(center, degrees),
        quality,
    )?;
    layer.data_mut().copy_from_slice(&rotated);
    Ok(RotateOutcome::Rotated {
        bounds: layer.bounds(),
    })
}

/// Screen-space counter-clockwise rotation by `degrees` about `center`.
///
/// Coefficients within 1e-12 of -1, 0 or 1 are rounded to remove floating-point noise from
/// `sin`/`cos`.
pub fn rotation_about(center: Point, degrees: f64) -> Affine {
    let (s, c) = clean_unit(degrees.to_radians().sin_cos());
    let (cx, cy) = (center.x, center.y);
    // x' = cx + c*dx + s*dy ; y' = cy - s*dx + c*dy
    Affine::new([
        c,
        -s,
        s,
        c,
        cx - c * cx - s * cy,
        cy + s * cx - c * cy,
    ])
}

fn clean_unit((s, c): (f64, f64)) -> (f64, f64) {
    let clean = |v: f64| -> f64 {
        for target in [-1.0, 0.0, 1.0] {
            if (v - target).abs() < 1e-12 {
                return target;
            }
        }
        v
    };
    (clean(s), clean(c))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/rotate.rs"]
mod tests;
