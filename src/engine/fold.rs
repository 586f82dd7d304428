//! Consolidating user content into the canonical wedge.

use crate::document::CompositeGroup;
use crate::engine::config::SymmetryConfig;
use crate::foundation::core::{Canvas, PixelBounds, Point, Vec2};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::geometry::pivot::resolve_pivot;
use crate::geometry::wedge::{WedgePolygon, WedgeSpec, covering_radius};
use crate::raster::layer::Layer;
use crate::raster::mask::{RegionMask, retain_inside};
use crate::raster::rotate::{Resample, rotate_about_pivot};

/// The surface the per-sector passes draw on.
///
/// It is the canvas padded until the circle about the pivot through the farthest canvas corner
/// fits inside, so content carried around the pivot never falls off an edge between folding and
/// expanding. Margins are whole pixels; the canvas keeps its pixel grid inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkFrame {
    /// Columns added on each side of the canvas.
    pub margin_x: u32,
    /// Rows added above and below the canvas.
    pub margin_y: u32,
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
}

impl WorkFrame {
    /// Frame for rotations of `canvas` content about `pivot`.
    pub fn around(canvas: &Canvas, pivot: Point) -> Self {
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let reach = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
            .into_iter()
            .map(|(x, y)| (Point::new(x, y) - pivot).hypot())
            .fold(0.0, f64::max);
        // +1 for the resampling footprint
        let margin = |near: f64| (reach - near).max(0.0).ceil() as u32 + 1;
        Self {
            margin_x: margin(pivot.x.min(w - pivot.x)),
            margin_y: margin(pivot.y.min(h - pivot.y)),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        }
    }

    /// Width of the working surface.
    pub fn width(&self) -> u32 {
        self.canvas_width + 2 * self.margin_x
    }

    /// Height of the working surface.
    pub fn height(&self) -> u32 {
        self.canvas_height + 2 * self.margin_y
    }

    /// Where the canvas sits on the working surface.
    pub fn canvas_bounds(&self) -> PixelBounds {
        PixelBounds::new(
            self.margin_x,
            self.margin_y,
            self.margin_x + self.canvas_width,
            self.margin_y + self.canvas_height,
        )
    }

    /// Canvas point in working-surface coordinates.
    pub fn to_work(&self, p: Point) -> Point {
        p + Vec2::new(f64::from(self.margin_x), f64::from(self.margin_y))
    }

    /// Move a canvas-sized layer onto the working surface.
    pub fn lift(&self, layer: &Layer) -> KaleidoResult<Layer> {
        layer.padded(self.margin_x, self.margin_y)
    }

    /// Cut the canvas back out of a working-surface layer.
    pub fn lower(&self, layer: &Layer) -> KaleidoResult<Layer> {
        self.ensure_work_sized(layer)?;
        layer.cropped(self.canvas_bounds())
    }

    fn ensure_work_sized(&self, layer: &Layer) -> KaleidoResult<()> {
        if (layer.width(), layer.height()) == (self.width(), self.height()) {
            return Ok(());
        }
        Err(KaleidoError::raster(format!(
            "layer '{}' is {}x{}, expected the {}x{} working surface",
            layer.name,
            layer.width(),
            layer.height(),
            self.width(),
            self.height()
        )))
    }
}

/// Everything the per-sector passes need, resolved once per run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectorParams {
    /// Rotation center.
    pub pivot: Point,
    /// The canonical sector.
    pub wedge: WedgeSpec,
    /// Degrees between sectors.
    pub step: f64,
    /// Number of sectors.
    pub fold_count: u32,
    /// Radius of the wedge mask polygon.
    pub mask_radius: f64,
    /// Rotation filter.
    pub resample: Resample,
    /// Working surface for folding and expanding.
    pub frame: WorkFrame,
}

impl SectorParams {
    /// Resolve parameters for `canvas` under `cfg`.
    pub fn resolve(cfg: &SymmetryConfig, canvas: &Canvas) -> Self {
        let pivot = resolve_pivot(canvas);
        Self {
            pivot,
            wedge: cfg.base_wedge,
            step: cfg.step_degrees(),
            fold_count: cfg.fold_count,
            mask_radius: covering_radius(canvas, cfg.mask_radius_factor),
            resample: cfg.resample,
            frame: WorkFrame::around(canvas, pivot),
        }
    }

    /// Mask polygon of the canonical sector.
    pub fn base_polygon(&self) -> WedgePolygon {
        self.wedge.polygon(self.pivot, self.mask_radius)
    }

    /// Pivot on the working surface.
    pub fn work_pivot(&self) -> Point {
        self.frame.to_work(self.pivot)
    }

    /// Mask polygon of the canonical sector on the working surface.
    pub fn work_polygon(&self) -> WedgePolygon {
        self.wedge.polygon(self.work_pivot(), self.mask_radius)
    }

    pub(crate) fn ensure_work_sized(&self, layer: &Layer) -> KaleidoResult<()> {
        self.frame.ensure_work_sized(layer)
    }

    /// Rotation that carries sector `k` onto the canonical one.
    pub fn fold_angle(&self, k: u32) -> f64 {
        -self.step * f64::from(k)
    }

    /// Rotation that carries the canonical sector onto sector `k`.
    pub fn expand_angle(&self, k: u32) -> f64 {
        self.step * f64::from(k)
    }
}

/// Output of [`fold`]. Layers are on the [`WorkFrame`] surface.
#[derive(Clone, Debug)]
pub struct Folded {
    /// Merged canonical wedge, or `None` when no sector held content.
    pub canonical: Option<Layer>,
    /// The surviving per-sector copies, in sector order.
    pub copies: CompositeGroup,
    /// Sectors whose rotation was skipped because the copy had no pixels.
    pub skipped_rotations: usize,
}

/// Map every sector of `source` into the canonical wedge and merge what survives.
///
/// `source` is canvas-sized and is not modified. Copies that end up empty after clipping are
/// discarded; later sectors draw over earlier ones in the merge. The document selection is
/// dropped before the first rotation, and clipping uses a mask sized to the working surface.
#[tracing::instrument(skip_all, fields(source = %source.name, fold_count = params.fold_count))]
pub fn fold(
    selection: &mut RegionMask,
    source: &Layer,
    params: &SectorParams,
    merged_name: &str,
) -> KaleidoResult<Folded> {
    selection.deselect();
    let lifted = params.frame.lift(source)?;
    let pivot = params.work_pivot();
    let polygon = params.work_polygon();
    let mut scratch = RegionMask::new(lifted.width(), lifted.height());
    let mut copies = CompositeGroup::new(merged_name);
    let mut skipped_rotations = 0;

    for k in 0..params.fold_count {
        let mut copy = lifted.duplicate(format!("Fold_{k}"));
        let outcome = rotate_about_pivot(
            &mut scratch,
            &mut copy,
            pivot,
            params.fold_angle(k),
            params.resample,
        )?;
        if outcome.is_skipped() {
            skipped_rotations += 1;
        }
        retain_inside(&mut scratch, &mut copy, polygon.points())?;
        if copy.has_pixels() {
            tracing::debug!(k, "sector folded into base wedge");
            copies.push(copy);
        } else {
            tracing::debug!(k, "sector empty after clipping, discarded");
        }
    }

    let canonical = copies.merge(merged_name)?;
    Ok(Folded {
        canonical,
        copies,
        skipped_rotations,
    })
}

/// Clip `layer` to the canonical wedge in place, discarding everything outside it.
pub fn enforce(
    selection: &mut RegionMask,
    layer: &mut Layer,
    params: &SectorParams,
) -> KaleidoResult<()> {
    let polygon = params.base_polygon();
    retain_inside(selection, layer, polygon.points())
}

#[cfg(test)]
#[path = "../../tests/unit/engine/fold.rs"]
mod tests;
