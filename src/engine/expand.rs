use crate::document::CompositeGroup;
use crate::engine::fold::SectorParams;
use crate::foundation::error::KaleidoResult;
use crate::raster::layer::Layer;
use crate::raster::mask::RegionMask;
use crate::raster::rotate::rotate_about_pivot;

/// Replicate `canonical` into every sector of the pattern.
///
/// `canonical` lives on the working surface ([`SectorParams::frame`]) and is consumed. Sector
/// `k` is it rotated by `+step·k` about the pivot and cut back to the canvas; layers are inserted
/// in ascending `k`, so the highest sector ends up on top.
#[tracing::instrument(skip_all, fields(canonical = %canonical.name, fold_count = params.fold_count))]
pub fn expand(
    selection: &mut RegionMask,
    canonical: Layer,
    params: &SectorParams,
    group_name: &str,
) -> KaleidoResult<CompositeGroup> {
    params.ensure_work_sized(&canonical)?;
    selection.deselect();
    let pivot = params.work_pivot();
    let mut scratch = RegionMask::new(canonical.width(), canonical.height());
    let mut group = CompositeGroup::new(group_name);
    for k in 0..params.fold_count {
        let mut sector = canonical.duplicate(format!("Sector_{k}"));
        let outcome = rotate_about_pivot(
            &mut scratch,
            &mut sector,
            pivot,
            params.expand_angle(k),
            params.resample,
        )?;
        tracing::debug!(k, skipped = outcome.is_skipped(), "sector placed");
        group.push(params.frame.lower(&sector)?);
    }
    Ok(group)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/expand.rs"]
mod tests;
