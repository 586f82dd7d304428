//! Polygonal selections applied destructively to raster layers.
//!
//! The standard "keep inside, discard outside" idiom is select → invert → clear → deselect,
//! see [`retain_inside`].

use crate::foundation::core::{Point, Rgba8Premul};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::raster::composite::knock_out_in_place;
use crate::raster::fill::{polygon_path, rasterize_path};
use crate::raster::layer::Layer;

/// How a new polygon combines with the active selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Drop the active selection, then select the polygon.
    #[default]
    Replace,
    /// Union the polygon with the active selection.
    Extend,
}

/// Document selection: an 8-bit coverage mask, or nothing selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    width: u32,
    height: u32,
    coverage: Option<Vec<u8>>,
}

impl RegionMask {
    /// Empty selection for a `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: None,
        }
    }

    /// Whether anything is selected.
    pub fn is_active(&self) -> bool {
        self.coverage.is_some()
    }

    /// Coverage at `(x, y)`; 0 when unselected or out of range.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        match &self.coverage {
            Some(c) if x < self.width && y < self.height => {
                c[y as usize * self.width as usize + x as usize]
            }
            _ => 0,
        }
    }

    /// Select the closed polygon through `points`, anti-aliased.
    pub fn select(&mut self, points: &[Point], mode: SelectionMode) -> KaleidoResult<()> {
        if points.len() < 3 {
            return Err(KaleidoError::validation(
                "selection polygon needs at least 3 points",
            ));
        }
        let rgba = rasterize_path(
            &polygon_path(points),
            self.width,
            self.height,
            Rgba8Premul::opaque(255, 255, 255),
        )?;
        // snap rasterizer noise on pixel-aligned edges
        let shape: Vec<u8> = rgba
            .chunks_exact(4)
            .map(|px| match px[3] {
                0..=1 => 0,
                254..=255 => 255,
                a => a,
            })
            .collect();

        self.coverage = match (mode, self.coverage.take()) {
            (SelectionMode::Extend, Some(mut existing)) => {
                for (e, s) in existing.iter_mut().zip(&shape) {
                    *e = (*e).max(*s);
                }
                Some(existing)
            }
            _ => Some(shape),
        };
        Ok(())
    }

    /// Select the whole surface.
    pub fn select_all(&mut self) {
        self.coverage = Some(vec![255; self.width as usize * self.height as usize]);
    }

    /// Swap selected and unselected areas. Inverting nothing selects everything.
    pub fn invert(&mut self) {
        match &mut self.coverage {
            Some(c) => c.iter_mut().for_each(|v| *v = 255 - *v),
            None => self.select_all(),
        }
    }

    /// Zero the pixels of `layer` inside the selection, alpha included.
    ///
    /// Does nothing when no selection is active.
    pub fn clear_selected(&self, layer: &mut Layer) -> KaleidoResult<()> {
        let Some(coverage) = &self.coverage else {
            return Ok(());
        };
        if !layer.is_raster() {
            return Err(KaleidoError::validation(format!(
                "cannot clear pixels of non-raster layer '{}'",
                layer.name
            )));
        }
        if layer.width() != self.width || layer.height() != self.height {
            return Err(KaleidoError::raster(format!(
                "selection is {}x{} but layer '{}' is {}x{}",
                self.width,
                self.height,
                layer.name,
                layer.width(),
                layer.height()
            )));
        }
        knock_out_in_place(layer.data_mut(), coverage)
    }

    /// Drop the selection.
    pub fn deselect(&mut self) {
        self.coverage = None;
    }
}

/// Keep only the pixels of `layer` inside `polygon`; leaves nothing selected.
pub fn retain_inside(
    selection: &mut RegionMask,
    layer: &mut Layer,
    polygon: &[Point],
) -> KaleidoResult<()> {
    selection.select(polygon, SelectionMode::Replace)?;
    selection.invert();
    let cleared = selection.clear_selected(layer);
    selection.deselect();
    cleared
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
