use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::geometry::overlay::{OverlayOptions, RingOptions};
use crate::geometry::wedge::WedgeSpec;
use crate::raster::rotate::Resample;

/// How user content outside the base wedge is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldPolicy {
    /// Fold every sector back into the base wedge; the source layer is left untouched.
    #[default]
    Tolerant,
    /// Clip the source layer itself to the base wedge, discarding everything else.
    Strict,
}

/// What happens to an existing overlay when `show_overlay` is off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayRetention {
    /// Remove any overlay left by an earlier run.
    #[default]
    Remove,
    /// Leave whatever overlay is present.
    Keep,
}

/// Engine configuration, threaded explicitly through every run.
///
/// JSON keys match the field names; missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymmetryConfig {
    /// Number of sectors in the pattern.
    pub fold_count: u32,
    /// The canonical sector. Must span exactly one step.
    pub base_wedge: WedgeSpec,
    /// Fold or clip.
    pub fold_policy: FoldPolicy,
    /// Build guide geometry on each run.
    pub show_overlay: bool,
    /// Overlay handling when `show_overlay` is off.
    pub overlay_when_hidden: OverlayRetention,
    /// Add a ring to the guides.
    pub ring_enabled: bool,
    /// Ring radius as a fraction of the shorter canvas edge.
    pub ring_scale: f64,
    /// Ring polygon segments.
    pub ring_segments: u32,
    /// Guide ray length as a multiple of the canvas diagonal.
    pub overlay_radius_factor: f64,
    /// Wedge mask radius as a multiple of the canvas diagonal.
    pub mask_radius_factor: f64,
    /// Rotation filter.
    pub resample: Resample,
    /// Leave the base wedge selected on the source layer after a run.
    pub constrain_painting: bool,
    /// Keep the per-sector fold copies in a hidden group named `fold_group`.
    pub keep_fold_group: bool,
    /// Layer the user paints on.
    pub source_layer: String,
    /// Group holding the expanded pattern.
    pub result_group: String,
    /// Group holding fold copies, when kept.
    pub fold_group: String,
    /// Name of the guide overlay entity.
    pub overlay_name: String,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            fold_count: 8,
            base_wedge: WedgeSpec::default(),
            fold_policy: FoldPolicy::Tolerant,
            show_overlay: true,
            overlay_when_hidden: OverlayRetention::Remove,
            ring_enabled: false,
            ring_scale: 0.35,
            ring_segments: 12,
            overlay_radius_factor: 1.2,
            mask_radius_factor: 2.0,
            resample: Resample::Bilinear,
            constrain_painting: false,
            keep_fold_group: false,
            source_layer: "PAINT_HERE".to_string(),
            result_group: "Mirrors".to_string(),
            fold_group: "__FoldToBase__".to_string(),
            overlay_name: "__RADIAL_PATHS__".to_string(),
        }
    }
}

impl SymmetryConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(s: &str) -> KaleidoResult<Self> {
        serde_json::from_str(s).map_err(|e| KaleidoError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KaleidoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KaleidoError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            KaleidoError::serde(format!("parse config JSON '{}': {e}", path.display()))
        })
    }

    /// Angle between neighbouring sectors, in degrees.
    pub fn step_degrees(&self) -> f64 {
        360.0 / f64::from(self.fold_count.max(1))
    }

    /// Check every option; the engine refuses to run on an invalid configuration.
    pub fn validate(&self) -> KaleidoResult<()> {
        if self.fold_count < 2 {
            return Err(KaleidoError::validation(format!(
                "fold_count must be at least 2, got {}",
                self.fold_count
            )));
        }
        if !self.base_wedge.angle1.is_finite() || !self.base_wedge.angle2.is_finite() {
            return Err(KaleidoError::validation("base_wedge angles must be finite"));
        }
        self.base_wedge.validate_step(self.step_degrees())?;
        if !(self.ring_scale > 0.0 && self.ring_scale < 1.0) {
            return Err(KaleidoError::validation(format!(
                "ring_scale must be in (0, 1), got {}",
                self.ring_scale
            )));
        }
        if self.ring_segments < 3 {
            return Err(KaleidoError::validation(format!(
                "ring_segments must be at least 3, got {}",
                self.ring_segments
            )));
        }
        for (key, v) in [
            ("overlay_radius_factor", self.overlay_radius_factor),
            ("mask_radius_factor", self.mask_radius_factor),
        ] {
            if !(v.is_finite() && v > 1.0) {
                return Err(KaleidoError::validation(format!(
                    "{key} must be greater than 1, got {v}"
                )));
            }
        }
        for (key, v) in [
            ("source_layer", &self.source_layer),
            ("result_group", &self.result_group),
            ("fold_group", &self.fold_group),
            ("overlay_name", &self.overlay_name),
        ] {
            if v.is_empty() {
                return Err(KaleidoError::validation(format!("{key} must not be empty")));
            }
        }
        if self.result_group == self.fold_group {
            return Err(KaleidoError::validation(
                "result_group and fold_group must differ",
            ));
        }
        if self.source_layer == self.result_group || self.source_layer == self.fold_group {
            return Err(KaleidoError::validation(
                "source_layer must not share a name with an output group",
            ));
        }
        Ok(())
    }

    /// Guide settings derived from this configuration.
    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            wedge: self.base_wedge,
            radius_factor: self.overlay_radius_factor,
            ring: self.ring_enabled.then_some(RingOptions {
                scale: self.ring_scale,
                segments: self.ring_segments,
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
