//! Kaleido turns a painting in one wedge of a canvas into an N-fold radial pattern.
//!
//! A run resolves the canvas center as pivot, consolidates whatever the user painted into the
//! canonical base wedge (by folding every sector onto it, or by clipping the source), and
//! replicates that wedge into a named group of rotated sector layers. Re-running replaces the
//! group instead of adding to it.
//!
//! - Open a [`Document`] in a [`Workspace`]
//! - Build a [`Symmetry`] engine from a [`SymmetryConfig`]
//! - Call [`Symmetry::run`] and inspect the [`RunReport`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod document;
mod engine;
mod foundation;
mod geometry;
mod raster;
mod workspace;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, ColorMode, MAX_CANVAS_EDGE, PixelBounds, Point, Rect, Rgba8Premul,
    RulerUnits, Vec2,
};
pub use crate::foundation::error::{KaleidoError, KaleidoResult};

pub use crate::document::{CompositeGroup, Document, FrameRGBA, StackEntry};
pub use crate::engine::config::{FoldPolicy, OverlayRetention, SymmetryConfig};
pub use crate::engine::expand::expand;
pub use crate::engine::fold::{Folded, SectorParams, WorkFrame, enforce, fold};
pub use crate::engine::lifecycle::{remove_group, replace_group};
pub use crate::engine::orchestrator::{EmptyReason, RunOutcome, RunReport, Symmetry};
pub use crate::geometry::overlay::{
    GuideOverlay, GuidePath, GuideRole, OverlayOptions, RingOptions, build_overlay,
};
pub use crate::geometry::pivot::resolve_pivot;
pub use crate::geometry::wedge::{
    WedgePolygon, WedgeSpec, covering_radius, ray, ray_endpoint, wedge_polygon,
};
pub use crate::raster::composite::{PremulRgba8, over, over_in_place};
pub use crate::raster::layer::{Layer, LayerKind};
pub use crate::raster::mask::{RegionMask, SelectionMode, retain_inside};
pub use crate::raster::rotate::{
    Resample, RotateOutcome, SkipReason, TransformPivot, rotate_about_pivot, rotate_layer,
    rotation_about,
};
pub use crate::workspace::{BackupSink, PngBackup, Workspace, sanitize_name};
