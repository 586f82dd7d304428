use crate::document::{CompositeGroup, Document};
use crate::engine::config::{FoldPolicy, OverlayRetention, SymmetryConfig};
use crate::engine::expand::expand;
use crate::engine::fold::{SectorParams, enforce, fold};
use crate::engine::lifecycle::{remove_group, replace_group};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::geometry::overlay::build_overlay;
use crate::raster::layer::Layer;
use crate::raster::mask::SelectionMode;
use crate::workspace::Workspace;

/// Name of the temporary merged canonical layer.
const FOLDED_LAYER: &str = "PAINT_FOLDED";

/// Why a run produced no pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    /// The source layer has no pixels.
    SourceEmpty,
    /// Nothing remained inside the base wedge after folding or clipping.
    NothingInWedge,
}

/// What a run did to the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pattern group was rebuilt.
    Expanded {
        /// Group name.
        group: String,
        /// Number of sector layers in it.
        sectors: usize,
    },
    /// No pattern was built; any earlier pattern group was removed.
    NothingToExpand(EmptyReason),
}

/// Summary of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Result of the run.
    pub outcome: RunOutcome,
    /// Pivot used for every rotation.
    pub pivot: Point,
    /// Whether the source layer had to be created.
    pub source_created: bool,
    /// Sector copies that contributed to the canonical wedge.
    pub folded_copies: usize,
    /// Rotations skipped on empty copies.
    pub skipped_rotations: usize,
    /// Guide paths in the overlay built by this run; 0 when none was built.
    pub overlay_paths: usize,
}

impl RunReport {
    /// Whether a pattern group now exists.
    pub fn expanded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Expanded { .. })
    }
}

/// The symmetry engine: one validated configuration, applied to documents on demand.
#[derive(Clone, Debug)]
pub struct Symmetry {
    cfg: SymmetryConfig,
}

struct Canonical {
    layer: Option<Layer>,
    copies: Option<CompositeGroup>,
    skipped_rotations: usize,
}

impl Symmetry {
    /// Validate `cfg` and build an engine around it.
    pub fn new(cfg: SymmetryConfig) -> KaleidoResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Active configuration.
    pub fn config(&self) -> &SymmetryConfig {
        &self.cfg
    }

    /// Run on the workspace's active document.
    pub fn run(&self, workspace: &mut Workspace) -> KaleidoResult<RunReport> {
        let doc = workspace.document_mut()?;
        self.run_document(doc)
    }

    /// Run on `doc` as one unit of work.
    ///
    /// Preconditions are checked before anything is touched. If a later step fails, `doc` is
    /// restored to its state before the call and the error is returned.
    #[tracing::instrument(skip_all, fields(document = doc.name()))]
    pub fn run_document(&self, doc: &mut Document) -> KaleidoResult<RunReport> {
        doc.canvas().ensure_supported_mode()?;

        let checkpoint = doc.clone();
        match doc.with_pixel_units(|doc| self.apply(doc)) {
            Ok(report) => {
                match &report.outcome {
                    RunOutcome::Expanded { group, sectors } => {
                        tracing::info!(group = %group, sectors, "pattern rebuilt");
                    }
                    RunOutcome::NothingToExpand(reason) => {
                        tracing::info!(?reason, "nothing to expand");
                    }
                }
                Ok(report)
            }
            Err(e) => {
                *doc = checkpoint;
                Err(e)
            }
        }
    }

    fn apply(&self, doc: &mut Document) -> KaleidoResult<RunReport> {
        let cfg = &self.cfg;
        let canvas = *doc.canvas();
        let params = SectorParams::resolve(cfg, &canvas);
        tracing::debug!(cx = params.pivot.x, cy = params.pivot.y, "pivot resolved");

        let overlay_paths = self.refresh_overlay(doc, &canvas);
        let source_created = doc.ensure_raster_layer(&cfg.source_layer)?;
        remove_group(doc, &cfg.fold_group);

        let mut report = RunReport {
            outcome: RunOutcome::NothingToExpand(EmptyReason::SourceEmpty),
            pivot: params.pivot,
            source_created,
            folded_copies: 0,
            skipped_rotations: 0,
            overlay_paths,
        };

        let canonical = self.canonicalize(doc, &params)?;
        match canonical {
            None => {
                remove_group(doc, &cfg.result_group);
            }
            Some(c) => {
                report.folded_copies = c.copies.as_ref().map_or(0, CompositeGroup::len);
                report.skipped_rotations = c.skipped_rotations;
                if cfg.keep_fold_group
                    && let Some(copies) = &c.copies
                {
                    self.keep_fold_copies(doc, copies, &params)?;
                }
                report.outcome = match c.layer {
                    None => {
                        remove_group(doc, &cfg.result_group);
                        RunOutcome::NothingToExpand(EmptyReason::NothingInWedge)
                    }
                    Some(layer) => {
                        let sectors = replace_group(
                            doc,
                            &cfg.result_group,
                            &cfg.source_layer,
                            |doc| {
                                Ok(Some(expand(
                                    doc.selection_mut(),
                                    layer,
                                    &params,
                                    &cfg.result_group,
                                )?))
                            },
                        )?
                        .unwrap_or(0);
                        RunOutcome::Expanded {
                            group: cfg.result_group.clone(),
                            sectors,
                        }
                    }
                };
            }
        }

        self.restore_editing_state(doc, &params)?;
        Ok(report)
    }

    /// Fold or clip the source into the canonical wedge. `None` means the source is empty.
    fn canonicalize(
        &self,
        doc: &mut Document,
        params: &SectorParams,
    ) -> KaleidoResult<Option<Canonical>> {
        let name = &self.cfg.source_layer;
        let (source, selection) = doc.layer_and_selection_mut(name).ok_or_else(|| {
            KaleidoError::raster(format!("source layer '{name}' vanished during the run"))
        })?;
        if !source.has_pixels() {
            return Ok(None);
        }

        let canonical = match self.cfg.fold_policy {
            FoldPolicy::Tolerant => {
                let folded = fold(selection, source, params, FOLDED_LAYER)?;
                Canonical {
                    layer: folded.canonical,
                    copies: Some(folded.copies),
                    skipped_rotations: folded.skipped_rotations,
                }
            }
            FoldPolicy::Strict => {
                enforce(selection, source, params)?;
                let layer = if source.has_pixels() {
                    Some(params.frame.lift(&source.duplicate(FOLDED_LAYER))?)
                } else {
                    None
                };
                Canonical {
                    layer,
                    copies: None,
                    skipped_rotations: 0,
                }
            }
        };
        Ok(Some(canonical))
    }

    /// Store the fold copies, cut back to the canvas, in a hidden group. An empty fold leaves
    /// no group behind.
    fn keep_fold_copies(
        &self,
        doc: &mut Document,
        copies: &CompositeGroup,
        params: &SectorParams,
    ) -> KaleidoResult<bool> {
        if copies.is_empty() {
            return Ok(false);
        }
        let mut kept = CompositeGroup::new(self.cfg.fold_group.as_str());
        kept.visible = false;
        for copy in copies.layers() {
            kept.push(params.frame.lower(copy)?);
        }
        doc.insert_group_above(&self.cfg.source_layer, kept);
        Ok(true)
    }

    fn refresh_overlay(&self, doc: &mut Document, canvas: &Canvas) -> usize {
        let cfg = &self.cfg;
        if cfg.show_overlay {
            let overlay = build_overlay(canvas, &cfg.overlay_options(), &cfg.overlay_name);
            let n = overlay.paths.len();
            doc.set_overlay(Some(overlay));
            return n;
        }
        if cfg.overlay_when_hidden == OverlayRetention::Remove && doc.set_overlay(None).is_some() {
            tracing::debug!("overlay removed");
        }
        0
    }

    fn restore_editing_state(&self, doc: &mut Document, params: &SectorParams) -> KaleidoResult<()> {
        let selection = doc.selection_mut();
        selection.deselect();
        if self.cfg.constrain_painting {
            selection.select(params.base_polygon().points(), SelectionMode::Replace)?;
        }
        doc.set_active_layer(self.cfg.source_layer.as_str());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/orchestrator.rs"]
mod tests;
