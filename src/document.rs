//! In-memory raster document: a canvas, a stack of layers and groups, one selection, and at
//! most one guide overlay.

use crate::foundation::core::{Canvas, RulerUnits};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::geometry::overlay::GuideOverlay;
use crate::raster::composite::{over_in_place, unpremultiply};
use crate::raster::layer::Layer;
use crate::raster::mask::RegionMask;

/// A flattened document as RGBA8 pixels.
///
/// Frames are premultiplied alpha unless `premultiplied` says otherwise.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> KaleidoResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let out = unpremultiply([px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&out);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| KaleidoError::raster("frame buffer does not match its dimensions"))
    }
}

/// An ordered set of sibling layers produced together.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeGroup {
    /// Group name. One name identifies one logical role.
    pub name: String,
    /// Whether the group contributes to [`Document::flatten`].
    pub visible: bool,
    layers: Vec<Layer>,
}

impl CompositeGroup {
    /// An empty, visible group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            layers: Vec::new(),
        }
    }

    /// Add `layer` on top of the group.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the group holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Composite all raster layers bottom to top into a single layer named `name`.
    ///
    /// Later layers draw over earlier ones. Returns `None` when there is nothing to merge.
    pub fn merge(&self, name: &str) -> KaleidoResult<Option<Layer>> {
        let mut rasters = self.layers.iter().filter(|l| l.is_raster());
        let Some(first) = rasters.next() else {
            return Ok(None);
        };
        let mut out = Layer::from_rgba8_premul(
            name,
            first.width(),
            first.height(),
            vec![0; first.data().len()],
        )?;
        for layer in std::iter::once(first).chain(rasters) {
            over_in_place(out.data_mut(), layer.data(), layer.opacity)?;
        }
        Ok(Some(out))
    }
}

/// One entry of the document stack.
#[derive(Clone, Debug, PartialEq)]
pub enum StackEntry {
    /// A top-level layer.
    Layer(Layer),
    /// A named group of layers.
    Group(CompositeGroup),
}

impl StackEntry {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Self::Layer(l) => &l.name,
            Self::Group(g) => &g.name,
        }
    }
}

/// A raster document.
///
/// The stack is ordered bottom to top. Layer and group lookups match names exactly and only
/// consider top-level entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    name: String,
    canvas: Canvas,
    stack: Vec<StackEntry>,
    selection: RegionMask,
    overlay: Option<GuideOverlay>,
    active_layer: Option<String>,
    ruler_units: RulerUnits,
}

impl Document {
    /// An empty document.
    pub fn new(name: impl Into<String>, canvas: Canvas) -> KaleidoResult<Self> {
        canvas.validate()?;
        Ok(Self {
            name: name.into(),
            canvas,
            stack: Vec::new(),
            selection: RegionMask::new(canvas.width, canvas.height),
            overlay: None,
            active_layer: None,
            ruler_units: RulerUnits::default(),
        })
    }

    /// Document name, e.g. the file it was opened from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canvas geometry and pixel format.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Stack entries bottom to top.
    pub fn entries(&self) -> &[StackEntry] {
        &self.stack
    }

    /// Add `layer` on top of the stack.
    pub fn push_layer(&mut self, layer: Layer) -> KaleidoResult<()> {
        if layer.width() != self.canvas.width || layer.height() != self.canvas.height {
            return Err(KaleidoError::validation(format!(
                "layer '{}' is {}x{} but the canvas is {}x{}",
                layer.name,
                layer.width(),
                layer.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.stack.push(StackEntry::Layer(layer));
        Ok(())
    }

    /// Top-level layer named `name`.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.stack.iter().find_map(|e| match e {
            StackEntry::Layer(l) if l.name == name => Some(l),
            _ => None,
        })
    }

    /// Mutable top-level layer named `name`.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.stack.iter_mut().find_map(|e| match e {
            StackEntry::Layer(l) if l.name == name => Some(l),
            _ => None,
        })
    }

    /// The layer named `name` together with the document selection.
    pub fn layer_and_selection_mut(
        &mut self,
        name: &str,
    ) -> Option<(&mut Layer, &mut RegionMask)> {
        let layer = self.stack.iter_mut().find_map(|e| match e {
            StackEntry::Layer(l) if l.name == name => Some(l),
            _ => None,
        })?;
        Some((layer, &mut self.selection))
    }

    /// Make sure a raster layer named `name` exists, creating an empty one on top if absent.
    ///
    /// Returns whether the layer was created.
    pub fn ensure_raster_layer(&mut self, name: &str) -> KaleidoResult<bool> {
        match self.layer(name) {
            Some(l) if l.is_raster() => Ok(false),
            Some(_) => Err(KaleidoError::precondition(format!(
                "layer '{name}' exists but is not a raster layer"
            ))),
            None => {
                let layer = Layer::new(name, &self.canvas);
                self.stack.push(StackEntry::Layer(layer));
                Ok(true)
            }
        }
    }

    /// Group named `name`.
    pub fn group(&self, name: &str) -> Option<&CompositeGroup> {
        self.stack.iter().find_map(|e| match e {
            StackEntry::Group(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    /// Number of groups named `name`.
    pub fn group_count(&self, name: &str) -> usize {
        self.stack
            .iter()
            .filter(|e| matches!(e, StackEntry::Group(g) if g.name == name))
            .count()
    }

    /// Remove every group named `name`; returns how many were removed.
    pub fn remove_groups(&mut self, name: &str) -> usize {
        let before = self.stack.len();
        self.stack
            .retain(|e| !matches!(e, StackEntry::Group(g) if g.name == name));
        before - self.stack.len()
    }

    /// Insert `group` directly above the entry named `anchor`, or on top if there is none.
    pub fn insert_group_above(&mut self, anchor: &str, group: CompositeGroup) {
        let idx = self
            .stack
            .iter()
            .position(|e| e.name() == anchor)
            .map_or(self.stack.len(), |i| i + 1);
        self.stack.insert(idx, StackEntry::Group(group));
    }

    /// Active selection.
    pub fn selection(&self) -> &RegionMask {
        &self.selection
    }

    /// Mutable active selection.
    pub fn selection_mut(&mut self) -> &mut RegionMask {
        &mut self.selection
    }

    /// Guide overlay, if any.
    pub fn overlay(&self) -> Option<&GuideOverlay> {
        self.overlay.as_ref()
    }

    /// Replace the guide overlay; returns the previous one.
    pub fn set_overlay(&mut self, overlay: Option<GuideOverlay>) -> Option<GuideOverlay> {
        std::mem::replace(&mut self.overlay, overlay)
    }

    /// Name of the layer edits apply to.
    pub fn active_layer(&self) -> Option<&str> {
        self.active_layer.as_deref()
    }

    /// Target subsequent edits at the layer named `name`.
    pub fn set_active_layer(&mut self, name: impl Into<String>) {
        self.active_layer = Some(name.into());
    }

    /// Measurement unit preference.
    pub fn ruler_units(&self) -> RulerUnits {
        self.ruler_units
    }

    /// Change the measurement unit preference.
    pub fn set_ruler_units(&mut self, units: RulerUnits) {
        self.ruler_units = units;
    }

    /// Run `f` with the unit preference switched to pixels, then restore the previous one.
    pub fn with_pixel_units<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.ruler_units, RulerUnits::Pixels);
        let out = f(self);
        self.ruler_units = saved;
        out
    }

    /// Composite all visible layers bottom to top. Guides never contribute.
    pub fn flatten(&self) -> KaleidoResult<FrameRGBA> {
        let mut data = vec![0u8; self.canvas.rgba_len()];
        for entry in &self.stack {
            match entry {
                StackEntry::Layer(l) => composite_layer(&mut data, l)?,
                StackEntry::Group(g) if g.visible => {
                    for l in &g.layers {
                        composite_layer(&mut data, l)?;
                    }
                }
                StackEntry::Group(_) => {}
            }
        }
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn composite_layer(dst: &mut [u8], layer: &Layer) -> KaleidoResult<()> {
    if !layer.visible || !layer.is_raster() {
        return Ok(());
    }
    over_in_place(dst, layer.data(), layer.opacity)
}

#[cfg(test)]
#[path = "../tests/unit/document/document.rs"]
mod tests;
