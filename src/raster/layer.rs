use crate::foundation::core::{BezPath, Canvas, PixelBounds, Point, Rgba8Premul};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::raster::composite::{over_in_place, unpremultiply};
use crate::raster::fill::rasterize_path;

/// What a layer holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Plain raster surface. The only kind that can be masked or rotated.
    #[default]
    Raster,
    /// Parametric adjustment without its own pixels.
    Adjustment,
}

/// A named raster surface, normally the size of its canvas.
///
/// Pixels are premultiplied RGBA8, tightly packed, row-major. Duplicates are deep copies.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Layer name. Lookups in a [`Document`](crate::Document) match it exactly.
    pub name: String,
    /// Whether the layer contributes to [`Document::flatten`](crate::Document::flatten).
    pub visible: bool,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
    kind: LayerKind,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Layer {
    /// A transparent raster layer covering `canvas`.
    pub fn new(name: impl Into<String>, canvas: &Canvas) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            kind: LayerKind::Raster,
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba_len()],
        }
    }

    /// An adjustment layer. It has no pixel payload.
    pub fn adjustment(name: impl Into<String>, canvas: &Canvas) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            kind: LayerKind::Adjustment,
            width: canvas.width,
            height: canvas.height,
            data: Vec::new(),
        }
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_rgba8_premul(
        name: impl Into<String>,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> KaleidoResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| KaleidoError::raster("layer buffer size overflow"))?;
        if data.len() != expected {
            return Err(KaleidoError::raster(format!(
                "layer buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            kind: LayerKind::Raster,
            width,
            height,
            data,
        })
    }

    /// Import a straight-alpha image, premultiplying at ingest.
    pub fn from_rgba_image(name: impl Into<String>, img: &image::RgbaImage) -> KaleidoResult<Self> {
        let mut data = Vec::with_capacity(img.as_raw().len());
        for px in img.pixels() {
            let [r, g, b, a] = px.0;
            data.extend_from_slice(&Rgba8Premul::from_straight_rgba(r, g, b, a).to_array());
        }
        Self::from_rgba8_premul(name, img.width(), img.height(), data)
    }

    /// Export as a straight-alpha image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width, self.height);
        if self.data.is_empty() {
            return out;
        }
        for (dst, src) in out.pixels_mut().zip(self.data.chunks_exact(4)) {
            dst.0 = unpremultiply([src[0], src[1], src[2], src[3]]);
        }
        out
    }

    /// Layer kind.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Only raster layers carry pixels that can be masked or transformed.
    pub fn is_raster(&self) -> bool {
        self.kind == LayerKind::Raster
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes (empty for adjustment layers).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height || self.data.is_empty() {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Tight bounds of all pixels with non-zero alpha.
    pub fn bounds(&self) -> PixelBounds {
        if self.data.is_empty() {
            return PixelBounds::EMPTY;
        }
        let w = self.width as usize;
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
        for (row_idx, row) in self.data.chunks_exact(w * 4).enumerate() {
            let first = row.chunks_exact(4).position(|px| px[3] != 0);
            let Some(first) = first else {
                continue;
            };
            let last = row
                .chunks_exact(4)
                .rposition(|px| px[3] != 0)
                .unwrap_or(first);
            let y = row_idx as u32;
            x0 = x0.min(first as u32);
            x1 = x1.max(last as u32 + 1);
            y0 = y0.min(y);
            y1 = y + 1;
        }
        if x0 == u32::MAX {
            PixelBounds::EMPTY
        } else {
            PixelBounds::new(x0, y0, x1, y1)
        }
    }

    /// Whether any pixel has non-zero alpha.
    pub fn has_pixels(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] != 0)
    }

    /// Alpha-weighted center of the layer content.
    pub fn alpha_centroid(&self) -> Option<Point> {
        let w = self.width as usize;
        let (mut sx, mut sy, mut sw) = (0.0f64, 0.0f64, 0.0f64);
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let a = f64::from(px[3]);
            sx += ((i % w) as f64 + 0.5) * a;
            sy += ((i / w) as f64 + 0.5) * a;
            sw += a;
        }
        (sw > 0.0).then(|| Point::new(sx / sw, sy / sw))
    }

    /// Deep copy under a new name.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy into a larger transparent surface with `margin_x` columns added on each side and
    /// `margin_y` rows added above and below.
    pub fn padded(&self, margin_x: u32, margin_y: u32) -> KaleidoResult<Self> {
        let width = self
            .width
            .checked_add(margin_x.saturating_mul(2))
            .ok_or_else(|| KaleidoError::raster("padded layer width overflows"))?;
        let height = self
            .height
            .checked_add(margin_y.saturating_mul(2))
            .ok_or_else(|| KaleidoError::raster("padded layer height overflows"))?;
        let mut out = self.with_surface(width, height);
        if self.data.is_empty() {
            return Ok(out);
        }
        out.data = vec![0; width as usize * height as usize * 4];
        let row_len = self.width as usize * 4;
        for (y, row) in self.data.chunks_exact(row_len).enumerate() {
            let start = ((y + margin_y as usize) * width as usize + margin_x as usize) * 4;
            out.data[start..start + row_len].copy_from_slice(row);
        }
        Ok(out)
    }

    /// The pixels inside `rect` as a new layer; `rect` must lie within the surface.
    pub fn cropped(&self, rect: PixelBounds) -> KaleidoResult<Self> {
        if rect.is_empty() || rect.x1 > self.width || rect.y1 > self.height {
            return Err(KaleidoError::raster(format!(
                "crop {rect:?} is outside the {}x{} layer '{}'",
                self.width, self.height, self.name
            )));
        }
        let mut out = self.with_surface(rect.width(), rect.height());
        if self.data.is_empty() {
            return Ok(out);
        }
        out.data.reserve(rect.width() as usize * rect.height() as usize * 4);
        for y in rect.y0..rect.y1 {
            let start = (y as usize * self.width as usize + rect.x0 as usize) * 4;
            out.data
                .extend_from_slice(&self.data[start..start + rect.width() as usize * 4]);
        }
        Ok(out)
    }

    fn with_surface(&self, width: u32, height: u32) -> Self {
        Self {
            name: self.name.clone(),
            visible: self.visible,
            opacity: self.opacity,
            kind: self.kind,
            width,
            height,
            data: Vec::new(),
        }
    }

    /// Zero every pixel, alpha included.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite the pixels inside `rect` (clipped to the surface) with `color`.
    pub fn fill_rect(&mut self, rect: PixelBounds, color: Rgba8Premul) {
        if self.data.is_empty() {
            return;
        }
        let px = color.to_array();
        let x1 = rect.x1.min(self.width);
        let y1 = rect.y1.min(self.height);
        for y in rect.y0..y1 {
            let row = y as usize * self.width as usize;
            for x in rect.x0..x1 {
                let i = (row + x as usize) * 4;
                self.data[i..i + 4].copy_from_slice(&px);
            }
        }
    }

    /// Paint `path` in `color` over the current content, anti-aliased.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8Premul) -> KaleidoResult<()> {
        if !self.is_raster() {
            return Err(KaleidoError::validation(format!(
                "cannot paint into non-raster layer '{}'",
                self.name
            )));
        }
        let paint = rasterize_path(path, self.width, self.height, color)?;
        over_in_place(&mut self.data, &paint, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/layer.rs"]
mod tests;
