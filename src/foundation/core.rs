use crate::foundation::error::{KaleidoError, KaleidoResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Largest canvas edge the rasterizer accepts.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Document color mode. Only full-color and grayscale raster modes can be processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// RGB color.
    #[default]
    Rgb,
    /// Single-channel grayscale.
    Grayscale,
    /// CMYK color.
    Cmyk,
    /// CIE Lab color.
    Lab,
    /// Palette-indexed color.
    Indexed,
    /// One bit per pixel.
    Bitmap,
}

impl ColorMode {
    /// Whether pixels in this mode can be resampled and composited.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Indexed | Self::Bitmap)
    }
}

/// Measurement unit preference of a document.
///
/// Canvas geometry is always stored in pixels; the preference only affects reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulerUnits {
    /// Device pixels.
    #[default]
    Pixels,
    /// Inches at the canvas resolution.
    Inches,
    /// Centimeters at the canvas resolution.
    Centimeters,
    /// Millimeters at the canvas resolution.
    Millimeters,
    /// Typographic points (1/72 inch).
    Points,
}

/// Canvas dimensions (in pixels) and pixel format metadata.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color mode of the document.
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Pixels per inch, used to convert to physical units.
    #[serde(default = "default_ppi")]
    pub resolution_ppi: f64,
}

fn default_ppi() -> f64 {
    72.0
}

impl Canvas {
    /// Create an RGB canvas at 72 ppi.
    pub fn new(width: u32, height: u32) -> KaleidoResult<Self> {
        Self::with_mode(width, height, ColorMode::Rgb)
    }

    /// Create a canvas with an explicit color mode.
    pub fn with_mode(width: u32, height: u32, color_mode: ColorMode) -> KaleidoResult<Self> {
        let canvas = Self {
            width,
            height,
            color_mode,
            resolution_ppi: default_ppi(),
        };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Check dimensions and resolution.
    pub fn validate(&self) -> KaleidoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(KaleidoError::validation("canvas width and height must be > 0"));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(KaleidoError::validation(format!(
                "canvas {}x{} exceeds the {MAX_CANVAS_EDGE}px edge limit",
                self.width, self.height
            )));
        }
        if !self.resolution_ppi.is_finite() || self.resolution_ppi <= 0.0 {
            return Err(KaleidoError::validation("canvas resolution must be > 0"));
        }
        Ok(())
    }

    /// Fail with a precondition error when the color mode cannot be processed.
    pub fn ensure_supported_mode(&self) -> KaleidoResult<()> {
        if self.color_mode.is_supported() {
            Ok(())
        } else {
            Err(KaleidoError::precondition(format!(
                "color mode {:?} is not supported; convert to RGB or grayscale first",
                self.color_mode
            )))
        }
    }

    /// Length of the canvas diagonal in pixels.
    pub fn diagonal(&self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba_len(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Convert a pixel length into `units` at this canvas' resolution.
    pub fn length_in(&self, px: f64, units: RulerUnits) -> f64 {
        let inches = px / self.resolution_ppi;
        match units {
            RulerUnits::Pixels => px,
            RulerUnits::Inches => inches,
            RulerUnits::Centimeters => inches * 2.54,
            RulerUnits::Millimeters => inches * 25.4,
            RulerUnits::Points => inches * 72.0,
        }
    }
}

/// Integer pixel rectangle, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelBounds {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl PixelBounds {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self {
        x0: 0,
        y0: 0,
        x1: 0,
        y1: 0,
    };

    /// Build bounds, returning [`PixelBounds::EMPTY`] for zero-area input.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        if x1 <= x0 || y1 <= y0 {
            Self::EMPTY
        } else {
            Self { x0, y0, x1, y1 }
        }
    }

    /// Zero-area bounds mean "no pixels".
    pub fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Smallest bounds containing both.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Continuous rectangle covering the same pixels.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Geometric center of the covered pixels.
    pub fn center(self) -> Point {
        self.to_rect().center()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Byte order used by layer buffers.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
