//! Rasterization through `vello_cpu`: anti-aliased path coverage and transformed pixmaps.

use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Point, Rgba8Premul};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::raster::composite::unpremultiply;

/// Rasterize `path` filled with `color` into a fresh premultiplied RGBA8 buffer.
pub(crate) fn rasterize_path(
    path: &BezPath,
    width: u32,
    height: u32,
    color: Rgba8Premul,
) -> KaleidoResult<Vec<u8>> {
    let (w, h) = surface_size(width, height)?;

    let [r, g, b, a] = unpremul(color);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.fill_path(&bezpath_to_cpu(path));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Draw the premultiplied `width` x `height` buffer `src` under `transform` onto a fresh
/// transparent surface of the same size.
pub(crate) fn draw_transformed(
    src: &[u8],
    width: u32,
    height: u32,
    transform: Affine,
    quality: vello_cpu::peniko::ImageQuality,
) -> KaleidoResult<Vec<u8>> {
    let (w, h) = surface_size(width, height)?;
    let pixmap = pixmap_from_premul_bytes(src, w, h)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler {
            quality,
            ..vello_cpu::peniko::ImageSampler::default()
        },
    };

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut out);
    Ok(out.data_as_u8_slice().to_vec())
}

fn surface_size(width: u32, height: u32) -> KaleidoResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KaleidoError::raster("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KaleidoError::raster("surface height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(bytes: &[u8], w: u16, h: u16) -> KaleidoResult<vello_cpu::Pixmap> {
    if bytes.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(KaleidoError::raster("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Closed polygon path through `points`.
pub(crate) fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

fn unpremul(c: Rgba8Premul) -> [u8; 4] {
    unpremultiply(c.to_array())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
