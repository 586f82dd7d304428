use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst`, both tightly packed premultiplied RGBA8 of equal size.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> KaleidoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KaleidoError::raster(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Undo premultiplication, rounding to nearest.
pub(crate) fn unpremultiply(px: PremulRgba8) -> PremulRgba8 {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let a16 = u16::from(a);
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

/// Scale every channel of each pixel by `255 - coverage`, zeroing fully covered pixels.
pub(crate) fn knock_out_in_place(dst: &mut [u8], coverage: &[u8]) -> KaleidoResult<()> {
    if dst.len() != coverage.len() * 4 {
        return Err(KaleidoError::raster(
            "knock_out_in_place expects one coverage byte per rgba8 pixel",
        ));
    }
    for (px, &c) in dst.chunks_exact_mut(4).zip(coverage) {
        match c {
            0 => {}
            255 => px.fill(0),
            _ => {
                let keep = 255u16 - u16::from(c);
                for v in px.iter_mut() {
                    *v = mul_div255_u8(u16::from(*v), keep);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
