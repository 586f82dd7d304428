use super::*;
use crate::engine::config::SymmetryConfig;
use crate::foundation::core::{Canvas, PixelBounds, Point, Rgba8Premul, Vec2};
use crate::geometry::wedge::WedgeSpec;

fn canvas() -> Canvas {
    Canvas::new(64, 64).unwrap()
}

fn direction(p: Point, pivot: Point) -> f64 {
    let a = (pivot.y - p.y).atan2(p.x - pivot.x).to_degrees();
    a.rem_euclid(360.0)
}

#[test]
fn sectors_land_in_their_wedges() {
    let params = SectorParams::resolve(&SymmetryConfig::default(), &canvas());
    let mut canonical = Layer::new("PAINT_FOLDED", &canvas());
    canonical.fill_rect(PixelBounds::new(14, 24, 18, 28), Rgba8Premul::opaque(255, 0, 0));
    let mut sel = RegionMask::new(64, 64);
    sel.select_all();

    let canonical = params.frame.lift(&canonical).unwrap();
    let group = expand(&mut sel, canonical, &params, "Mirrors").unwrap();
    assert!(!sel.is_active());
    assert_eq!(group.name, "Mirrors");
    assert_eq!(group.len(), 8);

    for (k, layer) in group.layers().iter().enumerate() {
        assert_eq!(layer.name, format!("Sector_{k}"));
        assert_eq!((layer.width(), layer.height()), (64, 64));
        let sector = WedgeSpec::default().sector(k as u32, 45.0);
        let c = layer.alpha_centroid().unwrap();
        let dir = direction(c, params.pivot);
        assert!(sector.contains_direction(dir), "k={k} dir={dir}");
    }
}

#[test]
fn empty_canonical_still_yields_full_group() {
    let params = SectorParams::resolve(&SymmetryConfig::default(), &canvas());
    let mut sel = RegionMask::new(64, 64);
    let canonical = params.frame.lift(&Layer::new("c", &canvas())).unwrap();
    let group = expand(&mut sel, canonical, &params, "Mirrors").unwrap();
    assert_eq!(group.len(), 8);
    assert!(group.layers().iter().all(|l| !l.has_pixels()));
}

#[test]
fn quarter_turn_pattern_is_exact() {
    let cfg = SymmetryConfig {
        fold_count: 4,
        base_wedge: WedgeSpec::new(180.0, 90.0).unwrap(),
        ..SymmetryConfig::default()
    };
    cfg.validate().unwrap();
    let params = SectorParams::resolve(&cfg, &Canvas::new(20, 20).unwrap());
    let mut canonical = Layer::new("c", &Canvas::new(20, 20).unwrap());
    canonical.fill_rect(PixelBounds::new(2, 4, 5, 6), Rgba8Premul::opaque(9, 9, 9));
    let mut sel = RegionMask::new(20, 20);

    let canonical = params.frame.lift(&canonical).unwrap();
    let group = expand(&mut sel, canonical, &params, "Mirrors").unwrap();
    let bounds: Vec<_> = group.layers().iter().map(Layer::bounds).collect();
    assert_eq!(
        bounds,
        [
            PixelBounds::new(2, 4, 5, 6),
            PixelBounds::new(4, 15, 6, 18),
            PixelBounds::new(15, 14, 18, 16),
            PixelBounds::new(14, 2, 16, 5),
        ]
    );
}

#[test]
fn content_beyond_the_canvas_rotates_back_in() {
    let params = SectorParams::resolve(&SymmetryConfig::default(), &canvas());
    // left of the canvas at 165 degrees; sector 1 carries it to 210
    let mut canonical = Layer::from_rgba8_premul(
        "PAINT_FOLDED",
        params.frame.width(),
        params.frame.height(),
        vec![0; params.frame.width() as usize * params.frame.height() as usize * 4],
    )
    .unwrap();
    let at = params.work_pivot() + Vec2::new(-34.0, -9.0);
    let (x, y) = (at.x as u32, at.y as u32);
    canonical.fill_rect(PixelBounds::new(x, y, x + 2, y + 2), Rgba8Premul::opaque(255, 0, 0));
    let mut sel = RegionMask::new(64, 64);

    let group = expand(&mut sel, canonical, &params, "Mirrors").unwrap();
    assert!(!group.layers()[0].has_pixels());
    let c = group.layers()[1].alpha_centroid().unwrap();
    let dir = direction(c, params.pivot);
    assert!((dir - 210.0).abs() < 3.0, "{c:?} at {dir}");
    assert!(c.x < 5.0, "{c:?}");
}

#[test]
fn canvas_sized_canonical_is_rejected() {
    let params = SectorParams::resolve(&SymmetryConfig::default(), &canvas());
    let mut sel = RegionMask::new(64, 64);
    let err = expand(&mut sel, Layer::new("c", &canvas()), &params, "Mirrors").unwrap_err();
    assert!(err.to_string().contains("working surface"), "{err}");
}
