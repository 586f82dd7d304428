use super::*;
use crate::foundation::core::{PixelBounds, Rgba8Premul};

fn doc() -> Document {
    Document::new("test.psd", Canvas::new(8, 8).unwrap()).unwrap()
}

fn painted(name: &str, rect: PixelBounds, color: Rgba8Premul) -> Layer {
    let mut l = Layer::new(name, &Canvas::new(8, 8).unwrap());
    l.fill_rect(rect, color);
    l
}

#[test]
fn ensure_raster_layer_creates_once() {
    let mut d = doc();
    assert!(d.ensure_raster_layer("PAINT").unwrap());
    assert!(!d.ensure_raster_layer("PAINT").unwrap());
    assert_eq!(d.entries().len(), 1);
    assert!(d.layer("PAINT").unwrap().is_raster());
    assert!(d.layer("paint").is_none());
}

#[test]
fn ensure_raster_layer_rejects_adjustments() {
    let mut d = doc();
    let canvas = *d.canvas();
    d.push_layer(Layer::adjustment("PAINT", &canvas)).unwrap();
    let err = d.ensure_raster_layer("PAINT").unwrap_err();
    assert!(err.to_string().starts_with("precondition failed:"));
}

#[test]
fn push_layer_checks_size() {
    let mut d = doc();
    let wrong = Layer::new("x", &Canvas::new(4, 4).unwrap());
    assert!(d.push_layer(wrong).is_err());
}

#[test]
fn groups_insert_above_anchor_and_remove_by_exact_name() {
    let mut d = doc();
    d.ensure_raster_layer("bottom").unwrap();
    d.ensure_raster_layer("top").unwrap();
    d.insert_group_above("bottom", CompositeGroup::new("Mirrors"));
    d.insert_group_above("missing", CompositeGroup::new("Other"));
    let names: Vec<_> = d.entries().iter().map(StackEntry::name).collect();
    assert_eq!(names, ["bottom", "Mirrors", "top", "Other"]);

    d.insert_group_above("top", CompositeGroup::new("Mirrors"));
    assert_eq!(d.group_count("Mirrors"), 2);
    assert_eq!(d.remove_groups("Mirror"), 0);
    assert_eq!(d.remove_groups("Mirrors"), 2);
    assert!(d.group("Mirrors").is_none());
    assert!(d.group("Other").is_some());
    assert_eq!(d.remove_groups("Mirrors"), 0);
}

#[test]
fn merge_draws_later_layers_on_top() {
    let mut g = CompositeGroup::new("g");
    assert!(g.merge("m").unwrap().is_none());
    g.push(painted("a", PixelBounds::new(0, 0, 4, 4), Rgba8Premul::opaque(255, 0, 0)));
    g.push(painted("b", PixelBounds::new(2, 2, 6, 6), Rgba8Premul::opaque(0, 0, 255)));
    let m = g.merge("m").unwrap().unwrap();
    assert_eq!(m.name, "m");
    assert_eq!(m.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(m.pixel(3, 3), Some([0, 0, 255, 255]));
    assert_eq!(m.bounds(), PixelBounds::new(0, 0, 6, 6));
}

#[test]
fn flatten_skips_hidden_entries() {
    let mut d = doc();
    d.push_layer(painted("base", PixelBounds::new(0, 0, 8, 8), Rgba8Premul::opaque(10, 20, 30)))
        .unwrap();
    let mut g = CompositeGroup::new("g");
    g.push(painted("x", PixelBounds::new(0, 0, 1, 1), Rgba8Premul::opaque(200, 0, 0)));
    g.visible = false;
    d.insert_group_above("base", g);
    let mut hidden = painted("h", PixelBounds::new(1, 1, 2, 2), Rgba8Premul::opaque(0, 200, 0));
    hidden.visible = false;
    d.push_layer(hidden).unwrap();

    let frame = d.flatten().unwrap();
    assert!(frame.premultiplied);
    assert_eq!(&frame.data[0..4], &[10, 20, 30, 255]);
    assert_eq!(&frame.data[(8 + 1) * 4..(8 + 1) * 4 + 4], &[10, 20, 30, 255]);
}

#[test]
fn frame_exports_straight_alpha() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let img = frame.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn with_pixel_units_restores_preference() {
    let mut d = doc();
    d.set_ruler_units(RulerUnits::Centimeters);
    let seen = d.with_pixel_units(|d| d.ruler_units());
    assert_eq!(seen, RulerUnits::Pixels);
    assert_eq!(d.ruler_units(), RulerUnits::Centimeters);

    let r: KaleidoResult<()> =
        d.with_pixel_units(|_| Err(KaleidoError::validation("boom")));
    assert!(r.is_err());
    assert_eq!(d.ruler_units(), RulerUnits::Centimeters);
}

#[test]
fn layer_and_selection_split_borrow() {
    let mut d = doc();
    d.ensure_raster_layer("L").unwrap();
    let (layer, sel) = d.layer_and_selection_mut("L").unwrap();
    sel.select_all();
    sel.clear_selected(layer).unwrap();
    assert!(d.selection().is_active());
    assert!(d.layer_and_selection_mut("nope").is_none());
}

#[test]
fn overlay_is_replaced_not_appended() {
    let mut d = doc();
    let o = GuideOverlay {
        name: "g".into(),
        paths: Vec::new(),
    };
    assert!(d.set_overlay(Some(o.clone())).is_none());
    assert_eq!(d.set_overlay(Some(o.clone())), Some(o));
    assert!(d.overlay().is_some());
}
