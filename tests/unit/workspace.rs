use super::*;
use crate::foundation::core::{Canvas, PixelBounds, Rgba8Premul};
use crate::raster::layer::Layer;

#[test]
fn empty_workspace_is_a_precondition_failure() {
    let mut ws = Workspace::default();
    let err = ws.document_mut().unwrap_err();
    assert_eq!(err.to_string(), "precondition failed: no document open");

    struct Never;
    impl BackupSink for Never {
        fn snapshot(&mut self, _: &Document) -> KaleidoResult<()> {
            panic!("must not be called without a document");
        }
    }
    assert!(ws.snapshot(&mut Never).is_err());
}

#[test]
fn names_are_sanitized() {
    assert_eq!(sanitize_name("My:Art*?.psd"), "My_Art__");
    assert_eq!(sanitize_name("a/b\\c.tar.png"), "a_b_c.tar");
    assert_eq!(sanitize_name("plain"), "plain");
    assert_eq!(sanitize_name(".hidden"), ".hidden");
    assert_eq!(sanitize_name(""), "untitled");
}

#[test]
fn backup_path_nests_by_document() {
    let b = PngBackup::new("backups");
    assert_eq!(
        b.path_for("Mandala.psd"),
        PathBuf::from("backups")
            .join("Mandala")
            .join("Mandala_autosave.png")
    );
}

#[test]
fn png_backup_overwrites_one_file() {
    let dir = PathBuf::from("target").join("unit_backup");
    let canvas = Canvas::new(6, 4).unwrap();
    let mut doc = Document::new("Snap:1.psd", canvas).unwrap();
    let mut l = Layer::new("L", &canvas);
    l.fill_rect(PixelBounds::new(0, 0, 2, 2), Rgba8Premul::opaque(200, 10, 10));
    doc.push_layer(l).unwrap();

    let mut ws = Workspace::with_document(doc);
    let mut sink = PngBackup::new(&dir);
    ws.snapshot(&mut sink).unwrap();
    ws.snapshot(&mut sink).unwrap();

    let path = sink.path_for("Snap:1.psd");
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (6, 4));
    assert_eq!(img.get_pixel(0, 0).0, [200, 10, 10, 255]);
    let files = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(files, 1);
}
