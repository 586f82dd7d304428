use super::*;

#[test]
fn defaults_are_valid_eight_fold() {
    let c = SymmetryConfig::default();
    c.validate().unwrap();
    assert_eq!(c.step_degrees(), 45.0);
    assert_eq!(c.fold_policy, FoldPolicy::Tolerant);
    assert!(c.overlay_options().ring.is_none());
}

#[test]
fn json_fills_missing_keys_with_defaults() {
    let c = SymmetryConfig::from_json_str(
        r#"{ "fold_policy": "strict", "ring_enabled": true, "resample": "nearest" }"#,
    )
    .unwrap();
    assert_eq!(c.fold_policy, FoldPolicy::Strict);
    assert_eq!(c.resample, Resample::Nearest);
    assert_eq!(c.fold_count, 8);
    assert_eq!(c.source_layer, "PAINT_HERE");
    let ring = c.overlay_options().ring.unwrap();
    assert_eq!(ring.segments, 12);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SymmetryConfig::from_json_str(r#"{ "fold_cuont": 6 }"#).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn wedge_must_span_one_step() {
    let c = SymmetryConfig {
        fold_count: 6,
        ..SymmetryConfig::default()
    };
    assert!(c.validate().is_err());

    let c = SymmetryConfig {
        fold_count: 6,
        base_wedge: WedgeSpec::new(180.0, 120.0).unwrap(),
        ..SymmetryConfig::default()
    };
    c.validate().unwrap();
    assert_eq!(c.step_degrees(), 60.0);
}

#[test]
fn rejects_out_of_range_options() {
    let base = SymmetryConfig::default();
    let bad = [
        SymmetryConfig {
            fold_count: 1,
            ..base.clone()
        },
        SymmetryConfig {
            ring_scale: 1.0,
            ..base.clone()
        },
        SymmetryConfig {
            ring_segments: 2,
            ..base.clone()
        },
        SymmetryConfig {
            mask_radius_factor: 1.0,
            ..base.clone()
        },
        SymmetryConfig {
            overlay_radius_factor: f64::NAN,
            ..base.clone()
        },
        SymmetryConfig {
            result_group: String::new(),
            ..base.clone()
        },
        SymmetryConfig {
            fold_group: base.result_group.clone(),
            ..base.clone()
        },
        SymmetryConfig {
            source_layer: base.result_group.clone(),
            ..base.clone()
        },
    ];
    for c in bad {
        let err = c.validate().unwrap_err();
        assert!(err.to_string().starts_with("validation error:"), "{err}");
    }
}

#[test]
fn from_path_reports_missing_file() {
    let err = SymmetryConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open config JSON"));
}
