use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let src = vec![0u8; 4];
    assert!(over_in_place(&mut dst, &src, 1.0).is_err());
}

#[test]
fn knock_out_zeroes_full_coverage_and_scales_partial() {
    let mut px = vec![200, 100, 50, 255, 200, 100, 50, 255, 200, 100, 50, 255];
    knock_out_in_place(&mut px, &[0, 255, 128]).unwrap();
    assert_eq!(&px[0..4], &[200, 100, 50, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(px[11], 127);
    assert!(px[8] < 200 && px[8] > 0);
}

#[test]
fn knock_out_rejects_wrong_coverage_length() {
    let mut px = vec![0u8; 8];
    assert!(knock_out_in_place(&mut px, &[0]).is_err());
}
