use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(4, 2).unwrap().byte_len(), 32);
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas::EDITOR.center();
    assert_eq!(c, Point::new(375.0, 667.0));
}

#[test]
fn premul_rounds_channels() {
    assert_eq!(Rgba8::rgb(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::rgba(255, 128, 0, 64).to_premul(), [64, 32, 0, 64]);
    assert_eq!(Rgba8::rgba(200, 200, 200, 0).to_premul(), [0, 0, 0, 0]);
}
