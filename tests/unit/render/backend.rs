use super::*;

#[test]
fn pixel_lookup_is_bounds_checked() {
    let mut f = FrameRGBA::transparent(Canvas::new(2, 2).unwrap());
    f.data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(f.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(2, 0), None);
}

#[test]
fn straight_conversion_unpremultiplies() {
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    assert_eq!(f.to_straight_rgba8().unwrap(), vec![128, 0, 0, 128]);

    let bad = FrameRGBA {
        data: vec![0; 3],
        ..f
    };
    assert!(bad.to_straight_rgba8().is_err());
}
