use super::*;
use crate::layers::stack::LayerStack;

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

fn stack_with(w: u32, h: u32, t: LayerTransform) -> LayerStack {
    let mut s = LayerStack::new("Background", Some(Texture::solid(w, h, [1, 1, 1, 255]).unwrap()));
    s.active_mut().transform = t;
    s
}

#[test]
fn identity_layer_is_centered_at_natural_size() {
    let s = stack_with(200, 100, LayerTransform::default());
    let op = layer_draw(s.active(), Point::new(375.0, 667.0), false).unwrap();
    assert_eq!(op.dest, Rect::new(275.0, 617.0, 475.0, 717.0));
    assert_eq!(op.transform, Affine::IDENTITY);
    assert_eq!(op.opacity, 1.0);
    assert!(op.shadow.is_none());
    let m = op.image_transform();
    assert!(approx(m * Point::ORIGIN, Point::new(275.0, 617.0)));
    assert!(approx(m * Point::new(200.0, 100.0), Point::new(475.0, 717.0)));
}

#[test]
fn offsets_move_pivot_with_y_up() {
    let t = LayerTransform {
        offset_x: 10.0,
        offset_y: 30.0,
        scale: 2.0,
        ..LayerTransform::default()
    };
    let s = stack_with(10, 10, t);
    let op = layer_draw(s.active(), Point::new(100.0, 100.0), false).unwrap();
    assert_eq!(op.dest.center(), Point::new(110.0, 70.0));
    assert_eq!(op.dest.width(), 20.0);
}

#[test]
fn flip_mirrors_about_pivot() {
    let t = LayerTransform {
        flip_x: true,
        ..LayerTransform::default()
    };
    let s = stack_with(10, 10, t);
    let op = layer_draw(s.active(), Point::new(50.0, 50.0), false).unwrap();
    let m = op.image_transform();
    // Texture origin (top-left) lands on the right edge.
    assert!(approx(m * Point::ORIGIN, Point::new(55.0, 45.0)));
    assert!(approx(op.transform * Point::new(50.0, 50.0), Point::new(50.0, 50.0)));
}

#[test]
fn rotation_is_clockwise_about_pivot() {
    let t = LayerTransform {
        rotation_deg: 90.0,
        ..LayerTransform::default()
    };
    let s = stack_with(10, 10, t);
    let op = layer_draw(s.active(), Point::new(50.0, 50.0), false).unwrap();
    // A point right of the pivot rotates to below it in y-down space.
    assert!(approx(op.transform * Point::new(60.0, 50.0), Point::new(50.0, 60.0)));
}

#[test]
fn shadow_and_missing_image() {
    let s = stack_with(4, 4, LayerTransform::default());
    let op = layer_draw(s.active(), Point::ORIGIN, true).unwrap();
    assert_eq!(op.shadow, Some(DropShadow::INTRO));

    let empty = LayerStack::new("empty", None);
    assert!(layer_draw(empty.active(), Point::ORIGIN, true).is_none());
}

#[test]
fn nan_inputs_are_flagged_not_rejected() {
    let t = LayerTransform {
        offset_x: f64::NAN,
        ..LayerTransform::default()
    };
    let s = stack_with(4, 4, t);
    let op = layer_draw(s.active(), Point::ORIGIN, false).unwrap();
    assert!(!op.is_finite());
}
