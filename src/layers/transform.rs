//! Placement of a transformed image about a pivot.

use crate::assets::texture::Texture;
use crate::compile::plan::{DropShadow, ImageOp};
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::layers::stack::{Layer, LayerTransform};

/// Draw op for `texture` placed by `transform` around `center`.
///
/// The pivot is `center` displaced by the offsets (y is up-positive in the editor). The image
/// is scaled about its own center, mirrored when `flip_x` is set, then rotated clockwise by
/// `rotation_deg` about the pivot. Non-finite inputs pass through; the backend skips them.
pub fn image_draw(
    texture: &Texture,
    transform: &LayerTransform,
    center: Point,
    shadow: Option<DropShadow>,
) -> ImageOp {
    let pivot = Point::new(
        center.x + transform.offset_x,
        center.y - transform.offset_y,
    );
    let w = f64::from(texture.width()) * transform.scale;
    let h = f64::from(texture.height()) * transform.scale;
    let dest = Rect::new(pivot.x - w / 2.0, pivot.y - h / 2.0, pivot.x + w / 2.0, pivot.y + h / 2.0);

    let mut local = Affine::IDENTITY;
    if transform.flip_x {
        local = local * Affine::scale_non_uniform(-1.0, 1.0);
    }
    if transform.rotation_deg != 0.0 {
        local = local * Affine::rotate(transform.rotation_deg.to_radians());
    }
    let to_pivot = Vec2::new(pivot.x, pivot.y);
    let about_pivot = Affine::translate(to_pivot) * local * Affine::translate(-to_pivot);

    ImageOp {
        texture: texture.clone(),
        transform: about_pivot,
        dest,
        opacity: transform.opacity,
        shadow,
    }
}

/// Draw op for a stack layer centered on `center`. Layers without an image draw nothing.
pub fn layer_draw(layer: &Layer, center: Point, drop_shadow: bool) -> Option<ImageOp> {
    let texture = layer.image.as_ref()?;
    let shadow = drop_shadow.then_some(DropShadow::INTRO);
    Some(image_draw(texture, &layer.transform, center, shadow))
}

#[cfg(test)]
#[path = "../../tests/unit/layers/transform.rs"]
mod tests;
