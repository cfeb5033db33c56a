use serde::Serialize;

use crate::assets::texture::Texture;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};

#[derive(Clone, Debug)]
/// Backend-agnostic draw list for one dialogue screen.
///
/// Ops are painted in order onto a transparent canvas. Every op carries its own transform,
/// opacity, and shadow, so no drawing state carries over from one op to the next.
pub struct ScenePlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

impl ScenePlan {
    /// Empty plan for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    /// Text ops in paint order.
    pub fn text_ops(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Image ops in paint order.
    pub fn image_ops(&self) -> impl Iterator<Item = &ImageOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image(i) => Some(i),
            _ => None,
        })
    }
}

#[derive(Clone, Debug)]
/// Draw operation emitted by the composer and the dialogue layout.
pub enum DrawOp {
    Image(ImageOp),
    FillRect { rect: Rect, color: Rgba8 },
    Text(TextOp),
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Hard drop shadow: a tinted copy of the image offset in device space.
pub struct DropShadow {
    pub color: Rgba8,
    pub offset: Vec2,
}

impl DropShadow {
    /// Shadow cast by layers on the intro screen.
    pub const INTRO: DropShadow = DropShadow {
        color: Rgba8::rgba(0, 0, 0, 64),
        offset: Vec2::new(20.0, 20.0),
    };
}

#[derive(Clone, Debug)]
/// A texture scaled into `dest`, then mapped through `transform`.
pub struct ImageOp {
    pub texture: Texture,
    pub transform: Affine,
    pub dest: Rect,
    pub opacity: f32,
    pub shadow: Option<DropShadow>,
}

impl ImageOp {
    /// Full mapping from texture pixel space to canvas space.
    pub fn image_transform(&self) -> Affine {
        let sx = self.dest.width() / f64::from(self.texture.width());
        let sy = self.dest.height() / f64::from(self.texture.height());
        self.transform
            * Affine::translate(Vec2::new(self.dest.x0, self.dest.y0))
            * Affine::scale_non_uniform(sx, sy)
    }

    /// Return `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.opacity.is_finite()
            && self.image_transform().as_coeffs().iter().all(|c| c.is_finite())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
/// Outline drawn underneath a text fill.
pub struct TextStroke {
    pub color: Rgba8,
    pub width: f64,
    pub miter_limit: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// A single line of text anchored at its left baseline point.
pub struct TextOp {
    pub text: String,
    pub family: String,
    pub size_px: f32,
    pub origin: Point,
    pub color: Rgba8,
    #[serde(skip)]
    pub transform: Affine,
    pub stroke: Option<TextStroke>,
}

impl TextOp {
    /// Plain fill with no transform or outline.
    pub fn fill(
        text: impl Into<String>,
        family: impl Into<String>,
        size_px: f32,
        origin: Point,
        color: Rgba8,
    ) -> Self {
        Self {
            text: text.into(),
            family: family.into(),
            size_px,
            origin,
            color,
            transform: Affine::IDENTITY,
            stroke: None,
        }
    }
}
