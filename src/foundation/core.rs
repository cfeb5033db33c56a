use crate::foundation::error::{VnframeError, VnframeResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Fixed editing resolution of the dialogue screen (portrait phone layout).
    pub const EDITOR: Canvas = Canvas {
        width: 750,
        height: 1334,
    };

    /// Default live preview resolution.
    pub const PREVIEW: Canvas = Canvas {
        width: 375,
        height: 667,
    };

    /// Create a validated canvas with non-zero dimensions that fit a CPU pixmap.
    pub fn new(width: u32, height: u32) -> VnframeResult<Self> {
        if width == 0 || height == 0 {
            return Err(VnframeError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(VnframeError::validation(
                "canvas dimensions must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// Canvas center point.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Canvas width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Canvas height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Size in bytes of an RGBA8 buffer covering the canvas.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
