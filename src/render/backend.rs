use crate::compile::plan::ScenePlan;
use crate::foundation::core::Canvas;
use crate::foundation::error::{VnframeError, VnframeResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::text::metrics::FontBook;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** unless `premultiplied` says otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent frame covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.byte_len()],
            premultiplied: true,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> VnframeResult<Vec<u8>> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(VnframeError::render(format!(
                "frame byte len mismatch: expected {expected}, got {}",
                self.data.len()
            )));
        }
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        Ok(out)
    }
}

/// A renderer that rasterizes a [`ScenePlan`] and rescales frames for preview.
pub trait RenderBackend {
    /// Execute every op of `plan` onto a fresh canvas and read back the frame.
    fn render_plan(&mut self, plan: &ScenePlan, fonts: &mut FontBook) -> VnframeResult<FrameRGBA>;

    /// Uniformly scale `frame` to fit inside `target`, centered, aspect preserved.
    fn scale_to_fit(&mut self, frame: &FrameRGBA, target: Canvas) -> VnframeResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
