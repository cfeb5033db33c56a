use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;

use crate::foundation::error::{VnframeError, VnframeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

struct TextureData {
    id: u64,
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cheap to clone; clones share pixels and identity.
#[derive(Clone)]
pub struct Texture {
    inner: Arc<TextureData>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.inner.id)
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish()
    }
}

impl Texture {
    /// Wrap row-major premultiplied RGBA8 pixels.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> VnframeResult<Self> {
        if width == 0 || height == 0 {
            return Err(VnframeError::asset("texture dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(VnframeError::asset("texture dimensions must fit in u16"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(VnframeError::asset(format!(
                "texture byte len mismatch: expected {expected}, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            inner: Arc::new(TextureData {
                id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
                width,
                height,
                rgba8_premul,
            }),
        })
    }

    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> VnframeResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// A texture filled with one straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> VnframeResult<Self> {
        let n = (width as usize).saturating_mul(height as usize);
        let mut px = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            px.extend_from_slice(&rgba);
        }
        Self::from_straight(width, height, px)
    }

    /// Process-unique identity, shared by clones.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Premultiplied RGBA8 pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.inner.rgba8_premul
    }

    /// Return `true` when both handles point at the same decoded image.
    pub fn same_as(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a premultiplied [`Texture`].
pub fn decode_image(bytes: &[u8]) -> VnframeResult<Texture> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_straight(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/texture.rs"]
mod tests;
