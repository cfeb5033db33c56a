//! Off-screen portrait assembly: base image plus optional face and mouth parts.
//!
//! Part picks can arrive faster than their images load. Every pick bumps a generation counter
//! and only the result carrying the latest generation is applied.

use crate::assets::catalog::PortraitParts;
use crate::assets::loader::AssetLoader;
use crate::assets::texture::{Texture, decode_image};
use crate::foundation::core::Vec2;
use crate::foundation::error::VnframeResult;
use crate::foundation::math::premul_over_px;

/// Edge length of the square portrait buffer.
pub const PORTRAIT_SIZE: u32 = 1024;

/// Token identifying one portrait request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Parts chosen for the current character.
#[derive(Clone, Debug, PartialEq)]
pub struct PortraitSelection {
    /// Base image path.
    pub base: String,
    /// Face part path.
    pub face: Option<String>,
    /// Mouth part path.
    pub mouth: Option<String>,
    /// Offset shared by the face and mouth parts.
    pub offset: Vec2,
}

/// A portrait build captured at request time.
#[derive(Clone, Debug)]
pub struct PortraitRequest {
    generation: Generation,
    selection: PortraitSelection,
}

/// A finished portrait build, tagged with the generation that started it.
#[derive(Debug)]
pub struct PortraitResult {
    generation: Generation,
    texture: VnframeResult<Texture>,
}

impl PortraitResult {
    /// Generation of the request that produced this result.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl PortraitRequest {
    /// Generation this request belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Selection captured by this request.
    pub fn selection(&self) -> &PortraitSelection {
        &self.selection
    }

    /// Load every part and assemble the portrait.
    #[tracing::instrument(skip(self, loader), fields(generation = self.generation.0))]
    pub async fn run<L: AssetLoader>(self, loader: &L) -> PortraitResult {
        let texture = self.build(loader).await;
        if let Err(e) = &texture {
            tracing::warn!(error = %e, "portrait build failed");
        }
        PortraitResult {
            generation: self.generation,
            texture,
        }
    }

    async fn build<L: AssetLoader>(&self, loader: &L) -> VnframeResult<Texture> {
        let sel = &self.selection;
        let base = decode_image(&loader.load_bytes(&sel.base).await?)?;
        let face = match &sel.face {
            Some(p) => Some(decode_image(&loader.load_bytes(p).await?)?),
            None => None,
        };
        let mouth = match &sel.mouth {
            Some(p) => Some(decode_image(&loader.load_bytes(p).await?)?),
            None => None,
        };
        compose_portrait(&base, face.as_ref(), mouth.as_ref(), sel.offset)
    }
}

/// Current portrait selection and request generation.
#[derive(Debug, Default)]
pub struct PortraitState {
    latest: u64,
    selection: Option<PortraitSelection>,
}

impl PortraitState {
    /// No character selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    pub fn selection(&self) -> Option<&PortraitSelection> {
        self.selection.as_ref()
    }

    /// Switch character; face and mouth are cleared.
    pub fn select_character(&mut self, parts: &PortraitParts) -> PortraitRequest {
        let sel = PortraitSelection {
            base: parts.base(),
            face: None,
            mouth: None,
            offset: parts.offset,
        };
        self.selection = Some(sel.clone());
        self.issue(sel)
    }

    /// Pick a face part. Returns `None` when no character is selected.
    pub fn set_face(&mut self, path: Option<String>) -> Option<PortraitRequest> {
        let sel = self.selection.as_mut()?;
        sel.face = path;
        let sel = sel.clone();
        Some(self.issue(sel))
    }

    /// Pick a mouth part. Returns `None` when no character is selected.
    pub fn set_mouth(&mut self, path: Option<String>) -> Option<PortraitRequest> {
        let sel = self.selection.as_mut()?;
        sel.mouth = path;
        let sel = sel.clone();
        Some(self.issue(sel))
    }

    /// Clear the selection; any in-flight request becomes stale.
    pub fn reset(&mut self) {
        self.selection = None;
        self.latest += 1;
    }

    /// Return `true` when `generation` is the latest issued.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }

    /// Unwrap a result if it is still current. Stale results yield `Ok(None)`.
    pub fn accept(&self, result: PortraitResult) -> VnframeResult<Option<Texture>> {
        if !self.is_current(result.generation) {
            tracing::debug!(
                generation = result.generation.0,
                latest = self.latest,
                "discarding stale portrait"
            );
            return Ok(None);
        }
        result.texture.map(Some)
    }

    fn issue(&mut self, selection: PortraitSelection) -> PortraitRequest {
        self.latest += 1;
        PortraitRequest {
            generation: Generation(self.latest),
            selection,
        }
    }
}

fn blit_over(dst: &mut [u8], src: &Texture, at_x: i64, at_y: i64) {
    let size = i64::from(PORTRAIT_SIZE);
    let sw = i64::from(src.width());
    let sh = i64::from(src.height());
    let data = src.data();
    for sy in 0..sh {
        let dy = at_y + sy;
        if !(0..size).contains(&dy) {
            continue;
        }
        for sx in 0..sw {
            let dx = at_x + sx;
            if !(0..size).contains(&dx) {
                continue;
            }
            let si = ((sy * sw + sx) * 4) as usize;
            let di = ((dy * size + dx) * 4) as usize;
            let s = [data[si], data[si + 1], data[si + 2], data[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&premul_over_px(d, s));
        }
    }
}

/// Assemble a portrait in a transparent [`PORTRAIT_SIZE`]² buffer.
///
/// The base is drawn at the origin; face then mouth at `offset` (rounded to whole pixels).
/// Anything outside the buffer is clipped.
pub fn compose_portrait(
    base: &Texture,
    face: Option<&Texture>,
    mouth: Option<&Texture>,
    offset: Vec2,
) -> VnframeResult<Texture> {
    let mut buf = vec![0u8; (PORTRAIT_SIZE as usize) * (PORTRAIT_SIZE as usize) * 4];
    blit_over(&mut buf, base, 0, 0);
    let (ox, oy) = (offset.x.round() as i64, offset.y.round() as i64);
    for part in [face, mouth].into_iter().flatten() {
        blit_over(&mut buf, part, ox, oy);
    }
    Texture::from_premul(PORTRAIT_SIZE, PORTRAIT_SIZE, buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/portrait.rs"]
mod tests;
