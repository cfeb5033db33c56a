use std::cell::RefCell;
use std::collections::HashMap;

use crate::assets::loader::AssetLoader;
use crate::assets::texture::{Texture, decode_image};
use crate::editor::form::{Emotion, EmotionSide};
use crate::foundation::error::VnframeResult;
use crate::layout::properties::Language;

/// Named frame art.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Standard dialogue bar.
    Bar,
    /// Caption and narration bar.
    Caption,
    /// Book page background.
    Book,
    /// Full-screen narration bar.
    Fullscreen,
    /// Intro background.
    IntroBack,
    /// Intro bar.
    IntroBar,
    /// Localized skip button overlay.
    Skip(Language),
    /// Emotion balloon.
    Emotion {
        /// Balloon art name.
        emotion: Emotion,
        /// Anchor side.
        side: EmotionSide,
    },
}

impl TextureKey {
    /// Relative asset path under the asset root.
    pub fn path(&self) -> String {
        match self {
            TextureKey::Bar => "images/bar.png".to_owned(),
            TextureKey::Caption => "images/caption.png".to_owned(),
            TextureKey::Book => "images/book.png".to_owned(),
            TextureKey::Fullscreen => "images/fullscreen.png".to_owned(),
            TextureKey::IntroBack => "images/introBack.png".to_owned(),
            TextureKey::IntroBar => "images/introBar.png".to_owned(),
            TextureKey::Skip(lang) => format!("images/skip{}.png", skip_suffix(*lang)),
            TextureKey::Emotion { emotion, side } => {
                format!("images/{}_{}.png", emotion.as_str(), side.code())
            }
        }
    }
}

// Both Chinese variants share one skip overlay.
fn skip_suffix(lang: Language) -> &'static str {
    match lang {
        Language::En => "en_us",
        Language::Ja => "jp",
        Language::ZhHant | Language::ZhHans => "cn",
    }
}

/// Decoded frame art, loaded lazily and kept for the life of the session.
///
/// Entries are written at most once; a key that is already present is never reloaded.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: RefCell<HashMap<TextureKey, Texture>>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached texture for `key`, without loading.
    pub fn get(&self, key: &TextureKey) -> Option<Texture> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Return `true` when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Insert a texture directly (for pre-decoded art).
    pub fn insert(&self, key: TextureKey, texture: Texture) {
        self.entries.borrow_mut().insert(key, texture);
    }

    /// Return the cached texture for `key`, loading and decoding it on a miss.
    pub async fn get_or_load<L: AssetLoader>(
        &self,
        loader: &L,
        key: &TextureKey,
    ) -> VnframeResult<Texture> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }

        let path = key.path();
        let bytes = loader.load_bytes(&path).await.inspect_err(|e| {
            tracing::warn!(path = %path, error = %e, "texture load failed");
        })?;
        let decoded = decode_image(&bytes)?;

        // Another pass may have filled the slot while this one was awaiting.
        let texture = self
            .entries
            .borrow_mut()
            .entry(key.clone())
            .or_insert(decoded)
            .clone();
        tracing::debug!(path = %path, w = texture.width(), h = texture.height(), "texture cached");
        Ok(texture)
    }

    /// Load every key in `keys`, stopping at the first failure.
    pub async fn preload<L: AssetLoader>(
        &self,
        loader: &L,
        keys: &[TextureKey],
    ) -> VnframeResult<()> {
        for key in keys {
            self.get_or_load(loader, key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
