//! Remote art catalogs: background images and character portrait parts.
//!
//! Catalog documents are fetched through an [`AssetLoader`] by relative path. A catalog that
//! fails to load or parse is logged and treated as empty.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assets::loader::AssetLoader;
use crate::foundation::core::Vec2;
use crate::foundation::error::{VnframeError, VnframeResult};
use crate::layout::properties::Language;

/// Host serving the portrait catalog and part images.
pub const PORTRAIT_BASE_URL: &str = "https://dlportraits.space/";

/// Thumbnail endpoint for background art; the file name is appended.
pub const THUMBNAIL_URL: &str = "https://dragalialost.wiki/thumb.php?width=75&f=";

/// Relative path of the background catalog.
pub const BACKGROUND_CATALOG_PATH: &str = "data/background_data.json";

/// Relative path of the portrait directory catalog.
pub const PORTRAIT_DIRECTORY_PATH: &str = "portrait_output/localizedDirData.json";

/// Thumbnails shown per page of a background group.
pub const BACKGROUND_PAGE_SIZE: usize = 12;

async fn load_json<L, T>(loader: &L, path: &str) -> VnframeResult<T>
where
    L: AssetLoader,
    T: serde::de::DeserializeOwned,
{
    let bytes = loader.load_bytes(path).await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| VnframeError::serde(format!("parse catalog '{path}': {e}")))
}

/// One entry of the background catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundEntry {
    /// Group: `background`, `skybox`, `cloud`, `overlay`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Wiki file name, used for the thumbnail.
    pub file_name: String,
    /// Full-size image URL.
    pub url: String,
}

impl BackgroundEntry {
    /// Thumbnail URL for picker display.
    pub fn thumbnail_url(&self) -> String {
        format!("{THUMBNAIL_URL}{}", self.file_name)
    }
}

/// Background art grouped by kind, in catalog order within each group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackgroundCatalog {
    groups: BTreeMap<String, Vec<BackgroundEntry>>,
}

impl BackgroundCatalog {
    /// Group a flat list of entries by kind.
    pub fn from_entries(entries: impl IntoIterator<Item = BackgroundEntry>) -> Self {
        let mut groups: BTreeMap<String, Vec<BackgroundEntry>> = BTreeMap::new();
        for e in entries {
            groups.entry(e.kind.clone()).or_default().push(e);
        }
        Self { groups }
    }

    /// Parse the catalog JSON array `[{type, fileName, url}, ...]`.
    pub fn from_slice(bytes: &[u8]) -> VnframeResult<Self> {
        let entries: Vec<BackgroundEntry> = serde_json::from_slice(bytes)
            .map_err(|e| VnframeError::serde(format!("parse background catalog: {e}")))?;
        Ok(Self::from_entries(entries))
    }

    /// Load from [`BACKGROUND_CATALOG_PATH`]; failures give an empty catalog.
    pub async fn load<L: AssetLoader>(loader: &L) -> Self {
        match load_json::<_, Vec<BackgroundEntry>>(loader, BACKGROUND_CATALOG_PATH).await {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                tracing::warn!(error = %e, "background catalog unavailable");
                Self::default()
            }
        }
    }

    /// Group names in stable order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// All entries of a group (empty for unknown kinds).
    pub fn group(&self, kind: &str) -> &[BackgroundEntry] {
        self.groups.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Up to `size` entries of `kind` starting at `start`.
    pub fn page(&self, kind: &str, start: usize, size: usize) -> &[BackgroundEntry] {
        let g = self.group(kind);
        let start = start.min(g.len());
        let end = start.saturating_add(size).min(g.len());
        &g[start..end]
    }

    /// Start of the page after `start`; unchanged when `start` is already the last page.
    pub fn next_page(&self, kind: &str, start: usize, size: usize) -> usize {
        if start.saturating_add(size) >= self.group(kind).len() {
            start
        } else {
            start + size
        }
    }

    /// Start of the page before `start`, clamped at zero.
    pub fn prev_page(start: usize, size: usize) -> usize {
        start.saturating_sub(size)
    }

    /// Return `true` when no entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryDoc {
    file_list: BTreeMap<String, HashMap<String, String>>,
}

/// Characters with portrait art, with their display names per language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortraitDirectory {
    characters: BTreeMap<String, HashMap<String, String>>,
}

impl PortraitDirectory {
    /// Parse `localizedDirData.json` (`{"fileList": {id: {lang: name}}}`).
    pub fn from_slice(bytes: &[u8]) -> VnframeResult<Self> {
        let doc: DirectoryDoc = serde_json::from_slice(bytes)
            .map_err(|e| VnframeError::serde(format!("parse portrait directory: {e}")))?;
        Ok(Self {
            characters: doc.file_list,
        })
    }

    /// Load from [`PORTRAIT_DIRECTORY_PATH`]; failures give an empty directory.
    pub async fn load<L: AssetLoader>(loader: &L) -> Self {
        match load_json::<_, DirectoryDoc>(loader, PORTRAIT_DIRECTORY_PATH).await {
            Ok(doc) => Self {
                characters: doc.file_list,
            },
            Err(e) => {
                tracing::warn!(error = %e, "portrait directory unavailable");
                Self::default()
            }
        }
    }

    /// `(character id, display name)` pairs for `lang`; characters without a name in that
    /// language are skipped.
    pub fn entries(&self, lang: Language) -> impl Iterator<Item = (&str, &str)> {
        self.characters.iter().filter_map(move |(id, names)| {
            names.get(lang.code()).map(|n| (id.as_str(), n.as_str()))
        })
    }

    /// Character id whose display name in `lang` is exactly `name`.
    pub fn find_by_name(&self, lang: Language, name: &str) -> Option<&str> {
        self.entries(lang)
            .find(|(_, n)| *n == name)
            .map(|(id, _)| id)
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Return `true` when no characters were loaded.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartsData {
    #[serde(default)]
    face_parts: Vec<String>,
    #[serde(default)]
    mouth_parts: Vec<String>,
}

#[derive(Deserialize)]
struct PartOffset {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartsDoc {
    parts_data: PartsData,
    offset: PartOffset,
}

/// Interchangeable face and mouth parts of one character.
#[derive(Clone, Debug, PartialEq)]
pub struct PortraitParts {
    /// Character id.
    pub character: String,
    /// Face part image paths, relative to [`PORTRAIT_BASE_URL`].
    pub face_parts: Vec<String>,
    /// Mouth part image paths, relative to [`PORTRAIT_BASE_URL`].
    pub mouth_parts: Vec<String>,
    /// Pixel offset shared by every face and mouth part.
    pub offset: Vec2,
}

impl PortraitParts {
    /// Relative path of a character's part catalog.
    pub fn catalog_path(character: &str) -> String {
        format!("portrait_output/{character}/data.json")
    }

    /// Relative path of a character's base image.
    pub fn base_path(character: &str) -> String {
        format!("portrait_output/{character}/{character}_base.png")
    }

    /// Parse a character's `data.json`.
    pub fn from_slice(character: &str, bytes: &[u8]) -> VnframeResult<Self> {
        let doc: PartsDoc = serde_json::from_slice(bytes)
            .map_err(|e| VnframeError::serde(format!("parse portrait parts: {e}")))?;
        Ok(Self::from_doc(character, doc))
    }

    fn from_doc(character: &str, doc: PartsDoc) -> Self {
        let rel = |p: String| match p.strip_prefix("./") {
            Some(s) => s.to_owned(),
            None => p,
        };
        Self {
            character: character.to_owned(),
            face_parts: doc.parts_data.face_parts.into_iter().map(rel).collect(),
            mouth_parts: doc.parts_data.mouth_parts.into_iter().map(rel).collect(),
            offset: Vec2::new(doc.offset.x, doc.offset.y),
        }
    }

    /// Load a character's part catalog. Unlike the directory, a missing part catalog is an
    /// error: the portrait cannot be built without it.
    pub async fn load<L: AssetLoader>(loader: &L, character: &str) -> VnframeResult<Self> {
        let path = Self::catalog_path(character);
        let doc = load_json::<_, PartsDoc>(loader, &path)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "portrait parts unavailable"))?;
        Ok(Self::from_doc(character, doc))
    }

    /// Base image path for this character.
    pub fn base(&self) -> String {
        Self::base_path(&self.character)
    }
}

/// Absolute URL of a portrait asset path.
pub fn portrait_url(rel_path: &str) -> String {
    format!("{PORTRAIT_BASE_URL}{rel_path}")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
