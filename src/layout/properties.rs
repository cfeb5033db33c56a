use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VnframeError, VnframeResult};

/// Default font family prefix; the full family id is `{prefix}{language code}`.
pub const DEFAULT_FAMILY_PREFIX: &str = "dragalialost";

/// Supported text languages.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Language {
    /// English; the default language.
    #[default]
    #[serde(rename = "en")]
    En,
    /// Japanese.
    #[serde(rename = "ja")]
    Ja,
    /// Traditional Chinese.
    #[serde(rename = "zh-Hant")]
    ZhHant,
    /// Simplified Chinese.
    #[serde(rename = "zh-Hans")]
    ZhHans,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 4] = [
        Language::En,
        Language::Ja,
        Language::ZhHant,
        Language::ZhHans,
    ];

    /// Language code as used in font family ids and localization tables.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::ZhHant => "zh-Hant",
            Language::ZhHans => "zh-Hans",
        }
    }

    /// Return `true` for the default language, which needs no localized skip overlay.
    pub fn is_default(self) -> bool {
        self == Language::default()
    }

    /// Font family id for this language.
    pub fn font_family(self, prefix: &str) -> String {
        format!("{prefix}{}", self.code())
    }
}

impl FromStr for Language {
    type Err = VnframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| VnframeError::validation(format!("unknown language '{s}'")))
    }
}

/// UI strings the core surfaces to its collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizedStrings {
    /// Name of the seeded background layer.
    pub background: String,
    /// Name of the seeded portrait layer.
    pub portrait: String,
    /// Prefix for user-added layer names (`"{layer} {n}"`).
    pub layer: String,
    /// Label of the delete action.
    pub delete_layer: String,
    /// Message shown when deleting the last remaining layer.
    pub no_delete_base_layer: String,
    /// Label shown while a PNG export is being generated.
    pub generating: String,
    /// Label of the download action.
    pub download: String,
}

impl Default for LocalizedStrings {
    fn default() -> Self {
        Self {
            background: "Background".to_owned(),
            portrait: "Portrait".to_owned(),
            layer: "Layer".to_owned(),
            delete_layer: "Delete Layer".to_owned(),
            no_delete_base_layer: "Cannot delete base layer".to_owned(),
            generating: "Generating...".to_owned(),
            download: "Download".to_owned(),
        }
    }
}

/// Per-language font sizes, anchor positions, and line heights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    /// Speaker name size for the standard screen.
    pub name_size: f32,
    /// Caption title size.
    pub title_size: f32,
    /// Dialogue body size.
    pub dialogue_size: f32,
    /// Caption body size.
    pub caption_size: f32,
    /// Slanted intro name size.
    pub intro_name_size: f32,
    /// Slanted intro title size.
    pub intro_title_size: f32,

    /// Speaker name left edge.
    pub speaker_x_pos: f64,
    /// Speaker name baseline.
    pub speaker_y_pos: f64,
    /// Dialogue left edge for the standard screen.
    pub dialogue_x_pos: f64,
    /// Dialogue first baseline for the standard screen.
    pub dialogue_y_pos: f64,
    /// Caption title baseline.
    pub title_y_pos: f64,
    /// Caption body first baseline.
    pub caption_y_pos: f64,
    /// Vertical midpoint for narration and full-screen blocks.
    pub narration_y_pos: f64,
    /// Right margin of intro banners.
    pub intro_x_pos: f64,
    /// Intro name baseline (also its rotation pivot).
    pub intro_name_y_pos: f64,
    /// Intro title baseline (also its rotation pivot).
    pub intro_title_y_pos: f64,

    /// Line advance for standard and caption bodies.
    pub line_height: f64,
    /// Line advance for narration, full-screen, and book bodies.
    pub narration_line_height: f64,

    /// Localized UI strings.
    #[serde(default)]
    pub loc: LocalizedStrings,
}

impl TextProperties {
    fn latin() -> Self {
        Self {
            name_size: 36.0,
            title_size: 44.0,
            dialogue_size: 30.0,
            caption_size: 30.0,
            intro_name_size: 84.0,
            intro_title_size: 36.0,
            speaker_x_pos: 80.0,
            speaker_y_pos: 1024.0,
            dialogue_x_pos: 64.0,
            dialogue_y_pos: 1104.0,
            title_y_pos: 400.0,
            caption_y_pos: 490.0,
            narration_y_pos: 667.0,
            intro_x_pos: 60.0,
            intro_name_y_pos: 1060.0,
            intro_title_y_pos: 1150.0,
            line_height: 46.0,
            narration_line_height: 52.0,
            loc: LocalizedStrings::default(),
        }
    }

    fn cjk(loc: LocalizedStrings) -> Self {
        Self {
            name_size: 34.0,
            title_size: 42.0,
            dialogue_size: 28.0,
            caption_size: 28.0,
            intro_name_size: 80.0,
            intro_title_size: 34.0,
            line_height: 50.0,
            narration_line_height: 56.0,
            loc,
            ..Self::latin()
        }
    }
}

/// Localization table: one [`TextProperties`] record per language.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localization {
    languages: BTreeMap<Language, TextProperties>,
}

impl Default for Localization {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Localization {
    /// Built-in table covering every [`Language`].
    pub fn builtin() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert(Language::En, TextProperties::latin());
        languages.insert(
            Language::Ja,
            TextProperties::cjk(LocalizedStrings {
                background: "背景".to_owned(),
                portrait: "立ち絵".to_owned(),
                layer: "レイヤー".to_owned(),
                delete_layer: "レイヤー削除".to_owned(),
                no_delete_base_layer: "ベースレイヤーは削除できません".to_owned(),
                generating: "生成中...".to_owned(),
                download: "ダウンロード".to_owned(),
            }),
        );
        languages.insert(
            Language::ZhHant,
            TextProperties::cjk(LocalizedStrings {
                background: "背景".to_owned(),
                portrait: "立繪".to_owned(),
                layer: "圖層".to_owned(),
                delete_layer: "刪除圖層".to_owned(),
                no_delete_base_layer: "無法刪除基礎圖層".to_owned(),
                generating: "生成中...".to_owned(),
                download: "下載".to_owned(),
            }),
        );
        languages.insert(
            Language::ZhHans,
            TextProperties::cjk(LocalizedStrings {
                background: "背景".to_owned(),
                portrait: "立绘".to_owned(),
                layer: "图层".to_owned(),
                delete_layer: "删除图层".to_owned(),
                no_delete_base_layer: "无法删除基础图层".to_owned(),
                generating: "生成中...".to_owned(),
                download: "下载".to_owned(),
            }),
        );
        Self { languages }
    }

    /// Parse a localization table from a JSON reader (`{"en": {...}, "ja": {...}}`).
    pub fn from_reader<R: std::io::Read>(r: R) -> VnframeResult<Self> {
        let table: Self = serde_json::from_reader(r)
            .map_err(|e| VnframeError::serde(format!("parse localization JSON: {e}")))?;
        if table.languages.is_empty() {
            return Err(VnframeError::validation(
                "localization table must define at least one language",
            ));
        }
        Ok(table)
    }

    /// Parse a localization table from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VnframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VnframeError::validation(format!("open localization JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Text properties for `lang`.
    pub fn get(&self, lang: Language) -> VnframeResult<&TextProperties> {
        self.languages.get(&lang).ok_or_else(|| {
            VnframeError::validation(format!("no text properties for language '{}'", lang.code()))
        })
    }

    /// Languages present in the table, in stable order.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.languages.keys().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/properties.rs"]
mod tests;
