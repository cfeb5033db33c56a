use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{VnframeError, VnframeResult};
use crate::layout::dialogue::DialogueType;
use crate::layout::properties::Language;

/// Which side of the screen an emotion balloon sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionSide {
    /// Left side (texture suffix `l`).
    #[default]
    #[serde(rename = "l")]
    Left,
    /// Right side (texture suffix `r`).
    #[serde(rename = "r")]
    Right,
}

impl EmotionSide {
    /// Texture suffix.
    pub fn code(self) -> &'static str {
        match self {
            EmotionSide::Left => "l",
            EmotionSide::Right => "r",
        }
    }
}

impl FromStr for EmotionSide {
    type Err = VnframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l" => Ok(EmotionSide::Left),
            "r" => Ok(EmotionSide::Right),
            other => Err(VnframeError::validation(format!(
                "unknown emotion side '{other}'"
            ))),
        }
    }
}

/// Name of an emotion balloon texture, e.g. `"surprise"`. `"none"` is not a valid name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Emotion(String);

impl Emotion {
    /// Validate an emotion name. It becomes part of an asset path, so it must be a plain
    /// file-name fragment.
    pub fn new(name: impl Into<String>) -> VnframeResult<Self> {
        let name = name.into();
        if name.is_empty() || name == "none" {
            return Err(VnframeError::validation("emotion name must not be empty or 'none'"));
        }
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(VnframeError::validation(format!(
                "emotion name '{name}' must not contain path separators"
            )));
        }
        Ok(Self(name))
    }

    /// Parse a form value where `"none"` (or empty) means no balloon.
    pub fn parse_optional(value: &str) -> VnframeResult<Option<Self>> {
        match value {
            "" | "none" => Ok(None),
            v => Self::new(v).map(Some),
        }
    }

    /// Emotion name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Emotion {
    type Error = VnframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Emotion> for String {
    fn from(value: Emotion) -> Self {
        value.0
    }
}

/// Selected emotion balloon with its side and user offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionChoice {
    /// Balloon art.
    pub emotion: Emotion,
    /// Anchor side.
    #[serde(default)]
    pub side: EmotionSide,
    /// Horizontal offset from the anchor (right-positive).
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset from the anchor (up-positive).
    #[serde(default)]
    pub offset_y: f64,
}

/// Everything the dialogue form contributes to a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    /// Speaker name; also names the exported file.
    pub speaker: String,
    /// Dialogue text. Lines are separated by `\n` and may carry `(base){reading}` annotations.
    pub dialogue: String,
    /// Screen layout.
    pub dialogue_type: DialogueType,
    /// Text language.
    pub language: Language,
    /// Emotion balloon, if any.
    pub emotion: Option<EmotionChoice>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            speaker: String::new(),
            dialogue: String::new(),
            dialogue_type: DialogueType::Standard,
            language: Language::default(),
            emotion: None,
        }
    }
}

impl FormState {
    /// Dialogue split into display lines.
    pub fn lines(&self) -> Vec<&str> {
        self.dialogue.split('\n').collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/form.rs"]
mod tests;
