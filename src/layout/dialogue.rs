//! Placement of the speaker name and dialogue text for each screen type.
//!
//! Every [`DialogueType`] maps to a static [`DialogueStyle`] describing its frame art, how the
//! name is drawn, and how the body is aligned. Lines may carry ruby annotations; readings are
//! emitted before the line they sit over.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::cache::TextureKey;
use crate::compile::plan::{DrawOp, TextOp, TextStroke};
use crate::editor::form::FormState;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{VnframeError, VnframeResult};
use crate::layout::properties::TextProperties;
use crate::text::metrics::TextMeasure;
use crate::text::ruby::{RubySegment, parse_ruby, strip_ruby};

/// Size of ruby readings, independent of the line's font size.
pub const RUBY_SIZE_PX: f32 = 15.0;

/// Baseline of the caption divider rule.
pub const CAPTION_RULE_Y: f64 = 430.0;

/// Slant of the intro banners, in degrees (counter-clockwise on screen).
pub const INTRO_SLANT_DEG: f64 = -6.25;

const DIALOGUE_INK: Rgba8 = Rgba8::rgb(0x07, 0x17, 0x26);
const BOOK_INK: Rgba8 = Rgba8::rgb(0x41, 0x2c, 0x29);
const INTRO_INK: Rgba8 = Rgba8::rgb(0x33, 0x33, 0x33);

/// Screen layout of a dialogue frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DialogueType {
    /// Speaker name above a bottom dialogue box.
    #[default]
    Standard,
    /// Centered title with a divider and a centered body.
    Caption,
    /// Centered body over the caption bar.
    Narration,
    /// Centered body over a full-screen shade.
    Full,
    /// Centered body on a book page.
    Book,
    /// Slanted character name and title over the intro art.
    Intro,
}

impl DialogueType {
    /// Every dialogue type.
    pub const ALL: [DialogueType; 6] = [
        DialogueType::Standard,
        DialogueType::Caption,
        DialogueType::Narration,
        DialogueType::Full,
        DialogueType::Book,
        DialogueType::Intro,
    ];

    /// Form value.
    pub fn code(self) -> &'static str {
        match self {
            DialogueType::Standard => "standard",
            DialogueType::Caption => "caption",
            DialogueType::Narration => "narration",
            DialogueType::Full => "full",
            DialogueType::Book => "book",
            DialogueType::Intro => "intro",
        }
    }

    /// Layout rules for this type.
    pub fn style(self) -> &'static DialogueStyle {
        &STYLES[self as usize]
    }
}

impl fmt::Display for DialogueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DialogueType {
    type Err = VnframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialogueType::ALL
            .into_iter()
            .find(|t| t.code() == s)
            .ok_or_else(|| VnframeError::validation(format!("unknown dialogue type '{s}'")))
    }
}

/// How the speaker name is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameRule {
    /// Left-aligned at the speaker anchor, name size, white.
    Speaker,
    /// Centered at the title baseline, title size, with a divider rule.
    CaptionTitle,
    /// Right-aligned, slanted, outlined.
    IntroBanner,
    /// Not drawn.
    Hidden,
}

/// Vertical anchor of a centered text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockAnchor {
    /// The narration anchor from the language's text properties.
    Narration,
    /// Half the canvas height.
    ///
    /// The block height includes the font size, as for narration. Older book frames left the
    /// font size out and sat half a line lower.
    CanvasMiddle,
}

/// How the dialogue body is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyRule {
    /// Left-aligned at the dialogue anchor, one line height apart.
    Left,
    /// Horizontally centered lines starting at the caption baseline, caption size.
    Caption,
    /// Horizontally centered block, vertically centered on an anchor.
    Centered(BlockAnchor),
    /// The whole dialogue as one slanted title line.
    IntroTitle,
}

/// Static layout rules for one [`DialogueType`].
#[derive(Clone, Debug, PartialEq)]
pub struct DialogueStyle {
    /// Full-canvas art drawn before the layers.
    pub background: Option<TextureKey>,
    /// Bar art drawn after the layers. `None` means the localized skip overlay is the bar.
    pub bar: Option<TextureKey>,
    /// Layers cast a drop shadow.
    pub layer_shadow: bool,
    /// Speaker name rule.
    pub name: NameRule,
    /// Body rule.
    pub body: BodyRule,
    /// Body color.
    pub ink: Rgba8,
}

// Indexed by `DialogueType as usize`.
static STYLES: [DialogueStyle; 6] = [
    DialogueStyle {
        background: None,
        bar: Some(TextureKey::Bar),
        layer_shadow: false,
        name: NameRule::Speaker,
        body: BodyRule::Left,
        ink: DIALOGUE_INK,
    },
    DialogueStyle {
        background: None,
        bar: Some(TextureKey::Caption),
        layer_shadow: false,
        name: NameRule::CaptionTitle,
        body: BodyRule::Caption,
        ink: Rgba8::WHITE,
    },
    DialogueStyle {
        background: None,
        bar: Some(TextureKey::Caption),
        layer_shadow: false,
        name: NameRule::Hidden,
        body: BodyRule::Centered(BlockAnchor::Narration),
        ink: Rgba8::WHITE,
    },
    DialogueStyle {
        background: None,
        bar: Some(TextureKey::Fullscreen),
        layer_shadow: false,
        name: NameRule::Hidden,
        body: BodyRule::Centered(BlockAnchor::Narration),
        ink: Rgba8::WHITE,
    },
    DialogueStyle {
        background: Some(TextureKey::Book),
        bar: None,
        layer_shadow: false,
        name: NameRule::Hidden,
        body: BodyRule::Centered(BlockAnchor::CanvasMiddle),
        ink: BOOK_INK,
    },
    DialogueStyle {
        background: Some(TextureKey::IntroBack),
        bar: Some(TextureKey::IntroBar),
        layer_shadow: true,
        name: NameRule::IntroBanner,
        body: BodyRule::IntroTitle,
        ink: INTRO_INK,
    },
];

/// Per-frame inputs shared by every line.
struct LineCtx<'a, M: ?Sized> {
    measure: &'a mut M,
    family: &'a str,
}

impl<M: TextMeasure + ?Sized> LineCtx<'_, M> {
    fn width(&mut self, size_px: f32, text: &str) -> VnframeResult<f64> {
        Ok(f64::from(self.measure.measure(self.family, size_px, text)?))
    }

    /// Emit one line with its ruby readings, left edge at `start_x`, baseline at `baseline`.
    fn line(
        &mut self,
        out: &mut Vec<DrawOp>,
        line: &str,
        size_px: f32,
        start_x: f64,
        baseline: f64,
        ink: Rgba8,
    ) -> VnframeResult<()> {
        let mut prefix = String::new();
        for seg in parse_ruby(line) {
            if let RubySegment::Ruby { base, reading } = seg {
                let center =
                    start_x + self.width(size_px, &prefix)? + self.width(size_px, base)? / 2.0;
                let reading_x = center - self.width(RUBY_SIZE_PX, reading)? / 2.0;
                let reading_y = baseline - f64::from(size_px) + 2.0;
                out.push(DrawOp::Text(TextOp::fill(
                    reading,
                    self.family,
                    RUBY_SIZE_PX,
                    Point::new(reading_x, reading_y),
                    ink,
                )));
            }
            prefix.push_str(seg.visible());
        }
        out.push(DrawOp::Text(TextOp::fill(
            prefix,
            self.family,
            size_px,
            Point::new(start_x, baseline),
            ink,
        )));
        Ok(())
    }

    fn centered_x(&mut self, canvas: Canvas, size_px: f32, text: &str) -> VnframeResult<f64> {
        Ok((canvas.w() - self.width(size_px, text)?) / 2.0)
    }
}

/// First baseline of a block of `lines` lines centered on `anchor`.
pub fn centered_block_start(anchor: f64, size_px: f32, line_height: f64, lines: usize) -> f64 {
    let extra = lines.saturating_sub(1) as f64;
    anchor - (f64::from(size_px) + extra * line_height) / 2.0
}

/// Rotation used by the intro banners, pivoting on the canvas right edge at `y`.
pub fn intro_slant(canvas: Canvas, y: f64) -> Affine {
    Affine::rotate_about(INTRO_SLANT_DEG.to_radians(), Point::new(canvas.w(), y))
}

/// Lay out the speaker name and dialogue body of `form` for `canvas`.
///
/// `family` is the font family id for the form's language. Returns text ops (and the caption
/// rule) in paint order.
#[tracing::instrument(skip(measure, props, form), fields(kind = %form.dialogue_type, lines = tracing::field::Empty))]
pub fn layout_dialogue<M: TextMeasure + ?Sized>(
    measure: &mut M,
    props: &TextProperties,
    canvas: Canvas,
    family: &str,
    form: &FormState,
) -> VnframeResult<Vec<DrawOp>> {
    let style = form.dialogue_type.style();
    let lines = form.lines();
    tracing::Span::current().record("lines", lines.len());

    let mut cx = LineCtx { measure, family };
    let mut out = Vec::new();

    match style.name {
        NameRule::Speaker => out.push(DrawOp::Text(TextOp::fill(
            form.speaker.as_str(),
            family,
            props.name_size,
            Point::new(props.speaker_x_pos, props.speaker_y_pos),
            Rgba8::WHITE,
        ))),
        NameRule::CaptionTitle => {
            let x = cx.centered_x(canvas, props.title_size, &form.speaker)?;
            out.push(DrawOp::Text(TextOp::fill(
                form.speaker.as_str(),
                family,
                props.title_size,
                Point::new(x, props.title_y_pos),
                Rgba8::WHITE,
            )));
            out.push(DrawOp::FillRect {
                rect: Rect::new(0.0, CAPTION_RULE_Y, canvas.w(), CAPTION_RULE_Y + 1.0),
                color: Rgba8::WHITE,
            });
        }
        NameRule::IntroBanner => {
            let size = props.intro_name_size;
            let x = canvas.w() - cx.width(size, &form.speaker)? - props.intro_x_pos;
            let y = props.intro_name_y_pos;
            out.push(DrawOp::Text(TextOp {
                transform: intro_slant(canvas, y),
                stroke: Some(TextStroke {
                    color: INTRO_INK,
                    width: 8.0,
                    miter_limit: 2.0,
                }),
                ..TextOp::fill(form.speaker.as_str(), family, size, Point::new(x, y), Rgba8::WHITE)
            }));
        }
        NameRule::Hidden => {}
    }

    match style.body {
        BodyRule::Left => {
            for (i, line) in lines.iter().enumerate() {
                let y = props.dialogue_y_pos + i as f64 * props.line_height;
                cx.line(&mut out, line, props.dialogue_size, props.dialogue_x_pos, y, style.ink)?;
            }
        }
        BodyRule::Caption => {
            let size = props.caption_size;
            for (i, line) in lines.iter().enumerate() {
                let x = cx.centered_x(canvas, size, &strip_ruby(line))?;
                let y = props.caption_y_pos + i as f64 * props.line_height;
                cx.line(&mut out, line, size, x, y, style.ink)?;
            }
        }
        BodyRule::Centered(anchor) => {
            let size = props.dialogue_size;
            let lh = props.narration_line_height;
            let anchor_y = match anchor {
                BlockAnchor::Narration => props.narration_y_pos,
                BlockAnchor::CanvasMiddle => canvas.h() / 2.0,
            };
            let start = centered_block_start(anchor_y, size, lh, lines.len());
            for (i, line) in lines.iter().enumerate() {
                let x = cx.centered_x(canvas, size, &strip_ruby(line))?;
                cx.line(&mut out, line, size, x, start + i as f64 * lh, style.ink)?;
            }
        }
        BodyRule::IntroTitle => {
            let size = props.intro_title_size;
            let title = lines.join(" ");
            let x = canvas.w() - cx.width(size, &title)? - props.intro_x_pos;
            let y = props.intro_title_y_pos;
            out.push(DrawOp::Text(TextOp {
                transform: intro_slant(canvas, y),
                ..TextOp::fill(title, family, size, Point::new(x, y), style.ink)
            }));
        }
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/dialogue.rs"]
mod tests;
