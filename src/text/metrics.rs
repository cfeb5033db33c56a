use std::collections::HashMap;

use crate::foundation::error::{VnframeError, VnframeResult};

/// Measures the advance width of a single-line string in a given font.
///
/// Layout only ever asks for widths; how glyphs are shaped is the implementor's business.
pub trait TextMeasure {
    /// Advance width in pixels of `text` set in `family` at `size_px`.
    fn measure(&mut self, family: &str, size_px: f32, text: &str) -> VnframeResult<f32>;
}

/// Deterministic metrics: every character advances by `size_px * advance_em`.
///
/// Used for headless layout and as the fallback when a font family has not been registered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of one character as a fraction of the font size.
    pub advance_em: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&mut self, _family: &str, size_px: f32, text: &str) -> VnframeResult<f32> {
        Ok(text.chars().count() as f32 * size_px * self.advance_em)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

struct RegisteredFamily {
    name: String,
    font: vello_cpu::peniko::FontData,
}

/// Shaped single-line text ready for glyph submission.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Distance from the layout top to the first baseline.
    pub(crate) baseline: f32,
}

/// Registry of the per-language dialogue fonts, keyed by family id (`{prefix}{lang}`).
///
/// Shaping goes through Parley; families that were never registered fall back to
/// [`MonospaceMeasure`] for metrics and are skipped when drawing.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<String, RegisteredFamily>,
    fallback: MonospaceMeasure,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Construct an empty font book with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            fallback: MonospaceMeasure::default(),
        }
    }

    /// Register raw font bytes under a family id.
    pub fn register(&mut self, family: impl Into<String>, font_bytes: Vec<u8>) -> VnframeResult<()> {
        let family = family.into();
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            VnframeError::asset(format!("no font families registered for '{family}'"))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| VnframeError::asset("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family, parley_name = %name, "registered font");
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.families
            .insert(family, RegisteredFamily { name, font });
        Ok(())
    }

    /// Return `true` when `family` has been registered.
    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Shape `text` as one unbroken line. Returns `None` for unregistered families.
    pub(crate) fn shape(
        &mut self,
        family: &str,
        size_px: f32,
        text: &str,
    ) -> VnframeResult<Option<ShapedText>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VnframeError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(reg) = self.families.get(family) else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(reg.name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        let baseline = layout
            .lines()
            .next()
            .map(|l| l.metrics().baseline)
            .unwrap_or(size_px);

        Ok(Some(ShapedText {
            layout,
            font: reg.font.clone(),
            baseline,
        }))
    }
}

impl TextMeasure for FontBook {
    fn measure(&mut self, family: &str, size_px: f32, text: &str) -> VnframeResult<f32> {
        match self.shape(family, size_px, text)? {
            Some(shaped) => Ok(shaped.layout.full_width()),
            None => self.fallback.measure(family, size_px, text),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
