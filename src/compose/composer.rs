//! One composition pass: snapshot in, full frame and preview out.
//!
//! Paint order is fixed: type background art, layers in stack order, emotion balloon, bar,
//! localized skip overlay, dialogue text. A pass triggered while another is in flight is
//! dropped; the caller re-triggers once the running pass settles.

use std::cell::{Cell, RefCell};

use crate::{
    assets::cache::{TextureCache, TextureKey},
    assets::loader::AssetLoader,
    assets::texture::Texture,
    compile::plan::{DrawOp, ImageOp, ScenePlan},
    editor::form::{EmotionSide, FormState},
    foundation::core::{Affine, Canvas, Point, Rect},
    foundation::error::{VnframeError, VnframeResult},
    layers::stack::{Layer, LayerStack, LayerTransform},
    layers::transform::{image_draw, layer_draw},
    layout::dialogue::layout_dialogue,
    layout::properties::{DEFAULT_FAMILY_PREFIX, Language, Localization},
    render::backend::{FrameRGBA, RenderBackend},
    render::cpu::{CpuBackend, CpuBackendOpts},
    text::metrics::FontBook,
};

/// Distance of the emotion balloon anchor from its side of the canvas.
pub const EMOTION_SIDE_INSET: f64 = 180.0;

/// Vertical anchor of the emotion balloon.
pub const EMOTION_Y: f64 = 250.0;

/// Latch state of the composer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposeState {
    /// Ready to start a pass.
    #[default]
    Idle,
    /// A pass is in flight.
    Rendering,
}

/// Resets the latch on every exit path, including a dropped future.
struct LatchGuard<'a> {
    state: &'a Cell<ComposeState>,
}

impl<'a> LatchGuard<'a> {
    fn acquire(state: &'a Cell<ComposeState>) -> Option<Self> {
        if state.get() == ComposeState::Rendering {
            return None;
        }
        state.set(ComposeState::Rendering);
        Some(Self { state })
    }
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.state.set(ComposeState::Idle);
    }
}

/// Immutable copy of everything a pass reads.
#[derive(Clone, Debug)]
pub struct SceneSnapshot {
    /// Full-resolution canvas.
    pub canvas: Canvas,
    /// Preview surface.
    pub preview: Canvas,
    /// Dialogue form.
    pub form: FormState,
    /// Layers in paint order. Images are shared, not copied.
    pub layers: Vec<Layer>,
}

impl SceneSnapshot {
    /// Capture the current stack and form.
    pub fn capture(stack: &LayerStack, form: &FormState, canvas: Canvas, preview: Canvas) -> Self {
        Self {
            canvas,
            preview,
            form: form.clone(),
            layers: stack.as_slice().to_vec(),
        }
    }
}

/// Output of a completed pass.
#[derive(Clone, Debug)]
pub struct ComposedFrame {
    /// Full-resolution frame.
    pub frame: FrameRGBA,
    /// Frame scaled to fit the preview surface.
    pub preview: FrameRGBA,
}

/// Result of a compose trigger.
#[derive(Clone, Debug)]
pub enum ComposeOutcome {
    /// The pass ran to completion.
    Rendered(ComposedFrame),
    /// Another pass was in flight; nothing was drawn.
    Dropped,
}

impl ComposeOutcome {
    /// The composed frame, if the pass ran.
    pub fn rendered(self) -> Option<ComposedFrame> {
        match self {
            ComposeOutcome::Rendered(f) => Some(f),
            ComposeOutcome::Dropped => None,
        }
    }
}

/// Frame art a pass needs, in paint order.
pub fn frame_textures(form: &FormState) -> Vec<TextureKey> {
    let style = form.dialogue_type.style();
    let mut keys = Vec::with_capacity(4);
    keys.extend(style.background.clone());
    if let Some(e) = &form.emotion {
        keys.push(TextureKey::Emotion {
            emotion: e.emotion.clone(),
            side: e.side,
        });
    }
    keys.extend(style.bar.clone());
    if style.bar.is_none() || !form.language.is_default() {
        keys.push(TextureKey::Skip(form.language));
    }
    keys
}

/// Composer configuration.
#[derive(Clone, Debug)]
pub struct ComposerOpts {
    /// Font family prefix; families are `{prefix}{language code}`.
    pub family_prefix: String,
    /// Raster backend options.
    pub backend: CpuBackendOpts,
}

impl Default for ComposerOpts {
    fn default() -> Self {
        Self {
            family_prefix: DEFAULT_FAMILY_PREFIX.to_owned(),
            backend: CpuBackendOpts::default(),
        }
    }
}

/// Draws dialogue screens, one pass at a time.
pub struct Composer {
    state: Cell<ComposeState>,
    textures: TextureCache,
    fonts: RefCell<FontBook>,
    backend: RefCell<CpuBackend>,
    localization: Localization,
    family_prefix: String,
}

impl Composer {
    /// Create a composer.
    pub fn new(localization: Localization, opts: ComposerOpts) -> Self {
        Self {
            state: Cell::new(ComposeState::Idle),
            textures: TextureCache::new(),
            fonts: RefCell::new(FontBook::new()),
            backend: RefCell::new(CpuBackend::new(opts.backend)),
            localization,
            family_prefix: opts.family_prefix,
        }
    }

    /// Current latch state.
    pub fn state(&self) -> ComposeState {
        self.state.get()
    }

    /// Frame art cache.
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Localization table in use.
    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    /// Font family id for `lang`.
    pub fn family(&self, lang: Language) -> String {
        lang.font_family(&self.family_prefix)
    }

    /// Register font bytes for `lang`.
    pub fn register_font(&self, lang: Language, bytes: Vec<u8>) -> VnframeResult<()> {
        let family = self.family(lang);
        self.fonts.borrow_mut().register(family, bytes)
    }

    /// Load `fonts/{family}.ttf` for each language. Missing fonts are logged and fall back to
    /// monospace metrics (text in that language is not drawn). Returns how many loaded.
    pub async fn load_fonts<L: AssetLoader>(&self, loader: &L, langs: &[Language]) -> usize {
        let mut loaded = 0;
        for &lang in langs {
            let path = format!("fonts/{}.ttf", self.family(lang));
            let result = match loader.load_bytes(&path).await {
                Ok(bytes) => self.register_font(lang, bytes),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(path = %path, error = %e, "font unavailable"),
            }
        }
        loaded
    }

    /// Run one pass over `snapshot`.
    ///
    /// Returns [`ComposeOutcome::Dropped`] without doing anything when a pass is already in
    /// flight. An asset failure aborts the pass with an error and leaves the composer idle.
    #[tracing::instrument(
        skip_all,
        fields(kind = %snapshot.form.dialogue_type, lang = snapshot.form.language.code())
    )]
    pub async fn compose<L: AssetLoader>(
        &self,
        loader: &L,
        snapshot: SceneSnapshot,
    ) -> VnframeResult<ComposeOutcome> {
        let Some(_latch) = LatchGuard::acquire(&self.state) else {
            tracing::debug!("compose trigger dropped: pass in flight");
            return Ok(ComposeOutcome::Dropped);
        };

        self.textures
            .preload(loader, &frame_textures(&snapshot.form))
            .await?;

        let plan = self.plan(&snapshot)?;
        let mut fonts = self.fonts.borrow_mut();
        let mut backend = self.backend.borrow_mut();
        let frame = backend.render_plan(&plan, &mut fonts)?;
        let preview = backend.scale_to_fit(&frame, snapshot.preview)?;
        tracing::debug!(ops = plan.ops.len(), "pass complete");

        Ok(ComposeOutcome::Rendered(ComposedFrame { frame, preview }))
    }

    /// Build the draw list for `snapshot`. Frame art must already be cached.
    pub fn plan(&self, snapshot: &SceneSnapshot) -> VnframeResult<ScenePlan> {
        let form = &snapshot.form;
        let canvas = snapshot.canvas;
        let style = form.dialogue_type.style();
        let mut plan = ScenePlan::new(canvas);

        if let Some(key) = &style.background {
            plan.ops.push(DrawOp::Image(full_canvas(self.cached(key)?)));
        }

        let center = canvas.center();
        plan.ops.extend(
            snapshot
                .layers
                .iter()
                .filter_map(|l| layer_draw(l, center, style.layer_shadow))
                .map(DrawOp::Image),
        );

        if let Some(e) = &form.emotion {
            let key = TextureKey::Emotion {
                emotion: e.emotion.clone(),
                side: e.side,
            };
            let anchor_x = match e.side {
                EmotionSide::Left => EMOTION_SIDE_INSET,
                EmotionSide::Right => canvas.w() - EMOTION_SIDE_INSET,
            };
            let t = LayerTransform {
                offset_x: e.offset_x,
                offset_y: e.offset_y,
                ..LayerTransform::default()
            };
            plan.ops.push(DrawOp::Image(image_draw(
                &self.cached(&key)?,
                &t,
                Point::new(anchor_x, EMOTION_Y),
                None,
            )));
        }

        if let Some(key) = &style.bar {
            plan.ops.push(DrawOp::Image(full_canvas(self.cached(key)?)));
        }
        if style.bar.is_none() || !form.language.is_default() {
            let skip = self.cached(&TextureKey::Skip(form.language))?;
            plan.ops.push(DrawOp::Image(full_canvas(skip)));
        }

        let props = self.localization.get(form.language)?;
        let family = self.family(form.language);
        let mut fonts = self.fonts.borrow_mut();
        plan.ops
            .extend(layout_dialogue(&mut *fonts, props, canvas, &family, form)?);

        Ok(plan)
    }

    fn cached(&self, key: &TextureKey) -> VnframeResult<Texture> {
        self.textures
            .get(key)
            .ok_or_else(|| VnframeError::asset(format!("texture '{}' not loaded", key.path())))
    }
}

/// Frame art is drawn unscaled from the canvas origin.
fn full_canvas(texture: Texture) -> ImageOp {
    let dest = Rect::new(
        0.0,
        0.0,
        f64::from(texture.width()),
        f64::from(texture.height()),
    );
    ImageOp {
        texture,
        transform: Affine::IDENTITY,
        dest,
        opacity: 1.0,
        shadow: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
