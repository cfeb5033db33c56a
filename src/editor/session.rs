//! Editor state in one owner: layer stack, dialogue form, portrait picks, and the composer.

use serde::{Deserialize, Serialize};

use crate::{
    assets::catalog::PortraitParts,
    assets::loader::AssetLoader,
    assets::portrait::{PortraitRequest, PortraitResult, PortraitState},
    assets::texture::{Texture, decode_image},
    compose::composer::{ComposeOutcome, Composer, ComposerOpts, SceneSnapshot},
    compose::export::{encode_png, export_file_name},
    editor::controls::TransformField,
    editor::form::FormState,
    foundation::core::Canvas,
    foundation::error::{VnframeError, VnframeResult},
    layers::stack::{LayerId, LayerStack, StackError},
    layout::properties::{DEFAULT_FAMILY_PREFIX, Language, LocalizedStrings, Localization},
};

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOpts {
    /// Full-resolution canvas.
    pub canvas: Canvas,
    /// Preview surface.
    pub preview: Canvas,
    /// Font family prefix.
    pub family_prefix: String,
    /// Language of seed layer names and the initial form.
    pub default_language: Language,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::EDITOR,
            preview: Canvas::PREVIEW,
            family_prefix: DEFAULT_FAMILY_PREFIX.to_owned(),
            default_language: Language::default(),
        }
    }
}

/// A PNG ready to hand to the download collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedPng {
    /// Suggested file name.
    pub file_name: String,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

/// Owns everything one editor works on.
pub struct EditorSession {
    opts: EditorOpts,
    stack: LayerStack,
    form: FormState,
    portrait: PortraitState,
    portrait_target: Option<LayerId>,
    composer: Composer,
}

impl EditorSession {
    /// Start a session with the two seed layers ("Background", "Portrait") named in the
    /// default language. The portrait layer is active.
    pub fn new(localization: Localization, opts: EditorOpts) -> VnframeResult<Self> {
        let loc = &localization.get(opts.default_language)?.loc;
        let mut stack = LayerStack::new(loc.background.clone(), None);
        stack.add_layer(loc.portrait.clone(), None);
        let form = FormState {
            language: opts.default_language,
            ..FormState::default()
        };
        let composer = Composer::new(
            localization,
            ComposerOpts {
                family_prefix: opts.family_prefix.clone(),
                ..ComposerOpts::default()
            },
        );
        Ok(Self {
            opts,
            stack,
            form,
            portrait: PortraitState::new(),
            portrait_target: None,
            composer,
        })
    }

    /// Session configuration.
    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    /// Layer stack.
    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// Mutable layer stack.
    pub fn stack_mut(&mut self) -> &mut LayerStack {
        &mut self.stack
    }

    /// Dialogue form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Mutable dialogue form.
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Portrait picks.
    pub fn portrait(&self) -> &PortraitState {
        &self.portrait
    }

    /// Composer driving render passes.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// UI strings for the form's language.
    pub fn strings(&self) -> VnframeResult<&LocalizedStrings> {
        Ok(&self.composer.localization().get(self.form.language)?.loc)
    }

    /// Add a layer named `"{Layer} {n}"`, n being the stack length before the add.
    pub fn add_layer(&mut self, image: Option<Texture>) -> VnframeResult<LayerId> {
        let name = format!("{} {}", self.strings()?.layer, self.stack.len());
        Ok(self.stack.add_layer(name, image))
    }

    /// User-facing text for a guard failure, localized where a string exists.
    pub fn guard_message(&self, err: &StackError) -> String {
        match (err, self.strings()) {
            (StackError::LastLayer, Ok(loc)) => loc.no_delete_base_layer.clone(),
            _ => err.to_string(),
        }
    }

    /// Load and decode `path` into layer `id`.
    pub async fn load_layer_image<L: AssetLoader>(
        &mut self,
        loader: &L,
        id: LayerId,
        path: &str,
    ) -> VnframeResult<()> {
        let bytes = loader.load_bytes(path).await?;
        let texture = decode_image(&bytes)?;
        let layer = self
            .stack
            .get_mut(id)
            .ok_or_else(|| VnframeError::validation(StackError::UnknownLayer(id).to_string()))?;
        layer.image = Some(texture);
        Ok(())
    }

    /// Set one transform field on the active layer. Values are taken as given.
    pub fn set_transform_field(&mut self, field: TransformField, value: f64) {
        field.set(&mut self.stack.active_mut().transform, value);
    }

    /// Scale the active layer so its image spans the canvas width. Returns the new scale,
    /// or `None` when the layer has no image.
    pub fn auto_scale(&mut self) -> Option<f64> {
        let canvas_w = self.opts.canvas.w();
        let layer = self.stack.active_mut();
        let natural = f64::from(layer.image.as_ref()?.width());
        let scale = canvas_w / natural;
        layer.transform.scale = scale;
        Some(scale)
    }

    /// Layer the latest portrait request will land on.
    pub fn portrait_target(&self) -> Option<LayerId> {
        self.portrait_target
    }

    /// Switch portrait character. The result targets the layer active now.
    pub fn select_character(&mut self, parts: &PortraitParts) -> PortraitRequest {
        let req = self.portrait.select_character(parts);
        self.portrait_target = Some(self.stack.active_id());
        req
    }

    /// Pick a face part. The result targets the layer active now.
    pub fn set_face(&mut self, path: Option<String>) -> Option<PortraitRequest> {
        let req = self.portrait.set_face(path)?;
        self.portrait_target = Some(self.stack.active_id());
        Some(req)
    }

    /// Pick a mouth part. The result targets the layer active now.
    pub fn set_mouth(&mut self, path: Option<String>) -> Option<PortraitRequest> {
        let req = self.portrait.set_mouth(path)?;
        self.portrait_target = Some(self.stack.active_id());
        Some(req)
    }

    /// Put a finished portrait on the layer that was active when its request was issued.
    ///
    /// Returns `false` for stale results and when that layer has since been removed.
    pub fn apply_portrait(&mut self, result: PortraitResult) -> VnframeResult<bool> {
        let Some(texture) = self.portrait.accept(result)? else {
            return Ok(false);
        };
        let Some(layer) = self.portrait_target.and_then(|id| self.stack.get_mut(id)) else {
            tracing::debug!(target_layer = ?self.portrait_target, "portrait target gone; dropped");
            return Ok(false);
        };
        layer.image = Some(texture);
        Ok(true)
    }

    /// Capture the current state for a pass.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.stack, &self.form, self.opts.canvas, self.opts.preview)
    }

    /// Trigger a pass over the current state.
    pub async fn render<L: AssetLoader>(&self, loader: &L) -> VnframeResult<ComposeOutcome> {
        self.composer.compose(loader, self.snapshot()).await
    }

    /// Render and encode the full-resolution frame. `None` when the trigger was dropped.
    pub async fn export_png<L: AssetLoader>(
        &self,
        loader: &L,
    ) -> VnframeResult<Option<ExportedPng>> {
        let Some(out) = self.render(loader).await?.rendered() else {
            return Ok(None);
        };
        Ok(Some(ExportedPng {
            file_name: export_file_name(&self.form.speaker),
            bytes: encode_png(&out.frame)?,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
