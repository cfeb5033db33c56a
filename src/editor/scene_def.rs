//! JSON scene document for headless rendering.
//!
//! ```json
//! {
//!   "form": { "speaker": "Euden", "dialogue": "Hello", "dialogueType": "standard" },
//!   "layers": [ { "name": "Background", "image": "images/exampleBackground.png" } ]
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    assets::loader::AssetLoader,
    editor::form::FormState,
    editor::session::{EditorOpts, EditorSession},
    foundation::core::Canvas,
    foundation::error::{VnframeError, VnframeResult},
    layers::stack::{LayerStack, LayerTransform},
    layout::properties::Localization,
};

/// One layer of a scene document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDef {
    /// Tab label.
    pub name: String,
    /// Image path for the asset loader.
    #[serde(default)]
    pub image: Option<String>,
    /// Transform state.
    #[serde(default)]
    pub transform: LayerTransform,
}

/// A whole scene: session options, form, and layers bottom to top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDef {
    /// Canvas, preview, and font options.
    #[serde(flatten)]
    pub opts: EditorOpts,
    /// Dialogue form.
    #[serde(default)]
    pub form: FormState,
    /// Layers in paint order. Must not be empty.
    pub layers: Vec<LayerDef>,
}

impl SceneDef {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VnframeResult<Self> {
        let def: Self = serde_json::from_reader(r)
            .map_err(|e| VnframeError::serde(format!("parse scene JSON: {e}")))?;
        def.validate()?;
        Ok(def)
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VnframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VnframeError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> VnframeResult<()> {
        if self.layers.is_empty() {
            return Err(VnframeError::validation("scene must define at least one layer"));
        }
        Canvas::new(self.opts.canvas.width, self.opts.canvas.height)?;
        Canvas::new(self.opts.preview.width, self.opts.preview.height)?;
        Ok(())
    }

    /// Build a session holding this scene, loading every layer image through `loader`.
    pub async fn build_session<L: AssetLoader>(
        &self,
        localization: Localization,
        loader: &L,
    ) -> VnframeResult<EditorSession> {
        self.validate()?;
        let mut session = EditorSession::new(localization, self.opts.clone())?;

        let mut defs = self.layers.iter();
        let mut stack = match defs.next() {
            Some(base) => LayerStack::new(base.name.clone(), None),
            None => return Err(VnframeError::validation("scene must define at least one layer")),
        };
        for def in defs {
            stack.add_layer(def.name.clone(), None);
        }
        for (id, def) in stack.ids().into_iter().zip(&self.layers) {
            if let Some(layer) = stack.get_mut(id) {
                layer.transform = def.transform;
            }
        }
        *session.stack_mut() = stack;
        *session.form_mut() = self.form.clone();

        let ids = session.stack().ids();
        for (id, def) in ids.into_iter().zip(&self.layers) {
            if let Some(path) = &def.image {
                session.load_layer_image(loader, id, path).await?;
            }
        }
        tracing::debug!(layers = self.layers.len(), "scene loaded");
        Ok(session)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/scene_def.rs"]
mod tests;
