//! Ordered layer collection with stable identity.
//!
//! The stack is never empty: it is created with a base layer and refuses to remove the last one.
//! Stack order is paint order.

use serde::{Deserialize, Serialize};

use crate::assets::texture::Texture;

/// Stable layer identity. Assigned monotonically and never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LayerId(pub u64);

/// Per-layer transform state, in editor units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerTransform {
    /// Horizontal displacement from the canvas center (right-positive).
    pub offset_x: f64,
    /// Vertical displacement from the canvas center (up-positive; negated at draw time).
    pub offset_y: f64,
    /// Rotation in degrees about the layer pivot, clockwise on screen.
    pub rotation_deg: f64,
    /// Uniform multiplier on the image's natural size.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Mirror horizontally about the pivot.
    pub flip_x: bool,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            flip_x: false,
        }
    }
}

/// One compositable image.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Stable identity.
    pub id: LayerId,
    /// Display name (tab label).
    pub name: String,
    /// Decoded image; `None` until loaded.
    pub image: Option<Texture>,
    /// Transform state.
    pub transform: LayerTransform,
}

/// Recoverable structural guard failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// Removing would leave the stack empty.
    #[error("cannot delete base layer")]
    LastLayer,
    /// No layer with this id.
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
    /// The visual ordering and the model disagree on the number of layers.
    #[error("layer order desync: {visual} visual entries vs {model} layers")]
    OrderDesync {
        /// Entries in the visual ordering.
        visual: usize,
        /// Layers in the model.
        model: usize,
    },
    /// Target index is past the end of the stack.
    #[error("index {index} out of range for {len} layers")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current stack length.
        len: usize,
    },
    /// `confirm_remove` without a pending `request_remove`.
    #[error("no layer removal pending")]
    NoPendingRemoval,
}

/// Ordered, never-empty layer stack.
#[derive(Clone, Debug)]
pub struct LayerStack {
    layers: Vec<Layer>,
    last_id: u64,
    active: LayerId,
    pending_removal: Option<LayerId>,
}

impl LayerStack {
    /// Create a stack holding a single base layer.
    pub fn new(base_name: impl Into<String>, image: Option<Texture>) -> Self {
        let id = LayerId(1);
        Self {
            layers: vec![Layer {
                id,
                name: base_name.into(),
                image,
                transform: LayerTransform::default(),
            }],
            last_id: id.0,
            active: id,
            pending_removal: None,
        }
    }

    /// Append a layer with a fresh id and default transform; it becomes the active layer.
    pub fn add_layer(&mut self, name: impl Into<String>, image: Option<Texture>) -> LayerId {
        self.last_id += 1;
        let id = LayerId(self.last_id);
        self.layers.push(Layer {
            id,
            name: name.into(),
            image,
            transform: LayerTransform::default(),
        });
        self.active = id;
        tracing::debug!(layer = id.0, len = self.layers.len(), "layer added");
        id
    }

    /// Remove a layer and select the entry that took its place (or the new last entry).
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, StackError> {
        let index = self.position(id).ok_or(StackError::UnknownLayer(id))?;
        if self.layers.len() <= 1 {
            return Err(StackError::LastLayer);
        }
        let removed = self.layers.remove(index);
        let next = index.min(self.layers.len() - 1);
        self.active = self.layers[next].id;
        if self.pending_removal == Some(id) {
            self.pending_removal = None;
        }
        tracing::debug!(layer = id.0, len = self.layers.len(), "layer removed");
        Ok(removed)
    }

    /// First step of a confirmed delete. Fails up front when `id` is the only layer.
    pub fn request_remove(&mut self, id: LayerId) -> Result<(), StackError> {
        if self.position(id).is_none() {
            return Err(StackError::UnknownLayer(id));
        }
        if self.layers.len() <= 1 {
            return Err(StackError::LastLayer);
        }
        self.pending_removal = Some(id);
        Ok(())
    }

    /// Remove the layer named by the last [`LayerStack::request_remove`].
    pub fn confirm_remove(&mut self) -> Result<Layer, StackError> {
        let id = self
            .pending_removal
            .take()
            .ok_or(StackError::NoPendingRemoval)?;
        self.remove_layer(id)
    }

    /// Drop a pending removal request.
    pub fn cancel_remove(&mut self) {
        self.pending_removal = None;
    }

    /// Layer awaiting confirmation, if any.
    pub fn pending_removal(&self) -> Option<LayerId> {
        self.pending_removal
    }

    /// Move `id` to `new_index`.
    ///
    /// `visual_count` is the number of entries in the caller's visual ordering (tabs); a mismatch
    /// with the model means the two have drifted apart and nothing is moved.
    pub fn reorder(
        &mut self,
        id: LayerId,
        new_index: usize,
        visual_count: usize,
    ) -> Result<(), StackError> {
        if visual_count != self.layers.len() {
            tracing::warn!(
                visual = visual_count,
                model = self.layers.len(),
                "rejecting layer reorder: visual order out of sync"
            );
            return Err(StackError::OrderDesync {
                visual: visual_count,
                model: self.layers.len(),
            });
        }
        let old_index = self.position(id).ok_or(StackError::UnknownLayer(id))?;
        if new_index >= self.layers.len() {
            tracing::warn!(from = old_index, to = new_index, "cannot move layer");
            return Err(StackError::IndexOutOfRange {
                index: new_index,
                len: self.layers.len(),
            });
        }
        let layer = self.layers.remove(old_index);
        self.layers.insert(new_index, layer);
        Ok(())
    }

    /// Make `id` the active layer.
    pub fn select(&mut self, id: LayerId) -> Result<(), StackError> {
        if self.position(id).is_none() {
            return Err(StackError::UnknownLayer(id));
        }
        self.active = id;
        Ok(())
    }

    /// Id of the active layer.
    pub fn active_id(&self) -> LayerId {
        self.active
    }

    /// The active layer.
    pub fn active(&self) -> &Layer {
        // `active` always names a live layer: every removal reselects.
        let i = self.position(self.active).unwrap_or(0);
        &self.layers[i]
    }

    /// Mutable access to the active layer.
    pub fn active_mut(&mut self) -> &mut Layer {
        let i = self.position(self.active).unwrap_or(0);
        &mut self.layers[i]
    }

    /// Rename a layer.
    pub fn rename(&mut self, id: LayerId, name: impl Into<String>) -> Result<(), StackError> {
        let layer = self.get_mut(id).ok_or(StackError::UnknownLayer(id))?;
        layer.name = name.into();
        Ok(())
    }

    /// Index of `id` in paint order.
    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Layer by id.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Mutable layer by id.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Layers in paint order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Layers in paint order, as a slice.
    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer ids in paint order.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Number of layers (always at least one).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/stack.rs"]
mod tests;
