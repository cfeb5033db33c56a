//! vnframe composites visual-novel dialogue screens into still frames.
//!
//! A frame is an ordered stack of transformable image layers under fixed frame art (bar, skip
//! button, type backgrounds), topped by dialogue text laid out per dialogue type and language,
//! with inline ruby annotations of the form `(base){reading}`.
//!
//! # Pipeline overview
//!
//! 1. **Snapshot**: `LayerStack + FormState -> SceneSnapshot` (immutable copy of what a pass reads)
//! 2. **Plan**: `SceneSnapshot -> ScenePlan` (backend-agnostic image, rule and text ops)
//! 3. **Render**: `ScenePlan -> FrameRGBA` (CPU backend), then a scaled preview
//! 4. **Export** (optional): encode the full-resolution frame as PNG
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One pass at a time**: a compose trigger that arrives mid-pass is dropped.
//! - **IO behind a trait**: frame art, fonts and catalogs load through [`AssetLoader`].
//! - **Premultiplied RGBA8** end-to-end: renderers output premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compile;
mod compose;
mod editor;
mod foundation;
mod layers;
mod layout;
mod render;
mod text;

pub use assets::cache::{TextureCache, TextureKey};
pub use assets::catalog::{
    BACKGROUND_CATALOG_PATH, BACKGROUND_PAGE_SIZE, BackgroundCatalog, BackgroundEntry,
    PORTRAIT_BASE_URL, PORTRAIT_DIRECTORY_PATH, PortraitDirectory, PortraitParts, THUMBNAIL_URL,
    portrait_url,
};
pub use assets::loader::{AssetLoader, FsAssetLoader, MemoryAssetLoader, normalize_rel_path};
pub use assets::portrait::{
    Generation, PORTRAIT_SIZE, PortraitRequest, PortraitResult, PortraitSelection, PortraitState,
    compose_portrait,
};
pub use assets::texture::{Texture, decode_image};
pub use compile::plan::{DrawOp, DropShadow, ImageOp, ScenePlan, TextOp, TextStroke};
pub use compose::composer::{
    ComposeOutcome, ComposeState, ComposedFrame, Composer, ComposerOpts, EMOTION_SIDE_INSET,
    EMOTION_Y, SceneSnapshot, frame_textures,
};
pub use compose::export::{encode_png, export_file_name, save_png};
pub use editor::controls::{BoundNumeric, NumericRange, TransformField};
pub use editor::form::{Emotion, EmotionChoice, EmotionSide, FormState};
pub use editor::scene_def::{LayerDef, SceneDef};
pub use editor::session::{EditorOpts, EditorSession, ExportedPng};
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{VnframeError, VnframeResult};
pub use layers::stack::{Layer, LayerId, LayerStack, LayerTransform, StackError};
pub use layers::transform::{image_draw, layer_draw};
pub use layout::dialogue::{
    BlockAnchor, BodyRule, CAPTION_RULE_Y, DialogueStyle, DialogueType, INTRO_SLANT_DEG,
    NameRule, RUBY_SIZE_PX, centered_block_start, intro_slant, layout_dialogue,
};
pub use layout::properties::{
    DEFAULT_FAMILY_PREFIX, Language, LocalizedStrings, Localization, TextProperties,
};
pub use render::backend::{FrameRGBA, RenderBackend};
pub use render::cpu::{CpuBackend, CpuBackendOpts};
pub use text::metrics::{FontBook, MonospaceMeasure, TextMeasure};
pub use text::ruby::{RubySegment, parse_ruby, strip_ruby};
