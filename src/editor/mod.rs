//! Editor-facing state: form, controls, session, and scene documents.

pub(crate) mod controls;
pub(crate) mod form;
pub(crate) mod scene_def;
pub(crate) mod session;
