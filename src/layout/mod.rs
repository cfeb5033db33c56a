pub(crate) mod dialogue;
pub(crate) mod properties;
