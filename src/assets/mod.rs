pub(crate) mod cache;
pub(crate) mod catalog;
pub(crate) mod loader;
pub(crate) mod portrait;
pub(crate) mod texture;
