pub(crate) mod stack;
pub(crate) mod transform;
