pub(crate) mod metrics;
pub(crate) mod ruby;
