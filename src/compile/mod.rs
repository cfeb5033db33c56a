//! Scene plans: the contract between layout and rasterization.
#![allow(missing_docs)]

pub(crate) mod plan;
