//! The symmetry engine: fold, expand, and the run that ties them together.

pub(crate) mod config;
pub(crate) mod expand;
pub(crate) mod fold;
pub(crate) mod lifecycle;
pub(crate) mod orchestrator;
