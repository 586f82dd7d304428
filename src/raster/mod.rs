//! Pixel surfaces and the operations the engine performs on them.

pub(crate) mod composite;
pub(crate) mod fill;
pub(crate) mod layer;
pub(crate) mod mask;
pub(crate) mod rotate;
