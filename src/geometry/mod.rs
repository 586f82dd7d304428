//! Vector geometry: pivot, wedges, and guides. Nothing here touches pixels.

pub(crate) mod overlay;
pub(crate) mod pivot;
pub(crate) mod wedge;
