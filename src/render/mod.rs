pub(crate) mod animator;
pub(crate) mod backend;
pub(crate) mod layout;
pub(crate) mod raster;
pub(crate) mod svg;
pub(crate) mod text;
