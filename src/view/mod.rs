pub(crate) mod chart;
pub(crate) mod color;
