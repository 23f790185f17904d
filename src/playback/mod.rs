pub(crate) mod controller;
pub(crate) mod script;
pub(crate) mod timer;
