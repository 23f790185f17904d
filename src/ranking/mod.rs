pub(crate) mod computer;
