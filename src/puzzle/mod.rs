pub(crate) mod config;
pub(crate) mod edges;
pub(crate) mod grid;
