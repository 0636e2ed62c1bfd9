pub mod classify;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod factory;
pub mod graph;
pub mod identity;
pub mod index;
pub mod mapping;
pub mod meta;
pub mod model;
pub mod resolution;
pub mod types;
pub mod writer;
