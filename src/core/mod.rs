//! Core library components.
//!
//! Storage, resolution, encryption and import logic. Nothing in here prints;
//! the CLI layer owns all terminal output.

pub mod alias;
pub mod builder;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod import;
pub mod repository;
pub mod store;
pub mod tree;
pub mod types;
