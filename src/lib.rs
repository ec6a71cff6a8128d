//! Cat shelf puzzle (workspace facade crate).
//!
//! Re-exports the `cat_shelf::{types, core, engine}` API from the crates under
//! `crates/`, plus the JSON config loader and argument parsing used by the
//! `cat-shelf` level-lab binary.

pub use cat_shelf_core as core;
pub use cat_shelf_engine as engine;
pub use cat_shelf_types as types;

pub mod cli;
pub mod config;
