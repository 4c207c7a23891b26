//! 3D falling-block puzzle (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` as
//! `tetris3d::{core,input,term,types}` and adds the binary's config loading and
//! logging setup.

pub mod logging;
pub mod settings;

pub use tetris3d_core as core;
pub use tetris3d_input as input;
pub use tetris3d_term as term;
pub use tetris3d_types as types;
