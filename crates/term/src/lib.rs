//! Terminal "game renderer" module.
//!
//! Renders the pit into a plain framebuffer of styled glyphs, then flushes only
//! what changed to the terminal. No widget toolkit: the layout is fixed and
//! cells are drawn 2 columns wide to keep blocks roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris3d_core as core;
pub use tetris3d_input as input;
pub use tetris3d_types as types;

pub use fb::{FrameBuffer, Glyph, Style};
pub use game_view::{AnchorY, GameView, Projection, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
