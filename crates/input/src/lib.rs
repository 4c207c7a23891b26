//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into camera-relative [`InputEvent`]s, resolves
//! them against the current [`CameraYaw`] into grid-space
//! [`GameAction`](crate::types::GameAction)s, and auto-repeats held movement
//! keys (including on terminals without key-release events).

pub mod camera;
pub mod handler;
pub mod map;

pub use tetris3d_types as types;

pub use camera::{action_for_delta, resolve, CameraYaw};
pub use handler::MoveRepeat;
pub use map::{map_key, move_dir, should_quit, InputEvent, MoveDir, RotateKey};
