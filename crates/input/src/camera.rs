//! Camera-relative resolution of input events.
//!
//! The camera orbits the pit in quarter turns. The yaw index decides which grid
//! axis "forward" and "right" point along, and whether rotation keys 1 and 3
//! act on X or Z, so controls always match what is on screen.
//!
//! | yaw | forward | right |
//! |-----|---------|-------|
//! | 0   | +Z      | +X    |
//! | 1   | +X      | -Z    |
//! | 2   | -Z      | -X    |
//! | 3   | -X      | +Z    |

use crate::map::{InputEvent, MoveDir, RotateKey};
use crate::types::{Axis, Cell, GameAction, TurnDir};

/// Camera orientation in quarter turns, always in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CameraYaw(u8);

impl CameraYaw {
    pub fn new(index: i32) -> Self {
        Self(index.rem_euclid(4) as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn orbit_left(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    pub fn orbit_right(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    pub fn forward(&self) -> Cell {
        match self.0 {
            0 => Cell::Z,
            1 => Cell::X,
            2 => Cell::NEG_Z,
            _ => Cell::NEG_X,
        }
    }

    pub fn right(&self) -> Cell {
        match self.0 {
            0 => Cell::X,
            1 => Cell::NEG_Z,
            2 => Cell::NEG_X,
            _ => Cell::Z,
        }
    }

    /// Grid delta for a screen-relative direction.
    pub fn move_delta(&self, dir: MoveDir) -> Cell {
        match dir {
            MoveDir::Forward => self.forward(),
            MoveDir::Back => -self.forward(),
            MoveDir::Right => self.right(),
            MoveDir::Left => -self.right(),
        }
    }

    /// Rotation axis for a key. Key 2 is always Y; keys 1 and 3 swap X/Z on odd yaw.
    pub fn rotation_axis(&self, key: RotateKey) -> Axis {
        let swap = self.0 & 1 == 1;
        match (key, swap) {
            (RotateKey::Two, _) => Axis::Y,
            (RotateKey::One, false) | (RotateKey::Three, true) => Axis::X,
            (RotateKey::One, true) | (RotateKey::Three, false) => Axis::Z,
        }
    }
}

/// Grid-space move action for a unit horizontal delta.
pub fn action_for_delta(delta: Cell) -> Option<GameAction> {
    match (delta.x, delta.y, delta.z) {
        (-1, 0, 0) => Some(GameAction::MoveLeft),
        (1, 0, 0) => Some(GameAction::MoveRight),
        (0, 0, 1) => Some(GameAction::MoveForward),
        (0, 0, -1) => Some(GameAction::MoveBack),
        _ => None,
    }
}

/// Resolve an input event against the camera.
///
/// Orbit events return `None`; the caller updates its [`CameraYaw`] instead.
pub fn resolve(event: InputEvent, yaw: CameraYaw) -> Option<GameAction> {
    match event {
        InputEvent::Move(dir) => action_for_delta(yaw.move_delta(dir)),
        InputEvent::Rotate { key, reverse } => {
            let dir = if reverse { TurnDir::Ccw } else { TurnDir::Cw };
            Some(GameAction::Rotate(yaw.rotation_axis(key), dir))
        }
        InputEvent::SoftDrop => Some(GameAction::SoftDrop),
        InputEvent::Hold => Some(GameAction::Hold),
        InputEvent::Pause => Some(GameAction::Pause),
        InputEvent::Restart => Some(GameAction::Restart),
        InputEvent::OrbitLeft | InputEvent::OrbitRight => None,
    }
}
