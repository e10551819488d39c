//! Pointer handling: edit toggle, ball drops and box placement

use glam::Vec2;
use rand::Rng;

use super::scene::Scene;
use super::state::{Body, ObjectId, PhysicsObject, Rgb, Shape, Visual};
use crate::Rect;
use crate::consts::*;

/// The "Edit"/"Done" label in the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct EditToggle {
    pub bounds: Rect,
    pub text: String,
}

impl EditToggle {
    pub fn new() -> Self {
        Self {
            bounds: Rect::from_center_size(EDIT_LABEL_POS, EDIT_LABEL_SIZE),
            text: Self::label(false).to_string(),
        }
    }

    pub fn hit(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    pub(crate) fn refresh(&mut self, edit_mode: bool) {
        self.text = Self::label(edit_mode).to_string();
    }

    fn label(edit_mode: bool) -> &'static str {
        if edit_mode { "Done" } else { "Edit" }
    }
}

impl Default for EditToggle {
    fn default() -> Self {
        Self::new()
    }
}

/// What a pointer-down did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// No touch in the event
    Ignored,
    /// Edit toggle hit; carries the new mode
    ToggledEditMode(bool),
    SpawnedBall(ObjectId),
    PlacedBox(ObjectId),
}

/// Handle a pointer-down event. Only the first touch is used.
pub fn pointer_down(scene: &mut Scene, touches: &[Vec2]) -> InputOutcome {
    let Some(&location) = touches.first() else {
        return InputOutcome::Ignored;
    };

    if scene.edit_toggle.hit(location) {
        let edit_mode = !scene.state.edit_mode;
        scene.set_edit_mode(edit_mode);
        log::debug!("Edit mode {}", if edit_mode { "on" } else { "off" });
        return InputOutcome::ToggledEditMode(edit_mode);
    }

    if scene.state.edit_mode {
        InputOutcome::PlacedBox(place_box(scene, location))
    } else {
        InputOutcome::SpawnedBall(drop_ball(scene, location.x))
    }
}

/// Drop a ball from the top of the field. Only x is taken from the touch.
pub fn drop_ball(scene: &mut Scene, x: f32) -> ObjectId {
    let image = BALL_IMAGES[scene.rng.random_range(0..BALL_IMAGES.len())];
    let pos = Vec2::new(x, scene.bounds.max.y - BALL_RADIUS);
    let id = scene.spawn(PhysicsObject::ball(pos, image));
    log::debug!("Ball {:?} dropped at x={:.1}", id, x);
    id
}

/// Place a randomly sized, randomly tinted static box
pub fn place_box(scene: &mut Scene, pos: Vec2) -> ObjectId {
    let size = Vec2::new(
        scene.rng.random_range(BOX_MIN_WIDTH..=BOX_MAX_WIDTH),
        BOX_HEIGHT,
    );
    let color = Rgb {
        r: scene.rng.random(),
        g: scene.rng.random(),
        b: scene.rng.random(),
    };

    let mut obstacle = PhysicsObject::decoration(pos, Visual::Solid { color, size });
    obstacle.rotation = scene.rng.random_range(0.0..BOX_MAX_ROTATION);
    obstacle.body = Some(Body::fixed(Shape::Rect { size }));
    let id = scene.spawn(obstacle);
    log::debug!("Box {:?} placed at ({:.1}, {:.1}), width {:.1}", id, pos.x, pos.y, size.x);
    id
}
