//! Field construction: scoring slots and bouncer pegs

use glam::Vec2;

use super::scene::Scene;
use super::state::{Action, Body, Classification, ObjectId, PhysicsObject, Shape, Visual};
use crate::consts::*;

/// Lay out the four slots and five bouncers.
///
/// Not guarded: a second call places a second copy of the field.
pub fn layout_field(scene: &mut Scene) {
    for (i, &x) in SLOT_XS.iter().enumerate() {
        make_slot(scene, Vec2::new(x, 0.0), i % 2 == 0);
    }

    for i in 0..BOUNCER_COUNT {
        let x = BOUNCER_SPACING * i as f32;
        make_bouncer(scene, Vec2::new(x, 0.0));
    }
}

/// Static circular peg. Never scored against.
pub fn make_bouncer(scene: &mut Scene, pos: Vec2) -> ObjectId {
    let mut bouncer = PhysicsObject::decoration(pos, Visual::sprite("bouncer"));
    bouncer.body = Some(Body::fixed(Shape::Circle {
        radius: BOUNCER_RADIUS,
    }));
    scene.spawn(bouncer)
}

/// Slot ground plus its spinning glow. Returns (ground, glow).
pub fn make_slot(scene: &mut Scene, pos: Vec2, is_good: bool) -> (ObjectId, ObjectId) {
    let (base_image, glow_image, classification) = if is_good {
        ("slotBaseGood", "slotGlowGood", Classification::Good)
    } else {
        ("slotBaseBad", "slotGlowBad", Classification::Bad)
    };

    let mut base = PhysicsObject::decoration(pos, Visual::sprite(base_image));
    base.classification = classification;
    base.body = Some(Body::fixed(Shape::Rect {
        size: SLOT_BASE_SIZE,
    }));
    let base_id = scene.spawn(base);

    let mut glow = PhysicsObject::decoration(pos, Visual::sprite(glow_image));
    if scene.glow_spin {
        glow.actions.push(Action::RotateForever {
            angle: GLOW_SPIN_ANGLE,
            duration: GLOW_SPIN_DURATION,
        });
    }
    let glow_id = scene.spawn(glow);

    (base_id, glow_id)
}
