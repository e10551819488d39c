//! Contact classification and scoring
//!
//! Each contact-began report is resolved once. A ball touching a good slot
//! scores +1, a bad slot -1; either way the ball leaves the scene right away,
//! so any later report naming the same ball finds a dead handle and is
//! dropped.

use glam::Vec2;

use super::scene::Scene;
use super::state::{Action, Classification, ObjectId, PhysicsObject, Visual};
use crate::consts::*;

/// Which side of a contact pair is the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Neither side is a ball
    NoBall,
    /// Ball hit something that doesn't score
    Bounce,
    /// Ball at index 0 or 1 hit a scoring slot worth `delta`
    Score { ball: usize, delta: i64 },
}

/// Classify a contact pair from the two classifications alone
pub fn classify_contact(a: Classification, b: Classification) -> ContactKind {
    let (ball, other) = match (a, b) {
        (Classification::Ball, other) => (0, other),
        (other, Classification::Ball) => (1, other),
        _ => return ContactKind::NoBall,
    };

    match other {
        Classification::Good => ContactKind::Score { ball, delta: 1 },
        Classification::Bad => ContactKind::Score { ball, delta: -1 },
        Classification::None | Classification::Ball => ContactKind::Bounce,
    }
}

/// Result of a handled contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// No live ball involved
    Ignored,
    /// Ball keeps bouncing
    Bounced,
    Scored {
        ball: ObjectId,
        delta: i64,
        /// Where the ball was when it was removed
        at: Vec2,
        /// Burst spawned for the score, if the asset exists
        effect: Option<ObjectId>,
    },
}

/// Apply one contact-began report to the scene
pub fn handle_contact(scene: &mut Scene, a: ObjectId, b: ObjectId) -> ContactOutcome {
    let (Some(obj_a), Some(obj_b)) = (scene.objects.get(a), scene.objects.get(b)) else {
        return ContactOutcome::Ignored;
    };

    match classify_contact(obj_a.classification, obj_b.classification) {
        ContactKind::NoBall => ContactOutcome::Ignored,
        ContactKind::Bounce => ContactOutcome::Bounced,
        ContactKind::Score { ball, delta } => {
            let ball = if ball == 0 { a } else { b };
            let Some(removed) = scene.despawn(ball) else {
                return ContactOutcome::Ignored;
            };
            scene.add_score(delta);
            let effect = spawn_scoring_effect(scene, removed.pos);
            log::debug!(
                "Ball {:?} scored {:+} at ({:.1}, {:.1}), score now {}",
                ball,
                delta,
                removed.pos.x,
                removed.pos.y,
                scene.state.score
            );
            ContactOutcome::Scored {
                ball,
                delta,
                at: removed.pos,
                effect,
            }
        }
    }
}

/// Spawn a short-lived particle burst. Skipped when no template is available.
fn spawn_scoring_effect(scene: &mut Scene, pos: Vec2) -> Option<ObjectId> {
    let template = scene.scoring_effect.clone()?;
    let mut burst = PhysicsObject::decoration(pos, Visual::Emitter { template });
    burst.actions.push(Action::RemoveAfter {
        remaining: SCORING_EFFECT_LIFETIME,
    });
    Some(scene.spawn(burst))
}
