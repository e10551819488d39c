//! Timed actions: looping rotations and delayed removal

use super::scene::Scene;
use super::state::{Action, ObjectId};
use crate::normalize_angle;

/// Slack for accumulated float error on timers
const TIMER_EPSILON: f32 = 1e-4;

/// Advance the scene clock and every object's actions by `dt`.
///
/// Objects whose `RemoveAfter` timer runs out are despawned.
pub fn advance_actions(scene: &mut Scene, dt: f32) {
    scene.clock += dt;

    let mut expired: Vec<ObjectId> = Vec::new();
    for object in scene.objects.iter_mut() {
        for action in object.actions.iter_mut() {
            match action {
                Action::RotateForever { angle, duration } => {
                    if *duration > 0.0 {
                        object.rotation = normalize_angle(object.rotation + *angle * dt / *duration);
                    }
                }
                Action::RemoveAfter { remaining } => {
                    *remaining -= dt;
                    if *remaining <= TIMER_EPSILON {
                        expired.push(object.id);
                    }
                }
            }
        }
    }

    for id in expired {
        scene.despawn(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{PhysicsObject, Visual};
    use glam::Vec2;
    use std::f32::consts::PI;

    #[test]
    fn test_rotate_forever_rate() {
        let mut scene = Scene::empty(&Settings::default());
        let mut glow = PhysicsObject::decoration(Vec2::ZERO, Visual::sprite("slotGlowGood"));
        glow.actions.push(Action::RotateForever {
            angle: PI,
            duration: 10.0,
        });
        let id = scene.spawn(glow);

        for _ in 0..5 {
            advance_actions(&mut scene, 1.0);
        }
        let rotation = scene.objects.get(id).map(|o| o.rotation).unwrap_or_default();
        assert!((rotation - PI / 2.0).abs() < 0.001);
        assert!((scene.clock - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_rotate_forever_never_terminates() {
        let mut scene = Scene::empty(&Settings::default());
        let mut glow = PhysicsObject::decoration(Vec2::ZERO, Visual::sprite("slotGlowBad"));
        glow.actions.push(Action::RotateForever {
            angle: PI,
            duration: 10.0,
        });
        let id = scene.spawn(glow);

        for _ in 0..100 {
            advance_actions(&mut scene, 1.0);
        }
        assert!(scene.objects.is_alive(id));
    }

    #[test]
    fn test_remove_after_expires_exactly() {
        let mut scene = Scene::empty(&Settings::default());
        let mut burst = PhysicsObject::decoration(
            Vec2::ZERO,
            Visual::Emitter {
                template: "FireParticles".to_string(),
            },
        );
        burst.actions.push(Action::RemoveAfter { remaining: 2.0 });
        let id = scene.spawn(burst);

        for _ in 0..3 {
            advance_actions(&mut scene, 0.5);
            assert!(scene.objects.is_alive(id));
        }
        advance_actions(&mut scene, 0.5);
        assert!(!scene.objects.is_alive(id));
    }
}
