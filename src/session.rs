//! Fixed timestep driver
//!
//! Binds a [`Scene`] to a [`PhysicsEngine`]. Every substep pushes scene
//! changes into the engine, steps it, pulls ball positions back and hands
//! the contact reports to the scorer.

use glam::Vec2;

use crate::consts::*;
use crate::engine::PhysicsEngine;
use crate::sim::{
    ContactOutcome, InputOutcome, Scene, SceneEvent, advance_actions, handle_contact, pointer_down,
};

/// Running totals for a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub substeps: u64,
    pub balls_dropped: u32,
    pub boxes_placed: u32,
    pub good_hits: u32,
    pub bad_hits: u32,
}

/// A scene driven by an engine at a fixed timestep
pub struct Session<E: PhysicsEngine> {
    pub scene: Scene,
    pub engine: E,
    pub stats: SessionStats,
    accumulator: f32,
}

impl<E: PhysicsEngine> Session<E> {
    pub fn new(scene: Scene, mut engine: E) -> Self {
        engine.set_bounds(scene.bounds);
        let mut session = Self {
            scene,
            engine,
            stats: SessionStats::default(),
            accumulator: 0.0,
        };
        session.flush();
        session
    }

    /// Forward a pointer-down to the scene
    pub fn pointer_down(&mut self, touches: &[Vec2]) -> InputOutcome {
        let outcome = pointer_down(&mut self.scene, touches);
        match outcome {
            InputOutcome::SpawnedBall(_) => self.stats.balls_dropped += 1,
            InputOutcome::PlacedBox(_) => self.stats.boxes_placed += 1,
            InputOutcome::ToggledEditMode(_) | InputOutcome::Ignored => {}
        }
        self.flush();
        outcome
    }

    /// Advance by a frame's worth of wall time. Returns substeps run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// One fixed step.
    ///
    /// Timed actions age before contacts are handled, so anything a contact
    /// spawns starts aging on the following step.
    pub fn step(&mut self) {
        self.flush();
        advance_actions(&mut self.scene, SIM_DT);

        let contacts = self.engine.step(SIM_DT);
        for (id, pos, rotation) in self.engine.transforms() {
            self.scene.set_transform(id, pos, rotation);
        }

        for contact in contacts {
            if let ContactOutcome::Scored { delta, .. } = handle_contact(&mut self.scene, contact.a, contact.b) {
                if delta > 0 {
                    self.stats.good_hits += 1;
                } else {
                    self.stats.bad_hits += 1;
                }
            }
        }

        self.flush();
        self.stats.substeps += 1;
    }

    /// Run whole frames until `seconds` of simulated time have passed
    pub fn run_for(&mut self, seconds: f32, frame_dt: f32) {
        let frames = (seconds / frame_dt).ceil() as u32;
        for _ in 0..frames {
            self.frame(frame_dt);
        }
    }

    /// Mirror queued scene changes into the engine
    fn flush(&mut self) {
        for event in self.scene.drain_events() {
            match event {
                SceneEvent::Spawned(id) => {
                    if let Some(object) = self.scene.objects.get(id) {
                        self.engine.insert(object);
                    }
                }
                SceneEvent::Removed(id) => self.engine.remove(id),
                SceneEvent::ScoreChanged(score) => log::info!("Score: {}", score),
                SceneEvent::EditModeChanged(edit_mode) => {
                    log::info!("Edit mode: {}", if edit_mode { "on" } else { "off" })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::engine::{Contact, RapierEngine};
    use crate::settings::Settings;
    use crate::sim::{Classification, ObjectId, PhysicsObject};
    use std::collections::VecDeque;

    /// Engine double that replays canned contact batches
    #[derive(Default)]
    struct ScriptedEngine {
        inserted: Vec<ObjectId>,
        removed: Vec<ObjectId>,
        batches: VecDeque<Vec<Contact>>,
        bounds: Option<Rect>,
    }

    impl PhysicsEngine for ScriptedEngine {
        fn set_bounds(&mut self, frame: Rect) {
            self.bounds = Some(frame);
        }

        fn insert(&mut self, object: &PhysicsObject) {
            if object.body.is_some() {
                self.inserted.push(object.id);
            }
        }

        fn remove(&mut self, id: ObjectId) {
            self.removed.push(id);
        }

        fn step(&mut self, _dt: f32) -> Vec<Contact> {
            self.batches.pop_front().unwrap_or_default()
        }

        fn transforms(&self) -> Vec<(ObjectId, Vec2, f32)> {
            Vec::new()
        }
    }

    fn slot_id(scene: &Scene, classification: Classification, x: f32) -> ObjectId {
        scene
            .objects
            .classified(classification)
            .find(|o| o.pos.x == x)
            .map(|o| o.id)
            .expect("slot exists")
    }

    #[test]
    fn test_new_session_mirrors_field() {
        let session = Session::new(Scene::new(&Settings::default()), ScriptedEngine::default());
        // 4 slot bases + 5 bouncers
        assert_eq!(session.engine.inserted.len(), 9);
        assert_eq!(session.engine.bounds, Some(crate::field_frame()));
    }

    #[test]
    fn test_same_step_double_contact_scores_once() {
        let mut session = Session::new(Scene::new(&Settings::default()), ScriptedEngine::default());
        let InputOutcome::SpawnedBall(ball) = session.pointer_down(&[Vec2::new(300.0, 500.0)]) else {
            panic!("expected a ball");
        };
        let good = slot_id(&session.scene, Classification::Good, 128.0);
        let bad = slot_id(&session.scene, Classification::Bad, 384.0);
        session.engine.batches.push_back(vec![
            Contact { a: ball, b: good },
            Contact { a: bad, b: ball },
        ]);

        session.step();
        assert_eq!(session.scene.score(), 1);
        assert_eq!(session.stats.good_hits, 1);
        assert_eq!(session.stats.bad_hits, 0);
        assert_eq!(session.engine.removed, vec![ball]);
    }

    #[test]
    fn test_effect_removed_after_two_seconds_of_steps() {
        let mut session = Session::new(Scene::new(&Settings::default()), ScriptedEngine::default());
        let InputOutcome::SpawnedBall(ball) = session.pointer_down(&[Vec2::new(640.0, 500.0)]) else {
            panic!("expected a ball");
        };
        let good = slot_id(&session.scene, Classification::Good, 640.0);
        session.engine.batches.push_back(vec![Contact { a: ball, b: good }]);
        session.step();

        let live_bursts = |s: &Session<ScriptedEngine>| {
            s.scene
                .objects
                .iter()
                .filter(|o| matches!(o.visual, crate::sim::Visual::Emitter { .. }))
                .count()
        };
        assert_eq!(live_bursts(&session), 1);

        // 240 steps of SIM_DT make two seconds
        for _ in 0..239 {
            session.step();
        }
        assert_eq!(live_bursts(&session), 1);
        session.step();
        assert_eq!(live_bursts(&session), 0);
    }

    #[test]
    fn test_frame_caps_substeps() {
        let mut session = Session::new(Scene::new(&Settings::default()), ScriptedEngine::default());
        assert_eq!(session.frame(1.0), MAX_SUBSTEPS);
        // Leftover time is worked off on the next frame
        assert!(session.frame(0.0) > 0);
    }

    #[test]
    fn test_edit_toggle_then_boxes_are_mirrored() {
        let mut session = Session::new(Scene::new(&Settings::default()), ScriptedEngine::default());
        session.pointer_down(&[EDIT_LABEL_POS]);
        session.pointer_down(&[Vec2::new(500.0, 300.0)]);
        session.pointer_down(&[EDIT_LABEL_POS]);
        assert_eq!(session.stats.boxes_placed, 1);
        assert_eq!(session.stats.balls_dropped, 0);
        assert_eq!(session.engine.inserted.len(), 10);
    }

    fn rapier_session() -> Session<RapierEngine> {
        let settings = Settings::default();
        Session::new(Scene::new(&settings), RapierEngine::new(settings.gravity))
    }

    #[test]
    fn test_rapier_drop_into_good_slot() {
        let mut session = rapier_session();
        let InputOutcome::SpawnedBall(ball) = session.pointer_down(&[Vec2::new(128.0, 400.0)]) else {
            panic!("expected a ball");
        };
        session.run_for(3.0, 1.0 / 60.0);

        assert_eq!(session.scene.score(), 1);
        assert!(!session.scene.objects.is_alive(ball));
        assert!(!session.engine.contains(ball));
    }

    #[test]
    fn test_rapier_drop_at_200_scores_good() {
        let mut session = rapier_session();
        let InputOutcome::SpawnedBall(ball) = session.pointer_down(&[Vec2::new(200.0, 400.0)]) else {
            panic!("expected a ball");
        };
        session.run_for(3.0, 1.0 / 60.0);

        assert_eq!(session.scene.score(), 1);
        assert_eq!(session.stats.good_hits, 1);
        assert!(!session.scene.objects.is_alive(ball));
    }

    #[test]
    fn test_rapier_drop_into_bad_slot() {
        let mut session = rapier_session();
        session.pointer_down(&[Vec2::new(384.0, 100.0)]);
        session.run_for(3.0, 1.0 / 60.0);
        assert_eq!(session.scene.score(), -1);
        assert_eq!(session.stats.bad_hits, 1);
    }

    #[test]
    fn test_rapier_box_is_fixed_body() {
        let mut session = rapier_session();
        session.pointer_down(&[EDIT_LABEL_POS]);
        let InputOutcome::PlacedBox(obstacle) = session.pointer_down(&[Vec2::new(640.0, 400.0)]) else {
            panic!("expected a box");
        };
        session.run_for(0.5, 1.0 / 60.0);

        assert!(session.engine.contains(obstacle));
        assert!(session.engine.transforms().is_empty());
        assert_eq!(session.scene.score(), 0);
    }
}
