//! The scene: object arena, game state, HUD and the change queue the engine
//! consumes.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::input::EditToggle;
use super::layout::layout_field;
use super::state::{GameState, ObjectArena, ObjectId, PhysicsObject, RngState, Visual};
use crate::consts::*;
use crate::settings::Settings;
use crate::{Rect, field_frame};

/// Change notifications, drained by whoever mirrors the scene (engine, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Spawned(ObjectId),
    Removed(ObjectId),
    ScoreChanged(i64),
    EditModeChanged(bool),
}

/// Score readout. Only ever rewritten from the score itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLabel {
    pub pos: Vec2,
    pub text: String,
}

impl ScoreLabel {
    pub fn new(score: i64) -> Self {
        Self {
            pos: SCORE_LABEL_POS,
            text: Self::format(score),
        }
    }

    pub fn refresh(&mut self, score: i64) {
        self.text = Self::format(score);
    }

    fn format(score: i64) -> String {
        format!("Score: {}", score)
    }
}

/// A live pachinko field
pub struct Scene {
    pub objects: ObjectArena,
    pub state: GameState,
    pub edit_toggle: EditToggle,
    /// Absent when the HUD is disabled
    pub score_label: Option<ScoreLabel>,
    /// Edge-loop world boundary
    pub bounds: Rect,
    /// Seconds of simulated time
    pub clock: f32,
    /// Emitter asset for scoring bursts (`None` = missing, bursts skipped)
    pub scoring_effect: Option<String>,
    /// Whether slot glows get their spin action
    pub glow_spin: bool,
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    events: Vec<SceneEvent>,
}

impl Scene {
    /// An empty field: no background, slots or bouncers
    pub fn empty(settings: &Settings) -> Self {
        let rng_state = RngState::new(settings.seed);
        let score_label = settings.show_score.then(|| ScoreLabel::new(0));
        Self {
            objects: ObjectArena::new(),
            state: GameState::default(),
            edit_toggle: EditToggle::new(),
            score_label,
            bounds: field_frame(),
            clock: 0.0,
            scoring_effect: settings.effective_scoring_effect().map(str::to_string),
            glow_spin: settings.effective_glow_spin(),
            rng: rng_state.to_rng(),
            rng_state,
            events: Vec::new(),
        }
    }

    /// A fully built field: background, slots and bouncers
    pub fn new(settings: &Settings) -> Self {
        let mut scene = Self::empty(settings);

        let background = Visual::Sprite {
            image: "background.jpg".to_string(),
            z: -1.0,
        };
        scene.spawn(PhysicsObject::decoration(scene.bounds.center(), background));

        layout_field(&mut scene);
        log::info!(
            "Scene built: {} objects, seed {}",
            scene.objects.len(),
            scene.rng_state.seed
        );
        scene
    }

    /// Add an object and queue its spawn notification
    pub fn spawn(&mut self, object: PhysicsObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.events.push(SceneEvent::Spawned(id));
        id
    }

    /// Remove an object. The second removal of the same handle is a no-op.
    pub fn despawn(&mut self, id: ObjectId) -> Option<PhysicsObject> {
        let removed = self.objects.remove(id);
        if removed.is_some() {
            self.events.push(SceneEvent::Removed(id));
        }
        removed
    }

    /// Apply a scoring delta and refresh the HUD synchronously
    pub(crate) fn add_score(&mut self, delta: i64) {
        self.state.score += delta;
        if let Some(label) = self.score_label.as_mut() {
            label.refresh(self.state.score);
        }
        self.events.push(SceneEvent::ScoreChanged(self.state.score));
    }

    pub(crate) fn set_edit_mode(&mut self, edit_mode: bool) {
        self.state.edit_mode = edit_mode;
        self.edit_toggle.refresh(edit_mode);
        self.events.push(SceneEvent::EditModeChanged(edit_mode));
    }

    /// Copy an engine-reported transform onto a live object
    pub fn set_transform(&mut self, id: ObjectId, pos: Vec2, rotation: f32) {
        if let Some(object) = self.objects.get_mut(id) {
            object.pos = pos;
            object.rotation = rotation;
        }
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn edit_mode(&self) -> bool {
        self.state.edit_mode
    }
}
