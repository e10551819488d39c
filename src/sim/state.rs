//! Scene objects and core state types
//!
//! Everything the scene owns lives in an [`ObjectArena`] addressed by
//! [`ObjectId`] handles. Handles are never reused, so a removed handle stays
//! dead for the rest of the run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Scoring role of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    None,
    Ball,
    Good,
    Bad,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { size: Vec2 },
}

/// Collision body handed to the physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub shape: Shape,
    /// Dynamic bodies are moved by the engine; static ones never move
    pub dynamic: bool,
    pub restitution: f32,
    /// Category bits this body belongs to
    pub category: u32,
    /// Categories this body physically collides with
    pub collision_mask: u32,
    /// Categories this body reports contacts with
    pub contact_mask: u32,
}

impl Body {
    /// Static body that collides with everything and reports nothing
    pub fn fixed(shape: Shape) -> Self {
        Self {
            shape,
            dynamic: false,
            restitution: 0.2,
            category: CATEGORY_STATIC,
            collision_mask: CATEGORY_ALL,
            contact_mask: 0,
        }
    }
}

/// Solid fill color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// How an object looks. Purely descriptive; nothing here is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Visual {
    Sprite { image: String, z: f32 },
    Solid { color: Rgb, size: Vec2 },
    Emitter { template: String },
}

impl Visual {
    pub fn sprite(image: &str) -> Self {
        Visual::Sprite {
            image: image.to_string(),
            z: 0.0,
        }
    }
}

/// Timed action attached to an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Rotate by `angle` every `duration` seconds, forever
    RotateForever { angle: f32, duration: f32 },
    /// Remove the object once `remaining` seconds have elapsed
    RemoveAfter { remaining: f32 },
}

/// Anything placed in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsObject {
    pub id: ObjectId,
    pub pos: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub classification: Classification,
    /// `None` for purely visual objects
    pub body: Option<Body>,
    pub visual: Visual,
    pub actions: Vec<Action>,
}

impl PhysicsObject {
    /// A plain visual object with no body
    pub fn decoration(pos: Vec2, visual: Visual) -> Self {
        Self {
            id: ObjectId::PLACEHOLDER,
            pos,
            rotation: 0.0,
            classification: Classification::None,
            body: None,
            visual,
            actions: Vec::new(),
        }
    }

    /// A falling ball. Its contact mask mirrors its collision mask so every
    /// category it can hit is also reported.
    pub fn ball(pos: Vec2, image: &str) -> Self {
        let collision_mask = CATEGORY_ALL;
        Self {
            id: ObjectId::PLACEHOLDER,
            pos,
            rotation: 0.0,
            classification: Classification::Ball,
            body: Some(Body {
                shape: Shape::Circle {
                    radius: BALL_RADIUS,
                },
                dynamic: true,
                restitution: BALL_RESTITUTION,
                category: CATEGORY_BALL,
                collision_mask,
                contact_mask: collision_mask,
            }),
            visual: Visual::sprite(image),
            actions: Vec::new(),
        }
    }

    pub fn is_ball(&self) -> bool {
        self.classification == Classification::Ball
    }

    pub fn is_dynamic(&self) -> bool {
        self.body.as_ref().is_some_and(|b| b.dynamic)
    }
}

/// Handle into the object arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Id carried by objects that have not been inserted yet
    pub const PLACEHOLDER: ObjectId = ObjectId(u32::MAX);
}

/// Owns every object in the scene. Removal leaves a dead slot behind.
///
/// The slot vector grows by one for every object ever inserted. A dead slot
/// is a null box, so a long run costs one pointer per removed object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectArena {
    slots: Vec<Option<Box<PhysicsObject>>>,
    live: usize,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, assigning it a fresh id
    pub fn insert(&mut self, mut object: PhysicsObject) -> ObjectId {
        let id = ObjectId(self.slots.len() as u32);
        object.id = id;
        self.slots.push(Some(Box::new(object)));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&PhysicsObject> {
        self.slots.get(id.0 as usize).and_then(Option::as_deref)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PhysicsObject> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_deref_mut)
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Mark a handle dead. Returns the object the first time, `None` after.
    pub fn remove(&mut self, id: ObjectId) -> Option<PhysicsObject> {
        let removed = self
            .slots
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .map(|object| *object);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live objects in id order
    pub fn iter(&self) -> impl Iterator<Item = &PhysicsObject> {
        self.slots.iter().filter_map(Option::as_deref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PhysicsObject> {
        self.slots.iter_mut().filter_map(Option::as_deref_mut)
    }

    /// Live objects with the given classification
    pub fn classified(&self, classification: Classification) -> impl Iterator<Item = &PhysicsObject> {
        self.iter().filter(move |o| o.classification == classification)
    }
}

/// Mutable game state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Unbounded in both directions
    pub score: i64,
    pub edit_mode: bool,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
