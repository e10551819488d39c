//! Host physics engine boundary
//!
//! The scene never integrates motion itself. An engine mirrors every object
//! with a body, steps the simulation and reports which pairs started
//! touching.

pub mod rapier;

pub use rapier::RapierEngine;

use glam::Vec2;

use crate::Rect;
use crate::sim::{ObjectId, PhysicsObject};

/// Two bodies that began touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ObjectId,
    pub b: ObjectId,
}

/// Rigid-body engine the session drives
pub trait PhysicsEngine {
    /// Install an edge loop around `frame`
    fn set_bounds(&mut self, frame: Rect);

    /// Mirror an object. Objects without a body are ignored.
    fn insert(&mut self, object: &PhysicsObject);

    /// Drop an object's body. Unknown ids are ignored.
    fn remove(&mut self, id: ObjectId);

    /// Advance by `dt` seconds, returning each new contact pair once
    fn step(&mut self, dt: f32) -> Vec<Contact>;

    /// Current position and rotation of every dynamic body
    fn transforms(&self) -> Vec<(ObjectId, Vec2, f32)>;
}
