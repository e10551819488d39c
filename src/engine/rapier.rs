//! rapier2d-backed engine
//!
//! Statics become fixed bodies, balls become dynamic bodies. Each collider
//! carries its scene id in `user_data`, which is how contact events find
//! their way back to scene objects.

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::crossbeam::channel::{Receiver, unbounded};
use rapier2d::prelude::*;

use super::{Contact, PhysicsEngine};
use crate::Rect;
use crate::sim::{ObjectId, PhysicsObject, Shape};

/// `user_data` of colliders that don't belong to a scene object
const NO_OBJECT: u128 = u128::MAX;

/// Engine-side record of a mirrored scene object
struct Mirrored {
    body: RigidBodyHandle,
    category: u32,
    contact_mask: u32,
}

/// Manages the rapier2d physics world
pub struct RapierEngine {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    contact_force_events: Receiver<ContactForceEvent>,
    /// Ordered by id so iteration is stable
    mirrored: BTreeMap<ObjectId, Mirrored>,
    bounds: Option<ColliderHandle>,
}

impl RapierEngine {
    /// `gravity` is the downward acceleration in pixels/s²
    pub fn new(gravity: f32) -> Self {
        let (collision_send, collision_events) = unbounded();
        let (contact_force_send, contact_force_events) = unbounded();
        Self {
            gravity: vector![0.0, -gravity],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_events,
            contact_force_events,
            mirrored: BTreeMap::new(),
            bounds: None,
        }
    }

    /// Number of mirrored bodies (boundary excluded)
    pub fn body_count(&self) -> usize {
        self.mirrored.len()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.mirrored.contains_key(&id)
    }

    fn object_id(&self, handle: ColliderHandle) -> Option<ObjectId> {
        let collider = self.colliders.get(handle)?;
        u32::try_from(collider.user_data).ok().map(ObjectId)
    }

    /// A contact is reported when either side asked to hear about the other
    fn wants_contact(&self, a: ObjectId, b: ObjectId) -> bool {
        match (self.mirrored.get(&a), self.mirrored.get(&b)) {
            (Some(a), Some(b)) => (a.category & b.contact_mask) != 0 || (b.category & a.contact_mask) != 0,
            _ => false,
        }
    }
}

impl PhysicsEngine for RapierEngine {
    fn set_bounds(&mut self, frame: Rect) {
        if let Some(old) = self.bounds.take() {
            self.colliders
                .remove(old, &mut self.island_manager, &mut self.bodies, false);
        }

        let mut vertices: Vec<Point<Real>> = frame.corners().iter().map(|c| point![c.x, c.y]).collect();
        let first = vertices[0];
        vertices.push(first);

        let edge_loop = ColliderBuilder::polyline(vertices, None)
            .user_data(NO_OBJECT)
            .build();
        self.bounds = Some(self.colliders.insert(edge_loop));
        log::debug!(
            "Physics: edge loop {:.0}x{:.0}",
            frame.size().x,
            frame.size().y
        );
    }

    fn insert(&mut self, object: &PhysicsObject) {
        let Some(body) = object.body.as_ref() else {
            return;
        };

        let builder = if body.dynamic {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let rigid_body = builder
            .translation(vector![object.pos.x, object.pos.y])
            .rotation(object.rotation)
            .build();
        let handle = self.bodies.insert(rigid_body);

        let shape = match body.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Rect { size } => ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0),
        };
        let groups = InteractionGroups::new(
            Group::from_bits_truncate(body.category),
            Group::from_bits_truncate(body.collision_mask),
        );
        let mut collider = shape
            .restitution(body.restitution)
            .collision_groups(groups)
            .user_data(object.id.0 as u128);
        if body.contact_mask != 0 {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        self.mirrored.insert(
            object.id,
            Mirrored {
                body: handle,
                category: body.category,
                contact_mask: body.contact_mask,
            },
        );
    }

    fn remove(&mut self, id: ObjectId) {
        let Some(entry) = self.mirrored.remove(&id) else {
            return;
        };
        self.bodies.remove(
            entry.body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collector,
        );

        // Force events are never enabled; drain so the channel can't grow
        while self.contact_force_events.try_recv().is_ok() {}

        self.collision_events
            .try_iter()
            .filter_map(|event| match event {
                CollisionEvent::Started(h1, h2, _) => Some((h1, h2)),
                CollisionEvent::Stopped(..) => None,
            })
            .filter_map(|(h1, h2)| {
                let a = self.object_id(h1)?;
                let b = self.object_id(h2)?;
                self.wants_contact(a, b).then_some(Contact { a, b })
            })
            .collect()
    }

    fn transforms(&self) -> Vec<(ObjectId, Vec2, f32)> {
        self.mirrored
            .iter()
            .filter_map(|(&id, entry)| {
                let body = self.bodies.get(entry.body)?;
                if !body.is_dynamic() {
                    return None;
                }
                let t = body.translation();
                Some((id, Vec2::new(t.x, t.y), body.rotation().angle()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_frame;
    use crate::sim::{Body, PhysicsObject, Visual};

    fn placed(id: u32, mut object: PhysicsObject) -> PhysicsObject {
        object.id = ObjectId(id);
        object
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut engine = RapierEngine::new(980.0);
        engine.set_bounds(field_frame());
        engine.insert(&placed(0, PhysicsObject::ball(Vec2::new(500.0, 700.0), "ballRed")));

        for _ in 0..30 {
            engine.step(1.0 / 120.0);
        }
        let transforms = engine.transforms();
        assert_eq!(transforms.len(), 1);
        assert!(transforms[0].1.y < 700.0);
        assert!((transforms[0].1.x - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_bodiless_objects_are_not_mirrored() {
        let mut engine = RapierEngine::new(980.0);
        engine.insert(&placed(3, PhysicsObject::decoration(Vec2::ZERO, Visual::sprite("slotGlowGood"))));
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_static_bodies_report_no_transform() {
        let mut engine = RapierEngine::new(980.0);
        let mut peg = PhysicsObject::decoration(Vec2::new(256.0, 0.0), Visual::sprite("bouncer"));
        peg.body = Some(Body::fixed(Shape::Circle { radius: 48.0 }));
        engine.insert(&placed(1, peg));
        engine.step(1.0 / 120.0);
        assert!(engine.contains(ObjectId(1)));
        assert!(engine.transforms().is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut engine = RapierEngine::new(980.0);
        engine.insert(&placed(0, PhysicsObject::ball(Vec2::new(500.0, 700.0), "ballRed")));
        engine.remove(ObjectId(0));
        engine.remove(ObjectId(0));
        engine.remove(ObjectId(42));
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_ball_landing_on_fixed_box_reports_contact() {
        let mut engine = RapierEngine::new(980.0);
        let mut floor = PhysicsObject::decoration(Vec2::new(500.0, 100.0), Visual::sprite("slotBaseGood"));
        floor.body = Some(Body::fixed(Shape::Rect {
            size: Vec2::new(200.0, 32.0),
        }));
        engine.insert(&placed(0, floor));
        engine.insert(&placed(1, PhysicsObject::ball(Vec2::new(500.0, 200.0), "ballRed")));

        let mut contacts = Vec::new();
        for _ in 0..240 {
            contacts.extend(engine.step(1.0 / 120.0));
        }
        assert!(!contacts.is_empty());
        let first = contacts[0];
        let mut pair = [first.a, first.b];
        pair.sort();
        assert_eq!(pair, [ObjectId(0), ObjectId(1)]);
    }
}
