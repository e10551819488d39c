//! Scene simulation module
//!
//! All gameplay decisions live here. Rigid-body motion is the engine's job;
//! this module only:
//! - Builds the field (slots, bouncers)
//! - Turns pointer-downs into balls, boxes or edit-mode toggles
//! - Classifies contacts and keeps score
//! - Runs timed actions (glow spin, burst lifetime)

pub mod actions;
pub mod contact;
pub mod input;
pub mod layout;
pub mod scene;
pub mod state;

pub use actions::advance_actions;
pub use contact::{ContactKind, ContactOutcome, classify_contact, handle_contact};
pub use input::{EditToggle, InputOutcome, drop_ball, place_box, pointer_down};
pub use layout::{layout_field, make_bouncer, make_slot};
pub use scene::{Scene, SceneEvent, ScoreLabel};
pub use state::{
    Action, Body, Classification, GameState, ObjectArena, ObjectId, PhysicsObject, Rgb, Shape,
    Visual,
};
