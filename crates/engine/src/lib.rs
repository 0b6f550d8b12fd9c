//! Interactive construction and transformation engine.
//!
//! Converts pointer/keyboard input into validated building elements (walls,
//! floors, openings, cuts) and constrained transforms (move/rotate/scale) of
//! the current selection. Rendering, persistence and undo/redo replay live
//! outside this crate; the engine only consumes the narrow model interface in
//! [`model::ModelStore`].

pub mod camera;
pub mod constraints;
pub mod events;
pub mod fixtures;
pub mod geometry;
pub mod gizmo;
pub mod harness;
pub mod manager;
pub mod model;
pub mod snap;
pub mod tools;
