//! World simulation engine.
//!
//! This module implements the bounded 2D/3D volume where organisms wander,
//! feed, fight, and reproduce, with rendering behind a forward-only trait.

pub mod grid;
pub mod organism;
pub mod policy;
pub mod render;
pub mod world;

pub use grid::SpatialGrid;
pub use organism::{Food, Organism, Traits};
pub use policy::Action;
pub use render::{NullRenderer, RecordingRenderer, Renderer};
pub use world::World;
