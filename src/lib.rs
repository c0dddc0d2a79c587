//! Real-time procedural visual effects: noise and raymarching primitives,
//! a catalog of effect color functions, a validated parameter registry with
//! a perceptual palette, and a render scheduler that never queues more than
//! one frame.

pub mod app;
pub mod capability;
pub mod color;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod field;
pub mod params;
pub mod render;
pub mod terminal;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
