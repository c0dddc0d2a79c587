//! Procedural building blocks shared by every effect. All functions here are
//! pure: identical inputs give bit-identical outputs.

pub mod primitives;
pub mod raymarch;

pub use glam::{dvec2 as vec2, dvec3 as vec3, DVec2 as Vec2, DVec3 as Vec3};

pub use primitives::{
    animated_point, domain_warp, fbm, fbm3, fbm_rotated, fract, hash1, hash1_3, hash2, mix, mix3,
    octave_amplitude, sin2, smooth_min, smoothstep, value_noise, value_noise3,
};
pub use raymarch::{MarchResult, MarchSample, Raymarch, DEFAULT_MAX_STEPS, OPACITY_CUTOFF};
