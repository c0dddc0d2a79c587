//! Volumetric cloud layer. The camera drifts forward through a 3D fbm
//! density field; every occupied step takes a second density sample toward
//! the light for self-shadowing.

use super::Uniforms;
use crate::field::{
    fbm3, mix3, smoothstep, vec3, MarchResult, MarchSample, Raymarch, Vec2, Vec3,
};
use crate::params::ParamDescriptor;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("cloudScale", "Cloud scale", 0.35, 0.05, 2.0, 0.01),
    ParamDescriptor::new("threshold", "Coverage threshold", 0.45, 0.0, 1.0, 0.01),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
    ParamDescriptor::new("shadow", "Shadow absorption", 3.0, 0.0, 10.0, 0.1),
    ParamDescriptor::new("steps", "March steps", 50.0, 8.0, 128.0, 1.0),
    ParamDescriptor::new("fog", "Distance fog", 0.08, 0.0, 1.0, 0.01),
];

const OCTAVES: u32 = 5;
const STEP_SIZE: f64 = 0.12;
const START: f64 = 0.2;
const LIGHT_OFFSET: f64 = 0.35;
const MIN_DENSITY: f64 = 0.01;
const OPACITY_PER_STEP: f64 = 0.35;
const DRIFT: f64 = 0.5;

#[inline]
fn density(pos: Vec3, scale: f64, threshold: f64) -> f64 {
    smoothstep(threshold, threshold + 0.4, fbm3(pos * scale, OCTAVES))
}

/// Marches the cloud layer for one pixel. Exposed so callers can inspect
/// opacity and step count.
pub fn march_layer(uv: Vec2, u: &Uniforms<'_>) -> MarchResult {
    let [scale, threshold, speed, absorb, steps, fog] = u.params.leading();
    let steps = steps.round().max(1.0) as u32;
    let travel = u.time * speed * DRIFT;

    let c = u.centered(uv);
    let ro = vec3(0.6 * (travel * 0.1).sin(), 0.15 * (travel * 0.07).cos(), travel);
    let rd = vec3(c.x, c.y + 0.12, 1.0).normalize_or_zero();
    let light = vec3(0.6, 0.55, -0.45).normalize_or_zero();

    let lit = mix3(u.palette.color(3), Vec3::ONE, 0.5);
    let dark = u.palette.color(1) * 0.35;

    let marcher = Raymarch {
        max_steps: steps,
        step_size: STEP_SIZE,
        start: START,
    };
    marcher.march(ro, rd, |pos, dist| {
        let d = density(pos, scale, threshold);
        if d <= MIN_DENSITY {
            return None;
        }
        let light_density = density(pos + light * LIGHT_OFFSET, scale, threshold);
        let shade = (-absorb * light_density).exp();
        Some(MarchSample {
            color: mix3(dark, lit, shade),
            alpha: d * OPACITY_PER_STEP * (-fog * dist).exp(),
        })
    })
}

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let horizon = u.palette.color(2) * 0.9;
    let zenith = u.palette.color(0) * 0.5;
    let sky = mix3(horizon, zenith, smoothstep(0.0, 1.0, uv.y));

    let layer = march_layer(uv, u);
    sky * (1.0 - layer.opacity) + layer.color
}
