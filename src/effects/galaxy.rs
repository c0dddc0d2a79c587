use super::Uniforms;
use crate::field::{domain_warp, fbm, hash1, smoothstep, vec2, Vec2, Vec3};
use crate::params::ParamDescriptor;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("armDensity", "Arm winding", 9.0, 1.0, 30.0, 0.1),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
    ParamDescriptor::new("coreSize", "Core sharpness", 18.0, 2.0, 60.0, 0.5),
    ParamDescriptor::new("glow", "Glow falloff", 4.0, 0.5, 20.0, 0.1),
    ParamDescriptor::new("starDensity", "Star density", 0.5, 0.0, 1.0, 0.01),
    ParamDescriptor::new("twinkle", "Twinkle speed", 2.0, 0.0, 10.0, 0.1),
];

const TEXTURE_OCTAVES: u32 = 5;

/// One hashed star layer: cells above the threshold light up and twinkle.
fn star_layer(uv: Vec2, grid: f64, offset: Vec2, threshold: f64, t: f64, twinkle: f64) -> f64 {
    let cell = (uv * grid + offset).floor();
    let h = hash1(cell);
    if h < threshold {
        return 0.0;
    }
    let strength = (h - threshold) / (1.0 - threshold).max(1e-6);
    let flicker = 0.5 + 0.5 * (t * twinkle + h * 97.0).sin();
    strength * flicker
}

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [arm_density, speed, core_sharp, glow_falloff, star_density, twinkle] = u.params.leading();
    let t = u.time * speed;

    let c = u.centered(uv);
    let r = c.length();
    let angle = c.y.atan2(c.x);

    let texture = fbm(domain_warp(c, t * 0.05) * 4.0, TEXTURE_OCTAVES);
    let spiral = (2.0 * angle + r * arm_density - t).sin();
    let arm_value = spiral * 0.5 + 0.5 + (texture - 0.5) * 0.6;

    let radial_window = smoothstep(0.04, 0.15, r) * (1.0 - smoothstep(0.35, 0.62, r));
    let arms = smoothstep(0.45, 0.9, arm_value) * radial_window;
    let arm_color = u.palette.color(1) * (1.0 - texture) + u.palette.color(2) * texture;

    let core = (-r * core_sharp).exp();
    let halo = (-r * glow_falloff).exp();
    let core_color = u.palette.color(0) * (core * 1.4) + u.palette.color(3) * (halo * 0.45);

    let fine = 1.0 - 0.02 * star_density;
    let coarse = 1.0 - 0.008 * star_density;
    let stars = star_layer(uv, 220.0, Vec2::ZERO, fine, t, twinkle)
        + star_layer(uv, 90.0, vec2(17.3, 41.9), coarse, t, twinkle * 0.7) * 1.3;

    Vec3::splat(stars) + arm_color * arms + core_color
}
