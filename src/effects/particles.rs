use super::Uniforms;
use crate::field::{hash1, hash2, sin2, smoothstep, vec2, Vec2, Vec3};
use crate::params::ParamDescriptor;
use std::f64::consts::TAU;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("layers", "Layers", 3.0, 3.0, 6.0, 1.0),
    ParamDescriptor::new("particleScale", "Grid scale", 6.0, 2.0, 20.0, 0.5),
    ParamDescriptor::new("particleSize", "Core size", 0.06, 0.01, 0.3, 0.005),
    ParamDescriptor::new("glow", "Glow falloff", 4.0, 0.5, 20.0, 0.1),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
    ParamDescriptor::new("twinkle", "Twinkle speed", 2.0, 0.0, 10.0, 0.1),
];

const GLOW_EPS: f64 = 0.01;

fn bucket_color(u: &Uniforms<'_>, h: f64) -> Vec3 {
    let idx = (h * 4.0).floor().min(3.0) as usize;
    u.palette.color(idx)
}

/// Controls shared by every layer, read once per pixel.
#[derive(Clone, Copy)]
struct Sprites {
    scale: f64,
    size: f64,
    glow: f64,
    t: f64,
    twinkle: f64,
}

fn layer(uv: Vec2, u: &Uniforms<'_>, s: Sprites, index: u32) -> Vec3 {
    let li = index as f64;
    let scale = s.scale * (1.0 + li * 0.75);
    let Sprites { size, glow, t, twinkle, .. } = s;

    // Far layers drift slower.
    let drift = vec2(0.10, 0.04) * (t / (1.0 + li * 0.8));
    let q = uv * scale + vec2(li * 7.31, li * 3.17) + drift;
    let cell = q.floor();
    let f = q - cell;

    let mut acc = Vec3::ZERO;
    for j in -1..=1 {
        for i in -1..=1 {
            let n = vec2(i as f64, j as f64);
            let id = cell + n;
            let h = hash2(id + Vec2::splat(li * 13.7));
            let wobble = sin2(vec2(t, t) * (vec2(0.5, 0.5) + h) + h * TAU) * 0.4 + 0.5;
            let d = (n + wobble - f).length();

            let halo = glow / (d * d + GLOW_EPS);
            let gate = 0.5 + 0.5 * (t * twinkle + h.x * TAU * 3.0).sin();
            let core = (1.0 - smoothstep(size * 0.5, size, d)) * gate;

            let pick = hash1(id + Vec2::splat(0.37 * li));
            acc += bucket_color(u, pick) * (halo + core);
        }
    }
    acc
}

/// Layers actually drawn: never fewer than three.
fn layer_count(layers: f64) -> u32 {
    layers.round().clamp(3.0, 6.0) as u32
}

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [layers, scale, size, glow, speed, twinkle] = u.params.leading();
    let sprites = Sprites {
        scale,
        size,
        glow: 0.0015 * glow,
        t: u.time * speed,
        twinkle,
    };
    let mut color = Vec3::ZERO;
    for i in 0..layer_count(layers) {
        let weight = 1.0 / (1.0 + i as f64 * 0.6);
        color += layer(uv, u, sprites, i) * weight;
    }
    color
}
