use super::{vec2, vec3, Vec2, Vec3};
use glam::DMat2;
use std::f64::consts::TAU;

const HASH_SCALE: f64 = 43_758.545_312_3;

/// `x - floor(x)`, folded back into `[0, 1)` when rounding lands on 1.0.
#[inline]
pub fn fract(x: f64) -> f64 {
    let f = x - x.floor();
    if f >= 1.0 { 0.0 } else { f }
}

#[inline]
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn mix3(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    a + (b - a) * t
}

#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let span = edge1 - edge0;
    if span.abs() <= f64::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Scalar in `[0, 1)` from a 2D key. No seed: same key, same value.
#[inline]
pub fn hash1(p: Vec2) -> f64 {
    fract((p.dot(vec2(127.1, 311.7))).sin() * HASH_SCALE)
}

/// Two decorrelated scalars in `[0, 1)` from one 2D key.
#[inline]
pub fn hash2(p: Vec2) -> Vec2 {
    let q = vec2(p.dot(vec2(127.1, 311.7)), p.dot(vec2(269.5, 183.3)));
    vec2(fract(q.x.sin() * HASH_SCALE), fract(q.y.sin() * HASH_SCALE))
}

#[inline]
pub fn hash1_3(p: Vec3) -> f64 {
    fract((p.dot(vec3(127.1, 311.7, 74.7))).sin() * HASH_SCALE)
}

#[inline]
fn smooth_interp(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear value noise over the integer lattice. Exactly `hash1(p)` on
/// lattice points, always within `[0, 1]`.
pub fn value_noise(p: Vec2) -> f64 {
    let i = p.floor();
    let f = p - i;
    let u = vec2(smooth_interp(f.x), smooth_interp(f.y));

    let a = hash1(i);
    let b = hash1(i + vec2(1.0, 0.0));
    let c = hash1(i + vec2(0.0, 1.0));
    let d = hash1(i + vec2(1.0, 1.0));

    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

pub fn value_noise3(p: Vec3) -> f64 {
    let i = p.floor();
    let f = p - i;
    let u = vec3(smooth_interp(f.x), smooth_interp(f.y), smooth_interp(f.z));

    let corner = |dx: f64, dy: f64, dz: f64| hash1_3(i + vec3(dx, dy, dz));
    let x00 = mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), u.x);
    let x10 = mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), u.x);
    let x01 = mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), u.x);
    let x11 = mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), u.x);
    mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z)
}

/// Weight of octave `i` (0-based) in every fbm variant.
#[inline]
pub fn octave_amplitude(i: u32) -> f64 {
    0.5f64.powi(i as i32 + 1)
}

/// Axis-aligned fractal sum: amplitude halves, frequency doubles.
pub fn fbm(p: Vec2, octaves: u32) -> f64 {
    let mut sum = 0.0;
    let mut freq = 1.0;
    for i in 0..octaves {
        sum += octave_amplitude(i) * value_noise(p * freq);
        freq *= 2.0;
    }
    sum
}

const OCTAVE_ROTATION: f64 = 0.5;
const OCTAVE_SHIFT: Vec2 = vec2(100.0, 100.0);

/// Fractal sum whose domain is rotated and shifted between octaves, so no
/// axis dominates. Same amplitude schedule as [`fbm`].
pub fn fbm_rotated(p: Vec2, octaves: u32) -> f64 {
    let rot = DMat2::from_angle(OCTAVE_ROTATION);
    let mut q = p;
    let mut sum = 0.0;
    for i in 0..octaves {
        sum += octave_amplitude(i) * value_noise(q);
        q = rot * q * 2.0 + OCTAVE_SHIFT;
    }
    sum
}

pub fn fbm3(p: Vec3, octaves: u32) -> f64 {
    let mut sum = 0.0;
    let mut q = p;
    for i in 0..octaves {
        sum += octave_amplitude(i) * value_noise3(q);
        q = q * 2.02 + vec3(1.7, 9.2, 5.3);
    }
    sum
}

/// Rotates `p` by `angle` radians.
#[inline]
pub fn domain_warp(p: Vec2, angle: f64) -> Vec2 {
    DMat2::from_angle(angle) * p
}

/// Polynomial smooth minimum. `k <= 0` is a hard `min`; operands are
/// ordered first so the result is exactly symmetric.
pub fn smooth_min(a: f64, b: f64, k: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if k <= 0.0 {
        return lo;
    }
    let h = (0.5 + 0.5 * (hi - lo) / k).clamp(0.0, 1.0);
    mix(hi, lo, h) - k * h * (1.0 - h)
}

/// Componentwise sine.
#[inline]
pub fn sin2(v: Vec2) -> Vec2 {
    vec2(v.x.sin(), v.y.sin())
}

/// Sin-animated jitter inside a unit cell, shared by the cell-based effects.
#[inline]
pub fn animated_point(jitter: Vec2, phase: f64) -> Vec2 {
    sin2(Vec2::splat(phase) + jitter * TAU) * 0.5 + 0.5
}
