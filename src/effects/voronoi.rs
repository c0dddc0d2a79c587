use super::Uniforms;
use crate::field::{animated_point, hash1, hash2, smooth_min, smoothstep, vec2, Vec2, Vec3};
use crate::params::ParamDescriptor;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("cellDensity", "Cell density", 5.0, 1.0, 24.0, 0.5),
    ParamDescriptor::new("borderWidth", "Border width", 0.05, 0.0, 0.5, 0.005),
    ParamDescriptor::new("tightness", "Tightness", 2.0, 0.25, 8.0, 0.05),
    ParamDescriptor::new("softness", "Softness", 0.3, 0.0, 1.0, 0.01),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
];

const EDGE_THRESHOLD: f64 = 0.42;
const EDGE_GAIN: f64 = 0.65;

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [density, border, tightness, softness, speed] = u.params.leading();
    let phase = u.time * speed;

    let q = uv * density;
    let cell = q.floor();
    let f = q - cell;

    let mut m_dist = f64::MAX;
    let mut m_id = cell;
    let mut s_dist = 8.0f64;

    for j in -1..=1 {
        for i in -1..=1 {
            let n = vec2(i as f64, j as f64);
            let id = cell + n;
            let point = animated_point(hash2(id), phase);
            let d = (n + point - f).length();
            if d < m_dist {
                m_dist = d;
                m_id = id;
            }
            s_dist = smooth_min(s_dist, d, softness);
        }
    }

    let bucket = (hash1(m_id) * 3.0).floor().min(2.0) as usize;
    let base = u.palette.color(bucket);

    let falloff = (1.0 - s_dist).max(0.0).powf(tightness);
    let edge = if border > 0.0 {
        1.0 - smoothstep(0.0, border, (s_dist - EDGE_THRESHOLD).abs())
    } else {
        0.0
    };

    base * falloff + u.palette.color(3) * (edge * EDGE_GAIN)
}
