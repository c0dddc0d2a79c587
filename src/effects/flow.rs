use super::Uniforms;
use crate::field::{domain_warp, fbm_rotated, mix3, vec2, Vec2, Vec3};
use crate::params::ParamDescriptor;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("flowScale", "Scale", 3.0, 0.5, 10.0, 0.1),
    ParamDescriptor::new("warp", "Warp strength", 1.5, 0.0, 4.0, 0.01),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
];

const OCTAVES: u32 = 5;

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [scale, warp, speed] = u.params.leading();
    let t = u.time * speed * 0.15;

    let q0 = uv * scale;
    let q = vec2(
        fbm_rotated(q0 + vec2(0.0, t), OCTAVES),
        fbm_rotated(domain_warp(q0, 1.1) + vec2(5.2, 1.3 - t), OCTAVES),
    );
    let r = vec2(
        fbm_rotated(q0 + q * (4.0 * warp) + vec2(1.7, 9.2) + Vec2::splat(t), OCTAVES),
        fbm_rotated(q0 + q * (4.0 * warp) + vec2(8.3, 2.8) - Vec2::splat(t * 0.7), OCTAVES),
    );
    let v = fbm_rotated(q0 + r * (4.0 * warp), OCTAVES);

    let mut color = mix3(u.palette.color(0), u.palette.color(1), (v * 1.6).clamp(0.0, 1.0));
    color = mix3(color, u.palette.color(2), q.length().clamp(0.0, 1.0) * 0.6);
    color = mix3(color, u.palette.color(3), r.y.clamp(0.0, 1.0) * 0.4);
    color * (0.4 + 1.2 * v)
}
