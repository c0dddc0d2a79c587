use super::Uniforms;
use crate::field::{fbm_rotated, mix3, smoothstep, vec2, Vec2, Vec3};
use crate::params::ParamDescriptor;

pub(super) const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("bands", "Curtain count", 3.0, 1.0, 8.0, 1.0),
    ParamDescriptor::new("waviness", "Waviness", 1.2, 0.0, 4.0, 0.01),
    ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01),
    ParamDescriptor::new("height", "Curtain height", 0.55, 0.1, 1.0, 0.01),
];

const OCTAVES: u32 = 6;

pub(super) fn shade(uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [bands, waviness, speed, height] = u.params.leading();
    let bands = bands.round().max(1.0) as u32;
    let t = u.time * speed;

    let night = mix3(u.palette.color(1) * 0.08, u.palette.color(0) * 0.2, uv.y);
    let mut color = night;

    for b in 0..bands {
        let bf = b as f64;
        let n = fbm_rotated(vec2(uv.x * 1.5 + bf * 3.1, t * 0.12 + bf * 1.7), OCTAVES);
        let base = 0.35 + bf * (height / bands as f64) * 0.5 + (n - 0.5) * waviness * 0.4;
        let above = uv.y - base;
        // Sharp lower edge, long fade upward.
        let curtain = smoothstep(-0.02, 0.0, above) * (-above.max(0.0) * 6.0 / height).exp();
        let ripple = 0.6 + 0.4 * fbm_rotated(vec2(uv.x * 12.0 + bf, t * 0.5), 3) * 2.0;
        let tint = mix3(u.palette.color(2), u.palette.color(3), (bf / bands as f64).min(1.0));
        color += tint * (curtain * ripple * 0.7);
    }
    color
}
