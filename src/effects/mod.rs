mod aurora;
pub mod clouds;
mod flow;
mod galaxy;
mod particles;
mod voronoi;

use crate::color::LinearPalette;
use crate::field::{hash1, vec2, Vec2, Vec3};
use crate::params::{ParamDescriptor, ParameterView};
use serde::Serialize;

/// Per-frame inputs shared by every pixel of one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct Uniforms<'a> {
    pub time: f64,
    /// Physical pixels.
    pub resolution: Vec2,
    pub palette: &'a LinearPalette,
    pub params: &'a ParameterView,
}

impl Uniforms<'_> {
    pub fn aspect(&self) -> f64 {
        if self.resolution.y > 0.0 {
            self.resolution.x / self.resolution.y
        } else {
            1.0
        }
    }

    /// `uv` re-centred on the viewport middle, in aspect-corrected units.
    pub fn centered(&self, uv: Vec2) -> Vec2 {
        uv - vec2(0.5 * self.aspect(), 0.5)
    }
}

/// Structural color of one pixel, before the tone stage. `uv` is already
/// aspect corrected (x scaled by width/height).
pub type ShadeFn = fn(Vec2, &Uniforms<'_>) -> Vec3;

pub const TONE_PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::new("contrast", "Contrast", 1.0, 0.0, 3.0, 0.01),
    ParamDescriptor::new("brightness", "Brightness", 0.0, -1.0, 1.0, 0.01),
    ParamDescriptor::new("noise", "Grain", 0.02, 0.0, 0.5, 0.005),
];

/// Contrast/brightness then additive grain. Runs last for every effect.
pub fn tone(color: Vec3, uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    let [contrast, brightness, noise] = u.params.trailing();

    let toned = (color - 0.5) * contrast + 0.5 + brightness;
    let seed = uv * u.resolution + Vec2::splat(crate::field::fract(u.time) * 61.0);
    toned + (hash1(seed) - 0.5) * noise
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Voronoi,
    Clouds,
    Galaxy,
    Particles,
    Aurora,
    Flow,
}

impl EffectKind {
    pub const fn all() -> [Self; 6] {
        [
            Self::Voronoi,
            Self::Clouds,
            Self::Galaxy,
            Self::Particles,
            Self::Aurora,
            Self::Flow,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Voronoi => "voronoi",
            Self::Clouds => "clouds",
            Self::Galaxy => "galaxy",
            Self::Particles => "particles",
            Self::Aurora => "aurora",
            Self::Flow => "flow",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.id() == id)
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Voronoi => "Voronoi Cells",
            Self::Clouds => "Volumetric Clouds",
            Self::Galaxy => "Spiral Galaxy",
            Self::Particles => "Parallax Particles",
            Self::Aurora => "Aurora Curtains",
            Self::Flow => "Warped Flow",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Voronoi => "Animated jittered cells with soft borders and edge highlights",
            Self::Clouds => "Raymarched cloud layer drifting under a sky gradient",
            Self::Galaxy => "Spiral arms, bright core and a twinkling starfield",
            Self::Particles => "Layers of glowing point sprites at different depths",
            Self::Aurora => "Rippling light curtains from rotated fractal noise",
            Self::Flow => "Two-level domain-warped noise flowing over time",
        }
    }

    fn own_params(self) -> &'static [ParamDescriptor] {
        match self {
            Self::Voronoi => voronoi::PARAMS,
            Self::Clouds => clouds::PARAMS,
            Self::Galaxy => galaxy::PARAMS,
            Self::Particles => particles::PARAMS,
            Self::Aurora => aurora::PARAMS,
            Self::Flow => flow::PARAMS,
        }
    }

    fn shade_fn(self) -> ShadeFn {
        match self {
            Self::Voronoi => voronoi::shade,
            Self::Clouds => clouds::shade,
            Self::Galaxy => galaxy::shade,
            Self::Particles => particles::shade,
            Self::Aurora => aurora::shade,
            Self::Flow => flow::shade,
        }
    }
}

/// Registered effect. Immutable once the catalog is built.
#[derive(Clone, Debug)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    params: Vec<ParamDescriptor>,
    shade: ShadeFn,
}

impl EffectDescriptor {
    fn new(kind: EffectKind) -> Self {
        let mut params = kind.own_params().to_vec();
        params.extend_from_slice(&TONE_PARAMS);
        Self {
            kind,
            id: kind.id(),
            display_name: kind.display_name(),
            description: kind.description(),
            params,
            shade: kind.shade_fn(),
        }
    }

    /// Declared parameter subset, effect-specific first, tone last.
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn shade_fn(&self) -> ShadeFn {
        self.shade
    }

    pub fn shade(&self, uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
        (self.shade)(uv, u)
    }

    /// Full color contract: structural shade followed by the tone stage.
    pub fn color(&self, uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
        evaluate(self.shade, uv, u)
    }

    pub fn info(&self) -> EffectInfo {
        EffectInfo {
            id: self.id,
            display_name: self.display_name,
            description: self.description,
            parameters: self.params.clone(),
        }
    }
}

#[inline]
pub fn evaluate(shade: ShadeFn, uv: Vec2, u: &Uniforms<'_>) -> Vec3 {
    tone(shade(uv, u), uv, u)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamDescriptor>,
}

/// Fixed id -> effect table built once at startup.
#[derive(Clone, Debug)]
pub struct EffectCatalog {
    effects: Vec<EffectDescriptor>,
}

impl Default for EffectCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EffectCatalog {
    pub fn builtin() -> Self {
        Self {
            effects: EffectKind::all()
                .into_iter()
                .map(EffectDescriptor::new)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.effects.iter().position(|e| e.id == id)
    }

    pub fn by_index(&self, idx: usize) -> Option<&EffectDescriptor> {
        self.effects.get(idx)
    }

    /// Never empty: the only constructor is [`builtin`](Self::builtin).
    pub fn as_slice(&self) -> &[EffectDescriptor] {
        &self.effects
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.effects.iter()
    }

    pub fn list(&self) -> Vec<EffectInfo> {
        self.effects.iter().map(EffectDescriptor::info).collect()
    }
}
