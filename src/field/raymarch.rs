use super::Vec3;

pub const DEFAULT_MAX_STEPS: u32 = 50;
pub const OPACITY_CUTOFF: f64 = 0.99;

/// One shaded sample along the ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchSample {
    pub color: Vec3,
    /// Opacity of this step, clamped to `[0, 1]` when composited.
    pub alpha: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchResult {
    /// Premultiplied accumulated color.
    pub color: Vec3,
    pub opacity: f64,
    /// Steps actually taken (`< max_steps` when the cutoff fired).
    pub steps: u32,
    pub distance: f64,
}

/// Fixed-step front-to-back volume marcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raymarch {
    pub max_steps: u32,
    pub step_size: f64,
    pub start: f64,
}

impl Default for Raymarch {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            step_size: 0.1,
            start: 0.0,
        }
    }
}

impl Raymarch {
    pub fn with_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Marches `ro + rd * dist`, calling `sample(pos, dist)` at each step.
    /// A `None` sample is empty space. Stops once opacity reaches
    /// [`OPACITY_CUTOFF`]: anything further is weighted by `1 - opacity`.
    pub fn march<F>(&self, ro: Vec3, rd: Vec3, mut sample: F) -> MarchResult
    where
        F: FnMut(Vec3, f64) -> Option<MarchSample>,
    {
        let mut color = Vec3::ZERO;
        let mut opacity = 0.0f64;
        let mut dist = self.start;
        let mut steps = 0u32;

        while steps < self.max_steps {
            if opacity >= OPACITY_CUTOFF {
                break;
            }
            steps += 1;
            let pos = ro + rd * dist;
            if let Some(s) = sample(pos, dist) {
                let a = s.alpha.clamp(0.0, 1.0);
                let w = a * (1.0 - opacity);
                color += s.color * w;
                opacity += w;
            }
            dist += self.step_size;
        }

        MarchResult {
            color,
            opacity,
            steps,
            distance: dist,
        }
    }
}
