use crate::error::{EngineError, EngineResult};
use crate::field::{vec3, Vec3};
use ::palette::{FromColor, LinSrgb, Oklch, Srgb};
use serde::{Deserialize, Serialize};

pub const PALETTE_SIZE: usize = 4;
pub const MAX_CHROMA: f64 = 0.4;

/// Perceptual color: lightness in `[0, 1]`, chroma in `[0, 0.4]`, hue in
/// degrees `[0, 360)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl PaletteEntry {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Clamps lightness/chroma and wraps hue. Fails on NaN or infinity.
    pub fn normalized(l: f64, c: f64, h: f64) -> EngineResult<Self> {
        for (name, v) in [("lightness", l), ("chroma", c), ("hue", h)] {
            if !v.is_finite() {
                return Err(EngineError::NonFiniteValue {
                    name: name.to_string(),
                    value: v,
                });
            }
        }
        let mut hue = h.rem_euclid(360.0);
        if hue >= 360.0 {
            hue = 0.0;
        }
        Ok(Self {
            l: l.clamp(0.0, 1.0),
            c: c.clamp(0.0, MAX_CHROMA),
            h: hue,
        })
    }
}

pub const DEFAULT_PALETTE: [PaletteEntry; PALETTE_SIZE] = [
    PaletteEntry::new(0.72, 0.16, 250.0),
    PaletteEntry::new(0.62, 0.20, 300.0),
    PaletteEntry::new(0.82, 0.14, 190.0),
    PaletteEntry::new(0.90, 0.08, 80.0),
];

/// Four shared perceptual colors, addressed 1..=4 from the outside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    entries: [PaletteEntry; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PALETTE,
        }
    }
}

impl Palette {
    pub fn new(entries: [PaletteEntry; PALETTE_SIZE]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry; PALETTE_SIZE] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<PaletteEntry> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .copied()
    }

    pub fn set(&mut self, index: usize, l: f64, c: f64, h: f64) -> EngineResult<()> {
        if !(1..=PALETTE_SIZE).contains(&index) {
            return Err(EngineError::InvalidPaletteIndex(index));
        }
        self.entries[index - 1] = PaletteEntry::normalized(l, c, h)?;
        Ok(())
    }

    pub fn to_linear(&self, conv: &dyn ColorConversion) -> LinearPalette {
        LinearPalette(self.entries.map(|e| conv.to_linear(e)))
    }
}

/// Palette materialized in linear RGB, indexed 0..4 by effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearPalette(pub [Vec3; PALETTE_SIZE]);

impl LinearPalette {
    #[inline]
    pub fn color(&self, i: usize) -> Vec3 {
        self.0[i % PALETTE_SIZE]
    }
}

/// Perceptual to linear RGB conversion.
pub trait ColorConversion {
    fn to_linear(&self, entry: PaletteEntry) -> Vec3;
}

/// Treats palette entries as OKLCH; out-of-gamut results are clamped.
#[derive(Clone, Copy, Debug, Default)]
pub struct OklchConversion;

impl ColorConversion for OklchConversion {
    fn to_linear(&self, e: PaletteEntry) -> Vec3 {
        let rgb = LinSrgb::<f64>::from_color(Oklch::new(e.l, e.c, e.h));
        vec3(rgb.red, rgb.green, rgb.blue)
    }
}

/// Linear color to display-encoded 8-bit sRGB.
pub fn encode_srgb8(c: Vec3) -> [u8; 3] {
    let ch = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let lin = LinSrgb::<f32>::new(ch(c.x), ch(c.y), ch(c.z));
    let enc: Srgb<u8> = Srgb::from_linear(lin);
    [enc.red, enc.green, enc.blue]
}
