use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static declaration of one control an effect reads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamDescriptor {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            default,
            min,
            max,
            step,
        }
    }

    pub fn same_bounds(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.step == other.step
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Parameter {
    fn from_descriptor(d: &ParamDescriptor) -> Self {
        Self {
            name: d.name.to_string(),
            value: d.default.clamp(d.min, d.max),
            min: d.min,
            max: d.max,
            step: d.step,
        }
    }
}

/// Named numeric slots. Values never leave `[min, max]`: out-of-range and
/// non-finite writes are rejected and the prior value is kept.
#[derive(Clone, Debug, Default)]
pub struct ParameterRegistry {
    params: BTreeMap<String, Parameter>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.params.get(name).map(|p| p.value)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    /// Creates the slot at its default if missing. Existing slots keep their
    /// value. Returns true when a slot was created.
    pub fn declare(&mut self, d: &ParamDescriptor) -> bool {
        if self.params.contains_key(d.name) {
            return false;
        }
        self.params
            .insert(d.name.to_string(), Parameter::from_descriptor(d));
        true
    }

    pub fn try_set(&mut self, name: &str, value: f64) -> EngineResult<()> {
        let Some(p) = self.params.get_mut(name) else {
            return Err(EngineError::UnknownParameter(name.to_string()));
        };
        if !value.is_finite() {
            return Err(EngineError::NonFiniteValue {
                name: name.to_string(),
                value,
            });
        }
        if value < p.min || value > p.max {
            return Err(EngineError::OutOfRange {
                name: name.to_string(),
                value,
                min: p.min,
                max: p.max,
            });
        }
        p.value = value;
        Ok(())
    }

    /// Like [`try_set`](Self::try_set) but never fails; rejected writes are
    /// logged and dropped.
    pub fn set(&mut self, name: &str, value: f64) {
        if let Err(err) = self.try_set(name, value) {
            log::debug!("ignored parameter write: {err}");
        }
    }

    /// Snapshot of the declared inputs, in declaration order. Names the
    /// registry lacks fall back to their descriptor default.
    pub fn subset(&self, descriptors: &[ParamDescriptor]) -> ParameterView {
        ParameterView {
            values: descriptors
                .iter()
                .map(|d| (d.name, self.get(d.name).unwrap_or(d.default)))
                .collect(),
        }
    }
}

/// Read-only per-frame parameter values handed to a color function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterView {
    values: Vec<(&'static str, f64)>,
}

impl ParameterView {
    pub fn from_pairs(values: Vec<(&'static str, f64)>) -> Self {
        Self { values }
    }

    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }

    /// Value for `name`, 0.0 when the effect did not declare it.
    #[inline]
    pub fn get(&self, name: &str) -> f64 {
        self.lookup(name).unwrap_or(0.0)
    }

    /// First `N` values in declaration order, 0.0 past the end. Color
    /// functions destructure their own controls with this so a pixel never
    /// searches by name.
    #[inline]
    pub fn leading<const N: usize>(&self) -> [f64; N] {
        std::array::from_fn(|i| self.values.get(i).map_or(0.0, |&(_, v)| v))
    }

    /// Last `N` values in declaration order, 0.0 where the view is shorter.
    #[inline]
    pub fn trailing<const N: usize>(&self) -> [f64; N] {
        let len = self.values.len();
        std::array::from_fn(|i| {
            (len + i)
                .checked_sub(N)
                .and_then(|idx| self.values.get(idx))
                .map_or(0.0, |&(_, v)| v)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|&(n, v)| (n.to_string(), v))
            .collect()
    }
}
