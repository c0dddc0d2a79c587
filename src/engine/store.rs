use crate::color::Palette;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Serializable view of the active effect, its parameters, and the palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub effect_id: String,
    pub parameters: BTreeMap<String, f64>,
    pub palette: Palette,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Persistence seam for per-effect settings. Keyed by effect id.
pub trait ParameterStore {
    fn load(&self, effect_id: &str) -> Option<Snapshot>;
    fn save(&mut self, snapshot: &Snapshot);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParameterStore for MemoryStore {
    fn load(&self, effect_id: &str) -> Option<Snapshot> {
        self.entries.get(effect_id).cloned()
    }

    fn save(&mut self, snapshot: &Snapshot) {
        self.entries
            .insert(snapshot.effect_id.clone(), snapshot.clone());
    }
}
