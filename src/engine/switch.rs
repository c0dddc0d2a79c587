use crate::effects::{EffectCatalog, EffectDescriptor};
use crate::error::{EngineError, EngineResult};
use crate::params::ParameterRegistry;

/// Active-effect state machine. Selecting an effect binds its declared
/// parameters into the registry; nothing else about the engine changes.
#[derive(Clone, Debug)]
pub struct EffectSwitch {
    catalog: EffectCatalog,
    active: usize,
}

impl EffectSwitch {
    /// Starts on the first catalog entry.
    pub fn new(catalog: EffectCatalog, registry: &mut ParameterRegistry) -> Self {
        let switch = Self { catalog, active: 0 };
        bind(switch.active(), registry);
        switch
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    pub fn active(&self) -> &EffectDescriptor {
        &self.catalog.as_slice()[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Unknown ids leave the active effect and registry untouched.
    pub fn select(&mut self, id: &str, registry: &mut ParameterRegistry) -> EngineResult<&EffectDescriptor> {
        let Some(index) = self.catalog.index_of(id) else {
            return Err(EngineError::UnknownEffect(id.to_string()));
        };
        self.active = index;
        let created = bind(self.active(), registry);
        log::info!("effect selected: {id} ({created} new parameters)");
        Ok(self.active())
    }

    /// Steps through the catalog, wrapping at either end.
    pub fn cycle(&mut self, delta: isize, registry: &mut ParameterRegistry) -> &EffectDescriptor {
        let len = self.catalog.len() as isize;
        let next = (self.active as isize + delta).rem_euclid(len) as usize;
        let id = self.catalog.as_slice()[next].id;
        self.active = next;
        let created = bind(self.active(), registry);
        log::info!("effect selected: {id} ({created} new parameters)");
        self.active()
    }
}

fn bind(effect: &EffectDescriptor, registry: &mut ParameterRegistry) -> usize {
    effect.params().iter().filter(|d| registry.declare(d)).count()
}
