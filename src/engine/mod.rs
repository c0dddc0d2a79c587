pub mod backend;
pub mod clock;
pub mod scheduler;
pub mod store;
pub mod switch;
pub mod viewport;

pub use backend::{
    render_frame, render_frame_parallel, CpuBackend, FrameBuffer, FrameJob, FrameResult,
    PendingFrame, RenderBackend, Submission, ThreadedBackend,
};
pub use clock::{FrameClock, ManualClock, MonotonicClock};
pub use scheduler::{FrameStats, RenderState, Scheduler, SchedulerState, TickOutcome, TickReport};
pub use store::{MemoryStore, ParameterStore, Snapshot};
pub use switch::EffectSwitch;
pub use viewport::{ResizeTracker, Viewport};

use crate::capability::BackendReport;
use crate::color::{ColorConversion, LinearPalette, OklchConversion, Palette};
use crate::config::BackendKind;
use crate::effects::{EffectCatalog, EffectDescriptor, EffectInfo, Uniforms};
use crate::error::EngineResult;
use crate::field::{vec2, Vec2, Vec3};
use crate::params::{Parameter, ParameterRegistry};

/// Host-facing control surface: effect selection, parameters, palette, and
/// the render scheduler.
pub struct Engine {
    registry: ParameterRegistry,
    palette: Palette,
    linear: LinearPalette,
    converter: Box<dyn ColorConversion>,
    switch: EffectSwitch,
    scheduler: Scheduler,
}

impl Engine {
    pub fn new(clock: Box<dyn FrameClock>) -> Self {
        Self::with_converter(clock, Box::new(OklchConversion))
    }

    pub fn with_converter(clock: Box<dyn FrameClock>, converter: Box<dyn ColorConversion>) -> Self {
        let mut registry = ParameterRegistry::new();
        let switch = EffectSwitch::new(EffectCatalog::builtin(), &mut registry);
        let scheduler = Scheduler::new(clock, switch.active().id);
        let palette = Palette::default();
        let linear = palette.to_linear(converter.as_ref());
        Self {
            registry,
            palette,
            linear,
            converter,
            switch,
            scheduler,
        }
    }

    pub fn start(&mut self, backend: BackendKind, workers: usize, viewport: Viewport) -> BackendReport {
        self.scheduler.start(backend, workers, viewport)
    }

    pub fn attach_backend(&mut self, backend: Box<dyn RenderBackend>, viewport: Viewport) {
        self.scheduler.attach(backend, viewport);
    }

    pub fn catalog(&self) -> &EffectCatalog {
        self.switch.catalog()
    }

    pub fn list_effects(&self) -> Vec<EffectInfo> {
        self.switch.catalog().list()
    }

    pub fn active_effect(&self) -> &EffectDescriptor {
        self.switch.active()
    }

    /// Switches effects. Elapsed time, palette, existing parameter values
    /// and any in-flight frame are left as they are.
    pub fn select_effect(&mut self, id: &str) -> EngineResult<()> {
        let effect = self.switch.select(id, &mut self.registry)?;
        self.scheduler.set_active_effect(effect.id);
        Ok(())
    }

    pub fn cycle_effect(&mut self, delta: isize) -> &'static str {
        let id = self.switch.cycle(delta, &mut self.registry).id;
        self.scheduler.set_active_effect(id);
        id
    }

    pub fn get_parameter(&self, name: &str) -> Option<f64> {
        self.registry.get(name)
    }

    /// Writes that name an undeclared parameter, or a value outside its
    /// bounds, are dropped.
    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.registry.set(name, value);
    }

    pub fn try_set_parameter(&mut self, name: &str, value: f64) -> EngineResult<()> {
        self.registry.try_set(name, value)
    }

    /// Parameters the active effect declares, in declaration order.
    pub fn active_parameters(&self) -> Vec<Parameter> {
        self.switch
            .active()
            .params()
            .iter()
            .filter_map(|d| self.registry.parameter(d.name).cloned())
            .collect()
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn linear_palette(&self) -> &LinearPalette {
        &self.linear
    }

    pub fn set_palette_entry(&mut self, index: usize, l: f64, c: f64, h: f64) -> EngineResult<()> {
        if let Err(err) = self.palette.set(index, l, c, h) {
            log::debug!("palette write rejected: {err}");
            return Err(err);
        }
        self.linear = self.palette.to_linear(self.converter.as_ref());
        Ok(())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.linear = self.palette.to_linear(self.converter.as_ref());
    }

    pub fn snapshot(&self) -> Snapshot {
        let effect = self.switch.active();
        Snapshot {
            effect_id: effect.id.to_string(),
            parameters: self.registry.subset(effect.params()).to_map(),
            palette: self.palette,
        }
    }

    /// Selects the snapshot's effect, then applies its parameters and
    /// palette. Parameter values that fail validation are skipped.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
        self.select_effect(&snapshot.effect_id)?;
        for (name, &value) in &snapshot.parameters {
            self.registry.set(name, value);
        }
        for (i, e) in snapshot.palette.entries().iter().enumerate() {
            if let Err(err) = self.palette.set(i + 1, e.l, e.c, e.h) {
                log::debug!("snapshot palette entry skipped: {err}");
            }
        }
        self.linear = self.palette.to_linear(self.converter.as_ref());
        Ok(())
    }

    pub fn save_to(&self, store: &mut dyn ParameterStore) {
        store.save(&self.snapshot());
    }

    /// Loads the stored settings for the active effect. Returns false when
    /// the store has nothing for it.
    pub fn restore_from(&mut self, store: &dyn ParameterStore) -> EngineResult<bool> {
        let Some(snapshot) = store.load(self.switch.active().id) else {
            return Ok(false);
        };
        self.apply_snapshot(&snapshot)?;
        Ok(true)
    }

    pub fn notify_resize(&mut self, viewport: Viewport) {
        self.scheduler.notify_resize(viewport);
    }

    pub fn tick(&mut self) -> TickReport {
        let effect = self.switch.active();
        let params = self.registry.subset(effect.params());
        let (effect_id, shade) = (effect.id, effect.shade_fn());
        let palette = self.linear;
        self.scheduler.tick(move |state, frame_index| FrameJob {
            effect_id,
            shade,
            time: state.elapsed_seconds,
            width: state.resolution.0,
            height: state.resolution.1,
            palette,
            params,
            frame_index,
        })
    }

    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        self.scheduler.take_frame()
    }

    pub fn wait_for_completion(&mut self) {
        self.scheduler.wait_for_completion();
    }

    /// Color of the active effect at `uv` and `time` against the current
    /// resolution, outside the render loop.
    pub fn evaluate(&self, uv: Vec2, time: f64) -> Vec3 {
        let effect = self.switch.active();
        let params = self.registry.subset(effect.params());
        let (w, h) = self.scheduler.render_state().resolution;
        let u = Uniforms {
            time,
            resolution: vec2(w as f64, h as f64),
            palette: &self.linear,
            params: &params,
        };
        effect.color(uv, &u)
    }

    pub fn render_state(&self) -> &RenderState {
        self.scheduler.render_state()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn stats(&self) -> FrameStats {
        self.scheduler.stats()
    }

    pub fn dispose(&mut self) {
        self.scheduler.dispose();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Box::new(MonotonicClock::new()))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.scheduler.dispose();
    }
}
