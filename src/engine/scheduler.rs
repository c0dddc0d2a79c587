//! Frame pacing. At most one frame is ever in flight: a tick that finds the
//! previous frame still rendering is dropped rather than queued, so a slow
//! backend lowers the frame rate instead of building a backlog.

use super::backend::{FrameBuffer, FrameJob, FrameResult, PendingFrame, RenderBackend, Submission};
use super::clock::FrameClock;
use super::viewport::{ResizeTracker, Viewport};
use crate::capability::{probe_backend, BackendReport};
use crate::config::BackendKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Uninitialized,
    Ready,
    Rendering,
    Disposed,
}

/// Shared per-frame state. `frame_in_flight` is only true between the
/// submission and completion of an asynchronous backend call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub elapsed_seconds: f64,
    /// Physical pixels.
    pub resolution: (u32, u32),
    pub pixel_ratio: f64,
    pub active_effect_id: &'static str,
    pub frame_in_flight: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not initialized, or disposed.
    Inactive,
    /// Previous frame still rendering; nothing submitted.
    Dropped,
    /// Handed to an asynchronous backend.
    Submitted,
    /// Rendered synchronously within this tick.
    Completed,
    /// Backend reported an error; the next tick submits normally.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub resolution_changed: bool,
}

impl TickReport {
    fn idle(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            resolution_changed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub ticks: u64,
    pub submitted: u64,
    pub completed: u64,
    pub dropped: u64,
    pub failed: u64,
    pub resizes_applied: u64,
}

pub struct Scheduler {
    state: SchedulerState,
    render: RenderState,
    clock: Box<dyn FrameClock>,
    backend: Option<Box<dyn RenderBackend>>,
    report: Option<BackendReport>,
    pending: Option<PendingFrame>,
    resize: ResizeTracker,
    latest: Option<FrameBuffer>,
    stats: FrameStats,
    frame_index: u64,
}

impl Scheduler {
    pub fn new(clock: Box<dyn FrameClock>, active_effect_id: &'static str) -> Self {
        Self {
            state: SchedulerState::Uninitialized,
            render: RenderState {
                elapsed_seconds: 0.0,
                resolution: (1, 1),
                pixel_ratio: 1.0,
                active_effect_id,
                frame_in_flight: false,
            },
            clock,
            backend: None,
            report: None,
            pending: None,
            resize: ResizeTracker::default(),
            latest: None,
            stats: FrameStats::default(),
            frame_index: 0,
        }
    }

    /// Selects a backend via [`probe_backend`] and starts ticking.
    pub fn start(&mut self, requested: BackendKind, workers: usize, viewport: Viewport) -> BackendReport {
        let (backend, report) = probe_backend(requested, workers);
        log::info!(
            "render backend {} ({})",
            backend.name(),
            report.status_label()
        );
        self.report = Some(report.clone());
        self.attach(backend, viewport);
        report
    }

    /// Installs a backend directly. Ignored once disposed.
    pub fn attach(&mut self, backend: Box<dyn RenderBackend>, viewport: Viewport) {
        if self.state == SchedulerState::Disposed {
            return;
        }
        if let Some(mut old) = self.backend.take() {
            self.wait_for_completion();
            old.dispose();
        }
        self.apply_viewport(viewport);
        self.backend = Some(backend);
        self.state = SchedulerState::Ready;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn report(&self) -> Option<&BackendReport> {
        self.report.as_ref()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    pub fn set_active_effect(&mut self, id: &'static str) {
        self.render.active_effect_id = id;
    }

    /// Records the new viewport. Any number of calls between two ticks is
    /// applied once, by the next tick that submits.
    pub fn notify_resize(&mut self, viewport: Viewport) {
        if self.state != SchedulerState::Disposed {
            self.resize.notify(viewport);
        }
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Advances one frame. `build` turns the current render state and frame
    /// index into a job; it only runs when a frame is actually submitted.
    pub fn tick<F>(&mut self, build: F) -> TickReport
    where
        F: FnOnce(&RenderState, u64) -> FrameJob,
    {
        if matches!(
            self.state,
            SchedulerState::Uninitialized | SchedulerState::Disposed
        ) {
            return TickReport::idle(TickOutcome::Inactive);
        }
        self.stats.ticks += 1;

        if self.render.frame_in_flight {
            self.poll_completion();
        }
        if self.render.frame_in_flight {
            self.stats.dropped += 1;
            log::trace!("frame dropped; previous frame still rendering");
            return TickReport::idle(TickOutcome::Dropped);
        }

        let Some(backend) = self.backend.as_mut() else {
            return TickReport::idle(TickOutcome::Inactive);
        };

        self.render.frame_in_flight = true;
        self.state = SchedulerState::Rendering;

        let now = self.clock.elapsed_seconds();
        if now.is_finite() && now > self.render.elapsed_seconds {
            self.render.elapsed_seconds = now;
        }

        let resolution_changed = match self.resize.take() {
            Some(vp) => {
                self.render.resolution = vp.physical();
                self.render.pixel_ratio = vp.pixel_ratio;
                self.stats.resizes_applied += 1;
                log::debug!(
                    "resize applied: {}x{} @{}",
                    self.render.resolution.0,
                    self.render.resolution.1,
                    vp.pixel_ratio
                );
                true
            }
            None => false,
        };

        self.frame_index += 1;
        let job = build(&self.render, self.frame_index);
        self.stats.submitted += 1;
        let submission = backend.submit(job);

        let outcome = match submission {
            Submission::Ready(result) => self.finish(result),
            Submission::Pending(pending) => {
                self.pending = Some(pending);
                TickOutcome::Submitted
            }
        };
        TickReport {
            outcome,
            resolution_changed,
        }
    }

    /// Collects a finished asynchronous frame without blocking. Returns true
    /// when a pending frame was resolved.
    pub fn poll_completion(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        match pending.try_complete() {
            Some(result) => {
                self.pending = None;
                self.finish(result);
                true
            }
            None => false,
        }
    }

    /// Blocks until the in-flight frame, if any, resolves.
    pub fn wait_for_completion(&mut self) {
        if let Some(pending) = self.pending.take() {
            let result = pending.wait();
            self.finish(result);
        }
    }

    /// Latest completed frame, handed out once.
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        self.latest.take()
    }

    /// Waits out the in-flight frame, releases the backend, and stops
    /// ticking for good.
    pub fn dispose(&mut self) {
        if self.state == SchedulerState::Disposed {
            return;
        }
        self.wait_for_completion();
        if let Some(mut backend) = self.backend.take() {
            backend.dispose();
        }
        self.latest = None;
        self.render.frame_in_flight = false;
        self.state = SchedulerState::Disposed;
        log::debug!(
            "scheduler disposed after {} frames ({} dropped, {} failed)",
            self.stats.completed,
            self.stats.dropped,
            self.stats.failed
        );
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.render.resolution = viewport.physical();
        self.render.pixel_ratio = viewport.pixel_ratio;
    }

    fn finish(&mut self, result: FrameResult) -> TickOutcome {
        self.render.frame_in_flight = false;
        if self.state == SchedulerState::Rendering {
            self.state = SchedulerState::Ready;
        }
        match result {
            Ok(frame) => {
                self.stats.completed += 1;
                self.latest = Some(frame);
                TickOutcome::Completed
            }
            Err(err) => {
                self.stats.failed += 1;
                log::warn!("frame render failed: {err}");
                TickOutcome::Failed
            }
        }
    }
}
