use crate::config::BackendKind;
use crate::engine::backend::{CpuBackend, RenderBackend, ThreadedBackend};

/// Outcome of backend selection: what was asked for, what is running, and
/// the reasons for any difference.
#[derive(Debug, Clone)]
pub struct BackendReport {
    pub requested: BackendKind,
    pub selected: BackendKind,
    pub workers: usize,
    notes: Vec<String>,
}

impl BackendReport {
    pub fn new(requested: BackendKind, workers: usize) -> Self {
        Self {
            requested,
            selected: requested,
            workers,
            notes: Vec::new(),
        }
    }

    pub fn changed(&self) -> bool {
        self.selected != self.requested
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn record_fallback(&mut self, to: BackendKind, reason: impl Into<String>) {
        self.selected = to;
        self.notes.push(reason.into());
    }

    pub fn status_label(&self) -> String {
        if self.changed() {
            return format!(
                "fallback {}->{}",
                self.requested.label(),
                self.selected.label()
            );
        }
        match self.selected {
            BackendKind::Cpu => "cpu".to_string(),
            BackendKind::Threaded => format!("threaded x{}", self.workers),
        }
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Builds the requested backend, dropping to the synchronous CPU backend
/// when it cannot start.
pub fn probe_backend(requested: BackendKind, workers: usize) -> (Box<dyn RenderBackend>, BackendReport) {
    let mut report = BackendReport::new(requested, workers);

    if requested == BackendKind::Threaded && force_cpu() {
        report.record_fallback(BackendKind::Cpu, "FIELDFX_FORCE_CPU set; using cpu backend");
        log::warn!("backend fallback: {}", report.status_label());
        return (Box::new(CpuBackend), report);
    }

    match requested {
        BackendKind::Cpu => (Box::new(CpuBackend), report),
        BackendKind::Threaded => match ThreadedBackend::new(workers) {
            Ok(backend) => (Box::new(backend), report),
            Err(err) => {
                report.record_fallback(BackendKind::Cpu, format!("{err}; falling back to cpu backend"));
                log::warn!("backend fallback: {err}");
                (Box::new(CpuBackend), report)
            }
        },
    }
}

fn force_cpu() -> bool {
    let Ok(v) = std::env::var("FIELDFX_FORCE_CPU") else {
        return false;
    };
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
