use crate::color::{encode_srgb8, LinearPalette};
use crate::effects::{evaluate, ShadeFn, Uniforms};
use crate::error::{EngineError, EngineResult};
use crate::field::{vec2, Vec2};
use crate::params::ParameterView;
use futures::channel::oneshot;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Everything one frame evaluation needs, captured at submission time.
#[derive(Clone, Debug)]
pub struct FrameJob {
    pub effect_id: &'static str,
    pub shade: ShadeFn,
    pub time: f64,
    /// Physical pixels.
    pub width: u32,
    pub height: u32,
    pub palette: LinearPalette,
    pub params: ParameterView,
    pub frame_index: u64,
}

impl FrameJob {
    pub fn uniforms(&self) -> Uniforms<'_> {
        Uniforms {
            time: self.time,
            resolution: vec2(self.width as f64, self.height as f64),
            palette: &self.palette,
            params: &self.params,
        }
    }

    /// Aspect-corrected coordinate of a pixel centre. y grows upward.
    #[inline]
    pub fn pixel_uv(&self, x: u32, y: u32) -> Vec2 {
        let h = self.height.max(1) as f64;
        vec2((x as f64 + 0.5) / h, 1.0 - (y as f64 + 0.5) / h)
    }

    /// Fills `rows` (RGBA8, whole rows) starting at pixel row `first_row`.
    pub fn render_rows(&self, first_row: u32, rows: &mut [u8]) {
        let u = self.uniforms();
        let stride = self.width as usize * 4;
        if stride == 0 {
            return;
        }
        for (ry, row) in rows.chunks_exact_mut(stride).enumerate() {
            let y = first_row + ry as u32;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let c = evaluate(self.shade, self.pixel_uv(x as u32, y), &u);
                let [r, g, b] = encode_srgb8(c);
                px.copy_from_slice(&[r, g, b, 255]);
            }
        }
    }
}

/// Completed RGBA8 frame, row-major from the top.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub frame_index: u64,
    pub time: f64,
    pub effect_id: &'static str,
    pub pixels: Vec<u8>,
}

impl FrameBuffer {
    fn blank(job: &FrameJob) -> Self {
        Self {
            width: job.width,
            height: job.height,
            frame_index: job.frame_index,
            time: job.time,
            effect_id: job.effect_id,
            pixels: vec![0; job.width as usize * job.height as usize * 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

pub type FrameResult = EngineResult<FrameBuffer>;

/// Evaluates the whole frame on the calling thread.
pub fn render_frame(job: &FrameJob) -> FrameBuffer {
    let mut frame = FrameBuffer::blank(job);
    job.render_rows(0, &mut frame.pixels);
    frame
}

/// Splits the frame into horizontal bands, one scoped thread per band.
pub fn render_frame_parallel(job: &FrameJob, workers: usize) -> FrameBuffer {
    let mut frame = FrameBuffer::blank(job);
    let height = job.height as usize;
    let stride = job.width as usize * 4;
    let workers = workers.clamp(1, height.max(1));
    if workers == 1 || stride == 0 {
        job.render_rows(0, &mut frame.pixels);
        return frame;
    }
    let band_rows = height.div_ceil(workers);
    thread::scope(|scope| {
        for (band, chunk) in frame.pixels.chunks_mut(band_rows * stride).enumerate() {
            let first_row = (band * band_rows) as u32;
            scope.spawn(move || job.render_rows(first_row, chunk));
        }
    });
    frame
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Runs `render`, turning a panicking color function into a failed frame.
fn guarded(job: &FrameJob, render: impl FnOnce() -> FrameBuffer) -> FrameResult {
    panic::catch_unwind(AssertUnwindSafe(render)).map_err(|payload| {
        EngineError::BackendSubmit(format!(
            "{} frame {} panicked: {}",
            job.effect_id,
            job.frame_index,
            panic_reason(payload.as_ref())
        ))
    })
}

/// Outstanding asynchronous frame.
#[derive(Debug)]
pub struct PendingFrame {
    frame_index: u64,
    rx: oneshot::Receiver<FrameResult>,
}

impl PendingFrame {
    pub fn channel(frame_index: u64) -> (oneshot::Sender<FrameResult>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { frame_index, rx })
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Non-blocking poll. `None` while the frame is still rendering.
    pub fn try_complete(&mut self) -> Option<FrameResult> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(dropped_by_worker(self.frame_index))),
        }
    }

    pub fn wait(self) -> FrameResult {
        let frame_index = self.frame_index;
        futures::executor::block_on(self.rx).unwrap_or_else(|_| Err(dropped_by_worker(frame_index)))
    }
}

fn dropped_by_worker(frame_index: u64) -> EngineError {
    EngineError::BackendSubmit(format!("frame {frame_index} abandoned by render worker"))
}

pub enum Submission {
    Ready(FrameResult),
    Pending(PendingFrame),
}

/// Pixel evaluator the scheduler hands frames to.
pub trait RenderBackend {
    fn name(&self) -> &'static str;
    fn submit(&mut self, job: FrameJob) -> Submission;
    /// Releases threads or device resources. Called once by the scheduler.
    fn dispose(&mut self) {}
}

#[derive(Debug, Default)]
pub struct CpuBackend;

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn submit(&mut self, job: FrameJob) -> Submission {
        Submission::Ready(guarded(&job, || render_frame(&job)))
    }
}

struct Work {
    job: FrameJob,
    done: oneshot::Sender<FrameResult>,
}

/// Renders on a dedicated thread, fanning each frame out to `workers` bands.
pub struct ThreadedBackend {
    workers: usize,
    tx: Option<mpsc::Sender<Work>>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadedBackend {
    pub fn new(workers: usize) -> EngineResult<Self> {
        if workers == 0 {
            return Err(EngineError::BackendInit {
                backend: "threaded",
                reason: "worker count must be at least 1".to_string(),
            });
        }
        let (tx, rx) = mpsc::channel::<Work>();
        let handle = thread::Builder::new()
            .name("fieldfx-render".to_string())
            .spawn(move || {
                while let Ok(work) = rx.recv() {
                    let job = &work.job;
                    let result = guarded(job, || render_frame_parallel(job, workers));
                    // Receiver may already be gone after dispose.
                    let _ = work.done.send(result);
                }
            })
            .map_err(|err| EngineError::BackendInit {
                backend: "threaded",
                reason: err.to_string(),
            })?;
        Ok(Self {
            workers,
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn shutdown(&mut self) {
        self.tx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("render thread panicked during shutdown");
            }
        }
    }
}

impl RenderBackend for ThreadedBackend {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn submit(&mut self, job: FrameJob) -> Submission {
        let Some(tx) = self.tx.as_ref() else {
            return Submission::Ready(Err(EngineError::Disposed));
        };
        let (done, pending) = PendingFrame::channel(job.frame_index);
        match tx.send(Work { job, done }) {
            Ok(()) => Submission::Pending(pending),
            Err(_) => Submission::Ready(Err(EngineError::BackendSubmit(
                "render thread is not running".to_string(),
            ))),
        }
    }

    fn dispose(&mut self) {
        self.shutdown();
    }
}

impl Drop for ThreadedBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}
