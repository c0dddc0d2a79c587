use crate::config::Config;
use crate::engine::{Engine, FrameBuffer};
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::terminal::{Layout, TerminalGuard};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

/// Applies `--effect` and `--set` to a fresh engine.
pub fn configure_engine(cfg: &Config) -> anyhow::Result<Engine> {
    let mut engine = Engine::default();
    if let Some(id) = cfg.effect.as_deref() {
        engine
            .select_effect(id.trim())
            .with_context(|| format!("select effect `{id}`"))?;
    }
    for (name, value) in &cfg.overrides {
        engine
            .try_set_parameter(name, *value)
            .with_context(|| format!("--set {name}={value}"))?;
    }
    Ok(engine)
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let mut engine = configure_engine(&cfg)?;

    if cfg.list_effects {
        print!("{}", effect_listing(&engine));
        return Ok(());
    }
    if cfg.print_snapshot {
        println!("{}", engine.snapshot().to_json()?);
        return Ok(());
    }

    let term = TerminalGuard::new(cfg.sync_updates)?;
    let mut out = BufWriter::new(term.stdout());
    let mut renderer = HalfBlockRenderer::new();

    let mut show_hud = cfg.hud;
    let mut show_help = false;
    let mut layout = term.layout(show_hud)?;

    let report = engine.start(cfg.backend, cfg.workers(), layout.viewport());
    let backend_label = report.status_label();

    let mut rng = fastrand::Rng::new();
    let mut fps = FpsCounter::new();
    let mut shown: Option<FrameBuffer> = None;
    let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    match handle_key(k.code, k.modifiers, &mut engine, &mut rng) {
                        KeyAction::Quit => {
                            engine.dispose();
                            return Ok(());
                        }
                        KeyAction::ToggleHud => show_hud = !show_hud,
                        KeyAction::ToggleHelp => show_help = !show_help,
                        KeyAction::None => {}
                    }
                }
                _ => {}
            }
        }

        // Re-measured every frame: resize events can be missed in some terminals.
        let next = term.layout(show_hud)?;
        if next != layout || next.viewport().physical() != engine.render_state().resolution {
            layout = next;
            engine.notify_resize(layout.viewport());
        }

        engine.tick();
        if let Some(frame) = engine.take_frame() {
            shown = Some(frame);
            fps.tick();
        }

        if let Some(image) = shown.as_ref() {
            let hud = if layout.hud_rows > 0 {
                build_hud(layout.cols as usize, &engine, &backend_label, fps.fps())
            } else {
                String::new()
            };
            let frame = Frame {
                term_cols: layout.cols,
                term_rows: layout.rows,
                visual_rows: layout.visual_rows,
                image,
                hud: &hud,
                hud_rows: layout.hud_rows,
                overlay: show_help.then_some(HELP_TEXT),
                sync_updates: cfg.sync_updates,
            };
            renderer.render(&frame, &mut out)?;
        }

        // Frame pacing.
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    ToggleHud,
    ToggleHelp,
}

pub fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    engine: &mut Engine,
    rng: &mut fastrand::Rng,
) -> KeyAction {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return KeyAction::Quit;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => {
            engine.cycle_effect(1);
            KeyAction::None
        }
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Left => {
            engine.cycle_effect(-1);
            KeyAction::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            select_random(engine, rng);
            KeyAction::None
        }
        KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ToggleHud,
        KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ToggleHelp,
        _ => KeyAction::None,
    }
}

/// Jumps to a different effect chosen uniformly among the others.
pub fn select_random(engine: &mut Engine, rng: &mut fastrand::Rng) {
    let len = engine.catalog().len();
    if len < 2 {
        return;
    }
    let step = rng.usize(1..len) as isize;
    engine.cycle_effect(step);
}

pub fn effect_listing(engine: &Engine) -> String {
    let mut s = String::new();
    for info in engine.list_effects() {
        s.push_str(&format!("{:<10} {} - {}\n", info.id, info.display_name, info.description));
        for p in &info.parameters {
            s.push_str(&format!(
                "    {:<14} {:>8.3}  [{}, {}] step {}\n",
                p.name, p.default, p.min, p.max, p.step
            ));
        }
    }
    s
}

fn build_hud(cols: usize, engine: &Engine, backend_label: &str, fps: f32) -> String {
    let effect = engine.active_effect();
    let stats = engine.stats();
    let lines = [
        format!(
            "Effect: {} ({}) | Backend: {} | FPS: {:>4.1} | Dropped: {}",
            effect.display_name, effect.id, backend_label, fps, stats.dropped
        ),
        "Keys: n/p next/prev | r random | h HUD | ? help | q quit".to_string(),
    ];
    lines
        .iter()
        .map(|l| l.chars().take(cols.max(1)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

const HELP_TEXT: &str = "fieldfx keys\n\
n / right  next effect\n\
p / left  previous effect\n\
r  random effect\n\
h  show/hide HUD\n\
? / F1  toggle this help\n\
q / esc  quit";

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
