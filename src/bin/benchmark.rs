use std::time::{Duration, Instant};

use anyhow::Result;
use fieldfx::config::BackendKind;
use fieldfx::engine::{Engine, ManualClock, TickOutcome, Viewport};

struct Args {
    backend: BackendKind,
    workers: usize,
    frames: usize,
    w: u32,
    h: u32,
    effect: Option<String>,
    ci_smoke: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        backend: BackendKind::Threaded,
        workers: fieldfx::capability::default_workers(),
        frames: 120,
        w: 160,
        h: 88,
        effect: None,
        ci_smoke: false,
        max_ms: 50.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--backend", Some("cpu")) => {
                args.backend = BackendKind::Cpu;
                i += 2;
            }
            ("--backend", Some("threaded")) => {
                args.backend = BackendKind::Threaded;
                i += 2;
            }
            ("--workers", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.workers = n;
                }
                i += 2;
            }
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--width", Some(x)) => {
                if let Ok(n) = x.parse::<u32>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--height", Some(x)) => {
                if let Ok(n) = x.parse::<u32>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--effect", Some(x)) => {
                args.effect = Some(x.to_string());
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                log::warn!("ignoring argument `{k}`");
                i += 1;
            }
        }
    }
    args
}

struct EffectRun {
    ms: f64,
    lit: usize,
    dropped: u64,
}

fn bench_effect(args: &Args, id: &str) -> Result<EffectRun> {
    let clock = ManualClock::new();
    let mut engine = Engine::new(Box::new(clock.clone()));
    engine.select_effect(id)?;
    engine.start(args.backend, args.workers, Viewport::new(args.w, args.h, 1.0));

    let mut lit = 0usize;
    let mut elapsed = Duration::ZERO;
    for _ in 0..args.frames {
        clock.advance(1.0 / 60.0);
        let start = Instant::now();
        let report = engine.tick();
        if report.outcome == TickOutcome::Submitted {
            engine.wait_for_completion();
        }
        elapsed += start.elapsed();
        if let Some(frame) = engine.take_frame() {
            if frame
                .pixels
                .chunks_exact(4)
                .any(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
            {
                lit += 1;
            }
        }
    }
    let dropped = engine.stats().dropped;
    engine.dispose();

    Ok(EffectRun {
        ms: elapsed.as_secs_f64() * 1000.0 / args.frames as f64,
        lit,
        dropped,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let catalog = Engine::new(Box::new(ManualClock::new())).list_effects();
    let ids: Vec<&str> = catalog
        .iter()
        .map(|e| e.id)
        .filter(|id| args.effect.as_deref().is_none_or(|want| want == *id))
        .collect();
    if ids.is_empty() {
        anyhow::bail!("no effect matches {:?}", args.effect);
    }

    println!(
        "benchmark: backend={} workers={} effects={} frames/effect={} size={}x{}",
        args.backend.label(),
        args.workers,
        ids.len(),
        args.frames,
        args.w,
        args.h
    );

    let mut total_ms = 0.0;
    let mut black = Vec::new();
    let mut slow = Vec::new();
    for (idx, id) in ids.iter().enumerate() {
        let run = bench_effect(&args, id)?;
        println!(
            "{:>2}. {:<10} {:>8.3} ms/frame  lit={:>3}/{}  dropped={}",
            idx, id, run.ms, run.lit, args.frames, run.dropped
        );
        total_ms += run.ms;
        if run.lit == 0 {
            black.push(*id);
        }
        if run.ms > args.max_ms {
            slow.push((*id, run.ms));
        }
    }

    let avg_ms = total_ms / ids.len() as f64;
    let fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
    println!("summary: {:>8.3} ms/frame avg  {:>7.2} FPS", avg_ms, fps);

    if args.ci_smoke {
        if !black.is_empty() || !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            if !black.is_empty() {
                eprintln!("  black effects: {}", black.join(", "));
            }
            for (id, ms) in slow {
                eprintln!("  slow effect: {} ({:.3} ms/frame > {:.3})", id, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }
    Ok(())
}
