use fieldfx::field::{
    domain_warp, fbm, fbm3, fbm_rotated, hash1, hash2, octave_amplitude, smooth_min,
    value_noise, value_noise3, vec2, vec3, MarchSample, Raymarch, Vec3, OPACITY_CUTOFF,
};

fn random_point(rng: &mut fastrand::Rng, span: f64) -> fieldfx::field::Vec2 {
    vec2((rng.f64() - 0.5) * span, (rng.f64() - 0.5) * span)
}

#[test]
fn value_noise_is_exact_on_lattice_points() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..2000 {
        let p = vec2(rng.i32(-1000..1000) as f64, rng.i32(-1000..1000) as f64);
        assert_eq!(value_noise(p), hash1(p), "corner mismatch at {p:?}");
    }
}

#[test]
fn value_noise_stays_in_unit_interval() {
    let mut rng = fastrand::Rng::with_seed(11);
    for _ in 0..5000 {
        let p = random_point(&mut rng, 400.0);
        let v = value_noise(p);
        assert!((0.0..=1.0).contains(&v), "value_noise({p:?}) = {v}");
        let v3 = value_noise3(vec3(p.x, p.y, rng.f64() * 50.0));
        assert!((0.0..=1.0).contains(&v3), "value_noise3 = {v3}");
    }
}

#[test]
fn hashes_are_deterministic_and_half_open() {
    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..2000 {
        let p = random_point(&mut rng, 1e4);
        let h = hash1(p);
        assert!((0.0..1.0).contains(&h));
        assert_eq!(h.to_bits(), hash1(p).to_bits());
        let h2 = hash2(p);
        assert!((0.0..1.0).contains(&h2.x) && (0.0..1.0).contains(&h2.y));
        assert_eq!(h2, hash2(p));
    }
}

#[test]
fn value_noise_is_continuous_across_cell_edges() {
    let eps = 1e-7;
    for i in -5..5 {
        let x = i as f64;
        for y in [0.13, 0.5, 0.91] {
            let left = value_noise(vec2(x - eps, y));
            let right = value_noise(vec2(x + eps, y));
            assert!((left - right).abs() < 1e-4, "jump at x={x} y={y}");
        }
    }
}

#[test]
fn fbm_is_pure() {
    let mut rng = fastrand::Rng::with_seed(21);
    for _ in 0..200 {
        let p = random_point(&mut rng, 64.0);
        let octaves = rng.u32(1..9);
        assert_eq!(fbm(p, octaves).to_bits(), fbm(p, octaves).to_bits());
        assert_eq!(
            fbm_rotated(p, octaves).to_bits(),
            fbm_rotated(p, octaves).to_bits()
        );
        let q = vec3(p.x, p.y, 1.5);
        assert_eq!(fbm3(q, octaves).to_bits(), fbm3(q, octaves).to_bits());
    }
}

#[test]
fn octave_amplitudes_never_grow() {
    for i in 0..16 {
        assert!(octave_amplitude(i + 1) <= octave_amplitude(i));
    }
    assert_eq!(octave_amplitude(0), 0.5);
}

#[test]
fn each_fbm_octave_is_bounded_by_its_amplitude() {
    let mut rng = fastrand::Rng::with_seed(5);
    for _ in 0..300 {
        let p = random_point(&mut rng, 32.0);
        for n in 0..8 {
            let term = fbm(p, n + 1) - fbm(p, n);
            assert!(term >= -1e-12, "negative octave term {term}");
            assert!(term <= octave_amplitude(n) + 1e-12, "octave {n} term {term}");
            let rot_term = fbm_rotated(p, n + 1) - fbm_rotated(p, n);
            assert!(rot_term <= octave_amplitude(n) + 1e-12);
        }
    }
}

#[test]
fn fbm_with_zero_octaves_is_zero() {
    assert_eq!(fbm(vec2(3.2, -1.1), 0), 0.0);
}

#[test]
fn smooth_min_with_zero_radius_is_min() {
    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..2000 {
        let a = (rng.f64() - 0.5) * 20.0;
        let b = (rng.f64() - 0.5) * 20.0;
        assert_eq!(smooth_min(a, b, 0.0), a.min(b));
    }
}

#[test]
fn smooth_min_is_symmetric() {
    let mut rng = fastrand::Rng::with_seed(10);
    for _ in 0..2000 {
        let a = (rng.f64() - 0.5) * 4.0;
        let b = (rng.f64() - 0.5) * 4.0;
        let k = rng.f64();
        assert_eq!(smooth_min(a, b, k).to_bits(), smooth_min(b, a, k).to_bits());
    }
}

#[test]
fn smooth_min_approaches_min_and_never_exceeds_it() {
    let mut rng = fastrand::Rng::with_seed(12);
    for _ in 0..1000 {
        let a = rng.f64() * 3.0;
        let b = rng.f64() * 3.0;
        let k = rng.f64() * 0.5;
        assert!(smooth_min(a, b, k) <= a.min(b) + 1e-12);
        assert!((smooth_min(a, b, 1e-9) - a.min(b)).abs() < 1e-8);
    }
}

#[test]
fn domain_warp_is_a_rotation() {
    let p = vec2(0.3, -1.7);
    let q = domain_warp(p, 1.234);
    assert!((p.length() - q.length()).abs() < 1e-12);
    let back = domain_warp(q, -1.234);
    assert!((back.x - p.x).abs() < 1e-12 && (back.y - p.y).abs() < 1e-12);
}

fn fog_medium(pos: Vec3, _dist: f64) -> Option<MarchSample> {
    let d = value_noise3(pos * 3.0);
    Some(MarchSample {
        color: vec3(d, 0.5, 1.0 - d),
        alpha: 0.2 + 0.6 * d,
    })
}

#[test]
fn raymarch_early_exit_matches_double_budget() {
    let ro = vec3(0.1, 0.2, 0.0);
    let rd = vec3(0.2, 0.1, 1.0).normalize_or_zero();
    let n = 40;
    let short = Raymarch::default().with_steps(n).march(ro, rd, fog_medium);
    let long = Raymarch::default().with_steps(2 * n).march(ro, rd, fog_medium);

    assert!(short.opacity >= OPACITY_CUTOFF);
    assert!(short.steps < n);
    assert_eq!(short.steps, long.steps);
    let diff = (short.color - long.color).abs().max_element();
    assert!(diff < 1e-4, "color drift {diff}");
}

#[test]
fn raymarch_through_empty_space_stays_transparent() {
    let r = Raymarch::default().march(Vec3::ZERO, vec3(0.0, 0.0, 1.0), |_, _| None);
    assert_eq!(r.opacity, 0.0);
    assert_eq!(r.color, Vec3::ZERO);
    assert_eq!(r.steps, 50);
}

#[test]
fn raymarch_composites_front_to_back() {
    let mut calls = 0;
    let r = Raymarch::default().with_steps(2).march(Vec3::ZERO, vec3(0.0, 0.0, 1.0), |_, _| {
        calls += 1;
        Some(MarchSample {
            color: if calls == 1 { vec3(1.0, 0.0, 0.0) } else { vec3(0.0, 1.0, 0.0) },
            alpha: 0.5,
        })
    });
    assert!((r.opacity - 0.75).abs() < 1e-12);
    assert!((r.color.x - 0.5).abs() < 1e-12);
    assert!((r.color.y - 0.25).abs() < 1e-12);
}
