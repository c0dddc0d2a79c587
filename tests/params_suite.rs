use fieldfx::color::{encode_srgb8, ColorConversion, OklchConversion, Palette, PaletteEntry};
use fieldfx::params::{ParamDescriptor, ParameterRegistry, ParameterView};
use fieldfx::EngineError;

const SPEED: ParamDescriptor = ParamDescriptor::new("speed", "Speed", 1.0, 0.0, 4.0, 0.01);
const DENSITY: ParamDescriptor = ParamDescriptor::new("density", "Density", 5.0, 1.0, 24.0, 0.5);

fn registry() -> ParameterRegistry {
    let mut r = ParameterRegistry::new();
    r.declare(&SPEED);
    r.declare(&DENSITY);
    r
}

#[test]
fn declare_creates_at_default_and_preserves_existing() {
    let mut r = ParameterRegistry::new();
    assert!(r.declare(&SPEED));
    assert_eq!(r.get("speed"), Some(1.0));

    r.set("speed", 2.5);
    assert!(!r.declare(&SPEED));
    assert_eq!(r.get("speed"), Some(2.5));
}

#[test]
fn unknown_names_are_absent_and_writes_are_ignored() {
    let mut r = registry();
    r.set("nonexistent", 5.0);
    assert_eq!(r.get("nonexistent"), None);
    assert!(!r.contains("nonexistent"));
    assert_eq!(
        r.try_set("nonexistent", 5.0),
        Err(EngineError::UnknownParameter("nonexistent".to_string()))
    );
}

#[test]
fn non_finite_writes_keep_prior_value() {
    let mut r = registry();
    r.set("speed", 3.0);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        r.set("speed", bad);
        assert_eq!(r.get("speed"), Some(3.0));
        assert!(matches!(
            r.try_set("speed", bad),
            Err(EngineError::NonFiniteValue { .. })
        ));
    }
}

#[test]
fn out_of_range_writes_are_rejected() {
    let mut r = registry();
    let err = r.try_set("density", 30.0).unwrap_err();
    assert_eq!(
        err,
        EngineError::OutOfRange {
            name: "density".to_string(),
            value: 30.0,
            min: 1.0,
            max: 24.0,
        }
    );
    r.set("density", 0.0);
    assert_eq!(r.get("density"), Some(5.0));
    r.set("density", 24.0);
    assert_eq!(r.get("density"), Some(24.0));
}

#[test]
fn values_stay_in_bounds_under_random_writes() {
    let mut r = registry();
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..5000 {
        let v = (rng.f64() - 0.3) * 60.0;
        r.set(if rng.bool() { "speed" } else { "density" }, v);
        for p in r.iter() {
            assert!(p.value >= p.min && p.value <= p.max, "{p:?}");
        }
    }
}

#[test]
fn subset_follows_declaration_order_and_falls_back_to_defaults() {
    let mut r = ParameterRegistry::new();
    r.declare(&DENSITY);
    r.set("density", 8.0);

    let view = r.subset(&[SPEED, DENSITY]);
    let pairs: Vec<_> = view.iter().collect();
    assert_eq!(pairs, vec![("speed", 1.0), ("density", 8.0)]);
    assert_eq!(view.get("missing"), 0.0);
    assert_eq!(view.lookup("missing"), None);
}

#[test]
fn palette_is_indexed_from_one() {
    let mut p = Palette::default();
    assert!(p.get(0).is_none());
    assert!(p.get(5).is_none());
    assert!(p.get(1).is_some() && p.get(4).is_some());

    assert_eq!(p.set(0, 0.5, 0.1, 10.0), Err(EngineError::InvalidPaletteIndex(0)));
    assert_eq!(p.set(5, 0.5, 0.1, 10.0), Err(EngineError::InvalidPaletteIndex(5)));
    assert_eq!(p.entries().len(), 4);

    p.set(2, 0.6, 0.3, 280.0).unwrap();
    assert_eq!(p.get(2), Some(PaletteEntry::new(0.6, 0.3, 280.0)));
}

#[test]
fn palette_entries_are_normalized() {
    let mut p = Palette::default();
    p.set(1, 1.4, 0.9, 400.0).unwrap();
    let e = p.get(1).unwrap();
    assert_eq!(e.l, 1.0);
    assert_eq!(e.c, 0.4);
    assert!((e.h - 40.0).abs() < 1e-9);

    p.set(1, 0.5, 0.1, -30.0).unwrap();
    assert!((p.get(1).unwrap().h - 330.0).abs() < 1e-9);

    let before = p;
    assert!(p.set(3, f64::NAN, 0.1, 0.0).is_err());
    assert_eq!(p, before);
}

#[test]
fn oklch_conversion_hits_black_and_white() {
    let conv = OklchConversion;
    let black = conv.to_linear(PaletteEntry::new(0.0, 0.0, 0.0));
    assert!(black.max_element().abs() < 1e-6, "{black:?}");
    let white = conv.to_linear(PaletteEntry::new(1.0, 0.0, 0.0));
    for ch in white.to_array() {
        assert!((ch - 1.0).abs() < 1e-3, "{white:?}");
    }
}

#[test]
fn srgb_encoding_clamps_and_zeroes_nan() {
    use fieldfx::field::vec3;
    assert_eq!(encode_srgb8(vec3(0.0, 1.0, 2.0)), [0, 255, 255]);
    assert_eq!(encode_srgb8(vec3(-1.0, f64::NAN, 0.0)), [0, 0, 0]);
    // Linear mid-grey encodes well above 128.
    assert!(encode_srgb8(vec3(0.5, 0.5, 0.5))[0] > 180);
}

#[test]
fn view_slots_follow_declaration_order() {
    let view = registry().subset(&[SPEED, DENSITY]);
    assert_eq!(view.leading::<2>(), [1.0, 5.0]);
    assert_eq!(view.leading::<3>(), [1.0, 5.0, 0.0]);
    assert_eq!(view.trailing::<1>(), [5.0]);
    assert_eq!(view.trailing::<3>(), [0.0, 1.0, 5.0]);
    assert_eq!(ParameterView::default().leading::<2>(), [0.0, 0.0]);
}
