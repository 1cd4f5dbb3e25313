use super::*;

const ALL: [Ease; 9] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::OutQuart,
    Ease::OutBack,
];

#[test]
fn every_ease_hits_both_endpoints() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped_to_unit_interval() {
    for ease in ALL {
        assert_eq!(ease.apply(-3.0), ease.apply(0.0), "{ease:?}");
        assert_eq!(ease.apply(7.5), ease.apply(1.0), "{ease:?}");
    }
}

#[test]
fn in_out_cubic_is_symmetric_about_half() {
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    for i in 1..10 {
        let t = f64::from(i) / 20.0;
        let a = Ease::InOutCubic.apply(t);
        let b = Ease::InOutCubic.apply(1.0 - t);
        assert!((a + b - 1.0).abs() < 1e-12);
    }
}

#[test]
fn power_eases_match_closed_forms() {
    assert!((Ease::InCubic.apply(0.5) - 0.125).abs() < 1e-12);
    assert!((Ease::InQuad.apply(0.5) - 0.25).abs() < 1e-12);
    assert!((Ease::OutQuart.apply(0.5) - 0.9375).abs() < 1e-12);
}

#[test]
fn out_back_overshoots_inside_the_interval() {
    let mut max = 0.0f64;
    for i in 0..=100 {
        let t = f64::from(i) / 100.0;
        max = max.max(Ease::OutBack.apply(t));
    }
    assert!(max > 1.0);
    assert!(max < 1.2);
}
