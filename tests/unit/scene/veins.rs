use super::*;

#[test]
fn layout_is_deterministic_per_seed() {
    let a = VeinLayout::generate(11);
    let b = VeinLayout::generate(11);
    assert_eq!(a, b);

    let c = VeinLayout::generate(12);
    assert_ne!(a, c);
}

#[test]
fn ten_courses_enter_from_both_corners() {
    let layout = VeinLayout::generate(0);
    assert_eq!(layout.veins().len(), 10);

    let left = layout.veins().iter().filter(|v| v.start.x < 0.0).count();
    assert_eq!(left, 5);

    for v in layout.veins() {
        // Main strokes run from the corner toward the iris side.
        assert!(v.start.x.abs() > v.end.x.abs());
        assert!(v.width >= 0.4 && v.width <= 1.0);
        assert!(!v.branches.is_empty() && v.branches.len() <= 2);
    }
}

#[test]
fn branches_fork_inward_at_half_width() {
    let layout = VeinLayout::generate(99);
    for v in layout.veins() {
        for b in &v.branches {
            if v.start.x < 0.0 {
                assert!(b.to.x > b.from.x);
            } else {
                assert!(b.to.x < b.from.x);
            }
            assert!((b.width - v.width * 0.5).abs() < 1e-12);
            assert!((b.to.y - b.from.y).abs() <= 0.06);
        }
    }
}
