use super::*;

#[test]
fn field_is_deterministic_per_seed() {
    let a = ParticleField::new(90, 42);
    let b = ParticleField::new(90, 42);
    assert_eq!(a.particles(), b.particles());

    let c = ParticleField::new(90, 43);
    assert_ne!(a.particles(), c.particles());
}

#[test]
fn generated_parameters_stay_in_their_bands() {
    let field = ParticleField::new(500, 7);
    assert_eq!(field.len(), 500);
    for p in field.particles() {
        assert!((-1.0..=1.0).contains(&p.x));
        assert!((-1.0..=1.0).contains(&p.y));
        assert!(p.vx.abs() <= 0.0002);
        assert!(p.vy.abs() <= 0.0002);
        assert!((0.8..3.0).contains(&p.size));
        assert!((0.12..0.57).contains(&p.opacity));
        assert!((0.0..std::f64::consts::TAU).contains(&p.phase));
        assert!((0.4..1.6).contains(&p.speed));
    }
}

#[test]
fn positions_stay_in_bounds_after_many_steps() {
    let mut field = ParticleField::new(90, 1);
    for _ in 0..10_000 {
        field.step();
    }
    for p in field.particles() {
        assert!((-1.0..=1.0).contains(&p.x), "x out of bounds: {}", p.x);
        assert!((-1.0..=1.0).contains(&p.y), "y out of bounds: {}", p.y);
    }
}

#[test]
fn wrap_jumps_to_the_opposite_edge() {
    let mut p = Particle {
        x: 0.99999,
        y: -0.99999,
        vx: 0.0004,
        vy: -0.0004,
        size: 1.0,
        opacity: 0.2,
        phase: 0.0,
        speed: 1.0,
    };
    p.advance();
    assert_eq!(p.x, -1.0);
    assert_eq!(p.y, 1.0);

    p.advance();
    assert!(p.x > -1.0 && p.x < 0.0);
    assert!(p.y < 1.0 && p.y > 0.0);
}

#[test]
fn flicker_oscillates_within_unit_range() {
    let field = ParticleField::new(16, 3);
    let mut seen_low = false;
    let mut seen_high = false;
    for p in field.particles() {
        for i in 0..200 {
            let f = p.flicker(f64::from(i) * 50.0);
            assert!((0.0..=1.0).contains(&f));
            if f < 0.2 {
                seen_low = true;
            }
            if f > 0.8 {
                seen_high = true;
            }
        }
    }
    assert!(seen_low && seen_high);
}
