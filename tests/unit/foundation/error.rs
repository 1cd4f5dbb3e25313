use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        IrisgateError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        IrisgateError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        IrisgateError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        IrisgateError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = IrisgateError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
