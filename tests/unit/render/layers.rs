use super::*;
use crate::animation::curve::{
    fade_to_black, fov_multiplier, particle_alpha, red_flash, scan_line_alpha, zoom_scale,
};

fn frame(openness: f64, dolly: f64) -> SceneFrame {
    SceneFrame {
        time_ms: 0.0,
        openness,
        dolly,
        zoom_scale: zoom_scale(dolly),
        fov_multiplier: fov_multiplier(dolly),
        red_flash: red_flash(dolly),
        fade_to_black: fade_to_black(dolly),
        particle_alpha: particle_alpha(openness, dolly),
        scan_line_alpha: scan_line_alpha(openness, dolly),
        iris_angle: 0.0,
    }
}

fn kinds(frame: &SceneFrame) -> Vec<LayerKind> {
    layer_plan(frame).iter().map(|l| l.kind).collect()
}

#[test]
fn closed_eye_draws_the_slit_not_the_details() {
    let plan = kinds(&frame(0.0, 0.0));
    assert_eq!(
        plan,
        vec![
            LayerKind::Background,
            LayerKind::Sclera,
            LayerKind::Iris,
            LayerKind::Pupil,
            LayerKind::Reflections,
            LayerKind::ClosedSlit,
            LayerKind::Vignette,
        ]
    );
}

#[test]
fn open_eye_mid_dolly_flashes_without_fading() {
    let plan = kinds(&frame(1.0, 0.45));
    assert_eq!(
        plan,
        vec![
            LayerKind::Background,
            LayerKind::Particles,
            LayerKind::RedAmbient,
            LayerKind::SkinTexture,
            LayerKind::Sclera,
            LayerKind::Veins,
            LayerKind::Iris,
            LayerKind::Pupil,
            LayerKind::Reflections,
            LayerKind::LidDetail,
            LayerKind::Vignette,
            LayerKind::RedFlash,
            LayerKind::ScanLines,
        ]
    );
}

#[test]
fn deep_dolly_drops_scan_lines_and_fades() {
    let plan = kinds(&frame(1.0, 0.85));
    assert!(!plan.contains(&LayerKind::ScanLines));
    assert!(!plan.contains(&LayerKind::RedFlash));
    assert!(plan.contains(&LayerKind::FadeToBlack));
    assert!(plan.contains(&LayerKind::Particles));
    assert!(plan.contains(&LayerKind::Veins));
}

#[test]
fn slit_hands_off_at_the_lid_threshold() {
    let barely_closed = kinds(&frame(0.04, 0.0));
    assert!(barely_closed.contains(&LayerKind::ClosedSlit));
    assert!(!barely_closed.contains(&LayerKind::LidDetail));

    let barely_open = kinds(&frame(0.0401, 0.0));
    assert!(barely_open.contains(&LayerKind::LidDetail));
    assert!(!barely_open.contains(&LayerKind::ClosedSlit));
}

#[test]
fn eye_interior_layers_clip_to_the_lids() {
    for layer in layer_plan(&frame(1.0, 0.45)) {
        let interior = matches!(
            layer.kind,
            LayerKind::Sclera
                | LayerKind::Veins
                | LayerKind::Iris
                | LayerKind::Pupil
                | LayerKind::Reflections
        );
        assert_eq!(layer.clip_to_eye, interior, "{:?}", layer.kind);
        if interior {
            assert_eq!(layer.space, Space::Zoomed, "{:?}", layer.kind);
        }
    }
    assert_eq!(LayerKind::Particles.space(), Space::Zoomed);
    assert_eq!(LayerKind::Vignette.space(), Space::Screen);
    assert_eq!(LayerKind::ScanLines.space(), Space::Screen);
    assert!(!LayerKind::Particles.clip_to_eye());
}
