use smallvec::SmallVec;

use crate::scene::eye::SceneFrame;

/// Coordinate space a layer draws in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    /// Surface coordinates, unaffected by the camera push.
    Screen,
    /// Under the zoom transform about the eye center.
    Zoomed,
}

/// Identity of one paint pass, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Opaque black fill under everything.
    Background,
    /// Drifting dust motes.
    Particles,
    /// Red radial glow behind the eye.
    RedAmbient,
    /// Dark skin falloff around the eye socket.
    SkinTexture,
    /// Eyeball base gradient inside the lids.
    Sclera,
    /// Blood vessels entering from the corners.
    Veins,
    /// Iris disc, stroma fibers, crypts, and glow ring.
    Iris,
    /// Pupil shadow and disc.
    Pupil,
    /// Catchlight, secondary highlight, and sparkle.
    Reflections,
    /// Lid lines, crease, lashes, waterlines, caruncle, lid shadow.
    LidDetail,
    /// Single slit line for a shut eye.
    ClosedSlit,
    /// Darkened screen corners.
    Vignette,
    /// Mid-dolly full-screen red pulse.
    RedFlash,
    /// Terminal full-screen fade.
    FadeToBlack,
    /// Faint drifting horizontal bands.
    ScanLines,
}

impl LayerKind {
    /// Every layer in paint order.
    pub const ALL: [LayerKind; 15] = [
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
        LayerKind::ClosedSlit,
        LayerKind::Vignette,
        LayerKind::RedFlash,
        LayerKind::FadeToBlack,
        LayerKind::ScanLines,
    ];

    /// Coordinate space the layer draws in.
    pub fn space(self) -> Space {
        match self {
            LayerKind::Background
            | LayerKind::Vignette
            | LayerKind::RedFlash
            | LayerKind::FadeToBlack
            | LayerKind::ScanLines => Space::Screen,
            _ => Space::Zoomed,
        }
    }

    /// Whether the layer is confined to the lid outline.
    pub fn clip_to_eye(self) -> bool {
        matches!(
            self,
            LayerKind::Sclera
                | LayerKind::Veins
                | LayerKind::Iris
                | LayerKind::Pupil
                | LayerKind::Reflections
        )
    }

    /// Whether the layer contributes anything at this frame state.
    pub fn visible(self, frame: &SceneFrame) -> bool {
        match self {
            LayerKind::Background
            | LayerKind::Sclera
            | LayerKind::Iris
            | LayerKind::Pupil
            | LayerKind::Reflections
            | LayerKind::Vignette => true,
            LayerKind::Particles => frame.particle_alpha >= 0.01,
            LayerKind::RedAmbient => frame.openness >= 0.01,
            LayerKind::SkinTexture => frame.openness >= 0.05,
            LayerKind::Veins => frame.openness > 0.15,
            LayerKind::LidDetail => frame.openness > 0.04,
            LayerKind::ClosedSlit => frame.openness <= 0.04,
            LayerKind::RedFlash => frame.red_flash > 0.0,
            LayerKind::FadeToBlack => frame.fade_to_black > 0.0,
            LayerKind::ScanLines => frame.scan_line_alpha > 0.0,
        }
    }
}

/// One entry of the per-frame paint plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawLayer {
    /// Which painter runs.
    pub kind: LayerKind,
    /// Coordinate space for the pass.
    pub space: Space,
    /// Whether the pass clips to the lid outline.
    pub clip_to_eye: bool,
}

/// Layers that contribute to `frame`, in paint order.
pub fn layer_plan(frame: &SceneFrame) -> SmallVec<[DrawLayer; 16]> {
    LayerKind::ALL
        .into_iter()
        .filter(|kind| kind.visible(frame))
        .map(|kind| DrawLayer {
            kind,
            space: kind.space(),
            clip_to_eye: kind.clip_to_eye(),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
