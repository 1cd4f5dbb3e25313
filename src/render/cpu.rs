use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Arc;

use kurbo::{Affine, BezPath, Circle, Ellipse, Point, RoundedRect, Shape as _};

use crate::foundation::core::Viewport;
use crate::foundation::error::{IrisgateError, IrisgateResult};
use crate::foundation::math::cubic_bezier;
use crate::render::frame::FrameRGBA;
use crate::render::layers::{DrawLayer, LayerKind, Space, layer_plan};
use crate::scene::eye::{EyeScene, SceneFrame};
use crate::scene::geometry::{EyeGeometry, LidGeometry, zoom_about};
use crate::scene::particles::ParticleField;
use crate::scene::veins::VeinLayout;

/// Color ramp in straight (non-premultiplied) alpha: position, rgb, alpha.
type Stops = &'static [(f64, [u8; 3], f64)];

const SCLERA_STOPS: Stops = &[
    (0.0, [240, 232, 226], 1.0),
    (0.3, [235, 224, 216], 1.0),
    (0.6, [221, 208, 197], 1.0),
    (0.85, [200, 181, 168], 1.0),
    (1.0, [160, 138, 120], 1.0),
];

const IRIS_STOPS: Stops = &[
    (0.0, [28, 0, 0], 1.0),
    (0.15, [58, 8, 8], 1.0),
    (0.3, [90, 16, 16], 1.0),
    (0.45, [139, 26, 26], 1.0),
    (0.6, [154, 32, 32], 1.0),
    (0.75, [122, 21, 21], 1.0),
    (0.88, [74, 10, 10], 1.0),
    (1.0, [32, 4, 4], 1.0),
];

const RED_AMBIENT_STOPS: Stops = &[
    (0.0, [100, 8, 8], 0.12),
    (0.4, [60, 4, 4], 0.06),
    (1.0, [0, 0, 0], 0.0),
];

const SKIN_STOPS: Stops = &[
    (0.0, [18, 6, 4], 0.4),
    (0.5, [12, 3, 2], 0.2),
    (1.0, [0, 0, 0], 0.0),
];

const PUPIL_SHADOW_STOPS: Stops = &[
    (0.0, [1, 0, 0], 1.0),
    (0.8, [2, 0, 0], 1.0),
    (1.0, [5, 0, 0], 0.0),
];

const CARUNCLE_STOPS: Stops = &[(0.0, [160, 80, 70], 0.3), (1.0, [160, 80, 70], 0.0)];

const LID_SHADOW_STOPS: Stops = &[(0.0, [0, 0, 0], 0.2), (1.0, [0, 0, 0], 0.0)];

const VIGNETTE_STOPS: Stops = &[
    (0.0, [0, 0, 0], 0.0),
    (0.6, [0, 0, 0], 0.35),
    (1.0, [0, 0, 0], 0.9),
];

/// Which baked gradient a cache entry holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum GradientId {
    RedAmbient,
    SkinTexture,
    Sclera,
    IrisBase,
    PupilShadow,
    Caruncle,
    LidShadow,
    Vignette,
}

/// Cache key for a baked gradient image. Radii are quantized to 1/8 px so
/// the key fully determines the pixel content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    id: GradientId,
    w: u32,
    h: u32,
    r0_q: u32,
    r1_q: u32,
}

/// Saccade-shifted eye placement for one frame, in logical pixels.
///
/// The whole eye (outline, sclera, iris, lids) rides the micro-saccade
/// offset; the camera push stays anchored to the viewport center.
struct EyePose {
    center: Point,
    eye_w: f64,
    eye_h: f64,
    effective_h: f64,
    upper_curve: f64,
    lower_curve: f64,
    iris_r: f64,
    pupil_base_r: f64,
}

impl EyePose {
    fn resolve(geometry: EyeGeometry, frame: &SceneFrame) -> Self {
        let lids = LidGeometry::resolve(geometry, frame.openness, frame.fov_multiplier);
        Self {
            center: geometry.center + geometry.micro_saccade(frame.time_ms, frame.openness),
            eye_w: geometry.eye_w,
            eye_h: geometry.eye_h,
            effective_h: lids.effective_h,
            upper_curve: lids.upper_curve,
            lower_curve: lids.lower_curve,
            iris_r: geometry.iris_r,
            pupil_base_r: geometry.pupil_base_r,
        }
    }

    /// Lid outline: two cubics meeting at the eye corners.
    fn outline(&self) -> BezPath {
        let (c, w) = (self.center, self.eye_w);
        let mut path = BezPath::new();
        path.move_to((c.x - w, c.y));
        path.curve_to(
            (c.x - w * 0.55, c.y - self.upper_curve * 1.05),
            (c.x + w * 0.55, c.y - self.upper_curve * 1.05),
            (c.x + w, c.y),
        );
        path.curve_to(
            (c.x + w * 0.55, c.y + self.lower_curve * 1.05),
            (c.x - w * 0.55, c.y + self.lower_curve * 1.05),
            (c.x - w, c.y),
        );
        path.close_path();
        path
    }

    fn upper_lid_point(&self, t: f64) -> Point {
        let (c, w) = (self.center, self.eye_w);
        let cy = c.y - self.upper_curve * 1.05;
        Point::new(
            cubic_bezier(c.x - w, c.x - w * 0.55, c.x + w * 0.55, c.x + w, t),
            cubic_bezier(c.y, cy, cy, c.y, t),
        )
    }

    fn lower_lid_point(&self, t: f64) -> Point {
        let (c, w) = (self.center, self.eye_w);
        let cy = c.y + self.lower_curve * 1.05;
        Point::new(
            cubic_bezier(c.x - w, c.x - w * 0.55, c.x + w * 0.55, c.x + w, t),
            cubic_bezier(c.y, cy, cy, c.y, t),
        )
    }
}

/// CPU rasterizer for the eye scene, built on `vello_cpu`.
///
/// Stateless with respect to the animation: everything per-frame comes in
/// through [`SceneFrame`]. The renderer owns the reusable render context,
/// the destination pixmap and a cache of baked gradient images, all of
/// which survive across frames and are rebuilt on [`resize`](Self::resize).
pub struct CpuSceneRenderer {
    viewport: Viewport,
    width_px: u16,
    height_px: u16,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl CpuSceneRenderer {
    /// Build a renderer for `viewport`.
    ///
    /// The only failure mode is an unusable surface: zero physical pixels or
    /// a dimension beyond the rasterizer's u16 limit.
    pub fn new(viewport: Viewport) -> IrisgateResult<Self> {
        let (width_px, height_px) = physical_extent(viewport)?;
        Ok(Self {
            viewport,
            width_px,
            height_px,
            ctx: None,
            pixmap: Some(vello_cpu::Pixmap::new(width_px, height_px)),
            gradient_cache: HashMap::new(),
        })
    }

    /// Viewport the renderer currently targets.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopt a new surface size between frames.
    ///
    /// Baked gradients are sized from the viewport, so the cache is dropped.
    pub fn resize(&mut self, viewport: Viewport) -> IrisgateResult<()> {
        let (width_px, height_px) = physical_extent(viewport)?;
        self.viewport = viewport;
        self.width_px = width_px;
        self.height_px = height_px;
        self.pixmap = Some(vello_cpu::Pixmap::new(width_px, height_px));
        self.gradient_cache.clear();
        Ok(())
    }

    /// Rasterize one frame of the scene into premultiplied RGBA8.
    #[tracing::instrument(skip(self, scene, frame))]
    pub fn render_frame(
        &mut self,
        scene: &EyeScene,
        frame: &SceneFrame,
    ) -> IrisgateResult<FrameRGBA> {
        let mut pixmap = self
            .pixmap
            .take()
            .ok_or_else(|| IrisgateError::render("renderer pixmap missing"))?;
        clear_pixmap(&mut pixmap, [0, 0, 0, 0]);

        let plan = layer_plan(frame);
        let pose = EyePose::resolve(scene.geometry(), frame);
        self.with_ctx_mut(self.width_px, self.height_px, |this, ctx| {
            for layer in &plan {
                this.draw_layer(ctx, *layer, scene, frame, &pose)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        let data = pixmap.data_as_u8_slice().to_vec();
        self.pixmap = Some(pixmap);
        Ok(FrameRGBA {
            width: u32::from(self.width_px),
            height: u32::from(self.height_px),
            data,
            premultiplied: true,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> IrisgateResult<R>,
    ) -> IrisgateResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn space_transform(&self, space: Space, frame: &SceneFrame) -> Affine {
        let device = Affine::scale(self.viewport.scale);
        match space {
            Space::Screen => device,
            Space::Zoomed => device * zoom_about(self.viewport.center(), frame.zoom_scale),
        }
    }

    fn draw_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer: DrawLayer,
        scene: &EyeScene,
        frame: &SceneFrame,
        pose: &EyePose,
    ) -> IrisgateResult<()> {
        let tr = self.space_transform(layer.space, frame);
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(tr));

        if layer.clip_to_eye {
            ctx.push_clip_layer(&bezpath_to_cpu(&pose.outline()));
        }
        match layer.kind {
            LayerKind::Background => self.paint_background(ctx),
            LayerKind::Particles => self.paint_particles(ctx, scene.particles(), frame),
            LayerKind::RedAmbient => self.paint_red_ambient(ctx, tr, pose, frame)?,
            LayerKind::SkinTexture => self.paint_skin_texture(ctx, tr, pose)?,
            LayerKind::Sclera => self.paint_sclera(ctx, tr, pose)?,
            LayerKind::Veins => self.paint_veins(ctx, scene.veins(), pose, frame),
            LayerKind::Iris => self.paint_iris(ctx, tr, pose, frame)?,
            LayerKind::Pupil => self.paint_pupil(ctx, tr, pose, frame)?,
            LayerKind::Reflections => self.paint_reflections(ctx, pose, frame),
            LayerKind::LidDetail => self.paint_lid_detail(ctx, tr, pose, frame)?,
            LayerKind::ClosedSlit => self.paint_closed_slit(ctx, pose),
            LayerKind::Vignette => self.paint_vignette(ctx)?,
            LayerKind::RedFlash => self.paint_overlay(ctx, [80, 0, 0], frame.red_flash),
            LayerKind::FadeToBlack => self.paint_overlay(ctx, [0, 0, 0], frame.fade_to_black),
            LayerKind::ScanLines => self.paint_scan_lines(ctx, frame),
        }
        if layer.clip_to_eye {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn paint_background(&self, ctx: &mut vello_cpu::RenderContext) {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_rect(&viewport_rect_cpu(self.viewport));
    }

    fn paint_particles(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        particles: &ParticleField,
        frame: &SceneFrame,
    ) {
        let w = f64::from(self.viewport.width);
        let h = f64::from(self.viewport.height);
        for p in particles.particles() {
            let a = p.opacity * p.flicker(frame.time_ms) * frame.particle_alpha;
            if a < 0.01 {
                continue;
            }
            let sx = (p.x * 0.5 + 0.5) * w;
            let sy = (p.y * 0.5 + 0.5) * h;
            ctx.set_paint(color([255, 255, 255], a));
            fill(ctx, &Circle::new((sx, sy), p.size).to_path(0.1));
        }
    }

    fn paint_red_ambient(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
        frame: &SceneFrame,
    ) -> IrisgateResult<()> {
        let r = pose.eye_w * 2.8;
        let side = (r * 2.0).ceil() as u32;
        let img = self.radial_paint(GradientId::RedAmbient, side, side, 0.0, r, RED_AMBIENT_STOPS)?;
        // The ambient glow hugs the viewport center, not the saccade.
        ctx.push_opacity_layer(frame.openness as f32);
        self.blit_centered(ctx, tr, img, side, side, self.viewport.center());
        ctx.pop_layer();
        Ok(())
    }

    fn paint_skin_texture(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
    ) -> IrisgateResult<()> {
        let r1 = pose.eye_w * 1.6;
        let side = (r1 * 2.0).ceil() as u32;
        let img = self.radial_paint(
            GradientId::SkinTexture,
            side,
            side,
            pose.eye_w * 0.8,
            r1,
            SKIN_STOPS,
        )?;
        self.blit_centered(ctx, tr, img, side, side, pose.center);
        Ok(())
    }

    /// The sclera gradient's focal point sits slightly up-left of the eye
    /// center; the baked image is concentric about that focal point.
    fn paint_sclera(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
    ) -> IrisgateResult<()> {
        let r1 = pose.eye_w * 1.1;
        let side = (r1 * 2.0).ceil() as u32;
        let img = self.radial_paint(GradientId::Sclera, side, side, 0.0, r1, SCLERA_STOPS)?;
        let focal = Point::new(
            pose.center.x - pose.eye_w * 0.05,
            pose.center.y - pose.eye_h * 0.05,
        );
        self.blit_centered(ctx, tr, img, side, side, focal);
        Ok(())
    }

    fn paint_veins(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        veins: &VeinLayout,
        pose: &EyePose,
        frame: &SceneFrame,
    ) {
        let group_alpha = 0.18 * ((frame.openness - 0.15) / 0.3).clamp(0.0, 1.0);
        ctx.push_opacity_layer(group_alpha as f32);
        let at = |p: Point| -> Point {
            Point::new(
                pose.center.x + p.x * pose.eye_w,
                pose.center.y + p.y * pose.effective_h,
            )
        };
        for vein in veins.veins() {
            let mut path = BezPath::new();
            path.move_to(at(vein.start));
            path.quad_to(at(vein.ctrl), at(vein.end));
            ctx.set_paint(color([122, 24, 24], 1.0));
            stroke(ctx, &path, round_stroke(vein.width));

            for branch in &vein.branches {
                let mut path = BezPath::new();
                path.move_to(at(branch.from));
                path.line_to(at(branch.to));
                ctx.set_paint(color([106, 20, 20], 1.0));
                stroke(ctx, &path, round_stroke(branch.width));
            }
        }
        ctx.pop_layer();
    }

    fn paint_iris(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
        frame: &SceneFrame,
    ) -> IrisgateResult<()> {
        let c = pose.center;
        let t = frame.time_ms;

        // Limbal disc under everything else.
        ctx.set_paint(color([15, 0, 0], 1.0));
        fill(ctx, &Circle::new(c, pose.iris_r + 3.0).to_path(0.1));

        let side = (pose.iris_r * 2.0).ceil() as u32;
        let img = self.radial_paint(
            GradientId::IrisBase,
            side,
            side,
            pose.pupil_base_r * 0.6,
            pose.iris_r,
            IRIS_STOPS,
        )?;
        let half = f64::from(side) / 2.0;
        ctx.set_transform(affine_to_cpu(
            tr * Affine::translate((c.x - half, c.y - half)),
        ));
        ctx.set_paint(img);
        fill(ctx, &Circle::new((half, half), pose.iris_r).to_path(0.1));
        ctx.set_transform(affine_to_cpu(tr));

        // Wavy stroma fibers, rotated by the accumulated iris angle.
        let inner_r = pose.pupil_base_r + 3.0;
        let outer_r = pose.iris_r - 2.0;
        let mid_r = (inner_r + outer_r) / 2.0;
        for i in 0..90 {
            let angle = f64::from(i) / 90.0 * 2.0 * PI + frame.iris_angle;
            let wobble = (angle * 7.0 + t * 0.0008).sin() * 1.5;
            let wobble2 = (angle * 4.0 + t * 0.0006).cos();
            let mut path = BezPath::new();
            path.move_to((c.x + angle.cos() * inner_r, c.y + angle.sin() * inner_r));
            path.quad_to(
                (
                    c.x + (angle + 0.02).cos() * (mid_r + wobble),
                    c.y + (angle + 0.02).sin() * (mid_r + wobble),
                ),
                (
                    c.x + angle.cos() * (outer_r + wobble2),
                    c.y + angle.sin() * (outer_r + wobble2),
                ),
            );
            let alpha = 0.06 + (angle * 5.0 + t * 0.0004).sin() * 0.03;
            ctx.set_paint(color([220, 80, 60], alpha));
            stroke(ctx, &path, round_stroke(0.6 + (angle * 3.0).sin() * 0.3));
        }

        ctx.set_paint(color([160, 50, 40], 0.2));
        stroke(
            ctx,
            &Circle::new(c, pose.iris_r * 0.52).to_path(0.1),
            round_stroke(1.8),
        );

        // Crypts: small dark pits scattered on a fixed pseudo-random ring.
        for i in 0..16 {
            let fi = f64::from(i);
            let angle = fi / 16.0 * 2.0 * PI + 0.2;
            let dist = pose.iris_r * (0.45 + (fi * 3.7).sin() * 0.18);
            let radius = 1.5 + (fi * 2.3).sin();
            ctx.set_paint(color([15, 0, 0], 0.25));
            fill(
                ctx,
                &Circle::new((c.x + angle.cos() * dist, c.y + angle.sin() * dist), radius)
                    .to_path(0.1),
            );
        }

        for i in 0..8 {
            let angle = f64::from(i) / 8.0 * 2.0 * PI + 1.1;
            let r1 = pose.iris_r * 0.4;
            let r2 = pose.iris_r * 0.85;
            let mut path = BezPath::new();
            path.move_to((c.x + angle.cos() * r1, c.y + angle.sin() * r1));
            path.line_to((
                c.x + (angle + 0.03).cos() * r2,
                c.y + (angle + 0.03).sin() * r2,
            ));
            ctx.set_paint(color([200, 90, 60], 0.06));
            stroke(ctx, &path, round_stroke(2.0));
        }

        let glow = (0.12 + (t * 0.002).sin() * 0.06) * frame.openness;
        ctx.set_paint(color([180, 25, 25], glow));
        stroke(
            ctx,
            &Circle::new(c, pose.iris_r + 1.0).to_path(0.1),
            round_stroke(2.5),
        );
        Ok(())
    }

    fn paint_pupil(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
        frame: &SceneFrame,
    ) -> IrisgateResult<()> {
        let c = pose.center;
        let pr = pose.pupil_base_r * (1.0 + (frame.time_ms * 0.0012).sin() * 0.04);
        let shadow_r = pr + 4.0;
        let side = (shadow_r * 2.0).ceil() as u32;
        let img = self.radial_paint(
            GradientId::PupilShadow,
            side,
            side,
            pr * 0.7,
            shadow_r,
            PUPIL_SHADOW_STOPS,
        )?;
        self.blit_centered(ctx, tr, img, side, side, c);

        ctx.set_paint(color([2, 0, 0], 1.0));
        fill(ctx, &Circle::new(c, pr).to_path(0.1));
        Ok(())
    }

    fn paint_reflections(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        pose: &EyePose,
        frame: &SceneFrame,
    ) {
        let c = pose.center;
        let o = frame.openness;

        // Window-shaped catchlight, tilted.
        let rlw = pose.iris_r * 0.22;
        let rlh = pose.iris_r * 0.15;
        let window = Affine::translate((c.x - pose.iris_r * 0.24, c.y - pose.iris_r * 0.28))
            * Affine::rotate(-0.15)
            * RoundedRect::new(-rlw / 2.0, -rlh / 2.0, rlw / 2.0, rlh / 2.0, 2.0).to_path(0.1);
        ctx.set_paint(color([255, 255, 255], 0.82 * o));
        fill(ctx, &window);

        ctx.set_paint(color([255, 255, 255], 0.3 * o));
        fill(
            ctx,
            &Ellipse::new(
                (c.x + pose.iris_r * 0.2, c.y + pose.iris_r * 0.22),
                (pose.iris_r * 0.055, pose.iris_r * 0.04),
                0.2,
            )
            .to_path(0.1),
        );

        ctx.set_paint(color([255, 255, 255], 0.45 * o));
        fill(
            ctx,
            &Circle::new((c.x - pose.iris_r * 0.1, c.y - pose.iris_r * 0.38), 1.2).to_path(0.1),
        );

        ctx.set_paint(color([8, 0, 0], 0.55));
        stroke(
            ctx,
            &Circle::new(c, pose.iris_r + 2.0).to_path(0.1),
            flat_stroke(3.0),
        );
    }

    fn paint_lid_detail(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        pose: &EyePose,
        frame: &SceneFrame,
    ) -> IrisgateResult<()> {
        let c = pose.center;
        let w = pose.eye_w;
        let o = frame.openness;

        // Waterlines: pinkish inner rims just inside the lid edges.
        let mut upper_water = BezPath::new();
        upper_water.move_to((c.x - w + 5.0, c.y));
        upper_water.curve_to(
            (c.x - w * 0.5, c.y - pose.upper_curve + 1.5),
            (c.x + w * 0.5, c.y - pose.upper_curve + 1.5),
            (c.x + w - 5.0, c.y),
        );
        ctx.set_paint(color([120, 55, 50], 0.3 * o));
        stroke(ctx, &upper_water, flat_stroke(1.5));

        let mut lower_water = BezPath::new();
        lower_water.move_to((c.x - w + 5.0, c.y));
        lower_water.curve_to(
            (c.x - w * 0.5, c.y + pose.lower_curve - 1.0),
            (c.x + w * 0.5, c.y + pose.lower_curve - 1.0),
            (c.x + w - 5.0, c.y),
        );
        ctx.set_paint(color([110, 50, 45], 0.25 * o));
        stroke(ctx, &lower_water, flat_stroke(1.2));

        let mut lash_line = BezPath::new();
        lash_line.move_to((c.x - w, c.y));
        lash_line.curve_to(
            (c.x - w * 0.55, c.y - pose.upper_curve * 1.05),
            (c.x + w * 0.55, c.y - pose.upper_curve * 1.05),
            (c.x + w, c.y),
        );
        ctx.set_paint(color([25, 3, 3], 0.9));
        stroke(ctx, &lash_line, flat_stroke(2.8));

        let mut crease = BezPath::new();
        crease.move_to((c.x - w * 0.88, c.y - 2.0));
        crease.curve_to(
            (c.x - w * 0.4, c.y - pose.upper_curve - 16.0),
            (c.x + w * 0.4, c.y - pose.upper_curve - 16.0),
            (c.x + w * 0.88, c.y - 2.0),
        );
        ctx.set_paint(color([20, 2, 2], 0.3));
        stroke(ctx, &crease, flat_stroke(1.0));

        let mut lower_line = BezPath::new();
        lower_line.move_to((c.x - w, c.y));
        lower_line.curve_to(
            (c.x - w * 0.55, c.y + pose.lower_curve * 1.05),
            (c.x + w * 0.55, c.y + pose.lower_curve * 1.05),
            (c.x + w, c.y),
        );
        ctx.set_paint(color([30, 4, 4], 0.5));
        stroke(ctx, &lower_line, flat_stroke(1.6));

        self.paint_upper_lashes(ctx, pose);
        self.paint_lower_lashes(ctx, pose);

        // Caruncle glow at the inner corner.
        let img = self.radial_paint(GradientId::Caruncle, 16, 16, 0.0, 8.0, CARUNCLE_STOPS)?;
        ctx.push_opacity_layer(o as f32);
        self.blit_centered(ctx, tr, img, 16, 16, Point::new(c.x - w + 5.0, c.y));
        ctx.pop_layer();

        // Shadow cast by the upper lid onto the eyeball.
        let shadow_w = (w * 2.0).ceil() as u32;
        let img = self.linear_paint(GradientId::LidShadow, shadow_w, 20, 15.0, LID_SHADOW_STOPS)?;
        ctx.push_clip_layer(&bezpath_to_cpu(&pose.outline()));
        ctx.push_opacity_layer(o as f32);
        ctx.set_transform(affine_to_cpu(
            tr * Affine::translate((c.x - w, c.y - pose.upper_curve)),
        ));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(shadow_w),
            20.0,
        ));
        ctx.set_transform(affine_to_cpu(tr));
        ctx.pop_layer();
        ctx.pop_layer();
        Ok(())
    }

    fn paint_upper_lashes(&self, ctx: &mut vello_cpu::RenderContext, pose: &EyePose) {
        for i in 0..35 {
            let t = (f64::from(i) + 0.5) / 35.0;
            let base = pose.upper_lid_point(t);
            let fan = -PI / 2.0 + (t - 0.5) * 0.9;
            let len = 7.0 + (t * PI).sin() * 14.0;
            let bias = (t - 0.5) * 18.0;

            let mut path = BezPath::new();
            path.move_to(base);
            path.quad_to(
                (
                    base.x + fan.cos() * len * 0.55 + bias,
                    base.y + fan.sin() * len * 0.55,
                ),
                (
                    base.x + fan.cos() * len + bias * 0.6,
                    base.y + fan.sin() * len,
                ),
            );
            ctx.set_paint(color([8, 1, 1], 0.55 + (t * PI).sin() * 0.3));
            stroke(ctx, &path, round_stroke(1.2 + (t * PI).sin() * 0.6));

            // Every other lash gets a shorter inner companion.
            if i % 2 == 0 {
                let short = len * 0.6;
                let fan = fan - 0.1;
                let mut path = BezPath::new();
                path.move_to(base);
                path.quad_to(
                    (
                        base.x + fan.cos() * short * 0.5 + bias * 0.7,
                        base.y + fan.sin() * short * 0.5,
                    ),
                    (
                        base.x + fan.cos() * short + bias * 0.4,
                        base.y + fan.sin() * short,
                    ),
                );
                ctx.set_paint(color([12, 2, 2], 0.35));
                stroke(ctx, &path, round_stroke(0.7));
            }
        }
    }

    fn paint_lower_lashes(&self, ctx: &mut vello_cpu::RenderContext, pose: &EyePose) {
        for i in 0..18 {
            let t = (f64::from(i) + 0.5) / 18.0;
            // The corners stay bare.
            if !(0.08..=0.92).contains(&t) {
                continue;
            }
            let base = pose.lower_lid_point(t);
            let angle = PI / 2.0 + (t - 0.5) * 0.45;
            let len = 3.0 + (t * PI).sin() * 5.0;
            let mut path = BezPath::new();
            path.move_to(base);
            path.line_to((base.x + angle.cos() * len, base.y + angle.sin() * len));
            ctx.set_paint(color([10, 2, 2], 0.3));
            stroke(ctx, &path, round_stroke(0.7));
        }
    }

    fn paint_closed_slit(&self, ctx: &mut vello_cpu::RenderContext, pose: &EyePose) {
        let (c, w) = (pose.center, pose.eye_w);
        let mut path = BezPath::new();
        path.move_to((c.x - w, c.y));
        path.curve_to(
            (c.x - w * 0.3, c.y + 3.0),
            (c.x + w * 0.3, c.y + 3.0),
            (c.x + w, c.y),
        );
        ctx.set_paint(color([50, 8, 8], 0.5));
        stroke(ctx, &path, flat_stroke(2.0));
    }

    fn paint_vignette(&mut self, ctx: &mut vello_cpu::RenderContext) -> IrisgateResult<()> {
        let w = self.viewport.width;
        let h = self.viewport.height;
        let r0 = f64::from(w.min(h)) * 0.18;
        let r1 = f64::from(w.max(h)) * 0.65;
        let img = self.radial_paint(GradientId::Vignette, w, h, r0, r1, VIGNETTE_STOPS)?;
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        Ok(())
    }

    fn paint_overlay(&self, ctx: &mut vello_cpu::RenderContext, rgb: [u8; 3], alpha: f64) {
        ctx.set_paint(color(rgb, alpha));
        ctx.fill_rect(&viewport_rect_cpu(self.viewport));
    }

    fn paint_scan_lines(&self, ctx: &mut vello_cpu::RenderContext, frame: &SceneFrame) {
        let w = f64::from(self.viewport.width);
        let h = f64::from(self.viewport.height);
        let y = (frame.time_ms * 0.04).rem_euclid(h);
        ctx.set_paint(color([80, 3, 3], frame.scan_line_alpha));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, y - 1.0, w, y + 1.0));
        let y2 = (y + h * 0.4).rem_euclid(h) - 0.5;
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, y2, w, y2 + 1.0));
    }

    /// Draw a baked image with its center at `at`, in the layer's space.
    fn blit_centered(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        img: vello_cpu::Image,
        w: u32,
        h: u32,
        at: Point,
    ) {
        let half_w = f64::from(w) / 2.0;
        let half_h = f64::from(h) / 2.0;
        ctx.set_transform(affine_to_cpu(
            tr * Affine::translate((at.x - half_w, at.y - half_h)),
        ));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        ctx.set_transform(affine_to_cpu(tr));
    }

    fn radial_paint(
        &mut self,
        id: GradientId,
        w: u32,
        h: u32,
        r0: f64,
        r1: f64,
        stops: Stops,
    ) -> IrisgateResult<vello_cpu::Image> {
        let key = GradientKey {
            id,
            w,
            h,
            r0_q: quantize_radius(r0),
            r1_q: quantize_radius(r1),
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let r0 = f64::from(key.r0_q) / 8.0;
        let r1 = f64::from(key.r1_q) / 8.0;
        let (cx, cy) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let mut bytes = vec![0u8; w as usize * h as usize * 4];
        for y in 0..h {
            for x in 0..w {
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                let d = (f64::from(x) + 0.5 - cx).hypot(f64::from(y) + 0.5 - cy);
                let t = if r1 > r0 {
                    ((d - r0) / (r1 - r0)).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                bytes[idx..idx + 4].copy_from_slice(&premul_rgba8(sample_stops(stops, t)));
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    /// Vertical ramp over the first `span` rows; rows past it hold the
    /// terminal stop.
    fn linear_paint(
        &mut self,
        id: GradientId,
        w: u32,
        h: u32,
        span: f64,
        stops: Stops,
    ) -> IrisgateResult<vello_cpu::Image> {
        let key = GradientKey {
            id,
            w,
            h,
            r0_q: 0,
            r1_q: quantize_radius(span),
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let span = f64::from(key.r1_q) / 8.0;
        let mut bytes = vec![0u8; w as usize * h as usize * 4];
        for y in 0..h {
            let t = if span > 0.0 {
                ((f64::from(y) + 0.5) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let px = premul_rgba8(sample_stops(stops, t));
            for x in 0..w {
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&px);
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

fn physical_extent(viewport: Viewport) -> IrisgateResult<(u16, u16)> {
    let w: u16 = viewport
        .physical_width()
        .try_into()
        .map_err(|_| IrisgateError::validation("surface width exceeds u16"))?;
    let h: u16 = viewport
        .physical_height()
        .try_into()
        .map_err(|_| IrisgateError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(IrisgateError::validation(
            "surface has zero physical pixels",
        ));
    }
    Ok((w, h))
}

fn quantize_radius(r: f64) -> u32 {
    (r.max(0.0) * 8.0).round() as u32
}

/// Piecewise-linear ramp lookup in straight alpha, canvas-gradient style.
fn sample_stops(stops: Stops, t: f64) -> [u8; 4] {
    let Some(&(first_pos, first_rgb, first_a)) = stops.first() else {
        return [0, 0, 0, 0];
    };
    if t <= first_pos {
        return straight_rgba(first_rgb, first_a);
    }
    let mut prev = (first_pos, first_rgb, first_a);
    for &(pos, rgb, a) in &stops[1..] {
        if t <= pos {
            let span = pos - prev.0;
            let local = if span > 0.0 { (t - prev.0) / span } else { 1.0 };
            let mix = |x: u8, y: u8| -> u8 {
                (f64::from(x) + (f64::from(y) - f64::from(x)) * local)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            let alpha = prev.2 + (a - prev.2) * local;
            return [
                mix(prev.1[0], rgb[0]),
                mix(prev.1[1], rgb[1]),
                mix(prev.1[2], rgb[2]),
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ];
        }
        prev = (pos, rgb, a);
    }
    straight_rgba(prev.1, prev.2)
}

fn straight_rgba(rgb: [u8; 3], alpha: f64) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], alpha_u8(alpha)]
}

fn alpha_u8(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn color(rgb: [u8; 3], alpha: f64) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgb[0], rgb[1], rgb[2], alpha_u8(alpha))
}

fn fill(ctx: &mut vello_cpu::RenderContext, path: &BezPath) {
    ctx.fill_path(&bezpath_to_cpu(path));
}

fn stroke(ctx: &mut vello_cpu::RenderContext, path: &BezPath, stroke: vello_cpu::kurbo::Stroke) {
    ctx.set_stroke(stroke);
    ctx.stroke_path(&bezpath_to_cpu(path));
}

fn round_stroke(width: f64) -> vello_cpu::kurbo::Stroke {
    vello_cpu::kurbo::Stroke::new(width)
        .with_caps(vello_cpu::kurbo::Cap::Round)
        .with_join(vello_cpu::kurbo::Join::Round)
}

fn flat_stroke(width: f64) -> vello_cpu::kurbo::Stroke {
    vello_cpu::kurbo::Stroke::new(width)
        .with_caps(vello_cpu::kurbo::Cap::Butt)
        .with_join(vello_cpu::kurbo::Join::Miter)
}

fn viewport_rect_cpu(viewport: Viewport) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(viewport.width),
        f64::from(viewport.height),
    )
}

fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> IrisgateResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| IrisgateError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| IrisgateError::render("pixmap height exceeds u16"))?;
    if bytes_premul.len() != width as usize * height as usize * 4 {
        return Err(IrisgateError::render("baked gradient byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
