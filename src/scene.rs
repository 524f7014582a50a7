//! Per-frame animation of the hero scene.
//!
//! Everything here reads the committed [`UiState`] and derives animation
//! values from it; nothing in this module writes UI state. The output of a
//! tick is a [`SceneFrame`] the renderer draws as-is.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::picking::{pick_nearest, HitSphere, Ray};
use crate::render::{CameraParams, LightParams};
use crate::target::Target;
use crate::ui_state::UiState;

/// Frame rate the easing factors below were tuned for.
const REFERENCE_FPS: f32 = 60.0;

/// Tunable constants of the hero scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub fov_degrees: f32,
    pub camera_rest: Vec3,
    pub camera_focus: Vec3,
    pub look_at: Vec3,
    pub camera_ease: f32,
    /// Where the active crystal (or the about star) comes to rest.
    pub focus_point: Vec3,
    pub crystal_y: f32,
    pub max_crystal_spacing: f32,
    pub crystal_ease: f32,
    pub bob_amplitude: f32,
    pub spin_idle: f32,
    pub spin_active: f32,
    pub highlight_scale: f32,
    pub scale_ease: f32,
    pub glow_idle: f32,
    pub glow_highlight: f32,
    pub crystal_opacity: f32,
    pub star_ease: f32,
    pub star_spin: f32,
    pub star_rest_margin: f32,
    pub parallax_strength: f32,
    pub parallax_ease: f32,
    pub particle_count: usize,
    pub particle_depth: f32,
    pub particle_spread: f32,
    pub drift_speed: f32,
    pub warp_speed: f32,
    pub wrap_limit: f32,
    pub follow_strength: f32,
    pub follow_ease: f32,
    pub point_size: f32,
    pub warp_point_size: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            camera_rest: Vec3::new(0.0, 1.0, 12.0),
            camera_focus: Vec3::new(0.0, 1.0, 8.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            camera_ease: 0.05,
            focus_point: Vec3::new(0.0, 1.0, 4.0),
            crystal_y: -1.5,
            max_crystal_spacing: 5.0,
            crystal_ease: 0.05,
            bob_amplitude: 0.2,
            spin_idle: 0.3,
            spin_active: 2.0,
            highlight_scale: 1.3,
            scale_ease: 0.1,
            glow_idle: 0.5,
            glow_highlight: 1.2,
            crystal_opacity: 0.8,
            star_ease: 0.08,
            star_spin: 20.0,
            star_rest_margin: 2.5,
            parallax_strength: 0.1,
            parallax_ease: 0.05,
            particle_count: 5000,
            particle_depth: 30.0,
            particle_spread: 3.0,
            drift_speed: 0.5,
            warp_speed: 25.0,
            wrap_limit: 15.0,
            follow_strength: 3.0,
            follow_ease: 0.02,
            point_size: 0.02,
            warp_point_size: 0.06,
        }
    }
}

/// How the "About Me" entry point is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AboutAffordance {
    /// A button outside the scene; the star only appears during its warp.
    Button,
    /// The star itself rests at the bottom of the scene and can be clicked.
    Star,
}

/// Inputs sampled by the host loop for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Pointer in normalized device coordinates.
    pub pointer: Vec2,
}

/// Visible world extent at the `z = 0` plane when the camera is at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldViewport {
    pub width: f32,
    pub height: f32,
}

impl WorldViewport {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let distance = config.camera_rest.z.abs();
        let height = 2.0 * distance * (config.fov_degrees.to_radians() / 2.0).tan();
        Self {
            width: height * aspect.max(0.01),
            height,
        }
    }
}

/// Converts a per-frame easing factor into one for a tick of `dt` seconds.
fn ease(factor: f32, dt: f32) -> f32 {
    1.0 - (1.0 - factor).powf(dt.max(0.0) * REFERENCE_FPS)
}

/// One floating crystal.
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalVisual {
    pub target: Target,
    pub home: Vec3,
    pub position: Vec3,
    pub scale: f32,
    pub spin: f32,
    pub hovered: bool,
    pub active: bool,
    pub visible: bool,
}

impl CrystalVisual {
    pub fn new(target: Target, home: Vec3) -> Self {
        Self {
            target,
            home,
            position: home,
            scale: 1.0,
            spin: 0.0,
            hovered: false,
            active: false,
            visible: true,
        }
    }

    pub fn update(&mut self, state: &UiState, config: &SceneConfig, ctx: &FrameContext) {
        self.active = state.is_active(&self.target);
        self.visible = !state.is_warping() && !state.is_active(&Target::ABOUT_ME);
        if !self.visible {
            self.hovered = false;
        }

        let goal = if self.active {
            config.focus_point
        } else {
            self.home
        };
        self.position = self
            .position
            .lerp(goal, ease(config.crystal_ease, ctx.dt));
        if !self.active {
            self.position.y =
                self.home.y + (ctx.elapsed + self.home.x).sin() * config.bob_amplitude;
        }

        let spin = if self.active {
            config.spin_active
        } else {
            config.spin_idle
        };
        self.spin += ctx.dt * spin;

        let goal_scale = if self.highlighted() {
            config.highlight_scale
        } else {
            1.0
        };
        self.scale += (goal_scale - self.scale) * ease(config.scale_ease, ctx.dt);
    }

    pub fn highlighted(&self) -> bool {
        self.hovered || self.active
    }

    pub fn glow(&self, config: &SceneConfig) -> f32 {
        if self.highlighted() {
            config.glow_highlight
        } else {
            config.glow_idle
        }
    }

    pub fn label_visible(&self) -> bool {
        self.visible && !self.active
    }
}

/// The cone that carries the camera into the About Me panel.
#[derive(Debug, Clone, PartialEq)]
pub struct AboutStar {
    pub rest: Vec3,
    pub position: Vec3,
    pub spin: f32,
    pub hovered: bool,
    pub visible: bool,
}

impl AboutStar {
    fn new(rest: Vec3) -> Self {
        Self {
            rest,
            position: rest,
            spin: 0.0,
            hovered: false,
            visible: false,
        }
    }

    fn update(
        &mut self,
        state: &UiState,
        affordance: AboutAffordance,
        config: &SceneConfig,
        ctx: &FrameContext,
    ) {
        let engaged = state.is_active(&Target::ABOUT_ME);
        let travelling = state.is_warping() && engaged;
        let was_visible = self.visible;
        self.visible = travelling
            || (affordance == AboutAffordance::Star && state.active_target().is_none());
        if !self.visible {
            self.hovered = false;
        } else if !was_visible {
            // A star that reappears always departs from its resting spot.
            self.position = self.rest;
            self.spin = 0.0;
        }

        let goal = if travelling || engaged {
            config.focus_point
        } else {
            self.rest
        };
        self.position = self.position.lerp(goal, ease(config.star_ease, ctx.dt));
        if travelling || engaged {
            self.spin += ctx.dt * config.star_spin;
        }
    }
}

/// Star field drifting behind the crystals.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    pub points: Vec<Vec3>,
    pub offset: Vec3,
    pub point_size: f32,
}

impl ParticleField {
    pub fn generate(config: &SceneConfig, viewport: WorldViewport, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let spread_x = viewport.width * config.particle_spread;
        let spread_y = viewport.height * config.particle_spread;
        let points = (0..config.particle_count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * spread_x,
                    (rng.gen::<f32>() - 0.5) * spread_y,
                    (rng.gen::<f32>() - 0.5) * config.particle_depth,
                )
            })
            .collect();
        Self {
            points,
            offset: Vec3::ZERO,
            point_size: config.point_size,
        }
    }

    pub fn update(&mut self, warping: bool, config: &SceneConfig, ctx: &FrameContext) {
        let speed = if warping {
            config.warp_speed
        } else {
            config.drift_speed
        };
        self.offset.z += ctx.dt * speed;
        if self.offset.z > config.wrap_limit {
            self.offset.z = -config.wrap_limit;
        }

        if !warping {
            let goal = ctx.pointer * config.follow_strength;
            let t = ease(config.follow_ease, ctx.dt);
            self.offset.x += (goal.x - self.offset.x) * t;
            self.offset.y += (goal.y - self.offset.y) * t;
        }

        self.point_size = if warping {
            config.warp_point_size
        } else {
            config.point_size
        };
    }
}

/// Mesh kinds the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Crystal,
    Star,
}

/// One mesh draw for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub kind: MeshKind,
    pub model: Mat4,
    pub color: Vec3,
    pub glow: f32,
    pub opacity: f32,
}

/// Caption drawn under a crystal.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vec3,
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub camera: CameraParams,
    pub light: LightParams,
    pub meshes: Vec<MeshInstance>,
    pub labels: Vec<Label>,
    pub particle_offset: Vec3,
    pub particle_size: f32,
}

/// Owns camera motion, parallax, particles and the scene objects.
#[derive(Debug, Clone)]
pub struct SceneController {
    config: SceneConfig,
    affordance: AboutAffordance,
    aspect: f32,
    camera_position: Vec3,
    parallax: Vec2,
    crystals: Vec<CrystalVisual>,
    star: AboutStar,
    particles: ParticleField,
}

impl SceneController {
    pub fn new(config: SceneConfig, affordance: AboutAffordance, aspect: f32, seed: u64) -> Self {
        let viewport = WorldViewport::new(&config, aspect);
        let crystals = Target::CRYSTALS
            .into_iter()
            .zip(crystal_homes(&config, viewport))
            .map(|(target, home)| CrystalVisual::new(target, home))
            .collect();
        let star = AboutStar::new(star_rest(&config, viewport));
        let particles = ParticleField::generate(&config, viewport, seed);
        Self {
            camera_position: config.camera_rest,
            config,
            affordance,
            aspect,
            parallax: Vec2::ZERO,
            crystals,
            star,
            particles,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn crystals(&self) -> &[CrystalVisual] {
        &self.crystals
    }

    pub fn star(&self) -> &AboutStar {
        &self.star
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    /// Re-lays out the crystals for a new aspect ratio. Particles keep the
    /// spread they were generated with.
    pub fn resize(&mut self, aspect: f32) {
        self.aspect = aspect.max(0.01);
        let viewport = WorldViewport::new(&self.config, self.aspect);
        for (crystal, home) in self
            .crystals
            .iter_mut()
            .zip(crystal_homes(&self.config, viewport))
        {
            crystal.home = home;
        }
        self.star.rest = star_rest(&self.config, viewport);
    }

    /// Advances every animated value by one tick.
    pub fn update(&mut self, state: &UiState, ctx: &FrameContext) {
        let warping = state.is_warping();

        if !warping {
            let goal = if state.active_target().is_some() {
                self.config.camera_focus
            } else {
                self.config.camera_rest
            };
            self.camera_position = self
                .camera_position
                .lerp(goal, ease(self.config.camera_ease, ctx.dt));

            let goal = Vec2::new(ctx.pointer.y, -ctx.pointer.x) * self.config.parallax_strength;
            self.parallax += (goal - self.parallax) * ease(self.config.parallax_ease, ctx.dt);
        }

        for crystal in &mut self.crystals {
            crystal.update(state, &self.config, ctx);
        }
        self.star.update(state, self.affordance, &self.config, ctx);
        self.particles.update(warping, &self.config, ctx);
    }

    /// Marks the object under the pointer as hovered.
    pub fn set_hovered(&mut self, hovered: Option<&Target>) {
        for crystal in &mut self.crystals {
            crystal.hovered = crystal.visible && hovered == Some(&crystal.target);
        }
        self.star.hovered = self.star.visible && hovered == Some(&Target::ABOUT_ME);
    }

    /// True when the pointer rests on something clickable.
    pub fn wants_pointer_cursor(&self) -> bool {
        self.crystals.iter().any(|crystal| crystal.hovered) || self.star.hovered
    }

    pub fn camera(&self) -> CameraParams {
        let view = Mat4::look_at_rh(self.camera_position, self.config.look_at, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(
            self.config.fov_degrees.to_radians(),
            self.aspect,
            0.1,
            100.0,
        );
        let forward = (self.config.look_at - self.camera_position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        CameraParams {
            view_proj: projection * view,
            position: self.camera_position,
            right,
            up,
        }
    }

    /// Returns the clickable target under a pointer given in NDC.
    pub fn pick(&self, ndc: Vec2) -> Option<Target> {
        let ray = Ray::from_ndc(ndc, self.camera().view_proj)?;
        let group = self.parallax_rotation();
        let crystals = self
            .crystals
            .iter()
            .filter(|crystal| crystal.visible)
            .map(|crystal| HitSphere {
                id: crystal.target.clone(),
                centre: group * crystal.position,
                radius: crystal.scale,
            });
        let star = self.star.visible.then(|| HitSphere {
            id: Target::ABOUT_ME,
            centre: self.star.position,
            radius: 1.3,
        });
        pick_nearest(&ray, crystals.chain(star))
    }

    pub fn frame(&self) -> SceneFrame {
        let group = Mat4::from_quat(self.parallax_rotation());
        let mut meshes = Vec::with_capacity(self.crystals.len() + 1);
        let mut labels = Vec::new();

        for crystal in self.crystals.iter().filter(|crystal| crystal.visible) {
            let placement = group * Mat4::from_translation(crystal.position);
            meshes.push(MeshInstance {
                kind: MeshKind::Crystal,
                model: placement
                    * Mat4::from_rotation_y(crystal.spin)
                    * Mat4::from_scale(Vec3::splat(crystal.scale)),
                color: Vec3::ONE,
                glow: crystal.glow(&self.config),
                opacity: self.config.crystal_opacity,
            });
            if crystal.label_visible() {
                labels.push(Label {
                    text: crystal.target.label().to_string(),
                    position: placement.transform_point3(Vec3::new(0.0, -1.8, 0.0)),
                });
            }
        }

        if self.star.visible {
            meshes.push(MeshInstance {
                kind: MeshKind::Star,
                model: Mat4::from_translation(self.star.position)
                    * Mat4::from_rotation_y(self.star.spin)
                    * Mat4::from_rotation_x(std::f32::consts::PI),
                color: Vec3::ONE,
                glow: self.config.glow_highlight,
                opacity: 1.0,
            });
        }

        SceneFrame {
            camera: self.camera(),
            light: LightParams {
                position: Vec3::new(0.0, 5.0, 5.0),
                color: Vec3::ONE,
                intensity: 1.0,
                ambient: 0.1,
            },
            meshes,
            labels,
            particle_offset: self.particles.offset,
            particle_size: self.particles.point_size,
        }
    }

    fn parallax_rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::XYZ, self.parallax.x, self.parallax.y, 0.0)
    }
}

fn crystal_homes(config: &SceneConfig, viewport: WorldViewport) -> [Vec3; 3] {
    let spacing = config.max_crystal_spacing.min(viewport.width / 2.5);
    [-spacing, 0.0, spacing].map(|x| Vec3::new(x, config.crystal_y, 0.0))
}

fn star_rest(config: &SceneConfig, viewport: WorldViewport) -> Vec3 {
    Vec3::new(0.0, -viewport.height / 2.0 + config.star_rest_margin, 0.0)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ui_state::UiStateMachine;

    const TICK: FrameContext = FrameContext {
        dt: 1.0 / 60.0,
        elapsed: 0.0,
        pointer: Vec2::ZERO,
    };

    fn small_config() -> SceneConfig {
        SceneConfig {
            particle_count: 64,
            ..SceneConfig::default()
        }
    }

    fn controller(affordance: AboutAffordance) -> SceneController {
        SceneController::new(small_config(), affordance, 16.0 / 9.0, 7)
    }

    fn run(scene: &mut SceneController, state: &UiState, ticks: usize) {
        for _ in 0..ticks {
            scene.update(state, &TICK);
        }
    }

    fn crystal<'a>(scene: &'a SceneController, target: &Target) -> &'a CrystalVisual {
        scene
            .crystals()
            .iter()
            .find(|crystal| &crystal.target == target)
            .unwrap()
    }

    #[test]
    fn crystals_are_spread_across_the_viewport() {
        let wide = controller(AboutAffordance::Button);
        let homes: Vec<f32> = wide.crystals().iter().map(|c| c.home.x).collect();
        assert_eq!(homes, vec![-5.0, 0.0, 5.0]);

        let narrow = SceneController::new(small_config(), AboutAffordance::Button, 0.5, 7);
        let spacing = narrow.crystals()[2].home.x;
        let viewport = WorldViewport::new(&small_config(), 0.5);
        assert!((spacing - viewport.width / 2.5).abs() < 1e-4);
        assert!(spacing < 5.0);
    }

    #[test]
    fn per_frame_easing_matches_reference_rate() {
        assert!((ease(0.05, 1.0 / 60.0) - 0.05).abs() < 1e-5);
        assert!(ease(0.05, 2.0 / 60.0) > 0.05);
        assert_eq!(ease(0.05, 0.0), 0.0);
    }

    #[test]
    fn active_crystal_moves_to_focus_point_and_camera_follows() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::CONTACT, Duration::ZERO);
        machine.advance(Duration::from_millis(1_000));
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 600);

        let contact = crystal(&scene, &Target::CONTACT);
        assert!(contact.active);
        assert!((contact.position - scene.config().focus_point).length() < 0.01);
        assert!((contact.scale - 1.3).abs() < 0.01);
        assert!(!contact.label_visible());
        assert!((scene.camera_position() - scene.config().camera_focus).length() < 0.01);

        let projects = crystal(&scene, &Target::PROJECTS);
        assert!(!projects.active);
        assert!((projects.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn warping_hides_crystals_and_freezes_camera() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::PROJECTS, Duration::ZERO);
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 30);

        assert!(scene.crystals().iter().all(|crystal| !crystal.visible));
        assert_eq!(scene.camera_position(), scene.config().camera_rest);
        assert_eq!(scene.particles().point_size, 0.06);
        assert!(scene.frame().meshes.is_empty());
    }

    #[test]
    fn particles_wrap_around_when_warping() {
        let mut machine = UiStateMachine::default();
        machine.activate(Target::SKILLS, Duration::ZERO);
        let mut scene = controller(AboutAffordance::Button);
        // 25 units per second reaches the wrap limit in well under a second.
        run(&mut scene, machine.state(), 40);
        assert!(scene.particles().offset.z < 0.0);
        assert!(scene.particles().offset.z >= -15.0);
    }

    #[test]
    fn about_star_only_flies_while_warping_to_about_me() {
        let mut machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 1);
        assert!(!scene.star().visible);

        machine.activate(Target::ABOUT_ME, Duration::ZERO);
        run(&mut scene, machine.state(), 60);
        assert!(scene.star().visible);
        assert!(scene.star().spin > 0.0);
        assert!(scene.star().position.y > scene.star().rest.y);
        assert!(scene
            .frame()
            .meshes
            .iter()
            .all(|mesh| mesh.kind == MeshKind::Star));

        machine.advance(Duration::from_millis(1_000));
        run(&mut scene, machine.state(), 1);
        assert!(!scene.star().visible);
        assert!(scene.crystals().iter().all(|crystal| !crystal.visible));
    }

    #[test]
    fn reopening_about_me_starts_the_star_from_rest() {
        let mut machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        machine.activate(Target::ABOUT_ME, Duration::ZERO);
        run(&mut scene, machine.state(), 60);
        machine.advance(Duration::from_millis(1_000));
        run(&mut scene, machine.state(), 120);
        let rest = scene.star().rest;
        let flight = scene.star().position.distance(rest);
        assert!(flight > 1.0);

        machine.close();
        run(&mut scene, machine.state(), 2);
        machine.activate(Target::ABOUT_ME, Duration::from_millis(3_000));
        run(&mut scene, machine.state(), 1);
        let star = scene.star();
        assert!(star.visible);
        assert!(
            star.position.distance(rest) < flight * 0.1,
            "star reappeared at {:?}, rest is {rest:?}",
            star.position
        );
        assert!(star.spin <= TICK.dt * small_config().star_spin + f32::EPSILON);
    }

    #[test]
    fn star_affordance_returns_to_rest_after_another_target() {
        let mut machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Star);
        machine.activate(Target::ABOUT_ME, Duration::ZERO);
        run(&mut scene, machine.state(), 30);
        machine.activate(Target::PROJECTS, Duration::from_millis(500));
        run(&mut scene, machine.state(), 1);
        assert!(!scene.star().visible);

        machine.close();
        run(&mut scene, machine.state(), 1);
        let star = scene.star();
        assert!(star.visible);
        assert_eq!(star.spin, 0.0);
        assert!(star.position.distance(star.rest) < 1e-4);
    }

    #[test]
    fn star_affordance_is_clickable_at_rest() {
        let machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Star);
        run(&mut scene, machine.state(), 1);
        assert!(scene.star().visible);

        let camera = scene.camera();
        let ndc = camera.view_proj.project_point3(scene.star().position);
        assert_eq!(scene.pick(ndc.truncate()), Some(Target::ABOUT_ME));
    }

    #[test]
    fn picking_hits_visible_crystals_only() {
        let mut machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 1);

        let target = crystal(&scene, &Target::PROJECTS).position;
        let ndc = scene.camera().view_proj.project_point3(target).truncate();
        assert_eq!(scene.pick(ndc), Some(Target::PROJECTS));
        assert_eq!(scene.pick(Vec2::new(0.0, 0.95)), None);

        machine.activate(Target::CONTACT, Duration::ZERO);
        run(&mut scene, machine.state(), 1);
        assert_eq!(scene.pick(ndc), None);
    }

    #[test]
    fn hover_highlights_and_sets_cursor() {
        let machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 1);
        scene.set_hovered(Some(&Target::SKILLS));
        assert!(scene.wants_pointer_cursor());
        run(&mut scene, machine.state(), 300);
        let skills = crystal(&scene, &Target::SKILLS);
        assert!((skills.scale - 1.3).abs() < 0.01);
        assert_eq!(skills.glow(scene.config()), 1.2);

        scene.set_hovered(None);
        assert!(!scene.wants_pointer_cursor());
    }

    #[test]
    fn parallax_follows_pointer_when_idle() {
        let machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        let ctx = FrameContext {
            pointer: Vec2::new(1.0, -1.0),
            ..TICK
        };
        for _ in 0..600 {
            scene.update(machine.state(), &ctx);
        }
        assert!((scene.parallax() - Vec2::new(-0.1, -0.1)).length() < 1e-3);
        assert!((scene.particles().offset.x - 3.0).abs() < 0.05);
    }

    #[test]
    fn frame_lists_labels_for_resting_crystals() {
        let machine = UiStateMachine::default();
        let mut scene = controller(AboutAffordance::Button);
        run(&mut scene, machine.state(), 1);
        let frame = scene.frame();
        assert_eq!(frame.meshes.len(), 3);
        let labels: Vec<_> = frame.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(labels, vec!["Projects", "Skills & Experience", "Contact"]);
    }
}
