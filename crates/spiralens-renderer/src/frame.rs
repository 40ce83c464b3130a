//! Immutable per-frame parameter snapshot and the per-pixel integration.
//!
//! `FrameParameters::derive` resolves everything that is constant across a frame once, on the
//! main thread: the two component placements, the equivalent focal length, the background
//! surfaces and the (auto)focus distance. The parallel pixel pass then only reads.

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use spiralens_background::{half_extents, BackgroundSurface};
use spiralens_math::{safe_div, Ray};
use spiralens_optics::{
    autofocus_distance, equivalent_focal_length, LensStack, SpiralLensComponent,
};
use spiralens_scene::{BackgroundSelection, SceneSettings};
use spiralens_texture::Texture;

use crate::aperture::ApertureSamples;

/// Everything a pixel needs, resolved once per frame.
#[derive(Clone)]
pub struct FrameParameters {
    pub camera_position: Vec3,
    pub view_direction: Vec3,
    pub half_fov_tangents: Vec2,
    pub aperture_basis_x: Vec3,
    pub aperture_basis_y: Vec3,
    pub aperture_radius: f32,
    pub focus_distance: f32,
    pub ray_count: u32,

    pub stack: LensStack,

    /// Surface seen by rays leaving toward -z.
    pub environment: BackgroundSurface,
    pub environment_texture: Option<Arc<Texture>>,
    /// Surface seen by rays leaving toward +z.
    pub user: BackgroundSurface,
    pub user_texture: Option<Arc<Texture>>,
}

impl FrameParameters {
    pub fn derive(scene: &SceneSettings) -> Self {
        let camera = &scene.camera;
        let (aperture_basis_x, aperture_basis_y) = camera.aperture_basis();

        // the two components sit symmetrically around z = 0, counter-rotated by half the
        // relative angle each, and carry focal scales of opposite sign
        let delta_z = scene.effective_delta_z();
        let template = SpiralLensComponent {
            center: Vec3::ZERO,
            rotation: 0.0,
            spiral_type: scene.spiral_type,
            b: scene.b,
            f1: scene.f1,
            focusing: scene.focusing,
            azimuthal_correction: scene.azimuthal_correction,
            visible: true,
        };
        let stack = LensStack {
            component1: SpiralLensComponent {
                center: Vec3::new(0.0, 0.0, 0.5 * delta_z),
                rotation: -0.5 * scene.rotation,
                visible: scene.visible1,
                ..template
            },
            component2: SpiralLensComponent {
                center: Vec3::new(0.0, 0.0, -0.5 * delta_z),
                rotation: 0.5 * scene.rotation,
                f1: -scene.f1,
                visible: scene.visible2,
                ..template
            },
            clear_aperture_radius: scene.clear_aperture_radius,
            display_mode: scene.display_mode,
            equivalent_focal_length: equivalent_focal_length(scene.b, scene.f1, scene.rotation),
        };

        let d = scene.background_distance;
        let user_extents = half_extents(scene.user_fov, scene.user_aspect, d);
        let user = BackgroundSurface::fixed_z(d, user_extents.x, user_extents.y, scene.user_fallback);

        let (environment, environment_texture, user_texture) = match scene.background {
            BackgroundSelection::LiveFeeds => {
                let extents = half_extents(scene.environment_fov, scene.environment_aspect, d);
                let surface = BackgroundSurface::fixed_z(
                    -d,
                    extents.x,
                    extents.y,
                    scene.environment_fallback,
                );
                (surface, scene.environment_feed.clone(), scene.user_feed.clone())
            }
            BackgroundSelection::Image => {
                // the still image sits on a plane along the view direction, so it stays
                // centred when the camera moves off axis; rays leaving backwards only ever
                // see the user-side fallback
                let aspect = scene
                    .image
                    .as_ref()
                    .map(|image| image.aspect_ratio())
                    .unwrap_or(scene.environment_aspect);
                let extents = half_extents(scene.environment_fov, aspect, d);
                let surface = BackgroundSurface::along_view(
                    camera.position(),
                    camera.view_direction(),
                    d,
                    extents.x,
                    extents.y,
                    scene.environment_fallback,
                );
                (surface, scene.image.clone(), None)
            }
            BackgroundSelection::Solid => {
                let extents = half_extents(scene.environment_fov, scene.environment_aspect, d);
                let surface = BackgroundSurface::fixed_z(
                    -d,
                    extents.x,
                    extents.y,
                    scene.environment_fallback,
                );
                (surface, None, None)
            }
        };

        let focus_distance = if scene.autofocus {
            autofocus_distance(
                camera.position(),
                camera.view_direction(),
                stack.equivalent_focal_length,
                environment.center,
            )
        } else {
            camera.focus_distance()
        };

        Self {
            camera_position: camera.position(),
            view_direction: camera.view_direction(),
            half_fov_tangents: camera.half_fov_tangents(),
            aperture_basis_x,
            aperture_basis_y,
            aperture_radius: camera.aperture_radius(),
            focus_distance,
            ray_count: camera.ray_count(),
            stack,
            environment,
            environment_texture,
            user,
            user_texture,
        }
    }

    /// Colour of the pixel at the given normalized device coordinate (both components in
    /// [-1, 1]), averaged over the aperture samples. A zero aperture or a single ray reduces
    /// exactly to the un-jittered principal ray.
    pub fn render_pixel(&self, samples: &ApertureSamples, ndc: Vec2) -> Vec4 {
        let principal = self.view_direction
            + self.aperture_basis_x * (self.half_fov_tangents.x * ndc.x)
            + self.aperture_basis_y * (self.half_fov_tangents.y * ndc.y);

        if self.aperture_radius == 0.0 || self.ray_count <= 1 {
            return self.trace(Ray::new(self.camera_position, principal));
        }

        // all sample rays pass through the in-focus point of the principal ray
        let focus = self.camera_position
            + principal * safe_div(self.focus_distance, principal.z.abs());

        let count = (self.ray_count as usize).min(samples.offsets().len());
        let mut sum = Vec4::ZERO;
        for offset in &samples.offsets()[..count] {
            let origin = self.camera_position
                + (self.aperture_basis_x * offset.x + self.aperture_basis_y * offset.y)
                    * self.aperture_radius;
            let mut dir = focus - origin;
            // rescale so the z component matches the principal ray's, keeping the direction
            // of travel even when the focus point lies behind the aperture
            if dir.z != 0.0 {
                dir *= principal.z / dir.z;
            }
            sum += self.trace(Ray::new(origin, dir));
        }
        sum / count as f32
    }

    /// Send one ray through the lens stack and composite it against the background its exit
    /// direction faces.
    fn trace(&self, mut ray: Ray) -> Vec4 {
        self.stack.traverse(&mut ray);
        let color = if ray.dir.z < 0.0 {
            self.environment
                .color(&ray, self.environment_texture.as_deref())
        } else {
            self.user.color(&ray, self.user_texture.as_deref())
        };
        ray.tint * color
    }
}
