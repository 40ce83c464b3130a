//! Background plane geometry and the exit-ray compositor.
//!
//! After leaving the lens stack a ray is intersected with a background surface: either one of
//! the two legacy video-feed planes (fixed z, perpendicular to the optical axis) or an image
//! plane a fixed distance along the camera's view direction. Within the image window the
//! corresponding texel is sampled; outside it a per-surface fallback colour is returned, so
//! "outside frame" regions stay visually distinguishable.

use glam::{Vec2, Vec3, Vec4};

use spiralens_math::{intersect_view_plane, intersect_z_plane, Ray};
use spiralens_texture::Texture;

/// Half width/height of the image window seen from the origin at the given distance, for a
/// horizontal field of view (degrees) and an image aspect ratio. The FOV applies to the longer
/// image axis, so landscape and portrait feeds behave symmetrically.
pub fn half_extents(fov: f32, aspect_ratio: f32, distance: f32) -> Vec2 {
    let tan_half = (0.5 * fov.to_radians()).tan();
    let tangents = if aspect_ratio > 1.0 {
        Vec2::new(tan_half, tan_half / aspect_ratio)
    } else {
        Vec2::new(tan_half * aspect_ratio, tan_half)
    };
    tangents * distance
}

/// Plane carrying a background image, with the image's own basis vectors.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundSurface {
    pub center: Vec3,
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub half_width: f32,
    pub half_height: f32,
    /// Legacy feed planes only accept intersections ahead of the ray; the view-aligned image
    /// plane is always treated as reachable.
    pub forward_only: bool,
    pub fallback: Vec4,
}

impl BackgroundSurface {
    /// Legacy video-feed plane at a fixed z, image axes aligned with x and y.
    pub fn fixed_z(plane_z: f32, half_width: f32, half_height: f32, fallback: Vec4) -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, plane_z),
            basis_x: Vec3::X,
            basis_y: Vec3::Y,
            half_width,
            half_height,
            forward_only: true,
            fallback,
        }
    }

    /// Image plane a fixed distance along the camera's view direction, perpendicular to it.
    /// The image keeps its own basis, so it stays upright when the camera moves off axis.
    pub fn along_view(
        camera_position: Vec3,
        view_direction: Vec3,
        distance: f32,
        half_width: f32,
        half_height: f32,
        fallback: Vec4,
    ) -> Self {
        let basis_x = if view_direction.x == 0.0 && view_direction.y == 0.0 {
            view_direction.cross(Vec3::X).normalize()
        } else {
            view_direction.cross(Vec3::Z).normalize()
        };
        let basis_y = view_direction.cross(basis_x).normalize();
        Self {
            center: camera_position + view_direction * distance,
            basis_x,
            basis_y,
            half_width,
            half_height,
            forward_only: false,
            fallback,
        }
    }

    fn axis(&self) -> Vec3 {
        self.basis_x.cross(self.basis_y)
    }

    /// Colour seen by the exit ray: a texel of `texture` within the image window, the fallback
    /// colour outside it (or when no texture is available).
    pub fn color(&self, ray: &Ray, texture: Option<&Texture>) -> Vec4 {
        let p = if self.forward_only {
            match intersect_z_plane(ray.origin, ray.dir, self.center.z) {
                Some(p) => p,
                None => return self.fallback,
            }
        } else {
            intersect_view_plane(ray.origin, ray.dir, self.center, self.axis())
        };

        let local = p - self.center;
        let uv = self.window_uv(local.dot(self.basis_x), local.dot(self.basis_y));
        match (uv, texture) {
            (Some(uv), Some(texture)) => texture.sample(uv),
            _ => self.fallback,
        }
    }

    /// Normalized UV of a point given in the image's local basis, or `None` outside the
    /// window.
    pub fn window_uv(&self, x: f32, y: f32) -> Option<Vec2> {
        (x.abs() < self.half_width && y.abs() < self.half_height).then(|| {
            Vec2::new(
                0.5 + 0.5 * x / self.half_width,
                0.5 + 0.5 * y / self.half_height,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiralens_texture::{TextureCreateDesc, TextureFormat};

    const FALLBACK: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);

    fn flat(color: [u8; 3]) -> Texture {
        Texture::new(TextureCreateDesc {
            width: 2,
            height: 2,
            format: TextureFormat::Rgb8Unorm,
            data: color.repeat(4).into_boxed_slice(),
        })
    }

    #[test]
    fn window_mapping() {
        let surface = BackgroundSurface::fixed_z(-10.0, 1.0, 1.0, FALLBACK);
        let uv = surface.window_uv(0.5, 0.5).expect("inside the window");
        assert!((uv - Vec2::new(0.75, 0.75)).length() < 1e-6);
        assert!(surface.window_uv(2.0, 0.0).is_none());
    }

    #[test]
    fn outside_window_returns_fallback() {
        let surface = BackgroundSurface::fixed_z(-10.0, 1.0, 1.0, FALLBACK);
        let texture = flat([0, 255, 0]);
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(surface.color(&ray, Some(&texture)), FALLBACK);
    }

    #[test]
    fn inside_window_samples_texture() {
        let surface = BackgroundSurface::fixed_z(-10.0, 1.0, 1.0, FALLBACK);
        let texture = flat([0, 255, 0]);
        let ray = Ray::new(Vec3::new(0.3, -0.2, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let c = surface.color(&ray, Some(&texture));
        assert!((c - Vec4::new(0.0, 1.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn legacy_plane_behind_ray_is_fallback() {
        let surface = BackgroundSurface::fixed_z(-10.0, 1.0, 1.0, FALLBACK);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(surface.color(&ray, None), FALLBACK);
    }

    #[test]
    fn view_plane_follows_the_camera() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let view = Vec3::NEG_Z;
        let surface = BackgroundSurface::along_view(camera, view, 20.0, 2.0, 2.0, FALLBACK);
        assert!((surface.center - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-6);

        // a ray straight down the axis hits the image centre
        let texture = flat([255, 255, 255]);
        let ray = Ray::new(camera, view);
        let c = surface.color(&ray, Some(&texture));
        assert!((c - Vec4::ONE).length() < 1e-5);
    }

    #[test]
    fn half_extents_follow_orientation() {
        let landscape = half_extents(90.0, 2.0, 10.0);
        assert!((landscape.x - 10.0).abs() < 1e-4);
        assert!((landscape.y - 5.0).abs() < 1e-4);

        let portrait = half_extents(90.0, 0.5, 10.0);
        assert!((portrait.x - 5.0).abs() < 1e-4);
        assert!((portrait.y - 10.0).abs() < 1e-4);
    }
}
