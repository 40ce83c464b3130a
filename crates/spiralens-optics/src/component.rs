use glam::{Vec2, Vec3, Vec4};

use spiralens_math::{intersect_z_plane, safe_sqrt, sqr, Ray};

use crate::spiral::{phase_gradient, FocusingMode, SpiralType};

/// Colour factor applied at each refractive interaction, modelling coating loss.
pub const INTERACTION_TINT: Vec4 = Vec4::new(0.9, 0.9, 0.99, 1.0);

/// One spiral Fresnel phase element in a z plane.
#[derive(Debug, Clone, Copy)]
pub struct SpiralLensComponent {
    pub center: Vec3,
    /// Rotation around the z axis, in radians.
    pub rotation: f32,
    pub spiral_type: SpiralType,
    /// Winding parameter of the spiral.
    pub b: f32,
    /// Focal scale: focal length of the cylindrical profile (log spiral everywhere,
    /// Archimedean at r = 1, hyperbolic at phi = 1).
    pub f1: f32,
    pub focusing: FocusingMode,
    pub azimuthal_correction: bool,
    pub visible: bool,
}

impl SpiralLensComponent {
    /// Pass the ray through (or around) this component. The ray only deflects when the plane
    /// lies ahead and the intersection falls inside the circular clear aperture; otherwise it
    /// passes through unchanged (though a forward intersection still advances the origin).
    pub fn pass_through(&self, ray: &mut Ray, clear_aperture_radius: f32) {
        let Some(p) = intersect_z_plane(ray.origin, ray.dir, self.center.z) else {
            return;
        };
        ray.origin = p;

        let local = Vec2::new(p.x - self.center.x, p.y - self.center.y);
        if local.length_squared() >= sqr(clear_aperture_radius) {
            return;
        }

        // evaluate the spiral in its own frame, then bring the gradient back
        let spiral_frame = rotate(local, self.rotation);
        let Some(gradient) = phase_gradient(
            self.spiral_type,
            self.focusing,
            spiral_frame,
            self.b,
            self.f1,
            self.azimuthal_correction,
        ) else {
            return;
        };
        let gradient = rotate(gradient, -self.rotation);

        let normalized = ray.dir / ray.dir.length();
        let transverse = Vec2::new(normalized.x, normalized.y) + gradient;
        ray.dir = Vec3::new(
            transverse.x,
            transverse.y,
            ray.dir.z.signum() * safe_sqrt(1.0 - transverse.length_squared()),
        );
        ray.tint *= INTERACTION_TINT;
    }
}

/// Rotate the 2D vector `v` by the angle `alpha` (in radians).
pub fn rotate(v: Vec2, alpha: f32) -> Vec2 {
    let (s, c) = alpha.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component() -> SpiralLensComponent {
        SpiralLensComponent {
            center: Vec3::ZERO,
            rotation: 0.0,
            spiral_type: SpiralType::Logarithmic,
            b: 0.02,
            f1: 0.1,
            focusing: FocusingMode::Plain,
            azimuthal_correction: false,
            visible: true,
        }
    }

    #[test]
    fn backward_plane_leaves_ray_untouched() {
        let component = component();
        let mut ray = Ray::new(Vec3::new(0.2, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));
        let before = ray;
        component.pass_through(&mut ray, 5.0);
        assert_eq!(ray, before);
    }

    #[test]
    fn outside_clear_aperture_passes_unchanged() {
        let component = component();
        let mut ray = Ray::new(Vec3::new(7.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        component.pass_through(&mut ray, 5.0);
        assert_eq!(ray.dir, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray.tint, Vec4::ONE);
        // the origin still advances to the component plane
        assert_eq!(ray.origin.z, 0.0);
    }

    #[test]
    fn deflection_keeps_unit_length_and_z_sign() {
        let component = component();
        let mut ray = Ray::new(Vec3::new(1.1, 0.4, 1.0), Vec3::new(0.1, -0.05, -1.0));
        component.pass_through(&mut ray, 5.0);
        assert!((ray.dir.length() - 1.0).abs() < 1e-5);
        assert!(ray.dir.z < 0.0);
        assert_eq!(ray.tint, INTERACTION_TINT);
    }

    #[test]
    fn rotating_component_rotates_deflection() {
        // evaluating a rotated component at a counter-rotated point must give the same
        // gradient, rotated
        let alpha = 0.7;
        let mut rotated = component();
        rotated.rotation = alpha;
        let plain = component();

        let p = Vec2::new(0.9, 0.3);
        let mut ray_a = Ray::new(Vec3::new(p.x, p.y, 1.0), Vec3::new(0.0, 0.0, -1.0));
        rotated.pass_through(&mut ray_a, 5.0);

        let q = rotate(p, alpha);
        let mut ray_b = Ray::new(Vec3::new(q.x, q.y, 1.0), Vec3::new(0.0, 0.0, -1.0));
        plain.pass_through(&mut ray_b, 5.0);

        let deflection_a = Vec2::new(ray_a.dir.x, ray_a.dir.y);
        let deflection_b = rotate(Vec2::new(ray_b.dir.x, ray_b.dir.y), -alpha);
        assert!((deflection_a - deflection_b).length() < 1e-5);
    }
}
