use glam::{Vec2, Vec3};

use spiralens_math::{intersect_z_plane, sqr, Ray};

use crate::component::{SpiralLensComponent, INTERACTION_TINT};

/// Which part of the lens stack takes part in the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Both,
    Part1,
    Part2,
    /// Substitute the whole stack by a single ideal thin lens of the equivalent focal length.
    Equivalent,
    None,
}

/// Equivalent focal length of the two-component stack: per the Alvarez relation the combined
/// focal power is proportional to the product of winding parameter and relative rotation,
/// `1/F = b * delta_phi / f1`. Infinite at zero relative rotation.
pub fn equivalent_focal_length(b: f32, f1: f32, delta_phi: f32) -> f32 {
    let power = b * delta_phi / f1;
    if power == 0.0 {
        f32::INFINITY
    } else {
        1.0 / power
    }
}

/// Ideal-thin-lens deflection: `pixy` is the transverse vector from the principal point to the
/// intersection. The direction is renormalised so the magnitude of its z component is 1,
/// keeping its sign.
pub fn ideal_lens_deflect(dir: Vec3, pixy: Vec2, focal_length: f32) -> Vec3 {
    let d = dir / dir.z.abs();
    if focal_length.is_finite() {
        Vec3::new(d.x - pixy.x / focal_length, d.y - pixy.y / focal_length, d.z)
    } else {
        d
    }
}

/// The bidirectional two-component stack plus its ideal-lens substitution.
#[derive(Debug, Clone, Copy)]
pub struct LensStack {
    pub component1: SpiralLensComponent,
    pub component2: SpiralLensComponent,
    /// Circular clear aperture shared by both components.
    pub clear_aperture_radius: f32,
    pub display_mode: DisplayMode,
    pub equivalent_focal_length: f32,
}

impl LensStack {
    /// Traverse the stack in the order the ray's direction of travel dictates: travelling
    /// toward decreasing z it meets component 1 first, toward increasing z component 2 first.
    pub fn traverse(&self, ray: &mut Ray) {
        let show1 = self.component1.visible
            && matches!(self.display_mode, DisplayMode::Both | DisplayMode::Part1);
        let show2 = self.component2.visible
            && matches!(self.display_mode, DisplayMode::Both | DisplayMode::Part2);

        match self.display_mode {
            DisplayMode::None => {}
            DisplayMode::Equivalent => self.pass_through_equivalent(ray),
            _ => {
                if ray.dir.z < 0.0 {
                    if show1 {
                        self.component1.pass_through(ray, self.clear_aperture_radius);
                    }
                    if show2 {
                        self.component2.pass_through(ray, self.clear_aperture_radius);
                    }
                } else {
                    if show2 {
                        self.component2.pass_through(ray, self.clear_aperture_radius);
                    }
                    if show1 {
                        self.component1.pass_through(ray, self.clear_aperture_radius);
                    }
                }
            }
        }
    }

    /// One ideal thin lens at z = 0 in place of the whole stack, for validation rendering.
    fn pass_through_equivalent(&self, ray: &mut Ray) {
        let Some(p) = intersect_z_plane(ray.origin, ray.dir, 0.0) else {
            return;
        };
        ray.origin = p;

        let pixy = Vec2::new(p.x, p.y);
        if pixy.length_squared() >= sqr(self.clear_aperture_radius) {
            return;
        }

        ray.dir = ideal_lens_deflect(ray.dir, pixy, self.equivalent_focal_length);
        ray.tint *= INTERACTION_TINT;
    }
}
