use glam::{Vec2, Vec3};

/// Virtual camera with a finite circular aperture.
///
/// `fov` is the *larger* of the horizontal and vertical fields of view (in degrees); which one
/// it is depends on the aspect ratio, so landscape and portrait screens show the same extent
/// along their longer axis.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    view_direction: Vec3,
    fov: f32,
    aspect_ratio: f32,
    aperture_radius: f32,
    focus_distance: f32,
    ray_count: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            view_direction: Vec3::NEG_Z,
            fov: 68.0,
            aspect_ratio: 1.0,
            aperture_radius: 0.0,
            focus_distance: 1e8,
            ray_count: 1,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, view_direction: Vec3, fov: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            view_direction: view_direction.normalize(),
            fov,
            aspect_ratio,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    pub fn set_view_direction(&mut self, view_direction: Vec3) {
        self.view_direction = view_direction.normalize();
    }

    /// Point the camera forwards, in the -z direction, keeping its distance from the origin.
    pub fn point_forward(&mut self) {
        let r = self.position.length();
        self.position = Vec3::new(0.0, 0.0, r);
        self.view_direction = Vec3::NEG_Z;
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn aperture_radius(&self) -> f32 {
        self.aperture_radius
    }

    pub fn set_aperture_radius(&mut self, aperture_radius: f32) {
        self.aperture_radius = aperture_radius;
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }

    pub fn set_focus_distance(&mut self, focus_distance: f32) {
        self.focus_distance = focus_distance;
    }

    pub fn ray_count(&self) -> u32 {
        self.ray_count
    }

    pub fn set_ray_count(&mut self, ray_count: u32) {
        self.ray_count = ray_count.max(1);
    }

    /// Tangents of the half horizontal and half vertical fields of view.
    pub fn half_fov_tangents(&self) -> Vec2 {
        let tan_half = (0.5 * self.fov.to_radians()).tan();
        if self.aspect_ratio > 1.0 {
            Vec2::new(tan_half, tan_half / self.aspect_ratio)
        } else {
            Vec2::new(tan_half * self.aspect_ratio, tan_half)
        }
    }

    /// Orthonormal basis spanning the aperture plane; both vectors are orthogonal to the view
    /// direction.
    pub fn aperture_basis(&self) -> (Vec3, Vec3) {
        let view = self.view_direction;
        let basis_x = if view.x == 0.0 && view.y == 0.0 {
            view.cross(Vec3::X).normalize()
        } else {
            view.cross(Vec3::Z).normalize()
        };
        let basis_y = view.cross(basis_x).normalize();
        (basis_x, basis_y)
    }

    /// Direction of the un-jittered primary ray through the given normalized device coordinate
    /// (both components in [-1, 1]). Not unit length.
    pub fn pixel_direction(&self, ndc: Vec2) -> Vec3 {
        let tangents = self.half_fov_tangents();
        let (basis_x, basis_y) = self.aperture_basis();
        self.view_direction + basis_x * (tangents.x * ndc.x) + basis_y * (tangents.y * ndc.y)
    }
}
