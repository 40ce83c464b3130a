use glam::{Vec3, Vec4};

/// Ray state threaded through the lens stack and compositor.
///
/// `dir` is not necessarily unit length; the sign of its z component carries the direction of
/// propagation. `tint` is the multiplicative colour factor accumulated at each interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub tint: Vec4,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            tint: Vec4::ONE,
        }
    }
}
