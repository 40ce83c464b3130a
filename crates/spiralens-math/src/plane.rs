use glam::Vec3;

/// Advance `origin` along `dir` to the plane z = `plane_z`, providing that plane lies ahead
/// along the ray's direction of travel. Returns `None` when the plane is behind the ray.
pub fn intersect_z_plane(origin: Vec3, dir: Vec3, plane_z: f32) -> Option<Vec3> {
    let delta_z = plane_z - origin.z;
    if dir.z * delta_z > 0.0 {
        Some(origin + dir / dir.z * delta_z)
    } else {
        None
    }
}

/// Intersect the plane through `plane_center` perpendicular to `axis`. Used for the background
/// plane, which is always treated as reachable.
pub fn intersect_view_plane(origin: Vec3, dir: Vec3, plane_center: Vec3, axis: Vec3) -> Vec3 {
    let denom = dir.dot(axis);
    let t = (plane_center - origin).dot(axis) / denom;
    origin + dir * t
}
