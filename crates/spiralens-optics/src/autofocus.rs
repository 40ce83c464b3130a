use glam::Vec3;

/// Focus distance derived from the thin-lens imaging equation, solved once per frame before
/// the parallel pixel pass.
///
/// The equivalent lens sits with its principal point at the coordinate origin. The background
/// centre is imaged with magnification `m = F / (F - o)`, where `o` is the signed distance of
/// the background centre along the view axis; the focus distance is the projection of the
/// camera-to-image vector onto the view axis. An infinite focal length images at unit
/// magnification, which reduces to focusing on the background plane itself.
pub fn autofocus_distance(
    camera_position: Vec3,
    view_direction: Vec3,
    equivalent_focal_length: f32,
    background_center: Vec3,
) -> f32 {
    let magnification = if equivalent_focal_length.is_finite() {
        let object_distance = background_center.dot(view_direction);
        let denom = equivalent_focal_length - object_distance;
        if denom.abs() < 1e-12 {
            // object at the focal plane images at infinity
            return 1e10;
        }
        equivalent_focal_length / denom
    } else {
        1.0
    };

    let image_point = background_center * magnification;
    (image_point - camera_position).dot(view_direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_focal_length_focuses_on_background() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let view = Vec3::NEG_Z;
        let background = camera + view * 20.0;
        let d = autofocus_distance(camera, view, f32::INFINITY, background);
        assert!((d - 20.0).abs() < 1e-4);
    }

    #[test]
    fn finite_lens_pulls_focus_to_the_image() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let view = Vec3::NEG_Z;
        let background = Vec3::new(0.0, 0.0, -10.0); // o = 10 beyond the lens
        let f = 20.0;
        // m = 20 / (20 - 10) = 2; image at (0, 0, -20), i.e. 30 in front of the camera
        let d = autofocus_distance(camera, view, f, background);
        assert!((d - 30.0).abs() < 1e-3);
    }

    #[test]
    fn object_at_focal_plane_images_far_away() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let view = Vec3::NEG_Z;
        let background = Vec3::new(0.0, 0.0, -15.0);
        let d = autofocus_distance(camera, view, 15.0, background);
        assert!(d.is_finite());
        assert!(d > 1e6);
    }

    #[test]
    fn stable_across_extreme_focal_lengths() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        let view = Vec3::NEG_Z;
        let background = Vec3::new(0.0, 0.0, -10.0);
        for f in [0.5_f32, 1.0, 1e4, 1e10] {
            let d = autofocus_distance(camera, view, f, background);
            assert!(d.is_finite(), "f = {f} produced {d}");
        }
        // very large focal lengths converge to the infinite-lens answer
        let d_large = autofocus_distance(camera, view, 1e10, background);
        let d_inf = autofocus_distance(camera, view, f32::INFINITY, background);
        assert!((d_large - d_inf).abs() < 1e-2);
    }
}
