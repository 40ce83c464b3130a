#![doc(html_no_source)]

mod spiralens;
pub use spiralens::Spiralens;

// Reexport all crates
pub use spiralens_background;
pub use spiralens_camera;
pub use spiralens_math;
pub use spiralens_optics;
pub use spiralens_renderer;
pub use spiralens_scene;
pub use spiralens_texture;
