//! Mutable scene parameters and the commands that change them.
//!
//! The numeric core never sees this state directly: a command is applied to the store between
//! frames, and the renderer snapshots everything into immutable `FrameParameters` before the
//! parallel pixel pass. Applying a command may produce a human-readable status message for the
//! configuration layer.

use std::sync::Arc;

use glam::Vec4;

use spiralens_camera::Camera;
use spiralens_optics::{DisplayMode, FocusingMode, SpiralType};
use spiralens_texture::Texture;

/// Size of the precomputed aperture sample set; ray counts clamp to it.
pub const MAX_RAY_COUNT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensPart {
    One,
    Two,
}

/// Which background the exit rays composite against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundSelection {
    /// Live device feeds: environment-facing behind the scene, user-facing behind the viewer.
    #[default]
    LiveFeeds,
    /// A still image on a plane along the camera's view direction.
    Image,
    /// No image data; exit rays get the fallback colours.
    Solid,
}

/// Everything the configuration layer may mutate between frames.
#[derive(Debug, Clone)]
pub struct SceneSettings {
    pub camera: Camera,

    pub spiral_type: SpiralType,
    pub focusing: FocusingMode,
    pub azimuthal_correction: bool,
    /// Relative rotation angle between the two components, in radians.
    pub rotation: f32,
    /// Axial separation between the two components (overridden by separation-based focusing).
    pub delta_z: f32,
    pub b: f32,
    pub f1: f32,
    pub visible1: bool,
    pub visible2: bool,
    pub clear_aperture_radius: f32,
    pub display_mode: DisplayMode,

    pub autofocus: bool,

    pub background: BackgroundSelection,
    /// Distance of the background planes from the origin.
    pub background_distance: f32,
    pub environment_fov: f32,
    pub user_fov: f32,
    pub environment_feed: Option<Arc<Texture>>,
    pub user_feed: Option<Arc<Texture>>,
    pub image: Option<Arc<Texture>>,
    /// Feed aspect ratios are reported at runtime and may be present before any frame data.
    pub environment_aspect: f32,
    pub user_aspect: f32,
    pub environment_fallback: Vec4,
    pub user_fallback: Vec4,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            spiral_type: SpiralType::Logarithmic,
            focusing: FocusingMode::Plain,
            azimuthal_correction: false,
            rotation: 0.0,
            delta_z: 0.001,
            b: 0.01,
            f1: 0.1,
            visible1: true,
            visible2: true,
            clear_aperture_radius: 5.0,
            display_mode: DisplayMode::Both,
            autofocus: false,
            background: BackgroundSelection::LiveFeeds,
            background_distance: 10.0,
            environment_fov: 68.3,
            user_fov: 67.3,
            environment_feed: None,
            user_feed: None,
            image: None,
            environment_aspect: 4.0 / 3.0,
            user_aspect: 4.0 / 3.0,
            environment_fallback: Vec4::ONE,
            user_fallback: Vec4::new(1.0, 0.0, 0.0, 1.0),
        }
    }
}

impl SceneSettings {
    /// Axial separation actually used this frame. Separation-based focusing derives it from
    /// the rotation angle so that the axial power `delta_z / f1^2` reproduces the rotational
    /// equivalent power `b * rotation / f1`; the derivation only holds for the logarithmic
    /// family (constant local focal length) with non-negative rotation.
    pub fn effective_delta_z(&self) -> f32 {
        if self.focusing == FocusingMode::SeparationBased && self.separation_focusing_valid() {
            self.f1 * self.b * self.rotation
        } else {
            self.delta_z
        }
    }

    pub fn separation_focusing_valid(&self) -> bool {
        self.spiral_type == SpiralType::Logarithmic && self.rotation >= 0.0
    }

    fn separation_warning(&self) -> Option<String> {
        if self.focusing == FocusingMode::SeparationBased && !self.separation_focusing_valid() {
            let message = format!(
                "Separation-based focusing requires a logarithmic spiral with non-negative \
                 rotation (got {:?}, rotation {:.4} rad); keeping delta z = {}",
                self.spiral_type, self.rotation, self.delta_z
            );
            log::warn!("{message}");
            Some(message)
        } else {
            None
        }
    }

    /// Apply one configuration command; returns a status message when there is something to
    /// tell the user.
    pub fn apply(&mut self, command: SceneCommand) -> Option<String> {
        match command {
            SceneCommand::SetSpiralType(spiral_type) => {
                self.spiral_type = spiral_type;
                self.separation_warning()
            }
            SceneCommand::SetFocusingMode(focusing) => {
                self.focusing = focusing;
                self.separation_warning()
            }
            SceneCommand::SetRotation(rotation) => {
                self.rotation = rotation;
                self.separation_warning()
            }
            SceneCommand::SetDeltaZ(delta_z) => {
                self.delta_z = delta_z;
                None
            }
            SceneCommand::SetWindingParameter(b) => {
                self.b = b;
                None
            }
            SceneCommand::SetFocalScale(f1) => {
                self.f1 = f1;
                None
            }
            SceneCommand::SetVisible { part, visible } => {
                match part {
                    LensPart::One => self.visible1 = visible,
                    LensPart::Two => self.visible2 = visible,
                }
                None
            }
            SceneCommand::SetClearApertureRadius(radius) => {
                self.clear_aperture_radius = radius;
                None
            }
            SceneCommand::SetDisplayMode(display_mode) => {
                self.display_mode = display_mode;
                None
            }
            SceneCommand::SetAzimuthalCorrection(on) => {
                self.azimuthal_correction = on;
                None
            }
            SceneCommand::SetApertureRadius(radius) => {
                self.camera.set_aperture_radius(radius);
                None
            }
            SceneCommand::SetFocusDistance(distance) => {
                self.camera.set_focus_distance(distance);
                None
            }
            SceneCommand::SetAutofocus(on) => {
                self.autofocus = on;
                None
            }
            SceneCommand::SetRayCount(count) => {
                let clamped = count.clamp(1, MAX_RAY_COUNT);
                self.camera.set_ray_count(clamped);
                (clamped != count)
                    .then(|| format!("Ray count clamped to {clamped} (requested {count})"))
            }
            SceneCommand::SetScreenFov(fov) => {
                self.camera.set_fov(fov);
                None
            }
            SceneCommand::SetBackground(background) => {
                self.background = background;
                None
            }
            SceneCommand::SetBackgroundDistance(distance) => {
                self.background_distance = distance;
                None
            }
            SceneCommand::SetEnvironmentFov(fov) => {
                self.environment_fov = fov;
                None
            }
            SceneCommand::SetUserFov(fov) => {
                self.user_fov = fov;
                None
            }
            SceneCommand::PointForward => {
                self.camera.point_forward();
                Some("Pointing camera forwards (in -z direction)".to_owned())
            }
        }
    }

    /// Install a new still image and remember its aspect ratio.
    pub fn set_image(&mut self, image: Arc<Texture>) {
        self.image = Some(image);
    }

    /// Install a live-feed texture along with its runtime-reported aspect ratio.
    pub fn set_environment_feed(&mut self, feed: Arc<Texture>) {
        self.environment_aspect = feed.aspect_ratio();
        self.environment_feed = Some(feed);
    }

    pub fn set_user_feed(&mut self, feed: Arc<Texture>) {
        self.user_aspect = feed.aspect_ratio();
        self.user_feed = Some(feed);
    }
}

/// Configuration commands, applied to the store between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    SetSpiralType(SpiralType),
    SetFocusingMode(FocusingMode),
    /// Relative rotation between the components, radians.
    SetRotation(f32),
    SetDeltaZ(f32),
    SetWindingParameter(f32),
    SetFocalScale(f32),
    SetVisible { part: LensPart, visible: bool },
    SetClearApertureRadius(f32),
    SetDisplayMode(DisplayMode),
    SetAzimuthalCorrection(bool),
    SetApertureRadius(f32),
    SetFocusDistance(f32),
    SetAutofocus(bool),
    SetRayCount(u32),
    SetScreenFov(f32),
    SetBackground(BackgroundSelection),
    SetBackgroundDistance(f32),
    SetEnvironmentFov(f32),
    SetUserFov(f32),
    PointForward,
}
