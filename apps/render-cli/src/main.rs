use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use spiralens::spiralens_optics::{DisplayMode, FocusingMode, SpiralType};
use spiralens::spiralens_renderer::{FrameParameters, Renderer};
use spiralens::spiralens_scene::{BackgroundSelection, SceneCommand, SceneSettings};
use spiralens::spiralens_texture::Texture;
use spiralens::Spiralens;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpiralFamily {
    Logarithmic,
    Archimedean,
    Hyperbolic,
}

impl From<SpiralFamily> for SpiralType {
    fn from(family: SpiralFamily) -> Self {
        match family {
            SpiralFamily::Logarithmic => Self::Logarithmic,
            SpiralFamily::Archimedean => Self::Archimedean,
            SpiralFamily::Hyperbolic => Self::Hyperbolic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Focusing {
    Plain,
    WindingCompensated,
    SeparationBased,
}

impl From<Focusing> for FocusingMode {
    fn from(focusing: Focusing) -> Self {
        match focusing {
            Focusing::Plain => Self::Plain,
            Focusing::WindingCompensated => Self::WindingCompensated,
            Focusing::SeparationBased => Self::SeparationBased,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Display {
    Both,
    Part1,
    Part2,
    Equivalent,
    None,
}

impl From<Display> for DisplayMode {
    fn from(display: Display) -> Self {
        match display {
            Display::Both => Self::Both,
            Display::Part1 => Self::Part1,
            Display::Part2 => Self::Part2,
            Display::Equivalent => Self::Equivalent,
            Display::None => Self::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output image path (RGBA png)
    #[arg(long, default_value = "spiralens.png")]
    output: String,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 960)]
    height: u32,

    /// Background still image; the backdrop is a solid colour when omitted
    #[arg(long)]
    image: Option<String>,

    #[arg(long, value_enum, default_value_t = SpiralFamily::Logarithmic)]
    spiral_type: SpiralFamily,

    #[arg(long, value_enum, default_value_t = Focusing::Plain)]
    focusing: Focusing,

    #[arg(long, value_enum, default_value_t = Display::Both)]
    display: Display,

    /// Winding parameter of the spiral
    #[arg(long, default_value_t = 0.01)]
    winding_parameter: f32,

    /// Focal scale of the cylindrical profile
    #[arg(long, default_value_t = 0.1)]
    focal_scale: f32,

    /// Relative rotation between the two components, in degrees
    #[arg(long, default_value_t = 10.0)]
    rotation: f32,

    /// Axial separation between the two components
    #[arg(long, default_value_t = 0.001)]
    delta_z: f32,

    #[arg(long, default_value_t = false)]
    azimuthal_correction: bool,

    #[arg(long, default_value_t = 5.0)]
    clear_aperture_radius: f32,

    /// Camera aperture radius; zero renders a pinhole image
    #[arg(long, default_value_t = 0.0)]
    aperture_radius: f32,

    /// Camera focus distance; ignored under --autofocus
    #[arg(long)]
    focus_distance: Option<f32>,

    /// Focus on the image of the background centre formed by the equivalent lens
    #[arg(long, default_value_t = false)]
    autofocus: bool,

    /// Rays per pixel for depth-of-field rendering
    #[arg(long, default_value_t = 1)]
    ray_count: u32,

    /// Field of view along the larger screen axis, in degrees
    #[arg(long, default_value_t = 68.0)]
    fov: f32,

    /// Distance of the background plane from the origin
    #[arg(long, default_value_t = 10.0)]
    background_distance: f32,
}

fn apply(scene: &mut SceneSettings, command: SceneCommand) {
    if let Some(status) = scene.apply(command) {
        log::info!("{status}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _spiralens = Spiralens::new("render-cli");

    let mut scene = SceneSettings::default();
    scene
        .camera
        .set_aspect_ratio(args.width as f32 / args.height as f32);

    apply(&mut scene, SceneCommand::SetSpiralType(args.spiral_type.into()));
    apply(&mut scene, SceneCommand::SetFocusingMode(args.focusing.into()));
    apply(&mut scene, SceneCommand::SetRotation(args.rotation.to_radians()));
    apply(&mut scene, SceneCommand::SetDeltaZ(args.delta_z));
    apply(&mut scene, SceneCommand::SetWindingParameter(args.winding_parameter));
    apply(&mut scene, SceneCommand::SetFocalScale(args.focal_scale));
    apply(&mut scene, SceneCommand::SetDisplayMode(args.display.into()));
    apply(&mut scene, SceneCommand::SetAzimuthalCorrection(args.azimuthal_correction));
    apply(&mut scene, SceneCommand::SetClearApertureRadius(args.clear_aperture_radius));
    apply(&mut scene, SceneCommand::SetApertureRadius(args.aperture_radius));
    apply(&mut scene, SceneCommand::SetAutofocus(args.autofocus));
    apply(&mut scene, SceneCommand::SetRayCount(args.ray_count));
    apply(&mut scene, SceneCommand::SetScreenFov(args.fov));
    apply(&mut scene, SceneCommand::SetBackgroundDistance(args.background_distance));
    if let Some(focus_distance) = args.focus_distance {
        apply(&mut scene, SceneCommand::SetFocusDistance(focus_distance));
    }

    if let Some(path) = &args.image {
        scene.set_image(Arc::new(Texture::from_file(path)?));
        apply(&mut scene, SceneCommand::SetBackground(BackgroundSelection::Image));
    } else {
        apply(&mut scene, SceneCommand::SetBackground(BackgroundSelection::Solid));
    }

    let params = FrameParameters::derive(&scene);
    let mut renderer = Renderer::new();
    let pixels = renderer.render(args.width, args.height, &params);

    image::save_buffer(
        &args.output,
        pixels,
        args.width,
        args.height,
        image::ColorType::Rgba8,
    )?;
    log::info!(
        "Wrote {}x{} frame to {} (focus distance {})",
        args.width,
        args.height,
        args.output,
        params.focus_distance
    );

    Ok(())
}
