use anyhow::{anyhow, Result};
use glam::{UVec2, Vec2, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgb8Unorm,
}

impl TextureFormat {
    pub fn num_channels(&self) -> usize {
        match self {
            Self::Rgb8Unorm => 3,
            Self::Rgba8Unorm => 4,
        }
    }
}

pub struct TextureCreateDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Box<[u8]>,
}

/// CPU-side 2D image sampler. The background compositor and the live-feed plumbing only know
/// textures through this type and their runtime-reported aspect ratio.
#[derive(Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    format: TextureFormat,
    data: Box<[u8]>,
}

impl Texture {
    pub fn new(create_desc: TextureCreateDesc) -> Self {
        Self {
            width: create_desc.width,
            height: create_desc.height,
            format: create_desc.format,
            data: create_desc.data,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;
        Self::from_image(image)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let image = image::open(path)?;
        Self::from_image(image)
    }

    fn from_image(image: image::DynamicImage) -> Result<Self> {
        match image {
            image::DynamicImage::ImageRgb8(image) => Ok(Self::new(TextureCreateDesc {
                width: image.width(),
                height: image.height(),
                format: TextureFormat::Rgb8Unorm,
                data: image.into_raw().into_boxed_slice(),
            })),
            image::DynamicImage::ImageRgba8(image) => Ok(Self::new(TextureCreateDesc {
                width: image.width(),
                height: image.height(),
                format: TextureFormat::Rgba8Unorm,
                data: image.into_raw().into_boxed_slice(),
            })),
            other => {
                let image = other.to_rgba8();
                if image.width() == 0 || image.height() == 0 {
                    return Err(anyhow!("Empty image"));
                }
                Ok(Self::new(TextureCreateDesc {
                    width: image.width(),
                    height: image.height(),
                    format: TextureFormat::Rgba8Unorm,
                    data: image.into_raw().into_boxed_slice(),
                }))
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn load(&self, id: UVec2) -> Vec4 {
        let pixel_id = (id.y * self.width + id.x) as usize;

        let mut result = Vec4::ONE;
        for i in 0..self.format.num_channels() {
            result[i] = self.data[pixel_id * self.format.num_channels() + i] as f32 / 255.0;
        }
        result
    }

    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let x = (uv.x * self.width as f32).abs();
        let y = (uv.y * self.height as f32).abs();

        let tx = x.fract();
        let ty = y.fract();

        let id00 = UVec2::new((x as u32) % self.width, (y as u32) % self.height);
        let id10 = UVec2::new((x as u32 + 1) % self.width, (y as u32) % self.height);
        let id01 = UVec2::new((x as u32) % self.width, (y as u32 + 1) % self.height);
        let id11 = UVec2::new((x as u32 + 1) % self.width, (y as u32 + 1) % self.height);

        let c00 = self.load(id00);
        let c10 = self.load(id10);
        let c01 = self.load(id01);
        let c11 = self.load(id11);

        bilinear(tx, ty, c00, c10, c01, c11)
    }
}

fn bilinear(tx: f32, ty: f32, c00: Vec4, c10: Vec4, c01: Vec4, c11: Vec4) -> Vec4 {
    let a = c00 * (1.0 - tx) + c10 * tx;
    let b = c01 * (1.0 - tx) + c11 * tx;
    a * (1.0 - ty) + b * ty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2 rgb: red, green / blue, white
        let data: Box<[u8]> = Box::new([
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ]);
        Texture::new(TextureCreateDesc {
            width: 2,
            height: 2,
            format: TextureFormat::Rgb8Unorm,
            data,
        })
    }

    #[test]
    fn load_reads_texels_with_opaque_alpha() {
        let texture = checker();
        assert_eq!(texture.load(UVec2::new(0, 0)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(texture.load(UVec2::new(1, 1)), Vec4::ONE);
    }

    #[test]
    fn sample_at_texel_origin_is_exact() {
        let texture = checker();
        let c = texture.sample(Vec2::ZERO);
        assert!((c - Vec4::new(1.0, 0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn sample_blends_between_texels() {
        let texture = checker();
        // halfway between red (0,0) and green (1,0)
        let c = texture.sample(Vec2::new(0.25, 0.0));
        assert!((c.x - 0.5).abs() < 1e-6);
        assert!((c.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn aspect_ratio_from_dimensions() {
        let texture = Texture::new(TextureCreateDesc {
            width: 4,
            height: 2,
            format: TextureFormat::Rgba8Unorm,
            data: vec![0u8; 4 * 2 * 4].into_boxed_slice(),
        });
        assert!((texture.aspect_ratio() - 2.0).abs() < 1e-6);
    }
}
