use std::path::Path;

/// Texel used when an image cannot be read.
const FALLBACK_TEXEL: [u8; 4] = [128, 128, 128, 255];
/// Specular maps default to black so untextured meshes stay matte.
const FALLBACK_SPECULAR: [u8; 4] = [0, 0, 0, 255];

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixels {
    pub fn solid(texel: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: texel.to_vec(),
        }
    }

    /// Read an image file, logging and returning `None` on failure.
    pub fn load(path: &Path) -> Option<Self> {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                Some(Self {
                    width: rgba.width(),
                    height: rgba.height(),
                    rgba: rgba.into_raw(),
                })
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "texture failed to load: {e}");
                None
            }
        }
    }
}

/// Six equally-sized faces for a cubemap.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeFaces {
    pub size: u32,
    pub faces: Vec<Vec<u8>>,
}

impl CubeFaces {
    /// Load faces in layer order. Faces that fail to load, or whose size
    /// disagrees with the first good face, are filled with the fallback texel.
    pub fn load(paths: &[impl AsRef<Path>; 6]) -> Self {
        let loaded: Vec<Option<Pixels>> = paths
            .iter()
            .map(|p| Pixels::load(p.as_ref()))
            .map(|p| p.filter(|p| p.width == p.height))
            .collect();
        let size = loaded
            .iter()
            .flatten()
            .map(|p| p.width)
            .next()
            .unwrap_or(1);

        let faces = loaded
            .into_iter()
            .zip(paths.iter())
            .map(|(face, path)| match face {
                Some(p) if p.width == size => p.rgba,
                _ => {
                    tracing::warn!(
                        path = %path.as_ref().display(),
                        "cubemap face replaced with fallback"
                    );
                    FALLBACK_TEXEL.repeat((size * size) as usize)
                }
            })
            .collect();
        Self { size, faces }
    }
}

/// A sampled 2D texture.
pub struct Texture {
    pub view: wgpu::TextureView,
}

impl Texture {
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        pixels: &Pixels,
        format: wgpu::TextureFormat,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        write_layer(queue, &texture, 0, pixels.width, pixels.height, &pixels.rgba);
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }

    /// Load a texture, falling back to a 1x1 texel when the file is missing.
    pub fn load_or_fallback(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: Option<&Path>,
        kind: TextureKind,
    ) -> Self {
        let pixels = path
            .and_then(Pixels::load)
            .unwrap_or_else(|| Pixels::solid(kind.fallback()));
        let label = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "fallback_texture".to_string());
        Self::from_pixels(device, queue, &label, &pixels, kind.format())
    }

    pub fn cubemap(device: &wgpu::Device, queue: &wgpu::Queue, faces: &CubeFaces) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("skybox_cubemap"),
            size: wgpu::Extent3d {
                width: faces.size,
                height: faces.size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (layer, rgba) in faces.faces.iter().enumerate() {
            write_layer(queue, &texture, layer as u32, faces.size, faces.size, rgba);
        }
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("skybox_cubemap_view"),
                dimension: Some(wgpu::TextureViewDimension::Cube),
                ..Default::default()
            }),
        }
    }
}

/// What a material texture is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureKind::Diffuse => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureKind::Specular => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    pub fn fallback(self) -> [u8; 4] {
        match self {
            TextureKind::Diffuse => FALLBACK_TEXEL,
            TextureKind::Specular => FALLBACK_SPECULAR,
        }
    }
}

fn write_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    layer: u32,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_yields_none() {
        assert!(Pixels::load(Path::new("no/such/texture.png")).is_none());
    }

    #[test]
    fn missing_cube_faces_fall_back() {
        let paths = ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"];
        let cube = CubeFaces::load(&paths);
        assert_eq!(cube.size, 1);
        assert_eq!(cube.faces.len(), 6);
        assert!(cube.faces.iter().all(|f| f == &FALLBACK_TEXEL.to_vec()));
    }

    #[test]
    fn cube_face_size_taken_from_first_good_face() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
            .save(&good)
            .unwrap();
        let missing = dir.path().join("missing.png");
        let paths = [&missing, &good, &good, &good, &good, &good];

        let cube = CubeFaces::load(&paths);
        assert_eq!(cube.size, 2);
        assert_eq!(cube.faces[0].len(), 16);
        assert_eq!(&cube.faces[0][..4], &FALLBACK_TEXEL);
        assert_eq!(&cube.faces[1][..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn specular_fallback_is_black() {
        assert_eq!(TextureKind::Specular.fallback(), [0, 0, 0, 255]);
        assert_eq!(Pixels::solid([1, 2, 3, 4]).rgba, vec![1, 2, 3, 4]);
    }
}
