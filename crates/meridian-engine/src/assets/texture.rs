use std::path::Path;

use crate::error::StartupError;

/// Tightly packed RGBA8 pixels, first row at the top of `rgba`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decodes an image file into RGBA8.
    ///
    /// With `flip_vertically` the rows are reversed so the first row of the
    /// result is the bottom of the image (texture coordinate v = 0).
    pub fn decode(path: &Path, flip_vertically: bool) -> Result<Self, StartupError> {
        let image = image::open(path).map_err(|source| StartupError::Texture {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if flip_vertically { image.flipv() } else { image };
        let rgba = image.to_rgba8();

        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Two-tone checkerboard with `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32, light: [u8; 4], dark: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut rgba = Vec::with_capacity(rgba_len(size, size));

        for y in 0..size {
            for x in 0..size {
                let texel = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
                rgba.extend_from_slice(&texel);
            }
        }

        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Byte length of a tightly packed RGBA8 image, computed in `usize`.
fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Sampled 2D texture, immutable after upload.
pub struct TextureAsset {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl TextureAsset {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &DecodedImage) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("meridian material texture"),
            size: image.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            image.extent(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("meridian material sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!("uploaded texture {}x{}", image.width, image.height);
        Self {
            _texture: texture,
            view,
            sampler,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: [u8; 4] = [255, 255, 255, 255];
    const B: [u8; 4] = [0, 0, 0, 255];

    fn write_png(name: &str, pixels: &[[u8; 4]], width: u32, height: u32) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("meridian-{}-{name}.png", std::process::id()));
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        let img = image::RgbaImage::from_raw(width, height, raw).unwrap();
        img.save(&path).unwrap();
        path
    }

    // ── decode ────────────────────────────────────────────────────────────

    #[test]
    fn decode_flips_rows() {
        // 1x2: white on top, black below.
        let path = write_png("flip", &[W, B], 1, 2);

        let upright = DecodedImage::decode(&path, false).unwrap();
        let flipped = DecodedImage::decode(&path, true).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((upright.width, upright.height), (1, 2));
        assert_eq!(&upright.rgba[..4], &W);
        assert_eq!(&flipped.rgba[..4], &B);
        assert_eq!(&flipped.rgba[4..], &W);
    }

    #[test]
    fn missing_file_is_texture_error() {
        let err = DecodedImage::decode(Path::new("/definitely/not/here.png"), true).unwrap_err();
        assert!(matches!(err, StartupError::Texture { .. }));
        assert_eq!(err.exit_code(), -4);
    }

    // ── checkerboard ──────────────────────────────────────────────────────

    #[test]
    fn checkerboard_alternates_cells() {
        let img = DecodedImage::checkerboard(4, 2, W, B);
        assert_eq!(img.rgba.len(), 4 * 4 * 4);

        let texel = |x: usize, y: usize| &img.rgba[(y * 4 + x) * 4..][..4];
        assert_eq!(texel(0, 0), &W);
        assert_eq!(texel(1, 1), &W);
        assert_eq!(texel(2, 0), &B);
        assert_eq!(texel(0, 2), &B);
        assert_eq!(texel(3, 3), &W);
    }

    #[test]
    fn checkerboard_clamps_degenerate_sizes() {
        let img = DecodedImage::checkerboard(0, 0, W, B);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.rgba, W.to_vec());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn rgba_len_does_not_wrap_for_large_sides() {
        assert_eq!(rgba_len(3, 2), 24);
        assert_eq!(rgba_len(40_000, 40_000), 6_400_000_000);
    }
}
