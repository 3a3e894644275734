use std::collections::HashMap;

use anyhow::Context;
use image::RgbaImage;

use crate::video::{Dimension, Filter, Position};

/// GPU texture together with the CPU copy it was uploaded from.
///
/// The CPU copy is kept so that color keying can rewrite the alpha channel
/// after loading and upload the result again.
#[derive(Debug)]
pub struct Texture
{
        pub texture: wgpu::Texture,
        pub view: wgpu::TextureView,
        pub image: RgbaImage,
        pub size: Dimension,
        pub bind_groups: HashMap<Filter, wgpu::BindGroup>,
}

/// One sampler per [`Filter`].
#[derive(Debug)]
pub struct Samplers
{
        nearest: wgpu::Sampler,
        bilinear: wgpu::Sampler,
        anisotropic: wgpu::Sampler,
}

impl Samplers
{
        pub fn new(device: &wgpu::Device) -> Self
        {
                Self {
                        nearest: Self::create_sampler(device, "nearest_sampler", wgpu::FilterMode::Nearest, 1),
                        bilinear: Self::create_sampler(device, "bilinear_sampler", wgpu::FilterMode::Linear, 1),
                        anisotropic: Self::create_sampler(
                                device,
                                "anisotropic_sampler",
                                wgpu::FilterMode::Linear,
                                16,
                        ),
                }
        }

        pub fn get(
                &self,
                filter: Filter,
        ) -> &wgpu::Sampler
        {
                match filter
                {
                        Filter::Nearest => &self.nearest,
                        Filter::Bilinear => &self.bilinear,
                        Filter::Anisotropic => &self.anisotropic,
                }
        }

        fn create_sampler(
                device: &wgpu::Device,
                label: &str,
                filter: wgpu::FilterMode,
                anisotropy_clamp: u16,
        ) -> wgpu::Sampler
        {
                device.create_sampler(&wgpu::SamplerDescriptor {
                        label: Some(label),
                        address_mode_u: wgpu::AddressMode::ClampToEdge,
                        address_mode_v: wgpu::AddressMode::ClampToEdge,
                        address_mode_w: wgpu::AddressMode::ClampToEdge,
                        mag_filter: filter,
                        min_filter: filter,
                        // Anisotropic filtering requires every filter to be linear.
                        mipmap_filter: filter,
                        anisotropy_clamp,
                        ..Default::default()
                })
        }
}

impl Texture
{
        /// Create a 1x1 white texture, used for solid rectangle fills.
        pub fn create_white(
                device: &wgpu::Device,
                queue: &wgpu::Queue,
                layout: &wgpu::BindGroupLayout,
                samplers: &Samplers,
        ) -> anyhow::Result<Self>
        {
                let image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));

                Self::from_image(device, queue, image, "white_texture", layout, samplers)
        }

        pub fn from_path(
                device: &wgpu::Device,
                queue: &wgpu::Queue,
                path: &std::path::Path,
                layout: &wgpu::BindGroupLayout,
                samplers: &Samplers,
        ) -> anyhow::Result<Self>
        {
                let img = image::open(path)
                        .with_context(|| format!("Failed to load texture {}", path.display()))?;

                Self::from_image(
                        device,
                        queue,
                        img.to_rgba8(),
                        &path.display().to_string(),
                        layout,
                        samplers,
                )
        }

        pub fn from_image(
                device: &wgpu::Device,
                queue: &wgpu::Queue,
                image: RgbaImage,
                label: &str,
                layout: &wgpu::BindGroupLayout,
                samplers: &Samplers,
        ) -> anyhow::Result<Self>
        {
                let (width, height) = image.dimensions();

                if width == 0 || height == 0
                {
                        anyhow::bail!("Texture {label} has no texels.");
                }

                let max_dim = device.limits().max_texture_dimension_2d;

                if width > max_dim || height > max_dim
                {
                        anyhow::bail!(
                                "Texture {label} is {width}x{height}, the device allows at most {max_dim}."
                        );
                }

                let size = wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                };

                let texture = Self::create_texture(device, label, size);

                Self::write_texture_to_queue(queue, &texture, &image);

                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

                let bind_groups = [Filter::Nearest, Filter::Bilinear, Filter::Anisotropic]
                        .into_iter()
                        .map(|filter| {
                                (
                                        filter,
                                        Self::new_bind_group(device, layout, &view, samplers.get(filter)),
                                )
                        })
                        .collect();

                Ok(Self {
                        texture,
                        view,
                        image,
                        size: Dimension::new(width, height),
                        bind_groups,
                })
        }

        /// Keys out the RGB value found at `position` and uploads the result.
        ///
        /// Returns the number of texels made transparent.
        pub fn color_key_at(
                &mut self,
                queue: &wgpu::Queue,
                position: Position,
        ) -> anyhow::Result<usize>
        {
                let key = key_color_at(&self.image, position)?;

                Ok(self.color_key(queue, key))
        }

        pub fn color_key(
                &mut self,
                queue: &wgpu::Queue,
                key: image::Rgba<u8>,
        ) -> usize
        {
                let keyed = apply_color_key(&mut self.image, key, false);

                Self::write_texture_to_queue(queue, &self.texture, &self.image);

                keyed
        }

        pub fn bind_group(
                &self,
                filter: Filter,
        ) -> Option<&wgpu::BindGroup>
        {
                self.bind_groups.get(&filter)
        }

        fn create_texture(
                device: &wgpu::Device,
                label: &str,
                size: wgpu::Extent3d,
        ) -> wgpu::Texture
        {
                device.create_texture(&wgpu::TextureDescriptor {
                        label: Some(label),
                        size,
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: wgpu::TextureFormat::Rgba8UnormSrgb,
                        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                        view_formats: &[],
                })
        }

        fn write_texture_to_queue(
                queue: &wgpu::Queue,
                texture: &wgpu::Texture,
                rgba: &RgbaImage,
        )
        {
                let (width, height) = rgba.dimensions();

                queue.write_texture(
                        wgpu::TexelCopyTextureInfo {
                                aspect: wgpu::TextureAspect::All,
                                texture,
                                mip_level: 0,
                                origin: wgpu::Origin3d::ZERO,
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

        pub fn new_texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout
        {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        entries: &[
                                wgpu::BindGroupLayoutEntry {
                                        binding: 0,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        ty: wgpu::BindingType::Texture {
                                                multisampled: false,
                                                view_dimension: wgpu::TextureViewDimension::D2,
                                                sample_type: wgpu::TextureSampleType::Float {
                                                        filterable: true,
                                                },
                                        },
                                        count: None,
                                },
                                wgpu::BindGroupLayoutEntry {
                                        binding: 1,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        // This should match the filterable field of the
                                        // corresponding Texture entry above.
                                        ty: wgpu::BindingType::Sampler(
                                                wgpu::SamplerBindingType::Filtering,
                                        ),
                                        count: None,
                                },
                        ],
                        label: Some("texture_bind_group_layout"),
                })
        }

        fn new_bind_group(
                device: &wgpu::Device,
                layout: &wgpu::BindGroupLayout,
                view: &wgpu::TextureView,
                sampler: &wgpu::Sampler,
        ) -> wgpu::BindGroup
        {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout,
                        entries: &[
                                wgpu::BindGroupEntry {
                                        binding: 0,
                                        resource: wgpu::BindingResource::TextureView(view),
                                },
                                wgpu::BindGroupEntry {
                                        binding: 1,
                                        resource: wgpu::BindingResource::Sampler(sampler),
                                },
                        ],
                        label: Some("sprite_bind_group"),
                })
        }
}

/// Reads the key color at `position`, failing when it lies outside the image.
pub fn key_color_at(
        image: &RgbaImage,
        position: Position,
) -> anyhow::Result<image::Rgba<u8>>
{
        let (width, height) = image.dimensions();

        let inside = position.x >= 0
                && position.y >= 0
                && (position.x as u32) < width
                && (position.y as u32) < height;

        if !inside
        {
                anyhow::bail!(
                        "Color key position ({}, {}) is outside the {width}x{height} texture.",
                        position.x,
                        position.y
                );
        }

        Ok(*image.get_pixel(position.x as u32, position.y as u32))
}

/// Turns every texel whose RGB equals the RGB of `key` fully transparent.
///
/// The alpha of `key` is ignored. With `zero_texels` the keyed texels also
/// lose their color, otherwise it is kept so filtering does not bleed a
/// different color into sprite edges. Other texels are untouched.
pub fn apply_color_key(
        image: &mut RgbaImage,
        key: image::Rgba<u8>,
        zero_texels: bool,
) -> usize
{
        let [kr, kg, kb, _] = key.0;

        let mut keyed = 0;

        for pixel in image.pixels_mut()
        {
                let [r, g, b, _] = pixel.0;

                if (r, g, b) == (kr, kg, kb)
                {
                        *pixel = if zero_texels
                        {
                                image::Rgba([0, 0, 0, 0])
                        }
                        else
                        {
                                image::Rgba([r, g, b, 0])
                        };

                        keyed += 1;
                }
        }

        keyed
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn checker() -> RgbaImage
        {
                RgbaImage::from_fn(4, 2, |x, _| {
                        if x % 2 == 0
                        {
                                image::Rgba([255, 0, 255, 255])
                        }
                        else
                        {
                                image::Rgba([10, 20, 30, 200])
                        }
                })
        }

        #[test]
        fn color_key_makes_matching_texels_transparent()
        {
                let mut img = checker();

                let key = key_color_at(&img, Position::new(0, 0)).unwrap();

                let keyed = apply_color_key(&mut img, key, false);

                assert_eq!(keyed, 4);
                assert_eq!(*img.get_pixel(0, 0), image::Rgba([255, 0, 255, 0]));
                assert_eq!(*img.get_pixel(1, 1), image::Rgba([10, 20, 30, 200]));
        }

        #[test]
        fn color_key_ignores_key_alpha()
        {
                let mut img = checker();

                let keyed = apply_color_key(&mut img, image::Rgba([10, 20, 30, 0]), true);

                assert_eq!(keyed, 4);
                assert_eq!(*img.get_pixel(1, 0), image::Rgba([0, 0, 0, 0]));
                assert_eq!(img.get_pixel(2, 1).0[3], 255);
        }

        #[test]
        fn key_position_must_be_inside()
        {
                let img = checker();

                assert!(key_color_at(&img, Position::new(3, 1)).is_ok());
                assert!(key_color_at(&img, Position::new(4, 0)).is_err());
                assert!(key_color_at(&img, Position::new(0, -1)).is_err());
        }
}
