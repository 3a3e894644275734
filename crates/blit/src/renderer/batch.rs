use std::ops::Range;

use crate::video::{Color, Dimension, Filter, Rect, TextureId};

/// Sprite vertex.
///
/// Uses C-compatible memory layout (`#[repr(C)]`)
/// so it can be safely shared with GPU graphics APIs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex
{
        /// Pixel coordinates, origin at the upper-left corner.
        pub position: [f32; 2],
        pub tex_coords: [f32; 2],
        /// Linear-space tint.
        pub color: [f32; 4],
        /// `1.0` to honour the texture's alpha, `0.0` to treat it as opaque.
        pub use_alpha: f32,
}

impl SpriteVertex
{
        pub fn get_desc() -> wgpu::VertexBufferLayout<'static>
        {
                wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                                wgpu::VertexAttribute {
                                        offset: 0,
                                        shader_location: 0,
                                        format: wgpu::VertexFormat::Float32x2,
                                },
                                wgpu::VertexAttribute {
                                        offset: std::mem::size_of::<[f32; 2]>()
                                                as wgpu::BufferAddress,
                                        shader_location: 1,
                                        format: wgpu::VertexFormat::Float32x2,
                                },
                                wgpu::VertexAttribute {
                                        offset: std::mem::size_of::<[f32; 4]>()
                                                as wgpu::BufferAddress,
                                        shader_location: 2,
                                        format: wgpu::VertexFormat::Float32x4,
                                },
                                wgpu::VertexAttribute {
                                        offset: std::mem::size_of::<[f32; 8]>()
                                                as wgpu::BufferAddress,
                                        shader_location: 3,
                                        format: wgpu::VertexFormat::Float32,
                                },
                        ],
                }
        }
}

/// A run of indices drawn with one texture binding.
///
/// `texture == None` selects the white texture used for solid fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch
{
        pub texture: Option<TextureId>,
        pub filter: Filter,
        pub indices: Range<u32>,
}

/// CPU-side list of quads recorded during one scene.
#[derive(Debug, Default)]
pub struct SpriteBatch
{
        pub vertices: Vec<SpriteVertex>,
        pub indices: Vec<u32>,
        pub batches: Vec<DrawBatch>,

        /// Set when something was painted after the last batch, the next
        /// quad must not join it.
        sealed: bool,
}

impl SpriteBatch
{
        pub fn new() -> Self
        {
                Self::default()
        }

        pub fn clear(&mut self)
        {
                self.vertices.clear();
                self.indices.clear();
                self.batches.clear();
                self.sealed = false;
        }

        /// Ends the current batch so later quads start a new one.
        pub fn seal(&mut self)
        {
                self.sealed = true;
        }

        pub fn is_empty(&self) -> bool
        {
                self.indices.is_empty()
        }

        /// Queues `source` of a texture of `texture_size` stretched over
        /// `destination`. Returns `false` when nothing would be visible.
        #[allow(clippy::too_many_arguments)]
        pub fn push_image(
                &mut self,
                texture: TextureId,
                texture_size: Dimension,
                destination: Rect,
                source: Rect,
                tint: Color,
                use_alpha: bool,
                filter: Filter,
        ) -> bool
        {
                if destination.is_empty() || source.is_empty()
                {
                        return false;
                }

                let width = texture_size.width.max(1) as f32;
                let height = texture_size.height.max(1) as f32;

                let uv = [
                        source.upper_left.x as f32 / width,
                        source.upper_left.y as f32 / height,
                        source.lower_right.x as f32 / width,
                        source.lower_right.y as f32 / height,
                ];

                self.push_quad(Some(texture), filter, destination, uv, tint, use_alpha);

                true
        }

        /// Queues a solid fill. Returns `false` for an empty rectangle.
        pub fn push_rect(
                &mut self,
                color: Color,
                rect: Rect,
        ) -> bool
        {
                if rect.is_empty()
                {
                        return false;
                }

                self.push_quad(None, Filter::Nearest, rect, [0.0, 0.0, 1.0, 1.0], color, true);

                true
        }

        fn push_quad(
                &mut self,
                texture: Option<TextureId>,
                filter: Filter,
                rect: Rect,
                uv: [f32; 4],
                color: Color,
                use_alpha: bool,
        )
        {
                let [u0, v0, u1, v1] = uv;

                let (x0, y0) = (rect.upper_left.x as f32, rect.upper_left.y as f32);
                let (x1, y1) = (rect.lower_right.x as f32, rect.lower_right.y as f32);

                let color = color.to_linear();
                let use_alpha = if use_alpha { 1.0 } else { 0.0 };

                let base = self.vertices.len() as u32;

                for (position, tex_coords) in [
                        ([x0, y0], [u0, v0]),
                        ([x0, y1], [u0, v1]),
                        ([x1, y1], [u1, v1]),
                        ([x1, y0], [u1, v0]),
                ]
                {
                        self.vertices.push(SpriteVertex {
                                position,
                                tex_coords,
                                color,
                                use_alpha,
                        });
                }

                let start = self.indices.len() as u32;

                self.indices
                        .extend([0, 1, 2, 0, 2, 3].map(|i| base + i));

                let end = self.indices.len() as u32;

                match self.batches.last_mut()
                {
                        Some(last)
                                if !self.sealed
                                        && last.texture == texture
                                        && last.filter == filter =>
                        {
                                last.indices.end = end;
                        }
                        _ => self.batches.push(DrawBatch {
                                texture,
                                filter,
                                indices: start..end,
                        }),
                }

                self.sealed = false;
        }
}
