use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{
        renderer::{batch::SpriteBatch, pipeline::SpritePipeline, screen::ScreenBinding},
        resource::Resources,
        texture::{Samplers, Texture},
        video::{Color, Dimension},
};

pub mod batch;
pub mod order;
pub mod pipeline;
pub mod screen;
pub mod surface;

/// Vertex and index buffers of one scene's [`SpriteBatch`].
#[derive(Debug)]
pub struct SpriteBuffers
{
        pub vertices: wgpu::Buffer,
        pub indices: wgpu::Buffer,
}

/// Owns every GPU object needed to turn a [`SpriteBatch`] into a render pass.
#[derive(Debug)]
pub struct SpriteRenderer
{
        pub pipeline: SpritePipeline,
        pub screen: ScreenBinding,
        pub texture_layout: wgpu::BindGroupLayout,
        pub samplers: Samplers,
        pub white: Texture,
        pub batch: SpriteBatch,
}

impl SpriteRenderer
{
        pub fn new(
                device: &wgpu::Device,
                queue: &wgpu::Queue,
                format: wgpu::TextureFormat,
                size: Dimension,
        ) -> anyhow::Result<Self>
        {
                let screen = ScreenBinding::new(device, size);

                let texture_layout = Texture::new_texture_bind_group_layout(device);

                let samplers = Samplers::new(device);

                let white = Texture::create_white(device, queue, &texture_layout, &samplers)?;

                let pipeline = SpritePipeline::new(device, format, &[&screen.layout, &texture_layout]);

                Ok(Self {
                        pipeline,
                        screen,
                        texture_layout,
                        samplers,
                        white,
                        batch: SpriteBatch::new(),
                })
        }

        pub fn resize(
                &mut self,
                queue: &wgpu::Queue,
                size: Dimension,
        )
        {
                self.screen.resize(queue, size);
        }

        /// Uploads the recorded batch. `None` when nothing was drawn.
        pub fn upload(
                &self,
                device: &wgpu::Device,
        ) -> Option<SpriteBuffers>
        {
                if self.batch.is_empty()
                {
                        return None;
                }

                let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Sprite Vertex Buffer"),
                        contents: bytemuck::cast_slice(&self.batch.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                });

                let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Sprite Index Buffer"),
                        contents: bytemuck::cast_slice(&self.batch.indices),
                        usage: wgpu::BufferUsages::INDEX,
                });

                Some(SpriteBuffers { vertices, indices })
        }

        /// Clears `view` to `clear_color`.
        pub fn clear(
                &self,
                encoder: &mut wgpu::CommandEncoder,
                view: &wgpu::TextureView,
                clear_color: Color,
        )
        {
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("clear_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Clear(clear_color.to_wgpu()),
                                        store: wgpu::StoreOp::Store,
                                },
                        })],
                        depth_stencil_attachment: None,
                        occlusion_query_set: None,
                        timestamp_writes: None,
                });
        }

        /// Draws `batch.batches[batches]` on top of what `view` holds.
        pub fn draw(
                &self,
                encoder: &mut wgpu::CommandEncoder,
                view: &wgpu::TextureView,
                buffers: &SpriteBuffers,
                batches: Range<usize>,
                resources: &Resources,
        )
        {
                let Some(draws) = self.batch.batches.get(batches)
                else
                {
                        return;
                };

                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("sprite_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                },
                        })],
                        depth_stencil_attachment: None,
                        occlusion_query_set: None,
                        timestamp_writes: None,
                });

                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.screen.bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffers.vertices.slice(..));
                render_pass.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint32);

                for draw in draws
                {
                        let texture = match draw.texture
                        {
                                Some(id) => match resources.get(id)
                                {
                                        Some(texture) => texture,
                                        None => continue,
                                },
                                None => &self.white,
                        };

                        let Some(bind_group) = texture.bind_group(draw.filter)
                        else
                        {
                                continue;
                        };

                        render_pass.set_bind_group(1, bind_group, &[]);
                        render_pass.draw_indexed(draw.indices.clone(), 0, 0..1);
                }
        }
}
