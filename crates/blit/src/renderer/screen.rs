use cgmath::{Matrix4, Vector4};
use wgpu::util::DeviceExt;

use crate::video::Dimension;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::from_cols(
    Vector4::new(1.0, 0.0, 0.0, 0.0),
    Vector4::new(0.0, 1.0, 0.0, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 1.0),
);

/// Pixel-space projection: (0, 0) is the upper-left corner of the surface,
/// x grows right and y grows down.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform
{
        // We can't use cgmath with bytemuck directly, so we'll have
        // to convert the Matrix4 into a 4x4 f32 array
        pub view_proj: [[f32; 4]; 4],
}

impl ScreenUniform
{
        pub fn new(size: Dimension) -> Self
        {
                Self {
                        view_proj: Self::projection(size).into(),
                }
        }

        pub fn projection(size: Dimension) -> Matrix4<f32>
        {
                let width = size.width.max(1) as f32;
                let height = size.height.max(1) as f32;

                OPENGL_TO_WGPU_MATRIX * cgmath::ortho(0.0, width, height, 0.0, -1.0, 1.0)
        }
}

/// Uniform buffer and bind group holding the [`ScreenUniform`].
#[derive(Debug)]
pub struct ScreenBinding
{
        pub uniform: ScreenUniform,
        pub buffer: wgpu::Buffer,
        pub layout: wgpu::BindGroupLayout,
        pub bind_group: wgpu::BindGroup,
}

impl ScreenBinding
{
        pub fn new(
                device: &wgpu::Device,
                size: Dimension,
        ) -> Self
        {
                let uniform = ScreenUniform::new(size);

                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Screen Buffer"),
                        contents: bytemuck::cast_slice(&[uniform]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        entries: &[wgpu::BindGroupLayoutEntry {
                                binding: 0,
                                visibility: wgpu::ShaderStages::VERTEX,
                                ty: wgpu::BindingType::Buffer {
                                        ty: wgpu::BufferBindingType::Uniform,
                                        has_dynamic_offset: false,
                                        min_binding_size: None,
                                },
                                count: None,
                        }],
                        label: Some("screen_bind_group_layout"),
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout: &layout,
                        entries: &[wgpu::BindGroupEntry {
                                binding: 0,
                                resource: buffer.as_entire_binding(),
                        }],
                        label: Some("screen_bind_group"),
                });

                Self {
                        uniform,
                        buffer,
                        layout,
                        bind_group,
                }
        }

        pub fn resize(
                &mut self,
                queue: &wgpu::Queue,
                size: Dimension,
        )
        {
                self.uniform = ScreenUniform::new(size);

                queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
}

#[cfg(test)]
mod tests
{
        use cgmath::Vector4;

        use super::*;

        fn project(
                size: Dimension,
                x: f32,
                y: f32,
        ) -> Vector4<f32>
        {
                ScreenUniform::projection(size) * Vector4::new(x, y, 0.0, 1.0)
        }

        #[test]
        fn corners_map_to_clip_space()
        {
                let size = Dimension::new(512, 384);

                let top_left = project(size, 0.0, 0.0);
                let bottom_right = project(size, 512.0, 384.0);

                assert!((top_left.x + 1.0).abs() < 1e-6);
                assert!((top_left.y - 1.0).abs() < 1e-6);
                assert!((bottom_right.x - 1.0).abs() < 1e-6);
                assert!((bottom_right.y + 1.0).abs() < 1e-6);
        }

        #[test]
        fn depth_lands_inside_wgpu_range()
        {
                let center = project(Dimension::new(800, 480), 400.0, 240.0);

                assert!(center.z >= 0.0 && center.z <= 1.0);
                assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
        }
}
