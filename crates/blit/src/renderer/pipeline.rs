use crate::renderer::batch::SpriteVertex;

/// Alpha-blended textured-quad pipeline used for every 2D draw.
#[derive(Debug)]
pub struct SpritePipeline
{
        pub render_pipeline: wgpu::RenderPipeline,
}

impl SpritePipeline
{
        pub fn new(
                device: &wgpu::Device,
                format: wgpu::TextureFormat,
                bind_groups: &[&wgpu::BindGroupLayout],
        ) -> Self
        {
                let shader = Self::load_shader_module(device);

                let render_pipeline_layout = Self::new_render_pipeline_layout(device, bind_groups);

                let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Sprite Pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                                module: &shader,
                                entry_point: Some("vs_main"),
                                buffers: &[SpriteVertex::get_desc()],
                                compilation_options: wgpu::PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                                module: &shader,
                                entry_point: Some("fs_main"),
                                targets: &[Some(wgpu::ColorTargetState {
                                        format,
                                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                                        write_mask: wgpu::ColorWrites::ALL,
                                })],
                                compilation_options: wgpu::PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                                topology: wgpu::PrimitiveTopology::TriangleList,
                                strip_index_format: None,
                                front_face: wgpu::FrontFace::Ccw,
                                // The y-down projection flips winding, quads are never culled.
                                cull_mode: None,
                                polygon_mode: wgpu::PolygonMode::Fill,
                                conservative: false,
                                unclipped_depth: false,
                        },
                        depth_stencil: None,
                        multisample: wgpu::MultisampleState::default(),
                        multiview: None,
                        cache: None,
                });

                Self {
                        render_pipeline,
                }
        }

        /// Loads the shader module data from the `wgsl` file.
        fn load_shader_module(device: &wgpu::Device) -> wgpu::ShaderModule
        {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some("Sprite Shader"),
                        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
                })
        }

        fn new_render_pipeline_layout(
                device: &wgpu::Device,
                bind_groups: &[&wgpu::BindGroupLayout],
        ) -> wgpu::PipelineLayout
        {
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Sprite Pipeline Layout"),
                        bind_group_layouts: bind_groups,
                        push_constant_ranges: &[],
                })
        }
}
