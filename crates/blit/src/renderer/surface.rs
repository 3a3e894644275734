use crate::video::Dimension;

#[derive(Debug)]
pub struct SurfaceManager
{
        pub surface: wgpu::Surface<'static>,
        pub configuration: wgpu::SurfaceConfiguration,
        pub capabilities: wgpu::SurfaceCapabilities,
}

impl SurfaceManager
{
        pub fn new(
                surface: wgpu::Surface<'static>,
                adapter: &wgpu::Adapter,
                device: &wgpu::Device,
                size: Dimension,
        ) -> anyhow::Result<Self>
        {
                let capabilities = surface.get_capabilities(adapter);

                let format = Self::texture_format(&capabilities)?;

                let alpha_mode = capabilities
                        .alpha_modes
                        .first()
                        .copied()
                        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

                let configuration = wgpu::SurfaceConfiguration {
                        // RENDER_ATTACHMENT is guaranteed to be supported.
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                        format,
                        width: size.width.max(1),
                        height: size.height.max(1),
                        present_mode: wgpu::PresentMode::Fifo, // vsync
                        desired_maximum_frame_latency: 2,
                        alpha_mode,
                        view_formats: vec![],
                };

                surface.configure(device, &configuration);

                Ok(Self {
                        surface,
                        configuration,
                        capabilities,
                })
        }

        /// Prefers an sRGB format so texel colors are blended in linear space.
        fn texture_format(capabilities: &wgpu::SurfaceCapabilities) -> anyhow::Result<wgpu::TextureFormat>
        {
                capabilities
                        .formats
                        .iter()
                        .find(|f| f.is_srgb())
                        .or_else(|| capabilities.formats.first())
                        .copied()
                        .ok_or_else(|| anyhow::anyhow!("Surface is incompatible with the adapter."))
        }

        pub fn format(&self) -> wgpu::TextureFormat
        {
                self.configuration.format
        }

        pub fn size(&self) -> Dimension
        {
                Dimension::new(self.configuration.width, self.configuration.height)
        }

        /// Reconfigures the surface. Zero sized windows (minimised) are ignored.
        pub fn resize(
                &mut self,
                device: &wgpu::Device,
                new_size: Dimension,
        ) -> bool
        {
                if new_size.width == 0 || new_size.height == 0
                {
                        return false;
                }

                // Clamping to max dim to prevent panic!
                let max_dim = device.limits().max_texture_dimension_2d;

                self.configuration.width = new_size.width.min(max_dim);
                self.configuration.height = new_size.height.min(max_dim);

                self.surface.configure(device, &self.configuration);

                true
        }

        pub fn reconfigure(
                &self,
                device: &wgpu::Device,
        )
        {
                self.surface.configure(device, &self.configuration);
        }

        pub fn acquire_frame(&self) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), wgpu::SurfaceError>
        {
                let output = self.surface.get_current_texture()?;

                let view = output
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());

                Ok((output, view))
        }
}
