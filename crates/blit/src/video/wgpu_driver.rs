use std::{path::Path, sync::Arc};

use derivative::Derivative;
use winit::window::Window;

use crate::{
        driver_choice::DriverType,
        renderer::{
                SpriteRenderer,
                order::{Layer, PaintOrder},
                surface::SurfaceManager,
        },
        resource::Resources,
        texture::Texture,
        ui::TextRenderer,
        video::{
                Color, Dimension, Filter, FontId, Material2D, Position, Rect, TextureId,
                VideoDriver,
        },
};

/// [`VideoDriver`] backed by wgpu, rendering into a winit window.
///
/// Draw calls are recorded into a [`crate::renderer::batch::SpriteBatch`]
/// and text runs, then painted in call order on [`VideoDriver::end_scene`].
#[derive(Derivative)]
#[derivative(Debug)]
pub struct WgpuDriver
{
        pub driver_type: DriverType,

        #[derivative(Debug = "ignore")]
        pub window: Arc<Window>,

        /// The handle to a physical graphics device.
        pub adapter: wgpu::Adapter,

        /// The GPU device handle used to submit rendering commands.
        pub device: wgpu::Device,

        /// The GPU queue used to execute command buffers.
        pub queue: wgpu::Queue,

        pub surface: SurfaceManager,

        pub sprites: SpriteRenderer,

        pub text: TextRenderer,

        pub order: PaintOrder,

        pub resources: Resources,

        material_2d: Material2D,

        material_2d_enabled: bool,

        /// Clear color of the open scene, `None` outside begin/end.
        scene: Option<Color>,
}

impl WgpuDriver
{
        /// Creates the instance, surface, adapter and device for `window`.
        ///
        /// Fails when the requested backend has no adapter able to present to
        /// the window.
        pub async fn new(
                window: Arc<Window>,
                driver_type: DriverType,
        ) -> anyhow::Result<Self>
        {
                let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                        backends: driver_type.backends(),
                        ..Default::default()
                });

                let size = window.inner_size();

                let surface = instance.create_surface(window.clone())?;

                let adapter = instance
                        .request_adapter(&wgpu::RequestAdapterOptions {
                                power_preference: wgpu::PowerPreference::HighPerformance,

                                // Tells wgpu to find an adapter that can present to the supplied
                                // surface.
                                compatible_surface: Some(&surface),

                                force_fallback_adapter: driver_type.force_fallback_adapter(),
                        })
                        .await
                        .map_err(|e| anyhow::anyhow!("No {driver_type} adapter available: {e}"))?;

                log::info!("Adapter Info: {:#?}", adapter.get_info());

                let (device, queue) = adapter
                        .request_device(&wgpu::DeviceDescriptor {
                                label: Some("blit_device"),
                                required_features: wgpu::Features::empty(),
                                // 2D blitting needs very little; stay within what GLES
                                // and software adapters offer.
                                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                                        .using_resolution(adapter.limits()),
                                memory_hints: wgpu::MemoryHints::default(),
                                trace: wgpu::Trace::Off,
                        })
                        .await?;

                let surface = SurfaceManager::new(
                        surface,
                        &adapter,
                        &device,
                        Dimension::new(size.width, size.height),
                )?;

                let sprites = SpriteRenderer::new(&device, &queue, surface.format(), surface.size())?;

                let text = TextRenderer::new(&device, surface.format());

                Ok(Self {
                        driver_type,
                        window,
                        adapter,
                        device,
                        queue,
                        surface,
                        sprites,
                        text,
                        order: PaintOrder::new(),
                        resources: Resources::new(),
                        material_2d: Material2D::default(),
                        material_2d_enabled: false,
                        scene: None,
                })
        }

        pub fn resize(
                &mut self,
                size: Dimension,
        )
        {
                if self.surface.resize(&self.device, size)
                {
                        self.sprites.resize(&self.queue, self.surface.size());
                }
        }

        pub fn in_scene(&self) -> bool
        {
                self.scene.is_some()
        }

        fn current_filter(&self) -> Filter
        {
                if self.material_2d_enabled
                {
                        self.material_2d.filter()
                }
                else
                {
                        Filter::Nearest
                }
        }

        fn check_scene(
                &self,
                call: &str,
        ) -> bool
        {
                if self.scene.is_none()
                {
                        log::warn!("{call} called outside begin_scene/end_scene, ignored.");
                        return false;
                }

                true
        }

        fn texture_mut(
                &mut self,
                texture: TextureId,
        ) -> anyhow::Result<&mut Texture>
        {
                self.resources
                        .get_mut(texture)
                        .ok_or_else(|| anyhow::anyhow!("Unknown texture {texture:?}."))
        }

        fn push_image(
                &mut self,
                texture: TextureId,
                destination: Rect,
                source: Rect,
                tint: Color,
                use_alpha: bool,
        )
        {
                let Some(size) = self.texture_size(texture)
                else
                {
                        log::warn!("Drawing unknown texture {texture:?}, ignored.");
                        return;
                };

                let filter = self.current_filter();

                self.sprites
                        .batch
                        .push_image(texture, size, destination, source, tint, use_alpha, filter);
        }
}

impl VideoDriver for WgpuDriver
{
        fn get_texture(
                &mut self,
                path: &Path,
        ) -> anyhow::Result<TextureId>
        {
                if let Some(id) = self.resources.find(path)
                {
                        return Ok(id);
                }

                let texture = Texture::from_path(
                        &self.device,
                        &self.queue,
                        path,
                        &self.sprites.texture_layout,
                        &self.sprites.samplers,
                )?;

                log::info!(
                        "Loaded texture {} ({}x{})",
                        path.display(),
                        texture.size.width,
                        texture.size.height
                );

                Ok(self.resources.add_texture(Some(path), texture))
        }

        fn make_color_key_texture(
                &mut self,
                texture: TextureId,
                key_position: Position,
        ) -> anyhow::Result<()>
        {
                let queue = self.queue.clone();

                let keyed = self.texture_mut(texture)?.color_key_at(&queue, key_position)?;

                log::debug!("Color key made {keyed} texels of {texture:?} transparent");

                Ok(())
        }

        fn make_color_key_texture_with_color(
                &mut self,
                texture: TextureId,
                key: Color,
        ) -> anyhow::Result<()>
        {
                let queue = self.queue.clone();

                let keyed = self.texture_mut(texture)?.color_key(&queue, key.to_rgba());

                log::debug!("Color key made {keyed} texels of {texture:?} transparent");

                Ok(())
        }

        fn texture_size(
                &self,
                texture: TextureId,
        ) -> Option<Dimension>
        {
                self.resources.get(texture).map(|t| t.size)
        }

        fn built_in_font(&mut self) -> Option<FontId>
        {
                Some(self.text.fonts().built_in())
        }

        fn get_font(
                &mut self,
                path: &Path,
        ) -> anyhow::Result<FontId>
        {
                let font = self.text.fonts().load_file(path)?;

                log::info!("Loaded font {}", path.display());

                Ok(font)
        }

        fn material_2d_mut(&mut self) -> &mut Material2D
        {
                &mut self.material_2d
        }

        fn enable_material_2d(
                &mut self,
                enable: bool,
        )
        {
                self.material_2d_enabled = enable;
        }

        fn begin_scene(
                &mut self,
                clear_color: Color,
        )
        {
                if self.scene.is_some()
                {
                        log::warn!("begin_scene called twice, previous scene dropped.");
                }

                self.sprites.batch.clear();
                self.order.clear();

                self.text.begin_frame(self.surface.size());

                self.scene = Some(clear_color);
        }

        fn end_scene(&mut self) -> anyhow::Result<()>
        {
                let Some(clear_color) = self.scene.take()
                else
                {
                        anyhow::bail!("end_scene called without begin_scene.");
                };

                // Get the surface texture ONCE per frame
                let (output, view) = match self.surface.acquire_frame()
                {
                        Ok(frame) => frame,
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) =>
                        {
                                // This often happens during window resizing
                                log::warn!("wgpu surface lost or outdated, reconfiguring");

                                self.surface.reconfigure(&self.device);
                                self.text.discard_frame();

                                return Ok(());
                        }
                        Err(wgpu::SurfaceError::Timeout) =>
                        {
                                log::warn!("Timed out acquiring surface texture, frame skipped");

                                self.text.discard_frame();

                                return Ok(());
                        }
                        Err(e) =>
                        {
                                self.text.discard_frame();

                                return Err(e.into());
                        }
                };

                let mut encoder = self
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                                label: Some("Main Render Encoder"),
                        });

                let size = self.surface.size();

                let sprite_buffers = self.sprites.upload(&self.device);

                let (text, text_buffers) =
                        self.text
                                .prepare(&self.device, &self.queue, &mut encoder, size);

                self.sprites.clear(&mut encoder, &view, clear_color);

                for layer in self.order.finish(&self.sprites.batch)
                {
                        match layer
                        {
                                Layer::Sprites(batches) =>
                                {
                                        if let Some(buffers) = &sprite_buffers
                                        {
                                                self.sprites.draw(
                                                        &mut encoder,
                                                        &view,
                                                        buffers,
                                                        batches.clone(),
                                                        &self.resources,
                                                );
                                        }
                                }
                                Layer::Text(run) =>
                                {
                                        self.text.render_run(&mut encoder, &view, &text, *run, size);
                                }
                        }
                }

                self.queue
                        .submit(text_buffers.into_iter().chain(std::iter::once(encoder.finish())));

                self.text.finish_frame(&text);

                self.window.pre_present_notify();

                output.present();

                Ok(())
        }

        fn draw_2d_image(
                &mut self,
                texture: TextureId,
                destination: Position,
                source: Rect,
                tint: Color,
                use_alpha_channel: bool,
        )
        {
                if !self.check_scene("draw_2d_image")
                {
                        return;
                }

                self.push_image(
                        texture,
                        source.moved_to(destination),
                        source,
                        tint,
                        use_alpha_channel,
                );
        }

        fn draw_2d_image_scaled(
                &mut self,
                texture: TextureId,
                destination: Rect,
                source: Rect,
        )
        {
                if !self.check_scene("draw_2d_image_scaled")
                {
                        return;
                }

                self.push_image(texture, destination, source, Color::WHITE, false);
        }

        fn draw_2d_rectangle(
                &mut self,
                color: Color,
                rect: Rect,
        )
        {
                if !self.check_scene("draw_2d_rectangle")
                {
                        return;
                }

                self.sprites.batch.push_rect(color, rect);
        }

        fn draw_text(
                &mut self,
                font: FontId,
                text: &str,
                rect: Rect,
                color: Color,
        )
        {
                if !self.check_scene("draw_text")
                {
                        return;
                }

                // Text goes above every sprite drawn so far and below later ones.
                let run = self.order.text(&mut self.sprites.batch);

                if !self.text.draw(run, font, text, rect.upper_left, color)
                {
                        log::warn!("Drawing with unknown font {font:?}, ignored.");
                }
        }

        fn screen_size(&self) -> Dimension
        {
                self.surface.size()
        }
}
