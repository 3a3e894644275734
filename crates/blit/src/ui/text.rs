use std::ops::Range;

use derivative::Derivative;
use egui::{
        ClippedPrimitive, Context, TexturesDelta,
        epaint::{ClippedShape, Primitive},
};
use egui_wgpu::{Renderer, ScreenDescriptor};
use wgpu::{CommandEncoder, Device, Queue, StoreOp, TextureFormat, TextureView};

use crate::{
        ui::font::FontRegistry,
        video::{Color, Dimension, FontId, Position},
};

/// Tessellated text of one scene, ready for upload.
#[derive(Debug, Default)]
pub struct TextOutput
{
        /// Texture updates egui produced since the last upload, font atlas
        /// included.
        pub textures_delta: TexturesDelta,

        pub primitives: Vec<ClippedPrimitive>,

        /// `primitives[runs[i].clone()]` belong to text run `i`.
        pub runs: Vec<Range<usize>>,
}

/// The GPU-free half of text drawing: one egui pass per scene, shapes
/// grouped into runs that are painted separately.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TextFrame
{
        #[derivative(Debug = "ignore")]
        context: Context,

        pub fonts: FontRegistry,

        screen_rect: egui::Rect,

        runs: Vec<Vec<ClippedShape>>,

        /// Texture updates of passes that were never drawn.
        #[derivative(Debug = "ignore")]
        pending: TexturesDelta,

        frame_started: bool,
}

impl TextFrame
{
        pub fn new() -> Self
        {
                let context = Context::default();

                // Text is positioned in surface pixels.
                context.set_pixels_per_point(1.0);

                Self {
                        context,
                        fonts: FontRegistry::new(),
                        screen_rect: egui::Rect::ZERO,
                        runs: Vec::new(),
                        pending: TexturesDelta::default(),
                        frame_started: false,
                }
        }

        pub fn is_started(&self) -> bool
        {
                self.frame_started
        }

        pub fn begin(
                &mut self,
                size: Dimension,
        )
        {
                // A scene was begun twice; drop the unfinished pass.
                self.discard();

                if self.fonts.dirty
                {
                        self.context.set_fonts(self.fonts.definitions.clone());
                        self.fonts.dirty = false;
                }

                self.screen_rect = egui::Rect::from_min_size(
                        egui::Pos2::ZERO,
                        egui::vec2(size.width as f32, size.height as f32),
                );

                let raw_input = egui::RawInput {
                        screen_rect: Some(self.screen_rect),
                        ..Default::default()
                };

                self.context.begin_pass(raw_input);

                self.frame_started = true;
        }

        /// Lays out `text` on one line with its upper-left corner at
        /// `position` and appends it to text run `run`. Returns `false` when
        /// the font is unknown or no frame is open.
        pub fn draw(
                &mut self,
                run: usize,
                font: FontId,
                text: &str,
                position: Position,
                color: Color,
        ) -> bool
        {
                if !self.frame_started
                {
                        return false;
                }

                let Some(font_id) = self.fonts.get(font).cloned()
                else
                {
                        return false;
                };

                let color = color.to_egui();

                let galley = self
                        .context
                        .fonts(|fonts| fonts.layout_no_wrap(text.to_owned(), font_id, color));

                let shape = egui::Shape::galley(
                        egui::pos2(position.x as f32, position.y as f32),
                        galley,
                        color,
                );

                if self.runs.len() <= run
                {
                        self.runs.resize_with(run + 1, Vec::new);
                }

                self.runs[run].push(ClippedShape {
                        clip_rect: self.screen_rect,
                        shape,
                });

                true
        }

        /// Closes the pass without drawing. Texture updates are kept for the
        /// next [`TextFrame::finish`], egui never sends them twice.
        pub fn discard(&mut self)
        {
                if !self.frame_started
                {
                        return;
                }

                self.frame_started = false;
                self.runs.clear();

                let full_output = self.context.end_pass();

                self.pending.append(full_output.textures_delta);
        }

        /// Closes the pass and tessellates every run. `None` when no frame
        /// was open.
        pub fn finish(&mut self) -> Option<TextOutput>
        {
                if !self.frame_started
                {
                        return None;
                }

                self.frame_started = false;

                let full_output = self.context.end_pass();

                let mut textures_delta = std::mem::take(&mut self.pending);
                textures_delta.append(full_output.textures_delta);

                let pixels_per_point = self.context.pixels_per_point();

                let mut primitives = Vec::new();
                let mut runs = Vec::new();

                for shapes in self.runs.drain(..)
                {
                        let start = primitives.len();

                        primitives.extend(self.context.tessellate(shapes, pixels_per_point));

                        runs.push(start..primitives.len());
                }

                Some(TextOutput {
                        textures_delta,
                        primitives,
                        runs,
                })
        }
}

impl Default for TextFrame
{
        fn default() -> Self
        {
                Self::new()
        }
}

/// Primitives of `run` unchanged, every other mesh replaced by an empty one
/// with a zero clip rect. egui-wgpu skips those but still steps over their
/// buffer slices, so one upload serves every run.
pub fn select_run(
        primitives: &[ClippedPrimitive],
        run: Range<usize>,
) -> Vec<ClippedPrimitive>
{
        primitives
                .iter()
                .enumerate()
                .map(|(i, primitive)| {
                        if run.contains(&i)
                        {
                                primitive.clone()
                        }
                        else
                        {
                                ClippedPrimitive {
                                        clip_rect: egui::Rect::ZERO,
                                        primitive: Primitive::Mesh(egui::Mesh::default()),
                                }
                        }
                })
                .collect()
}

/// Draws text through egui on top of the sprites issued before it.
///
/// One egui pass spans one scene: [`TextRenderer::begin_frame`] on scene
/// begin, [`TextRenderer::prepare`] and [`TextRenderer::render_run`] on scene
/// end.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TextRenderer
{
        pub frame: TextFrame,

        #[derivative(Debug = "ignore")]
        renderer: Renderer,
}

impl TextRenderer
{
        pub fn new(
                device: &Device,
                output_color_format: TextureFormat,
        ) -> TextRenderer
        {
                let renderer = Renderer::new(device, output_color_format, None, 1, false);

                TextRenderer {
                        frame: TextFrame::new(),
                        renderer,
                }
        }

        pub fn fonts(&mut self) -> &mut FontRegistry
        {
                &mut self.frame.fonts
        }

        pub fn begin_frame(
                &mut self,
                size: Dimension,
        )
        {
                self.frame.begin(size);
        }

        pub fn draw(
                &mut self,
                run: usize,
                font: FontId,
                text: &str,
                position: Position,
                color: Color,
        ) -> bool
        {
                self.frame.draw(run, font, text, position, color)
        }

        /// Closes the egui pass without drawing, e.g. when the frame is skipped.
        pub fn discard_frame(&mut self)
        {
                self.frame.discard();
        }

        fn screen_descriptor(size: Dimension) -> ScreenDescriptor
        {
                ScreenDescriptor {
                        size_in_pixels: [size.width, size.height],
                        pixels_per_point: 1.0,
                }
        }

        /// Closes the egui pass, uploads textures and the vertex data of every
        /// run.
        ///
        /// Returns the output to draw with [`TextRenderer::render_run`] and
        /// extra command buffers egui needs submitted before `encoder`.
        pub fn prepare(
                &mut self,
                device: &Device,
                queue: &Queue,
                encoder: &mut CommandEncoder,
                size: Dimension,
        ) -> (TextOutput, Vec<wgpu::CommandBuffer>)
        {
                let Some(output) = self.frame.finish()
                else
                {
                        return (TextOutput::default(), Vec::new());
                };

                for (id, image_delta) in &output.textures_delta.set
                {
                        self.renderer
                                .update_texture(device, queue, *id, image_delta);
                }

                let command_buffers = self.renderer.update_buffers(
                        device,
                        queue,
                        encoder,
                        &output.primitives,
                        &Self::screen_descriptor(size),
                );

                (output, command_buffers)
        }

        /// Records text run `run` into `encoder` on top of whatever
        /// `window_surface_view` already holds.
        pub fn render_run(
                &self,
                encoder: &mut CommandEncoder,
                window_surface_view: &TextureView,
                output: &TextOutput,
                run: usize,
                size: Dimension,
        )
        {
                let Some(range) = output.runs.get(run)
                else
                {
                        return;
                };

                let primitives = select_run(&output.primitives, range.clone());

                let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: window_surface_view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: StoreOp::Store,
                                },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        label: Some("text_pass"),
                        occlusion_query_set: None,
                });

                self.renderer.render(
                        &mut rpass.forget_lifetime(),
                        &primitives,
                        &Self::screen_descriptor(size),
                );
        }

        /// Frees the textures egui released this frame. Call after submission.
        pub fn finish_frame(
                &mut self,
                output: &TextOutput,
        )
        {
                for x in &output.textures_delta.free
                {
                        self.renderer.free_texture(x)
                }
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn full_uploads(delta: &TexturesDelta) -> usize
        {
                delta.set.iter().filter(|(_, d)| d.pos.is_none()).count()
        }

        fn scene(
                frame: &mut TextFrame,
                text: &str,
        )
        {
                frame.begin(Dimension::new(512, 384));

                let font = frame.fonts.built_in();

                assert!(frame.draw(0, font, text, Position::new(130, 10), Color::WHITE));
        }

        #[test]
        fn skipped_frame_keeps_font_atlas_upload()
        {
                let mut frame = TextFrame::new();

                scene(&mut frame, "first");
                frame.discard();

                assert!(!frame.is_started());

                scene(&mut frame, "second");

                let output = frame.finish().unwrap();

                assert!(full_uploads(&output.textures_delta) >= 1);
                assert_eq!(output.runs.len(), 1);
                assert!(!output.primitives.is_empty());

                // Delivered once, not again.
                scene(&mut frame, "third");

                let output = frame.finish().unwrap();

                assert_eq!(full_uploads(&output.textures_delta), 0);
        }

        #[test]
        fn beginning_twice_keeps_font_atlas_upload()
        {
                let mut frame = TextFrame::new();

                scene(&mut frame, "unfinished");
                scene(&mut frame, "finished");

                let output = frame.finish().unwrap();

                assert!(full_uploads(&output.textures_delta) >= 1);
        }

        #[test]
        fn runs_keep_their_primitives_apart()
        {
                let mut frame = TextFrame::new();

                frame.begin(Dimension::new(512, 384));

                let font = frame.fonts.built_in();

                frame.draw(0, font, "under", Position::new(0, 0), Color::WHITE);
                frame.draw(1, font, "over", Position::new(0, 20), Color::WHITE);

                let output = frame.finish().unwrap();

                assert_eq!(output.runs.len(), 2);
                assert_eq!(output.runs[0].end, output.runs[1].start);
                assert_eq!(output.runs[1].end, output.primitives.len());

                let selected = select_run(&output.primitives, output.runs[1].clone());

                assert_eq!(selected.len(), output.primitives.len());

                for (i, primitive) in selected.iter().enumerate()
                {
                        if output.runs[1].contains(&i)
                        {
                                assert_ne!(primitive.clip_rect, egui::Rect::ZERO);
                        }
                        else
                        {
                                assert_eq!(primitive.clip_rect, egui::Rect::ZERO);
                        }
                }
        }

        #[test]
        fn drawing_needs_an_open_frame_and_a_known_font()
        {
                let mut frame = TextFrame::new();

                let font = frame.fonts.built_in();

                assert!(!frame.draw(0, font, "early", Position::new(0, 0), Color::WHITE));
                assert!(frame.finish().is_none());

                frame.begin(Dimension::new(64, 64));

                assert!(!frame.draw(
                        0,
                        FontId::from_index(9),
                        "unknown",
                        Position::new(0, 0),
                        Color::WHITE
                ));
        }
}
