//! The 2D graphics demo scene.
//!
//! One sprite sheet provides a background, two animation frames of an imp
//! and a logo. Every frame draws the background, two imps (one color
//! cycled), two lines of text, the filtered logo and, on desktop, a
//! translucent square under the mouse.

use std::path::PathBuf;

use blit::{
        AntiAliasMode, Color, FontId, FrameContext, Position, Rect, Scene2D, TextureId,
        VideoDriver,
};

/// Imp animation frame shown while `(t / 500) % 2` is odd.
pub const IMP_FRAME_A: Rect = Rect::new(349, 15, 385, 78);

pub const IMP_FRAME_B: Rect = Rect::new(387, 15, 423, 78);

pub const CLEAR_COLOR: Color = Color::new(255, 120, 102, 136);

pub const BACKGROUND_SOURCE: Rect = Rect::new(0, 0, 342, 224);
pub const BACKGROUND_POSITION: Position = Position::new(50, 50);

pub const IMP_POSITION: Position = Position::new(164, 125);
pub const CYCLED_IMP_POSITION: Position = Position::new(270, 105);

pub const LOGO_DESTINATION: Rect = Rect::new(10, 10, 108, 48);
pub const LOGO_SOURCE: Rect = Rect::new(354, 87, 442, 118);

pub const CAPTION: &str = "This demo shows that imps is also capable of drawing 2D graphics.";
pub const CAPTION_RECT: Rect = Rect::new(130, 10, 300, 50);

pub const SUBCAPTION: &str = "Also mixing with 3d graphics is possible.";
pub const SUBCAPTION_RECT: Rect = Rect::new(130, 20, 300, 60);

pub const CURSOR_COLOR: Color = Color::new(100, 255, 255, 255);
pub const CURSOR_HALF_EXTENT: i32 = 20;

/// Animation frame for time `t` in milliseconds, switching every 500 ms.
pub fn imp_frame(time_ms: u32) -> Rect
{
        if (time_ms / 500) % 2 != 0
        {
                IMP_FRAME_A
        }
        else
        {
                IMP_FRAME_B
        }
}

/// Channel value cycling through `0..255` once every 255 ms.
pub fn color_cycle(time_ms: u32) -> u8
{
        (time_ms % 255) as u8
}

#[derive(Debug)]
pub struct TwoDDemo
{
        pub texture_path: PathBuf,
        pub font_path: PathBuf,

        pub images: Option<TextureId>,
        pub font: Option<FontId>,
        pub font2: Option<FontId>,
}

impl TwoDDemo
{
        pub fn new(
                texture_path: PathBuf,
                font_path: PathBuf,
        ) -> Self
        {
                Self {
                        texture_path,
                        font_path,
                        images: None,
                        font: None,
                        font2: None,
                }
        }

        fn load_images(
                &self,
                driver: &mut dyn VideoDriver,
        ) -> Option<TextureId>
        {
                let images = match driver.get_texture(&self.texture_path)
                {
                        Ok(images) => images,
                        Err(e) =>
                        {
                                log::warn!("Could not load sprite sheet: {e:#}");
                                return None;
                        }
                };

                // The upper-left texel holds the background color of the sheet.
                if let Err(e) = driver.make_color_key_texture(images, Position::new(0, 0))
                {
                        log::warn!("Could not color key sprite sheet: {e:#}");
                }

                Some(images)
        }
}

impl Scene2D for TwoDDemo
{
        fn setup(
                &mut self,
                driver: &mut dyn VideoDriver,
        ) -> anyhow::Result<()>
        {
                self.images = self.load_images(driver);

                self.font = driver.built_in_font();

                self.font2 = match driver.get_font(&self.font_path)
                {
                        Ok(font) => Some(font),
                        Err(e) =>
                        {
                                log::warn!("Could not load font: {e:#}");
                                None
                        }
                };

                let material = driver.material_2d_mut();

                material.bilinear_filter = true;
                material.anti_aliasing = AntiAliasMode::FullBasic;

                Ok(())
        }

        fn draw(
                &mut self,
                frame: &mut FrameContext<'_>,
        ) -> anyhow::Result<()>
        {
                let time = frame.time_ms;
                let driver = &mut *frame.driver;

                driver.begin_scene(CLEAR_COLOR);

                if let Some(images) = self.images
                {
                        driver.draw_2d_image(
                                images,
                                BACKGROUND_POSITION,
                                BACKGROUND_SOURCE,
                                Color::WHITE,
                                true,
                        );

                        driver.draw_2d_image(images, IMP_POSITION, imp_frame(time), Color::WHITE, true);

                        driver.draw_2d_image(
                                images,
                                CYCLED_IMP_POSITION,
                                imp_frame(time),
                                Color::new(255, color_cycle(time), 255, 255),
                                true,
                        );
                }

                if let Some(font) = self.font
                {
                        driver.draw_text(font, CAPTION, CAPTION_RECT, Color::WHITE);
                }

                if let Some(font2) = self.font2
                {
                        let cycle = color_cycle(time);

                        driver.draw_text(
                                font2,
                                SUBCAPTION,
                                SUBCAPTION_RECT,
                                Color::new(255, cycle, cycle, 255),
                        );
                }

                if let Some(images) = self.images
                {
                        driver.enable_material_2d(true);
                        driver.draw_2d_image_scaled(images, LOGO_DESTINATION, LOGO_SOURCE);
                        driver.enable_material_2d(false);
                }

                if let Some(cursor) = frame.cursor
                {
                        driver.draw_2d_rectangle(CURSOR_COLOR, Rect::around(cursor, CURSOR_HALF_EXTENT));
                }

                driver.end_scene()
        }
}

#[cfg(test)]
mod tests
{
        use std::path::Path;

        use blit::{Dimension, Material2D};

        use super::*;

        #[derive(Debug, Clone, PartialEq)]
        enum Call
        {
                GetTexture(PathBuf),
                ColorKey(TextureId, Position),
                GetFont(PathBuf),
                BeginScene(Color),
                Image(TextureId, Position, Rect, Color, bool),
                Scaled(TextureId, Rect, Rect),
                Rectangle(Color, Rect),
                Text(FontId, String, Rect, Color),
                EnableMaterial(bool),
                EndScene,
        }

        #[derive(Default)]
        struct RecordingDriver
        {
                calls: Vec<Call>,
                material: Material2D,
                missing_texture: bool,
                missing_font: bool,
        }

        const SHEET: TextureId = TextureId::from_index(0);
        const BUILT_IN: FontId = FontId::from_index(0);
        const FILE_FONT: FontId = FontId::from_index(1);

        impl VideoDriver for RecordingDriver
        {
                fn get_texture(
                        &mut self,
                        path: &Path,
                ) -> anyhow::Result<TextureId>
                {
                        self.calls.push(Call::GetTexture(path.to_path_buf()));

                        if self.missing_texture
                        {
                                anyhow::bail!("no such file");
                        }

                        Ok(SHEET)
                }

                fn make_color_key_texture(
                        &mut self,
                        texture: TextureId,
                        key_position: Position,
                ) -> anyhow::Result<()>
                {
                        self.calls.push(Call::ColorKey(texture, key_position));
                        Ok(())
                }

                fn make_color_key_texture_with_color(
                        &mut self,
                        _texture: TextureId,
                        _key: Color,
                ) -> anyhow::Result<()>
                {
                        Ok(())
                }

                fn texture_size(
                        &self,
                        _texture: TextureId,
                ) -> Option<Dimension>
                {
                        Some(Dimension::new(512, 256))
                }

                fn built_in_font(&mut self) -> Option<FontId>
                {
                        Some(BUILT_IN)
                }

                fn get_font(
                        &mut self,
                        path: &Path,
                ) -> anyhow::Result<FontId>
                {
                        self.calls.push(Call::GetFont(path.to_path_buf()));

                        if self.missing_font
                        {
                                anyhow::bail!("not a font");
                        }

                        Ok(FILE_FONT)
                }

                fn material_2d_mut(&mut self) -> &mut Material2D
                {
                        &mut self.material
                }

                fn enable_material_2d(
                        &mut self,
                        enable: bool,
                )
                {
                        self.calls.push(Call::EnableMaterial(enable));
                }

                fn begin_scene(
                        &mut self,
                        clear_color: Color,
                )
                {
                        self.calls.push(Call::BeginScene(clear_color));
                }

                fn end_scene(&mut self) -> anyhow::Result<()>
                {
                        self.calls.push(Call::EndScene);
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
                        self.calls.push(Call::Image(
                                texture,
                                destination,
                                source,
                                tint,
                                use_alpha_channel,
                        ));
                }

                fn draw_2d_image_scaled(
                        &mut self,
                        texture: TextureId,
                        destination: Rect,
                        source: Rect,
                )
                {
                        self.calls.push(Call::Scaled(texture, destination, source));
                }

                fn draw_2d_rectangle(
                        &mut self,
                        color: Color,
                        rect: Rect,
                )
                {
                        self.calls.push(Call::Rectangle(color, rect));
                }

                fn draw_text(
                        &mut self,
                        font: FontId,
                        text: &str,
                        rect: Rect,
                        color: Color,
                )
                {
                        self.calls.push(Call::Text(font, text.to_owned(), rect, color));
                }

                fn screen_size(&self) -> Dimension
                {
                        Dimension::new(512, 384)
                }
        }

        fn demo() -> TwoDDemo
        {
                TwoDDemo::new(
                        PathBuf::from("media/2ddemo.png"),
                        PathBuf::from("media/fonthaettenschweiler.ttf"),
                )
        }

        fn draw_frame(
                demo: &mut TwoDDemo,
                driver: &mut RecordingDriver,
                time_ms: u32,
                cursor: Option<Position>,
        ) -> Vec<Call>
        {
                driver.calls.clear();

                let mut frame = FrameContext {
                        driver: &mut *driver,
                        time_ms,
                        cursor,
                };

                demo.draw(&mut frame).unwrap();

                std::mem::take(&mut driver.calls)
        }

        #[test]
        fn frames_alternate_every_500_ms()
        {
                assert_eq!(imp_frame(0), IMP_FRAME_B);
                assert_eq!(imp_frame(499), IMP_FRAME_B);
                assert_eq!(imp_frame(500), IMP_FRAME_A);
                assert_eq!(imp_frame(600), IMP_FRAME_A);
                assert_eq!(imp_frame(1000), IMP_FRAME_B);
                assert_eq!(imp_frame(1500), IMP_FRAME_A);
        }

        #[test]
        fn color_cycles_every_255_ms()
        {
                assert_eq!(color_cycle(0), 0);
                assert_eq!(color_cycle(254), 254);
                assert_eq!(color_cycle(255), 0);
                assert_eq!(color_cycle(600), 90);
        }

        #[test]
        fn setup_loads_keys_and_configures_material()
        {
                let mut demo = demo();
                let mut driver = RecordingDriver::default();

                demo.setup(&mut driver).unwrap();

                assert_eq!(
                        driver.calls,
                        vec![
                                Call::GetTexture(PathBuf::from("media/2ddemo.png")),
                                Call::ColorKey(SHEET, Position::new(0, 0)),
                                Call::GetFont(PathBuf::from("media/fonthaettenschweiler.ttf")),
                        ]
                );
                assert_eq!(demo.images, Some(SHEET));
                assert_eq!(demo.font, Some(BUILT_IN));
                assert_eq!(demo.font2, Some(FILE_FONT));
                assert!(driver.material.bilinear_filter);
                assert_eq!(driver.material.anti_aliasing, AntiAliasMode::FullBasic);
        }

        #[test]
        fn first_frame_draws_full_sequence()
        {
                let mut demo = demo();
                let mut driver = RecordingDriver::default();

                demo.setup(&mut driver).unwrap();

                let calls = draw_frame(&mut demo, &mut driver, 0, None);

                assert_eq!(
                        calls,
                        vec![
                                Call::BeginScene(Color::new(255, 120, 102, 136)),
                                Call::Image(
                                        SHEET,
                                        Position::new(50, 50),
                                        Rect::new(0, 0, 342, 224),
                                        Color::WHITE,
                                        true
                                ),
                                Call::Image(
                                        SHEET,
                                        Position::new(164, 125),
                                        IMP_FRAME_B,
                                        Color::WHITE,
                                        true
                                ),
                                Call::Image(
                                        SHEET,
                                        Position::new(270, 105),
                                        IMP_FRAME_B,
                                        Color::new(255, 0, 255, 255),
                                        true
                                ),
                                Call::Text(
                                        BUILT_IN,
                                        CAPTION.to_owned(),
                                        Rect::new(130, 10, 300, 50),
                                        Color::WHITE
                                ),
                                Call::Text(
                                        FILE_FONT,
                                        SUBCAPTION.to_owned(),
                                        Rect::new(130, 20, 300, 60),
                                        Color::new(255, 0, 0, 255)
                                ),
                                Call::EnableMaterial(true),
                                Call::Scaled(
                                        SHEET,
                                        Rect::new(10, 10, 108, 48),
                                        Rect::new(354, 87, 442, 118)
                                ),
                                Call::EnableMaterial(false),
                                Call::EndScene,
                        ]
                );
        }

        #[test]
        fn later_frame_switches_imp_and_cycles_colors()
        {
                let mut demo = demo();
                let mut driver = RecordingDriver::default();

                demo.setup(&mut driver).unwrap();

                let calls = draw_frame(&mut demo, &mut driver, 600, Some(Position::new(100, 80)));

                assert_eq!(
                        calls[2],
                        Call::Image(SHEET, Position::new(164, 125), IMP_FRAME_A, Color::WHITE, true)
                );
                assert_eq!(
                        calls[3],
                        Call::Image(
                                SHEET,
                                Position::new(270, 105),
                                IMP_FRAME_A,
                                Color::new(255, 90, 255, 255),
                                true
                        )
                );
                assert_eq!(
                        calls[5],
                        Call::Text(
                                FILE_FONT,
                                SUBCAPTION.to_owned(),
                                SUBCAPTION_RECT,
                                Color::new(255, 90, 90, 255)
                        )
                );
                assert_eq!(
                        calls[calls.len() - 2],
                        Call::Rectangle(Color::new(100, 255, 255, 255), Rect::new(80, 60, 120, 100))
                );
                assert_eq!(calls.last(), Some(&Call::EndScene));
        }

        #[test]
        fn missing_font_skips_its_text()
        {
                let mut demo = demo();
                let mut driver = RecordingDriver {
                        missing_font: true,
                        ..Default::default()
                };

                demo.setup(&mut driver).unwrap();

                assert_eq!(demo.font2, None);

                let calls = draw_frame(&mut demo, &mut driver, 0, None);

                let texts: Vec<_> = calls
                        .iter()
                        .filter(|call| matches!(call, Call::Text(..)))
                        .collect();

                assert_eq!(texts.len(), 1);
                assert!(matches!(texts[0], Call::Text(font, ..) if *font == BUILT_IN));
        }

        #[test]
        fn missing_texture_skips_images()
        {
                let mut demo = demo();
                let mut driver = RecordingDriver {
                        missing_texture: true,
                        ..Default::default()
                };

                demo.setup(&mut driver).unwrap();

                assert_eq!(demo.images, None);
                assert!(!driver.calls.iter().any(|call| matches!(call, Call::ColorKey(..))));

                let calls = draw_frame(&mut demo, &mut driver, 0, None);

                assert!(!calls.iter().any(|call| matches!(
                        call,
                        Call::Image(..) | Call::Scaled(..) | Call::EnableMaterial(_)
                )));
                assert_eq!(calls.first(), Some(&Call::BeginScene(CLEAR_COLOR)));
                assert_eq!(calls.last(), Some(&Call::EndScene));
                assert_eq!(calls.len(), 4);
        }
}
