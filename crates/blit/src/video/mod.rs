//! 2D video driver interface.
//!
//! [`VideoDriver`] is the only surface an application sees: resource loading,
//! the per-frame scene bracket and the 2D draw calls. The production
//! implementation is [`wgpu_driver::WgpuDriver`]; tests substitute a recording
//! implementation to check which calls a frame issues.
//!
//! Every draw call must happen between [`VideoDriver::begin_scene`] and
//! [`VideoDriver::end_scene`]. Draws outside that bracket are dropped.

use std::path::Path;

pub mod types;
pub mod wgpu_driver;

pub use types::{Color, Dimension, Position, Rect};

/// Handle to a texture owned by the driver's resource cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) usize);

/// Handle to a font owned by the driver's text renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub(crate) usize);

impl TextureId
{
        /// Handles for drivers other than [`wgpu_driver::WgpuDriver`].
        pub const fn from_index(index: usize) -> Self
        {
                Self(index)
        }

        pub fn index(self) -> usize
        {
                self.0
        }
}

impl FontId
{
        pub const fn from_index(index: usize) -> Self
        {
                Self(index)
        }

        pub fn index(self) -> usize
        {
                self.0
        }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntiAliasMode
{
        #[default]
        Off,
        /// Smoother sampling of scaled 2D images.
        FullBasic,
}

/// Render state applied to 2D draws while enabled with
/// [`VideoDriver::enable_material_2d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Material2D
{
        pub bilinear_filter: bool,
        pub anti_aliasing: AntiAliasMode,
}

/// Texture sampling mode derived from the active 2D material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter
{
        #[default]
        Nearest,
        Bilinear,
        Anisotropic,
}

impl Material2D
{
        pub fn filter(&self) -> Filter
        {
                match (self.bilinear_filter, self.anti_aliasing)
                {
                        (false, _) => Filter::Nearest,
                        (true, AntiAliasMode::Off) => Filter::Bilinear,
                        (true, AntiAliasMode::FullBasic) => Filter::Anisotropic,
                }
        }
}

pub trait VideoDriver
{
        /// Loads an image file, or returns the cached texture if `path` was
        /// loaded before.
        fn get_texture(
                &mut self,
                path: &Path,
        ) -> anyhow::Result<TextureId>;

        /// Makes every texel sharing the RGB value found at `key_position`
        /// fully transparent.
        fn make_color_key_texture(
                &mut self,
                texture: TextureId,
                key_position: Position,
        ) -> anyhow::Result<()>;

        /// Makes every texel with the RGB value of `key` fully transparent.
        fn make_color_key_texture_with_color(
                &mut self,
                texture: TextureId,
                key: Color,
        ) -> anyhow::Result<()>;

        fn texture_size(
                &self,
                texture: TextureId,
        ) -> Option<Dimension>;

        /// The font that is always available, no file needed.
        fn built_in_font(&mut self) -> Option<FontId>;

        /// Loads a TrueType/OpenType font from disk.
        fn get_font(
                &mut self,
                path: &Path,
        ) -> anyhow::Result<FontId>;

        fn material_2d_mut(&mut self) -> &mut Material2D;

        /// Toggles whether [`Material2D`] applies to subsequent 2D draws.
        fn enable_material_2d(
                &mut self,
                enable: bool,
        );

        fn begin_scene(
                &mut self,
                clear_color: Color,
        );

        /// Submits everything drawn since [`VideoDriver::begin_scene`] and
        /// presents the frame.
        fn end_scene(&mut self) -> anyhow::Result<()>;

        /// Draws `source` from `texture` unscaled with its upper-left corner
        /// at `destination`. The tint multiplies every texel. With
        /// `use_alpha_channel` unset the texture's alpha is ignored.
        fn draw_2d_image(
                &mut self,
                texture: TextureId,
                destination: Position,
                source: Rect,
                tint: Color,
                use_alpha_channel: bool,
        );

        /// Draws `source` stretched over `destination`, opaque and untinted.
        fn draw_2d_image_scaled(
                &mut self,
                texture: TextureId,
                destination: Rect,
                source: Rect,
        );

        fn draw_2d_rectangle(
                &mut self,
                color: Color,
                rect: Rect,
        );

        /// Draws single-line text starting at the upper-left corner of `rect`.
        fn draw_text(
                &mut self,
                font: FontId,
                text: &str,
                rect: Rect,
                color: Color,
        );

        fn screen_size(&self) -> Dimension;
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn material_filter_follows_flags()
        {
                let mut material = Material2D::default();

                assert_eq!(material.filter(), Filter::Nearest);

                material.anti_aliasing = AntiAliasMode::FullBasic;

                assert_eq!(material.filter(), Filter::Nearest);

                material.bilinear_filter = true;

                assert_eq!(material.filter(), Filter::Anisotropic);

                material.anti_aliasing = AntiAliasMode::Off;

                assert_eq!(material.filter(), Filter::Bilinear);
        }
}
