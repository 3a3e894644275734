/// 32-bit ARGB color, 8 bits per channel.
///
/// Channels are stored in sRGB space, exactly as they appear in image files
/// and in the constants of the calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color
{
        pub a: u8,
        pub r: u8,
        pub g: u8,
        pub b: u8,
}

impl Color
{
        pub const WHITE: Color = Color::new(255, 255, 255, 255);

        pub const BLACK: Color = Color::new(255, 0, 0, 0);

        /// Argument order follows the ARGB storage order.
        pub const fn new(
                a: u8,
                r: u8,
                g: u8,
                b: u8,
        ) -> Self
        {
                Self {
                        a,
                        r,
                        g,
                        b,
                }
        }

        pub fn from_rgba(rgba: image::Rgba<u8>) -> Self
        {
                let [r, g, b, a] = rgba.0;

                Self::new(a, r, g, b)
        }

        pub fn to_rgba(self) -> image::Rgba<u8>
        {
                image::Rgba([self.r, self.g, self.b, self.a])
        }

        /// Linear-space RGBA in `0.0..=1.0`, as expected by an sRGB render
        /// target. Alpha is never gamma encoded.
        pub fn to_linear(self) -> [f32; 4]
        {
                [
                        srgb_to_linear(self.r),
                        srgb_to_linear(self.g),
                        srgb_to_linear(self.b),
                        self.a as f32 / 255.0,
                ]
        }

        pub fn to_wgpu(self) -> wgpu::Color
        {
                let [r, g, b, a] = self.to_linear();

                wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                }
        }

        pub fn to_egui(self) -> egui::Color32
        {
                egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
        }
}

fn srgb_to_linear(channel: u8) -> f32
{
        let c = channel as f32 / 255.0;

        if c <= 0.04045
        {
                c / 12.92
        }
        else
        {
                ((c + 0.055) / 1.055).powf(2.4)
        }
}

/// Integer 2D position in screen or texel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position
{
        pub x: i32,
        pub y: i32,
}

impl Position
{
        pub const fn new(
                x: i32,
                y: i32,
        ) -> Self
        {
                Self {
                        x,
                        y,
                }
        }
}

/// Unsigned width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension
{
        pub width: u32,
        pub height: u32,
}

impl Dimension
{
        pub const fn new(
                width: u32,
                height: u32,
        ) -> Self
        {
                Self {
                        width,
                        height,
                }
        }
}

/// Axis-aligned integer rectangle given by its upper-left corner (inclusive)
/// and lower-right corner (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect
{
        pub upper_left: Position,
        pub lower_right: Position,
}

impl Rect
{
        pub const fn new(
                x0: i32,
                y0: i32,
                x1: i32,
                y1: i32,
        ) -> Self
        {
                Self {
                        upper_left: Position::new(x0, y0),
                        lower_right: Position::new(x1, y1),
                }
        }

        /// Square of side `2 * half_extent` centered on `center`.
        pub const fn around(
                center: Position,
                half_extent: i32,
        ) -> Self
        {
                Self::new(
                        center.x - half_extent,
                        center.y - half_extent,
                        center.x + half_extent,
                        center.y + half_extent,
                )
        }

        pub const fn width(&self) -> i32
        {
                self.lower_right.x - self.upper_left.x
        }

        pub const fn height(&self) -> i32
        {
                self.lower_right.y - self.upper_left.y
        }

        pub const fn is_empty(&self) -> bool
        {
                self.width() <= 0 || self.height() <= 0
        }

        /// Same size, moved so the upper-left corner sits at `position`.
        pub const fn moved_to(
                &self,
                position: Position,
        ) -> Self
        {
                Self::new(
                        position.x,
                        position.y,
                        position.x + self.width(),
                        position.y + self.height(),
                )
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn rect_extent_and_move()
        {
                let imp = Rect::new(349, 15, 385, 78);

                assert_eq!(imp.width(), 36);
                assert_eq!(imp.height(), 63);

                let moved = imp.moved_to(Position::new(164, 125));

                assert_eq!(moved, Rect::new(164, 125, 200, 188));
        }

        #[test]
        fn rect_around_cursor()
        {
                let rect = Rect::around(Position::new(100, 40), 20);

                assert_eq!(rect, Rect::new(80, 20, 120, 60));
                assert!(!rect.is_empty());
                assert!(Rect::new(5, 5, 5, 9).is_empty());
        }

        #[test]
        fn srgb_endpoints_are_exact()
        {
                assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0, 1.0]);
                assert_eq!(Color::new(0, 0, 0, 0).to_linear(), [0.0, 0.0, 0.0, 0.0]);
        }

        #[test]
        fn alpha_stays_linear()
        {
                let [r, _, _, a] = Color::new(100, 128, 255, 255).to_linear();

                assert!((a - 100.0 / 255.0).abs() < f32::EPSILON);
                // mid grey in sRGB is roughly 0.2 in linear space
                assert!(r > 0.2 && r < 0.23);
        }

        #[test]
        fn rgba_round_trip_keeps_channel_order()
        {
                let color = Color::new(10, 20, 30, 40);

                assert_eq!(color.to_rgba(), image::Rgba([20, 30, 40, 10]));
                assert_eq!(Color::from_rgba(color.to_rgba()), color);
        }
}
