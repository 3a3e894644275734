//! Font loading and text drawing.

pub mod font;
pub mod text;

pub use font::FontRegistry;
pub use text::TextRenderer;
