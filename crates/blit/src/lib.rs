//! blit: a small 2D video layer on top of wgpu and winit.
//!
//! Applications implement [`engine::Scene2D`] and talk to the GPU through the
//! [`video::VideoDriver`] trait: load textures and fonts, open a scene, blit
//! images, fill rectangles, draw text, close the scene.

pub mod driver_choice;
pub mod engine;
pub mod input;
pub mod lifecycle;
pub mod renderer;
pub mod resource;
pub mod texture;
pub mod timer;
pub mod ui;
pub mod video;

pub use driver_choice::{DriverType, driver_choice_console};
pub use engine::{Engine, EngineBuilder, EngineRunner, FrameContext, LoopPolicy, Scene2D};
pub use video::{
        AntiAliasMode, Color, Dimension, FontId, Material2D, Position, Rect, TextureId, VideoDriver,
};
