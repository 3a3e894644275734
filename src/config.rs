use std::path::{Path, PathBuf};

use blit::{Dimension, DriverType};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory.
pub const CONFIG_FILE: &str = "imps.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
        pub window_width: u32,
        pub window_height: u32,
        pub window_title: String,

        /// Skips the console prompt when set.
        pub driver: Option<DriverType>,

        pub media_dir: PathBuf,
        pub texture_file: String,
        /// TrueType or OpenType font under `media_dir`. Bitmap fonts such
        /// as `.bmp` glyph sheets are rejected when loaded.
        pub font_file: String,

        pub show_start_message: bool,
        pub show_exit_message: bool,
}

impl Config
{
        pub fn new() -> Self
        {
                Self {
                        window_width: 512,
                        window_height: 384,
                        window_title: String::from("imps - 2D Graphics Demo"),
                        driver: None,
                        media_dir: PathBuf::from(Self::default_media_dir()),
                        texture_file: String::from("2ddemo.png"),
                        font_file: String::from("fonthaettenschweiler.ttf"),
                        show_start_message: true,
                        show_exit_message: true,
                }
        }

        fn default_media_dir() -> &'static str
        {
                if cfg!(target_os = "android")
                {
                        "/sdcard/imps/media"
                }
                else
                {
                        "media"
                }
        }

        pub fn from_file() -> anyhow::Result<Self>
        {
                Self::from_path(Path::new(CONFIG_FILE))
        }

        pub fn from_path(path: &Path) -> anyhow::Result<Self>
        {
                let text = std::fs::read_to_string(path)
                        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;

                Self::from_toml(&text)
        }

        pub fn from_toml(text: &str) -> anyhow::Result<Self>
        {
                let config: Config = toml::from_str(text)?;

                if config.window_width == 0 || config.window_height == 0
                {
                        anyhow::bail!(
                                "Window size {}x{} is empty.",
                                config.window_width,
                                config.window_height
                        );
                }

                Ok(config)
        }

        pub fn window_size(&self) -> Dimension
        {
                Dimension::new(self.window_width, self.window_height)
        }

        pub fn texture_path(&self) -> PathBuf
        {
                self.media_dir.join(&self.texture_file)
        }

        pub fn font_path(&self) -> PathBuf
        {
                self.media_dir.join(&self.font_file)
        }
}

impl Default for Config
{
        fn default() -> Self
        {
                Self::new()
        }
}
