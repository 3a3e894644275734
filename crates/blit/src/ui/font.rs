use std::{
        collections::HashMap,
        path::{Path, PathBuf},
        sync::Arc,
};

use derivative::Derivative;

use crate::video::FontId;

/// Pixel height of the always-available font.
pub const BUILT_IN_FONT_SIZE: f32 = 12.0;

/// Pixel height used for fonts loaded from disk.
pub const FILE_FONT_SIZE: f32 = 18.0;

/// Font definitions handed to egui plus the [`FontId`] lookup table.
///
/// Slot 0 is always the built-in font.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct FontRegistry
{
        #[derivative(Debug = "ignore")]
        pub definitions: egui::FontDefinitions,

        pub fonts: Vec<egui::FontId>,

        pub paths: HashMap<PathBuf, FontId>,

        /// Set when `definitions` changed and egui has not seen them yet.
        pub dirty: bool,
}

impl FontRegistry
{
        pub fn new() -> Self
        {
                Self {
                        definitions: egui::FontDefinitions::default(),
                        fonts: vec![egui::FontId::proportional(BUILT_IN_FONT_SIZE)],
                        paths: HashMap::new(),
                        dirty: true,
                }
        }

        pub fn built_in(&self) -> FontId
        {
                FontId(0)
        }

        pub fn get(
                &self,
                font: FontId,
        ) -> Option<&egui::FontId>
        {
                self.fonts.get(font.0)
        }

        /// Reads and registers the font at `path`, reusing an earlier load.
        pub fn load_file(
                &mut self,
                path: &Path,
        ) -> anyhow::Result<FontId>
        {
                if let Some(font) = self.paths.get(path)
                {
                        return Ok(*font);
                }

                let bytes = std::fs::read(path)
                        .map_err(|e| anyhow::anyhow!("Failed to read font {}: {e}", path.display()))?;

                let name = path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_else(|| format!("font_{}", self.fonts.len()));

                let font = self.add_font(&name, bytes)?;

                self.paths.insert(path.to_path_buf(), font);

                Ok(font)
        }

        /// Registers raw font bytes as a new family called `name`.
        pub fn add_font(
                &mut self,
                name: &str,
                bytes: Vec<u8>,
        ) -> anyhow::Result<FontId>
        {
                if !is_font_data(&bytes)
                {
                        anyhow::bail!("{name} is not a TrueType/OpenType font.");
                }

                let family = egui::FontFamily::Name(name.into());

                if self.definitions.families.contains_key(&family)
                {
                        anyhow::bail!("A font family named {name} is already registered.");
                }

                self.definitions
                        .font_data
                        .insert(name.to_owned(), Arc::new(egui::FontData::from_owned(bytes)));

                self.definitions
                        .families
                        .insert(family.clone(), vec![name.to_owned()]);

                let font = FontId(self.fonts.len());

                self.fonts.push(egui::FontId::new(FILE_FONT_SIZE, family));

                self.dirty = true;

                Ok(font)
        }
}

impl Default for FontRegistry
{
        fn default() -> Self
        {
                Self::new()
        }
}

/// Checks the sfnt signature of TrueType, OpenType and font collection files.
///
/// egui only parses font data on first use and panics on garbage, so files are
/// rejected up front.
pub fn is_font_data(bytes: &[u8]) -> bool
{
        matches!(
                bytes.get(..4),
                Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
        )
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn fake_ttf() -> Vec<u8>
        {
                let mut bytes = vec![0x00, 0x01, 0x00, 0x00];
                bytes.extend_from_slice(&[0; 12]);
                bytes
        }

        #[test]
        fn built_in_font_is_always_present()
        {
                let registry = FontRegistry::new();

                let font = registry.built_in();

                assert_eq!(
                        registry.get(font),
                        Some(&egui::FontId::proportional(BUILT_IN_FONT_SIZE))
                );
        }

        #[test]
        fn sniffing_rejects_bitmaps()
        {
                assert!(is_font_data(&fake_ttf()));
                assert!(is_font_data(b"OTTO...."));
                assert!(!is_font_data(b"BM\x36\x00\x00\x00"));
                assert!(!is_font_data(b"tt"));
        }

        #[test]
        fn added_font_gets_its_own_family()
        {
                let mut registry = FontRegistry::new();
                registry.dirty = false;

                let font = registry.add_font("haettenschweiler", fake_ttf()).unwrap();

                assert_eq!(font, FontId(1));
                assert!(registry.dirty);
                assert_eq!(
                        registry.get(font).map(|f| f.family.clone()),
                        Some(egui::FontFamily::Name("haettenschweiler".into()))
                );
                assert!(registry.add_font("haettenschweiler", fake_ttf()).is_err());
        }

        #[test]
        fn missing_or_invalid_files_fail()
        {
                let mut registry = FontRegistry::new();

                assert!(registry.load_file(Path::new("does/not/exist.ttf")).is_err());

                let path = std::env::temp_dir().join("blit_font_registry_not_a_font.bmp");
                std::fs::write(&path, b"BM not a font").unwrap();

                assert!(registry.load_file(&path).is_err());
                assert_eq!(registry.fonts.len(), 1);

                let _ = std::fs::remove_file(path);
        }
}
