use std::{
        collections::HashMap,
        path::{Path, PathBuf},
};

use crate::{texture::Texture, video::TextureId};

/// Texture cache owned by the driver.
///
/// Textures are addressed by [`TextureId`]; loading the same path again
/// returns the id of the first load.
#[derive(Debug)]
pub struct Resources<T = Texture>
{
        pub textures: Vec<T>,
        pub paths: HashMap<PathBuf, TextureId>,
}

impl<T> Resources<T>
{
        pub fn new() -> Self
        {
                Self {
                        textures: Vec::new(),
                        paths: HashMap::new(),
                }
        }

        pub fn find(
                &self,
                path: &Path,
        ) -> Option<TextureId>
        {
                self.paths.get(path).copied()
        }

        /// Stores `texture`; with a `path` later [`Resources::find`] calls
        /// return its id.
        pub fn add_texture(
                &mut self,
                path: Option<&Path>,
                texture: T,
        ) -> TextureId
        {
                let id = TextureId(self.textures.len());

                self.textures.push(texture);

                if let Some(path) = path
                {
                        self.paths.insert(path.to_path_buf(), id);
                }

                id
        }

        pub fn get(
                &self,
                id: TextureId,
        ) -> Option<&T>
        {
                self.textures.get(id.0)
        }

        pub fn get_mut(
                &mut self,
                id: TextureId,
        ) -> Option<&mut T>
        {
                self.textures.get_mut(id.0)
        }
}

impl<T> Default for Resources<T>
{
        fn default() -> Self
        {
                Self::new()
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn path_loads_are_cached()
        {
                let mut resources = Resources::<&str>::new();

                let sheet = Path::new("media/2ddemo.png");

                assert_eq!(resources.find(sheet), None);

                let id = resources.add_texture(Some(sheet), "sheet");

                assert_eq!(resources.find(sheet), Some(id));
                assert_eq!(resources.find(Path::new("media/other.png")), None);
                assert_eq!(resources.get(id), Some(&"sheet"));
        }

        #[test]
        fn anonymous_textures_are_not_cached()
        {
                let mut resources = Resources::<&str>::new();

                let first = resources.add_texture(None, "white");
                let second = resources.add_texture(Some(Path::new("a.bmp")), "a");

                assert_ne!(first, second);
                assert_eq!(resources.paths.len(), 1);
                assert_eq!(resources.find(Path::new("a.bmp")), Some(second));

                *resources.get_mut(first).unwrap() = "keyed";

                assert_eq!(resources.get(first), Some(&"keyed"));
                assert_eq!(resources.get(TextureId(7)), None);
        }
}
