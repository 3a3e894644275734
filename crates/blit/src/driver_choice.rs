//! Graphics backend selection.
//!
//! [`driver_choice_console`] lists the backends usable on the current target
//! and lets the user pick one by letter. Anything else means "exit".

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverType
{
        Vulkan,
        Metal,
        #[serde(rename = "direct3d12")]
        Direct3D12,
        #[serde(rename = "opengl")]
        OpenGl,
        /// Software rasterizer, whichever fallback adapter the platform has.
        Software,
}

impl DriverType
{
        pub const ALL: [DriverType; 5] = [
                DriverType::Vulkan,
                DriverType::Metal,
                DriverType::Direct3D12,
                DriverType::OpenGl,
                DriverType::Software,
        ];

        pub fn name(self) -> &'static str
        {
                match self
                {
                        DriverType::Vulkan => "Vulkan",
                        DriverType::Metal => "Metal",
                        DriverType::Direct3D12 => "Direct3D 12",
                        DriverType::OpenGl => "OpenGL / OpenGL ES",
                        DriverType::Software => "Software Renderer",
                }
        }

        pub fn backends(self) -> wgpu::Backends
        {
                match self
                {
                        DriverType::Vulkan => wgpu::Backends::VULKAN,
                        DriverType::Metal => wgpu::Backends::METAL,
                        DriverType::Direct3D12 => wgpu::Backends::DX12,
                        DriverType::OpenGl => wgpu::Backends::GL,
                        DriverType::Software => wgpu::Backends::all(),
                }
        }

        pub fn force_fallback_adapter(self) -> bool
        {
                self == DriverType::Software
        }

        /// Whether the current target can possibly provide this backend.
        pub fn is_supported(self) -> bool
        {
                match self
                {
                        DriverType::Vulkan => cfg!(any(
                                target_os = "windows",
                                target_os = "linux",
                                target_os = "android"
                        )),
                        DriverType::Metal => cfg!(any(target_os = "macos", target_os = "ios")),
                        DriverType::Direct3D12 => cfg!(target_os = "windows"),
                        DriverType::OpenGl => true,
                        DriverType::Software => true,
                }
        }

        pub fn supported() -> Vec<DriverType>
        {
                Self::ALL
                        .into_iter()
                        .filter(|driver| driver.is_supported())
                        .collect()
        }

        /// Backend used when nothing was chosen explicitly, e.g. on Android.
        pub fn platform_default() -> DriverType
        {
                if cfg!(target_os = "android")
                {
                        DriverType::OpenGl
                }
                else if cfg!(any(target_os = "macos", target_os = "ios"))
                {
                        DriverType::Metal
                }
                else
                {
                        DriverType::Vulkan
                }
        }
}

impl std::fmt::Display for DriverType
{
        fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result
        {
                f.write_str(self.name())
        }
}

/// Asks the user on the console which driver to use.
///
/// Returns `Ok(None)` when the user picks the exit option, enters nothing, or
/// the input is closed.
pub fn driver_choice_console<R, W>(
        input: &mut R,
        output: &mut W,
) -> anyhow::Result<Option<DriverType>>
where
        R: BufRead,
        W: Write,
{
        let drivers = DriverType::supported();

        writeln!(output, "Please select the driver you want:")?;

        for (letter, driver) in ('a'..='z').zip(drivers.iter())
        {
                writeln!(output, " ({letter}) {driver}")?;
        }

        writeln!(output, " (otherKey) exit")?;
        writeln!(output)?;

        output.flush()?;

        let mut line = String::new();

        if input.read_line(&mut line)? == 0
        {
                return Ok(None);
        }

        Ok(pick(&drivers, &line))
}

fn pick(
        drivers: &[DriverType],
        line: &str,
) -> Option<DriverType>
{
        let key = line.trim().chars().next()?.to_ascii_lowercase();

        if !key.is_ascii_lowercase()
        {
                return None;
        }

        let index = (key as u8 - b'a') as usize;

        drivers.get(index).copied()
}

#[cfg(test)]
mod tests
{
        use std::io::Cursor;

        use super::*;

        fn choose(input: &str) -> (Option<DriverType>, String)
        {
                let mut reader = Cursor::new(input.as_bytes().to_vec());
                let mut output = Vec::new();

                let choice = driver_choice_console(&mut reader, &mut output).unwrap();

                (choice, String::from_utf8(output).unwrap())
        }

        #[test]
        fn first_letter_selects_first_supported_driver()
        {
                let supported = DriverType::supported();

                let (choice, prompt) = choose("a\n");

                assert_eq!(choice, supported.first().copied());
                assert!(prompt.starts_with("Please select the driver you want:"));
                assert!(prompt.contains(" (otherKey) exit"));
        }

        #[test]
        fn uppercase_and_whitespace_are_accepted()
        {
                let supported = DriverType::supported();

                let (choice, _) = choose("  B \n");

                assert_eq!(choice, supported.get(1).copied());
        }

        #[test]
        fn other_keys_mean_exit()
        {
                assert_eq!(choose("z\n").0, None);
                assert_eq!(choose("1\n").0, None);
                assert_eq!(choose("\n").0, None);
                assert_eq!(choose("").0, None);
        }

        #[test]
        fn prompt_lists_every_supported_driver()
        {
                let (_, prompt) = choose("");

                for (letter, driver) in ('a'..='z').zip(DriverType::supported())
                {
                        assert!(prompt.contains(&format!(" ({letter}) {driver}")));
                }
        }

        #[test]
        fn software_driver_forces_fallback()
        {
                assert!(DriverType::Software.force_fallback_adapter());
                assert!(!DriverType::Vulkan.force_fallback_adapter());
                assert_eq!(DriverType::OpenGl.backends(), wgpu::Backends::GL);
                assert!(DriverType::OpenGl.is_supported());
        }
}
