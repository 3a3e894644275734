pub mod config;
pub mod demo;
pub mod utils;

use blit::{EngineBuilder, EngineRunner, LoopPolicy, driver_choice_console};

pub use crate::config::Config;
use crate::demo::TwoDDemo;

/// Desktop entry point.
///
/// Asks for a driver unless the config names one, then runs the demo until
/// the window is closed.
///
/// # Errors
/// When no driver was picked or the picked one could not be created.
pub fn run_imps() -> anyhow::Result<()>
{
        utils::bootstrap::config_logging();

        let config = utils::bootstrap::create_config();

        utils::bootstrap::show_start_message(&config);

        let driver = match config.driver
        {
                Some(driver) => driver,
                None =>
                {
                        let mut input = std::io::stdin().lock();
                        let mut output = std::io::stdout();

                        match driver_choice_console(&mut input, &mut output)?
                        {
                                Some(driver) => driver,
                                None => anyhow::bail!("No driver selected."),
                        }
                }
        };

        log::info!("Using {driver}");

        let demo = TwoDDemo::new(config.texture_path(), config.font_path());

        let engine = EngineBuilder::new(demo)
                .with_driver(driver)
                .with_window_size(config.window_size())
                .with_title(&config.window_title)
                .with_loop_policy(LoopPolicy::Desktop)
                .build()?;

        let runner = EngineRunner::new(engine)?;

        runner.run()?;

        utils::exit::show_exit_message(&config);

        Ok(())
}

/// Android entry point, called by the native activity glue.
///
/// No prompt here: the driver comes from the config or the platform default.
#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(app: winit::platform::android::activity::AndroidApp)
{
        utils::bootstrap::config_logging();

        if let Err(e) = run_imps_android(app)
        {
                log::error!("imps stopped: {e:#}");
        }
}

#[cfg(target_os = "android")]
fn run_imps_android(app: winit::platform::android::activity::AndroidApp) -> anyhow::Result<()>
{
        let config = utils::bootstrap::create_config();

        utils::bootstrap::show_start_message(&config);

        let driver = config
                .driver
                .unwrap_or_else(blit::DriverType::platform_default);

        let demo = TwoDDemo::new(config.texture_path(), config.font_path());

        let engine = EngineBuilder::new(demo)
                .with_driver(driver)
                .with_title(&config.window_title)
                .with_loop_policy(LoopPolicy::Mobile)
                .build()?;

        EngineRunner::with_android_app(engine, app)?.run()?;

        utils::exit::show_exit_message(&config);

        Ok(())
}
