use crate::config::Config;

pub fn show_start_message(config: &Config)
{
        if !config.show_start_message
        {
                return;
        }

        let imps_string = r#"

    ░██████░███     ░███ ░█████████    ░██████
      ░██  ░████   ░████ ░██     ░██  ░██   ░██
      ░██  ░██░██ ░██░██ ░██     ░██ ░██
      ░██  ░██ ░████ ░██ ░█████████   ░████████
      ░██  ░██  ░██  ░██ ░██                 ░██
      ░██  ░██       ░██ ░██          ░██   ░██
    ░██████░██       ░██ ░██           ░██████

 2D Graphics Demo built with wgpu and Rust.
(ASCII art generated @ https://www.patorjk.com/software/taag/
[font: Terrace])

            "#;

        log::info!("{imps_string}")
}

pub fn config_logging()
{
        #[cfg(not(target_os = "android"))]
        {
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                        .init();

                log::info!("Running on native.");
        }

        #[cfg(target_os = "android")]
        {
                android_logger::init_once(
                        android_logger::Config::default()
                                .with_max_level(log::LevelFilter::Info)
                                .with_tag("imps"),
                );

                log::info!("Running on android.");
        }
}

pub fn create_config() -> Config
{
        Config::from_file().unwrap_or_else(|err| {
                log::warn!("Failed to load config: {err}, falling back to default");
                Config::default()
        })
}
