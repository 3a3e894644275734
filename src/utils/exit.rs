use colored::*;

use crate::{config::Config, utils::random::random_index};

const MESSAGES: [(&str, &str); 8] = [
        ("The imps have gone back into their sprite sheet.", "red"),
        ("The imps were color keyed out of existence.", "magenta"),
        ("The last frame has been blitted.", "yellow"),
        ("The imps stopped blinking every 500 ms.", "cyan"),
        ("Scene ended, swap chain presented for the last time.", "green"),
        ("The imps went transparent, the background won.", "blue"),
        ("No more 2D graphics for today.", "purple"),
        ("The haettenschweiler font was released.", "bright yellow"),
];

/// Colored farewell line, empty when disabled in the config.
pub fn get_exit_message(config: &Config) -> String
{
        if !config.show_exit_message
        {
                return String::new();
        }

        let choice = random_index(MESSAGES.len()).unwrap_or(0);

        let (message, color) = MESSAGES[choice];

        match color
        {
                "red" => message.red().to_string(),
                "magenta" => message.magenta().to_string(),
                "yellow" => message.yellow().to_string(),
                "cyan" => message.cyan().to_string(),
                "green" => message.green().to_string(),
                "blue" => message.blue().to_string(),
                "purple" => message.purple().to_string(),
                "bright yellow" => message.bright_yellow().to_string(),
                _ => message.to_string(),
        }
}

pub fn show_exit_message(config: &Config)
{
        let msg = get_exit_message(config);

        if !msg.is_empty()
        {
                log::info!("{msg}");
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn disabled_message_is_empty()
        {
                let config = Config {
                        show_exit_message: false,
                        ..Config::default()
                };

                assert!(get_exit_message(&config).is_empty());
        }

        #[test]
        fn message_comes_from_the_list()
        {
                colored::control::set_override(false);

                let msg = get_exit_message(&Config::default());

                assert!(MESSAGES.iter().any(|(text, _)| *text == msg));
        }
}
