//! Bot initialization and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::download::preset::QualityPreset;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "how to use the bot")]
    Start,
    #[command(description = "show available qualities")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid BOT_API_URL or HTTP client setup failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.as_str();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set");
    }

    // Uploads of up to 50 MB need a much longer timeout than teloxide's default
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token, client);

    let bot = match config::bot_api::get_url() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "how to use the bot"),
        BotCommand::new("help", "show available qualities"),
    ])
    .await?;

    Ok(())
}

/// Text for /start and /help
pub fn welcome_text(presets: &[QualityPreset], max_upload_bytes: u64) -> String {
    let qualities = presets.iter().map(|p| p.label()).collect::<Vec<_>>().join("\n");
    format!(
        "Send me a YouTube link (youtube.com or youtu.be) and pick a quality:\n\n{}\n\nFiles are limited to {} MB.",
        qualities,
        max_upload_bytes / (1024 * 1024)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse() {
        assert_eq!(Command::parse("/start", "tubegrab_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help", "tubegrab_bot").unwrap(), Command::Help);
        assert!(Command::parse("/download", "tubegrab_bot").is_err());
    }

    #[test]
    fn test_welcome_lists_presets() {
        let text = welcome_text(&QualityPreset::DEFAULT_MENU, 50 * 1024 * 1024);
        assert!(text.contains("limited to 50 MB"));
        assert!(text.contains("🎧 MP3 Audio"));
        assert!(text.contains("💻 720p"));
        assert!(!text.contains("1080p"));
    }
}
