use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

mod api;
mod config;
mod errors;
mod models;
mod notifier;

#[derive(Parser)]
#[command(name = "ticketping")]
#[command(version = "0.1.0")]
#[command(about = "Post ticket events to a Slack-compatible webhook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the webhook configuration
    Init,

    /// Read a ticket callback as JSON and deliver the notification
    Notify {
        /// Path to the event file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print the message without posting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a test message to the configured webhook
    Test,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration (with masked webhook)
    Show,

    /// Set a specific configuration value
    Set {
        /// Configuration key (e.g., slack.channel, slack.fields)
        key: String,
        /// New value
        value: String,
    },

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init().await,

        Commands::Notify { file, dry_run } => handle_notify(file.as_deref(), dry_run).await,

        Commands::Test => handle_test().await,

        Commands::Config { action } => handle_config(action),
    };

    if let Err(e) = result {
        eprintln!("\n{}", e);
        std::process::exit(1);
    }
}

async fn handle_notify(file: Option<&Path>, dry_run: bool) -> anyhow::Result<()> {
    use config::settings::Settings;
    use models::event::TicketEvent;
    use models::ticket::TicketCallback;

    let settings = Settings::load()?;

    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    let callback: TicketCallback = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("{}", errors::NotifyError::EventInvalid(e.to_string())))?;

    let event = match &callback {
        TicketCallback::Created { ticket } => TicketEvent::created(ticket),
        TicketCallback::Changed {
            ticket,
            comment,
            author,
            old_values,
        } => TicketEvent::changed(ticket, comment, author, old_values),
        TicketCallback::Deleted { ticket } => {
            println!(
                "{}",
                format!("Ticket #{} deleted - nothing to announce", ticket.id).dimmed()
            );
            return Ok(());
        }
    };

    let text = notifier::message::build_message(&event, &settings.slack);
    println!("{}", text);

    if dry_run {
        println!();
        println!("{}", "Dry run - nothing was sent".yellow());
        return Ok(());
    }

    let notifier = notifier::Notifier::new(settings.slack);
    match notifier.deliver(&text).await {
        Ok(()) => {
            println!();
            println!("{}", "Notification delivered!".green().bold());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{}", e)),
    }
}

async fn handle_test() -> anyhow::Result<()> {
    use config::settings::Settings;

    let settings = Settings::load()?;

    println!("{}", "Sending test message...".cyan());
    println!(
        "{}",
        format!(
            "  Channel: {}  Username: {}",
            settings.slack.channel, settings.slack.username
        )
        .dimmed()
    );

    let notifier = notifier::Notifier::new(settings.slack);
    notifier
        .deliver(":incoming_envelope: ticketping test message")
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!();
    println!("{}", "Test message delivered!".green().bold());

    Ok(())
}

async fn handle_init() -> anyhow::Result<()> {
    use config::settings::{Settings, SlackConfig};

    println!("{}", "ticketping Configuration Setup".cyan().bold());
    println!();
    println!(
        "{}",
        "This will store your webhook URL in ~/.ticketping/config.toml".dimmed()
    );
    println!(
        "{}",
        "The file will be created with read-only permissions (600)".dimmed()
    );
    println!();

    let defaults = SlackConfig::default();

    let webhook = prompt_with_default("Incoming webhook URL", &defaults.webhook)?;
    let channel = prompt_with_default("Channel name", &defaults.channel)?;
    let username = prompt_with_default("Bot username", &defaults.username)?;
    let fields_raw = prompt_with_default(
        "Ticket fields to report (comma-separated)",
        &defaults.fields.join(","),
    )?;

    let settings = Settings {
        slack: SlackConfig {
            webhook,
            channel,
            username,
            fields: SlackConfig::parse_fields(&fields_raw),
        },
    };

    settings.save()?;

    let config_path = Settings::config_path()?;
    println!();
    println!("{}", "Configuration saved!".green().bold());
    println!(
        "  Location: {}",
        config_path.display().to_string().bright_white()
    );
    println!();
    println!("{}", "Keep your webhook URL secure!".yellow());
    println!("{}", "  Anyone holding it can post to your channel".dimmed());

    let verify = prompt_with_default("Send a test message to verify? (y/n)", "n")?;
    if verify.eq_ignore_ascii_case("y") {
        println!();
        let notifier = notifier::Notifier::new(settings.slack);
        match notifier
            .deliver(":incoming_envelope: ticketping is set up")
            .await
        {
            Ok(()) => println!("{}", "✓ Test message delivered".green()),
            Err(e) => {
                println!("{}", format!("  Could not deliver: {}", e).yellow());
                println!("{}", "    (Configuration was saved anyway)".dimmed());
            }
        }
    }

    Ok(())
}

fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    use config::settings::{Settings, SlackConfig};

    match action {
        ConfigAction::Show => {
            let settings = Settings::load()?;

            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[slack]".bold());
            println!(
                "  {} {}",
                "webhook:".dimmed(),
                mask_webhook(&settings.slack.webhook).yellow()
            );
            println!(
                "  {} {}",
                "channel:".dimmed(),
                settings.slack.channel.bright_white()
            );
            println!(
                "  {} {}",
                "username:".dimmed(),
                settings.slack.username.bright_white()
            );
            println!(
                "  {} {}",
                "fields:".dimmed(),
                settings.slack.fields.join(",").bright_white()
            );

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;

            match key.as_str() {
                "slack.webhook" => settings.slack.webhook = value.clone(),
                "slack.channel" => settings.slack.channel = value.clone(),
                "slack.username" => settings.slack.username = value.clone(),
                "slack.fields" => settings.slack.fields = SlackConfig::parse_fields(&value),
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unknown configuration key: {}. Use slack.webhook, slack.channel, slack.username or slack.fields",
                        key
                    ))
                }
            }

            settings.save()?;

            println!("{}", format!("✓ Updated {} to: {}", key, value).green().bold());

            Ok(())
        }

        ConfigAction::Path => {
            let config_path = Settings::config_path()?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

/// Hides the secret part of a webhook URL, keeping scheme and host visible.
fn mask_webhook(url: &str) -> String {
    let path_start = url
        .find("://")
        .and_then(|idx| url[idx + 3..].find('/').map(|rel| idx + 3 + rel));

    match path_start {
        Some(idx) => format!("{}/***", &url[..idx]),
        None => url.to_string(),
    }
}

fn prompt_with_default(message: &str, default: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{} [{}]: ", message.bright_white(), default.dimmed());
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_webhook_hides_token_path() {
        assert_eq!(
            mask_webhook("https://hooks.slack.com/services/T0/B0/secret"),
            "https://hooks.slack.com/***"
        );
    }

    #[test]
    fn test_mask_webhook_without_path() {
        assert_eq!(
            mask_webhook("https://hooks.slack.com"),
            "https://hooks.slack.com"
        );
    }

    #[test]
    fn test_mask_webhook_without_scheme() {
        assert_eq!(mask_webhook("not a url"), "not a url");
    }
}
