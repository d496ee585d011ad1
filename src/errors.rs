use colored::*;
use std::fmt;

#[derive(Debug)]
pub enum NotifyError {
    // Configuration errors
    ConfigNotFound,
    ConfigInvalid(String),

    // Event errors
    EventInvalid(String),

    // Delivery errors
    WebhookStatus(u16, String),
    Network(String),

    // Generic error
    Other(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::ConfigNotFound => {
                write!(f, "{}\n", "Configuration not found".red().bold())?;
                write!(f, "   {}\n\n", "Run 'ticketping init' to set up your webhook".dimmed())?;
                write!(f, "   {}", "ticketping init".green())
            }
            NotifyError::ConfigInvalid(msg) => {
                write!(f, "{}\n", "Invalid configuration".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check your config file: ~/.ticketping/config.toml\n")?;
                write!(f, "   2. Or reinitialize: {}", "ticketping init".green())
            }
            NotifyError::EventInvalid(msg) => {
                write!(f, "{}\n", "Could not parse ticket event".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   Expected a JSON document with a \"kind\" of\n")?;
                write!(f, "   \"created\", \"changed\" or \"deleted\" and a \"ticket\" object")
            }
            NotifyError::WebhookStatus(status, body) => {
                write!(f, "{}\n", format!("Webhook returned HTTP {}", status).red().bold())?;
                write!(f, "   {}\n\n", body.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check the webhook URL is still valid\n")?;
                write!(f, "   2. Update it with: {}", "ticketping config set slack.webhook <url>".green())
            }
            NotifyError::Network(msg) => {
                write!(f, "{}\n", "Network error".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check your internet connection\n")?;
                write!(f, "   2. Verify you can reach the webhook host\n")?;
                write!(f, "   3. Try again in a moment")
            }
            NotifyError::Other(msg) => {
                write!(f, "{}\n", "Error".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<anyhow::Error> for NotifyError {
    fn from(err: anyhow::Error) -> Self {
        NotifyError::Other(err.to_string())
    }
}

impl From<std::io::Error> for NotifyError {
    fn from(err: std::io::Error) -> Self {
        NotifyError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        NotifyError::Other(err.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            NotifyError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            NotifyError::WebhookStatus(status.as_u16(), err.to_string())
        } else {
            NotifyError::Other(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
