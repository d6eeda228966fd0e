//! Command-line argument parsing for the chat CLI.

use crate::config::ChatConfig;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Run the interactive chat (default)
    Chat(ChatOptions),
    /// Arguments could not be understood
    Usage(String),
}

/// Overrides for the environment-derived configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub no_stream: bool,
    pub url: Option<String>,
}

impl ChatOptions {
    pub fn apply(&self, mut config: ChatConfig) -> ChatConfig {
        if let Some(url) = &self.url {
            config = config.with_base_url(url.as_str());
        }
        if self.no_stream {
            config = config.with_streaming(false);
        }
        config
    }
}

pub const USAGE: &str = "usage: hospital-chat [--no-stream] [--url URL] [--version]";

/// Parse command-line arguments and return the appropriate command.
///
/// ```
/// use hospital_chat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["hospital-chat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = ChatOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--no-stream" => options.no_stream = true,
            "--url" => match args.next() {
                Some(url) => options.url = Some(url),
                None => return CliCommand::Usage("--url needs a value".to_string()),
            },
            other => {
                if let Some(url) = other.strip_prefix("--url=") {
                    options.url = Some(url.to_string());
                } else {
                    return CliCommand::Usage(format!("unknown argument: {}", other));
                }
            }
        }
    }
    CliCommand::Chat(options)
}
