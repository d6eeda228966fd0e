use color_eyre::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;

use hospital_chat::cli::{
    parse_args, print_notice, print_welcome, version_line, CliCommand, TranscriptPrinter, USAGE,
};
use hospital_chat::models::{quick_replies, HospitalInfo, QuickReply};
use hospital_chat::{ChatClient, ChatConfig, ChatSession, ChatUpdate, Notice, SendError};

/// Log to stderr so stdout stays reserved for the conversation.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hospital_chat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Handle --version and bad arguments before any initialization
    let options = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Usage(problem) => {
            eprintln!("{}\n{}", problem, USAGE);
            std::process::exit(2);
        }
        CliCommand::Chat(options) => options,
    };

    color_eyre::install()?;
    init_tracing();

    let config = options.apply(ChatConfig::from_env());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: ChatConfig) -> Result<()> {
    let locale = config.locale;
    let streaming = config.streaming;
    let reply_limit = config.quick_reply_limit;
    tracing::info!(base_url = %config.base_url, streaming, "Starting chat");

    let client = ChatClient::from_config(config)?;
    let mut stdout = std::io::stdout();

    match client.health().await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Backend reports itself unhealthy"),
        Err(err) => tracing::warn!(error = %err, "Backend health check failed"),
    }

    let info = match client.hospital_info().await {
        Ok(info) => info,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load hospital info");
            eprintln!("  {}", err.user_message());
            print_notice(
                &mut stdout,
                &Notice::error(locale.load_error_title(), locale.load_info_failed()),
            )?;
            HospitalInfo::default()
        }
    };
    let replies = quick_replies(&info, reply_limit);
    print_welcome(&mut stdout, info.display_name(), locale.greeting(), &replies)?;

    let (updates_tx, mut updates) = mpsc::unbounded_channel();
    let mut session = ChatSession::new(client, updates_tx);
    let mut printer = TranscriptPrinter::new(std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let input = line.trim();
        match input {
            "" => continue,
            "/quit" => break,
            "/new" => {
                if let Err(err) = session.new_conversation().await {
                    eprintln!("{}", err);
                }
                drain(&mut updates, &mut printer)?;
                println!("{}", locale.greeting());
                continue;
            }
            _ => {}
        }

        let text = resolve_quick_reply(&replies, input);

        // Ctrl+C while an answer is streaming stops that answer only
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = cancel_tx.send(());
            }
        });

        let result = {
            let send = async {
                if streaming {
                    session.send_with_cancel(text, cancel_rx).await
                } else {
                    session.send_without_streaming(text).await
                }
            };
            tokio::pin!(send);

            loop {
                tokio::select! {
                    result = &mut send => break result,
                    Some(update) = updates.recv() => printer.render(&update)?,
                }
            }
        };
        watcher.abort();
        drain(&mut updates, &mut printer)?;

        match result {
            Ok(summary) => tracing::debug!(
                outcome = ?summary.outcome,
                events = summary.stats.events,
                dropped = summary.stats.dropped,
                "Send finished"
            ),
            // The localized notice is already on screen; add the operator hint
            Err(SendError::Transport(err)) => eprintln!("  {}", err.user_message()),
            Err(err) => eprintln!("{}", err),
        }
    }

    Ok(())
}

/// Typing a quick reply id sends its full question.
fn resolve_quick_reply<'a>(replies: &'a [QuickReply], input: &'a str) -> &'a str {
    replies
        .iter()
        .find(|reply| reply.id == input)
        .map(|reply| reply.full_text.as_str())
        .unwrap_or(input)
}

fn drain<W: Write>(
    updates: &mut mpsc::UnboundedReceiver<ChatUpdate>,
    printer: &mut TranscriptPrinter<W>,
) -> std::io::Result<()> {
    while let Ok(update) = updates.try_recv() {
        printer.render(&update)?;
    }
    Ok(())
}
