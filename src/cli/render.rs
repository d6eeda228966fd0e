//! Line-based rendering of conversation updates.
//!
//! Snapshots arrive once per stream event; the printer only writes what is
//! new since the previous snapshot, so a streaming answer appears token by
//! token on a plain terminal.

use std::io::{self, Write};

use crate::models::{ConversationMessage, MessageId, QuickReply};
use crate::session::{ChatUpdate, Notice, Severity};
use crate::state::ConversationState;

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const PROGRESS: &str = "⠋";
}

/// Print the welcome header with quick reply suggestions.
///
/// ```text
/// Hospital AI Assistant
/// ════════════════════════════════════════════════════════════
/// How can I help you today?
///
///   [faq_0] What are the visiting hours?
/// ```
pub fn print_welcome<W: Write>(
    out: &mut W,
    title: &str,
    greeting: &str,
    replies: &[QuickReply],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "═".repeat(LINE_WIDTH))?;
    writeln!(out, "{}", greeting)?;
    if !replies.is_empty() {
        writeln!(out)?;
        for reply in replies {
            writeln!(out, "  [{}] {}", reply.id, reply.label)?;
        }
    }
    writeln!(out)?;
    out.flush()
}

pub fn print_notice<W: Write>(out: &mut W, notice: &Notice) -> io::Result<()> {
    let icon = match notice.severity {
        Severity::Info => icons::INFO,
        Severity::Warning => icons::WARNING,
        Severity::Error => icons::FAILURE,
    };
    writeln!(out, "  {} {}: {}", icon, notice.title, notice.description)?;
    out.flush()
}

/// Incremental printer for the assistant side of the conversation.
#[derive(Debug)]
pub struct TranscriptPrinter<W> {
    out: W,
    current: Option<MessageId>,
    /// Answer text already written for `current`
    printed: String,
    progress_shown: bool,
    finished: bool,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: None,
            printed: String::new(),
            progress_shown: false,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, update: &ChatUpdate) -> io::Result<()> {
        match update {
            ChatUpdate::Snapshot(state) => self.render_snapshot(state),
            ChatUpdate::Notice(notice) => {
                self.clear_progress()?;
                if self.current.is_some() && !self.finished && !self.printed.is_empty() {
                    writeln!(self.out)?;
                    self.printed.clear();
                }
                print_notice(&mut self.out, notice)
            }
        }
    }

    fn render_snapshot(&mut self, state: &ConversationState) -> io::Result<()> {
        let Some(message) = state.last_message() else {
            self.current = None;
            return Ok(());
        };
        if message.is_user() {
            return Ok(());
        }

        if self.current != Some(message.id()) {
            self.current = Some(message.id());
            self.printed.clear();
            self.progress_shown = false;
            self.finished = false;
        }
        if self.finished {
            return Ok(());
        }

        if message.is_streaming() {
            self.render_streaming(message)?;
        } else {
            self.render_final(message)?;
        }
        self.out.flush()
    }

    fn render_streaming(&mut self, message: &ConversationMessage) -> io::Result<()> {
        if let Some(progress) = message.progress() {
            // A progress line only makes sense before the answer starts
            if self.printed.is_empty() {
                self.clear_progress()?;
                write!(self.out, "  {} {}", icons::PROGRESS, progress)?;
                self.progress_shown = true;
            }
            return Ok(());
        }

        self.clear_progress()?;
        self.write_answer(message.answer())
    }

    fn render_final(&mut self, message: &ConversationMessage) -> io::Result<()> {
        self.clear_progress()?;
        self.write_answer(message.text())?;
        writeln!(self.out)?;

        if let Some(sources) = message.sources().filter(|s| !s.is_empty()) {
            writeln!(self.out, "  sources: {}", sources.join(", "))?;
        }
        self.finished = true;
        Ok(())
    }

    /// Write the part of `text` not yet on screen, or all of it on a fresh
    /// line if it no longer extends what was printed.
    fn write_answer(&mut self, text: &str) -> io::Result<()> {
        match text.strip_prefix(self.printed.as_str()) {
            Some(rest) => write!(self.out, "{}", rest)?,
            None => {
                writeln!(self.out)?;
                write!(self.out, "{}", text)?;
            }
        }
        self.printed.clear();
        self.printed.push_str(text);
        Ok(())
    }

    fn clear_progress(&mut self) -> io::Result<()> {
        if self.progress_shown {
            write!(self.out, "\r{}\r", " ".repeat(LINE_WIDTH))?;
            self.progress_shown = false;
        }
        Ok(())
    }
}
