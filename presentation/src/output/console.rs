//! Console output formatter for chat sessions

use colored::Colorize;
use dbl_chat_domain::{DeliveryMode, ModelSelection, ReadCursor, ResponseOutcome, ThreadId};
use std::fmt::Display;

/// Prompt shown while reading a turn.
pub const USER_PROMPT: &str = "you> ";

/// Formats session and response output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed when the REPL starts.
    pub fn welcome(model: &ModelSelection, mode: Option<DeliveryMode>) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("dbl-chat"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), model));
        output.push_str(&format!(
            "{} {}\n\n",
            "Delivery:".cyan().bold(),
            Self::mode_label(mode)
        ));
        output.push_str(&Self::help());
        output
    }

    pub fn help() -> String {
        let mut output = format!("{}\n", "Commands:".cyan().bold());
        output.push_str("  /help     - Show this help\n");
        output.push_str("  /status   - Show thread, model and read cursor\n");
        output.push_str("  /resume   - Keep waiting for the last unanswered turn\n");
        output.push_str("  /quit     - Exit chat\n");
        output
    }

    pub fn status(
        thread_id: &ThreadId,
        turns: usize,
        model: &ModelSelection,
        mode: Option<DeliveryMode>,
        cursor: ReadCursor,
    ) -> String {
        format!(
            "{} {}\n{} {}\n{} {}\n{} {}\n{} {}",
            "Thread:  ".cyan(),
            thread_id,
            "Turns:   ".cyan(),
            turns,
            "Model:   ".cyan(),
            model,
            "Delivery:".cyan(),
            Self::mode_label(mode),
            "Cursor:  ".cyan(),
            cursor
        )
    }

    /// A delivered response, prefixed with the assistant marker.
    pub fn outcome(outcome: &ResponseOutcome) -> String {
        let body = match outcome {
            ResponseOutcome::Output(text) => text.normal(),
            ResponseOutcome::ExecutionError { .. } => outcome.to_string().red(),
            ResponseOutcome::Denied(_) => outcome.to_string().yellow(),
            ResponseOutcome::NoOutput => outcome.to_string().dimmed(),
        };
        format!("{} {}", Self::assistant_prefix(), body)
    }

    /// The tail stream closed before the response arrived.
    pub fn missing() -> String {
        format!(
            "{} {}",
            Self::assistant_prefix(),
            "(no response yet; /resume to keep waiting)".dimmed()
        )
    }

    pub fn error(error: &dyn Display) -> String {
        format!("(error) {}", error).red().to_string()
    }

    pub fn cancelled() -> String {
        "(cancelled)".yellow().to_string()
    }

    pub fn exit() -> String {
        "(exit)".to_string()
    }

    fn assistant_prefix() -> String {
        "assistant>".green().bold().to_string()
    }

    fn mode_label(mode: Option<DeliveryMode>) -> String {
        match mode {
            Some(DeliveryMode::Tail) => "tail (streaming)".to_string(),
            Some(DeliveryMode::Poll) => "snapshot polling".to_string(),
            None => "none (gateway has no read surface)".red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}
