//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::{ConsoleFormatter, USER_PROMPT};
use crate::progress::WaitSpinner;
use dbl_chat_application::{ResponseDeliveryEngine, TurnSequencer};
use dbl_chat_domain::CorrelationId;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Slash commands understood by the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Status,
    Resume,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a slash command; `None` means the line is a chat message.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        Some(match line {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/status" => ReplCommand::Status,
            "/resume" => ReplCommand::Resume,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        })
    }
}

/// Interactive chat REPL
///
/// Strictly request/response: a line is submitted only after the previous
/// wait returned or was cancelled.
pub struct ChatRepl {
    sequencer: TurnSequencer,
    engine: ResponseDeliveryEngine,
    config: ReplConfig,
    /// Last turn whose wait ended without a response.
    unanswered: Option<CorrelationId>,
}

impl ChatRepl {
    pub fn new(sequencer: TurnSequencer, engine: ResponseDeliveryEngine) -> Self {
        Self {
            sequencer,
            engine,
            config: ReplConfig::default(),
            unanswered: None,
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!(
            "{}",
            ConsoleFormatter::welcome(&self.sequencer.profile().model, self.engine.mode())
        );

        loop {
            match rl.readline(USER_PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());

                    if let Some(command) = ReplCommand::parse(&line) {
                        if self.handle_command(command).await {
                            break;
                        }
                        continue;
                    }

                    self.process_turn(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", ConsoleFormatter::cancelled());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", ConsoleFormatter::exit());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", ConsoleFormatter::error(&err));
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("{}", ConsoleFormatter::exit());
                return true;
            }
            ReplCommand::Help => println!("{}", ConsoleFormatter::help()),
            ReplCommand::Status => println!(
                "{}",
                ConsoleFormatter::status(
                    self.sequencer.thread_id(),
                    self.sequencer.turn_count(),
                    &self.sequencer.profile().model,
                    self.engine.mode(),
                    self.engine.cursor(),
                )
            ),
            ReplCommand::Resume => match self.unanswered.take() {
                Some(correlation_id) => self.wait(correlation_id).await,
                None => println!("Nothing to resume"),
            },
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_turn(&mut self, message: &str) {
        match self.sequencer.submit(message).await {
            Ok(turn) => self.wait(turn.correlation_id).await,
            Err(e) => println!("{}", ConsoleFormatter::error(&e)),
        }
    }

    async fn wait(&mut self, correlation_id: CorrelationId) {
        let spinner = WaitSpinner::start_if(self.config.show_progress, "waiting for response");

        let result = tokio::select! {
            result = self.engine.await_response(&correlation_id) => Some(result),
            Ok(()) = tokio::signal::ctrl_c() => None,
        };
        drop(spinner);

        match result {
            Some(Ok(Some(outcome))) => {
                self.unanswered = None;
                println!("{}", ConsoleFormatter::outcome(&outcome));
            }
            Some(Ok(None)) => {
                self.unanswered = Some(correlation_id);
                println!("{}", ConsoleFormatter::missing());
            }
            Some(Err(e)) => {
                if !e.is_configuration_error() {
                    self.unanswered = Some(correlation_id);
                }
                println!("{}", ConsoleFormatter::error(&e));
            }
            None => {
                debug!("Wait for {} cancelled at {}", correlation_id, self.engine.cursor());
                self.unanswered = Some(correlation_id);
                println!("{}", ConsoleFormatter::cancelled());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(ReplCommand::parse("hello /quit"), None);
        assert_eq!(ReplCommand::parse("  what is 2+2?"), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(ReplCommand::parse("/help"), Some(ReplCommand::Help));
        assert_eq!(ReplCommand::parse("/?"), Some(ReplCommand::Help));
        assert_eq!(ReplCommand::parse(" /status "), Some(ReplCommand::Status));
        assert_eq!(ReplCommand::parse("/resume"), Some(ReplCommand::Resume));
        assert_eq!(ReplCommand::parse("/q"), Some(ReplCommand::Quit));
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            Some(ReplCommand::Unknown("/frobnicate".to_string()))
        );
    }
}
