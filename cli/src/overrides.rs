//! Command line flags layered over the merged file configuration

use dbl_chat_infrastructure::FileConfig;
use dbl_chat_presentation::Cli;
use std::path::PathBuf;

/// Apply flags given on the command line; absent flags leave the merged
/// configuration untouched.
pub fn apply(config: &mut FileConfig, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.gateway.base_url = base_url.clone();
    }
    if cli.no_stream {
        config.gateway.prefer_streaming = false;
    }

    let session = &mut config.session;
    if let Some(principal_id) = &cli.principal_id {
        session.principal_id = Some(principal_id.clone());
    }
    if let Some(workspace_id) = &cli.workspace_id {
        session.workspace_id = Some(workspace_id.clone());
    }
    if let Some(lane) = &cli.lane {
        session.lane = lane.clone();
    }
    if let Some(model_id) = &cli.model_id {
        session.model_id = Some(model_id.clone());
    }
    if let Some(provider) = &cli.provider {
        session.provider = Some(provider.clone());
    }
    if let Some(max) = cli.max_output_tokens {
        session.max_output_tokens = Some(max);
    }

    if let Some(transcript) = &cli.transcript {
        config.logging.transcript = Some(transcript.display().to_string());
    }
    if cli.quiet {
        config.repl.show_progress = false;
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_config() {
        let mut config = FileConfig::default();
        config.session.principal_id = Some("from-file".to_string());
        config.session.provider = Some("file-provider".to_string());

        let cli = Cli::parse_from([
            "dbl-chat",
            "--principal-id",
            "alice",
            "--base-url",
            "http://gw:1",
            "--lane",
            "ops",
            "--no-stream",
            "--transcript",
            "chat.jsonl",
        ]);
        apply(&mut config, &cli);

        assert_eq!(config.session.principal_id.as_deref(), Some("alice"));
        assert_eq!(config.session.provider.as_deref(), Some("file-provider"));
        assert_eq!(config.session.lane, "ops");
        assert_eq!(config.gateway.base_url, "http://gw:1");
        assert!(!config.gateway.prefer_streaming);
        assert_eq!(config.logging.transcript.as_deref(), Some("chat.jsonl"));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = FileConfig::default();
        config.gateway.prefer_streaming = true;
        let before = config.clone();

        apply(&mut config, &Cli::parse_from(["dbl-chat"]));

        assert_eq!(config, before);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/history"), PathBuf::from("/abs/history"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/h.txt"), home.join("h.txt"));
        }
    }
}
