//! Terminal chat - Talks to the assistant from a shell.
//!
//! Reads one message per line from stdin. The next line is only read once the
//! previous reply has been printed, so replies never interleave.
//!
//! Environment:
//! - `BACKEND_API_URL`, `BACKEND_API_TOKEN`, `BACKEND_TIMEOUT_SECS` - backend access
//! - `CHAT_ACTOR` - optional caller identity as JSON (`ActorContext`); unset runs in demo mode

use anyhow::Context;
use assistant::markdown::to_ansi;
use assistant::{ActorContext, Assistant, ChatSession, Config, Message};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXIT_COMMANDS: &[&str] = &["salir", "exit", "quit"];

fn parse_actor(raw: Option<&str>) -> anyhow::Result<Option<ActorContext>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(json) => {
            let actor = serde_json::from_str(json).context("CHAT_ACTOR is not a valid actor")?;
            Ok(Some(actor))
        }
        None => Ok(None),
    }
}

fn print_message(message: &Message) {
    println!("{}\n", to_ansi(&message.content));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let assistant = Assistant::from_config(&config)?;
    let actor = parse_actor(std::env::var("CHAT_ACTOR").ok().as_deref())?;
    let mut session = ChatSession::new(actor.as_ref());

    info!(session = %session.id(), backend = %config.backend_url, "Chat started");
    for message in session.messages() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&text.to_lowercase().as_str()) {
            break;
        }

        let reply = assistant.submit(&mut session, text, actor.as_ref()).await;
        print_message(&reply);
    }

    info!(
        session = %session.id(),
        messages = session.messages().len(),
        "Chat ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant::Role;

    #[test]
    fn test_parse_actor_unset_is_demo() {
        assert!(parse_actor(None).unwrap().is_none());
        assert!(parse_actor(Some("  ")).unwrap().is_none());
    }

    #[test]
    fn test_parse_actor_json() {
        let raw = r#"{"id":"u-1","firstName":"Pau","email":"pau@example.com","role":"admin"}"#;
        let actor = parse_actor(Some(raw)).unwrap().unwrap();
        assert_eq!(actor.first_name, "Pau");
        assert_eq!(actor.role, Role::Admin);
        assert!(actor.active);
    }

    #[test]
    fn test_parse_actor_invalid() {
        assert!(parse_actor(Some("{not json")).is_err());
    }
}
