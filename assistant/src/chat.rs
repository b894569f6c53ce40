//! Entry point tying resolution, normalization and execution together.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use crate::catalog::PatternCatalog;
use crate::client::BackendClient;
use crate::executor::CommandExecutor;
use crate::models::{ActorContext, Message};
use crate::normalize::normalize_entity;
use crate::resolver::IntentResolver;
use crate::services::Services;
use crate::session::ChatSession;
use crate::{reply, Config, Result};

/// The chat assistant's command interpreter.
pub struct Assistant {
    resolver: IntentResolver,
    executor: CommandExecutor,
}

impl Assistant {
    pub fn new(services: Services) -> Result<Self> {
        Ok(Self {
            resolver: IntentResolver::new(PatternCatalog::builtin()?),
            executor: CommandExecutor::new(services),
        })
    }

    /// Build an assistant talking to the REST backend described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = BackendClient::new(config)?;
        Self::new(Services::from_backend(Arc::new(client)))
    }

    /// Produce the reply to one user input. Never fails: every outcome,
    /// including a panicking handler, becomes an assistant message.
    pub async fn respond(&self, text: &str, actor: Option<&ActorContext>) -> Message {
        let resolution = self.resolver.resolve(text);
        let entities: Vec<String> = resolution
            .captures
            .iter()
            .map(|raw| normalize_entity(raw))
            .collect();

        info!(
            intent = ?resolution.intent,
            entities = ?entities,
            actor = actor.map(|a| a.id.as_str()),
            "Handling chat command"
        );

        let handler = self.executor.execute(resolution.intent, &entities, actor);
        match AssertUnwindSafe(handler).catch_unwind().await {
            Ok(message) => message,
            Err(_) => {
                error!(intent = ?resolution.intent, "Command handler panicked");
                Message::assistant(reply::internal_error())
            }
        }
    }

    /// Append the user message and, once the command resolves, exactly one
    /// reply. The exclusive borrow keeps one command in flight per session.
    pub async fn submit(
        &self,
        session: &mut ChatSession,
        text: &str,
        actor: Option<&ActorContext>,
    ) -> Message {
        session.push_user(text);
        let reply = self.respond(text, actor).await;
        session.push_reply(reply.clone());
        reply
    }
}
