//! Conversation transcript and host-side submission serialization.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::chat::Assistant;
use crate::models::{ActorContext, Message, MessageRole};
use crate::{reply, Error, Result};

/// Append-only transcript of one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<Message>,
    /// Set between a user message and its reply
    #[serde(skip)]
    processing: bool,
}

impl ChatSession {
    /// Start a session seeded with the welcome message.
    pub fn new(actor: Option<&ActorContext>) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![Message::assistant(reply::welcome(actor))],
            processing: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Read-only view of the transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Check a transcript received from outside (e.g. a client round-trip).
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.messages.len());
        if let Some(dup) = self.messages.iter().find(|m| !seen.insert(m.id)) {
            return Err(Error::Validation(format!("duplicate message id {}", dup.id)));
        }
        Ok(())
    }

    pub(crate) fn push_user(&mut self, text: &str) -> Message {
        let message = Message::user(text);
        self.messages.push(message.clone());
        self.processing = true;
        message
    }

    pub(crate) fn push_reply(&mut self, reply: Message) {
        debug_assert_eq!(reply.role, MessageRole::Assistant);
        self.messages.push(reply);
        self.processing = false;
    }
}

/// Shared handle for hosts that keep a session in-process and can receive
/// messages for it concurrently, such as a websocket server or a UI event
/// loop that stays responsive while a command runs.
///
/// Request/response hosts (the chat Lambda, the CLI) own the session for the
/// duration of one call and use [`Assistant::submit`] with `&mut ChatSession`
/// instead; the exclusive borrow already rules out overlap there.
///
/// Only one command runs per session at a time; a submission that arrives
/// while another is in flight is rejected with [`Error::Busy`] and does not
/// touch the transcript.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<ChatSession>>,
}

impl SessionHandle {
    pub fn new(session: ChatSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Copy of the transcript for rendering.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages().to_vec()
    }

    pub async fn is_processing(&self) -> bool {
        self.inner.lock().await.is_processing()
    }

    pub async fn submit(
        &self,
        assistant: &Assistant,
        text: &str,
        actor: Option<&ActorContext>,
    ) -> Result<Message> {
        {
            let mut session = self.inner.lock().await;
            if session.is_processing() {
                warn!(session = %session.id(), "Rejected submission while processing");
                return Err(Error::Busy);
            }
            session.push_user(text);
        }

        // The lock is not held while the command runs, so readers can render
        // the pending user message.
        let reply = assistant.respond(text, actor).await;

        self.inner.lock().await.push_reply(reply.clone());
        Ok(reply)
    }
}
