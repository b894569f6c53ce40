//! Chat assistant for the route booking site.
//!
//! Turns free-form user text into one of a fixed set of commands, calls the
//! backend services those commands need and always answers with a message.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod markdown;
pub mod models;
pub mod normalize;
pub mod reply;
pub mod resolver;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::actor_from_claims;
pub use catalog::{Intent, PatternCatalog};
pub use chat::Assistant;
pub use client::BackendClient;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{ActorContext, Message, MessagePayload, MessageRole, Province, Role};
pub use resolver::{IntentResolver, Resolution};
pub use services::{MunicipalityService, RouteService, Services, StatsService};
pub use session::{ChatSession, SessionHandle};
