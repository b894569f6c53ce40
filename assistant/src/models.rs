//! Shared data models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
    Company,
}

impl Role {
    /// Human-readable label shown in replies.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Customer => "Cliente",
            Role::Company => "Empresa",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            "company" => Ok(Role::Company),
            other => Err(Error::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Identity of the caller. Absence means anonymous/demo mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ActorContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// First and last name joined, skipping a missing last name.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// The four provinces accepted for municipality listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    Barcelona,
    Girona,
    Lleida,
    Tarragona,
}

impl Province {
    pub const ALL: [Province; 4] = [
        Province::Barcelona,
        Province::Girona,
        Province::Lleida,
        Province::Tarragona,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Province::Barcelona => "Barcelona",
            Province::Girona => "Girona",
            Province::Lleida => "Lleida",
            Province::Tarragona => "Tarragona",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Province {
    type Err = Error;

    /// Case-insensitive match against the four province names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Province::ALL
            .into_iter()
            .find(|p| p.name().to_lowercase() == wanted)
            .ok_or_else(|| Error::Validation(format!("Unknown province: {}", s)))
    }
}

/// Where a route result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Cache,
    Live,
    Error,
}

/// Result of a route calculation as reported by the route service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQueryResult {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub source: RouteSource,
}

/// A municipality returned by the municipality service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
}

/// Route cache counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: u64,
    /// Fraction in [0, 1]
    pub hit_rate: f64,
    /// Fraction in [0, 1]
    pub miss_rate: f64,
}

/// Rate limiter state for the external routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStats {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub cache: CacheStats,
    pub rate_limit: RateLimitStats,
}

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Structured data attached to an assistant reply, one variant per intent that
/// yields data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessagePayload {
    Route(RouteQueryResult),
    User(ActorContext),
    Stats(StatsSnapshot),
    Municipalities {
        province: Province,
        names: Vec<String>,
        total: usize,
    },
}

/// A single transcript entry. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    /// Text using the limited markdown subset (`**bold**` and newlines)
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePayload>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), None)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), None)
    }

    pub fn assistant_with(content: impl Into<String>, payload: MessagePayload) -> Self {
        Self::new(MessageRole::Assistant, content.into(), Some(payload))
    }

    fn new(role: MessageRole, content: String, payload: Option<MessagePayload>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            payload,
        }
    }
}
