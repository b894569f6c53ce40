//! Per-intent command handlers.
//!
//! Every handler produces exactly one assistant [`Message`]. Upstream failures
//! are logged and replaced by a generic, intent-specific reply.

use tracing::{error, info, warn};

use crate::catalog::Intent;
use crate::models::{ActorContext, Message, MessagePayload, Province, StatsSnapshot};
use crate::reply;
use crate::services::Services;

/// Returns the actor when it may use admin-only commands.
fn admin_only(actor: Option<&ActorContext>) -> Option<&ActorContext> {
    actor.filter(|a| a.is_admin())
}

pub struct CommandExecutor {
    services: Services,
}

impl CommandExecutor {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Run the handler for `intent` with already-normalized entities.
    pub async fn execute(
        &self,
        intent: Intent,
        entities: &[String],
        actor: Option<&ActorContext>,
    ) -> Message {
        match intent {
            Intent::Greeting => Message::assistant(reply::greeting(actor)),
            Intent::Help => Message::assistant(reply::help(actor)),
            Intent::WhoAmI => who_am_i(actor),
            Intent::Stats => self.stats(actor).await,
            Intent::CalculateRoute => self.calculate_route(entities, actor).await,
            Intent::ListMunicipalities => self.list_municipalities(entities).await,
            Intent::Fallback => Message::assistant(reply::fallback()),
        }
    }

    async fn stats(&self, actor: Option<&ActorContext>) -> Message {
        let Some(admin) = admin_only(actor) else {
            info!(
                role = ?actor.map(|a| a.role),
                "Stats requested without admin role"
            );
            return Message::assistant(reply::stats_denied());
        };

        let stats = &self.services.stats;
        let (cache, rate_limit) =
            tokio::join!(stats.get_cache_stats(), stats.get_rate_limit_stats());

        match (cache, rate_limit) {
            (Ok(cache), Ok(rate_limit)) => {
                let snapshot = StatsSnapshot { cache, rate_limit };
                Message::assistant_with(reply::stats(&snapshot), MessagePayload::Stats(snapshot))
            }
            (cache, rate_limit) => {
                if let Err(e) = cache {
                    error!(actor = %admin.id, "Cache stats failed: {}", e);
                }
                if let Err(e) = rate_limit {
                    error!(actor = %admin.id, "Rate limit stats failed: {}", e);
                }
                Message::assistant(reply::stats_failed())
            }
        }
    }

    async fn calculate_route(
        &self,
        entities: &[String],
        actor: Option<&ActorContext>,
    ) -> Message {
        let (origin, destination) = match entities {
            [origin, destination, ..] if !origin.is_empty() && !destination.is_empty() => {
                (origin.as_str(), destination.as_str())
            }
            _ => return Message::assistant(reply::route_missing_places()),
        };

        let actor_id = actor.map(|a| a.id.as_str());
        match self
            .services
            .routes
            .calculate_route(origin, destination, actor_id)
            .await
        {
            Ok(result) if result.success => {
                info!(origin, destination, source = ?result.source, "Route calculated");
                Message::assistant_with(reply::route(&result), MessagePayload::Route(result))
            }
            Ok(result) => {
                warn!(
                    origin,
                    destination,
                    error = ?result.error_message,
                    "Route service rejected the query"
                );
                Message::assistant_with(reply::route_rejected(&result), MessagePayload::Route(result))
            }
            Err(e) => {
                error!(origin, destination, "Route calculation failed: {}", e);
                Message::assistant(reply::route_failed(origin, destination))
            }
        }
    }

    async fn list_municipalities(&self, entities: &[String]) -> Message {
        let entity = entities.first().map(String::as_str).unwrap_or_default();
        let province: Province = match entity.parse() {
            Ok(province) => province,
            Err(_) => return Message::assistant(reply::invalid_province(entity)),
        };

        match self.services.municipalities.get_by_province(province).await {
            Ok(municipalities) => {
                let mut names: Vec<String> =
                    municipalities.into_iter().map(|m| m.name).collect();
                let text = reply::municipalities(province, &names);
                let total = names.len();
                names.truncate(reply::MAX_LISTED_MUNICIPALITIES);
                Message::assistant_with(
                    text,
                    MessagePayload::Municipalities {
                        province,
                        names,
                        total,
                    },
                )
            }
            Err(e) => {
                error!(%province, "Municipality lookup failed: {}", e);
                Message::assistant(reply::municipalities_failed(province))
            }
        }
    }
}

fn who_am_i(actor: Option<&ActorContext>) -> Message {
    match actor {
        Some(actor) => {
            Message::assistant_with(reply::profile(actor), MessagePayload::User(actor.clone()))
        }
        None => Message::assistant(reply::not_logged_in()),
    }
}
