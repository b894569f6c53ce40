//! Contracts of the upstream services the assistant calls.
//!
//! Each call returns `Err` on transport or server failure. A route service
//! that answered but could not compute a route reports it through
//! [`RouteQueryResult::success`] instead.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{CacheStats, Municipality, Province, RateLimitStats, RouteQueryResult};
use crate::Result;

#[async_trait]
pub trait RouteService: Send + Sync {
    async fn calculate_route(
        &self,
        origin: &str,
        destination: &str,
        actor_id: Option<&str>,
    ) -> Result<RouteQueryResult>;
}

#[async_trait]
pub trait MunicipalityService: Send + Sync {
    /// Municipalities of a province, in the order the backend returns them.
    async fn get_by_province(&self, province: Province) -> Result<Vec<Municipality>>;
}

#[async_trait]
pub trait StatsService: Send + Sync {
    async fn get_cache_stats(&self) -> Result<CacheStats>;
    async fn get_rate_limit_stats(&self) -> Result<RateLimitStats>;
}

/// The set of upstream services handed to the executor.
#[derive(Clone)]
pub struct Services {
    pub routes: Arc<dyn RouteService>,
    pub municipalities: Arc<dyn MunicipalityService>,
    pub stats: Arc<dyn StatsService>,
}

impl Services {
    /// Use one backend for all three services.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RouteService + MunicipalityService + StatsService + 'static,
    {
        Self {
            routes: backend.clone(),
            municipalities: backend.clone(),
            stats: backend,
        }
    }
}
