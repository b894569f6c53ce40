//! In-memory service fakes for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::models::{
    ActorContext, CacheStats, Municipality, Province, RateLimitStats, Role, RouteQueryResult,
    RouteSource,
};
use crate::services::{MunicipalityService, RouteService, Services, StatsService};
use crate::{Error, Result};

/// Scripted backend. `None` in a response slot makes that call fail.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub route: Option<RouteQueryResult>,
    pub municipalities: Option<Vec<String>>,
    pub cache: Option<CacheStats>,
    pub rate_limit: Option<RateLimitStats>,
    /// Panic instead of answering route calls
    pub route_panics: bool,
    /// Route calls wait for this before answering
    pub route_gate: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
    pub route_requests: Mutex<Vec<(String, String, Option<String>)>>,
    pub provinces: Mutex<Vec<Province>>,
}

impl FakeBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn route_requests(&self) -> Vec<(String, String, Option<String>)> {
        self.route_requests.lock().unwrap().clone()
    }

    pub fn provinces(&self) -> Vec<Province> {
        self.provinces.lock().unwrap().clone()
    }

    pub fn into_services(self) -> (Arc<Self>, Services) {
        let backend = Arc::new(self);
        let services = Services::from_backend(backend.clone());
        (backend, services)
    }
}

#[async_trait]
impl RouteService for FakeBackend {
    async fn calculate_route(
        &self,
        origin: &str,
        destination: &str,
        actor_id: Option<&str>,
    ) -> Result<RouteQueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.route_requests.lock().unwrap().push((
            origin.to_string(),
            destination.to_string(),
            actor_id.map(String::from),
        ));
        if let Some(gate) = &self.route_gate {
            gate.notified().await;
        }
        if self.route_panics {
            panic!("route service exploded");
        }
        self.route
            .clone()
            .ok_or_else(|| Error::Upstream("route service unavailable".to_string()))
    }
}

#[async_trait]
impl MunicipalityService for FakeBackend {
    async fn get_by_province(&self, province: Province) -> Result<Vec<Municipality>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.provinces.lock().unwrap().push(province);
        self.municipalities
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|name| Municipality { name: name.clone() })
                    .collect()
            })
            .ok_or_else(|| Error::Upstream("municipality service unavailable".to_string()))
    }
}

#[async_trait]
impl StatsService for FakeBackend {
    async fn get_cache_stats(&self) -> Result<CacheStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cache
            .clone()
            .ok_or_else(|| Error::Upstream("cache stats unavailable".to_string()))
    }

    async fn get_rate_limit_stats(&self) -> Result<RateLimitStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate_limit
            .clone()
            .ok_or_else(|| Error::Upstream("rate limit stats unavailable".to_string()))
    }
}

pub(crate) fn actor(role: Role) -> ActorContext {
    ActorContext {
        id: "user-42".to_string(),
        first_name: "Jordi".to_string(),
        last_name: Some("Vidal".to_string()),
        email: "jordi@example.com".to_string(),
        phone: Some("+34 600 000 000".to_string()),
        role,
        active: true,
    }
}

pub(crate) fn route_ok(origin: &str, destination: &str, source: RouteSource) -> RouteQueryResult {
    RouteQueryResult {
        origin: origin.to_string(),
        destination: destination.to_string(),
        distance_km: 102.37,
        duration_minutes: 95.0,
        success: true,
        error_message: None,
        source,
    }
}

pub(crate) fn cache_stats() -> CacheStats {
    CacheStats {
        size: 128,
        hit_rate: 0.75,
        miss_rate: 0.25,
    }
}

pub(crate) fn rate_limit_stats() -> RateLimitStats {
    RateLimitStats {
        remaining: 480,
        limit: 500,
        reset_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
    }
}
