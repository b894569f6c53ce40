//! REST client for the booking backend.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::models::{CacheStats, Municipality, Province, RateLimitStats, RouteQueryResult};
use crate::services::{MunicipalityService, RouteService, StatsService};
use crate::{Config, Error, Result};

/// Body of a route calculation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest<'a> {
    origin: &'a str,
    destination: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

/// Client implementing all upstream services over the backend's REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.backend_url.clone(),
            token: config.backend_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode a JSON body, failing on non-2xx statuses.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.authorized(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Backend {} failed: {} - {}", what, status, body);
            return Err(Error::Upstream(format!("{} failed: {}", what, status)));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RouteService for BackendClient {
    async fn calculate_route(
        &self,
        origin: &str,
        destination: &str,
        actor_id: Option<&str>,
    ) -> Result<RouteQueryResult> {
        let body = RouteRequest {
            origin,
            destination,
            user_id: actor_id,
        };
        debug!(origin, destination, "Requesting route");

        let response = self
            .authorized(self.http.post(self.url("routes/calculate")).json(&body))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        // The backend answers unknown places with a 4xx carrying a regular
        // result whose `success` is false.
        if status.is_client_error() && status != StatusCode::UNAUTHORIZED {
            if let Ok(result) = serde_json::from_str::<RouteQueryResult>(&text) {
                return Ok(result);
            }
        }

        error!("Backend route calculation failed: {} - {}", status, text);
        Err(Error::Upstream(format!("route calculation failed: {}", status)))
    }
}

#[async_trait]
impl MunicipalityService for BackendClient {
    async fn get_by_province(&self, province: Province) -> Result<Vec<Municipality>> {
        let request = self
            .http
            .get(self.url("municipalities"))
            .query(&[("province", province.name())]);
        self.fetch(request, "municipality lookup").await
    }
}

#[async_trait]
impl StatsService for BackendClient {
    async fn get_cache_stats(&self) -> Result<CacheStats> {
        self.fetch(self.http.get(self.url("stats/cache")), "cache stats")
            .await
    }

    async fn get_rate_limit_stats(&self) -> Result<RateLimitStats> {
        self.fetch(self.http.get(self.url("stats/rate-limit")), "rate limit stats")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        let config = Config::from_lookup(|key| match key {
            "BACKEND_API_URL" => Some("https://api.example.com/api/".to_string()),
            _ => None,
        })
        .unwrap();
        BackendClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let client = client();
        assert_eq!(
            client.url("/routes/calculate"),
            "https://api.example.com/api/routes/calculate"
        );
        assert_eq!(
            client.url("stats/cache"),
            "https://api.example.com/api/stats/cache"
        );
    }

    #[test]
    fn test_route_request_body() {
        let body = RouteRequest {
            origin: "Barcelona",
            destination: "Girona",
            user_id: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"origin":"Barcelona","destination":"Girona"}"#
        );

        let body = RouteRequest {
            user_id: Some("u-7"),
            ..body
        };
        assert!(serde_json::to_string(&body).unwrap().contains(r#""userId":"u-7""#));
    }

    #[test]
    fn test_municipality_list_json() {
        let json = r#"[{"name":"Figueres"},{"name":"Olot"}]"#;
        let list: Vec<Municipality> = serde_json::from_str(json).unwrap();
        assert_eq!(list[1].name, "Olot");
    }
}
