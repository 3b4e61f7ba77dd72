//! API client for communicating with the PokéAPI REST service.
//!
//! This module provides the `ApiClient` struct for fetching the catalog
//! index and Pokémon detail records.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{ListPage, Pokemon, PokemonId, PokemonResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public PokéAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum concurrent detail requests in a batch.
/// One page worth of requests goes out at once; large search results queue behind it.
const MAX_CONCURRENT_REQUESTS: usize = 20;

/// Which kind of endpoint a response came from; decides how a 404 is reported.
#[derive(Debug, Clone, Copy)]
enum Endpoint<'a> {
    List,
    Detail(&'a str),
}

/// API client for PokéAPI.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning a classified error if not.
    async fn check_response(
        response: reqwest::Response,
        endpoint: Endpoint<'_>,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(match endpoint {
            Endpoint::List => ApiError::from_list_status(status, &body),
            Endpoint::Detail(resource) => ApiError::from_status(status, &body, resource),
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, endpoint: Endpoint<'_>) -> Result<T, ApiError> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response, endpoint).await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(format!("{}: {}", url, e)))
    }

    // ===== Data Fetching Methods =====

    /// Fetch one page of the catalog index
    pub async fn list_page(&self, limit: u64, offset: u64) -> Result<ListPage, ApiError> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset);
        let page: ListPage = self.get(&url, Endpoint::List).await?;
        debug!(limit, offset, count = page.count, returned = page.results.len(), "List page fetched");
        Ok(page)
    }

    /// Fetch the detail record for a single Pokémon
    pub async fn fetch_detail(&self, id: PokemonId) -> Result<Pokemon, ApiError> {
        let resource = id.to_string();
        let url = format!("{}/pokemon/{}", self.base_url, resource);
        let response: PokemonResponse = self.get(&url, Endpoint::Detail(&resource)).await?;
        Ok(response.to_pokemon())
    }

    /// Fetch several detail records concurrently.
    ///
    /// The batch succeeds or fails as a whole: the first error aborts it and
    /// no partial results are returned. Results come back in completion
    /// order, so callers must re-associate them by id.
    pub async fn fetch_detail_batch(&self, ids: &[PokemonId]) -> Result<Vec<Pokemon>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ids.len(), "Fetching detail batch with max {} concurrent requests", MAX_CONCURRENT_REQUESTS);

        stream::iter(ids.iter().copied())
            .map(|id| self.fetch_detail(id))
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .try_collect()
            .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    pub(crate) fn detail_json(id: u32, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "height": 7,
            "weight": 69,
            "sprites": {
                "front_default": format!("https://sprites.example/{}.png", id),
                "other": {"official-artwork": {"front_default": null}}
            },
            "types": [{"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}}],
            "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/"}}]
        })
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("https://pokeapi.co/api/v2/").unwrap();
        assert_eq!(client.base_url(), "https://pokeapi.co/api/v2");
    }

    #[tokio::test]
    async fn list_page_parses_results() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/pokemon")
                .query_param("limit", "2")
                .query_param("offset", "0");
            then.status(200).json_body(json!({
                "count": 1302,
                "next": null,
                "previous": null,
                "results": [
                    {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                    {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
                ]
            }));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let page = client.list_page(2, 0).await.unwrap();

        assert_eq!(page.count, 1302);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].id(), PokemonId(2));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_page_404_is_transport_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon");
            then.status(404).body("Not Found");
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client.list_page(1, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn list_page_malformed_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon");
            then.status(200).body("<html>definitely not json</html>");
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client.list_page(1, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn fetch_detail_parses_record() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/pokemon/1");
            then.status(200).json_body(detail_json(1, "bulbasaur"));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let pokemon = client.fetch_detail(PokemonId(1)).await.unwrap();

        assert_eq!(pokemon.id, PokemonId(1));
        assert_eq!(pokemon.name, "bulbasaur");
        assert_eq!(pokemon.types, vec!["grass".to_string()]);
        assert_eq!(pokemon.image_url(), Some("https://sprites.example/1.png"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_detail_status_mapping() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/9999");
            then.status(404).body("Not Found");
        });
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/500");
            then.status(503).body("Service Unavailable");
        });
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/7");
            then.status(200).json_body(json!({"id": "seven"}));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();

        let err = client.fetch_detail(PokemonId(9999)).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("9999".to_string()));

        let err = client.fetch_detail(PokemonId(500)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref msg) if msg.contains("503")), "got {:?}", err);

        let err = client.fetch_detail(PokemonId(7)).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn fetch_detail_network_failure_is_transport_error() {
        // Nothing listens on port 9 (discard) on test hosts
        let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.fetch_detail(PokemonId(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn fetch_detail_batch_returns_all_records() {
        let server = MockServer::start_async().await;
        for (id, name) in [(4, "charmander"), (5, "charmeleon"), (6, "charizard")] {
            server.mock(|when, then| {
                when.method(GET).path(format!("/pokemon/{}", id));
                then.status(200).json_body(detail_json(id, name));
            });
        }

        let client = ApiClient::new(&server.base_url()).unwrap();
        let mut batch = client
            .fetch_detail_batch(&[PokemonId(4), PokemonId(5), PokemonId(6)])
            .await
            .unwrap();
        batch.sort_by_key(|p| p.id);

        let names: Vec<&str> = batch.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["charmander", "charmeleon", "charizard"]);
    }

    #[tokio::test]
    async fn fetch_detail_batch_fails_as_a_whole() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/4");
            then.status(200).json_body(detail_json(4, "charmander"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/6");
            then.status(500).body("Internal Server Error");
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client
            .fetch_detail_batch(&[PokemonId(4), PokemonId(6)])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn fetch_detail_batch_empty_makes_no_requests() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(500);
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let batch = client.fetch_detail_batch(&[]).await.unwrap();
        assert!(batch.is_empty());
        mock.assert_hits_async(0).await;
    }
}
