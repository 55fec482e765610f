//! Search providers.

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::config::{SearchProvider, SuggestionSettings, GOOGLE_MAX_RESULTS_PER_QUERY};
use crate::error_handling::SearchError;

use super::Suggestion;

/// A web search provider queried for replacement links.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &'static str;

    /// Returns at most `max_results` candidates for `query`.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<Suggestion>, SearchError>;
}

/// Google Custom Search JSON API.
pub struct GoogleSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl GoogleSearch {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str, engine_id: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[async_trait]
impl SearchBackend for GoogleSearch {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Suggestion>, SearchError> {
        let num = max_results
            .clamp(1, GOOGLE_MAX_RESULTS_PER_QUERY)
            .to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }
        let body: GoogleResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .take(max_results)
            .map(|item| Suggestion {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}

/// Bing Web Search API v7.
pub struct BingSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl BingSearch {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingResponse {
    #[serde(default)]
    web_pages: Option<BingWebPages>,
}

#[derive(Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingItem>,
}

#[derive(Deserialize)]
struct BingItem {
    #[serde(default)]
    name: String,
    url: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[async_trait]
impl SearchBackend for BingSearch {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Suggestion>, SearchError> {
        let count = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("count", count.as_str())])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }
        let body: BingResponse = response.json().await?;
        Ok(body
            .web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .map(|item| Suggestion {
                title: item.name,
                link: item.url,
                snippet: item.snippet,
            })
            .collect())
    }
}

/// Picks the configured search provider.
///
/// Returns `None` (meaning: use the fixture table) when real searches are
/// off, the provider is unsupported, or its credentials are missing.
pub fn backend_from_settings(
    settings: &SuggestionSettings,
    client: reqwest::Client,
) -> Option<Box<dyn SearchBackend>> {
    if !settings.use_real_searches {
        info!("Real searches disabled, using built-in suggestions");
        return None;
    }

    let backend: Result<Box<dyn SearchBackend>, SearchError> = match settings.search_provider {
        SearchProvider::Google => {
            match (&settings.google_api_key, &settings.google_search_engine_id) {
                (Some(key), Some(cx)) => Ok(Box::new(GoogleSearch::new(
                    client,
                    &settings.google_endpoint,
                    key,
                    cx,
                ))),
                (None, _) => Err(SearchError::MissingCredentials("google_api_key")),
                (_, None) => Err(SearchError::MissingCredentials("google_search_engine_id")),
            }
        }
        SearchProvider::Bing => match &settings.bing_api_key {
            Some(key) => Ok(Box::new(BingSearch::new(
                client,
                &settings.bing_endpoint,
                key,
            ))),
            None => Err(SearchError::MissingCredentials("bing_api_key")),
        },
        SearchProvider::Unsupported => {
            info!("Unsupported search provider, using built-in suggestions");
            return None;
        }
    };

    match backend {
        Ok(backend) => {
            debug!("Using {} search backend", backend.name());
            Some(backend)
        }
        Err(e) => {
            info!("{e}, using built-in suggestions");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_google_search_protocol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("key", "k"))
            .and(query_param("cx", "engine"))
            .and(query_param("q", "Foo alternative"))
            .and(query_param("num", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"title": "A", "link": "https://a.example", "snippet": "first"},
                    {"title": "B", "link": "https://b.example"},
                    {"title": "C", "link": "https://c.example"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/customsearch/v1", server.uri());
        let google = GoogleSearch::new(reqwest::Client::new(), &endpoint, "k", "engine");
        let results = google.search("Foo alternative", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].link, "https://a.example");
        assert_eq!(results[0].snippet.as_deref(), Some("first"));
        assert_eq!(results[1].snippet, None);
    }

    #[tokio::test]
    async fn test_google_without_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let google = GoogleSearch::new(reqwest::Client::new(), &server.uri(), "k", "cx");
        assert!(google.search("q", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_google_result_count_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("num", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"title": "A", "link": "https://a.example"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let google = GoogleSearch::new(reqwest::Client::new(), &server.uri(), "k", "cx");
        let results = google.search("q", 25).await.unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_bing_search_protocol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v7.0/search"))
            .and(header("Ocp-Apim-Subscription-Key", "secret"))
            .and(query_param("q", "Foo"))
            .and(query_param("count", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "webPages": {"value": [
                    {"name": "Bing A", "url": "https://bing-a.example", "snippet": "s"}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/v7.0/search", server.uri());
        let bing = BingSearch::new(reqwest::Client::new(), &endpoint, "secret");
        let results = bing.search("Foo", 5).await.unwrap();
        assert_eq!(
            results,
            vec![Suggestion {
                title: "Bing A".into(),
                link: "https://bing-a.example".into(),
                snippet: Some("s".into()),
            }]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let bing = BingSearch::new(reqwest::Client::new(), &server.uri(), "secret");
        let err = bing.search("Foo", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Status(429)));
    }

    #[test]
    fn test_backend_selection() {
        let client = reqwest::Client::new();
        let mut settings = SuggestionSettings::default();
        assert!(backend_from_settings(&settings, client.clone()).is_none());

        settings.use_real_searches = true;
        settings.search_provider = SearchProvider::Google;
        settings.google_api_key = Some("k".into());
        assert!(backend_from_settings(&settings, client.clone()).is_none());

        settings.google_search_engine_id = Some("cx".into());
        let backend = backend_from_settings(&settings, client.clone()).unwrap();
        assert_eq!(backend.name(), "google");

        settings.search_provider = SearchProvider::Bing;
        assert!(backend_from_settings(&settings, client.clone()).is_none());
        settings.bing_api_key = Some("b".into());
        assert_eq!(backend_from_settings(&settings, client).unwrap().name(), "bing");
    }
}
