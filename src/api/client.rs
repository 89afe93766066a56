// file: src/api/client.rs
// description: HTTP client for the documentation and RAG backend endpoints
// reference: https://docs.rs/reqwest

use crate::config::ApiConfig;
use crate::error::{ExplorerError, Result};
use crate::models::{DocumentationPage, Message, Source, null_as_default};
use crate::utils::Validator;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const LIST_ENDPOINT: &str = "/api/docs/list";
const CONTENT_ENDPOINT: &str = "/api/docs/content";
const PAGE_ENDPOINT: &str = "/api/docs/pages";
const RAG_QUERY_ENDPOINT: &str = "/api/rag/query";
const RAG_RETRIEVE_ENDPOINT: &str = "/api/rag/retrieve";

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    sources: Vec<Source>,
}

#[derive(Debug, Clone)]
pub struct DocsApiClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl DocsApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pages discovered for a documentation site, without guaranteed content.
    pub async fn list_pages(&self, url: &str) -> Result<Vec<DocumentationPage>> {
        Validator::validate_url(url)?;
        let pages: Option<Vec<DocumentationPage>> =
            self.get_json(LIST_ENDPOINT, &[("url", url)]).await?;
        Ok(pages.unwrap_or_default())
    }

    /// Pages of a documentation site with their markdown.
    pub async fn fetch_documentation(&self, url: &str) -> Result<Vec<DocumentationPage>> {
        Validator::validate_url(url)?;
        let pages: Option<Vec<DocumentationPage>> =
            self.get_json(CONTENT_ENDPOINT, &[("url", url)]).await?;
        Ok(pages.unwrap_or_default())
    }

    pub async fn fetch_page(&self, id: &str) -> Result<DocumentationPage> {
        Validator::validate_not_empty("page id", id)?;
        self.get_json(PAGE_ENDPOINT, &[("id", id)]).await
    }

    pub async fn rag_query(&self, query: &str) -> Result<Message> {
        Validator::validate_not_empty("query", query)?;
        self.post_form(RAG_QUERY_ENDPOINT, &[("query", query)]).await
    }

    pub async fn rag_retrieve(&self, query: &str) -> Result<Vec<Source>> {
        Validator::validate_not_empty("query", query)?;
        let response: RetrieveResponse = self
            .post_form(RAG_RETRIEVE_ENDPOINT, &[("query", query)])
            .await?;
        Ok(response.sources)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.send_with_retry(endpoint, || self.client.get(&url).query(query))
            .await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.send_with_retry(endpoint, || self.client.post(&url).form(form))
            .await
    }

    async fn send_with_retry<T, F>(&self, endpoint: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            debug!("Requesting {} (attempt {})", endpoint, attempt + 1);

            let outcome = match build().send().await {
                Ok(response) => Self::decode(endpoint, response).await,
                Err(e) => Err(ExplorerError::from(e)),
            };

            match outcome {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Request to {} failed ({}), retrying in {:?}",
                        endpoint, e, self.retry_backoff
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                }
                other => return other,
            }
        }
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExplorerError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> DocsApiClient {
        DocsApiClient::new(&ApiConfig {
            base_url: format!("{}/", server.url()),
            timeout_secs: 5,
            max_retries,
            retry_backoff_ms: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/docs/pages")
            .match_query(Matcher::UrlEncoded("id".into(), "users/get".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r##"{"id":"users/get","url":"https://docs.example.com/users","markdown":"# Users","title":"Users","path":"/users"}"##,
            )
            .create_async()
            .await;

        let page = client_for(&server, 0).fetch_page("users/get").await.unwrap();

        assert_eq!(page.title, "Users");
        assert_eq!(page.markdown, "# Users");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_pages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/docs/list")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://docs.example.com".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"1","title":"Intro"},{"id":"2","title":"Users"}]"#)
            .create_async()
            .await;

        let pages = client_for(&server, 0)
            .list_pages("https://docs.example.com")
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].title, "Users");
        assert!(pages[0].markdown.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_documentation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/docs/content")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://docs.example.com".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r##"[{"id":"1","title":"Intro","markdown":"# Intro"}]"##)
            .create_async()
            .await;

        let pages = tokio_test::assert_ok!(
            client_for(&server, 0)
                .fetch_documentation("https://docs.example.com")
                .await
        );
        assert_eq!(pages[0].markdown, "# Intro");
    }

    #[tokio::test]
    async fn test_rag_query_posts_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/rag/query")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::Exact("query=authenticate".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content":"Use the login endpoint.","sender":"bot","sources":[{"text":"<p>Login</p>","url":"auth"}]}"#,
            )
            .create_async()
            .await;

        let answer = client_for(&server, 0).rag_query("authenticate").await.unwrap();

        assert_eq!(answer.sender, Sender::Bot);
        assert_eq!(answer.sources[0].text, "<p>Login</p>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rag_retrieve_unwraps_sources() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/rag/retrieve")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sources":[{"text":"a","url":"u1"},{"text":"b","url":"u2"}]}"#)
            .create_async()
            .await;

        let sources = client_for(&server, 0).rag_retrieve("users").await.unwrap();
        assert_eq!(sources, vec![Source::new("a", "u1"), Source::new("b", "u2")]);
    }

    #[tokio::test]
    async fn test_null_lists_decode_as_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/docs/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;
        server
            .mock("GET", "/api/docs/content")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null\n")
            .create_async()
            .await;
        server
            .mock("POST", "/api/rag/retrieve")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sources":null}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/rag/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":"Real answer","sources":null,"sender":"bot"}"#)
            .create_async()
            .await;

        let client = client_for(&server, 0);
        let site = "https://docs.example.com";

        assert!(client.list_pages(site).await.unwrap().is_empty());
        assert!(client.fetch_documentation(site).await.unwrap().is_empty());
        assert!(client.rag_retrieve("users").await.unwrap().is_empty());

        let answer = client.rag_query("users").await.unwrap();
        assert_eq!(answer.content, "Real answer");
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/docs/pages")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("no such page")
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server, 3).fetch_page("missing").await.unwrap_err();

        match err {
            ExplorerError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such page");
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/rag/query")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let err = client_for(&server, 2).rag_query("users").await.unwrap_err();

        assert!(matches!(err, ExplorerError::Api { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_request() {
        let server = mockito::Server::new_async().await;
        let err = client_for(&server, 0).rag_query("   ").await.unwrap_err();
        assert!(matches!(err, ExplorerError::Validation(_)));
    }
}
