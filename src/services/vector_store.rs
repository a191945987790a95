//! Vector store client speaking the Pinecone REST dialect.
//!
//! Index management and project lookup go through the control plane;
//! upsert, query and fetch go through the per-project data plane.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::error::VectorStoreError;
use crate::models::VectorStoreConfig;

const API_KEY_HEADER: &str = "Api-Key";

/// Response from the who-am-i endpoint.
#[derive(Debug, Deserialize)]
struct WhoAmIResponse {
    project_name: String,
}

/// Request body for index creation.
#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
}

/// One vector in an upsert request.
#[derive(Debug, Clone, Serialize)]
pub struct VectorEntry {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<VectorEntry>,
}

/// Request body for nearest-neighbor queries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    top_k: usize,
    vector: Vec<f32>,
    include_values: bool,
    include_metadata: bool,
}

/// Sparse counterpart of the dense values on a match.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SparseValues {
    #[serde(default)]
    pub indices: Vec<u32>,
    #[serde(default)]
    pub values: Vec<f32>,
}

/// One nearest-neighbor match as returned by the query endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub sparse_values: Option<SparseValues>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl QueryMatch {
    /// The stored message text, when the upsert attached it as metadata.
    pub fn text(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("text"))
            .and_then(|v| v.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// One stored vector returned by the fetch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchedVector {
    pub id: String,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, FetchedVector>,
}

/// Outcome of `ensure_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// The index already existed
    Existing,
    /// The index was created by this call
    Created,
}

/// Client for the remote vector index.
pub struct VectorStoreClient {
    client: Client,
    config: VectorStoreConfig,
    api_key: String,
    project: OnceCell<String>,
}

impl VectorStoreClient {
    /// Create a new vector store client with the given configuration.
    pub fn new(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(VectorStoreError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
            project: OnceCell::new(),
        })
    }

    /// Look up the project name owning the configured index.
    pub async fn whoami(&self) -> Result<String, VectorStoreError> {
        let url = format!("{}/actions/whoami", self.config.controller_url());
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::ProjectError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let whoami: WhoAmIResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::ProjectError(e.to_string()))?;

        Ok(whoami.project_name)
    }

    /// Project name, resolved at most once per client.
    pub async fn project(&self) -> Result<&str, VectorStoreError> {
        self.project
            .get_or_try_init(|| self.whoami())
            .await
            .map(|p| p.as_str())
    }

    /// Check whether the configured index exists.
    pub async fn index_exists(&self) -> Result<bool, VectorStoreError> {
        let url = format!(
            "{}/databases/{}",
            self.config.controller_url(),
            self.config.index
        );
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status().is_success())
    }

    /// Make sure the configured index exists, creating it if needed.
    ///
    /// Check-then-create: a concurrent client creating the index between
    /// the two calls surfaces here as a create failure.
    pub async fn ensure_index(&self) -> Result<IndexState, VectorStoreError> {
        if self.index_exists().await? {
            return Ok(IndexState::Existing);
        }

        let url = format!("{}/databases", self.config.controller_url());
        let request = CreateIndexRequest {
            name: &self.config.index,
            dimension: self.config.dimension,
            metric: &self.config.metric,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        match response.status().as_u16() {
            200 | 201 => Ok(IndexState::Created),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(VectorStoreError::IndexError(format!(
                    "create failed with status {}: {}",
                    status, body
                )))
            }
        }
    }

    /// Upsert a single vector entry.
    pub async fn upsert(&self, entry: VectorEntry) -> Result<(), VectorStoreError> {
        let project = self.project().await?;
        let url = format!("{}/vectors/upsert", self.config.data_url(project));
        let request = UpsertRequest {
            vectors: vec![entry],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::UpsertError(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Nearest-neighbor query, best match first.
    pub async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, VectorStoreError> {
        let project = self.project().await?;
        let url = format!("{}/query", self.config.data_url(project));
        let request = QueryRequest {
            top_k,
            vector,
            include_values: true,
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::QueryError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::QueryError(e.to_string()))?;

        Ok(query_response.matches)
    }

    /// Fetch one stored vector by id; `None` when the index has no such id.
    pub async fn fetch(&self, id: &str) -> Result<Option<FetchedVector>, VectorStoreError> {
        let project = self.project().await?;
        let url = format!("{}/vectors/fetch", self.config.data_url(project));

        let response = self
            .client
            .get(&url)
            .query(&[("ids", id)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::FetchError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let mut fetch_response: FetchResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::FetchError(e.to_string()))?;

        Ok(fetch_response.vectors.remove(id))
    }

    /// Get the configured index name.
    pub fn index(&self) -> &str {
        &self.config.index
    }
}

fn request_error(e: reqwest::Error) -> VectorStoreError {
    if e.is_connect() {
        VectorStoreError::ConnectionError(e.to_string())
    } else {
        VectorStoreError::RequestError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> VectorStoreConfig {
        VectorStoreConfig {
            api_key: Some("pc-test-key".to_string()),
            controller_url: Some(url.to_string()),
            data_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    async fn mount_whoami(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/actions/whoami"))
            .and(header(API_KEY_HEADER, "pc-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "project_name": "proj42",
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = VectorStoreConfig::default();
        assert!(matches!(
            VectorStoreClient::new(&config),
            Err(VectorStoreError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_whoami_decodes_project_name() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        assert_eq!(client.whoami().await.unwrap(), "proj42");
    }

    #[tokio::test]
    async fn test_ensure_index_existing_skips_create() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/databases/whatsapp-chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/databases"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        assert_eq!(client.ensure_index().await.unwrap(), IndexState::Existing);
    }

    #[tokio::test]
    async fn test_ensure_index_creates_when_absent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/databases/whatsapp-chat"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/databases"))
            .and(body_json(serde_json::json!({
                "name": "whatsapp-chat",
                "dimension": 1536,
                "metric": "cosine",
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        assert_eq!(client.ensure_index().await.unwrap(), IndexState::Created);
    }

    #[tokio::test]
    async fn test_ensure_index_create_failure_is_fatal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/databases/whatsapp-chat"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/databases"))
            .respond_with(ResponseTemplate::new(400).set_body_string("quota exceeded"))
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        let err = client.ensure_index().await.unwrap_err();
        match err {
            VectorStoreError::IndexError(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upsert_sends_single_entry() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/vectors/upsert"))
            .and(header(API_KEY_HEADER, "pc-test-key"))
            .and(body_json(serde_json::json!({
                "vectors": [{
                    "id": "vector_id_1",
                    "values": [0.5, 0.25],
                    "metadata": {"text": "hello"},
                }],
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        let entry = VectorEntry {
            id: "vector_id_1".to_string(),
            values: vec![0.5, 0.25],
            metadata: Some(HashMap::from([(
                "text".to_string(),
                serde_json::Value::String("hello".to_string()),
            )])),
        };
        client.upsert(entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_failure_status() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/vectors/upsert"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        let entry = VectorEntry {
            id: "vector_id_1".to_string(),
            values: vec![1.0],
            metadata: None,
        };
        let err = client.upsert(entry).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::UpsertError(_)));
    }

    #[tokio::test]
    async fn test_query_sends_top_k_and_decodes_matches() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(serde_json::json!({
                "topK": 1,
                "vector": [0.5, 0.25],
                "includeValues": true,
                "includeMetadata": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [{
                    "id": "vector_id_7",
                    "score": 0.5,
                    "metadata": {"text": "hello world"},
                }],
                "namespace": "",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        let matches = client.query(vec![0.5, 0.25], 1).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "vector_id_7");
        assert_eq!(matches[0].score, 0.5);
        assert_eq!(matches[0].text(), Some("hello world"));
        assert!(matches[0].values.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_stored_vector() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vectors/fetch"))
            .and(query_param("ids", "vector_id_7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "vectors": {
                    "vector_id_7": {"id": "vector_id_7", "values": [0.5, 0.25]},
                },
                "namespace": "",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        let fetched = client.fetch("vector_id_7").await.unwrap().unwrap();
        assert_eq!(fetched.id, "vector_id_7");
        assert_eq!(fetched.values, vec![0.5, 0.25]);
    }

    #[tokio::test]
    async fn test_fetch_missing_id_is_none() {
        let mock_server = MockServer::start().await;
        mount_whoami(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vectors/fetch"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"vectors": {}, "namespace": ""})),
            )
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        assert!(client.fetch("vector_id_9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_project_resolved_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/actions/whoami"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "project_name": "proj42",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"matches": []})),
            )
            .mount(&mock_server)
            .await;

        let client = VectorStoreClient::new(&test_config(&mock_server.uri())).unwrap();
        client.query(vec![1.0], 1).await.unwrap();
        client.query(vec![1.0], 1).await.unwrap();
    }
}
