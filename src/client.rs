use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.clickup.com/api/v2";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("No valid system certificates found.")]
    NoCertificates,

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("ClickUp returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The two calls an import needs from a task service.
#[allow(async_fn_in_trait)]
pub trait TaskService {
    /// Creates a task and returns its id.
    async fn create_task(
        &self,
        name: &str,
        description: &str,
        parent: Option<&str>,
    ) -> Result<String, ClientError>;

    async fn set_status(&self, task_id: &str, status: &str) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct NewTask<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

#[derive(Deserialize)]
struct CreatedTask {
    id: String,
}

#[derive(Clone)]
pub struct ClickUpClient {
    client: HttpsClient,
    api_url: String,
    token: String,
    list_id: String,
}

impl fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickUpClient")
            .field("api_url", &self.api_url)
            .field("list_id", &self.list_id)
            .finish_non_exhaustive()
    }
}

impl ClickUpClient {
    pub fn new(api_url: &str, token: &str, list_id: &str) -> Result<Self, ClientError> {
        let api_url = api_url.trim_end_matches('/');
        let uri: Uri = api_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ClientError::InvalidUrl(format!("{api_url} ({e})")))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(ClientError::InvalidUrl(api_url.to_string()));
        }

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);

        // Plain http endpoints (local mocks, proxies) work without a trust store.
        if root_store.is_empty() && uri.scheme_str() == Some("https") {
            return Err(ClientError::NoCertificates);
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            token: token.to_string(),
            list_id: list_id.to_string(),
        })
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    /// Sends one JSON request and returns the status with the raw body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: String,
    ) -> Result<(StatusCode, String), ClientError> {
        let uri = format!("{}{}", self.api_url, path);
        tracing::debug!("{} {}", method, uri);

        let req = Request::builder()
            .method(method)
            .uri(&uri)
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)?;

        let exchange = async {
            let resp = self
                .client
                .request(req)
                .await
                .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;
            let status = resp.status();
            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?
                .to_bytes();
            Ok::<_, ClientError>((status, String::from_utf8_lossy(&body).into_owned()))
        };

        tokio::time::timeout(REQUEST_TIMEOUT, exchange)
            .await
            .map_err(|_| ClientError::Timeout(REQUEST_TIMEOUT))?
    }
}

impl TaskService for ClickUpClient {
    async fn create_task(
        &self,
        name: &str,
        description: &str,
        parent: Option<&str>,
    ) -> Result<String, ClientError> {
        let payload = serde_json::to_string(&NewTask {
            name,
            description,
            parent,
        })?;
        let path = format!("/list/{}/task", self.list_id);

        let (status, body) = self.send(Method::POST, &path, payload).await?;
        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }

        let created: CreatedTask = serde_json::from_str(&body)?;
        Ok(created.id)
    }

    async fn set_status(&self, task_id: &str, status: &str) -> Result<(), ClientError> {
        if status.is_empty() {
            return Ok(());
        }
        let payload = serde_json::to_string(&StatusUpdate { status })?;
        let path = format!("/task/{}", task_id);

        let (code, body) = self.send(Method::PUT, &path, payload).await?;
        if !code.is_success() {
            return Err(ClientError::Status { status: code, body });
        }
        Ok(())
    }
}
