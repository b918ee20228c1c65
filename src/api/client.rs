use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, multipart};
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, extract_detail};
use crate::api::types::{
    ChatRequest, ChatResponse, Credentials, FileList, HealthStatus, RegisteredUser,
    TokenResponse, UploadReceipt,
};
use crate::config::Config;
use crate::session::Session;

/// HTTP client for the document-chat backend.
///
/// Every request carries the session's bearer token when one is present, and
/// every 401 is reported to the session before the error is returned.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    session: Arc<Session>,
    http: Client,
}

impl ApiClient {
    pub fn new(config: Config, session: Arc<Session>) -> Result<Self, ApiError> {
        let mut builder =
            Client::builder().user_agent(concat!("documind/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `GET /`, used to check the backend is reachable.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self.send(self.request(Method::GET, "/")).await?;
        Ok(response.json().await?)
    }

    /// `POST /token`. Returns the issued token without storing it.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let response = self
            .send(self.request(Method::POST, "/token").json(credentials))
            .await?;

        let body: TokenResponse = response.json().await?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    /// `POST /register`.
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser, ApiError> {
        let response = self
            .send(self.request(Method::POST, "/register").json(credentials))
            .await?;
        Ok(response.json().await?)
    }

    /// `GET /files`: names of the documents the user owns.
    pub async fn list_files(&self) -> Result<Vec<String>, ApiError> {
        let response = self.send(self.authed(Method::GET, "/files")?).await?;
        let body: FileList = response.json().await?;
        Ok(body.files)
    }

    /// Upload a document from disk as the multipart field `file`.
    pub async fn upload_file(&self, path: &Path) -> Result<Option<UploadReceipt>, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        self.upload_bytes(&file_name, bytes).await
    }

    /// `POST /upload`. A 204 or an unrecognised success body yields `None`.
    pub async fn upload_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<UploadReceipt>, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(file_name, "Uploading document");
        let response = self
            .send(self.authed(Method::POST, "/upload")?.multipart(form))
            .await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice(&body) {
            Ok(receipt) => Ok(Some(receipt)),
            Err(err) => {
                tracing::debug!("Upload response was not a receipt: {}", err);
                Ok(None)
            }
        }
    }

    /// `POST /chat`. Returns the raw, unparsed answer string.
    pub async fn chat(&self, question: &str) -> Result<String, ApiError> {
        let response = self
            .send(
                self.authed(Method::POST, "/chat")?
                    .json(&ChatRequest { question }),
            )
            .await?;

        let body: ChatResponse = response.json().await?;
        Ok(body.answer)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.endpoint(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Like [`request`](Self::request) but refuses to go out without a token.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        if !self.session.is_authenticated() {
            return Err(ApiError::NotAuthenticated);
        }
        Ok(self.request(method, path))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body);

        if status == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized();
            return Err(ApiError::Unauthorized { detail });
        }

        Err(ApiError::Status { status, detail })
    }
}
