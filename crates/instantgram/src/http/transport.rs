//! The base "send" operation the authenticated client is layered over.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::types::BaseUrl;

use super::request::{ApiRequest, MultipartForm, RequestBody};
use super::response::ApiResponse;

/// HTTP request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a single request and returns whatever the server answered.
///
/// Implementations must not interpret status codes: a 401 or 500 is an
/// `Ok` response. Only failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: BaseUrl,
}

impl ReqwestTransport {
    /// Create a transport for the given backend with the default timeout.
    pub fn new(base: BaseUrl) -> Result<Self> {
        Self::with_timeout(base, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base: BaseUrl, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("instantgram/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base })
    }

    /// Returns the backend this transport talks to.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    fn build_form(form: &MultipartForm) -> Result<Form> {
        let mut built = Form::new();
        for part in form.parts() {
            let mut field = Part::bytes(part.data.clone());
            if let Some(file_name) = &part.file_name {
                field = field.file_name(file_name.clone());
            }
            let field = field
                .mime_str(&part.mime)
                .map_err(|e| InvalidInputError::Other {
                    message: format!("invalid MIME type '{}': {}", part.mime, e),
                })?;
            built = built.part(part.name.clone(), field);
        }
        Ok(built)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.base.endpoint(request.path());
        debug!(%url, "HTTP request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        trace!(%status, len = body.len(), "HTTP response");

        Ok(ApiResponse::new(status, headers, body))
    }
}
