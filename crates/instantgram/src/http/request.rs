//! Outbound request descriptors.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::Result;
use crate::auth::AccessToken;
use crate::error::InvalidInputError;

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A multipart form that can be rebuilt for every attempt.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

/// One field of a [`MultipartForm`].
#[derive(Clone)]
pub struct FormPart {
    pub name: String,
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime: String,
}

impl std::fmt::Debug for FormPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormPart")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .finish()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `text/plain` field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            data: value.into().into_bytes(),
            file_name: None,
            mime: "text/plain".to_string(),
        });
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            data,
            file_name: Some(file_name.into()),
            mime: mime.into(),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }
}

/// Description of a single API call.
///
/// Descriptors are plain data: the client clones and rewrites them when a
/// request has to be resubmitted with a fresh access token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: RequestBody,
    token_param: Option<String>,
    anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            token_param: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Declare a query parameter that carries the access token.
    ///
    /// The client fills it alongside the `Authorization` header and rewrites
    /// it when the request is resubmitted after a refresh.
    pub fn token_query_param(mut self, name: impl Into<String>) -> Self {
        self.token_param = Some(name.into());
        self
    }

    /// Send without credentials and without 401 interception.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Returns a copy carrying `token` in the `Authorization` header and in
    /// the declared token query parameter, if any.
    pub fn authorized(mut self, token: &AccessToken) -> Result<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|e| {
            InvalidInputError::Header {
                name: AUTHORIZATION.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.headers.insert(AUTHORIZATION, value);

        if let Some(param) = &self.token_param {
            self.query.retain(|(key, _)| key != param);
            self.query.push((param.clone(), token.as_str().to_string()));
        }

        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `Authorization` header value, if set and valid UTF-8.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}
