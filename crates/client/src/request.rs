//! Request descriptions.
//!
//! An [`ApiRequest`] is a value, not a one-shot builder: the client can
//! issue it, and - after a token refresh - issue it again. That is why form
//! bodies are kept as rebuildable [`FormPart`]s rather than a consumed
//! `reqwest::multipart::Form`.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::ApiError;

/// A request to the rental API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path joined onto the base URL (e.g., `"orders/"`).
    pub path: String,
    /// Extra caller-supplied headers, copied into every attempt.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// A bodiless request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// GET `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// DELETE `path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// POST `path` with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Json`] if the payload cannot be serialized.
    pub fn post_json<T: Serialize>(path: impl Into<String>, payload: &T) -> Result<Self, ApiError> {
        Self::with_json(Method::POST, path, payload)
    }

    /// PUT `path` with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Json`] if the payload cannot be serialized.
    pub fn put_json<T: Serialize>(path: impl Into<String>, payload: &T) -> Result<Self, ApiError> {
        Self::with_json(Method::PUT, path, payload)
    }

    /// PATCH `path` with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Json`] if the payload cannot be serialized.
    pub fn patch_json<T: Serialize>(path: impl Into<String>, payload: &T) -> Result<Self, ApiError> {
        Self::with_json(Method::PATCH, path, payload)
    }

    /// POST `path` with a multipart form body.
    #[must_use]
    pub fn post_form(path: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Form(parts),
        }
    }

    /// Attach an extra header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    fn with_json<T: Serialize>(
        method: Method,
        path: impl Into<String>,
        payload: &T,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Json(serde_json::to_value(payload)?),
        })
    }
}

/// Body of an [`ApiRequest`].
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON-encoded payload.
    Json(serde_json::Value),
    /// Multipart form payload. The transport sets its own boundary
    /// content-type, so no JSON content-type is attached.
    Form(Vec<FormPart>),
}

impl RequestBody {
    /// Whether this body carries multipart form data.
    #[must_use]
    pub const fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

impl FormPart {
    /// A text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    /// A file field.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                filename: filename.into(),
                content_type: content_type.into(),
                data,
            },
        }
    }
}

/// Value of a form part.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text value.
    Text(String),
    /// Binary file upload.
    File {
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}
