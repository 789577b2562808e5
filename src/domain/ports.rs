use crate::domain::model::{Notification, UploadProgress};
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Path relative to the server base URL, e.g. `/search/_tenants`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub json_body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            json_body: None,
        }
    }

    pub fn post_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            json_body: Some(body),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body; a malformed body counts as an application failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            FinderError::application(
                self.status,
                self.status_text.clone(),
                format!("malformed response body: {}", e),
            )
        })
    }

    pub fn into_application_error(self, message: impl Into<String>) -> FinderError {
        FinderError::application(self.status, self.status_text, message)
    }
}

/// A file sent as one multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content,
        }
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// HTTP access to the tenant registry.
///
/// Every returned future resolves exactly once, after the request has fully
/// completed or failed. `Err` is always a transport failure; status codes are
/// left for the caller to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;

    async fn upload(
        &self,
        path: &str,
        upload: FileUpload,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        (**self).send(request).await
    }

    async fn upload(
        &self,
        path: &str,
        upload: FileUpload,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<TransportResponse> {
        (**self).upload(path, upload, progress).await
    }
}

/// Transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

pub trait ProgressReporter: Send + Sync {
    fn update(&self, progress: UploadProgress);
    /// Hide the indicator and set it back to zero.
    fn reset(&self);
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up once written, for display.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
}
