use crate::core::{
    ConfigProvider, FileUpload, ProgressReporter, Result, Transport, TransportRequest,
    TransportResponse, UploadProgress,
};
use crate::domain::ports::HttpMethod;
use crate::utils::error::FinderError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|e| FinderError::InvalidConfigValueError {
            field: "server.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), Duration::from_secs(config.timeout_seconds()))
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            FinderError::ConfigError {
                message: format!("Cannot build URL for {}: {}", path, e),
            }
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn read_response(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status();
        let body = response.text().await?;
        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body,
        ))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = self.url(&request.path, &request.query)?;
        tracing::debug!("{:?} {}", request.method, url);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        let builder = match &request.json_body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        tracing::debug!("Response status: {}", response.status());
        Self::read_response(response).await
    }

    async fn upload(
        &self,
        path: &str,
        upload: FileUpload,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<TransportResponse> {
        let url = self.url(path, &[])?;
        let total = upload.len();
        tracing::debug!("POST {} (multipart, {} bytes)", url, total);

        let chunks: Vec<Vec<u8>> = upload
            .content
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(<[u8]>::to_vec)
            .collect();

        // progress is reported as hyper pulls each chunk off the stream
        let mut loaded = 0u64;
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            loaded += chunk.len() as u64;
            progress.update(UploadProgress::new(loaded, total));
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(upload.file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part(upload.field, part);

        let response = self.client.post(url).multipart(form).send().await?;
        tracing::debug!("Upload response status: {}", response.status());
        Self::read_response(response).await
    }
}
