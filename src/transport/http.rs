//! HTTP implementation of the transport against a live service

use super::{
    ProcessResult, RemoveBackgroundRequest, RemoveBackgroundResponse, Transport, TransportError,
    UploadResponse, UploadResult, REMOVE_BG_PATH, UPLOAD_PATH,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::SelectedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::Instrument;

/// Transport that talks to the service over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the configured server
    ///
    /// # Errors
    /// - Invalid server URL
    /// - Failed to create HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network("Failed to create HTTP client", e))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a service route such as `/upload`
    ///
    /// # Errors
    /// - The base URL cannot carry a path
    pub fn route(&self, path: &str) -> Result<Url> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    /// Absolute URL of the inline preview of a processed image
    ///
    /// # Errors
    /// - The base URL cannot carry a path
    pub fn preview_url(&self, output_filename: &str) -> Result<Url> {
        self.endpoint(&["preview", output_filename])
    }

    /// Absolute URL of the download of a processed image
    ///
    /// # Errors
    /// - The base URL cannot carry a path
    pub fn download_url(&self, output_filename: &str) -> Result<Url> {
        self.endpoint(&["download", output_filename])
    }

    /// Fetch the processed image as shown inline
    ///
    /// # Errors
    /// - Network errors or a non-success HTTP status
    pub async fn fetch_preview(&self, output_filename: &str) -> Result<Vec<u8>> {
        let url = self.preview_url(output_filename)?;
        self.get_bytes(url).await
    }

    /// Fetch the processed image through its download link
    ///
    /// # Errors
    /// - Network errors or a non-success HTTP status
    pub async fn download(&self, output_filename: &str) -> Result<Vec<u8>> {
        let url = self.download_url(output_filename)?;
        self.get_bytes(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::invalid_config(format!(
                    "Server URL cannot be used as a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "Fetching result image");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::network(&format!("GET {}", url), e))?;

        if !response.status().is_success() {
            return Err(ClientError::unexpected_response(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(&format!("read body of {}", url), e))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched result image");
        Ok(bytes.to_vec())
    }

    async fn send_upload(&self, file: &SelectedFile) -> UploadResult {
        let bytes = file
            .read_bytes()
            .await
            .map_err(|e| TransportError::LocalFile(e.to_string()))?;

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::network("build multipart body", e))?;
        let form = Form::new().part("file", part);

        let url = self
            .route(UPLOAD_PATH)
            .map_err(|e| TransportError::network("resolve upload route", e))?;

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::network("upload request failed", e))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| TransportError::network(&format!("unreadable upload response ({})", status), e))?;

        body.into_result()
    }

    async fn send_remove_background(&self, source_filename: &str) -> ProcessResult {
        let url = self
            .route(REMOVE_BG_PATH)
            .map_err(|e| TransportError::network("resolve remove-bg route", e))?;

        let request = RemoveBackgroundRequest {
            filename: source_filename.to_string(),
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::network("remove-bg request failed", e))?;

        let status = response.status();
        let body: RemoveBackgroundResponse = response.json().await.map_err(|e| {
            TransportError::network(&format!("unreadable remove-bg response ({})", status), e)
        })?;

        body.into_result()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload(&self, file: &SelectedFile) -> UploadResult {
        let span = tracing::info_span!("upload", file = %file.name, size = file.size);
        async {
            let result = self.send_upload(file).await;
            match &result {
                Ok(uploaded) => tracing::info!(filename = %uploaded.filename, "Upload accepted"),
                Err(e) => tracing::debug!(error = %e, "Upload failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn remove_background(&self, source_filename: &str) -> ProcessResult {
        let span = tracing::info_span!("remove_background", source = %source_filename);
        async {
            let result = self.send_remove_background(source_filename).await;
            match &result {
                Ok(image) => tracing::info!(
                    output = %image.output_filename,
                    width = image.width,
                    height = image.height,
                    "Background removed"
                ),
                Err(e) => tracing::debug!(error = %e, "Background removal failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(url: &str) -> HttpTransport {
        let config = ClientConfig::builder().server_url(url).build().unwrap();
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_routes_on_bare_host() {
        let transport = transport("http://127.0.0.1:5000");
        assert_eq!(
            transport.route(UPLOAD_PATH).unwrap().as_str(),
            "http://127.0.0.1:5000/upload"
        );
        assert_eq!(
            transport.route(REMOVE_BG_PATH).unwrap().as_str(),
            "http://127.0.0.1:5000/remove-bg"
        );
    }

    #[test]
    fn test_routes_keep_base_path() {
        let transport = transport("https://tools.example.com/bg/");
        assert_eq!(
            transport.route(UPLOAD_PATH).unwrap().as_str(),
            "https://tools.example.com/bg/upload"
        );
        assert_eq!(
            transport.download_url("abc_out.png").unwrap().as_str(),
            "https://tools.example.com/bg/download/abc_out.png"
        );
    }

    #[test]
    fn test_result_urls_encode_filename() {
        let transport = transport("http://localhost:5000");
        assert_eq!(
            transport.preview_url("a b.png").unwrap().as_str(),
            "http://localhost:5000/preview/a%20b.png"
        );
        assert_eq!(
            transport.download_url("../x.png").unwrap().path(),
            "/download/..%2Fx.png"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig {
            server_url: "mailto:someone@example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(HttpTransport::new(&config).is_err());
    }
}
