//! Azure Blob Storage REST adapter

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

use blob_log_domain::shared_kernel::ConfigError;
use blob_log_domain::storage::{BlobStore, StorageError};

use super::connection_string::AzureConnectionString;
use super::signing::{API_VERSION, SharedKeyCredential, SignableRequest, ms_date};

const SERVICE: &str = "azure-blob";
const LOG_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Default timeout for a single storage request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AzureBlobStore {
    client: reqwest::Client,
    credential: SharedKeyCredential,
    endpoint: Url,
}

/// One outgoing request before signing
struct BlobRequest<'a> {
    method: Method,
    segments: &'a [&'a str],
    query: &'a [(&'a str, &'a str)],
    body: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    if_none_match: Option<&'a str>,
    blob_type: Option<&'a str>,
}

impl<'a> BlobRequest<'a> {
    fn new(method: Method, segments: &'a [&'a str]) -> Self {
        Self {
            method,
            segments,
            query: &[],
            body: None,
            content_type: None,
            if_none_match: None,
            blob_type: None,
        }
    }
}

impl AzureBlobStore {
    pub fn new(
        connection: AzureConnectionString,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ConfigError::Validation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credential: SharedKeyCredential::new(connection.account_name, connection.account_key),
            endpoint: connection.blob_endpoint,
        })
    }

    pub fn from_connection_string(connection_string: &str) -> Result<Self, ConfigError> {
        Self::new(
            AzureConnectionString::parse(connection_string)?,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    /// Resource URL for the given path segments and query
    pub fn resource_url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, StorageError> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StorageError::service(SERVICE, format!("endpoint cannot be a base: {}", self.endpoint))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send(&self, request: BlobRequest<'_>) -> Result<Response, StorageError> {
        let url = self.resource_url(request.segments, request.query)?;
        let body = request.body.unwrap_or_default();

        let mut ms_headers = BTreeMap::from([
            ("x-ms-date".to_string(), ms_date(chrono::Utc::now())),
            ("x-ms-version".to_string(), API_VERSION.to_string()),
        ]);
        if let Some(blob_type) = request.blob_type {
            ms_headers.insert("x-ms-blob-type".to_string(), blob_type.to_string());
        }

        let authorization = self.credential.authorization(&SignableRequest {
            method: request.method.as_str(),
            url: &url,
            content_length: body.len(),
            content_type: request.content_type,
            if_none_match: request.if_none_match,
            ms_headers: &ms_headers,
        });

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header("Authorization", authorization);
        for (name, value) in &ms_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header("Content-Type", content_type);
        }
        if let Some(condition) = request.if_none_match {
            builder = builder.header("If-None-Match", condition);
        }
        if request.method == Method::PUT {
            builder = builder.body(body.to_vec());
        }

        debug!(method = %request.method, url = %url, "Azure blob request");

        builder
            .send()
            .await
            .map_err(|e| StorageError::service(SERVICE, format!("request to {} failed: {}", url, e)))
    }

    async fn unexpected(response: Response) -> StorageError {
        let status = response.status();
        let code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response.text().await.unwrap_or_default();
        let detail = if code.is_empty() { body } else { code };
        StorageError::service(SERVICE, format!("HTTP {}: {}", status.as_u16(), detail.trim()))
    }

    fn container_not_found(container: &str) -> StorageError {
        StorageError::ContainerNotFound {
            container: container.to_string(),
        }
    }

    /// 404 on a blob request means either the blob or its container is gone
    fn blob_not_found(response: &Response, container: &str, object: &str) -> StorageError {
        let code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|v| v.to_str().ok());
        if code == Some("ContainerNotFound") {
            Self::container_not_found(container)
        } else {
            StorageError::ObjectNotFound {
                container: container.to_string(),
                object: object.to_string(),
            }
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn backend_name(&self) -> &'static str {
        SERVICE
    }

    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        let segments = [container];
        let mut request = BlobRequest::new(Method::HEAD, &segments);
        request.query = &[("restype", "container")];
        let response = self.send(request).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        let segments = [container];
        let mut request = BlobRequest::new(Method::PUT, &segments);
        request.query = &[("restype", "container")];
        let response = self.send(request).await?;
        match response.status() {
            StatusCode::CREATED => Ok(()),
            StatusCode::CONFLICT => Err(StorageError::AlreadyExists {
                resource: container.to_string(),
            }),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn object_exists(&self, container: &str, object: &str) -> Result<bool, StorageError> {
        let response = self
            .send(BlobRequest::new(Method::HEAD, &[container, object]))
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        initial_content: &[u8],
    ) -> Result<(), StorageError> {
        let segments = [container, object];
        let mut request = BlobRequest::new(Method::PUT, &segments);
        request.body = Some(initial_content);
        request.content_type = Some(LOG_CONTENT_TYPE);
        request.blob_type = Some("BlockBlob");
        request.if_none_match = Some("*");

        let response = self.send(request).await?;
        match response.status() {
            StatusCode::CREATED => Ok(()),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                Err(StorageError::AlreadyExists {
                    resource: format!("{}/{}", container, object),
                })
            }
            StatusCode::NOT_FOUND => Err(Self::container_not_found(container)),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn read_object(&self, container: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .send(BlobRequest::new(Method::GET, &[container, object]))
            .await?;
        match response.status() {
            StatusCode::OK => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| StorageError::service(SERVICE, format!("reading body: {}", e))),
            StatusCode::NOT_FOUND => Err(Self::blob_not_found(&response, container, object)),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn write_object(
        &self,
        container: &str,
        object: &str,
        content: &[u8],
    ) -> Result<(), StorageError> {
        let segments = [container, object];
        let mut request = BlobRequest::new(Method::PUT, &segments);
        request.body = Some(content);
        request.content_type = Some(LOG_CONTENT_TYPE);
        request.blob_type = Some("BlockBlob");

        let response = self.send(request).await?;
        match response.status() {
            StatusCode::CREATED => Ok(()),
            StatusCode::NOT_FOUND => Err(Self::container_not_found(container)),
            _ => Err(Self::unexpected(response).await),
        }
    }
}
