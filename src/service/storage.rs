// service/storage.rs
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::utils::code_generator::generate_receipt_filename;

/// A receipt file as received from the client, before it is pushed to
/// object storage.
#[derive(Debug, Clone)]
pub struct ReceiptFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Storage transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage rejected upload with status {0}")]
    Rejected(u16),

    #[error("Storage returned an unreadable response: {0}")]
    BadResponse(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// Pushes receipts to an S3-compatible HTTP storage API and hands back a
/// public URL. From here on the rest of the system treats the URL as an
/// opaque string.
#[derive(Debug, Clone)]
pub struct StorageService {
    api_url: String,
    api_key: String,
    public_url: String,
    client: reqwest::Client,
}

impl StorageService {
    pub fn new(config: &Config) -> Self {
        Self {
            api_url: config.storage_api_url.clone(),
            api_key: config.storage_api_key.clone(),
            public_url: config.storage_public_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn upload(&self, receipt: &ReceiptFile) -> Result<String, UploadError> {
        let object_name = generate_receipt_filename(&receipt.filename);

        let mut request = self
            .client
            .put(format!("{}/{}", self.api_url, object_name))
            .body(receipt.bytes.clone());

        if let Some(content_type) = &receipt.content_type {
            request = request.header("Content-Type", content_type);
        }
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(UploadError::Rejected(response.status().as_u16()));
        }

        // Some stores echo a canonical URL back; fall back to the public base.
        let url = match response.json::<UploadResponse>().await {
            Ok(body) => body.url,
            Err(_) => None,
        };

        Ok(url.unwrap_or_else(|| format!("{}/{}", self.public_url, object_name)))
    }
}
