//! # Image Upload Boundary
//!
//! Accepts a binary image (size-capped, content-type restricted), hands it to
//! the external image host, and returns the durable URL the host assigns.
//! Only that URL is ever persisted; raw bytes never reach the database.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use url::Url;

use crate::config::AppConfig;
use crate::error::{ApiError, validation_error};

/// A decoded, validated image ready for upload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Decode a base64 form field into an upload payload, enforcing the byte
/// ceiling and the allowed content types from configuration.
pub fn decode_image(
    data_base64: &str,
    content_type: &str,
    config: &AppConfig,
) -> Result<ImagePayload, ApiError> {
    let content_type = content_type.trim();
    if !config
        .image_allowed_types
        .iter()
        .any(|allowed| allowed == content_type)
    {
        return Err(validation_error(
            "Unsupported image type",
            serde_json::json!({
                "image_content_type": format!("Must be one of: {}", config.image_allowed_types.join(", "))
            }),
        ));
    }

    let bytes = general_purpose::STANDARD
        .decode(data_base64.trim())
        .map_err(|_| {
            validation_error(
                "Invalid image encoding",
                serde_json::json!({ "image_base64": "Must be valid base64" }),
            )
        })?;

    if bytes.is_empty() {
        return Err(validation_error(
            "Empty image",
            serde_json::json!({ "image_base64": "Image data cannot be empty" }),
        ));
    }

    if bytes.len() > config.image_max_bytes {
        return Err(validation_error(
            "Image too large",
            serde_json::json!({
                "image_base64": format!("Image exceeds the maximum of {} bytes", config.image_max_bytes)
            }),
        ));
    }

    Ok(ImagePayload {
        bytes,
        content_type: content_type.to_string(),
    })
}

/// External image host boundary. Returns the durable URL for the stored
/// image; any error aborts the mutation that requested the upload.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, payload: &ImagePayload) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Image store backed by an HTTP upload endpoint.
pub struct HttpImageStore {
    client: reqwest::Client,
    upload_url: Url,
    api_key: Option<String>,
}

impl HttpImageStore {
    pub fn new(upload_url: Url, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            upload_url,
            api_key,
        })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, payload: &ImagePayload) -> anyhow::Result<String> {
        let mut request = self
            .client
            .post(self.upload_url.clone())
            .header("content-type", payload.content_type.clone())
            .body(payload.bytes.clone());

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "image host returned error status {}",
                status
            ));
        }

        let body = response.json::<UploadResponse>().await?;
        Ok(body.url)
    }
}

/// Image store for the local profile and tests: returns a fixed URL when one
/// is configured, otherwise reports the host as unavailable.
#[derive(Debug, Default)]
pub struct StaticImageStore {
    url: Option<String>,
}

impl StaticImageStore {
    pub fn with_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
        }
    }
}

#[async_trait]
impl ImageStore for StaticImageStore {
    async fn upload(&self, _payload: &ImagePayload) -> anyhow::Result<String> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => Err(anyhow::anyhow!("image host not configured")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn decode_accepts_allowed_type_within_cap() {
        let config = AppConfig::default();
        let payload = decode_image(&encoded(b"fake-jpeg-bytes"), "image/jpeg", &config).unwrap();
        assert_eq!(payload.bytes, b"fake-jpeg-bytes");
        assert_eq!(payload.content_type, "image/jpeg");
    }

    #[test]
    fn decode_rejects_disallowed_content_type() {
        let config = AppConfig::default();
        let err = decode_image(&encoded(b"%PDF-1.4"), "application/pdf", &config).unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let config = AppConfig::default();
        let err = decode_image("not-base64!!!", "image/png", &config).unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
    }

    #[test]
    fn decode_rejects_oversized_payload() {
        let config = AppConfig {
            image_max_bytes: 1024,
            ..Default::default()
        };
        let big = vec![0u8; 2048];
        let err = decode_image(&encoded(&big), "image/png", &config).unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
        assert!(
            err.details
                .unwrap()
                .to_string()
                .contains("exceeds the maximum")
        );
    }

    #[test]
    fn decode_rejects_empty_payload() {
        let config = AppConfig::default();
        let err = decode_image("", "image/png", &config).unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
    }

    #[tokio::test]
    async fn unconfigured_static_store_fails_uploads() {
        let store = StaticImageStore::default();
        let payload = ImagePayload {
            bytes: b"img".to_vec(),
            content_type: "image/png".to_string(),
        };
        assert!(store.upload(&payload).await.is_err());
    }
}
