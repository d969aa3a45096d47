use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use super::{check_upload, object_name, ImageFile, ImageStore, StorageError};
use crate::config::StorageConfig;

/// Firebase Storage REST client.
///
/// Uploads go to `POST {endpoint}/v0/b/{bucket}/o?name=<object>` and the
/// returned download token is folded into a public `alt=media` URL.
#[derive(Debug, Clone)]
pub struct FirebaseStorage {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

impl FirebaseStorage {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            auth_token: None,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &StorageConfig) -> Self {
        Self::new(http, config.endpoint.clone(), config.bucket.clone())
    }

    /// Attach a Firebase ID token for buckets whose rules require sign-in.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn objects_url(&self) -> String {
        format!("{}/v0/b/{}/o", self.endpoint, self.bucket)
    }

    pub fn download_url(&self, object: &str, token: &str) -> String {
        format!(
            "{}/{}?alt=media&token={}",
            self.objects_url(),
            urlencoding::encode(object),
            urlencoding::encode(token)
        )
    }
}

#[async_trait]
impl ImageStore for FirebaseStorage {
    async fn upload(&self, file: &ImageFile) -> Result<String, StorageError> {
        check_upload(file)?;

        let object = object_name(file, Utc::now().timestamp_millis());
        let mut request = self
            .http
            .post(self.objects_url())
            .query(&[("name", object.as_str())])
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(file.bytes.clone());
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Firebase {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Rejected {
                name: file.name.clone(),
                status: status.as_u16(),
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        let token = uploaded
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| StorageError::MissingToken(uploaded.name.clone()))?;

        debug!(
            object = %uploaded.name,
            bytes = file.bytes.len(),
            "image upload complete"
        );
        Ok(self.download_url(&uploaded.name, token))
    }
}
