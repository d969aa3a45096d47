use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::listings::{Listing, ListingId, ListingQuery, NewListing};

/// HTTP client for the listing API.
#[derive(Debug, Clone)]
pub struct ListingApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with `success: false`.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
    #[error("unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ListingApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ClientError> {
        let request = self
            .authorize(self.http.post(self.url("/api/listing/create")))
            .json(listing);
        let created: Listing = read_json(request.send().await?).await?;
        debug!(listing = %created.id, "listing created via api");
        Ok(created)
    }

    pub async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, ClientError> {
        let request = self
            .http
            .get(self.url("/api/listing/get"))
            .query(&query.to_pairs());
        read_json(request.send().await?).await
    }

    pub async fn get(&self, id: &ListingId) -> Result<Listing, ClientError> {
        let path = format!("/api/listing/get/{}", urlencoding::encode(&id.0));
        read_json(self.http.get(self.url(&path)).send().await?).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(ClientError::Unexpected {
                status: status.as_u16(),
                body,
            })
        }
        Err(err) => return Err(ClientError::Decode(err)),
    };

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request rejected")
            .to_string();
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    if status != StatusCode::OK && status != StatusCode::CREATED {
        return Err(ClientError::Unexpected {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_value(value)?)
}
