// API client module: a small blocking HTTP client for the image server.
// Every call is awaited before the next one starts, so a batch of uploads
// goes out strictly in the order it was given.

use crate::error::{Result, TobsmgError};
use anyhow::Context;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/api/auth.login";
pub const PERM_UPLOAD_PATH: &str = "/api/upload.permUpload";
pub const TEMP_UPLOAD_PATH: &str = "/api/upload.tempUpload";

/// Holds the reqwest client, the server base URL and the auth token used
/// for upload calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Login request payload.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Upload request payload: base64 image bytes, their content type and the
/// file's base name.
#[derive(Serialize, Deserialize, Debug)]
pub struct UploadRequest {
    pub data: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
}

/// Every endpoint wraps its answer as `{result:{data:{value: ...}}}`. The
/// value is kept as a `serde_json::Value` so a numeric id is accepted too.
#[derive(Deserialize, Debug)]
struct Envelope {
    result: EnvelopeResult,
}

#[derive(Deserialize, Debug)]
struct EnvelopeResult {
    data: EnvelopeData,
}

#[derive(Deserialize, Debug)]
struct EnvelopeData {
    value: serde_json::Value,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Store the token sent with upload requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// The server expects the bare token in `authorization`, no scheme prefix.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let value = HeaderValue::from_str(t)
                .context("Auth token contains characters not allowed in a header")?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Exchange credentials for a token.
    pub fn login(&self, req: &LoginRequest) -> Result<String> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        tracing::debug!(%url, email = %req.email, "sending login request");
        let res = self.client.post(&url).json(req).send()?;
        unwrap_value(res)
    }

    /// POST one image to `path` and return the image reference the server assigned.
    pub fn upload(&self, path: &str, req: &UploadRequest) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, name = %req.name, content_type = %req.content_type, "sending upload request");
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(req)
            .send()?;
        unwrap_value(res)
    }

    /// Public viewing URL for an image reference.
    pub fn image_url(&self, image_ref: &str) -> String {
        format!("{}/img/{}", self.base_url, image_ref)
    }
}

fn unwrap_value(res: Response) -> Result<String> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().unwrap_or_default();
        return Err(TobsmgError::Http { status, body });
    }
    let body = res.text()?;
    let envelope: Envelope = serde_json::from_str(&body)
        .map_err(|e| TobsmgError::InvalidResponse(e.to_string()))?;
    match envelope.result.data.value {
        serde_json::Value::String(s) if !s.is_empty() => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(TobsmgError::InvalidResponse(format!(
            "expected a value, got {other}"
        ))),
    }
}
