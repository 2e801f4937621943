//! HTTP access to the remote inspection service.
//!
//! All remote failures are surfaced as one opaque error per operation; the
//! caller never distinguishes validation, authorization, and transport
//! problems. The [`InspectionApi`] trait is the seam tests use to substitute
//! an in-memory service.

use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::schema::{Inspection, InspectionStep, InspectionStatus, StepStatus, UserRecord};

/// Default base URL of the inspection service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/api";

const URL_ENV: &str = "PLANTCHECK_URL";
const CREDENTIALS_ENV: &str = "PLANTCHECK_CREDENTIALS";

/// Connection settings for the remote service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Pre-encoded basic-auth token sent as `Authorization: Basic <token>`.
    pub credentials: Option<String>,
}

impl ServiceConfig {
    /// Resolve the configuration from an explicit flag value and the
    /// environment, falling back to the local development default.
    pub fn from_env(flag_url: Option<&str>) -> Self {
        let base_url = flag_url
            .map(str::to_string)
            .or_else(|| env::var(URL_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        let credentials = env::var(CREDENTIALS_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        ServiceConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

/// Logical operations of the remote service.
///
/// Mutations return the persisted record so the local store adopts exactly
/// what the server confirmed, never an optimistic local guess.
pub trait InspectionApi {
    fn fetch_inspection(&self, inspection_id: u64) -> Result<Inspection>;
    fn fetch_steps(&self, inspection_id: u64) -> Result<Vec<InspectionStep>>;
    fn update_inspection_status(
        &self,
        inspection_id: u64,
        status: &InspectionStatus,
    ) -> Result<Inspection>;
    fn update_step_status(&self, step_id: u64, status: &StepStatus) -> Result<InspectionStep>;
    fn update_step_comment(&self, step_id: u64, comment: &str) -> Result<InspectionStep>;
    fn upload_step_photo(
        &self,
        step_id: u64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<InspectionStep>;
    fn login(&self, username: &str, password: &str) -> Result<UserRecord>;
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

#[derive(Serialize)]
struct CommentUpdate<'a> {
    comment: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Blocking `ureq`-backed client.
pub struct HttpApi {
    agent: ureq::Agent,
    config: ServiceConfig,
}

impl HttpApi {
    pub fn new(config: ServiceConfig) -> Self {
        HttpApi {
            agent: ureq::Agent::new_with_defaults(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn auth_header(&self) -> Option<String> {
        self.config
            .credentials
            .as_ref()
            .map(|token| format!("Basic {token}"))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut request = self.agent.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .call()
            .with_context(|| format!("GET {path} failed"))?;
        response
            .body_mut()
            .read_json::<T>()
            .with_context(|| format!("decode response of GET {path}"))
    }

    fn put_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let mut request = self.agent.put(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .send_json(body)
            .with_context(|| format!("PUT {path} failed"))?;
        response
            .body_mut()
            .read_json::<T>()
            .with_context(|| format!("decode response of PUT {path}"))
    }

    fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let mut request = self.agent.post(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .send_json(body)
            .with_context(|| format!("POST {path} failed"))?;
        response
            .body_mut()
            .read_json::<T>()
            .with_context(|| format!("decode response of POST {path}"))
    }
}

impl InspectionApi for HttpApi {
    fn fetch_inspection(&self, inspection_id: u64) -> Result<Inspection> {
        self.get_json(&format!("inspections/{inspection_id}"))
    }

    fn fetch_steps(&self, inspection_id: u64) -> Result<Vec<InspectionStep>> {
        self.get_json(&format!("inspections/{inspection_id}/steps"))
    }

    fn update_inspection_status(
        &self,
        inspection_id: u64,
        status: &InspectionStatus,
    ) -> Result<Inspection> {
        let body = StatusUpdate {
            status: status.as_wire(),
        };
        self.put_json(&format!("inspections/{inspection_id}/status"), &body)
    }

    fn update_step_status(&self, step_id: u64, status: &StepStatus) -> Result<InspectionStep> {
        let body = StatusUpdate {
            status: status.as_wire(),
        };
        self.put_json(&format!("inspection-steps/{step_id}/status"), &body)
    }

    fn update_step_comment(&self, step_id: u64, comment: &str) -> Result<InspectionStep> {
        let body = CommentUpdate { comment };
        self.put_json(&format!("inspection-steps/{step_id}/comment"), &body)
    }

    fn upload_step_photo(
        &self,
        step_id: u64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<InspectionStep> {
        let path = format!("inspection-steps/{step_id}/photo");
        let boundary = multipart_boundary();
        let body = multipart_file_body(&boundary, file_name, bytes);
        let mut request = self.agent.post(self.url(&path)).header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        );
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .send(&body[..])
            .with_context(|| format!("POST {path} failed"))?;
        response
            .body_mut()
            .read_json::<InspectionStep>()
            .with_context(|| format!("decode response of POST {path}"))
    }

    fn login(&self, username: &str, password: &str) -> Result<UserRecord> {
        let body = LoginRequest { username, password };
        self.post_json("auth/login", &body)
    }
}

fn multipart_boundary() -> String {
    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!("plantcheck-{epoch_ms}")
}

/// Encode a single `file` part the way the service's upload endpoint expects.
fn multipart_file_body(boundary: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_frames_the_file_part() {
        let body = multipart_file_body("b42", "leak.jpg", b"JPEGDATA");
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--b42\r\n"));
        assert!(text.contains("filename=\"leak.jpg\""));
        assert!(text.contains("JPEGDATA"));
        assert!(text.ends_with("--b42--\r\n"));
    }

    #[test]
    fn url_joins_base_and_path() {
        let config = ServiceConfig {
            base_url: "http://example.test/api".to_string(),
            credentials: None,
        };
        let api = HttpApi::new(config);
        assert_eq!(api.url("inspections/1"), "http://example.test/api/inspections/1");
    }
}
