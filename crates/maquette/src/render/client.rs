//! HTTP client for the third-party design-rendering service.
//!
//! The service contract is fixed: multipart upload into a per-job
//! workspace, format exports that may queue, a queue-status endpoint,
//! direct artifact downloads, and a merge collaborator that combines PDF
//! URLs. [`DesignService`] is the seam the orchestrator drives;
//! [`HttpDesignService`] implements it over blocking `ureq` calls, which
//! matches the sequential orchestration contract.

use std::io::Read;

use log::debug;
use rand::{RngExt, distr::Alphanumeric};
use serde_json::Value;
use thiserror::Error;

use crate::config::ServiceConfig;

/// Errors surfaced by the rendering service transport.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("no merge endpoint configured")]
    MergeUnavailable,
}

/// Export target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// The intermediate designer-editable format.
    Desd,
    /// The final PDF.
    Pdf,
}

impl ResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desd => "desd",
            Self::Pdf => "pdf",
        }
    }
}

/// Outcome of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTicket {
    /// The service queued the conversion; poll the queue id.
    Queued(String),
    /// The conversion completed inline.
    Completed,
}

/// State reported by the queue endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    Success,
    Error,
    Failed,
    /// Any non-terminal state, carried verbatim.
    Pending(String),
}

impl QueueState {
    fn from_wire(state: &str) -> Self {
        match state {
            "success" => Self::Success,
            "error" => Self::Error,
            "failed" => Self::Failed,
            other => Self::Pending(other.to_owned()),
        }
    }
}

/// The rendering-service operations the orchestrator depends on.
///
/// One implementation talks HTTP; tests substitute scripted fakes.
pub trait DesignService {
    /// Uploads a file into the job's workspace and returns the stored
    /// document name.
    fn upload(&self, job_id: &str, file_name: &str, bytes: &[u8]) -> Result<String, ServiceError>;

    /// Requests a format conversion of an uploaded document.
    fn request_export(
        &self,
        job_id: &str,
        document_name: &str,
        export_name: &str,
        result_type: ResultType,
    ) -> Result<ExportTicket, ServiceError>;

    /// Reads the state of a queued conversion.
    fn queue_state(&self, queue_id: &str) -> Result<QueueState, ServiceError>;

    /// Downloads an artifact (e.g. `output/{name}.desd`) from the job's
    /// workspace.
    fn download(&self, job_id: &str, artifact: &str) -> Result<Vec<u8>, ServiceError>;

    /// Submits PDF URLs in page order and returns the combined PDF URL.
    fn merge_pdfs(&self, urls: &[String]) -> Result<String, ServiceError>;

    /// URL of the designer view for a converted document.
    fn designer_url(&self, job_id: &str, export_name: &str) -> String;

    /// Direct download URL for an artifact in the job's workspace.
    fn download_url(&self, job_id: &str, artifact: &str) -> String;
}

/// Production implementation over blocking HTTP.
pub struct HttpDesignService {
    host: String,
    merge_url: Option<String>,
    agent: ureq::Agent,
}

impl HttpDesignService {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            host: config.host().trim_end_matches('/').to_owned(),
            merge_url: config.merge_url().map(str::to_owned),
            agent: ureq::agent(),
        }
    }

    fn get_json(&self, url: &str) -> Result<Value, ServiceError> {
        let response = self.agent.get(url).call().map_err(|err| map_err(url, err))?;
        response
            .into_json()
            .map_err(|err| ServiceError::MalformedResponse {
                url: url.to_owned(),
                message: err.to_string(),
            })
    }
}

impl DesignService for HttpDesignService {
    fn upload(&self, job_id: &str, file_name: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let url = format!("{}/api/upload/?ticketID={job_id}", self.host);
        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, file_name, bytes);

        debug!(url = url.as_str(), file_name, size = bytes.len(); "Uploading document");
        let response = self
            .agent
            .post(&url)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(|err| map_err(&url, err))?;

        let json: Value = response
            .into_json()
            .map_err(|err| ServiceError::MalformedResponse {
                url: url.clone(),
                message: err.to_string(),
            })?;
        json["files"][0]["name"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ServiceError::MalformedResponse {
                url,
                message: "missing files[0].name".to_owned(),
            })
    }

    fn request_export(
        &self,
        job_id: &str,
        document_name: &str,
        export_name: &str,
        result_type: ResultType,
    ) -> Result<ExportTicket, ServiceError> {
        let url = format!(
            "{}/api/export/?waitType=json&document-name={document_name}&ticketID={job_id}\
             &exportName={export_name}&resultTypes={}&outHow=json",
            self.host,
            result_type.as_str(),
        );

        debug!(url = url.as_str(), result_type = result_type.as_str(); "Requesting export");
        let json = self.get_json(&url)?;
        match json.get("queue-id").and_then(Value::as_str) {
            Some(queue_id) => Ok(ExportTicket::Queued(queue_id.to_owned())),
            None => Ok(ExportTicket::Completed),
        }
    }

    fn queue_state(&self, queue_id: &str) -> Result<QueueState, ServiceError> {
        let url = format!("{}/api/queue/{queue_id}", self.host);
        let json = self.get_json(&url)?;
        let state = json
            .get("state")
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::MalformedResponse {
                url,
                message: "missing state".to_owned(),
            })?;
        Ok(QueueState::from_wire(state))
    }

    fn download(&self, job_id: &str, artifact: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.download_url(job_id, artifact);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| map_err(&url, err))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|err| ServiceError::Transport {
                url,
                message: err.to_string(),
            })?;
        Ok(bytes)
    }

    fn merge_pdfs(&self, urls: &[String]) -> Result<String, ServiceError> {
        let merge_url = self
            .merge_url
            .as_deref()
            .ok_or(ServiceError::MergeUnavailable)?;

        debug!(count = urls.len(); "Merging PDFs");
        let response = self
            .agent
            .post(merge_url)
            .send_json(serde_json::json!({ "files": urls }))
            .map_err(|err| map_err(merge_url, err))?;

        let json: Value = response
            .into_json()
            .map_err(|err| ServiceError::MalformedResponse {
                url: merge_url.to_owned(),
                message: err.to_string(),
            })?;
        json.get("url")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ServiceError::MalformedResponse {
                url: merge_url.to_owned(),
                message: "missing url".to_owned(),
            })
    }

    fn designer_url(&self, job_id: &str, export_name: &str) -> String {
        format!(
            "{}/designer/?document-name=output%2F{export_name}.desd&jobid={job_id}&locale=en",
            self.host
        )
    }

    fn download_url(&self, job_id: &str, artifact: &str) -> String {
        format!("{}/api/download/{job_id}/{artifact}", self.host)
    }
}

fn map_err(url: &str, err: ureq::Error) -> ServiceError {
    match err {
        ureq::Error::Status(status, _) => ServiceError::Status {
            url: url.to_owned(),
            status,
        },
        ureq::Error::Transport(transport) => ServiceError::Transport {
            url: url.to_owned(),
            message: transport.to_string(),
        },
    }
}

fn multipart_boundary() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("----maquette-{suffix}")
}

/// Assembles a single-field `multipart/form-data` body with the file
/// under the field name `file`, as the upload endpoint expects.
fn multipart_body(boundary: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
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
    fn test_queue_state_from_wire() {
        assert_eq!(QueueState::from_wire("success"), QueueState::Success);
        assert_eq!(QueueState::from_wire("error"), QueueState::Error);
        assert_eq!(QueueState::from_wire("failed"), QueueState::Failed);
        assert_eq!(
            QueueState::from_wire("running"),
            QueueState::Pending("running".to_owned())
        );
    }

    #[test]
    fn test_multipart_body_shape() {
        let body = multipart_body("----b", "page.json", b"{}");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("------b\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"page.json\""));
        assert!(text.contains("\r\n\r\n{}\r\n"));
        assert!(text.ends_with("------b--\r\n"));
    }

    #[test]
    fn test_url_construction() {
        let config = ServiceConfig::for_host("https://render.example");
        let service = HttpDesignService::new(&config);
        assert_eq!(
            service.designer_url("job-1", "page-a"),
            "https://render.example/designer/?document-name=output%2Fpage-a.desd&jobid=job-1&locale=en"
        );
        assert_eq!(
            service.download_url("job-1", "output/page-a.pdf"),
            "https://render.example/api/download/job-1/output/page-a.pdf"
        );
    }

    #[test]
    fn test_result_type_names() {
        assert_eq!(ResultType::Desd.as_str(), "desd");
        assert_eq!(ResultType::Pdf.as_str(), "pdf");
    }
}
