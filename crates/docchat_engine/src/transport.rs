use std::time::Duration;

use client_logging::{client_debug, client_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{ChatQuery, ChatReplyWire};
use crate::{ChatReply, FailureKind, RequestError, ServerMessage, UploadFile};

/// Extensions the document server accepts; anything else is still sent.
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["pdf", "pptx", "csv", "docx", "txt", "md"];

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub chat_timeout: Option<Duration>,
    pub upload_timeout: Option<Duration>,
    pub clear_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            chat_timeout: Some(Duration::from_secs(120)),
            upload_timeout: Some(Duration::from_secs(300)),
            clear_timeout: None,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn deadlines(&self) -> RequestDeadlines {
        RequestDeadlines {
            chat: self.chat_timeout,
            upload: self.upload_timeout,
            clear: self.clear_timeout,
        }
    }
}

/// Per-operation deadlines; `None` waits indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestDeadlines {
    pub chat: Option<Duration>,
    pub upload: Option<Duration>,
    pub clear: Option<Duration>,
}

/// The three document-server endpoints.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, query: &str) -> Result<ChatReply, RequestError>;

    async fn upload(&self, files: &[UploadFile]) -> Result<ServerMessage, RequestError>;

    async fn clear_data(&self) -> Result<ServerMessage, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    max_upload_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, RequestError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_upload_bytes: settings.max_upload_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(name)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn build_upload_form(&self, files: &[UploadFile]) -> Result<Form, RequestError> {
        let mut total = 0u64;
        for file in files {
            let meta = tokio::fs::metadata(&file.path)
                .await
                .map_err(|err| io_error(file, err))?;
            total += meta.len();
            if total > self.max_upload_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_upload_bytes,
                        actual: total,
                    },
                    format!(
                        "Selected files exceed the {} MB upload limit.",
                        self.max_upload_bytes / (1024 * 1024)
                    ),
                ));
            }
        }

        let mut form = Form::new();
        for file in files {
            if !has_accepted_extension(&file.file_name) {
                client_warn!(
                    "{} is not a recognised document type; the server may reject it",
                    file.file_name
                );
            }
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|err| io_error(file, err))?;
            client_debug!("attaching {} ({} bytes)", file.file_name, bytes.len());
            let part = Part::bytes(bytes)
                .file_name(file.file_name.clone())
                .mime_str(mime_for(&file.file_name))
                .map_err(map_reqwest_error)?;
            form = form.part("file", part);
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn chat(&self, query: &str) -> Result<ChatReply, RequestError> {
        let response = self
            .client
            .post(self.endpoint("chat")?)
            .json(&ChatQuery { query })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        decode_response::<ChatReplyWire>(response)
            .await
            .map(ChatReply::from)
    }

    async fn upload(&self, files: &[UploadFile]) -> Result<ServerMessage, RequestError> {
        let form = self.build_upload_form(files).await?;
        let response = self
            .client
            .post(self.endpoint("upload")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        decode_response(response).await
    }

    async fn clear_data(&self) -> Result<ServerMessage, RequestError> {
        let response = self
            .client
            .post(self.endpoint("clear_data")?)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        decode_response(response).await
    }
}

/// Parse the server root, forcing a trailing slash so endpoint joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, RequestError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RequestError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {other}"),
        )),
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RequestError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        // A non-JSON error page is an unreadable reply, not a server-reported error.
        let reply = serde_json::from_slice::<ServerMessage>(&body).map_err(|err| {
            RequestError::new(FailureKind::Malformed, format!("{status}: {err}"))
        })?;
        return Err(RequestError::new(
            FailureKind::HttpStatus {
                status: status.as_u16(),
                message: reply.message,
            },
            status.to_string(),
        ));
    }

    serde_json::from_slice(&body)
        .map_err(|err| RequestError::new(FailureKind::Malformed, err.to_string()))
}

fn has_accepted_extension(file_name: &str) -> bool {
    extension_of(file_name)
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.iter().any(|ok| ok.eq_ignore_ascii_case(ext)))
}

fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

fn mime_for(file_name: &str) -> &'static str {
    match extension_of(file_name).map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

fn io_error(file: &UploadFile, err: std::io::Error) -> RequestError {
    RequestError::new(
        FailureKind::Io {
            file_name: file.file_name.clone(),
        },
        format!("Could not read {}: {err}", file.file_name),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(FailureKind::Malformed, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let url = parse_base_url("http://localhost:5000/docs").unwrap();
        assert_eq!(url.join("chat").unwrap().as_str(), "http://localhost:5000/docs/chat");

        let url = parse_base_url(" http://localhost:5000/ ").unwrap();
        assert_eq!(url.join("clear_data").unwrap().as_str(), "http://localhost:5000/clear_data");
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        let err = parse_base_url("ftp://example.com").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
        assert_eq!(parse_base_url("not a url").unwrap_err().kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("Report.PDF"), "application/pdf");
        assert_eq!(mime_for("notes.md"), "text/markdown");
        assert_eq!(mime_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(mime_for("README"), "application/octet-stream");
    }

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        assert!(has_accepted_extension("slides.PPTX"));
        assert!(!has_accepted_extension("image.png"));
        assert!(!has_accepted_extension("noext"));
    }
}
