use std::path::{Path, PathBuf};

use conversation::{noop_log, FileReference, SharedLog};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Body, Client, Response, StatusCode};
use serde_json::json;

use crate::config::GeminiApiConfig;
use crate::error::GeminiApiError;
use crate::headers::{finalize_upload_headers, start_upload_headers, to_header_map, HEADER_UPLOAD_URL};
use crate::mime::content_type_for;
use crate::payload::UploadResponse;
use crate::request::{build_request, validate_prompt, validate_settings, GenerationSettings, Prompt};
use crate::response::{parse_response, Generation};
use crate::url::{generate_content_url, upload_start_url};

const API_KEY_PARAM: &str = "key";

pub struct GeminiApiClient {
    http: Client,
    config: GeminiApiConfig,
    log: SharedLog,
}

impl GeminiApiClient {
    pub fn new(config: GeminiApiConfig) -> Result<Self, GeminiApiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiApiError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| GeminiApiError::request("building HTTP client", source))?;

        Ok(Self {
            http,
            config,
            log: noop_log(),
        })
    }

    #[must_use]
    pub fn with_logger(mut self, log: SharedLog) -> Self {
        self.log = log;
        self
    }

    pub fn config(&self) -> &GeminiApiConfig {
        &self.config
    }

    pub fn endpoint(&self, model: &str) -> String {
        generate_content_url(&self.config.api_url, model)
    }

    /// Generates a reply to `prompt`: validates, uploads attachments one at a
    /// time, sends the request and validates the response.
    ///
    /// Nothing is retried; on error no file reference escapes.
    pub async fn generate(
        &self,
        settings: &GenerationSettings,
        prompt: &Prompt,
    ) -> Result<Generation, GeminiApiError> {
        validate_settings(settings)?;
        validate_prompt(prompt)?;

        let uploaded = self.upload_files(&prompt.files).await?;
        let request = build_request(settings, prompt, &uploaded, self.log.as_ref())?;
        let payload = serde_json::to_string(&request).map_err(GeminiApiError::Encode)?;

        let url = self.endpoint(&settings.model);
        self.log
            .debug("generate_request", &format!("url={url} request={payload}"));

        let response = self
            .http
            .post(&url)
            .query(&[(API_KEY_PARAM, self.config.api_key.trim())])
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|source| GeminiApiError::request("generate content", source))?;

        let status = response.status();
        let body = read_body(response, "generate content").await?;
        self.log.debug("generate_response", &body);

        if status != StatusCode::OK {
            return Err(GeminiApiError::status("generate content", status, body));
        }

        let generation = parse_response(&body, uploaded)?;
        self.log
            .debug("token_count", &generation.tokens.to_string());

        Ok(generation)
    }

    /// Uploads files sequentially in the given order, stopping at the first
    /// failure. Every local file is opened before the first request, so a
    /// missing attachment never leaves earlier ones uploaded.
    pub async fn upload_files(
        &self,
        paths: &[PathBuf],
    ) -> Result<Vec<FileReference>, GeminiApiError> {
        let mut attachments = Vec::with_capacity(paths.len());
        for path in paths {
            attachments.push(LocalAttachment::open(path).await?);
        }

        let mut references = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            references.push(self.upload_attachment(attachment).await?);
        }
        Ok(references)
    }

    /// Uploads one file with the two-phase resumable protocol.
    pub async fn upload_file(&self, path: &Path) -> Result<FileReference, GeminiApiError> {
        let attachment = LocalAttachment::open(path).await?;
        self.upload_attachment(attachment).await
    }

    async fn upload_attachment(
        &self,
        attachment: LocalAttachment,
    ) -> Result<FileReference, GeminiApiError> {
        let LocalAttachment {
            file,
            byte_len,
            content_type,
            display_name,
        } = attachment;

        let session_url = self
            .start_upload(&display_name, byte_len, content_type)
            .await?;
        let uploaded = self
            .finalize_upload(&session_url, file, byte_len)
            .await?
            .file;

        Ok(FileReference {
            uri: uploaded.uri,
            mime_type: if uploaded.mime_type.is_empty() {
                content_type.to_owned()
            } else {
                uploaded.mime_type
            },
            label: if uploaded.display_name.is_empty() {
                display_name
            } else {
                uploaded.display_name
            },
        })
    }

    async fn start_upload(
        &self,
        display_name: &str,
        byte_len: u64,
        content_type: &str,
    ) -> Result<String, GeminiApiError> {
        let url = upload_start_url(&self.config.upload_url);
        let headers = to_header_map(&start_upload_headers(byte_len, content_type))?;
        self.log.debug(
            "start_upload_request",
            &format!("url={url} name={display_name} bytes={byte_len} type={content_type}"),
        );

        let response = self
            .http
            .post(&url)
            .query(&[(API_KEY_PARAM, self.config.api_key.trim())])
            .headers(headers)
            .body(json!({"file": {"display_name": display_name}}).to_string())
            .send()
            .await
            .map_err(|source| GeminiApiError::request("start upload", source))?;

        let status = response.status();
        let session_url = response
            .headers()
            .get(HEADER_UPLOAD_URL)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        let body = read_body(response, "start upload").await?;
        self.log.debug("start_upload_response", &body);

        if !status.is_success() {
            return Err(GeminiApiError::status("start upload", status, body));
        }

        session_url.ok_or(GeminiApiError::MissingUploadUrl {
            header: HEADER_UPLOAD_URL,
        })
    }

    async fn finalize_upload(
        &self,
        session_url: &str,
        file: tokio::fs::File,
        byte_len: u64,
    ) -> Result<UploadResponse, GeminiApiError> {
        let headers = to_header_map(&finalize_upload_headers(byte_len))?;
        self.log
            .debug("upload_request", &format!("url={session_url} bytes={byte_len}"));

        let response = self
            .http
            .post(session_url)
            .headers(headers)
            .body(Body::from(file))
            .send()
            .await
            .map_err(|source| GeminiApiError::request("upload", source))?;

        let status = response.status();
        let body = read_body(response, "upload").await?;
        self.log.debug("upload_response", &body);

        if !status.is_success() {
            return Err(GeminiApiError::status("upload", status, body));
        }

        serde_json::from_str::<UploadResponse>(&body).map_err(|source| GeminiApiError::Decode {
            operation: "upload",
            body,
            source,
        })
    }
}

/// A local file opened and measured, ready to upload.
struct LocalAttachment {
    file: tokio::fs::File,
    byte_len: u64,
    content_type: &'static str,
    display_name: String,
}

impl LocalAttachment {
    async fn open(path: &Path) -> Result<Self, GeminiApiError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| GeminiApiError::file("read metadata of", path, source))?;
        if !metadata.is_file() {
            return Err(GeminiApiError::file(
                "upload",
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| GeminiApiError::file("open", path, source))?;

        Ok(Self {
            file,
            byte_len: metadata.len(),
            content_type: content_type_for(path),
            display_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

async fn read_body(response: Response, operation: &'static str) -> Result<String, GeminiApiError> {
    response
        .text()
        .await
        .map_err(|source| GeminiApiError::request(operation, source))
}
