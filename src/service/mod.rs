mod error;
mod fetch;

use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;

pub use error::TranscribeError;
pub use fetch::fetch_text;

/// Shown to the user when the service accepts the upload. The service mails
/// the transcription once the batch worker gets to the file.
pub const CONFIRMATION_MESSAGE: &str =
    "D'aquí a una estona rebreu el fitxer transcrit per correu electrònic";

const UPLOAD_PATH: &str = "transcribe_file/";

/// Failure shape the service returns on any non-200 status.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Marker for an accepted upload. The service sends no useful body on
/// success, so there is nothing else to carry.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct TranscribeClient {
    client: Client,
    endpoint: Url,
}

impl TranscribeClient {
    pub fn new(config: &Config) -> Result<Self, TranscribeError> {
        // Url::join resolves relative to the last '/', so the base must end
        // with one or its final path segment gets replaced.
        let mut base_url = config.service_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url).map_err(|err| {
            TranscribeError::Configuration(format!(
                "invalid service URL '{}': {}",
                config.service_url, err
            ))
        })?;
        let endpoint = base.join(UPLOAD_PATH).map_err(|err| {
            TranscribeError::Configuration(format!("invalid upload endpoint: {}", err))
        })?;

        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;

        Ok(Self { client, endpoint })
    }

    /// Uploads one file for transcription. On 200 the response body is
    /// ignored; on any other status the body is expected to be the JSON
    /// error envelope and its message is surfaced verbatim.
    pub async fn submit_file(
        &self,
        path: &Path,
        email: &str,
        model_name: &str,
    ) -> Result<Receipt, TranscribeError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for_path(path))
            .map_err(|err| {
                TranscribeError::Configuration(format!("failed to build upload form: {}", err))
            })?;

        let form = multipart::Form::new()
            .text("email", email.to_string())
            .text("model_name", model_name.to_string())
            .part("file", file_part);

        debug!(
            "Uploading {} ({} -> {})",
            file_name, model_name, self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(TranscribeError::http)?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!("Upload of {} accepted", file_name);
            return Ok(Receipt { file_name });
        }

        let body = response.text().await.map_err(TranscribeError::http)?;
        warn!("Service returned {}: {}", status, truncate(&body));

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(TranscribeError::service(status, envelope.error)),
            Err(err) => Err(TranscribeError::response(err.to_string())),
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<Client, TranscribeError> {
    Client::builder()
        .user_agent("transcribe-client/0.1")
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|err| {
            TranscribeError::Configuration(format!("failed to build HTTP client: {}", err))
        })
}

/// Content type for the formats the service transcodes. Anything else is
/// uploaded as an opaque blob; validation belongs to the service.
fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("avi") => "video/x-msvideo",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

fn truncate(input: &str) -> String {
    const MAX_LEN: usize = 512;
    if input.len() <= MAX_LEN {
        input.to_string()
    } else {
        let snippet: String = input.chars().take(MAX_LEN).collect();
        format!("{}...", snippet)
    }
}
