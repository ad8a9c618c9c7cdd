use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("HTTP request to the transcription service failed: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Service {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("unable to parse error response from the transcription service: {message}")]
    ResponseParse { message: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TranscribeError {
    pub fn http(source: reqwest::Error) -> Self {
        Self::Http { source }
    }

    pub fn service(status: reqwest::StatusCode, message: String) -> Self {
        Self::Service { status, message }
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self::ResponseParse {
            message: message.into(),
        }
    }
}
