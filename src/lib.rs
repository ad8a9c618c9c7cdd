pub mod config;
pub mod logging;
pub mod service;

pub use config::Config;
pub use service::{fetch_text, TranscribeClient, TranscribeError, CONFIRMATION_MESSAGE};
