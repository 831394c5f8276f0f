use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadcraftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("API_URL not found.")]
    MissingApiUrl,

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Invalid slot table for '{endpoint}': {reason}")]
    InvalidSlot { endpoint: String, reason: String },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File size exceeds {limit_mb}MB. Please upload a smaller file.")]
    FileTooLarge { size: u64, limit_mb: u64 },

    #[error("Only .pdf files are allowed (got '{0}').")]
    UnsupportedContentType(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error processing PDF: {0}")]
    Extraction(String),

    #[error("Authored text is empty")]
    EmptyText,
}

pub type Result<T> = std::result::Result<T, ThreadcraftError>;
