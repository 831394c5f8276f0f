//! Turns the loosely structured text returned by each flow into typed results.
//!
//! Three strategies, one per response shape:
//! - [`fenced`]: a JSON value optionally wrapped in a markdown code fence
//! - [`sections`]: markdown-ish text scanned for known section headers
//! - [`structured`]: the whole text is one JSON object of a known shape
//!
//! A parser either returns a complete result or an error; nothing is ever
//! half-filled.

pub mod fenced;
pub mod sections;
pub mod structured;

use thiserror::Error;

pub use fenced::parse_fenced_json;
pub use sections::parse_trend_insights;
pub use structured::{parse_draft, parse_ideation};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("Response contains no thread ideas")]
    NoThreadIdeas,

    #[error("Duplicate thread title '{0}'")]
    DuplicateTitle(String),
}
