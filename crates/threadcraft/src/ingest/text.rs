use chrono::Utc;

use crate::error::IngestError;
use crate::ingest::{SourceMaterial, SourceMetadata, SourceOrigin};

pub const AUTHORED_FILE_NAME: &str = "userText.txt";
pub const AUTHORED_TITLE: &str = "User Text Content";
pub const AUTHORED_CONTENT_TYPE: &str = "text/plain";

/// Wraps text typed by the user as a single-page source.
///
/// Whitespace-only text is rejected: it would pass an emptiness check but
/// gives the analyze flow nothing to work with.
pub fn authored_material(text: &str) -> Result<SourceMaterial, IngestError> {
    if text.trim().is_empty() {
        return Err(IngestError::EmptyText);
    }

    Ok(SourceMaterial {
        origin: SourceOrigin::AuthoredText,
        file_name: AUTHORED_FILE_NAME.to_string(),
        extraction_date: Utc::now(),
        page_count: 1,
        content: text.to_string(),
        metadata: SourceMetadata {
            title: Some(AUTHORED_TITLE.to_string()),
            size: Some(text.chars().count() as u64),
            content_type: Some(AUTHORED_CONTENT_TYPE.to_string()),
        },
    })
}
