//! Turning uploads and typed text into [`SourceMaterial`].
//!
//! Size and content-type checks happen here, before any bytes reach an
//! extractor, so the pipeline only ever sees material that passed them.

pub mod pdf;
pub mod text;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::schema::DEFAULT_MAX_FILE_BYTES;
use crate::error::IngestError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Which input the user is working from. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Document,
    AuthoredText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub title: Option<String>,
    /// Bytes for documents, characters for authored text.
    pub size: Option<u64>,
    pub content_type: Option<String>,
}

/// Immutable input to the Ingest stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMaterial {
    pub origin: SourceOrigin,
    pub file_name: String,
    pub extraction_date: DateTime<Utc>,
    pub page_count: u32,
    pub content: String,
    pub metadata: SourceMetadata,
}

impl SourceMaterial {
    /// Whether this material can feed the Ingest stage.
    pub fn has_content(&self) -> bool {
        match self.origin {
            SourceOrigin::AuthoredText => !self.content.trim().is_empty(),
            SourceOrigin::Document => true,
        }
    }
}

/// Text pulled out of a document, before it is wrapped with metadata.
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: u32,
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, IngestError>;
    fn supports(&self, content_type: &str) -> bool;
}

pub struct Ingestor {
    max_file_bytes: u64,
    extractors: Vec<Box<dyn DocumentExtractor>>,
}

impl Ingestor {
    pub fn new(max_file_bytes: u64) -> Self {
        Self {
            max_file_bytes,
            extractors: vec![Box::new(pdf::PdfExtractor::new())],
        }
    }

    /// Test constructor: inject specific extractors.
    pub fn with_extractors(max_file_bytes: u64, extractors: Vec<Box<dyn DocumentExtractor>>) -> Self {
        Self {
            max_file_bytes,
            extractors,
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Ingests an uploaded document held in memory.
    ///
    /// `content_type` is the type the upload declared; when absent it is
    /// guessed from `file_name`.
    pub fn ingest_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<SourceMaterial, IngestError> {
        let size = bytes.len() as u64;
        if size > self.max_file_bytes {
            return Err(IngestError::FileTooLarge {
                size,
                limit_mb: self.max_file_bytes.div_ceil(1024 * 1024),
            });
        }

        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(file_name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        let extractor = self
            .extractors
            .iter()
            .find(|e| e.supports(&content_type))
            .ok_or_else(|| IngestError::UnsupportedContentType(content_type.clone()))?;

        let _span = tracing::info_span!("ingest.document", size, content_type = %content_type)
            .entered();
        let extracted = extractor.extract(bytes)?;
        log::debug!(
            "Extracted {} chars from {} page(s)",
            extracted.text.chars().count(),
            extracted.page_count
        );

        let file_name = if file_name.is_empty() {
            "unnamed.pdf".to_string()
        } else {
            file_name.to_string()
        };
        let title = file_name.replacen(".pdf", "", 1);

        Ok(SourceMaterial {
            origin: SourceOrigin::Document,
            file_name,
            extraction_date: Utc::now(),
            page_count: extracted.page_count,
            content: extracted.text,
            metadata: SourceMetadata {
                title: Some(title),
                size: Some(size),
                content_type: Some(content_type),
            },
        })
    }

    /// Reads and ingests a document from disk.
    ///
    /// The size ceiling is checked against file metadata before reading.
    pub fn ingest_path(&self, path: &Path) -> Result<SourceMaterial, IngestError> {
        let read_err = |source| IngestError::ReadDocument {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(read_err)?.len();
        if size > self.max_file_bytes {
            return Err(IngestError::FileTooLarge {
                size,
                limit_mb: self.max_file_bytes.div_ceil(1024 * 1024),
            });
        }

        let bytes = std::fs::read(path).map_err(read_err)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed.pdf");

        self.ingest_bytes(file_name, &bytes, None)
    }

    pub fn ingest_text(&self, text: &str) -> Result<SourceMaterial, IngestError> {
        text::authored_material(text)
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct FakeExtractor;

    impl DocumentExtractor for FakeExtractor {
        fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, IngestError> {
            Ok(ExtractedDocument {
                text: String::from_utf8_lossy(bytes).into_owned(),
                page_count: 3,
            })
        }

        fn supports(&self, content_type: &str) -> bool {
            content_type == PDF_CONTENT_TYPE
        }
    }

    fn fake_ingestor(limit: u64) -> Ingestor {
        Ingestor::with_extractors(limit, vec![Box::new(FakeExtractor)])
    }

    #[test]
    fn test_document_metadata_populated() {
        let ingestor = fake_ingestor(1024);
        let material = ingestor
            .ingest_bytes("strategy.pdf", b"pillar content", Some(PDF_CONTENT_TYPE))
            .unwrap();

        assert_eq!(material.origin, SourceOrigin::Document);
        assert_eq!(material.file_name, "strategy.pdf");
        assert_eq!(material.page_count, 3);
        assert_eq!(material.content, "pillar content");
        assert_eq!(material.metadata.title.as_deref(), Some("strategy"));
        assert_eq!(material.metadata.size, Some(14));
        assert_eq!(
            material.metadata.content_type.as_deref(),
            Some(PDF_CONTENT_TYPE)
        );
    }

    #[test]
    fn test_oversized_upload_rejected_before_extraction() {
        let ingestor = fake_ingestor(4);
        let result = ingestor.ingest_bytes("big.pdf", b"12345", Some(PDF_CONTENT_TYPE));

        match result {
            Err(IngestError::FileTooLarge { size, limit_mb }) => {
                assert_eq!(size, 5);
                assert_eq!(limit_mb, 1);
            }
            _ => panic!("Expected FileTooLarge"),
        }
    }

    #[test]
    fn test_default_ceiling_message_mentions_two_mb() {
        let ingestor = Ingestor::default();
        let bytes = vec![0u8; (DEFAULT_MAX_FILE_BYTES + 1) as usize];
        let err = ingestor
            .ingest_bytes("big.pdf", &bytes, Some(PDF_CONTENT_TYPE))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size exceeds 2MB. Please upload a smaller file."
        );
    }

    #[test]
    fn test_non_pdf_content_type_rejected() {
        let ingestor = fake_ingestor(1024);
        let result = ingestor.ingest_bytes("notes.txt", b"hello", Some("text/plain"));
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedContentType(ref t)) if t == "text/plain"
        ));
    }

    #[test]
    fn test_content_type_guessed_from_name() {
        let ingestor = fake_ingestor(1024);
        assert!(ingestor.ingest_bytes("deck.pdf", b"x", None).is_ok());
        assert!(matches!(
            ingestor.ingest_bytes("deck.docx", b"x", None),
            Err(IngestError::UnsupportedContentType(_))
        ));
    }

    #[test]
    fn test_ingest_path_reads_file() {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        write!(file, "from disk").unwrap();

        let material = fake_ingestor(1024).ingest_path(file.path()).unwrap();
        assert_eq!(material.content, "from disk");
    }

    #[test]
    fn test_ingest_path_checks_size_first() {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        write!(file, "0123456789").unwrap();

        let result = fake_ingestor(5).ingest_path(file.path());
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }

    #[test]
    fn test_ingest_path_missing_file() {
        let result = fake_ingestor(5).ingest_path(Path::new("/nonexistent/deck.pdf"));
        assert!(matches!(result, Err(IngestError::ReadDocument { .. })));
    }
}
