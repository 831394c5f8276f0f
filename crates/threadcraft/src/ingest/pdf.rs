use crate::error::IngestError;
use crate::ingest::{DocumentExtractor, ExtractedDocument, PDF_CONTENT_TYPE};

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, IngestError> {
        let _span = tracing::info_span!("ingest.pdf").entered();

        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| IngestError::Extraction(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        let mut text = String::new();
        for (page_num, _) in &pages {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text.push_str(&normalize_page_text(&page_text)),
                Err(e) => log::warn!("Skipping unreadable PDF page {}: {}", page_num, e),
            }
            text.push('\n');
        }

        Ok(ExtractedDocument {
            text,
            page_count: pages.len() as u32,
        })
    }

    fn supports(&self, content_type: &str) -> bool {
        content_type == PDF_CONTENT_TYPE
    }
}

/// Collapses a page's text runs onto one line, space separated.
fn normalize_page_text(page_text: &str) -> String {
    page_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
