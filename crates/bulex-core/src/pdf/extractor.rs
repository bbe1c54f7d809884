//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF content extractor.
///
/// lopdf handles document structure (page count, encryption); pdf-extract does
/// the actual text extraction from the raw bytes.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Flattened text of the whole document.
    pub text: String,
    /// Per-page text.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

/// Classify a document by how much embedded text it carries.
fn classify(text: &str, min_text_length: usize) -> PdfType {
    let trimmed = text.trim();
    if trimmed.len() >= min_text_length {
        PdfType::Text
    } else if trimmed.is_empty() {
        PdfType::Empty
    } else {
        PdfType::Scanned
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))
    }

    /// Extract all text content from a loaded PDF.
    ///
    /// A scanned PDF yields empty or near-empty text; that is a valid result
    /// and the caller decides whether to route the file through OCR.
    pub fn extract_content(&self, min_text_length: usize) -> Result<PdfContent> {
        let page_count = self.document()?.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        let mut full_text = String::new();

        for number in 1..=page_count {
            let text = self.extract_page_text(number).unwrap_or_default();
            if !text.is_empty() {
                if !full_text.is_empty() {
                    full_text.push_str("\n\n");
                }
                full_text.push_str(&text);
            }
            pages.push(PdfPage { number, text });
        }

        let pdf_type = classify(&full_text, min_text_length);
        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            page_count,
            full_text.len(),
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text: full_text,
            pages,
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Many payroll portals ship PDFs encrypted with an empty password;
        // those decrypt transparently. Anything needing a real password is
        // rejected.
        self.raw_data = if doc.is_encrypted() {
            doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
            debug!("decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes, not the originals
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} page(s)", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map_or(0, |doc| doc.get_pages().len() as u32)
    }

    fn analyze(&self, min_text_length: usize) -> PdfType {
        let text = self.extract_text().unwrap_or_default();
        classify(&text, min_text_length)
    }

    fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        // pdf-extract has no page-level API; split the flattened text evenly
        let full_text = self.extract_text()?;
        let lines: Vec<&str> = full_text.lines().collect();
        let page_count = self.page_count() as usize;

        if page_count == 0 || page == 0 {
            return Ok(String::new());
        }

        let per_page = lines.len() / page_count;
        let start = (page as usize - 1) * per_page;
        // The last page takes the remainder lines
        let end = if page as usize == page_count {
            lines.len()
        } else {
            page as usize * per_page
        };

        Ok(lines[start.min(lines.len())..end.min(lines.len())].join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_new() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_load_invalid_data() {
        let mut extractor = PdfExtractor::new();
        assert!(extractor.load(b"not a pdf").is_err());
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract_content(50).is_err());
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify("", 50), PdfType::Empty);
        assert_eq!(classify("   \n ", 50), PdfType::Empty);
        assert_eq!(classify("short", 50), PdfType::Scanned);
        assert_eq!(classify(&"x".repeat(60), 50), PdfType::Text);
    }
}
