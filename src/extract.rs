//! Text extraction from PDF documents.
//!
//! A PDF is a bag of drawing operators, not a text file. Text extraction
//! walks each page's content stream and decodes the strings drawn by text
//! operators. Pages that draw only images (scans, photos of pages) decode to
//! nothing, and that is not an error: a document can mix text pages and
//! scanned pages, and only the text pages contribute.
//!
//! ```text
//! Page 1: "Introduction\n"     → "Introduction\n"
//! Page 2: <scanned image>      → (nothing)
//! Page 3: "  Conclusion  "     → "Conclusion\n"
//!
//! Document text: "Introduction\nConclusion\n"
//! ```
//!
//! Only when the *whole* document comes out empty does extraction fail,
//! with [`Error::ExtractionEmpty`], so the caller can suggest OCR.

use lopdf::Document;
use tracing::{debug, warn};

use crate::{Error, Result};

/// An ordered sequence of pages that may carry text.
///
/// [`PdfDocument`] is the real implementation; tests and alternative
/// readers can supply their own.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Text of the zero-based page `index`, or `None` if it has none.
    fn page_text(&self, index: usize) -> Option<String>;
}

impl PageSource for [Option<String>] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        self.get(index).cloned().flatten()
    }
}

impl PageSource for Vec<Option<String>> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        self.as_slice().page_text(index)
    }
}

/// A parsed PDF, backed by lopdf.
pub struct PdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
}

impl PdfDocument {
    /// Parse a PDF from its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputMissing`] for empty input and [`Error::Pdf`] if
    /// the bytes are not a readable PDF.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InputMissing(crate::MissingInput::Document));
        }
        let doc = Document::load_mem(bytes).map_err(|e| Error::Pdf(e.to_string()))?;
        // get_pages is keyed by 1-based page number, already in order
        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
        debug!(pages = page_numbers.len(), "opened pdf");
        Ok(Self { doc, page_numbers })
    }

    /// Read and parse a PDF file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`PdfDocument::from_bytes`].
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        let number = *self.page_numbers.get(index)?;
        match self.doc.extract_text(&[number]) {
            Ok(text) => Some(text),
            Err(e) => {
                // Undecodable pages count as pages without text
                warn!(page = number, error = %e, "page text extraction failed");
                None
            }
        }
    }
}

/// Concatenate the text of every page, in page order.
///
/// Each page's text is trimmed and followed by a newline; pages with no text
/// (or only whitespace) contribute nothing.
///
/// ```rust
/// use precis::extract_text;
///
/// let pages = vec![Some(" first ".to_string()), None, Some("second".to_string())];
/// assert_eq!(extract_text(&pages).unwrap(), "first\nsecond\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::ExtractionEmpty`] if no page yields any text.
pub fn extract_text(source: &dyn PageSource) -> Result<String> {
    let mut text = String::new();
    let mut empty_pages = 0;

    for index in 0..source.page_count() {
        match source.page_text(index) {
            Some(page) if !page.trim().is_empty() => {
                text.push_str(page.trim());
                text.push('\n');
            }
            _ => empty_pages += 1,
        }
    }

    debug!(
        pages = source.page_count(),
        empty_pages,
        bytes = text.len(),
        "extracted document text"
    );

    if text.is_empty() {
        return Err(Error::ExtractionEmpty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[Option<&str>]) -> Vec<Option<String>> {
        texts.iter().map(|t| t.map(str::to_string)).collect()
    }

    #[test]
    fn test_pages_joined_in_order() {
        let source = pages(&[Some("one"), Some("two"), Some("three")]);
        assert_eq!(extract_text(&source).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_empty_pages_contribute_nothing() {
        let source = pages(&[None, Some("kept"), Some("   \n "), None]);
        assert_eq!(extract_text(&source).unwrap(), "kept\n");
    }

    #[test]
    fn test_all_pages_empty() {
        let source = pages(&[None, None, Some("\n")]);
        assert!(matches!(extract_text(&source), Err(Error::ExtractionEmpty)));
    }

    #[test]
    fn test_no_pages() {
        let source: Vec<Option<String>> = Vec::new();
        assert!(matches!(extract_text(&source), Err(Error::ExtractionEmpty)));
    }

    #[test]
    fn test_out_of_range_page_is_none() {
        let source = pages(&[Some("a")]);
        assert_eq!(source.page_text(5), None);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = PdfDocument::from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(Error::Pdf(_))));
    }

    #[test]
    fn test_empty_bytes_are_missing_input() {
        let result = PdfDocument::from_bytes(&[]);
        assert!(matches!(
            result,
            Err(Error::InputMissing(crate::MissingInput::Document))
        ));
    }
}
