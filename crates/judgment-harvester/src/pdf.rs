//! PDF text extraction

use crate::config::PipelineConfig;
use crate::error::Result;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Turns a stored document into plain text
pub trait TextExtractor {
    /// Extract text from the document at `path`.
    ///
    /// An error means the document itself could not be opened or parsed.
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// PDF text extractor bounded by a leading-page limit
pub struct PdfTextExtractor {
    max_pages: usize,
}

impl PdfTextExtractor {
    /// Create an extractor reading at most `max_pages` leading pages
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.extraction.max_pdf_pages)
    }

    /// Concatenate the text of the leading pages, one newline after each.
    /// Pages with no recoverable text contribute nothing.
    fn extract_from_document(&self, doc: &Document) -> String {
        let mut text = String::new();

        for page_num in doc.get_pages().keys().take(self.max_pages) {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Ok(_) => {}
                Err(e) => debug!(page = page_num, error = %e, "no text on page"),
            }
        }

        text
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path)?;
        Ok(self.extract_from_document(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::tempdir;

    /// Build a PDF with one Courier text line per page
    fn build_pdf(pages: &[&str]) -> Document {
        build_pdf_with(pages, true)
    }

    /// An empty line yields a page with an empty content stream.
    /// Without `fonts` the page tree carries no Resources entry.
    fn build_pdf_with(pages: &[&str], fonts: bool) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let operations = if line.is_empty() {
                vec![]
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        if fonts {
            pages_dict.set("Resources", resources_id);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_page_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2025_SGHCR_1.pdf");
        let mut doc = build_pdf(&["Decision Date: 3 March 2024", "Second page body"]);
        doc.save(&path).unwrap();

        let text = PdfTextExtractor::new(1).extract_text(&path).unwrap();
        assert!(text.contains("3 March 2024"));
        assert!(!text.contains("Second page"));
        assert!(text.ends_with('\n'));

        let text = PdfTextExtractor::new(5).extract_text(&path).unwrap();
        assert!(text.contains("Second page"));
    }

    /// Text lopdf itself reports for one page of a saved document
    fn page_text(path: &Path, page: u32) -> String {
        Document::load(path).unwrap().extract_text(&[page]).unwrap()
    }

    #[test]
    fn test_blank_page_contributes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2022_SGHC_7.pdf");
        let mut doc = build_pdf(&["", "Decided 9 Sep 2022"]);
        doc.save(&path).unwrap();

        let text = PdfTextExtractor::new(3).extract_text(&path).unwrap();
        assert!(!text.starts_with('\n'));
        assert_eq!(text, format!("{}\n", page_text(&path, 2)));
        assert!(text.contains("Decided 9 Sep 2022"));
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2022_SGHC_8.pdf");
        let mut doc = build_pdf(&["Lost header", "Decided 9 Sep 2022"]);
        let first_page = doc.get_pages()[&1];
        doc.get_object_mut(first_page)
            .and_then(|page| page.as_dict_mut())
            .unwrap()
            .set("Contents", Object::Reference((9999, 0)));
        doc.save(&path).unwrap();

        let text = PdfTextExtractor::new(3).extract_text(&path).unwrap();
        assert!(!text.contains("Lost header"));
        assert_eq!(text, format!("{}\n", page_text(&path, 2)));
    }

    #[test]
    fn test_page_without_fonts_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2022_SGHC_9.pdf");
        let mut doc = build_pdf_with(&["Decided 9 Sep 2022", "Second page body"], false);
        doc.save(&path).unwrap();

        assert!(PdfTextExtractor::new(3).extract_text(&path).is_ok());
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"<html>not a pdf</html>").unwrap();

        let err = PdfTextExtractor::new(3).extract_text(&path).unwrap_err();
        assert!(matches!(err, HarvestError::Pdf(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = PdfTextExtractor::new(3).extract_text(&dir.path().join("absent.pdf"));
        assert!(result.is_err());
    }
}
