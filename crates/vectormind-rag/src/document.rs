//! Document sources and text extraction

use lopdf::Document;
use std::path::Path;
use tracing::debug;

use vectormind_core::{Error, Result};

/// A document handed over for ingestion
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Raw PDF bytes
    Pdf { name: String, bytes: Vec<u8> },
    /// Text that needs no parsing
    Text { name: String, text: String },
}

impl DocumentSource {
    /// Classify an uploaded file by its name.
    ///
    /// `.pdf` files are parsed as PDF; anything else must be UTF-8 text.
    pub fn from_upload(filename: &str, bytes: Vec<u8>) -> Result<Self> {
        let name = filename.to_string();

        if filename.to_lowercase().ends_with(".pdf") {
            return Ok(DocumentSource::Pdf { name, bytes });
        }

        let text = String::from_utf8(bytes)
            .map_err(|_| Error::Extraction(format!("{} is neither a PDF nor UTF-8 text", filename)))?;
        Ok(DocumentSource::Text { name, text })
    }

    /// Read a document from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_upload(&filename, bytes)
    }

    pub fn name(&self) -> &str {
        match self {
            DocumentSource::Pdf { name, .. } | DocumentSource::Text { name, .. } => name,
        }
    }

    /// Extract the full text, each page followed by a newline
    pub fn extract_text(&self) -> Result<String> {
        match self {
            DocumentSource::Text { text, .. } => Ok(text.clone()),
            DocumentSource::Pdf { name, bytes } => extract_pdf_text(name, bytes),
        }
    }
}

fn extract_pdf_text(name: &str, bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes)
        .map_err(|e| Error::Extraction(format!("failed to parse {}: {}", name, e)))?;

    let mut text = String::new();
    let pages = document.get_pages();

    for page_number in pages.keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            Error::Extraction(format!("failed to read page {} of {}: {}", page_number, name, e))
        })?;
        // lopdf already ends each text object with a newline; keep exactly one per page
        text.push_str(page_text.trim_end_matches('\n'));
        text.push('\n');
    }

    debug!(document = name, pages = pages.len(), chars = text.chars().count(), "extracted pdf text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use std::io::Write;

    /// Build a PDF with one line of Courier text per page
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|line| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![100.into(), 600.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => dictionary! {
                        "Font" => dictionary! { "F1" => font_id },
                    },
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_pages_end_with_one_newline_each() {
        let bytes = pdf_with_pages(&["Hello", "World"]);
        let source = DocumentSource::from_upload("two-pages.pdf", bytes).unwrap();
        assert_eq!(source.extract_text().unwrap(), "Hello\nWorld\n");
    }

    #[test]
    fn test_text_upload() {
        let source = DocumentSource::from_upload("notes.md", b"# Notes\nhello".to_vec()).unwrap();
        assert_eq!(source.name(), "notes.md");
        assert_eq!(source.extract_text().unwrap(), "# Notes\nhello");
    }

    #[test]
    fn test_pdf_is_detected_case_insensitively() {
        let source = DocumentSource::from_upload("REPORT.PDF", vec![1, 2, 3]).unwrap();
        assert!(matches!(source, DocumentSource::Pdf { .. }));
    }

    #[test]
    fn test_invalid_pdf_is_extraction_error() {
        let source = DocumentSource::from_upload("broken.pdf", b"not a pdf at all".to_vec()).unwrap();
        assert!(matches!(source.extract_text(), Err(Error::Extraction(_))));
    }

    #[test]
    fn test_binary_text_upload_is_extraction_error() {
        let result = DocumentSource::from_upload("blob.bin", vec![0xff, 0xfe, 0xfd]);
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"contents on disk").unwrap();

        let source = DocumentSource::from_path(file.path()).await.unwrap();
        assert!(source.name().ends_with(".txt"));
        assert_eq!(source.extract_text().unwrap(), "contents on disk");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = DocumentSource::from_path("/definitely/not/here.txt").await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
