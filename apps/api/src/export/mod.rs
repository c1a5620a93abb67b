// Export: rendered markup → downloadable file.
// The sink is a trait so tests and alternative renderers can stand in for Chromium.

pub mod pdf;

use async_trait::async_trait;
use thiserror::Error;

pub use pdf::ChromePdfSink;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please generate resume first.")]
    NothingToExport,

    #[error("Browser error: {0}")]
    Browser(String),
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn export(&self, markup: &str, filename: &str) -> Result<ExportedFile, ExportError>;
}

/// Refuses empty previews before the sink is ever involved, so no partial file exists.
pub async fn export_preview(
    sink: &dyn ExportSink,
    markup: Option<&str>,
    filename: &str,
) -> Result<ExportedFile, ExportError> {
    let markup = markup
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ExportError::NothingToExport)?;
    sink.export(markup, filename).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ExportSink for RecordingSink {
        async fn export(&self, markup: &str, filename: &str) -> Result<ExportedFile, ExportError> {
            self.calls
                .lock()
                .unwrap()
                .push((markup.to_string(), filename.to_string()));
            Ok(ExportedFile {
                filename: filename.to_string(),
                content_type: PDF_CONTENT_TYPE,
                bytes: b"%PDF-1.7".to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_empty_preview_is_refused() {
        let sink = RecordingSink::default();
        for markup in [None, Some(""), Some("  \n ")] {
            let result = export_preview(&sink, markup, "Ada_Resume.pdf").await;
            assert!(matches!(result, Err(ExportError::NothingToExport)));
        }
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preview_is_handed_to_sink() {
        let sink = RecordingSink::default();
        let file = export_preview(&sink, Some("<h1>Ada</h1>"), "Ada_Resume.pdf")
            .await
            .unwrap();
        assert_eq!(file.filename, "Ada_Resume.pdf");
        assert_eq!(
            sink.calls.lock().unwrap().as_slice(),
            &[("<h1>Ada</h1>".to_string(), "Ada_Resume.pdf".to_string())]
        );
    }
}
