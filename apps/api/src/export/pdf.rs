use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, error, info};

use crate::export::{ExportError, ExportSink, ExportedFile, PDF_CONTENT_TYPE};
use crate::render::formatter::escape_html;

// A4 in inches with 10 mm margins.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
const MARGIN_IN: f64 = 0.39;

/// Prints markup to PDF with a headless Chromium launched per export.
pub struct ChromePdfSink {
    executable: Option<PathBuf>,
}

impl ChromePdfSink {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ExportError> {
        let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ]);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(|e| {
            error!("Invalid headless browser config: {e}");
            ExportError::Browser(e)
        })
    }
}

fn wrap_document(markup: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape_html(title),
        markup
    )
}

fn pdf_params() -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(MARGIN_IN),
        margin_bottom: Some(MARGIN_IN),
        margin_left: Some(MARGIN_IN),
        margin_right: Some(MARGIN_IN),
        ..Default::default()
    }
}

#[async_trait]
impl ExportSink for ChromePdfSink {
    async fn export(&self, markup: &str, filename: &str) -> Result<ExportedFile, ExportError> {
        let config = self.browser_config()?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExportError::Browser(format!("failed to launch browser: {e}")))?;
        debug!("Headless browser launched");

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let printed = async {
            let page = browser.new_page("about:blank").await?;
            page.set_content(wrap_document(markup, filename)).await?;
            page.pdf(pdf_params()).await
        }
        .await;

        if let Err(e) = browser.close().await {
            debug!("Browser close failed: {e}");
        }
        events.abort();

        let bytes = printed.map_err(|e| ExportError::Browser(format!("failed to print: {e}")))?;
        info!("Exported {} ({} bytes)", filename, bytes.len());

        Ok(ExportedFile {
            filename: filename.to_string(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }
}
