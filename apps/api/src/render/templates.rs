//! Named HTML templates. Content is opaque apart from its `{{TOKEN}}` placeholders.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TEMPLATE: &str = "simple-ats";
const TEMPLATE_EXTENSION: &str = "html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Invalid template name '{0}'")]
    InvalidName(String),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self, name: &str) -> Result<String, TemplateError>;

    /// Logical names of every available template, sorted.
    async fn list(&self) -> Result<Vec<String>, TemplateError>;
}

/// Logical names are plain slugs; anything else could escape the template directory.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Reads `<dir>/<name>.html` on every call so edited templates show up on the next render.
pub struct FsTemplateSource {
    dir: PathBuf,
}

impl FsTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn load(&self, name: &str) -> Result<String, TemplateError> {
        if !is_valid_name(name) {
            return Err(TemplateError::InvalidName(name.to_string()));
        }
        let path = self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        debug!("Loading template {}", path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(name.to_string()))
            }
            Err(e) => Err(TemplateError::Io(e)),
        }
    }

    async fn list(&self) -> Result<Vec<String>, TemplateError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_name(stem) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::BTreeMap;

    use super::*;

    /// In-memory templates for tests.
    pub struct MemoryTemplates(pub BTreeMap<String, String>);

    impl MemoryTemplates {
        pub fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    #[async_trait]
    impl TemplateSource for MemoryTemplates {
        async fn load(&self, name: &str) -> Result<String, TemplateError> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| TemplateError::NotFound(name.to_string()))
        }

        async fn list(&self) -> Result<Vec<String>, TemplateError> {
            Ok(self.0.keys().cloned().collect())
        }
    }
}
