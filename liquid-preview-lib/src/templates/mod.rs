use crate::error::PreviewError;
use crate::utils::with_extension_if_missing;
use std::path::{Path, PathBuf};

pub const TEMPLATE_EXTENSION: &str = ".liquid";

/// A template file read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    pub file_name: String,
    pub path: PathBuf,
    pub source: String,
}

/// Result of looking a template reference up in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLookup {
    Found(TemplateSource),
    Missing(PathBuf),
}

/// Read-only directory of Liquid templates.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for a template reference, e.g. `post` -> `post.liquid`.
    pub fn file_name(reference: &str) -> String {
        with_extension_if_missing(reference, TEMPLATE_EXTENSION)
    }

    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.root.join(Self::file_name(reference))
    }

    pub async fn lookup(&self, reference: &str) -> Result<TemplateLookup, PreviewError> {
        let file_name = Self::file_name(reference);
        let path = self.root.join(&file_name);
        if !tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
        {
            return Ok(TemplateLookup::Missing(path));
        }

        tracing::info!("Loading template: {}", path.display());
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PreviewError::Read {
                path: path.clone(),
                source,
            })?;
        Ok(TemplateLookup::Found(TemplateSource {
            file_name,
            path,
            source,
        }))
    }

    /// Every template in the store, sorted by file name, for registration as
    /// partials.
    pub async fn partial_sources(&self) -> Result<Vec<TemplateSource>, PreviewError> {
        let mut sources = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !entry.file_type().await?.is_file()
                || Self::file_name(file_name) != file_name
            {
                continue;
            }
            let file_name = file_name.to_string();
            let source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| PreviewError::Read {
                    path: path.clone(),
                    source,
                })?;
            sources.push(TemplateSource {
                file_name,
                path,
                source,
            });
        }
        sources.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(sources)
    }
}
