use crate::provider::SourceProvider;
use crate::retry::{with_backoff, RetryConfig};
use crate::{DefinitionSource, LoaderError, LoaderResult};
use async_trait::async_trait;
use fabrica_types::ContentPath;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Pre-compiled artifact provider used in production server mode.
///
/// Artifacts live flat in one directory, one `*.json` file per definition.
/// A flat directory has no hierarchy to mirror, so each artifact carries its
/// own `path` field; the file stem is the fallback for artifacts without
/// one.
pub struct ArtifactProvider {
    dir: PathBuf,
    retry: RetryConfig,
}

impl ArtifactProvider {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, retry: RetryConfig) -> Self {
        Self {
            dir: dir.into(),
            retry,
        }
    }

    fn embedded_path(raw: &str, stem: &str) -> Option<ContentPath> {
        let embedded = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|v| v.get("path").and_then(|p| p.as_str()).map(str::to_string));
        match embedded {
            Some(path) => ContentPath::parse(&path).ok(),
            None => ContentPath::parse(stem).ok(),
        }
    }

    async fn read_artifact(&self, file: &Path) -> LoaderResult<Option<DefinitionSource>> {
        let file_display = file.display().to_string();
        let display_ref = file_display.as_str();
        let raw = with_backoff("artifact read", &self.retry, || async move {
            fs::read_to_string(file)
                .await
                .map_err(|err| LoaderError::source_read(display_ref, err))
        })
        .await?;
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match Self::embedded_path(&raw, &stem) {
            Some(path) => Ok(Some(DefinitionSource::new(path, raw))),
            None => {
                warn!(file = %file_display, "skipping artifact with unmappable path");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SourceProvider for ArtifactProvider {
    async fn list_sources(&self) -> LoaderResult<Vec<DefinitionSource>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|err| LoaderError::source_read(self.dir.display().to_string(), err))?;
        let mut sources = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| LoaderError::source_read(self.dir.display().to_string(), err))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match self.read_artifact(&path).await {
                Ok(Some(source)) => sources.push(source),
                Ok(None) => {}
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable artifact");
                }
            }
        }
        sources.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(sources)
    }

    async fn fetch_source(&self, name: &str) -> LoaderResult<Option<DefinitionSource>> {
        let file = self.dir.join(format!("{name}.json"));
        if !fs::try_exists(&file)
            .await
            .map_err(|err| LoaderError::source_read(file.display().to_string(), err))?
        {
            return Ok(None);
        }
        self.read_artifact(&file).await
    }
}
