use crate::provider::SourceProvider;
use crate::retry::{with_backoff, RetryConfig};
use crate::{DefinitionSource, LoaderError, LoaderResult};
use async_trait::async_trait;
use fabrica_types::ContentPath;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// File extension for definition sources on disk.
const SOURCE_SUFFIX: &str = ".def.json";

/// Filesystem scanner used in development mode.
///
/// Walks `root` recursively; every `*.def.json` file is one source whose
/// content path mirrors its location relative to the root, minus the
/// extension.
pub struct FsProvider {
    root: PathBuf,
    retry: RetryConfig,
}

impl FsProvider {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, retry: RetryConfig) -> Self {
        Self {
            root: root.into(),
            retry,
        }
    }

    fn content_path_for(&self, file: &Path) -> Option<ContentPath> {
        let rel = file.strip_prefix(&self.root).ok()?;
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let trimmed = joined.strip_suffix(SOURCE_SUFFIX)?;
        ContentPath::parse(trimmed).ok()
    }

    async fn read_source(&self, file: &Path, path: ContentPath) -> LoaderResult<DefinitionSource> {
        let display = file.display().to_string();
        let display = display.as_str();
        let raw = with_backoff("fs read", &self.retry, || async move {
            fs::read_to_string(file)
                .await
                .map_err(|err| LoaderError::source_read(display, err))
        })
        .await?;
        Ok(DefinitionSource::new(path, raw))
    }

    /// Walks the root collecting definition-source files. A missing or
    /// unreadable root is systemic; unreadable subdirectories are skipped.
    async fn scan(&self) -> LoaderResult<Vec<(PathBuf, ContentPath)>> {
        let mut pending = vec![self.root.clone()];
        let mut files = Vec::new();
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) if dir == self.root => {
                    return Err(LoaderError::source_read(self.root.display().to_string(), err));
                }
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                    continue;
                }
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|err| LoaderError::source_read(dir.display().to_string(), err))?
            {
                let entry_path = entry.path();
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(err) => {
                        warn!(path = %entry_path.display(), error = %err, "skipping unreadable entry");
                        continue;
                    }
                };
                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if entry_path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().ends_with(SOURCE_SUFFIX))
                {
                    match self.content_path_for(&entry_path) {
                        Some(content_path) => files.push((entry_path, content_path)),
                        None => {
                            warn!(path = %entry_path.display(), "skipping source with unmappable path");
                        }
                    }
                }
            }
        }
        // Stable enumeration regardless of directory iteration order.
        files.sort_by(|(_, a), (_, b)| a.cmp(b));
        Ok(files)
    }
}

#[async_trait]
impl SourceProvider for FsProvider {
    async fn list_sources(&self) -> LoaderResult<Vec<DefinitionSource>> {
        let mut sources = Vec::new();
        for (file, path) in self.scan().await? {
            match self.read_source(&file, path).await {
                Ok(source) => sources.push(source),
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "skipping unreadable source");
                }
            }
        }
        Ok(sources)
    }

    async fn fetch_source(&self, name: &str) -> LoaderResult<Option<DefinitionSource>> {
        for (file, path) in self.scan().await? {
            if path.leaf() == name {
                return self.read_source(&file, path).await.map(Some);
            }
        }
        Ok(None)
    }
}
