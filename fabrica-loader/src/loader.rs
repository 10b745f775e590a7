use crate::{
    ArtifactProvider, Compiler, DefinitionSource, DeployMode, FsProvider, LoaderResult,
    RemoteProvider, RetryConfig, SourceProvider,
};
use fabrica_model::Definition;
use fabrica_registry::WidgetRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for the loader: deployment mode plus the per-mode source
/// locations.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub mode: DeployMode,
    /// Definition directory scanned in development mode.
    pub source_root: PathBuf,
    /// Structure-API base URL used in browser mode.
    pub structure_api_url: String,
    /// Pre-compiled artifact directory used in production mode.
    pub artifact_dir: PathBuf,
    pub retry: RetryConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mode: DeployMode::Development,
            source_root: PathBuf::from("definitions"),
            structure_api_url: "http://localhost:8080/api".to_string(),
            artifact_dir: PathBuf::from("artifacts"),
            retry: RetryConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Builds the provider strategy for the configured deployment mode.
    #[must_use]
    pub fn provider(&self) -> Arc<dyn SourceProvider> {
        match self.mode {
            DeployMode::Development => {
                Arc::new(FsProvider::new(&self.source_root, self.retry.clone()))
            }
            DeployMode::Browser => Arc::new(RemoteProvider::new(
                self.structure_api_url.clone(),
                self.retry.clone(),
            )),
            DeployMode::Production => {
                Arc::new(ArtifactProvider::new(&self.artifact_dir, self.retry.clone()))
            }
        }
    }
}

/// One successfully compiled definition plus its source memo hash.
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    pub definition: Definition,
    pub source_hash: String,
}

/// Drives source enumeration and compilation.
pub struct Loader {
    provider: Arc<dyn SourceProvider>,
    registry: Arc<WidgetRegistry>,
}

impl Loader {
    #[must_use]
    pub fn new(provider: Arc<dyn SourceProvider>, registry: Arc<WidgetRegistry>) -> Self {
        Self { provider, registry }
    }

    /// Enumerates the raw sources without compiling them.
    pub async fn list_sources(&self) -> LoaderResult<Vec<DefinitionSource>> {
        self.provider.list_sources().await
    }

    /// Compiles one source against the current capability table.
    pub async fn compile_source(&self, source: &DefinitionSource) -> LoaderResult<Definition> {
        self.registry.initialize().await?;
        let compiler = Compiler::new(self.registry.capability_table(), Arc::clone(&self.registry));
        compiler.compile(source).await
    }

    /// Loads and compiles every available source. A source that fails to
    /// compile is logged and skipped; the batch never aborts on one item.
    pub async fn load_all(&self) -> LoaderResult<Vec<LoadedDefinition>> {
        let sources = self.list_sources().await?;
        let total = sources.len();
        let mut loaded = Vec::with_capacity(total);
        let mut skipped = 0usize;
        for source in &sources {
            match self.compile_source(source).await {
                Ok(definition) => loaded.push(LoadedDefinition {
                    definition,
                    source_hash: source.content_hash(),
                }),
                Err(err) => {
                    skipped += 1;
                    warn!(path = %source.path, error = %err, "skipping definition source");
                }
            }
        }
        info!(loaded = loaded.len(), skipped, total, "definition load pass complete");
        Ok(loaded)
    }

    /// Loads one definition by name. Absent when the source no longer
    /// exists; a compile failure is logged and reported absent. I/O errors
    /// surface after retries.
    pub async fn load_one(&self, name: &str) -> LoaderResult<Option<LoadedDefinition>> {
        let Some(source) = self.provider.fetch_source(name).await? else {
            return Ok(None);
        };
        match self.compile_source(&source).await {
            Ok(definition) => Ok(Some(LoadedDefinition {
                definition,
                source_hash: source.content_hash(),
            })),
            Err(err) => {
                warn!(name, error = %err, "definition source no longer compiles");
                Ok(None)
            }
        }
    }
}
