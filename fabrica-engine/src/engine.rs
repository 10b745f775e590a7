use crate::tree;
use crate::{EngineError, EngineResult, InitError};
use fabrica_cache::{CacheConfig, CacheGroup, DistributedCache, TieredCache};
use fabrica_loader::{DefinitionSource, LoadedDefinition, Loader, SourceProvider};
use fabrica_model::{CategoryNode, Definition, ModelSink, PathOverrides};
use fabrica_registry::WidgetRegistry;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Cache key for the category forest within its group.
const CATEGORY_TREE_KEY: &str = "tree";

/// Lifecycle of the engine's one-time setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    /// The last initialization attempt failed; the engine is retryable.
    Failed,
}

/// The published definition/category view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub definitions: Vec<Definition>,
    pub categories: Vec<CategoryNode>,
}

/// Engine configuration: cache policy plus the static category-path
/// override table.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub overrides: PathOverrides,
}

/// Source-hash memo, keyed by content path. Lets a refresh pass skip
/// recompiling sources whose content is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SourceMemo {
    hash: String,
    slug: String,
}

type SharedInit = Shared<BoxFuture<'static, Result<(), InitError>>>;

/// One-attempt-at-a-time slot for the initialization future. The
/// generation counter lets the waiters of a finished attempt clear the
/// slot exactly once without clobbering a newer attempt.
struct InitSlot {
    generation: u64,
    pending: Option<SharedInit>,
}

/// The content-definition orchestrator.
///
/// Cheap to clone; all state lives behind one shared inner. Construct once
/// at process start and hand clones to the API layer.
#[derive(Clone)]
pub struct ContentEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    loader: Loader,
    registry: Arc<WidgetRegistry>,
    sink: Arc<dyn ModelSink>,
    overrides: PathOverrides,
    definitions_cache: TieredCache<Definition>,
    categories_cache: TieredCache<Vec<CategoryNode>>,
    hash_cache: TieredCache<SourceMemo>,
    snapshot: RwLock<Option<Snapshot>>,
    publisher: watch::Sender<Option<Snapshot>>,
    access: Mutex<HashMap<String, u64>>,
    state: Mutex<EngineState>,
    init: tokio::sync::Mutex<InitSlot>,
    /// Transient UI-facing selection, reset on every collection update.
    selected: Mutex<Option<String>>,
}

impl ContentEngine {
    pub fn new(
        provider: Arc<dyn SourceProvider>,
        registry: Arc<WidgetRegistry>,
        sink: Arc<dyn ModelSink>,
        distributed: Option<Arc<dyn DistributedCache>>,
        config: EngineConfig,
    ) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            inner: Arc::new(EngineInner {
                loader: Loader::new(provider, Arc::clone(&registry)),
                registry,
                sink,
                overrides: config.overrides,
                definitions_cache: TieredCache::new(
                    CacheGroup::Definitions,
                    &config.cache,
                    distributed.clone(),
                ),
                categories_cache: TieredCache::new(
                    CacheGroup::Categories,
                    &config.cache,
                    distributed,
                ),
                hash_cache: TieredCache::local_only(CacheGroup::SourceHashes, &config.cache),
                snapshot: RwLock::new(None),
                publisher,
                access: Mutex::new(HashMap::new()),
                state: Mutex::new(EngineState::Uninitialized),
                init: tokio::sync::Mutex::new(InitSlot {
                    generation: 0,
                    pending: None,
                }),
                selected: Mutex::new(None),
            }),
        }
    }

    /// Awaits the one-time setup. Concurrent first-time callers share a
    /// single pass; a failed attempt rejects every waiter, and a later call
    /// starts a fresh attempt.
    pub async fn wait_for_initialization(&self) -> Result<(), InitError> {
        if self.state() == EngineState::Ready {
            return Ok(());
        }

        let (attempt, generation) = {
            let mut slot = self.inner.init.lock().await;
            if self.state() == EngineState::Ready {
                return Ok(());
            }
            match &slot.pending {
                Some(attempt) => (attempt.clone(), slot.generation),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let attempt: SharedInit =
                        async move { inner.initialize_attempt().await }.boxed().shared();
                    slot.pending = Some(attempt.clone());
                    (attempt, slot.generation)
                }
            }
        };

        let result = attempt.await;

        let mut slot = self.inner.init.lock().await;
        if slot.generation == generation {
            slot.pending = None;
            slot.generation += 1;
        }
        result
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        *self.inner.state.lock().expect("state lock poisoned")
    }

    /// The current definition/category snapshot. Safe only after
    /// [`Self::wait_for_initialization`] has resolved.
    pub fn collection_data(&self) -> EngineResult<Snapshot> {
        self.inner
            .snapshot
            .read()
            .expect("snapshot lock poisoned")
            .clone()
            .ok_or(EngineError::NotReady)
    }

    /// Subscribes to snapshot publications. The receiver holds `None` until
    /// the first successful pass.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.inner.publisher.subscribe()
    }

    /// The pure-grouping category view (collection leaves pruned), for
    /// category-only consumers.
    pub fn category_groups(&self) -> EngineResult<Vec<CategoryNode>> {
        Ok(tree::grouping_roots(&self.collection_data()?.categories))
    }

    /// Re-scans sources and republishes the snapshot.
    ///
    /// With `force_recompile` every cache group is cleared first and all
    /// sources recompile, most-read definitions first. Otherwise sources
    /// whose content hash is unchanged are served from cache.
    pub async fn update_collections(&self, force_recompile: bool) -> EngineResult<()> {
        self.wait_for_initialization().await?;
        self.inner.refresh(force_recompile).await?;
        *self.inner.selected.lock().expect("selection lock poisoned") = None;
        Ok(())
    }

    /// On-demand single-definition refresh, used after an edit. Absent when
    /// the source no longer exists; a failure here never disturbs the
    /// engine's ready state.
    pub async fn lazy_load(&self, name: &str) -> EngineResult<Option<Definition>> {
        self.inner.bump_access(name);
        if let Some(definition) = self.inner.definitions_cache.get(name).await {
            return Ok(Some(definition));
        }

        let Some(loaded) = self.inner.loader.load_one(name).await? else {
            return Ok(None);
        };
        self.inner.sink.ensure_model(&loaded.definition).await?;
        self.inner
            .definitions_cache
            .set(&loaded.definition.slug, loaded.definition.clone())
            .await;
        self.inner
            .hash_cache
            .set(
                loaded.definition.path.as_str(),
                SourceMemo {
                    hash: loaded.source_hash,
                    slug: loaded.definition.slug.clone(),
                },
            )
            .await;
        Ok(Some(loaded.definition))
    }

    /// Marks a definition as selected in the UI.
    pub fn select_definition(&self, name: impl Into<String>) {
        *self.inner.selected.lock().expect("selection lock poisoned") = Some(name.into());
    }

    /// The transient UI selection, if any.
    pub fn selected_definition(&self) -> Option<String> {
        self.inner
            .selected
            .lock()
            .expect("selection lock poisoned")
            .clone()
    }

    /// Read/lazy-load counters per definition name. Scheduling bias only.
    pub fn access_counts(&self) -> HashMap<String, u64> {
        self.inner.access.lock().expect("access lock poisoned").clone()
    }
}

impl EngineInner {
    async fn initialize_attempt(self: Arc<Self>) -> Result<(), InitError> {
        *self.state.lock().expect("state lock poisoned") = EngineState::Initializing;
        info!("content engine initializing");
        match self.run_initialization().await {
            Ok(()) => {
                *self.state.lock().expect("state lock poisoned") = EngineState::Ready;
                info!("content engine ready");
                Ok(())
            }
            Err(err) => {
                *self.state.lock().expect("state lock poisoned") = EngineState::Failed;
                error!(error = %err, "content engine initialization failed");
                Err(InitError::new(err))
            }
        }
    }

    async fn run_initialization(&self) -> EngineResult<()> {
        self.registry.initialize().await?;
        self.refresh(false).await
    }

    /// One load-and-publish pass. Caches are only written after the whole
    /// load step succeeded, so no reader observes a torn population.
    async fn refresh(&self, force: bool) -> EngineResult<()> {
        let mut sources = self.loader.list_sources().await?;

        if force {
            self.definitions_cache.clear().await;
            self.categories_cache.clear().await;
            self.hash_cache.clear().await;
            let access = self.access.lock().expect("access lock poisoned").clone();
            let hits = |source: &DefinitionSource| {
                access
                    .get(&source.path.leaf().to_lowercase())
                    .copied()
                    .unwrap_or(0)
            };
            sources.sort_by(|a, b| hits(b).cmp(&hits(a)).then_with(|| a.path.cmp(&b.path)));
        }

        let mut loaded = Vec::with_capacity(sources.len());
        for source in &sources {
            let hash = source.content_hash();
            if !force {
                if let Some(cached) = self.cached_unchanged(source, &hash).await {
                    loaded.push(cached);
                    continue;
                }
            }
            match self.loader.compile_source(source).await {
                Ok(definition) => loaded.push(LoadedDefinition {
                    definition,
                    source_hash: hash,
                }),
                Err(err) => {
                    warn!(path = %source.path, error = %err, "skipping definition source");
                }
            }
        }

        self.publish(loaded).await
    }

    /// Returns the cached definition for a source whose memo hash matches.
    async fn cached_unchanged(
        &self,
        source: &DefinitionSource,
        hash: &str,
    ) -> Option<LoadedDefinition> {
        let memo = self.hash_cache.get(source.path.as_str()).await?;
        if memo.hash != hash {
            return None;
        }
        let definition = self.definitions_cache.get(&memo.slug).await?;
        Some(LoadedDefinition {
            definition,
            source_hash: memo.hash,
        })
    }

    async fn publish(&self, mut loaded: Vec<LoadedDefinition>) -> EngineResult<()> {
        // Stable order by path: the tree builder's last-writer-wins
        // collisions require it, and it makes repeat snapshots identical.
        loaded.sort_by(|a, b| a.definition.path.cmp(&b.definition.path));

        for item in &loaded {
            self.sink.ensure_model(&item.definition).await?;
        }

        let definitions: Vec<Definition> =
            loaded.iter().map(|item| item.definition.clone()).collect();
        let categories = tree::build(&definitions, &self.overrides);

        for item in &loaded {
            self.definitions_cache
                .set(&item.definition.slug, item.definition.clone())
                .await;
            self.hash_cache
                .set(
                    item.definition.path.as_str(),
                    SourceMemo {
                        hash: item.source_hash.clone(),
                        slug: item.definition.slug.clone(),
                    },
                )
                .await;
        }
        self.categories_cache
            .set(CATEGORY_TREE_KEY, categories.clone())
            .await;

        let snapshot = Snapshot {
            definitions,
            categories,
        };
        *self.snapshot.write().expect("snapshot lock poisoned") = Some(snapshot.clone());
        self.publisher.send_replace(Some(snapshot));
        Ok(())
    }

    fn bump_access(&self, name: &str) {
        let mut access = self.access.lock().expect("access lock poisoned");
        *access.entry(name.to_string()).or_insert(0) += 1;
    }
}
