//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::content::{BlockPipeline, BlockTypeRegistry};
use crate::db;
use crate::modal::span_rewriter;
use crate::modal::{ModalService, StyleCapturer, SupportedBlockSet, UrlPolicy};
use crate::models::{ContentStore, MemoryContentStore, PgContentStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Process-wide configuration, read-only after startup.
    config: Config,

    /// Block names whose output the span rewriter handles.
    supported_blocks: SupportedBlockSet,

    /// Modal content service (store, pipeline, style capture).
    modal: ModalService,
}

impl AppState {
    /// Create application state: connect storage and build the render
    /// pipeline.
    ///
    /// Uses PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory
    /// store optionally seeded from `CONTENT_SEED_FILE`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn ContentStore> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;
                db::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;
                info!("PostgreSQL content store ready");
                Arc::new(PgContentStore::new(pool))
            }
            None => match &config.content_seed_file {
                Some(path) => {
                    let store = MemoryContentStore::from_seed_file(path)
                        .context("failed to load content seed file")?;
                    info!(items = store.len(), "in-memory content store seeded");
                    Arc::new(store)
                }
                None => {
                    warn!("DATABASE_URL not set; serving from an empty in-memory store");
                    Arc::new(MemoryContentStore::new())
                }
            },
        };

        let supported_blocks = SupportedBlockSet::builder()
            .add_all(config.extra_supported_blocks.iter().cloned())
            .build();

        Ok(Self::from_parts(config.clone(), store, supported_blocks))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn ContentStore>,
        supported_blocks: SupportedBlockSet,
    ) -> Self {
        Self::with_pipeline(config, store, supported_blocks, |_| {})
    }

    /// Like [`AppState::from_parts`], with a hook that may register further
    /// render filters after the span rewriter.
    pub fn with_pipeline(
        config: Config,
        store: Arc<dyn ContentStore>,
        supported_blocks: SupportedBlockSet,
        customize: impl FnOnce(&mut BlockPipeline),
    ) -> Self {
        let mut pipeline = BlockPipeline::new();
        span_rewriter::register(&mut pipeline, &supported_blocks);
        customize(&mut pipeline);

        let capturer = StyleCapturer::new(
            Arc::new(BlockTypeRegistry::with_core_types()),
            config.theme_block_gap,
        );
        let modal = ModalService::new(
            store,
            Arc::new(pipeline),
            capturer,
            UrlPolicy::from_config(&config),
            &config.site_url,
        );

        info!(
            supported_blocks = supported_blocks.len(),
            environment = ?config.environment,
            "application state initialized"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                supported_blocks,
                modal,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn supported_blocks(&self) -> &SupportedBlockSet {
        &self.inner.supported_blocks
    }

    pub fn modal(&self) -> &ModalService {
        &self.inner.modal
    }

    /// Check if the content store is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.inner.modal.store().healthy().await
    }
}
