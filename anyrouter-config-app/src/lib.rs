//! Platform-agnostic application bootstrap for the `AnyRouter` config editor.
//!
//! Provides `AppConfig` (where the document lives), `AppState` (the open editing
//! session plus its service context) and `AppStateBuilder` (adapter injection).

pub mod adapters;
mod config;

use std::sync::Arc;

use anyrouter_config_core::error::{CoreError, CoreResult};
use anyrouter_config_core::services::{ConfigSession, MigrationResult, ServiceContext};
use anyrouter_config_core::traits::DocumentStore;

pub use config::AppConfig;

use adapters::JsonFileStore;

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds the storage adapter)
    pub ctx: Arc<ServiceContext>,
    /// Open editing session; the single owner of the edit model
    pub session: ConfigSession,
}

impl AppState {
    /// How the stored document was turned into the initial state.
    pub fn load_result(&self) -> &MigrationResult {
        self.session.load_result()
    }

    fn log_startup(&self) {
        match self.load_result() {
            MigrationResult::Absent => log::info!("No saved configuration, starting fresh"),
            MigrationResult::NotNeeded => log::info!("Saved configuration loaded"),
            MigrationResult::Migrated { from } => {
                log::info!("Saved configuration upgraded from v{from}");
            }
            MigrationResult::Unusable { version } => log::warn!(
                "Saved configuration (version {version:?}) could not be used, starting fresh"
            ),
        }
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `document_store`: where the configuration document is persisted
///
/// # Optional
/// - `storage_key`: defaults to the stock key
/// - `builtin_providers`: defaults to the stock built-in provider identifiers
pub struct AppStateBuilder {
    document_store: Option<Arc<dyn DocumentStore>>,
    storage_key: Option<String>,
    builtin_providers: Option<Vec<String>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            document_store: None,
            storage_key: None,
            builtin_providers: None,
        }
    }

    /// Builder preloaded from `config`, backed by a `JsonFileStore` in its data directory.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if the data directory cannot be created.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let store = JsonFileStore::new(&config.data_dir)?;
        Ok(Self::new()
            .document_store(Arc::new(store))
            .storage_key(config.storage_key.clone())
            .builtin_providers(config.builtin_providers.clone()))
    }

    #[must_use]
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn builtin_providers(mut self, keys: Vec<String>) -> Self {
        self.builtin_providers = Some(keys);
        self
    }

    /// Build the `AppState`, loading and migrating the stored document.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if the document store is missing or the
    /// storage key is blank.
    pub fn build(self) -> CoreResult<AppState> {
        let document_store = self.document_store.ok_or_else(|| {
            CoreError::ValidationError("document_store is required".to_string())
        })?;

        let mut ctx = ServiceContext::new(document_store);
        if let Some(key) = self.storage_key {
            if key.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "storage_key cannot be blank".to_string(),
                ));
            }
            ctx = ctx.with_storage_key(key);
        }
        if let Some(keys) = self.builtin_providers {
            ctx = ctx.with_builtin_providers(keys);
        }

        let ctx = Arc::new(ctx);
        let session = ConfigSession::open(Arc::clone(&ctx));
        let state = AppState { ctx, session };
        state.log_startup();
        Ok(state)
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
