//! 业务逻辑服务层

mod config_session;
mod import_service;
mod migration_service;
mod persistence_service;
mod projection_service;

pub use config_session::ConfigSession;
pub use import_service::ImportService;
pub use migration_service::{LoadedState, MigrationResult, MigrationService};
pub use persistence_service::PersistenceService;
pub use projection_service::ProjectionService;

use std::sync::Arc;

use crate::traits::DocumentStore;
use crate::types::{BUILTIN_PROVIDER_KEYS, STORAGE_KEY};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Persisted document storage
    document_store: Arc<dyn DocumentStore>,
    /// Key the document is stored under
    storage_key: String,
    /// Provider identifiers offered even when no custom provider defines them
    builtin_providers: Vec<String>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(document_store: Arc<dyn DocumentStore>) -> Self {
        Self {
            document_store,
            storage_key: STORAGE_KEY.to_string(),
            builtin_providers: BUILTIN_PROVIDER_KEYS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    #[must_use]
    pub fn with_builtin_providers(mut self, builtin_providers: Vec<String>) -> Self {
        self.builtin_providers = builtin_providers;
        self
    }

    pub fn document_store(&self) -> &Arc<dyn DocumentStore> {
        &self.document_store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn builtin_providers(&self) -> &[String] {
        &self.builtin_providers
    }
}
