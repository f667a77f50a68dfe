//! Persistent store boundary
//!
//! Owns raw encode/decode of the envelope. Every failure is absorbed here:
//! `load` degrades to "nothing stored" and `save`/`clear` degrade to in-memory-only,
//! so storage trouble never reaches the mutation path.

use std::sync::Arc;

use crate::services::ServiceContext;
use crate::types::{PersistedDocument, StoredEnvelope};

/// Best-effort document persistence
pub struct PersistenceService {
    ctx: Arc<ServiceContext>,
}

impl PersistenceService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Reads and decodes the stored envelope.
    ///
    /// Returns `None` when nothing is stored or the stored text cannot be read as an
    /// envelope. Version and payload checks belong to the migration step.
    pub fn load(&self) -> Option<StoredEnvelope> {
        let key = self.ctx.storage_key();
        let raw = match self.ctx.document_store().read(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                log::debug!("No stored document under '{key}'");
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read stored document '{key}': {e}");
                return None;
            }
        };

        match StoredEnvelope::parse(&raw) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                log::warn!("Discarding unreadable stored document '{key}': {e}");
                None
            }
        }
    }

    /// Overwrites the stored document. Returns whether the write went through.
    pub fn save(&self, document: &PersistedDocument) -> bool {
        let key = self.ctx.storage_key();
        let result = document
            .to_json()
            .and_then(|raw| self.ctx.document_store().write(key, &raw));

        match result {
            Ok(()) => {
                log::debug!("Saved document '{key}'");
                true
            }
            Err(e) => {
                log::warn!("Failed to save document '{key}', keeping edits in memory only: {e}");
                false
            }
        }
    }

    /// Removes the stored document. Returns whether the removal went through.
    pub fn clear(&self) -> bool {
        let key = self.ctx.storage_key();
        match self.ctx.document_store().remove(key) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to clear stored document '{key}': {e}");
                false
            }
        }
    }

    /// Whether anything is currently stored under the key.
    pub fn has_document(&self) -> bool {
        matches!(
            self.ctx.document_store().read(self.ctx.storage_key()),
            Ok(Some(raw)) if !raw.is_empty()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigModel;
    use crate::test_utils::{create_test_context, MockDocumentStore};
    use crate::traits::DocumentStore;
    use crate::types::STORAGE_KEY;

    #[test]
    fn load_absent_when_empty() {
        let (ctx, _) = create_test_context();
        let svc = PersistenceService::new(ctx);
        assert!(svc.load().is_none());
        assert!(!svc.has_document());
    }

    #[test]
    fn load_absent_on_corrupt_text() {
        let (ctx, store) = create_test_context();
        store.write(STORAGE_KEY, "{not json").unwrap();
        assert!(PersistenceService::new(ctx).load().is_none());
    }

    #[test]
    fn load_absent_on_read_failure() {
        let (ctx, store) = create_test_context();
        store.write(STORAGE_KEY, "{}").unwrap();
        store.set_read_error(Some("storage disabled".to_string()));
        assert!(PersistenceService::new(ctx).load().is_none());
    }

    #[test]
    fn save_then_load() {
        let (ctx, _) = create_test_context();
        let svc = PersistenceService::new(ctx);

        assert!(svc.save(&PersistedDocument::new(ConfigModel::default(), None)));
        assert!(svc.has_document());

        let envelope = svc.load().unwrap();
        assert_eq!(envelope.version, Some(3));
        assert!(envelope.data.is_some());
    }

    #[test]
    fn save_failure_is_soft() {
        let store = Arc::new(MockDocumentStore::new());
        store.set_write_error(Some("quota exceeded".to_string()));
        let ctx = Arc::new(ServiceContext::new(store.clone()));
        let svc = PersistenceService::new(ctx);

        assert!(!svc.save(&PersistedDocument::new(ConfigModel::default(), None)));
        assert!(!svc.has_document());
    }

    #[test]
    fn clear_removes_document() {
        let (ctx, _) = create_test_context();
        let svc = PersistenceService::new(ctx);
        svc.save(&PersistedDocument::new(ConfigModel::default(), None));

        assert!(svc.clear());
        assert!(svc.load().is_none());
    }
}
