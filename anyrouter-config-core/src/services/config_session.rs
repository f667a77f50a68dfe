//! 配置会话
//!
//! `ConfigSession` is the explicit owner of the edit model. The view layer issues
//! commands and imports through it and reads back fresh projections; it never holds
//! the model itself. Every change runs to completion (mutation, integrity
//! propagation, persistence) before the call returns.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::CoreResult;
use crate::model::ConfigModel;
use crate::services::{
    ImportService, LoadedState, MigrationResult, MigrationService, PersistenceService,
    ProjectionService, ServiceContext,
};
use crate::types::{
    AccountExport, CacheStatus, ConfigCommand, Focus, ModelDelta, PersistedDocument,
    ProviderExportMap,
};

/// Single-writer editing session over the persisted configuration
pub struct ConfigSession {
    model: ConfigModel,
    saved_at: Option<DateTime<Utc>>,
    /// Set when the last write (or reset) did not reach the store
    unsaved: bool,
    load_result: MigrationResult,
    persistence: PersistenceService,
    import: ImportService,
    projection: ProjectionService,
}

impl ConfigSession {
    /// Loads (and if needed migrates) the stored document. Always yields a usable session.
    #[must_use]
    pub fn open(ctx: Arc<ServiceContext>) -> Self {
        let projection = ProjectionService::new(ctx.builtin_providers().to_vec());
        let persistence = PersistenceService::new(ctx);

        let LoadedState {
            model,
            saved_at,
            result,
        } = MigrationService::new().upgrade(persistence.load());

        log::info!(
            "Config session opened: {} accounts, {} providers ({result:?})",
            model.accounts.len(),
            model.providers.len()
        );

        Self {
            model,
            saved_at,
            unsaved: false,
            load_result: result,
            persistence,
            import: ImportService::new(),
            projection,
        }
    }

    /// How the stored document was turned into the initial state
    pub fn load_result(&self) -> &MigrationResult {
        &self.load_result
    }

    /// Read-only view of the edit model
    pub fn model(&self) -> &ConfigModel {
        &self.model
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Whether the in-memory model differs from what the store would load.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Applies one edit and persists the result.
    ///
    /// Commands that change nothing (stale indices, blank selections) skip the write.
    pub fn apply(&mut self, command: ConfigCommand) -> ModelDelta {
        log::debug!("Applying {command:?}");
        let delta = self.model.apply(command);
        if delta.is_empty() {
            log::debug!("Command changed nothing, skipping save");
        } else {
            self.persist();
        }
        delta
    }

    /// Replaces every account with the parsed import text.
    ///
    /// # Errors
    /// `ImportError` when the text is rejected; the model is left untouched.
    pub fn import_accounts(&mut self, raw: &str) -> CoreResult<ModelDelta> {
        let accounts = self.import.parse_accounts(raw).inspect_err(|e| {
            log::warn!("Account import rejected: {e}");
        })?;

        log::info!("Imported {} accounts", accounts.len());
        let focus = (!accounts.is_empty()).then_some(Focus::Account(0));
        self.model.accounts = accounts;
        self.model.normalize();
        self.persist();
        Ok(ModelDelta::accounts_reshaped(focus))
    }

    /// Replaces every provider with the parsed import text.
    ///
    /// Account references are left as they are, even if they now dangle.
    ///
    /// # Errors
    /// `ImportError` when the text is rejected; the model is left untouched.
    pub fn import_providers(&mut self, raw: &str) -> CoreResult<ModelDelta> {
        let providers = self.import.parse_providers(raw).inspect_err(|e| {
            log::warn!("Provider import rejected: {e}");
        })?;

        log::info!("Imported {} providers", providers.len());
        let focus = (!providers.is_empty()).then_some(Focus::Provider(0));
        self.model.providers = providers;
        self.persist();
        Ok(ModelDelta::providers_reshaped(focus))
    }

    /// Restores the default state and removes the stored document.
    pub fn reset(&mut self) -> ModelDelta {
        self.model = ConfigModel::default();
        self.saved_at = None;
        self.unsaved = !self.persistence.clear();
        if self.unsaved {
            log::warn!("Stored document could not be removed; it will be overwritten on next save");
        }
        log::info!("Configuration reset to defaults");

        ModelDelta {
            accounts_reshaped: true,
            providers_reshaped: true,
            focus: Some(Focus::Account(0)),
            ..ModelDelta::default()
        }
    }

    pub fn accounts_projection(&self) -> Vec<AccountExport> {
        self.projection.project_accounts(&self.model)
    }

    pub fn providers_projection(&self) -> ProviderExportMap {
        self.projection.project_providers(&self.model)
    }

    /// Pretty-printed account export
    pub fn accounts_json(&self) -> CoreResult<String> {
        self.projection.accounts_json(&self.model)
    }

    /// Pretty-printed provider export (`""` when empty)
    pub fn providers_json(&self) -> CoreResult<String> {
        self.projection.providers_json(&self.model)
    }

    pub fn provider_key_options(&self) -> Vec<String> {
        self.projection.provider_key_options(&self.model)
    }

    pub fn provider_options_for(&self, account_index: usize) -> Vec<String> {
        self.projection.provider_options_for(&self.model, account_index)
    }

    pub fn cache_status(&self) -> CacheStatus {
        CacheStatus {
            cached: self.persistence.has_document(),
            saved_at: self.saved_at,
        }
    }

    /// Writes the whole model. `saved_at` only moves when the write succeeds.
    fn persist(&mut self) {
        // stored with millisecond precision
        let now = Utc::now().trunc_subsecs(3);
        let document = PersistedDocument::new(self.model.clone(), Some(now));
        if self.persistence.save(&document) {
            self.saved_at = Some(now);
            self.unsaved = false;
        } else {
            self.unsaved = true;
        }
    }
}
