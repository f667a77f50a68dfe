//! Mutation operations on the internal model
//!
//! Out-of-range indices are no-ops (empty delta), since the view may hold stale
//! indices for records that were just removed.

use super::ConfigModel;
use crate::types::{
    Account, AccountField, ConfigCommand, Cookie, CookieField, Focus, ModelDelta, Provider,
    ProviderField, DEFAULT_PROVIDER_KEY,
};

impl ConfigModel {
    /// Single entry point for view-issued edits.
    pub fn apply(&mut self, command: ConfigCommand) -> ModelDelta {
        match command {
            ConfigCommand::AddAccount => {
                let index = self.add_account();
                ModelDelta::accounts_reshaped(Some(Focus::Account(index)))
            }
            ConfigCommand::RemoveAccount { index } => self.remove_account(index),
            ConfigCommand::DuplicateAccount { index } => self.duplicate_account(index),
            ConfigCommand::SetAccountField {
                index,
                field,
                value,
            } => self.set_account_field(index, field, value),
            ConfigCommand::SetAccountProvider {
                index,
                provider_key,
            } => self.set_account_provider(index, provider_key),
            ConfigCommand::AddCookie { index } => self.add_cookie(index),
            ConfigCommand::RemoveCookie {
                index,
                cookie_index,
            } => self.remove_cookie(index, cookie_index),
            ConfigCommand::SetCookieField {
                index,
                cookie_index,
                field,
                value,
            } => self.set_cookie_field(index, cookie_index, field, value),
            ConfigCommand::AddProvider => {
                let index = self.add_provider();
                ModelDelta::providers_reshaped(Some(Focus::Provider(index)))
            }
            ConfigCommand::RemoveProvider { index } => self.remove_provider(index),
            ConfigCommand::DuplicateProvider { index } => self.duplicate_provider(index),
            ConfigCommand::SetProviderField {
                index,
                field,
                value,
            } => self.set_provider_field(index, field, value),
            ConfigCommand::SelectProvider {
                account_index,
                provider_index,
            } => self.select_provider(account_index, provider_index),
        }
    }

    // ===== Accounts =====

    /// Appends a blank account and returns its index.
    pub fn add_account(&mut self) -> usize {
        self.accounts.push(Account::default());
        self.accounts.len() - 1
    }

    pub fn remove_account(&mut self, index: usize) -> ModelDelta {
        if index >= self.accounts.len() {
            return ModelDelta::none();
        }
        self.accounts.remove(index);
        let focus = Focus::Account(clamp_focus(index, self.accounts.len()));
        ModelDelta::accounts_reshaped(Some(focus))
    }

    /// Inserts a deep copy right after `index`; the copy keeps its provider reference.
    pub fn duplicate_account(&mut self, index: usize) -> ModelDelta {
        let Some(original) = self.accounts.get(index) else {
            return ModelDelta::none();
        };
        let copy = original.clone();
        self.accounts.insert(index + 1, copy);
        ModelDelta::accounts_reshaped(Some(Focus::Account(index + 1)))
    }

    pub fn set_account_field(
        &mut self,
        index: usize,
        field: AccountField,
        value: String,
    ) -> ModelDelta {
        let Some(account) = self.accounts.get_mut(index) else {
            return ModelDelta::none();
        };
        *account.field_mut(field) = value;
        ModelDelta::account(index)
    }

    pub fn set_account_provider(&mut self, index: usize, provider_key: String) -> ModelDelta {
        let Some(account) = self.accounts.get_mut(index) else {
            return ModelDelta::none();
        };
        account.provider = provider_key;
        ModelDelta::account(index)
    }

    // ===== Cookies =====

    pub fn add_cookie(&mut self, index: usize) -> ModelDelta {
        let Some(account) = self.accounts.get_mut(index) else {
            return ModelDelta::none();
        };
        account.cookies.push(Cookie::default());
        ModelDelta::account(index).with_focus(Focus::Account(index))
    }

    /// Removes one cookie entry; an emptied list gets the placeholder back.
    pub fn remove_cookie(&mut self, index: usize, cookie_index: usize) -> ModelDelta {
        let Some(account) = self.accounts.get_mut(index) else {
            return ModelDelta::none();
        };
        if cookie_index >= account.cookies.len() {
            return ModelDelta::none();
        }
        account.cookies.remove(cookie_index);
        account.ensure_cookie();
        ModelDelta::account(index).with_focus(Focus::Account(index))
    }

    pub fn set_cookie_field(
        &mut self,
        index: usize,
        cookie_index: usize,
        field: CookieField,
        value: String,
    ) -> ModelDelta {
        let Some(cookie) = self
            .accounts
            .get_mut(index)
            .and_then(|account| account.cookies.get_mut(cookie_index))
        else {
            return ModelDelta::none();
        };
        match field {
            CookieField::Key => cookie.key = value,
            CookieField::Value => cookie.value = value,
        }
        ModelDelta::account(index)
    }

    // ===== Providers =====

    /// Appends a blank provider and returns its index.
    pub fn add_provider(&mut self) -> usize {
        self.providers.push(Provider::default());
        self.providers.len() - 1
    }

    /// Removes a provider and clears account references to its key.
    pub fn remove_provider(&mut self, index: usize) -> ModelDelta {
        if index >= self.providers.len() {
            return ModelDelta::none();
        }
        let removed = self.providers.remove(index);
        let cleared = self.on_provider_removed(&removed.key);

        let focus = Focus::Provider(clamp_focus(index, self.providers.len()));
        ModelDelta::providers_reshaped(Some(focus)).with_accounts(cleared)
    }

    /// Inserts a deep copy right after `index` under a fresh unique key.
    pub fn duplicate_provider(&mut self, index: usize) -> ModelDelta {
        let Some(original) = self.providers.get(index) else {
            return ModelDelta::none();
        };
        let mut copy = original.clone();
        copy.key = self.unique_provider_key(&copy.key);
        self.providers.insert(index + 1, copy);
        ModelDelta::providers_reshaped(Some(Focus::Provider(index + 1)))
    }

    /// Writes one provider field. Changing a non-blank key renames every account
    /// reference in the same step.
    pub fn set_provider_field(
        &mut self,
        index: usize,
        field: ProviderField,
        value: String,
    ) -> ModelDelta {
        let Some(provider) = self.providers.get_mut(index) else {
            return ModelDelta::none();
        };

        let delta = ModelDelta::provider(index);
        if field != ProviderField::Key {
            *provider.field_mut(field) = value;
            return delta;
        }

        let old_key = std::mem::replace(&mut provider.key, value);
        let new_key = provider.key.clone();
        if old_key.trim().is_empty() || old_key == new_key {
            return delta;
        }
        delta.with_accounts(self.on_provider_renamed(&old_key, &new_key))
    }

    /// Points an account at a provider's trimmed key; blank keys are ignored.
    pub fn select_provider(&mut self, account_index: usize, provider_index: usize) -> ModelDelta {
        let Some(key) = self
            .providers
            .get(provider_index)
            .map(|p| p.trimmed_key().to_string())
            .filter(|key| !key.is_empty())
        else {
            return ModelDelta::none();
        };
        self.set_account_provider(account_index, key)
    }

    /// Derives a key no existing provider uses: `base`, then `base-copy`,
    /// `base-copy-2`, `base-copy-3`, ...
    ///
    /// A blank base is seeded as `"provider"`.
    #[must_use]
    pub fn unique_provider_key(&self, base: &str) -> String {
        let seed = match base.trim() {
            "" => DEFAULT_PROVIDER_KEY,
            trimmed => trimmed,
        };
        let taken = |candidate: &str| self.provider_keys().any(|key| key == candidate);

        if !taken(seed) {
            return seed.to_string();
        }

        let mut candidate = format!("{seed}-copy");
        let mut n = 1;
        while taken(&candidate) {
            n += 1;
            candidate = format!("{seed}-copy-{n}");
        }
        candidate
    }
}

/// Index to focus after removing `removed` from a list now `len` long.
///
/// An emptied list still focuses slot 0, the position the next added record takes.
fn clamp_focus(removed: usize, len: usize) -> usize {
    removed.min(len.saturating_sub(1))
}
