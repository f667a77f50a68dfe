//! Editable internal model
//!
//! `ConfigModel` is the single mutable source of truth. All edits go through
//! [`ConfigModel::apply`]; provider renames and removals keep `account.provider`
//! references in step within the same call (see `integrity`).

mod integrity;
mod mutations;

use serde::{Deserialize, Serialize};

use crate::types::{Account, Provider};

/// Accounts and providers as the user edits them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigModel {
    #[serde(default = "default_accounts")]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub providers: Vec<Provider>,
}

fn default_accounts() -> Vec<Account> {
    vec![Account::default()]
}

/// Default state: one blank account, no providers.
impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            providers: Vec::new(),
        }
    }
}

impl ConfigModel {
    #[must_use]
    pub fn new(accounts: Vec<Account>, providers: Vec<Provider>) -> Self {
        let mut model = Self {
            accounts,
            providers,
        };
        model.normalize();
        model
    }

    /// Restores the non-empty cookie invariant on every account.
    ///
    /// Returns the indices of accounts that needed the placeholder.
    pub fn normalize(&mut self) -> Vec<usize> {
        self.accounts
            .iter_mut()
            .enumerate()
            .filter_map(|(i, account)| account.ensure_cookie().then_some(i))
            .collect()
    }

    /// Non-blank trimmed provider keys in model order (duplicates kept).
    pub fn provider_keys(&self) -> impl Iterator<Item = &str> {
        self.providers
            .iter()
            .map(Provider::trimmed_key)
            .filter(|key| !key.is_empty())
    }
}
