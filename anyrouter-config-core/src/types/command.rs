//! Mutation commands and the deltas they produce.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{AccountField, CookieField, ProviderField};

/// Every edit the view layer can request against the internal model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    AddAccount,
    RemoveAccount {
        index: usize,
    },
    DuplicateAccount {
        index: usize,
    },
    SetAccountField {
        index: usize,
        field: AccountField,
        value: String,
    },
    SetAccountProvider {
        index: usize,
        provider_key: String,
    },
    AddCookie {
        index: usize,
    },
    RemoveCookie {
        index: usize,
        cookie_index: usize,
    },
    SetCookieField {
        index: usize,
        cookie_index: usize,
        field: CookieField,
        value: String,
    },
    AddProvider,
    RemoveProvider {
        index: usize,
    },
    DuplicateProvider {
        index: usize,
    },
    SetProviderField {
        index: usize,
        field: ProviderField,
        value: String,
    },
    /// Point an account at an existing provider's trimmed key.
    SelectProvider {
        account_index: usize,
        provider_index: usize,
    },
}

/// Record the view should bring into focus after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum Focus {
    Account(usize),
    Provider(usize),
}

/// What a mutation changed; an empty delta means the command was a no-op.
///
/// Indices refer to positions after the mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDelta {
    /// Account list was inserted into, removed from, or replaced
    pub accounts_reshaped: bool,
    /// Provider list was inserted into, removed from, or replaced
    pub providers_reshaped: bool,
    /// Accounts whose content changed in place
    pub touched_accounts: BTreeSet<usize>,
    /// Providers whose content changed in place
    pub touched_providers: BTreeSet<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<Focus>,
}

impl ModelDelta {
    /// Delta for a command that changed nothing
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.accounts_reshaped
            && !self.providers_reshaped
            && self.touched_accounts.is_empty()
            && self.touched_providers.is_empty()
    }

    #[must_use]
    pub fn accounts_reshaped(focus: Option<Focus>) -> Self {
        Self {
            accounts_reshaped: true,
            focus,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn providers_reshaped(focus: Option<Focus>) -> Self {
        Self {
            providers_reshaped: true,
            focus,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn account(index: usize) -> Self {
        Self {
            touched_accounts: BTreeSet::from([index]),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn provider(index: usize) -> Self {
        Self {
            touched_providers: BTreeSet::from([index]),
            ..Self::default()
        }
    }

    /// Marks additional accounts touched (e.g. by reference propagation).
    #[must_use]
    pub fn with_accounts(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.touched_accounts.extend(indices);
        self
    }

    #[must_use]
    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }
}
