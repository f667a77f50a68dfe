//! Referential integrity between `account.provider` and provider keys.
//!
//! Providers never reference accounts, so only provider renames and removals
//! propagate.

use super::ConfigModel;

impl ConfigModel {
    /// Rewrites every account referencing `old_key` to `new_key`.
    ///
    /// Returns the indices of rewritten accounts.
    pub fn on_provider_renamed(&mut self, old_key: &str, new_key: &str) -> Vec<usize> {
        self.rewrite_references(old_key, new_key)
    }

    /// Clears every account reference to `removed_key`.
    ///
    /// Returns the indices of cleared accounts.
    pub fn on_provider_removed(&mut self, removed_key: &str) -> Vec<usize> {
        self.rewrite_references(removed_key, "")
    }

    fn rewrite_references(&mut self, from: &str, to: &str) -> Vec<usize> {
        if from.trim().is_empty() {
            return Vec::new();
        }

        let touched: Vec<usize> = self
            .accounts
            .iter_mut()
            .enumerate()
            .filter(|(_, account)| account.provider == from)
            .map(|(i, account)| {
                account.provider = to.to_string();
                i
            })
            .collect();

        if !touched.is_empty() {
            log::debug!(
                "Provider reference '{from}' -> '{to}' rewritten on {} account(s)",
                touched.len()
            );
        }
        touched
    }
}
