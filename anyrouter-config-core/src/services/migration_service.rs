//! 文档格式迁移服务
//!
//! Upgrades stored documents to the current schema (v3):
//! - v1: accounts already carry a singular `provider`; missing fields get defaults
//! - v2: accounts carry a `providers` array; index 0 becomes the singular `provider`
//! - v3: read as-is; the current branch short-circuits before the legacy readers run
//!
//! Every path restores the non-empty cookie invariant. Unknown versions and
//! envelopes without `data` yield the default state.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::model::ConfigModel;
use crate::types::{Account, Cookie, Provider, StoredEnvelope, STORAGE_VERSION};
use crate::utils::text::{join_list, stringify, text_or_blank};

/// 迁移结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationResult {
    /// Nothing stored (or the stored text was unreadable)
    Absent,
    /// Stored document could not be used (unknown version or missing `data`)
    Unusable {
        /// Version found in the envelope, if any
        version: Option<u64>,
    },
    /// Already at the current version
    NotNeeded,
    /// Upgraded from an older version
    Migrated {
        /// Version the document was written with
        from: u64,
    },
}

/// Usable state produced at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub model: ConfigModel,
    pub saved_at: Option<DateTime<Utc>>,
    pub result: MigrationResult,
}

impl LoadedState {
    fn fallback(result: MigrationResult) -> Self {
        Self {
            model: ConfigModel::default(),
            saved_at: None,
            result,
        }
    }
}

/// 迁移服务（无状态）
pub struct MigrationService;

impl MigrationService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Turns whatever was loaded into a usable state. Never fails.
    pub fn upgrade(&self, envelope: Option<StoredEnvelope>) -> LoadedState {
        let Some(envelope) = envelope else {
            log::info!("No stored document, starting from default state");
            return LoadedState::fallback(MigrationResult::Absent);
        };

        let unusable = MigrationResult::Unusable {
            version: envelope.version,
        };
        let (Some(version), Some(data)) = (envelope.version, envelope.data.as_ref()) else {
            log::warn!("Stored document has no usable version/data, starting from default state");
            return LoadedState::fallback(unusable);
        };

        let Some(model) = self.migrate(version, data) else {
            log::warn!("Unsupported document version {version}, starting from default state");
            return LoadedState::fallback(unusable);
        };

        let result = if version == STORAGE_VERSION {
            log::info!("Stored document is current (v{version}), no migration needed");
            MigrationResult::NotNeeded
        } else {
            log::info!("Migrated stored document from v{version} to v{STORAGE_VERSION}");
            MigrationResult::Migrated { from: version }
        };

        LoadedState {
            model,
            saved_at: envelope.saved_at,
            result,
        }
    }

    /// Pure `(version, payload) -> current model` transition.
    ///
    /// Returns `None` for versions this build does not know. Migrating the output of a
    /// current-version document again yields the same model.
    pub fn migrate(&self, version: u64, data: &Value) -> Option<ConfigModel> {
        let mut model = match version {
            STORAGE_VERSION => Self::read_current(data),
            2 => Self::read_legacy(data, |account| {
                match account.get("providers") {
                    Some(Value::Array(providers)) => text_or_blank(providers.first()),
                    _ => text_or_blank(account.get("provider")),
                }
            }),
            1 => Self::read_legacy(data, |account| text_or_blank(account.get("provider"))),
            _ => return None,
        };
        model.normalize();
        Some(model)
    }

    /// Current-version payload: typed read, falling back to field-by-field reading
    /// when a hand-edited document no longer matches the schema.
    fn read_current(data: &Value) -> ConfigModel {
        serde_json::from_value(data.clone()).unwrap_or_else(|e| {
            log::warn!("Current-version payload did not match schema ({e}), reading leniently");
            Self::read_legacy(data, |account| text_or_blank(account.get("provider")))
        })
    }

    fn read_legacy(
        data: &Value,
        provider_of: impl Fn(&Map<String, Value>) -> String,
    ) -> ConfigModel {
        let empty = Map::new();

        let accounts = match data.get("accounts") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    let fields = item.as_object().unwrap_or(&empty);
                    Account {
                        name: text_or_blank(fields.get("name")),
                        api_user: text_or_blank(fields.get("api_user")),
                        cookies: read_cookie_list(fields.get("cookies")),
                        provider: provider_of(fields),
                    }
                })
                .collect(),
            _ => ConfigModel::default().accounts,
        };

        let providers = match data.get("providers") {
            Some(Value::Array(items)) => items.iter().map(read_stored_provider).collect(),
            _ => Vec::new(),
        };

        ConfigModel {
            accounts,
            providers,
        }
    }
}

impl Default for MigrationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored cookie lists are arrays of `{key, value}`; anything else means "no cookies".
fn read_cookie_list(value: Option<&Value>) -> Vec<Cookie> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|cookie| Cookie::new(stringify(cookie.get("key")), stringify(cookie.get("value"))))
        .collect()
}

fn read_stored_provider(item: &Value) -> Provider {
    let empty = Map::new();
    let fields = item.as_object().unwrap_or(&empty);
    let text = |name: &str| text_or_blank(fields.get(name));

    let waf_cookie_names = match fields.get("waf_cookie_names") {
        Some(Value::Array(names)) => join_list(names),
        other => text_or_blank(other),
    };

    Provider {
        key: text("key"),
        domain: text("domain"),
        login_path: text("login_path"),
        sign_in_path: text("sign_in_path"),
        user_info_path: text("user_info_path"),
        api_user_key: text("api_user_key"),
        bypass_method: text("bypass_method"),
        waf_cookie_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersistedDocument;
    use serde_json::json;

    fn envelope(value: Value) -> Option<StoredEnvelope> {
        Some(StoredEnvelope::parse(&value.to_string()).unwrap())
    }

    #[test]
    fn absent_yields_default_state() {
        let loaded = MigrationService::new().upgrade(None);
        assert_eq!(loaded.result, MigrationResult::Absent);
        assert_eq!(loaded.model, ConfigModel::default());
        assert_eq!(loaded.saved_at, None);
    }

    #[test]
    fn unknown_version_yields_default_state() {
        let loaded = MigrationService::new().upgrade(envelope(json!({
            "version": 9,
            "savedAt": 1_700_000_000_000_i64,
            "data": { "accounts": [{ "name": "x" }] }
        })));
        assert_eq!(loaded.result, MigrationResult::Unusable { version: Some(9) });
        assert_eq!(loaded.model, ConfigModel::default());
        assert_eq!(loaded.saved_at, None);
    }

    #[test]
    fn missing_data_yields_default_state() {
        let loaded = MigrationService::new().upgrade(envelope(json!({ "version": 3 })));
        assert_eq!(loaded.result, MigrationResult::Unusable { version: Some(3) });
        assert_eq!(loaded.model, ConfigModel::default());
    }

    #[test]
    fn v1_accounts_get_defaults() {
        let loaded = MigrationService::new().upgrade(envelope(json!({
            "version": 1,
            "savedAt": 1_700_000_000_000_i64,
            "data": {
                "accounts": [
                    { "api_user": 7, "provider": "anyrouter" },
                    { "name": "bare", "cookies": [] }
                ]
            }
        })));

        assert_eq!(loaded.result, MigrationResult::Migrated { from: 1 });
        assert_eq!(loaded.saved_at, DateTime::from_timestamp_millis(1_700_000_000_000));

        let accounts = &loaded.model.accounts;
        assert_eq!(accounts[0].api_user, "7");
        assert_eq!(accounts[0].provider, "anyrouter");
        assert_eq!(accounts[0].cookies, vec![Cookie::placeholder()]);
        assert_eq!(accounts[1].name, "bare");
        assert_eq!(accounts[1].cookies, vec![Cookie::placeholder()]);
        assert!(loaded.model.providers.is_empty());
    }

    #[test]
    fn v2_collapses_provider_array() {
        let model = MigrationService::new()
            .migrate(
                2,
                &json!({
                    "accounts": [
                        { "providers": ["first", "second"], "provider": "legacy" },
                        { "provider": "legacy" },
                        { "providers": [] },
                        {}
                    ],
                    "providers": [{ "key": "first", "domain": "https://first.example" }]
                }),
            )
            .unwrap();

        let refs: Vec<_> = model.accounts.iter().map(|a| a.provider.as_str()).collect();
        assert_eq!(refs, vec!["first", "legacy", "", ""]);
        assert_eq!(model.providers[0].domain, "https://first.example");
    }

    #[test]
    fn legacy_accounts_missing_use_default_account() {
        let model = MigrationService::new().migrate(2, &json!({})).unwrap();
        assert_eq!(model, ConfigModel::default());
    }

    #[test]
    fn current_version_keeps_cookie_invariant() {
        let model = MigrationService::new()
            .migrate(
                3,
                &json!({
                    "accounts": [{ "name": "a", "api_user": "1", "cookies": [], "provider": "" }],
                    "providers": []
                }),
            )
            .unwrap();
        assert_eq!(model.accounts[0].cookies, vec![Cookie::placeholder()]);
    }

    #[test]
    fn current_version_hand_edited_payload_reads_leniently() {
        let model = MigrationService::new()
            .migrate(
                3,
                &json!({
                    "accounts": [{ "name": 5, "cookies": [{ "key": "session", "value": 1 }] }],
                    "providers": [{ "key": "p", "waf_cookie_names": ["a", "b"] }]
                }),
            )
            .unwrap();
        assert_eq!(model.accounts[0].name, "5");
        assert_eq!(model.accounts[0].cookies[0].value, "1");
        assert_eq!(model.providers[0].waf_cookie_names, "a, b");
    }

    #[test]
    fn migration_is_idempotent() {
        let svc = MigrationService::new();
        let v1 = json!({
            "accounts": [{ "name": "n", "api_user": "u", "provider": "p",
                           "cookies": [{ "key": "session", "value": "abc" }] }],
            "providers": [{ "key": "p", "domain": "https://p.example", "waf_cookie_names": "a, b" }]
        });
        let v2 = json!({
            "accounts": [
                { "name": "n", "api_user": "u", "providers": ["p", "q"],
                  "cookies": [{ "key": "session", "value": "abc" }] },
                { "api_user": "w", "providers": [] }
            ],
            "providers": [{ "key": "p", "domain": "https://p.example" }, { "key": "q" }]
        });

        for (version, data) in [(1, v1), (2, v2)] {
            let once = svc.migrate(version, &data).unwrap();
            let stored = serde_json::to_value(PersistedDocument::new(once.clone(), None)).unwrap();
            let twice = svc.migrate(STORAGE_VERSION, &stored["data"]).unwrap();
            let thrice =
                svc.migrate(STORAGE_VERSION, &serde_json::to_value(&twice).unwrap()).unwrap();

            assert_eq!(once, twice, "v{version}");
            assert_eq!(twice, thrice, "v{version}");
        }
    }
}
