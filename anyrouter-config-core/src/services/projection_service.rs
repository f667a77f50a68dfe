//! 导出投影服务
//!
//! Recomputes the two externally visible forms of the model from scratch on every
//! call. Nothing is cached, so integrity side effects are always reflected.

use crate::error::CoreResult;
use crate::model::ConfigModel;
use crate::types::{Account, AccountExport, ExportMap, Provider, ProviderExport, ProviderExportMap};
use crate::utils::text::split_list;

/// Export projection service
pub struct ProjectionService {
    builtin_providers: Vec<String>,
}

impl ProjectionService {
    #[must_use]
    pub fn new(builtin_providers: Vec<String>) -> Self {
        Self { builtin_providers }
    }

    /// Account export records, one per account in model order.
    pub fn project_accounts(&self, model: &ConfigModel) -> Vec<AccountExport> {
        model.accounts.iter().map(project_account).collect()
    }

    /// Provider export map keyed by trimmed key; later duplicates overwrite earlier ones.
    pub fn project_providers(&self, model: &ConfigModel) -> ProviderExportMap {
        model
            .providers
            .iter()
            .filter(|provider| !provider.trimmed_key().is_empty())
            .map(|provider| (provider.trimmed_key().to_string(), project_provider(provider)))
            .collect()
    }

    /// Pretty-printed account export array.
    pub fn accounts_json(&self, model: &ConfigModel) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.project_accounts(model))?)
    }

    /// Pretty-printed provider export map, or an empty string when no provider has a key.
    pub fn providers_json(&self, model: &ConfigModel) -> CoreResult<String> {
        let providers = self.project_providers(model);
        if providers.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_json::to_string_pretty(&providers)?)
    }

    /// Built-in identifiers followed by custom keys, de-duplicated, first occurrence wins.
    pub fn provider_key_options(&self, model: &ConfigModel) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        let candidates = self
            .builtin_providers
            .iter()
            .map(String::as_str)
            .chain(model.provider_keys());
        for key in candidates {
            if !options.iter().any(|existing| existing == key) {
                options.push(key.to_string());
            }
        }
        options
    }

    /// Options for one account's provider picker.
    ///
    /// A reference to a provider that no longer exists stays selectable so the
    /// picker can still show the account's current value.
    pub fn provider_options_for(&self, model: &ConfigModel, account_index: usize) -> Vec<String> {
        let mut options = self.provider_key_options(model);
        if let Some(account) = model.accounts.get(account_index) {
            let current = account.provider.as_str();
            if !current.is_empty() && !options.iter().any(|key| key == current) {
                options.push(current.to_string());
            }
        }
        options
    }
}

fn project_account(account: &Account) -> AccountExport {
    let cookies: ExportMap<String> = account
        .cookies
        .iter()
        .filter(|cookie| !cookie.key.trim().is_empty())
        .map(|cookie| (cookie.key.trim().to_string(), cookie.value.clone()))
        .collect();

    AccountExport {
        cookies,
        api_user: account.api_user.clone(),
        name: non_blank(&account.name),
        provider: non_blank(&account.provider),
    }
}

fn project_provider(provider: &Provider) -> ProviderExport {
    let waf_cookie_names = split_list(&provider.waf_cookie_names);

    ProviderExport {
        domain: non_blank(&provider.domain),
        login_path: non_blank(&provider.login_path),
        sign_in_path: non_blank(&provider.sign_in_path),
        user_info_path: non_blank(&provider.user_info_path),
        api_user_key: non_blank(&provider.api_user_key),
        bypass_method: non_blank(&provider.bypass_method),
        waf_cookie_names: (!waf_cookie_names.is_empty()).then_some(waf_cookie_names),
    }
}

/// The stored value as-is, or `None` when it is blank after trimming.
fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ImportService;
    use crate::test_utils::{account_with_cookies, builtin_projection, provider};
    use crate::types::Cookie;
    use serde_json::json;

    #[test]
    fn cookie_key_collision_last_wins() {
        let model = ConfigModel::new(
            vec![account_with_cookies(&[("session", "a"), ("session", "b")])],
            vec![],
        );
        let projected = builtin_projection().project_accounts(&model);
        assert_eq!(serde_json::to_value(&projected[0].cookies).unwrap(), json!({ "session": "b" }));
    }

    #[test]
    fn accounts_omit_blank_optionals() {
        let mut account = account_with_cookies(&[("  ", "dropped"), (" session ", "v")]);
        account.name = "   ".to_string();
        account.provider = "anyrouter".to_string();
        let model = ConfigModel::new(vec![account], vec![]);

        let value = serde_json::to_value(builtin_projection().project_accounts(&model)).unwrap();
        assert_eq!(
            value,
            json!([{ "cookies": { "session": "v" }, "api_user": "", "provider": "anyrouter" }])
        );
    }

    #[test]
    fn padded_values_are_exported_unchanged() {
        let mut account = account_with_cookies(&[("session", "v")]);
        account.name = " main ".to_string();
        account.provider = " acme".to_string();
        let mut p = provider(" acme ", " https://acme.example ");
        p.login_path = "/login ".to_string();
        let model = ConfigModel::new(vec![account], vec![p]);
        let svc = builtin_projection();

        let accounts = serde_json::to_value(svc.project_accounts(&model)).unwrap();
        assert_eq!(accounts[0]["name"], " main ");
        assert_eq!(accounts[0]["provider"], " acme");

        let providers = serde_json::to_value(svc.project_providers(&model)).unwrap();
        assert_eq!(
            providers,
            json!({ "acme": { "domain": " https://acme.example ", "login_path": "/login " } })
        );
    }

    #[test]
    fn providers_skip_blank_keys_and_merge_duplicates() {
        let model = ConfigModel::new(
            vec![Account::default()],
            vec![
                provider("acme", "https://old.example"),
                provider("  ", "https://ignored.example"),
                provider("zeta", ""),
                provider(" acme ", "https://new.example"),
            ],
        );

        let map = builtin_projection().project_providers(&model);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["acme", "zeta"]);
        assert_eq!(map.get("acme").unwrap().domain.as_deref(), Some("https://new.example"));
        assert_eq!(map.get("zeta").unwrap(), &ProviderExport::default());
    }

    #[test]
    fn waf_cookie_names_split_on_export() {
        let mut p = provider("acme", "");
        p.waf_cookie_names = " acw_tc, ,cdn_sec_tc ".to_string();
        let mut empty = provider("bare", "");
        empty.waf_cookie_names = " , ".to_string();
        let model = ConfigModel::new(vec![], vec![p, empty]);

        let value = serde_json::to_value(builtin_projection().project_providers(&model)).unwrap();
        assert_eq!(
            value,
            json!({ "acme": { "waf_cookie_names": ["acw_tc", "cdn_sec_tc"] }, "bare": {} })
        );
    }

    #[test]
    fn providers_json_is_blank_without_providers() {
        let svc = builtin_projection();
        let model = ConfigModel::default();
        assert_eq!(svc.providers_json(&model).unwrap(), "");
        assert!(svc.accounts_json(&model).unwrap().starts_with("[\n  {"));
    }

    #[test]
    fn provider_options_union_is_order_preserving() {
        let model = ConfigModel::new(
            vec![Account::default()],
            vec![
                provider("custom", ""),
                provider("anyrouter", ""),
                provider(" ", ""),
                provider("custom", ""),
            ],
        );
        assert_eq!(
            builtin_projection().provider_key_options(&model),
            vec!["anyrouter", "agentrouter", "custom"]
        );
    }

    #[test]
    fn dangling_reference_stays_selectable() {
        let mut account = Account::default();
        account.provider = "gone".to_string();
        let model = ConfigModel::new(vec![account, Account::default()], vec![]);
        let svc = builtin_projection();

        assert_eq!(svc.provider_options_for(&model, 0), vec!["anyrouter", "agentrouter", "gone"]);
        assert_eq!(svc.provider_options_for(&model, 1), vec!["anyrouter", "agentrouter"]);
        assert_eq!(svc.provider_options_for(&model, 9), vec!["anyrouter", "agentrouter"]);
    }

    #[test]
    fn provider_export_survives_import() {
        let mut p = provider("acme", "https://acme.example");
        p.login_path = "/login".to_string();
        p.waf_cookie_names = "acw_tc,  cdn_sec_tc".to_string();
        let model = ConfigModel::new(vec![Account::default()], vec![p, provider("zeta", "")]);
        let svc = builtin_projection();

        let exported = svc.project_providers(&model);
        let text = serde_json::to_string(&exported).unwrap();
        let reimported = ConfigModel::new(
            vec![Account::default()],
            ImportService::new().parse_providers(&text).unwrap(),
        );

        assert_eq!(svc.project_providers(&reimported), exported);
    }

    #[test]
    fn cookie_values_are_not_trimmed() {
        let account = account_with_cookies(&[("session", " padded ")]);
        let model = ConfigModel::new(vec![account], vec![]);
        let projected = builtin_projection().project_accounts(&model);
        assert_eq!(projected[0].cookies.get("session").map(String::as_str), Some(" padded "));
        assert_eq!(model.accounts[0].cookies, vec![Cookie::new("session", " padded ")]);
    }
}
