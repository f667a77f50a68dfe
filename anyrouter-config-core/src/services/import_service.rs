//! 导入服务
//!
//! Parses pasted export text back into edit-model records. Both entry points are
//! all-or-nothing: they either return the complete replacement list or an
//! `ImportError`, so the caller never has to undo a partial import.

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::types::{Account, Cookie, Provider};
use crate::utils::text::{join_list, stringify, text_or_blank};

/// 导入解析服务（无状态）
pub struct ImportService;

impl ImportService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses an exported account array.
    ///
    /// # Errors
    /// `ImportError` when the text is not valid JSON, the root is not an array,
    /// or any element is not an object.
    pub fn parse_accounts(&self, raw: &str) -> CoreResult<Vec<Account>> {
        let Value::Array(items) = parse_json(raw)? else {
            return Err(CoreError::ImportError(
                "accounts must be a JSON array".to_string(),
            ));
        };

        let accounts = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().map(read_account).ok_or_else(|| {
                    CoreError::ImportError(format!("account #{i} is not a JSON object"))
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        log::debug!("Parsed {} accounts from import text", accounts.len());
        Ok(accounts)
    }

    /// Parses an exported provider map (`key -> fields`).
    ///
    /// # Errors
    /// `ImportError` when the text is not valid JSON or the root is not an object.
    pub fn parse_providers(&self, raw: &str) -> CoreResult<Vec<Provider>> {
        let Value::Object(entries) = parse_json(raw)? else {
            return Err(CoreError::ImportError(
                "providers must be a JSON object".to_string(),
            ));
        };

        let providers: Vec<Provider> = entries
            .iter()
            .map(|(key, fields)| read_provider(key, fields))
            .collect();

        log::debug!("Parsed {} providers from import text", providers.len());
        Ok(providers)
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_json(raw: &str) -> CoreResult<Value> {
    serde_json::from_str(raw).map_err(|e| CoreError::ImportError(format!("invalid JSON: {e}")))
}

fn read_account(fields: &Map<String, Value>) -> Account {
    let mut account = Account {
        name: text_or_blank(fields.get("name")),
        api_user: text_or_blank(fields.get("api_user")),
        cookies: match fields.get("cookies") {
            Some(Value::Object(cookies)) => cookies
                .iter()
                .map(|(key, value)| Cookie::new(key.clone(), stringify(Some(value))))
                .collect(),
            _ => Vec::new(),
        },
        provider: text_or_blank(fields.get("provider")),
    };
    account.ensure_cookie();
    account
}

fn read_provider(key: &str, fields: &Value) -> Provider {
    let text = |name: &str| text_or_blank(fields.get(name));

    Provider {
        key: key.to_string(),
        domain: text("domain"),
        login_path: text("login_path"),
        sign_in_path: text("sign_in_path"),
        user_info_path: text("user_info_path"),
        api_user_key: text("api_user_key"),
        bypass_method: text("bypass_method"),
        waf_cookie_names: match fields.get("waf_cookie_names") {
            Some(Value::Array(names)) => join_list(names),
            _ => String::new(),
        },
    }
}
