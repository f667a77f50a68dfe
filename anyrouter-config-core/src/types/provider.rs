//! Provider 相关类型定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Key seeded into a duplicated provider whose own key is blank.
pub const DEFAULT_PROVIDER_KEY: &str = "provider";

/// Provider identifiers the consuming system knows without configuration.
pub const BUILTIN_PROVIDER_KEYS: [&str; 2] = ["anyrouter", "agentrouter"];

/// Editable provider record
///
/// `waf_cookie_names` holds the comma-separated form the user types; it is split
/// into a list only when projecting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier (may be blank or duplicated while editing)
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub login_path: String,
    #[serde(default)]
    pub sign_in_path: String,
    #[serde(default)]
    pub user_info_path: String,
    #[serde(default)]
    pub api_user_key: String,
    #[serde(default)]
    pub bypass_method: String,
    #[serde(default)]
    pub waf_cookie_names: String,
}

impl Provider {
    /// Key with surrounding whitespace removed
    #[must_use]
    pub fn trimmed_key(&self) -> &str {
        self.key.trim()
    }

    pub fn field_mut(&mut self, field: ProviderField) -> &mut String {
        match field {
            ProviderField::Key => &mut self.key,
            ProviderField::Domain => &mut self.domain,
            ProviderField::LoginPath => &mut self.login_path,
            ProviderField::SignInPath => &mut self.sign_in_path,
            ProviderField::UserInfoPath => &mut self.user_info_path,
            ProviderField::ApiUserKey => &mut self.api_user_key,
            ProviderField::BypassMethod => &mut self.bypass_method,
            ProviderField::WafCookieNames => &mut self.waf_cookie_names,
        }
    }
}

/// Writable fields of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderField {
    Key,
    Domain,
    LoginPath,
    SignInPath,
    UserInfoPath,
    ApiUserKey,
    BypassMethod,
    WafCookieNames,
}

impl ProviderField {
    /// Every field, in export order
    pub const ALL: [Self; 8] = [
        Self::Key,
        Self::Domain,
        Self::LoginPath,
        Self::SignInPath,
        Self::UserInfoPath,
        Self::ApiUserKey,
        Self::BypassMethod,
        Self::WafCookieNames,
    ];

    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Domain => "domain",
            Self::LoginPath => "login_path",
            Self::SignInPath => "sign_in_path",
            Self::UserInfoPath => "user_info_path",
            Self::ApiUserKey => "api_user_key",
            Self::BypassMethod => "bypass_method",
            Self::WafCookieNames => "waf_cookie_names",
        }
    }
}

impl fmt::Display for ProviderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::ValidationError(format!("unknown provider field: {s}")))
    }
}
