//! 账户相关类型定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Cookie name used for the placeholder entry of an otherwise empty cookie list.
pub const PLACEHOLDER_COOKIE_KEY: &str = "session";

/// One editable cookie entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (may be blank while editing)
    #[serde(default)]
    pub key: String,
    /// Cookie value
    #[serde(default)]
    pub value: String,
}

impl Cookie {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The `{key: "session", value: ""}` entry that stands in for an empty list.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_COOKIE_KEY, "")
    }
}

fn placeholder_cookies() -> Vec<Cookie> {
    vec![Cookie::placeholder()]
}

/// Editable account record
///
/// `cookies` is never empty once a record leaves a mutation or a load path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Optional display label
    #[serde(default)]
    pub name: String,
    /// API user identifier
    #[serde(default)]
    pub api_user: String,
    /// Ordered cookie entries
    #[serde(default = "placeholder_cookies")]
    pub cookies: Vec<Cookie>,
    /// Referenced provider key (blank = unset)
    #[serde(default)]
    pub provider: String,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            name: String::new(),
            api_user: String::new(),
            cookies: placeholder_cookies(),
            provider: String::new(),
        }
    }
}

impl Account {
    /// Restores the single placeholder cookie if the list is empty.
    ///
    /// Returns `true` when the placeholder had to be inserted.
    pub fn ensure_cookie(&mut self) -> bool {
        if self.cookies.is_empty() {
            self.cookies.push(Cookie::placeholder());
            true
        } else {
            false
        }
    }

    /// Mutable access to a scalar field
    pub fn field_mut(&mut self, field: AccountField) -> &mut String {
        match field {
            AccountField::Name => &mut self.name,
            AccountField::ApiUser => &mut self.api_user,
        }
    }
}

/// Writable scalar fields of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Name,
    ApiUser,
}

impl AccountField {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ApiUser => "api_user",
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "api_user" => Ok(Self::ApiUser),
            other => Err(CoreError::ValidationError(format!(
                "unknown account field: {other}"
            ))),
        }
    }
}

/// Writable fields of a cookie entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieField {
    Key,
    Value,
}

impl CookieField {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for CookieField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(Self::Key),
            "value" => Ok(Self::Value),
            other => Err(CoreError::ValidationError(format!(
                "unknown cookie field: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_has_placeholder_cookie() {
        let account = Account::default();
        assert_eq!(account.cookies, vec![Cookie::new("session", "")]);
        assert!(account.provider.is_empty());
    }

    #[test]
    fn missing_cookies_deserialize_to_placeholder() {
        let account: Account = serde_json::from_str(r#"{"api_user":"42"}"#).unwrap();
        assert_eq!(account.api_user, "42");
        assert_eq!(account.cookies, vec![Cookie::placeholder()]);
    }

    #[test]
    fn ensure_cookie_only_fills_empty_list() {
        let mut account = Account::default();
        assert!(!account.ensure_cookie());

        account.cookies.clear();
        assert!(account.ensure_cookie());
        assert_eq!(account.cookies.len(), 1);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("api_user".parse::<AccountField>().unwrap(), AccountField::ApiUser);
        assert_eq!("value".parse::<CookieField>().unwrap(), CookieField::Value);
        assert!("cookies".parse::<AccountField>().is_err());
    }
}
