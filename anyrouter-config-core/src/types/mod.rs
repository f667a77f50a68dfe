//! 类型定义模块

mod account;
mod command;
mod document;
mod export;
mod provider;

pub use account::{Account, AccountField, Cookie, CookieField, PLACEHOLDER_COOKIE_KEY};
pub use command::{ConfigCommand, Focus, ModelDelta};
pub use document::{CacheStatus, PersistedDocument, StoredEnvelope, STORAGE_KEY, STORAGE_VERSION};
pub use export::{AccountExport, ExportMap, ProviderExport, ProviderExportMap};
pub use provider::{Provider, ProviderField, BUILTIN_PROVIDER_KEYS, DEFAULT_PROVIDER_KEY};
