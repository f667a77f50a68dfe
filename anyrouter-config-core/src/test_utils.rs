//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::services::{ProjectionService, ServiceContext};
use crate::traits::DocumentStore;
use crate::types::{Account, Cookie, Provider, BUILTIN_PROVIDER_KEYS};

// ===== MockDocumentStore =====

pub struct MockDocumentStore {
    entries: RwLock<HashMap<String, String>>,
    /// 如果 Some，write 时返回此错误（模拟配额超限或存储被禁用）
    write_error: RwLock<Option<String>>,
    /// 如果 Some，read 时返回此错误
    read_error: RwLock<Option<String>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            write_error: RwLock::new(None),
            read_error: RwLock::new(None),
        }
    }

    pub fn set_write_error(&self, err: Option<String>) {
        *self.write_error.write().unwrap() = err;
    }

    pub fn set_read_error(&self, err: Option<String>) {
        *self.read_error.write().unwrap() = err;
    }
}

impl DocumentStore for MockDocumentStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        if let Some(ref msg) = *self.read_error.read().unwrap() {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.write_error.read().unwrap() {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`（默认存储键与内置 provider）
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockDocumentStore>) {
    let store = Arc::new(MockDocumentStore::new());
    let ctx = Arc::new(ServiceContext::new(store.clone()));
    (ctx, store)
}

/// Projection service with the stock built-in provider identifiers
pub fn builtin_projection() -> ProjectionService {
    ProjectionService::new(BUILTIN_PROVIDER_KEYS.iter().map(ToString::to_string).collect())
}

/// 创建带指定 cookie 的账户
pub fn account_with_cookies(cookies: &[(&str, &str)]) -> Account {
    Account {
        cookies: cookies.iter().map(|(k, v)| Cookie::new(*k, *v)).collect(),
        ..Account::default()
    }
}

pub fn provider(key: &str, domain: &str) -> Provider {
    Provider {
        key: key.to_string(),
        domain: domain.to_string(),
        ..Provider::default()
    }
}
