//! 持久化存储封装模块
//!
//! 使用 `web_sys::Storage` / `document.cookie` 提供简洁的键值存储接口。
//! 逻辑层只依赖 `KeyValueStore`，测试使用 `MemoryStorage`。

use std::collections::HashMap;

use parking_lot::Mutex;
use wasm_bindgen::JsCast;

use crate::config::StorageScope;

/// 键值存储接口
pub trait KeyValueStore {
    /// 获取存储的字符串值，键不存在或发生错误时返回 None
    fn get(&self, key: &str) -> Option<String>;
    /// 设置存储值，返回是否成功
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除存储的键值对，返回是否成功
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage（跨标签页持久）
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 浏览器 SessionStorage（仅当前标签页）
pub struct SessionStorage;

impl SessionStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok()?
    }
}

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 基于 `document.cookie` 的存储，`days` 为过期天数
pub struct CookieStorage {
    pub days: u32,
}

impl CookieStorage {
    fn document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into().ok()
    }

    fn expires(days: u32) -> String {
        let ms = js_sys::Date::now() + f64::from(days) * 24.0 * 60.0 * 60.0 * 1000.0;
        let date = js_sys::Date::new(&ms.into());
        String::from(date.to_utc_string())
    }
}

/// 在 `a=1; b=2` 形式的 cookie 串中查找 `name`，返回未解码的值
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .map(str::trim_start)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
}

impl KeyValueStore for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        let cookies = Self::document()?.cookie().ok()?;
        let raw = find_cookie(&cookies, key)?;
        js_sys::decode_uri_component(raw).ok().map(String::from)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let Some(doc) = Self::document() else {
            return false;
        };
        let encoded = String::from(js_sys::encode_uri_component(value));
        let mut cookie = format!("{}={}", key, encoded);
        if self.days > 0 {
            cookie.push_str("; expires=");
            cookie.push_str(&Self::expires(self.days));
        }
        cookie.push_str("; path=/");
        doc.set_cookie(&cookie).is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        Self::document()
            .and_then(|doc| {
                doc.set_cookie(&format!(
                    "{}=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/",
                    key
                ))
                .ok()
            })
            .is_some()
    }
}

/// 内存存储，非浏览器环境与测试使用
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        for (k, v) in items {
            storage.set(k, v);
        }
        storage
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items.lock().insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.items.lock().remove(key);
        true
    }
}

/// 按配置选择的浏览器存储
pub enum BrowserStorage {
    Local(LocalStorage),
    Session(SessionStorage),
    Cookie(CookieStorage),
}

impl BrowserStorage {
    pub fn for_scope(scope: StorageScope, cookie_days: u32) -> Self {
        match scope {
            StorageScope::Local => Self::Local(LocalStorage),
            StorageScope::Session => Self::Session(SessionStorage),
            StorageScope::Cookie => Self::Cookie(CookieStorage { days: cookie_days }),
        }
    }

    fn inner(&self) -> &dyn KeyValueStore {
        match self {
            Self::Local(s) => s,
            Self::Session(s) => s,
            Self::Cookie(s) => s,
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner().get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.inner().set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        self.inner().delete(key)
    }
}
