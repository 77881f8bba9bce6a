//! 运行时配置
//!
//! 默认值可在构建时通过环境变量覆盖（`option_env!`），例如：
//! `AZONATION_API_BASE=https://azonation.com/backend trunk build --release`

use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_COOKIE_DAYS: u32 = 7;
const DEFAULT_BRAND: &str = "Azonation";

const LOGIN_ENDPOINT: &str = "/api/login";
const LOGOUT_ENDPOINT: &str = "/api/logout";
const LOGO_ENDPOINT: &str = "/api/org-profile/logo";
const CURRENCY_ENDPOINT: &str = "/api/accounts-transaction-currencies";

const LOGO_TIMEOUT: Duration = Duration::from_millis(8000);
const LOADER_FINISH_DELAY: Duration = Duration::from_millis(250);

/// 会话持久化的作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// 跨标签页持久 (localStorage)
    Local,
    /// 仅当前标签页 (sessionStorage)
    Session,
    /// document.cookie
    Cookie,
}

impl StorageScope {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "session" => Some(Self::Session),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub storage_scope: StorageScope,
    pub cookie_days: u32,
    pub brand: String,
    pub login_endpoint: String,
    pub logout_endpoint: String,
    pub logo_endpoint: String,
    pub currency_endpoint: String,
    pub logo_timeout: Duration,
    pub loader_finish_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_scope: StorageScope::Local,
            cookie_days: DEFAULT_COOKIE_DAYS,
            brand: DEFAULT_BRAND.to_string(),
            login_endpoint: LOGIN_ENDPOINT.to_string(),
            logout_endpoint: LOGOUT_ENDPOINT.to_string(),
            logo_endpoint: LOGO_ENDPOINT.to_string(),
            currency_endpoint: CURRENCY_ENDPOINT.to_string(),
            logo_timeout: LOGO_TIMEOUT,
            loader_finish_delay: LOADER_FINISH_DELAY,
        }
    }
}

impl AppConfig {
    /// 读取构建时变量，读不到就用默认值
    pub fn from_env() -> Self {
        Self::from_vars(
            option_env!("AZONATION_API_BASE"),
            option_env!("AZONATION_STORAGE_SCOPE"),
            option_env!("AZONATION_COOKIE_DAYS"),
            option_env!("AZONATION_BRAND"),
        )
    }

    fn from_vars(
        api_base: Option<&str>,
        scope: Option<&str>,
        cookie_days: Option<&str>,
        brand: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_base: api_base
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.api_base),
            storage_scope: scope
                .and_then(StorageScope::parse)
                .unwrap_or(defaults.storage_scope),
            cookie_days: cookie_days
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.cookie_days),
            brand: brand
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.brand),
            ..defaults
        }
    }
}
