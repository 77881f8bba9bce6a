//! 货币格式化
//!
//! 组织的记账货币从后端加载一次，之后所有金额按 `"<前缀> 1,234.50"` 输出，
//! 前缀为货币符号或货币代码。

use azonation_shared::HttpMethod;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::log::{log_info, log_warn};
use crate::session::SessionStore;
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;

/// 组织货币设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyService {
    #[serde(default, rename = "currency_code")]
    pub code: String,
    #[serde(default, rename = "currency_symbol")]
    pub symbol: String,
}

impl CurrencyService {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
        }
    }

    /// 从 `data.currency` 加载；失败时返回空设置
    pub async fn load<C: HttpClient, S: KeyValueStore>(
        session: &SessionStore<C, S>,
        endpoint: &str,
    ) -> Self {
        let envelope = session.call_protected(endpoint, None, HttpMethod::Get).await;
        if !envelope.status {
            log_warn!(
                "[Currency] Load failed: {}",
                envelope.message.as_deref().unwrap_or("unknown error")
            );
            return Self::default();
        }

        let currency = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("currency"))
            .cloned()
            .and_then(|c| serde_json::from_value::<CurrencyService>(c).ok())
            .unwrap_or_default();
        log_info!("[Currency] Loaded '{}' ({})", currency.code, currency.symbol);
        currency
    }

    /// 格式化金额；`None` 视为 0
    pub fn format(&self, amount: Option<f64>, show_symbol: bool) -> String {
        let prefix = if show_symbol {
            self.symbol.trim()
        } else {
            self.code.trim()
        };
        format!("{} {}", prefix, group_thousands(amount.unwrap_or(0.0)))
            .trim()
            .to_string()
    }
}

/// 按会话缓存的货币设置
///
/// 以访问令牌区分会话：同一次登录内只请求一次，重新登录后重新加载。
/// 加载失败不缓存。
#[derive(Debug, Default)]
pub struct CurrencyCache {
    slot: Mutex<Option<(String, CurrencyService)>>,
}

impl CurrencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<C: HttpClient, S: KeyValueStore>(
        &self,
        session: &SessionStore<C, S>,
        endpoint: &str,
    ) -> CurrencyService {
        let Some(token) = session.token() else {
            return CurrencyService::default();
        };
        if let Some((owner, currency)) = self.slot.lock().as_ref() {
            if *owner == token {
                return currency.clone();
            }
        }

        let currency = CurrencyService::load(session, endpoint).await;
        if !currency.code.is_empty() || !currency.symbol.is_empty() {
            *self.slot.lock() = Some((token, currency.clone()));
        }
        currency
    }
}

/// 两位小数，整数部分每三位加逗号
pub fn group_thousands(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(*d));
    }

    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::session::{KEY_AUTH, KEY_USER};
    use crate::web::http::mock::MockHttpClient;
    use crate::web::storage::MemoryStorage;
    use serde_json::json;

    const CURRENCY_URL: &str = "http://localhost:8000/api/accounts-transaction-currencies";

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.999), "1,000.00");
        assert_eq!(group_thousands(1234.5), "1,234.50");
        assert_eq!(group_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(group_thousands(-1234.5), "-1,234.50");
        assert_eq!(group_thousands(-0.001), "0.00");
        assert_eq!(group_thousands(f64::NAN), "0.00");
    }

    #[test]
    fn test_format() {
        let currency = CurrencyService::new("BDT", " \u{09F3} ");
        assert_eq!(currency.format(Some(1500.0), true), "\u{09F3} 1,500.00");
        assert_eq!(currency.format(Some(1500.0), false), "BDT 1,500.00");
        assert_eq!(currency.format(None, false), "BDT 0.00");
        assert_eq!(CurrencyService::default().format(Some(12.0), true), "12.00");
    }

    #[tokio::test]
    async fn test_load() {
        let session = SessionStore::new(&AppConfig::default(), MockHttpClient::new(), MemoryStorage::new());
        session.api().http().mock_json(
            HttpMethod::Get,
            CURRENCY_URL,
            200,
            json!({"status": true, "data": {"currency": {"currency_code": "USD", "currency_symbol": "$"}}}),
        );

        let currency = CurrencyService::load(&session, "/api/accounts-transaction-currencies").await;
        assert_eq!(currency, CurrencyService::new("USD", "$"));
    }

    #[tokio::test]
    async fn test_load_failure_is_empty() {
        let session = SessionStore::new(&AppConfig::default(), MockHttpClient::new(), MemoryStorage::new());
        let currency = CurrencyService::load(&session, "/api/accounts-transaction-currencies").await;
        assert_eq!(currency, CurrencyService::default());
        assert_eq!(currency.format(Some(5.0), false), "5.00");
    }

    fn signed_in(token: &str) -> SessionStore<MockHttpClient, MemoryStorage> {
        let user = json!({"accessToken": token, "type": "organisation", "user_id": 7}).to_string();
        let session = SessionStore::new(
            &AppConfig::default(),
            MockHttpClient::new(),
            MemoryStorage::with_items([(KEY_AUTH, "1"), (KEY_USER, user.as_str())]),
        );
        session.api().http().mock_json(
            HttpMethod::Get,
            CURRENCY_URL,
            200,
            json!({"status": true, "data": {"currency": {"currency_code": "EUR", "currency_symbol": "\u{20AC}"}}}),
        );
        session
    }

    #[tokio::test]
    async fn test_cache_loads_once_per_session() {
        let cache = CurrencyCache::new();
        let session = signed_in("tok-a");
        for _ in 0..3 {
            let currency = cache.get_or_load(&session, "/api/accounts-transaction-currencies").await;
            assert_eq!(currency.code, "EUR");
        }
        assert_eq!(session.api().http().request_count(), 1);

        let next = signed_in("tok-b");
        cache.get_or_load(&next, "/api/accounts-transaction-currencies").await;
        assert_eq!(next.api().http().request_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_skips_failures_and_anonymous_sessions() {
        let cache = CurrencyCache::new();
        let anonymous = SessionStore::new(&AppConfig::default(), MockHttpClient::new(), MemoryStorage::new());
        assert_eq!(
            cache.get_or_load(&anonymous, "/api/accounts-transaction-currencies").await,
            CurrencyService::default()
        );
        assert_eq!(anonymous.api().http().request_count(), 0);

        let session = signed_in("tok-a");
        cache.get_or_load(&session, "/api/missing").await;
        cache.get_or_load(&session, "/api/missing").await;
        assert_eq!(session.api().http().request_count(), 2);
    }
}
