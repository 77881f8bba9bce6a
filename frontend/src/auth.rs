//! 认证模块
//!
//! 把会话存储包装成 Leptos 上下文，与路由系统解耦。
//! 路由服务通过注入的快照信号来检查认证状态。

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::currency::CurrencyCache;
use crate::session::{LoginOutcome, Session, SessionStore};
use crate::web::http::FetchClient;
use crate::web::route::AuthSnapshot;
use crate::web::storage::BrowserStorage;

/// 浏览器环境下的会话存储
pub type AppSession = SessionStore<FetchClient, BrowserStorage>;

/// 认证上下文
///
/// 包含会话快照信号和会话存储本身，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub state: ReadSignal<Session>,
    set_state: WriteSignal<Session>,
    store: StoredValue<Arc<AppSession>>,
    config: StoredValue<AppConfig>,
    currency: StoredValue<Arc<CurrencyCache>>,
}

impl AuthContext {
    /// 按配置创建会话存储并从浏览器存储恢复状态
    pub fn new(config: AppConfig) -> Self {
        let storage = BrowserStorage::for_scope(config.storage_scope, config.cookie_days);
        let store = SessionStore::new(&config, FetchClient, storage);
        let (state, set_state) = signal(store.session());

        Self {
            state,
            set_state,
            store: StoredValue::new(Arc::new(store)),
            config: StoredValue::new(config),
            currency: StoredValue::new(Arc::new(CurrencyCache::new())),
        }
    }

    pub fn store(&self) -> Arc<AppSession> {
        self.store.get_value()
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// 本次会话的货币设置缓存
    pub fn currency(&self) -> Arc<CurrencyCache> {
        self.currency.get_value()
    }

    /// 把会话存储的最新状态同步到信号
    pub fn sync(&self) {
        self.set_state.set(self.store.with_value(|s| s.session()));
    }

    /// 认证快照信号（用于路由服务注入）
    pub fn snapshot_signal(&self) -> Signal<AuthSnapshot> {
        let state = self.state;
        Signal::derive(move || state.with(Session::snapshot))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并同步状态
///
/// 导航由调用方根据返回的落地路由名完成。
pub async fn login(ctx: &AuthContext, email: String, password: String, remember: bool) -> LoginOutcome {
    let store = ctx.store();
    let outcome = store.authenticate(&email, &password, remember).await;
    ctx.sync();
    outcome
}

/// 询问确认后注销
///
/// 返回登录路由名；用户取消时返回 None。
pub async fn logout(ctx: &AuthContext) -> Option<&'static str> {
    let confirmed = web_sys::window()
        .and_then(|w| w.confirm_with_message("Are you sure? You will be logged out.").ok())
        .unwrap_or(false);

    let store = ctx.store();
    let landing = store.logout(confirmed).await;
    ctx.sync();
    landing
}
