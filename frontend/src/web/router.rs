//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程。

use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{
    AuthSnapshot, GuardDecision, HOME_PATH, LOGIN_ROUTE, NOT_FOUND_ROUTE, RouteMatch, RouteTable,
    View,
};
use crate::log::{log_info, log_warn};
use crate::routes;

/// 获取当前浏览器路径（含查询串）
fn current_path() -> String {
    web_sys::window()
        .map(|w| {
            let location = w.location();
            let path = location.pathname().unwrap_or_else(|_| "/".to_string());
            let search = location.search().unwrap_or_default();
            format!("{}{}", path, search)
        })
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由表解析；理论上兜底路由总会命中
fn resolve_or_not_found(table: &RouteTable, path: &str) -> RouteMatch {
    table.resolve(path).unwrap_or_else(|| RouteMatch {
        name: NOT_FOUND_ROUTE,
        view: View::NotFound,
        pattern: "/:pathMatch(.*)*".to_string(),
        path: path.to_string(),
        params: Default::default(),
        meta: Default::default(),
        chain: vec![NOT_FOUND_ROUTE],
    })
}

/// 一次导航的最终落点
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub decision: GuardDecision,
    pub target: RouteMatch,
    /// 写入 History 的 URL
    pub url: String,
}

/// 对目标路径执行守卫并得到最终落点（不触碰浏览器）
pub fn plan_navigation(table: &RouteTable, path: &str, auth: &AuthSnapshot) -> Navigation {
    let requested = resolve_or_not_found(table, path);
    let decision = requested.guard(auth);

    match decision {
        GuardDecision::Allowed => Navigation {
            decision,
            target: requested,
            url: path.to_string(),
        },
        GuardDecision::RedirectLogin => {
            let url = table
                .path_for(LOGIN_ROUTE, &[])
                .unwrap_or_else(|| HOME_PATH.to_string());
            Navigation {
                decision,
                target: resolve_or_not_found(table, &url),
                url,
            }
        }
        GuardDecision::RedirectHome => Navigation {
            decision,
            target: resolve_or_not_found(table, HOME_PATH),
            url: HOME_PATH.to_string(),
        },
    }
}

// ============================================================================
// 顶部进度条
// ============================================================================

/// 顶部进度条状态
///
/// 每次导航开始时 start，结束后延迟 finish，与守卫结果无关。
#[derive(Clone, Copy)]
pub struct TopLoader {
    active: RwSignal<bool>,
    finish_delay: Duration,
}

impl TopLoader {
    pub fn new(finish_delay: Duration) -> Self {
        Self {
            active: RwSignal::new(false),
            finish_delay,
        }
    }

    pub fn active(&self) -> Signal<bool> {
        self.active.into()
    }

    pub fn start(&self) {
        self.active.set(true);
    }

    pub fn finish(&self) {
        let active = self.active;
        set_timeout(move || active.set(false), self.finish_delay);
    }
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证快照信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<RouteMatch>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<RouteMatch>,
    /// 认证快照（注入的信号，实现解耦）
    auth: Signal<AuthSnapshot>,
    loader: TopLoader,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `auth` - 认证快照信号，由外部注入实现解耦
    /// * `loader` - 顶部进度条
    fn new(auth: Signal<AuthSnapshot>, loader: TopLoader) -> Self {
        let initial = resolve_or_not_found(routes::table(), &current_path());
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            auth,
            loader,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<RouteMatch> {
        self.current_route
    }

    pub fn loader(&self) -> TopLoader {
        self.loader
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(path, true);
    }

    /// 按路由名导航；未知路由名或缺少参数时忽略
    pub fn navigate_named(&self, name: &str, params: &[(&str, &str)]) {
        match routes::table().path_for(name, params) {
            Some(path) => self.navigate(&path),
            None => log_warn!("[Router] Cannot build path for route '{}'", name),
        }
    }

    /// 导航到指定路径
    ///
    /// # Arguments
    /// * `path` - 目标路径
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to(&self, path: &str, use_push: bool) {
        self.loader.start();

        let plan = plan_navigation(routes::table(), path, &self.auth.get_untracked());
        match plan.decision {
            GuardDecision::Allowed => {}
            GuardDecision::RedirectLogin => {
                log_info!("[Router] Access Denied for {}. Redirecting to Login.", path)
            }
            GuardDecision::RedirectHome => {
                log_info!("[Router] Role mismatch for {}. Redirecting to Home.", path)
            }
        }

        if use_push {
            push_history_state(&plan.url);
        } else {
            replace_history_state(&plan.url);
        }
        self.set_route.set(plan.target);

        self.loader.finish();
    }

    /// 初始加载时对当前 URL 执行一次守卫
    fn guard_initial(&self) {
        let path = current_path();
        self.navigate_to(&path, false);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑，重定向用 replace 避免污染历史
            router.navigate_to(&current_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时重新评估当前路由
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let auth = router.auth.get();
            let route = router.current_route.get_untracked();

            if route.guard(&auth) != GuardDecision::Allowed {
                log_info!(
                    "[Router] Auth state changed, {} no longer accessible.",
                    route
                );
                router.navigate_to(&route.path, true);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth: Signal<AuthSnapshot>, finish_delay: Duration) -> RouterService {
    let router = RouterService::new(auth, TopLoader::new(finish_delay));

    // 初始化监听器
    router.guard_initial();
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证快照信号
    auth: Signal<AuthSnapshot>,
    /// 导航结束后进度条的收起延迟
    finish_delay: Duration,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(auth, finish_delay);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(RouteMatch) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击并走路由服务
#[component]
pub fn Link(
    /// 目标路由名
    to: &'static str,
    /// 路径参数
    #[prop(optional)]
    params: Vec<(&'static str, String)>,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let href = routes::table()
        .path_for(to, &pairs)
        .unwrap_or_else(|| HOME_PATH.to_string());

    let target = href.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azonation_shared::UserType;

    fn org_session() -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: true,
            role: Some(UserType::Organisation),
        }
    }

    #[test]
    fn test_anonymous_user_is_sent_to_login() {
        let plan = plan_navigation(
            routes::table(),
            "/org-dashboard/committees",
            &AuthSnapshot::default(),
        );
        assert_eq!(plan.decision, GuardDecision::RedirectLogin);
        assert_eq!(plan.target.name, LOGIN_ROUTE);
        assert_eq!(plan.url, "/");
    }

    #[test]
    fn test_wrong_role_is_sent_home() {
        let individual = AuthSnapshot {
            is_authenticated: true,
            role: Some(UserType::Individual),
        };
        let plan = plan_navigation(routes::table(), "/org-dashboard/committees", &individual);
        assert_eq!(plan.decision, GuardDecision::RedirectHome);
        assert_eq!(plan.url, HOME_PATH);
        assert_ne!(plan.target.name, "committees");
    }

    #[test]
    fn test_matching_role_keeps_query() {
        let plan = plan_navigation(
            routes::table(),
            "/org-dashboard/asset/view/3?print=1",
            &org_session(),
        );
        assert_eq!(plan.decision, GuardDecision::Allowed);
        assert_eq!(plan.target.name, "view-asset");
        assert_eq!(plan.url, "/org-dashboard/asset/view/3?print=1");
    }

    #[test]
    fn test_public_pages_need_no_session() {
        for path in ["/", "/signup", "/oauth/complete", "/pricing", "/nowhere"] {
            let plan = plan_navigation(routes::table(), path, &AuthSnapshot::default());
            assert_eq!(plan.decision, GuardDecision::Allowed, "{path}");
        }
    }
}
