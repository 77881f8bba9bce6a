//! Azonation 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `routes`: 全站路由表
//! - `session` / `auth`: 会话存储及其 Leptos 上下文
//! - `export` / `currency`: 导出与货币格式化工具
//! - `components`: UI 组件层

mod log;

pub mod api;
pub mod auth;
pub mod config;
pub mod currency;
pub mod error;
pub mod export;
pub mod routes;
pub mod session;

pub mod components {
    pub mod common;
    pub mod dashboard;
    pub mod export;
    pub mod login;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub mod web {
    pub mod download;
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod timer;
}

use leptos::prelude::*;

use crate::auth::AuthContext;
use crate::components::common::{NotFoundPage, TopProgressBar};
use crate::components::dashboard::{DashboardPage, SectionPage};
use crate::components::login::LoginPage;
use crate::config::AppConfig;
use crate::web::route::{RouteMatch, View};
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 工作台子页面渲染在对应角色的工作台外壳中。
fn route_matcher(route: RouteMatch) -> AnyView {
    match route.view {
        View::Login => view! { <LoginPage /> }.into_any(),
        View::NotFound => view! { <NotFoundPage /> }.into_any(),
        View::Dashboard(role) => view! { <DashboardPage role=role route=route /> }.into_any(),
        View::Page(_) => match route.meta.user_type {
            Some(role) if route.chain.len() > 1 => {
                view! { <DashboardPage role=role route=route /> }.into_any()
            }
            _ => view! { <SectionPage route=route /> }.into_any(),
        },
        View::Signup
        | View::VerifyCode
        | View::ForgotPassword
        | View::ResetPassword
        | View::OauthComplete
        | View::OauthSignedIn => view! { <SectionPage route=route /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取配置并从浏览器存储恢复会话
    let config = AppConfig::from_env();
    let finish_delay = config.loader_finish_delay;
    let auth_ctx = AuthContext::new(config);
    provide_context(auth_ctx);

    // 2. 认证快照信号注入路由服务
    let auth = auth_ctx.snapshot_signal();

    view! {
        <Router auth=auth finish_delay=finish_delay>
            <TopProgressBar />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
