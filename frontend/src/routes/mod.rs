//! 应用路由表
//!
//! 由四组路由按顺序合并：超级管理员、个人、组织、公共页面。
//! 公共页面组的最后一条是兜底的 `not-found`。

mod individual;
mod org;
mod superadmin;

use std::sync::LazyLock;

use crate::web::route::{RouteDef, RouteMeta, RouteTable, View};

pub use individual::INDIVIDUAL_ROUTES;
pub use org::ORG_ROUTES;
pub use superadmin::SUPERADMIN_ROUTES;

/// 登录、注册、OAuth 回调与公共信息页
pub const BASE_ROUTES: &[RouteDef] = &[
    RouteDef::view("/", "login", View::Login),
    RouteDef::view("/signup", "signup", View::Signup),
    RouteDef::view("/verify-code", "verify-code", View::VerifyCode),
    RouteDef::view("/forgot-password", "forgot-password", View::ForgotPassword),
    RouteDef::view("/reset-password", "reset-password", View::ResetPassword),
    RouteDef::view("/oauth/complete", "oauth-complete", View::OauthComplete)
        .with_meta(RouteMeta::PUBLIC),
    RouteDef::view("/oauth/signed-in", "oauth-signed-in", View::OauthSignedIn)
        .with_meta(RouteMeta::PUBLIC),
    RouteDef::view("/individual", "individual", View::Page("Common/IndividualAccountOverview")),
    RouteDef::view("/organisation", "organisation", View::Page("Common/OrganisationAccountOverview")),
    RouteDef::view("/pricing", "pricing", View::Page("Common/Pricing")),
    RouteDef::view("/help", "help", View::Page("Common/HelpCenter")),
    RouteDef::view("/cookies", "cookies", View::Page("Common/Cookies")),
    RouteDef::view("/privacy-policy", "privacy-policy", View::Page("Common/PrivacyPolicy")),
    RouteDef::view("/terms-of-service", "terms-of-service", View::Page("Common/TermsOfService")),
    RouteDef::view("/about-us", "about-us", View::Page("Common/AboutUs")),
    RouteDef::view("/contact-us", "contact-us", View::Page("Common/ContactUs")),
    RouteDef::view("/:pathMatch(.*)*", "not-found", View::NotFound),
];

static ROUTES: LazyLock<RouteTable> = LazyLock::new(|| {
    RouteTable::new(&[SUPERADMIN_ROUTES, INDIVIDUAL_ROUTES, ORG_ROUTES, BASE_ROUTES])
});

/// 全局合并路由表（首次访问时构建并校验）
pub fn table() -> &'static RouteTable {
    &ROUTES
}
