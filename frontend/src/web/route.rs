//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了路由描述、路径匹配、meta 合并以及守卫判定。

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use azonation_shared::UserType;

use crate::log::log_error;

/// 登录页路由名（也是认证失败时的重定向目标）
pub const LOGIN_ROUTE: &str = "login";
/// 角色不匹配时的重定向目标
pub const HOME_PATH: &str = "/";
/// 兜底路由名
pub const NOT_FOUND_ROUTE: &str = "not-found";

/// 路由对应的页面组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Signup,
    VerifyCode,
    ForgotPassword,
    ResetPassword,
    OauthComplete,
    OauthSignedIn,
    NotFound,
    /// 角色工作台外壳，子路由渲染在其中
    Dashboard(UserType),
    /// 其余页面，参数为页面标识，如 `Org/Committee/Index`
    Page(&'static str),
}

/// 路由 meta；`None` 表示未声明，从父路由继承
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: Option<bool>,
    pub user_type: Option<UserType>,
}

impl RouteMeta {
    pub const NONE: Self = Self {
        requires_auth: None,
        user_type: None,
    };

    pub const AUTH: Self = Self {
        requires_auth: Some(true),
        user_type: None,
    };

    pub const PUBLIC: Self = Self {
        requires_auth: Some(false),
        user_type: None,
    };

    pub const fn role(user_type: UserType) -> Self {
        Self {
            requires_auth: Some(true),
            user_type: Some(user_type),
        }
    }

    /// 子路由声明的字段覆盖父路由
    fn merge(self, child: RouteMeta) -> Self {
        Self {
            requires_auth: child.requires_auth.or(self.requires_auth),
            user_type: child.user_type.or(self.user_type),
        }
    }
}

/// 路由描述（静态、启动后不可变）
#[derive(Debug, Clone, Copy)]
pub struct RouteDef {
    /// 以 `/` 开头为绝对路径，否则相对父路由
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub meta: RouteMeta,
    pub children: &'static [RouteDef],
}

impl RouteDef {
    /// 工作台内的普通页面：需要认证，角色继承自父路由
    pub const fn page(path: &'static str, name: &'static str, page: &'static str) -> Self {
        Self {
            path,
            name,
            view: View::Page(page),
            meta: RouteMeta::AUTH,
            children: &[],
        }
    }

    pub const fn view(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            meta: RouteMeta::NONE,
            children: &[],
        }
    }

    pub const fn nested(
        path: &'static str,
        name: &'static str,
        view: View,
        meta: RouteMeta,
        children: &'static [RouteDef],
    ) -> Self {
        Self {
            path,
            name,
            view,
            meta,
            children,
        }
    }

    pub const fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// 合并后的最终 meta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedMeta {
    pub requires_auth: bool,
    pub user_type: Option<UserType>,
}

// =========================================================
// 路径模式
// =========================================================

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Static(String),
    Param(String),
    /// `:name(.*)*`，匹配剩余所有段
    CatchAll(String),
}

fn parse_segment(raw: &str) -> Segment {
    match raw.strip_prefix(':') {
        Some(param) => match param.find('(') {
            Some(idx) if param[idx..].starts_with("(.*)") => {
                Segment::CatchAll(param[..idx].to_string())
            }
            Some(idx) => Segment::Param(param[..idx].to_string()),
            None => Segment::Param(param.to_string()),
        },
        None => Segment::Static(raw.to_string()),
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// 去掉查询串与 hash，保证以 `/` 开头、无尾随 `/`
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let joined = split_path(path).join("/");
    format!("/{}", joined)
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        normalize_path(child)
    } else if child.is_empty() {
        normalize_path(parent)
    } else {
        normalize_path(&format!("{}/{}", parent, child))
    }
}

/// 展平后的一条路由：完整路径 + 从根到叶的链
#[derive(Debug, Clone)]
struct FlatRoute {
    pattern: String,
    segments: Vec<Segment>,
    chain: Vec<&'static RouteDef>,
}

impl FlatRoute {
    /// 返回 (得分, 参数)；静态段优先于参数段，参数段优先于兜底。
    ///
    /// 得分是各段分值之和（静态 4、参数 2、完整匹配再加 1），
    /// 不逐段比较，因此 `/a/:x` 与 `/:y/b` 对 `/a/b` 同分。
    fn matches(&self, parts: &[&str]) -> Option<(usize, BTreeMap<String, String>)> {
        let mut params = BTreeMap::new();
        let mut score = 0;

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), parts.get(i..).unwrap_or(&[]).join("/"));
                    return Some((score, params));
                }
                Segment::Static(expected) => {
                    let actual = parts.get(i)?;
                    if !expected.eq_ignore_ascii_case(actual) {
                        return None;
                    }
                    score += 4;
                }
                Segment::Param(name) => {
                    let actual = parts.get(i)?;
                    params.insert(name.clone(), actual.to_string());
                    score += 2;
                }
            }
        }

        if parts.len() == self.segments.len() {
            Some((score + 1, params))
        } else {
            None
        }
    }

    fn leaf(&self) -> &'static RouteDef {
        self.chain[self.chain.len() - 1]
    }

    fn meta(&self) -> ResolvedMeta {
        let merged = self
            .chain
            .iter()
            .fold(RouteMeta::NONE, |acc, def| acc.merge(def.meta));
        ResolvedMeta {
            requires_auth: merged.requires_auth.unwrap_or(false),
            user_type: merged.user_type,
        }
    }
}

/// 一次解析的结果
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub name: &'static str,
    pub view: View,
    /// 匹配到的路由模式，如 `/org-dashboard/asset/edit/:id`
    pub pattern: String,
    /// 实际路径（已规范化）
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub meta: ResolvedMeta,
    /// 从根到叶的路由名
    pub chain: Vec<&'static str>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn guard(&self, auth: &AuthSnapshot) -> GuardDecision {
        guard(&self.meta, auth)
    }
}

impl Display for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path, self.name)
    }
}

// =========================================================
// 路由表
// =========================================================

pub struct RouteTable {
    routes: Vec<FlatRoute>,
    by_name: HashMap<&'static str, usize>,
}

impl RouteTable {
    /// 按给定顺序合并多组路由
    pub fn new(groups: &[&'static [RouteDef]]) -> Self {
        let mut routes = Vec::new();
        for group in groups.iter().copied() {
            for def in group {
                flatten(def, "/", &[], &mut routes);
            }
        }

        let mut by_name = HashMap::new();
        for (idx, route) in routes.iter().enumerate() {
            by_name.entry(route.leaf().name).or_insert(idx);
        }

        let table = Self { routes, by_name };
        if let Err(dups) = table.validate() {
            log_error!("[Router] duplicate route names: {}", dups.join(", "));
        }
        table
    }

    /// 检查路由名唯一，返回重复的名字
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut seen = HashMap::new();
        let mut dups = Vec::new();
        for route in &self.routes {
            let name = route.leaf().name;
            let count = seen.entry(name).or_insert(0usize);
            *count += 1;
            if *count == 2 {
                dups.push(name);
            }
        }
        if dups.is_empty() { Ok(()) } else { Err(dups) }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|r| r.leaf().name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// 将 URL path 解析为路由；没有任何匹配时返回 None
    ///
    /// 取得分最高的路由；同分时按声明顺序，先声明者胜出。
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);
        let parts = split_path(&path);

        let mut best: Option<(usize, &FlatRoute, BTreeMap<String, String>)> = None;
        for route in &self.routes {
            if let Some((score, params)) = route.matches(&parts) {
                if best.as_ref().is_none_or(|(s, _, _)| score > *s) {
                    best = Some((score, route, params));
                }
            }
        }

        best.map(|(_, route, params)| {
            let leaf = route.leaf();
            RouteMatch {
                name: leaf.name,
                view: leaf.view,
                pattern: route.pattern.clone(),
                path: path.clone(),
                params,
                meta: route.meta(),
                chain: route.chain.iter().map(|d| d.name).collect(),
            }
        })
    }

    /// 按路由名解析（参数缺失时返回 None）
    pub fn resolve_named(&self, name: &str, params: &[(&str, &str)]) -> Option<RouteMatch> {
        self.resolve(&self.path_for(name, params)?)
    }

    /// 根据路由名构造 URL
    pub fn path_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let route = &self.routes[*self.by_name.get(name)?];
        let lookup = |key: &str| params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

        let mut parts = Vec::with_capacity(route.segments.len());
        for segment in &route.segments {
            match segment {
                Segment::Static(s) => parts.push(s.clone()),
                Segment::Param(p) => parts.push(lookup(p)?.to_string()),
                Segment::CatchAll(p) => {
                    if let Some(rest) = lookup(p).filter(|r| !r.is_empty()) {
                        parts.push(rest.trim_matches('/').to_string());
                    }
                }
            }
        }
        Some(format!("/{}", parts.join("/")))
    }
}

fn flatten(
    def: &'static RouteDef,
    parent: &str,
    ancestors: &[&'static RouteDef],
    out: &mut Vec<FlatRoute>,
) {
    let pattern = join_paths(parent, def.path);
    let mut chain = ancestors.to_vec();
    chain.push(def);

    out.push(FlatRoute {
        segments: split_path(&pattern).into_iter().map(parse_segment).collect(),
        pattern: pattern.clone(),
        chain: chain.clone(),
    });

    for child in def.children {
        flatten(child, &pattern, &chain, out);
    }
}

// =========================================================
// 守卫
// =========================================================

/// 守卫所需的会话快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub role: Option<UserType>,
}

/// 单次导航的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    /// 需要认证但未登录
    RedirectLogin,
    /// 已登录但角色不符
    RedirectHome,
}

/// **核心守卫逻辑**
///
/// 要求认证的路由：未登录 -> 登录页；路由要求的角色与会话角色不相等 -> 首页。
/// 路由未声明角色而会话有角色时同样视为不相等。
pub fn guard(meta: &ResolvedMeta, auth: &AuthSnapshot) -> GuardDecision {
    if meta.requires_auth && !auth.is_authenticated {
        return GuardDecision::RedirectLogin;
    }
    if meta.requires_auth && meta.user_type != auth.role {
        return GuardDecision::RedirectHome;
    }
    GuardDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHILDREN: &[RouteDef] = &[
        RouteDef::page("index", "shell-index", "Shell/Index"),
        RouteDef::page("asset/edit/:id", "edit-asset", "Shell/Asset/Edit"),
        RouteDef::page("asset/create", "create-asset", "Shell/Asset/Create"),
        RouteDef::page("open", "open-page", "Shell/Open").with_meta(RouteMeta::PUBLIC),
    ];

    const GROUP: &[RouteDef] = &[
        RouteDef::view("/", "login", View::Login),
        RouteDef::nested(
            "/shell",
            "shell",
            View::Dashboard(UserType::Organisation),
            RouteMeta::role(UserType::Organisation),
            CHILDREN,
        ),
        RouteDef::view("/:pathMatch(.*)*", "not-found", View::NotFound),
    ];

    fn table() -> RouteTable {
        RouteTable::new(&[GROUP])
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/shell/"), "/shell");
        assert_eq!(normalize_path("shell//index?x=1#top"), "/shell/index");
    }

    #[test]
    fn test_child_inherits_parent_role() {
        let m = table().resolve("/shell/index").unwrap();
        assert_eq!(m.name, "shell-index");
        assert_eq!(m.chain, vec!["shell", "shell-index"]);
        assert!(m.meta.requires_auth);
        assert_eq!(m.meta.user_type, Some(UserType::Organisation));
    }

    #[test]
    fn test_child_can_opt_out_of_auth() {
        let m = table().resolve("/shell/open").unwrap();
        assert!(!m.meta.requires_auth);
        assert_eq!(m.meta.user_type, Some(UserType::Organisation));
    }

    #[test]
    fn test_params_and_static_priority() {
        let t = table();
        let m = t.resolve("/shell/asset/edit/17").unwrap();
        assert_eq!(m.name, "edit-asset");
        assert_eq!(m.param("id"), Some("17"));
        assert_eq!(m.pattern, "/shell/asset/edit/:id");

        let m = t.resolve("/shell/asset/create").unwrap();
        assert_eq!(m.name, "create-asset");
    }

    #[test]
    fn test_catch_all() {
        let m = table().resolve("/no/such/page").unwrap();
        assert_eq!(m.name, "not-found");
        assert_eq!(m.param("pathMatch"), Some("no/such/page"));
        assert!(!m.meta.requires_auth);

        // 根路径命中登录页而不是兜底
        assert_eq!(table().resolve("/").unwrap().name, "login");
    }

    #[test]
    fn test_case_insensitive_static_segments() {
        assert_eq!(table().resolve("/SHELL/Index").unwrap().name, "shell-index");
    }

    #[test]
    fn test_path_for() {
        let t = table();
        assert_eq!(
            t.path_for("edit-asset", &[("id", "5")]).as_deref(),
            Some("/shell/asset/edit/5")
        );
        assert_eq!(t.path_for("edit-asset", &[]), None);
        assert_eq!(t.path_for("login", &[]).as_deref(), Some("/"));
        assert_eq!(t.path_for("unknown", &[]), None);
        assert_eq!(
            t.path_for("not-found", &[("pathMatch", "x/y")]).as_deref(),
            Some("/x/y")
        );
    }

    #[test]
    fn test_validate_reports_duplicates() {
        const DUP: &[RouteDef] = &[
            RouteDef::view("/a", "same", View::NotFound),
            RouteDef::view("/b", "same", View::NotFound),
        ];
        let t = RouteTable::new(&[DUP]);
        assert_eq!(t.validate(), Err(vec!["same"]));
        // 首个同名路由用于按名解析
        assert_eq!(t.path_for("same", &[]).as_deref(), Some("/a"));
    }

    #[test]
    fn test_guard_state_machine() {
        let protected = ResolvedMeta {
            requires_auth: true,
            user_type: Some(UserType::Organisation),
        };
        let open = ResolvedMeta::default();
        let anon = AuthSnapshot::default();
        let org = AuthSnapshot {
            is_authenticated: true,
            role: Some(UserType::Organisation),
        };
        let individual = AuthSnapshot {
            is_authenticated: true,
            role: Some(UserType::Individual),
        };

        assert_eq!(guard(&protected, &anon), GuardDecision::RedirectLogin);
        assert_eq!(guard(&protected, &individual), GuardDecision::RedirectHome);
        assert_eq!(guard(&protected, &org), GuardDecision::Allowed);
        assert_eq!(guard(&open, &anon), GuardDecision::Allowed);
        assert_eq!(guard(&open, &individual), GuardDecision::Allowed);
    }

    #[test]
    fn test_guard_untyped_protected_route_redirects_typed_user_home() {
        let untyped = ResolvedMeta {
            requires_auth: true,
            user_type: None,
        };
        let org = AuthSnapshot {
            is_authenticated: true,
            role: Some(UserType::Organisation),
        };
        assert_eq!(guard(&untyped, &org), GuardDecision::RedirectHome);
    }

    #[test]
    fn test_equal_scores_resolve_in_declaration_order() {
        const TIED: &[RouteDef] = &[
            RouteDef::view("/a/:x", "first", View::NotFound),
            RouteDef::view("/:y/b", "second", View::NotFound),
        ];
        const REVERSED: &[RouteDef] = &[
            RouteDef::view("/:y/b", "second", View::NotFound),
            RouteDef::view("/a/:x", "first", View::NotFound),
        ];

        assert_eq!(RouteTable::new(&[TIED]).resolve("/a/b").unwrap().name, "first");
        assert_eq!(RouteTable::new(&[REVERSED]).resolve("/a/b").unwrap().name, "second");
        // 只有一条匹配时与顺序无关
        assert_eq!(RouteTable::new(&[TIED]).resolve("/c/b").unwrap().name, "second");
    }
}
