//! 会话存储
//!
//! "谁已登录" 的唯一来源，也是访问后端的唯一通道。
//! 状态保存在内存中，同时持久化到 `KeyValueStore`（键 `auth` / `user` / 角色缓存）。
//! 所有调用都不会把错误抛出存储边界：失败统一转换为 `status = false` 的外壳。

use azonation_shared::{
    ApiEnvelope, ApiRequest, FieldErrors, HttpMethod, IndividualRegisterRequest, LoginRequest,
    OrgRegisterRequest, SuperAdminRegisterRequest, UserProfile, UserType,
};
use parking_lot::RwLock;
use serde_json::Value;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::log::{log_info, log_warn};
use crate::web::http::{HttpClient, MultipartForm};
use crate::web::route::{AuthSnapshot, LOGIN_ROUTE};
use crate::web::storage::KeyValueStore;

pub const KEY_AUTH: &str = "auth";
pub const KEY_USER: &str = "user";
pub const KEY_INDIVIDUAL: &str = "individual";
pub const KEY_ORG: &str = "org";
pub const KEY_SUPERADMIN: &str = "superadmin";

/// 角色对应的落地路由名；未知角色回到登录页
pub fn landing_route(role: Option<UserType>) -> &'static str {
    match role {
        Some(UserType::Individual) => "individual-dashboard",
        Some(UserType::Organisation) => "org-dashboard",
        Some(UserType::SuperAdmin) => "superadmin-dashboard",
        None => LOGIN_ROUTE,
    }
}

/// 角色资料接口与缓存键
fn profile_source(role: UserType) -> (&'static str, &'static str) {
    match role {
        UserType::Individual => ("/api/individual_data", KEY_INDIVIDUAL),
        UserType::Organisation => ("/api/get_organisation_data", KEY_ORG),
        UserType::SuperAdmin => ("/api/super_admin_user_data", KEY_SUPERADMIN),
    }
}

/// 读取 JSON 值；缺失、`"undefined"`、`"null"` 或无法解析都视为没有
fn read_json<S: KeyValueStore>(storage: &S, key: &str) -> Option<Value> {
    let raw = storage.get(key)?;
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" || raw == "null" {
        return None;
    }
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(|v| !v.is_null())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: UserProfile,
    pub errors: Option<FieldErrors>,
    pub individual: Option<Value>,
    pub org: Option<Value>,
    pub superadmin: Option<Value>,
}

impl Session {
    fn restore<S: KeyValueStore>(storage: &S) -> Self {
        let is_authenticated = storage.get(KEY_AUTH).is_some_and(|v| v.trim() == "1");
        let user = read_json(storage, KEY_USER)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        Self {
            is_authenticated,
            user,
            errors: None,
            individual: read_json(storage, KEY_INDIVIDUAL),
            org: read_json(storage, KEY_ORG),
            superadmin: read_json(storage, KEY_SUPERADMIN),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.user.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<UserType> {
        self.user.role()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: self.is_authenticated,
            role: self.role(),
        }
    }

    fn cache_mut(&mut self, key: &str) -> Option<&mut Option<Value>> {
        match key {
            KEY_INDIVIDUAL => Some(&mut self.individual),
            KEY_ORG => Some(&mut self.org),
            KEY_SUPERADMIN => Some(&mut self.superadmin),
            _ => None,
        }
    }
}

/// 登录结果
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// 登录成功，应导航到的路由名
    Success { landing: &'static str },
    /// 登录失败，字段错误已写入会话
    Failed { message: Option<String> },
}

pub struct SessionStore<C, S> {
    api: ApiClient<C>,
    storage: S,
    login_endpoint: String,
    logout_endpoint: String,
    state: RwLock<Session>,
}

impl<C: HttpClient, S: KeyValueStore> SessionStore<C, S> {
    /// 从持久化存储恢复会话
    pub fn new(config: &AppConfig, http: C, storage: S) -> Self {
        let state = Session::restore(&storage);
        Self {
            api: ApiClient::new(config.api_base.clone(), http),
            storage,
            login_endpoint: config.login_endpoint.clone(),
            logout_endpoint: config.logout_endpoint.clone(),
            state: RwLock::new(state),
        }
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token().map(str::to_string)
    }

    pub fn role(&self) -> Option<UserType> {
        self.state.read().role()
    }

    pub fn errors(&self) -> Option<FieldErrors> {
        self.state.read().errors.clone()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.read().snapshot()
    }

    pub fn clear_errors(&self) {
        self.state.write().errors = None;
    }

    fn record_errors(&self, errors: FieldErrors) {
        self.state.write().errors = Some(errors);
    }

    // =========================================================
    // 通用调用
    // =========================================================

    pub async fn call_public(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: HttpMethod,
    ) -> ApiEnvelope {
        self.api
            .call(endpoint, body, method, None)
            .await
            .unwrap_or_else(|e| degrade(e.in_op("session.call_public")))
    }

    pub async fn call_protected(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: HttpMethod,
    ) -> ApiEnvelope {
        let token = self.token();
        self.api
            .call(endpoint, body, method, token.as_deref())
            .await
            .unwrap_or_else(|e| degrade(e.in_op("session.call_protected")))
    }

    pub async fn upload_protected(
        &self,
        endpoint: &str,
        form: MultipartForm,
        method: HttpMethod,
    ) -> ApiEnvelope {
        let token = self.token();
        self.api
            .upload(endpoint, form, method, token.as_deref())
            .await
            .unwrap_or_else(|e| degrade(e.in_op("session.upload_protected")))
    }

    // =========================================================
    // 登录 / 注册 / 注销
    // =========================================================

    /// 登录
    ///
    /// 成功：标记已认证并持久化用户资料，随后尽力拉取角色资料。
    /// 失败：只记录错误，不影响已有会话。
    pub async fn authenticate(&self, email: &str, password: &str, remember: bool) -> LoginOutcome {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            remember,
        };

        let envelope = match self
            .api
            .send_request_at(&self.login_endpoint, &request, None)
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                let e = e.in_op("session.authenticate");
                log_warn!("[Session] Login failed: {}", e);
                let message = e.message.clone();
                self.record_errors(errors_of(&e));
                return LoginOutcome::Failed {
                    message: Some(message),
                };
            }
        };

        let profile = match envelope.data {
            Some(profile) if envelope.status => profile,
            _ => {
                log_warn!("[Session] Login rejected: {:?}", envelope.message);
                let errors = envelope.errors.unwrap_or_else(|| {
                    FieldErrors::single(
                        "general",
                        envelope
                            .message
                            .clone()
                            .unwrap_or_else(|| "Login failed".to_string()),
                    )
                });
                self.record_errors(errors);
                return LoginOutcome::Failed {
                    message: envelope.message,
                };
            }
        };

        let role = profile.role();
        let user_id = profile.user_id_segment();
        self.persist_login(&profile);
        {
            let mut state = self.state.write();
            state.is_authenticated = true;
            state.user = profile;
            state.errors = None;
        }
        log_info!("[Session] Logged in as {:?}", role);

        if let (Some(role), Some(id)) = (role, user_id) {
            self.fetch_profile_data(role, &id).await;
        }

        LoginOutcome::Success {
            landing: landing_route(role),
        }
    }

    fn persist_login(&self, profile: &UserProfile) {
        self.storage.set(KEY_AUTH, "1");
        match serde_json::to_string(profile) {
            Ok(json) => {
                self.storage.set(KEY_USER, &json);
            }
            Err(e) => log_warn!("[Session] Cannot persist user: {}", e),
        }
    }

    fn cache_profile(&self, key: &str, data: Value) {
        self.storage.set(key, &data.to_string());
        if let Some(slot) = self.state.write().cache_mut(key) {
            *slot = Some(data);
        }
    }

    /// 拉取角色资料并缓存，失败只记录日志
    async fn fetch_profile_data(&self, role: UserType, id: &str) -> bool {
        let (endpoint, key) = profile_source(role);
        let envelope = self
            .call_public(&format!("{}/{}", endpoint, id), None, HttpMethod::Get)
            .await;

        match envelope.data {
            Some(data) if envelope.status => {
                self.cache_profile(key, data);
                true
            }
            _ => {
                log_warn!(
                    "[Session] Profile data for {} unavailable: {:?}",
                    role,
                    envelope.message
                );
                false
            }
        }
    }

    /// 组织资料变更后重新拉取
    pub async fn refresh_org_data(&self, org_id: &str) -> bool {
        let envelope = self
            .call_public(&format!("/api/organisation/{}", org_id), None, HttpMethod::Get)
            .await;

        match envelope.data {
            Some(data) if envelope.status => {
                self.cache_profile(KEY_ORG, data);
                true
            }
            _ => {
                log_warn!("[Session] Organisation {} refresh failed: {:?}", org_id, envelope.message);
                false
            }
        }
    }

    async fn register<R: ApiRequest>(&self, request: &R) -> Option<&'static str> {
        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(e) => {
                self.record_errors(FieldErrors::single("general", e.to_string()));
                return None;
            }
        };

        let envelope = self.call_public(R::PATH, Some(&body), R::METHOD).await;
        if envelope.status {
            self.clear_errors();
            log_info!("[Session] Registered via {}", R::PATH);
            Some(LOGIN_ROUTE)
        } else {
            let errors = envelope.errors.unwrap_or_else(|| {
                FieldErrors::single(
                    "general",
                    envelope
                        .message
                        .unwrap_or_else(|| "Registration failed".to_string()),
                )
            });
            self.record_errors(errors);
            None
        }
    }

    /// 个人注册；成功返回登录路由名
    pub async fn register_individual(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Option<&'static str> {
        self.register(&IndividualRegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn register_organisation(
        &self,
        org_name: &str,
        email: &str,
        password: &str,
    ) -> Option<&'static str> {
        self.register(&OrgRegisterRequest {
            org_name: org_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn register_superadmin(
        &self,
        admin_name: &str,
        email: &str,
        password: &str,
    ) -> Option<&'static str> {
        self.register(&SuperAdminRegisterRequest {
            admin_name: admin_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    /// 注销
    ///
    /// 用户取消时不做任何改动。确认后先清理本地状态，再尽力通知后端。
    pub async fn logout(&self, confirmed: bool) -> Option<&'static str> {
        if !confirmed {
            return None;
        }

        let token = self.token();
        {
            let mut state = self.state.write();
            *state = Session::default();
        }
        self.storage.set(KEY_AUTH, "0");
        self.storage.set(KEY_USER, "{}");
        for key in [KEY_INDIVIDUAL, KEY_ORG, KEY_SUPERADMIN] {
            self.storage.delete(key);
        }
        log_info!("[Session] Logged out locally");

        if let Err(e) = self
            .api
            .call(&self.logout_endpoint, None, HttpMethod::Post, token.as_deref())
            .await
        {
            log_warn!("[Session] Backend logout failed: {}", e.in_op("session.logout"));
        }

        Some(LOGIN_ROUTE)
    }
}

/// 失败降级为统一的 "not ok" 外壳
fn degrade(e: ApiError) -> ApiEnvelope {
    log_warn!("[Session] {}", e);
    e.into_envelope()
}

fn errors_of(e: &ApiError) -> FieldErrors {
    e.field_errors()
        .cloned()
        .unwrap_or_else(|| FieldErrors::single("general", e.message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::HttpError;
    use crate::web::http::mock::{MockHttpClient, MockReply};
    use crate::web::storage::MemoryStorage;
    use azonation_shared::HEADER_AUTHORIZATION;
    use serde_json::json;

    const LOGIN_URL: &str = "http://localhost:8000/api/login";
    const LOGOUT_URL: &str = "http://localhost:8000/api/logout";

    fn store_with(storage: MemoryStorage) -> SessionStore<MockHttpClient, MemoryStorage> {
        SessionStore::new(&AppConfig::default(), MockHttpClient::new(), storage)
    }

    fn store() -> SessionStore<MockHttpClient, MemoryStorage> {
        store_with(MemoryStorage::new())
    }

    fn mock_login(store: &SessionStore<MockHttpClient, MemoryStorage>, user_type: Value) {
        store.api().http().mock_json(
            HttpMethod::Post,
            LOGIN_URL,
            200,
            json!({
                "status": "success",
                "data": {"accessToken": "tok-123", "type": user_type, "user_id": 42, "name": "Ann"}
            }),
        );
    }

    #[test]
    fn test_empty_session_accessors_are_safe() {
        let store = store();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.role(), None);
        assert_eq!(store.errors(), None);
        assert_eq!(store.snapshot(), AuthSnapshot::default());
    }

    #[test]
    fn test_restore_tolerates_garbage() {
        for raw in ["undefined", "null", "{not json", ""] {
            let store = store_with(MemoryStorage::with_items([
                (KEY_AUTH, "1"),
                (KEY_USER, raw),
                (KEY_ORG, raw),
            ]));
            assert!(store.is_authenticated());
            assert!(store.session().user.is_empty());
            assert_eq!(store.session().org, None);
            assert_eq!(store.token(), None);
        }
    }

    #[test]
    fn test_restore_from_storage() {
        let store = store_with(MemoryStorage::with_items([
            (KEY_AUTH, "1"),
            (KEY_USER, r#"{"accessToken":"abc","type":"2","user_id":5}"#),
            (KEY_ORG, r#"{"id":9}"#),
        ]));
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.role(), Some(UserType::Organisation));
        assert_eq!(store.session().org, Some(json!({"id": 9})));
    }

    #[tokio::test]
    async fn test_login_logout_round_trip() {
        let store = store();
        mock_login(&store, json!("organisation"));
        store.api().http().mock_json(
            HttpMethod::Get,
            "http://localhost:8000/api/get_organisation_data/42",
            200,
            json!({"status": true, "data": {"org_name": "Acme"}}),
        );
        store
            .api()
            .http()
            .mock_json(HttpMethod::Post, LOGOUT_URL, 200, json!({"status": true}));

        let outcome = store.authenticate("ann@example.com", "secret", true).await;
        assert_eq!(outcome, LoginOutcome::Success { landing: "org-dashboard" });
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert!(store.is_authenticated());
        assert_eq!(store.storage.get(KEY_AUTH).as_deref(), Some("1"));
        assert_eq!(store.session().org, Some(json!({"org_name": "Acme"})));
        assert!(store.storage.get(KEY_ORG).is_some());

        let landing = store.logout(true).await;
        assert_eq!(landing, Some(LOGIN_ROUTE));
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.storage.get(KEY_AUTH).as_deref(), Some("0"));
        assert_eq!(store.storage.get(KEY_USER).as_deref(), Some("{}"));
        assert_eq!(store.storage.get(KEY_ORG), None);

        let logout = store.api().http().last_request().unwrap();
        assert_eq!(logout.url, LOGOUT_URL);
        assert_eq!(
            logout.headers.get(HEADER_AUTHORIZATION).map(String::as_str),
            Some("Bearer tok-123")
        );
    }

    #[tokio::test]
    async fn test_profile_fetch_is_public() {
        let store = store();
        mock_login(&store, json!("individual"));
        store.api().http().mock_json(
            HttpMethod::Get,
            "http://localhost:8000/api/individual_data/42",
            200,
            json!({"status": true, "data": {"name": "Ann"}}),
        );
        store.authenticate("ann@example.com", "pw", false).await;

        let profile = store.api().http().last_request().unwrap();
        assert_eq!(profile.url, "http://localhost:8000/api/individual_data/42");
        assert_eq!(profile.headers.get(HEADER_AUTHORIZATION), None);
        assert!(store.storage.get(KEY_INDIVIDUAL).is_some());
    }

    #[tokio::test]
    async fn test_login_sends_remember_flag() {
        let store = store();
        mock_login(&store, json!("individual"));
        store.authenticate(" ann@example.com ", "pw", true).await;

        let login = store.api().http().requests.borrow()[0].clone();
        let Some(crate::web::http::RequestBody::Json(body)) = login.body else {
            panic!("login must send a JSON body");
        };
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"email": "ann@example.com", "password": "pw", "remember": true}));
    }

    #[tokio::test]
    async fn test_landing_per_role() {
        for (raw, landing) in [
            (json!("superadmin"), "superadmin-dashboard"),
            (json!("individual"), "individual-dashboard"),
            (json!(1), "individual-dashboard"),
            (json!("bogus"), LOGIN_ROUTE),
        ] {
            let store = store();
            mock_login(&store, raw);
            assert_eq!(
                store.authenticate("a@b.c", "pw", false).await,
                LoginOutcome::Success { landing }
            );
        }
    }

    #[tokio::test]
    async fn test_failed_login_records_errors_and_keeps_session() {
        let store = store_with(MemoryStorage::with_items([
            (KEY_AUTH, "1"),
            (KEY_USER, r#"{"accessToken":"old","type":"individual"}"#),
        ]));
        store.api().http().mock_json(
            HttpMethod::Post,
            LOGIN_URL,
            200,
            json!({"status": "error", "message": "Invalid credentials", "errors": {"email": "Unknown email"}}),
        );

        let outcome = store.authenticate("x@y.z", "bad", false).await;
        assert_eq!(
            outcome,
            LoginOutcome::Failed {
                message: Some("Invalid credentials".to_string())
            }
        );
        assert_eq!(
            store.errors().as_ref().and_then(|e| e.first("email")),
            Some("Unknown email")
        );
        assert_eq!(store.token().as_deref(), Some("old"));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure_is_reported_as_general_error() {
        let store = store();
        store.api().http().mock_reply(
            HttpMethod::Post,
            LOGIN_URL,
            MockReply::Fail(HttpError::NetworkError("offline".into())),
        );
        let outcome = store.authenticate("a@b.c", "pw", false).await;
        assert!(matches!(outcome, LoginOutcome::Failed { .. }));
        assert!(store.errors().and_then(|e| e.first("general").map(str::to_string)).is_some());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_declined_changes_nothing() {
        let store = store();
        mock_login(&store, json!("individual"));
        store.authenticate("a@b.c", "pw", false).await;
        let before = store.api().http().request_count();

        assert_eq!(store.logout(false).await, None);
        assert!(store.is_authenticated());
        assert_eq!(store.api().http().request_count(), before);
    }

    #[tokio::test]
    async fn test_logout_survives_backend_failure() {
        let store = store();
        mock_login(&store, json!("individual"));
        store.authenticate("a@b.c", "pw", false).await;
        store.api().http().mock_reply(
            HttpMethod::Post,
            LOGOUT_URL,
            MockReply::Fail(HttpError::NetworkError("offline".into())),
        );

        assert_eq!(store.logout(true).await, Some(LOGIN_ROUTE));
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_calls_never_fail_past_the_store() {
        let store = store();
        store.api().http().mock_reply(
            HttpMethod::Get,
            "http://localhost:8000/api/members",
            MockReply::Fail(HttpError::NetworkError("offline".into())),
        );
        let envelope = store
            .call_protected("/api/members", None, HttpMethod::Get)
            .await;
        assert!(!envelope.status);
        assert!(envelope.message.is_some());

        let envelope = store.call_public("/api/unknown", None, HttpMethod::Get).await;
        assert!(!envelope.status);
    }

    #[tokio::test]
    async fn test_protected_call_attaches_token() {
        let store = store_with(MemoryStorage::with_items([
            (KEY_AUTH, "1"),
            (KEY_USER, r#"{"accessToken":"abc"}"#),
        ]));
        store.api().http().mock_json(
            HttpMethod::Get,
            "http://localhost:8000/api/members",
            200,
            json!({"status": true, "data": []}),
        );
        let envelope = store
            .call_protected("/api/members", None, HttpMethod::Get)
            .await;
        assert!(envelope.status);
        let req = store.api().http().last_request().unwrap();
        assert_eq!(
            req.headers.get(HEADER_AUTHORIZATION).map(String::as_str),
            Some("Bearer abc")
        );
    }

    #[tokio::test]
    async fn test_register_success_and_failure() {
        let store = store();
        store.api().http().mock_json(
            HttpMethod::Post,
            "http://localhost:8000/api/org_register",
            200,
            json!({"status": true}),
        );
        assert_eq!(
            store.register_organisation("Acme", "a@b.c", "pw").await,
            Some(LOGIN_ROUTE)
        );
        assert_eq!(store.errors(), None);

        store.api().http().mock_json(
            HttpMethod::Post,
            "http://localhost:8000/api/individual_register",
            422,
            json!({"status": false, "message": "Invalid", "errors": {"email": ["taken"]}}),
        );
        assert_eq!(store.register_individual("Ann", "a@b.c", "pw").await, None);
        assert_eq!(
            store.errors().as_ref().and_then(|e| e.first("email")),
            Some("taken")
        );
    }

    #[tokio::test]
    async fn test_refresh_org_data() {
        let store = store();
        store.api().http().mock_json(
            HttpMethod::Get,
            "http://localhost:8000/api/organisation/9",
            200,
            json!({"status": true, "data": {"id": 9}}),
        );
        assert!(store.refresh_org_data("9").await);
        assert_eq!(store.session().org, Some(json!({"id": 9})));
        assert!(!store.refresh_org_data("10").await);
    }
}
