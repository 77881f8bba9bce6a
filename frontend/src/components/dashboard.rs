use azonation_shared::UserType;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::json;

use crate::auth::{logout, use_auth};
use crate::components::export::ExportToolbar;
use crate::currency::CurrencyService;
use crate::export::ExportRequest;
use crate::web::route::RouteMatch;
use crate::web::router::{Link, use_router};

/// 路由名转标题：`view-invoice` -> `View Invoice`
pub fn route_title(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn role_label(role: UserType) -> &'static str {
    match role {
        UserType::Individual => "Individual",
        UserType::Organisation => "Organisation",
        UserType::SuperAdmin => "Super Admin",
    }
}

/// 注销按钮，确认后回到登录页
#[component]
pub fn LogoutButton() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let on_logout = move |_| {
        spawn_local(async move {
            if let Some(landing) = logout(&auth).await {
                router.navigate_named(landing, &[]);
            }
        });
    };

    view! {
        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
            "Log out"
        </button>
    }
}

/// 角色工作台外壳；`route` 为工作台自身或其子页面
#[component]
pub fn DashboardPage(role: UserType, route: RouteMatch) -> impl IntoView {
    let auth = use_auth();
    let (currency, set_currency) = signal(CurrencyService::default());

    // 组织工作台显示记账货币，每次登录只请求一次
    if role == UserType::Organisation {
        Effect::new(move |_| {
            if auth.state.with(|s| s.token().is_none()) {
                return;
            }
            let cache = auth.currency();
            let store = auth.store();
            let endpoint = auth.config().currency_endpoint;
            spawn_local(async move {
                set_currency.set(cache.get_or_load(&*store, &endpoint).await);
            });
        });
    }

    let display_name = move || {
        auth.state.with(|s| {
            s.user
                .org_name
                .clone()
                .or_else(|| s.user.name.clone())
                .unwrap_or_default()
        })
    };
    let home = route.chain.first().copied().unwrap_or(route.name);
    let content = if route.chain.len() <= 1 {
        view! {
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Welcome back"</h3>
                    <p class="text-base-content/70 text-sm">
                        "Choose a section from the menu to get started."
                    </p>
                </div>
            </div>
        }
        .into_any()
    } else {
        view! { <SectionPage route=route /> }.into_any()
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to=home>
                            <span class="btn btn-ghost text-xl">{display_name}</span>
                        </Link>
                        <span class="badge badge-neutral hidden md:inline-flex">{role_label(role)}</span>
                        <Show when=move || currency.with(|c| !c.code.is_empty())>
                            <span class="badge badge-outline hidden md:inline-flex">
                                {move || currency.with(|c| format!("{} {}", c.code, c.symbol))}
                            </span>
                        </Show>
                    </div>
                    <div class="flex-none gap-2">
                        <LogoutButton />
                    </div>
                </div>

                {content}
            </div>
        </div>
    }
}

/// 通用页面：标题取自路由名，并列出路径参数
#[component]
pub fn SectionPage(route: RouteMatch) -> impl IntoView {
    let title = route_title(route.name);
    let params: Vec<(String, String)> = route.params.into_iter().collect();
    let export = ExportRequest::new(route.name)
        .title(title.clone())
        .column("Parameter", "name")
        .column("Value", "value")
        .rows(params.iter().map(|(k, v)| json!({"name": k, "value": v})).collect());

    let param_table = (!params.is_empty()).then(|| {
        view! {
            <ExportToolbar request=export />
            <table class="table table-zebra w-full">
                <tbody>
                    {params
                        .into_iter()
                        .map(|(k, v)| view! {
                            <tr>
                                <td class="font-mono text-sm">{k}</td>
                                <td class="font-mono text-sm opacity-70">{v}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">{title}</h3>
                <p class="font-mono text-xs opacity-50">{route.path}</p>
                {param_table}
            </div>
        </div>
    }
}
