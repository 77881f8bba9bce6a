use leptos::prelude::*;

use crate::web::router::{Link, use_router};

/// 顶部导航进度条
#[component]
pub fn TopProgressBar() -> impl IntoView {
    let active = use_router().loader().active();

    view! {
        <Show when=move || active.get()>
            <progress class="progress progress-primary fixed top-0 left-0 w-full h-1 z-50"></progress>
        </Show>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Page not found"</p>
                <Link to="login">
                    <span class="btn btn-primary">"Back to home"</span>
                </Link>
            </div>
        </div>
    }
}
