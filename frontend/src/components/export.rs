use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::export::{ExportError, ExportRequest, export_csv, export_excel, pdf_export};
use crate::log::log_error;
use crate::web::download::BrowserDownload;
use crate::web::timer::BrowserTimer;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Excel,
    Pdf,
}

fn report(result: Result<bool, ExportError>, set_error: WriteSignal<Option<String>>) {
    match result {
        Ok(_) => set_error.set(None),
        Err(e) => {
            log_error!("[Export] {}", e);
            set_error.set(Some(e.to_string()));
        }
    }
}

/// CSV / Excel / PDF 下载按钮组
#[component]
pub fn ExportToolbar(request: ExportRequest) -> impl IntoView {
    let auth = use_auth();
    let request = StoredValue::new(request);
    let (busy, set_busy) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let run = move |format: Format| {
        let req = request.get_value();
        match format {
            Format::Csv => report(export_csv(&req, &BrowserDownload), set_error),
            Format::Excel => report(export_excel(&req, &BrowserDownload), set_error),
            Format::Pdf => {
                set_busy.set(true);
                let store = auth.store();
                let config = auth.config();
                spawn_local(async move {
                    let result = pdf_export(&*store, &config, &BrowserTimer, &req, &BrowserDownload).await;
                    report(result, set_error);
                    set_busy.set(false);
                });
            }
        }
    };

    view! {
        <div class="flex flex-wrap items-center gap-2">
            <button class="btn btn-sm" on:click=move |_| run(Format::Csv)>"CSV"</button>
            <button class="btn btn-sm" on:click=move |_| run(Format::Excel)>"Excel"</button>
            <button class="btn btn-sm" disabled=move || busy.get() on:click=move |_| run(Format::Pdf)>
                {move || if busy.get() {
                    view! { <span class="loading loading-spinner loading-xs"></span> "PDF" }.into_any()
                } else {
                    "PDF".into_any()
                }}
            </button>
            <Show when=move || error.get().is_some()>
                <span class="text-error text-xs">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </div>
    }
}
