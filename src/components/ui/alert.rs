use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertTitle, h4, "mb-1 font-medium leading-none"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

/// Inline error box used by forms and failed loads.
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ().into_view()>
            <Alert class="border-destructive/30 bg-destructive/5">
                <AlertDescription class="text-destructive text-xs">
                    {move || message.get().unwrap_or_default()}
                </AlertDescription>
            </Alert>
        </Show>
    }
}
