use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Plain `<select>` bound to a string signal. An empty value is the
/// placeholder option.
#[component]
pub fn NativeSelect(
    #[prop(into)] options: Vec<(String, String)>,
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input h-9 w-full rounded-md border bg-background px-3 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50",
        class
    );

    let on_change = move |ev: web_sys::Event| {
        if let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        {
            bind_value.set(select.value());
        }
    };

    view! {
        <select
            data-name="NativeSelect"
            id=id
            class=merged_class
            prop:value=move || bind_value.get()
            on:change=on_change
        >
            <option value="">{placeholder}</option>
            {options
                .into_iter()
                .map(|(value, label)| {
                    let v = value.clone();
                    view! {
                        <option value=value selected=move || bind_value.get() == v>
                            {label}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
