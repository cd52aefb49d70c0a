use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Badge(
    #[prop(into, optional)] variant: Signal<BadgeVariant>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = move || BadgeClass { variant: variant.get() }.with_class(class.clone());

    view! { <span data-name="Badge" class=merged_class>{children()}</span> }
}

#[derive(TwClass, Default)]
#[tw(class = "inline-flex items-center gap-1 rounded-md border px-2 py-0.5 text-xs font-medium whitespace-nowrap [&>svg]:size-3")]
pub struct BadgeClass {
    variant: BadgeVariant,
}

#[derive(TwVariant)]
pub enum BadgeVariant {
    #[tw(default, class = "border-transparent bg-secondary text-secondary-foreground")]
    Default,
    #[tw(class = "border-transparent bg-emerald-600 text-white")]
    Verified,
    #[tw(class = "text-muted-foreground")]
    Outline,
}
