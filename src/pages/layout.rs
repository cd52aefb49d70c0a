use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::{end_session, AppContext};
use icons::{FileText, Upload};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    let location = use_location();
    let active = move || {
        let path = location.pathname.get();
        path == href || (href != "/" && path.starts_with(&format!("{href}/")))
    };

    view! {
        <a
            href=href
            class=move || {
                if active() {
                    "text-sm font-medium text-foreground"
                } else {
                    "text-sm text-muted-foreground hover:text-foreground"
                }
            }
        >
            {label}
        </a>
    }
}

#[component]
fn AccountMenu() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let signing_out: RwSignal<bool> = RwSignal::new(false);

    let on_sign_out = move |_: leptos::ev::MouseEvent| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);

        let state = app_state.0;
        let client = state.client.get_untracked();
        spawn_local(async move {
            let _ = end_session(&client).await;
            state.clear_session();
            signing_out.set(false);
            navigate.with_value(|nav| nav("/", Default::default()));
        });
    };

    let user = move || app_state.0.user();

    view! {
        <Show
            when=move || user().is_some()
            fallback=|| view! {
                <div class="flex items-center gap-2">
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm href="/login">"Log in"</Button>
                    <Button size=ButtonSize::Sm href="/signup">"Sign up"</Button>
                </div>
            }
        >
            <div class="flex items-center gap-2">
                <Button size=ButtonSize::Sm href="/notes/create">
                    <Upload />
                    "Upload Note"
                </Button>
                <a
                    href="/profile"
                    class="inline-flex size-8 items-center justify-center rounded-full bg-primary/10 text-sm font-medium text-primary"
                    title=move || user().and_then(|u| u.email).unwrap_or_default()
                >
                    {move || user().map(|u| u.initial()).unwrap_or_default()}
                </a>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    attr:disabled=move || signing_out.get()
                    on:click=on_sign_out
                >
                    "Sign out"
                </Button>
            </div>
        </Show>
    }
}

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    view! {
        <div class="flex min-h-screen flex-col bg-background">
            <header class="sticky top-0 z-10 border-b bg-background/95 backdrop-blur">
                <div class="mx-auto flex h-14 w-full max-w-6xl items-center justify-between px-4">
                    <div class="flex items-center gap-6">
                        <a href="/" class="inline-flex items-center gap-2 font-semibold text-foreground">
                            <span class="rounded-md bg-primary p-1 text-primary-foreground">
                                <FileText class="size-4" />
                            </span>
                            "NonNotes"
                        </a>
                        <nav class="hidden items-center gap-4 md:flex">
                            <NavLink href="/notes" label="Browse" />
                            <NavLink href="/about" label="About" />
                        </nav>
                    </div>
                    <AccountMenu />
                </div>
            </header>

            <main class="mx-auto w-full max-w-6xl flex-1 px-4 py-8">{children()}</main>

            <footer class="border-t py-6">
                <div class="mx-auto flex w-full max-w-6xl flex-col items-center justify-between gap-2 px-4 text-xs text-muted-foreground md:flex-row">
                    <span>"NonNotes: class notes shared by students, for students."</span>
                    <nav class="flex gap-4">
                        <a href="/notes" class="hover:text-foreground">"Notes"</a>
                        <a href="/about" class="hover:text-foreground">"About"</a>
                        <a href="/debug" class="hover:text-foreground">"Status"</a>
                    </nav>
                </div>
            </footer>
        </div>
    }
}
