use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, ErrorAlert,
    Input, Label, Spinner,
};
use crate::state::{sign_in, sign_up, AppContext};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

#[component]
fn AuthShell(title: &'static str, description: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"NonNotes"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                        <CardDescription class="text-xs">{description}</CardDescription>
                    </CardHeader>
                    <CardContent>{children()}</CardContent>
                </Card>

                <div class="mt-4 text-center text-xs">
                    <a class="text-primary underline underline-offset-4" href="/notes">
                        "Continue browsing without an account"
                    </a>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let state = app_state.0;
        let client = state.client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match sign_in(&client, &email_val, &password_val).await {
                Ok(session) => {
                    state.apply_session(session);
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };

    view! {
        <AuthShell title="Welcome back" description="Sign in to upload, like and manage your notes.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="email" class="text-xs">"Email"</Label>
                    <Input
                        id="email"
                        r#type="email"
                        placeholder="name@example.com"
                        bind_value=email
                        required=true
                        class="h-8 text-sm"
                    />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="password" class="text-xs">"Password"</Label>
                    <Input
                        id="password"
                        r#type="password"
                        placeholder="Enter your password"
                        bind_value=password
                        required=true
                        class="h-8 text-sm"
                    />
                </div>

                <ErrorAlert message=error />

                <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                    </span>
                </Button>

                <div class="pt-1 text-xs text-muted-foreground">
                    "Don't have an account? "
                    <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                </div>
            </form>
        </AuthShell>
    }
}

/// Client-side checks before the sign-up request is sent.
pub(crate) fn validate_signup(full_name: &str, email: &str, password: &str) -> Result<(), String> {
    if full_name.trim().is_empty() || email.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let full_name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let success: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let name_val = full_name.get();
        let email_val = email.get();
        let password_val = password.get();

        if let Err(e) = validate_signup(&name_val, &email_val, &password_val) {
            error.set(Some(e));
            return;
        }

        let client = app_state.0.client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match sign_up(&client, &email_val, &password_val, &name_val).await {
                Ok(user) => {
                    log::info!("Account created for {}", user.id);
                    success.set(true);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    };

    view! {
        <AuthShell title="Join NonNotes" description="Create an account to share and save notes.">
            <Show
                when=move || !success.get()
                fallback=|| view! {
                    <div class="flex flex-col gap-2 text-sm">
                        <p class="font-medium">"Account created successfully"</p>
                        <p class="text-muted-foreground">"Please check your email to verify your account."</p>
                        <a class="text-primary underline underline-offset-4" href="/login">"Go to sign in"</a>
                    </div>
                }
            >
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="full_name" class="text-xs">"Full Name"</Label>
                        <Input id="full_name" placeholder="John Doe" bind_value=full_name required=true class="h-8 text-sm" />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="email" class="text-xs">"Email"</Label>
                        <Input
                            id="email"
                            r#type="email"
                            placeholder="name@example.com"
                            bind_value=email
                            required=true
                            class="h-8 text-sm"
                        />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="password" class="text-xs">"Password"</Label>
                        <Input
                            id="password"
                            r#type="password"
                            placeholder="Create a password"
                            bind_value=password
                            required=true
                            class="h-8 text-sm"
                        />
                        <p class="text-xs text-muted-foreground">
                            {format!("Password must be at least {MIN_PASSWORD_LEN} characters")}
                        </p>
                    </div>

                    <ErrorAlert message=error />

                    <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || loading.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if loading.get() { "Creating..." } else { "Create account" }}
                        </span>
                    </Button>

                    <div class="pt-1 text-xs text-muted-foreground">
                        "Already have an account? "
                        <a class="text-primary underline underline-offset-4" href="/login">"Sign in"</a>
                    </div>
                </form>
            </Show>
        </AuthShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_signup() {
        assert!(validate_signup("Ada", "ada@example.com", "longenough").is_ok());
        assert_eq!(
            validate_signup("Ada", "ada@example.com", "short"),
            Err("Password must be at least 8 characters".to_string())
        );
        assert!(validate_signup(" ", "ada@example.com", "longenough").is_err());
    }
}
