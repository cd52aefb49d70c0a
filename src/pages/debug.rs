use crate::backend::{DataBackend, Query, Table};
use crate::components::ui::{
    Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, ErrorAlert,
};
use crate::config::{ConfigPresence, EnvConfig};
use crate::models::Note;
use crate::pages::AppLayout;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

const SAMPLE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Connection {
    Checking,
    Connected,
    Failed,
}

impl Connection {
    fn label(self) -> &'static str {
        match self {
            Connection::Checking => "Checking...",
            Connection::Connected => "Connected",
            Connection::Failed => "Failed",
        }
    }

    fn badge(self) -> BadgeVariant {
        match self {
            Connection::Connected => BadgeVariant::Verified,
            _ => BadgeVariant::Outline,
        }
    }
}

fn presence_badge(set: bool) -> BadgeVariant {
    if set {
        BadgeVariant::Verified
    } else {
        BadgeVariant::Outline
    }
}

/// Connection diagnostics: configuration presence, a one-row ping and a
/// small sample of notes.
#[component]
pub fn DebugPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let presence = EnvConfig::from_window().presence();
    let status: RwSignal<Connection> = RwSignal::new(Connection::Checking);
    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let check_connection = move || {
        let client = app_state.0.client.get_untracked();
        status.set(Connection::Checking);
        error.set(None);
        spawn_local(async move {
            match client.select(Table::Notes, &Query::new().limit(1)).await {
                Ok(_) => status.set(Connection::Connected),
                Err(e) => {
                    log::error!("Connection check failed: {e}");
                    status.set(Connection::Failed);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let fetch_sample = move |_: leptos::ev::MouseEvent| {
        let client = app_state.0.client.get_untracked();
        error.set(None);
        spawn_local(async move {
            match client
                .select_as::<Note>(Table::Notes, &Query::new().limit(SAMPLE_SIZE))
                .await
            {
                Ok(rows) => notes.set(rows),
                Err(e) => {
                    log::error!("Error fetching sample notes: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    check_connection();

    view! {
        <AppLayout>
            <Card class="mx-auto w-full max-w-3xl">
                <CardHeader>
                    <CardTitle>"Connection Debugger"</CardTitle>
                    <CardDescription>"Check the backend connection and view database records"</CardDescription>
                </CardHeader>
                <CardContent class="flex flex-col gap-6">
                    <div class="grid gap-3 text-sm">
                        <div class="flex items-center justify-between">
                            <span class="font-medium">"Connection Status:"</span>
                            {move || {
                                let s = status.get();
                                view! { <Badge variant=s.badge()>{s.label()}</Badge> }
                            }}
                        </div>
                        <div class="flex items-center justify-between">
                            <span class="font-medium">"SUPABASE_URL:"</span>
                            <Badge variant=presence_badge(presence.url)>{ConfigPresence::label(presence.url)}</Badge>
                        </div>
                        <div class="flex items-center justify-between">
                            <span class="font-medium">"SUPABASE_ANON_KEY:"</span>
                            <Badge variant=presence_badge(presence.key)>{ConfigPresence::label(presence.key)}</Badge>
                        </div>
                    </div>

                    <ErrorAlert message=error />

                    <div class="flex flex-col gap-2">
                        <h3 class="text-lg font-medium">{move || format!("Notes Data ({})", notes.with(Vec::len))}</h3>
                        <Show
                            when=move || !notes.with(|n| n.is_empty())
                            fallback=|| view! { <p class="text-sm text-muted-foreground">"No notes loaded."</p> }
                        >
                            <ul class="divide-y rounded-md border text-sm">
                                <For
                                    each=move || notes.get()
                                    key=|n| n.id.clone()
                                    children=|note| view! {
                                        <li class="flex justify-between px-3 py-2">
                                            <span>{note.title}</span>
                                            <span class="text-muted-foreground">{format!("{} · {}", note.grade, note.subject)}</span>
                                        </li>
                                    }
                                />
                            </ul>
                        </Show>
                    </div>

                    <div class="flex gap-2">
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| check_connection()>
                            "Check Connection"
                        </Button>
                        <Button size=ButtonSize::Sm on:click=fetch_sample>"Fetch Notes"</Button>
                    </div>
                </CardContent>
            </Card>
        </AppLayout>
    }
}
