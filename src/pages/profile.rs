use crate::components::note_card::NoteCard;
use crate::components::ui::{
    Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, ErrorAlert, LoadingBlock, Spinner,
};
use crate::models::{format_long_date, DeletedNote, Note, User};
use crate::notes::listing::fetch_user_notes;
use crate::notes::trash::{list_trash, purge_note, restore_note};
use crate::pages::{AppLayout, RequireAuth};
use crate::state::{end_session, AppContext};
use icons::{FileText, RotateCcw, Trash2};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProfileTab {
    Account,
    Notes,
    Trash,
}

impl ProfileTab {
    fn label(self) -> &'static str {
        match self {
            ProfileTab::Account => "Profile",
            ProfileTab::Notes => "My Notes",
            ProfileTab::Trash => "Trash Bin",
        }
    }
}

#[component]
fn AccountInfo(user: User) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let signing_out: RwSignal<bool> = RwSignal::new(false);

    let on_sign_out = move |_: leptos::ev::MouseEvent| {
        let client = app_state.0.client.get_untracked();
        signing_out.set(true);
        spawn_local(async move {
            let _ = end_session(&client).await;
            app_state.0.clear_session();
            signing_out.set(false);
            navigate.with_value(|nav| nav("/", Default::default()));
        });
    };

    let created = user
        .created_at
        .as_deref()
        .map(format_long_date)
        .unwrap_or_else(|| "Unknown".to_string());

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"Account Information"</CardTitle>
                <CardDescription>"Your personal account details"</CardDescription>
            </CardHeader>
            <CardContent class="flex flex-col gap-4">
                <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                    <div>
                        <p class="text-sm font-medium text-muted-foreground">"Email"</p>
                        <p>{user.email.clone().unwrap_or_default()}</p>
                    </div>
                    <div>
                        <p class="text-sm font-medium text-muted-foreground">"Account Created"</p>
                        <p>{created}</p>
                    </div>
                </div>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:disabled=move || signing_out.get()
                    on:click=on_sign_out
                >
                    "Sign Out"
                </Button>
            </CardContent>
        </Card>
    }
}

#[component]
fn MyNotes(user: User) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);

    let client = app_state.0.client.get_untracked();
    spawn_local(async move {
        notes.set(fetch_user_notes(&client, &user).await);
        loading.set(false);
    });

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading notes..." /> }>
            <Show
                when=move || !notes.with(|n| n.is_empty())
                fallback=|| view! {
                    <div class="rounded-xl border p-8 text-center">
                        <h3 class="mb-2 text-lg font-semibold">"You haven't uploaded any notes yet"</h3>
                        <p class="mb-4 text-sm text-muted-foreground">"Share your knowledge by uploading your first note"</p>
                        <Button href="/notes/create">"Upload Note"</Button>
                    </div>
                }
            >
                <div class="grid grid-cols-1 gap-6 md:grid-cols-2">
                    <For
                        each=move || notes.get()
                        key=|n| n.id.clone()
                        children=|note| view! { <NoteCard note=note /> }
                    />
                </div>
            </Show>
        </Show>
    }
}

#[component]
fn TrashRow(
    deleted: DeletedNote,
    busy: RwSignal<Option<String>>,
    on_restore: Callback<DeletedNote>,
    on_purge: Callback<DeletedNote>,
) -> impl IntoView {
    let confirming: RwSignal<bool> = RwSignal::new(false);
    let row_id = deleted.id.clone();
    let is_busy = move || busy.with(|b| b.as_deref() == Some(row_id.as_str()));
    let for_restore = deleted.clone();
    let for_purge = deleted.clone();

    view! {
        <div class="flex flex-col gap-3 rounded-lg border p-4 md:flex-row md:items-center md:justify-between">
            <div class="min-w-0">
                <h3 class="truncate font-medium">{deleted.title.clone()}</h3>
                <div class="mt-1 flex flex-wrap items-center gap-2 text-xs text-muted-foreground">
                    <Badge variant=BadgeVariant::Outline>{deleted.grade.to_string()}</Badge>
                    <Badge>{deleted.subject.clone()}</Badge>
                    <span>{format!("Deleted {}", format_long_date(&deleted.deleted_at))}</span>
                </div>
            </div>
            <div class="flex shrink-0 items-center gap-2">
                <Show when=is_busy fallback=|| ().into_view()>
                    <Spinner />
                </Show>
                <Show
                    when=move || !confirming.get()
                    fallback=move || {
                        let for_purge = for_purge.clone();
                        view! {
                            <span class="text-xs text-muted-foreground">"Delete forever?"</span>
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=move |_| confirming.set(false)>
                                "Cancel"
                            </Button>
                            <Button
                                variant=ButtonVariant::Destructive
                                size=ButtonSize::Sm
                                on:click=move |_| {
                                    confirming.set(false);
                                    on_purge.run(for_purge.clone());
                                }
                            >
                                "Delete"
                            </Button>
                        }
                    }
                >
                    {
                        let for_restore = for_restore.clone();
                        view! {
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || busy.with(|b| b.is_some())
                                on:click=move |_| on_restore.run(for_restore.clone())
                            >
                                <RotateCcw />
                                "Restore"
                            </Button>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                attr:disabled=move || busy.with(|b| b.is_some())
                                on:click=move |_| confirming.set(true)
                            >
                                <Trash2 />
                                "Delete permanently"
                            </Button>
                        }
                    }
                </Show>
            </div>
        </div>
    }
}

#[component]
fn TrashBin(user: User) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let rows: RwSignal<Vec<DeletedNote>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let busy: RwSignal<Option<String>> = RwSignal::new(None);
    let message: RwSignal<Option<String>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let owner = StoredValue::new(user.clone());

    let client = app_state.0.client.get_untracked();
    spawn_local(async move {
        rows.set(list_trash(&client, &user).await);
        loading.set(false);
    });

    let on_restore = Callback::new(move |deleted: DeletedNote| {
        let client = app_state.0.client.get_untracked();
        let user = owner.get_value();
        busy.set(Some(deleted.id.clone()));
        message.set(None);
        error.set(None);
        spawn_local(async move {
            match restore_note(&client, &deleted, &user).await {
                Ok(()) => {
                    rows.update(|r| r.retain(|n| n.id != deleted.id));
                    message.set(Some("Note restored".to_string()));
                }
                Err(e) => {
                    log::error!("Error restoring note {}: {e}", deleted.id);
                    error.set(Some(
                        "There was an error restoring your note. Please try again.".to_string(),
                    ));
                }
            }
            busy.set(None);
        });
    });

    let on_purge = Callback::new(move |deleted: DeletedNote| {
        let client = app_state.0.client.get_untracked();
        busy.set(Some(deleted.id.clone()));
        message.set(None);
        error.set(None);
        spawn_local(async move {
            match purge_note(&client, &deleted).await {
                Ok(()) => {
                    rows.update(|r| r.retain(|n| n.id != deleted.id));
                    message.set(Some("Note permanently deleted".to_string()));
                }
                Err(e) => {
                    log::error!("Error purging note {}: {e}", deleted.id);
                    error.set(Some(
                        "There was an error deleting your note. Please try again.".to_string(),
                    ));
                }
            }
            busy.set(None);
        });
    });

    view! {
        <div class="flex flex-col gap-4">
            <Show when=move || message.get().is_some() fallback=|| ().into_view()>
                <p class="text-sm text-emerald-700">{move || message.get().unwrap_or_default()}</p>
            </Show>
            <ErrorAlert message=error />

            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading trash..." /> }>
                <Show
                    when=move || !rows.with(|r| r.is_empty())
                    fallback=|| view! {
                        <div class="rounded-xl border p-8 text-center">
                            <h3 class="mb-2 text-lg font-semibold">"Trash bin is empty"</h3>
                            <p class="text-sm text-muted-foreground">
                                "Notes you delete will appear here so you can restore them later."
                            </p>
                        </div>
                    }
                >
                    <div class="flex flex-col gap-3">
                        <For
                            each=move || rows.get()
                            key=|d| d.id.clone()
                            children=move |deleted| view! {
                                <TrashRow deleted=deleted busy=busy on_restore=on_restore on_purge=on_purge />
                            }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ProfileContent() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tab: RwSignal<ProfileTab> = RwSignal::new(ProfileTab::Account);
    let user = Memo::new(move |_| app_state.0.user());

    view! {
        {move || user.get().map(|user| {
            let name = user.display_name();
            let initial = user.initial();
            let email = user.email.clone().unwrap_or_default();
            view! {
                <div class="mx-auto flex max-w-4xl flex-col gap-6">
                    <div class="flex items-center gap-4 rounded-xl bg-primary p-6 text-primary-foreground">
                        <span class="inline-flex size-14 items-center justify-center rounded-full bg-background text-xl font-semibold text-primary">
                            {initial}
                        </span>
                        <div>
                            <h1 class="text-2xl font-bold">{name}</h1>
                            <p class="text-sm opacity-80">{email}</p>
                        </div>
                    </div>

                    {move || {
                        let current = tab.get();
                        [ProfileTab::Account, ProfileTab::Notes, ProfileTab::Trash]
                            .into_iter()
                            .map(|t| {
                                let variant = if current == t { ButtonVariant::Outline } else { ButtonVariant::Ghost };
                                view! {
                                    <Button size=ButtonSize::Sm variant=variant on:click=move |_| tab.set(t)>
                                        {match t {
                                            ProfileTab::Trash => view! { <Trash2 /> }.into_any(),
                                            _ => view! { <FileText /> }.into_any(),
                                        }}
                                        {t.label()}
                                    </Button>
                                }
                            })
                            .collect_view()
                    }}

                    {
                        let user = user.clone();
                        move || match tab.get() {
                            ProfileTab::Account => view! { <AccountInfo user=user.clone() /> }.into_any(),
                            ProfileTab::Notes => view! { <MyNotes user=user.clone() /> }.into_any(),
                            ProfileTab::Trash => view! { <TrashBin user=user.clone() /> }.into_any(),
                        }
                    }
                </div>
            }
        })}
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <RequireAuth>
            <AppLayout>
                <ProfileContent />
            </AppLayout>
        </RequireAuth>
    }
}
