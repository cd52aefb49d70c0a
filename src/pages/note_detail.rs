use crate::components::ui::{
    Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Card, CardContent, ErrorAlert, Input,
    Label, LoadingBlock, NativeSelect, Spinner, Textarea,
};
use crate::models::{format_long_date, Grade, Note, Subject};
use crate::notes::engagement::{has_liked, open_note, toggle_like, update_note, viewer_url, NoteEdit};
use crate::notes::trash::delete_note;
use crate::pages::{is_current_request, next_request_id, AppLayout};
use crate::state::AppContext;
use crate::util::now_iso;
use icons::{Check, Download, Eye, Heart};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

/// Edit form values to a [`NoteEdit`], or the message to show.
pub(crate) fn parse_edit(
    title: &str,
    description: &str,
    grade: &str,
    subject: &str,
) -> Result<NoteEdit, &'static str> {
    if title.trim().is_empty() {
        return Err("Title is required");
    }
    let grade = Grade::parse(grade).ok_or("Please choose a grade")?;
    let subject = subject
        .parse::<Subject>()
        .map_err(|_| "Please choose a subject")?;
    Ok(NoteEdit {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        grade,
        subject,
    })
}

#[component]
fn EditNoteForm(note: RwSignal<Option<Note>>, on_done: Callback<()>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let current = note.get_untracked();

    let title: RwSignal<String> =
        RwSignal::new(current.as_ref().map(|n| n.title.clone()).unwrap_or_default());
    let description: RwSignal<String> = RwSignal::new(
        current
            .as_ref()
            .map(|n| n.description.clone())
            .unwrap_or_default(),
    );
    let grade: RwSignal<String> = RwSignal::new(
        current
            .as_ref()
            .map(|n| n.grade.value().to_string())
            .unwrap_or_default(),
    );
    let subject: RwSignal<String> =
        RwSignal::new(current.as_ref().map(|n| n.subject.clone()).unwrap_or_default());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = note.with_untracked(|n| n.as_ref().map(|n| n.id.clone())) else {
            return;
        };
        let edit = match parse_edit(&title.get(), &description.get(), &grade.get(), &subject.get()) {
            Ok(e) => e,
            Err(msg) => {
                error.set(Some(msg.to_string()));
                return;
            }
        };

        let client = app_state.0.client.get_untracked();
        saving.set(true);
        error.set(None);

        spawn_local(async move {
            let updated_at = now_iso();
            match update_note(&client, &id, &edit, &updated_at).await {
                Ok(()) => {
                    note.update(|n| {
                        if let Some(n) = n {
                            n.title = edit.title.clone();
                            n.description = edit.description.clone();
                            n.grade = edit.grade;
                            n.subject = edit.subject.to_string();
                            n.updated_at = Some(updated_at);
                        }
                    });
                    on_done.run(());
                }
                Err(e) => {
                    log::error!("Error updating note {id}: {e}");
                    error.set(Some(
                        "There was an error updating your note. Please try again.".to_string(),
                    ));
                }
            }
            saving.set(false);
        });
    };

    let grades: Vec<(String, String)> = Grade::all()
        .map(|g| (g.value().to_string(), g.to_string()))
        .collect();
    let subjects: Vec<(String, String)> = Subject::all()
        .map(|s| (s.to_string(), s.to_string()))
        .collect();

    view! {
        <form class="flex flex-col gap-3 rounded-lg border p-4" on:submit=on_submit>
            <h3 class="font-semibold">"Edit Note"</h3>
            <div class="flex flex-col gap-1.5">
                <Label html_for="edit_title" class="text-xs">"Title"</Label>
                <Input id="edit_title" bind_value=title required=true />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="edit_description" class="text-xs">"Description"</Label>
                <Textarea id="edit_description" bind_value=description rows=3 />
            </div>
            <div class="grid grid-cols-2 gap-3">
                <NativeSelect options=grades bind_value=grade placeholder="Grade" />
                <NativeSelect options=subjects bind_value=subject placeholder="Subject" />
            </div>
            <ErrorAlert message=error />
            <div class="flex justify-end gap-2">
                <button
                    type="button"
                    class="inline-flex h-8 items-center rounded-md border px-3 text-sm font-medium hover:bg-accent"
                    on:click=move |_| on_done.run(())
                >
                    "Cancel"
                </button>
                <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                    <Show when=move || saving.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    "Save changes"
                </Button>
            </div>
        </form>
    }
}

/// Owner-only edit and delete controls.
#[component]
fn NoteActions(note: RwSignal<Option<Note>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let editing: RwSignal<bool> = RwSignal::new(false);
    let confirming: RwSignal<bool> = RwSignal::new(false);
    let deleting: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_delete = move |_: leptos::ev::MouseEvent| {
        let Some(target) = note.get_untracked() else {
            return;
        };
        let client = app_state.0.client.get_untracked();
        deleting.set(true);
        error.set(None);

        spawn_local(async move {
            match delete_note(&client, &target).await {
                Ok(report) => {
                    log::info!("{} ({})", report.message(), report.note_id);
                    navigate.with_value(|nav| nav("/notes", Default::default()));
                }
                Err(e) => {
                    log::error!("Error deleting note {}: {e}", target.id);
                    error.set(Some(
                        "There was an error deleting your note. Please try again.".to_string(),
                    ));
                }
            }
            deleting.set(false);
            confirming.set(false);
        });
    };

    view! {
        <div class="flex flex-col gap-3">
            <div class="flex gap-2">
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| editing.update(|v| *v = !*v)>
                    "Edit"
                </Button>
                <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=move |_| confirming.set(true)>
                    "Delete"
                </Button>
            </div>

            <Show when=move || editing.get() fallback=|| ().into_view()>
                <EditNoteForm note=note on_done=Callback::new(move |_| editing.set(false)) />
            </Show>

            <Show when=move || confirming.get() fallback=|| ().into_view()>
                <div class="flex flex-col gap-2 rounded-lg border border-destructive/30 p-4 text-sm">
                    <p class="font-medium">"Are you sure?"</p>
                    <p class="text-muted-foreground">
                        "This removes the note from NonNotes. A copy of its file is kept in trash storage, but the note will not show up in your trash bin."
                    </p>
                    <div class="flex justify-end gap-2">
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| confirming.set(false)>
                            "Cancel"
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:disabled=move || deleting.get()
                            on:click=on_delete
                        >
                            <Show when=move || deleting.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            "Delete note"
                        </Button>
                    </div>
                </div>
            </Show>

            <ErrorAlert message=error />
        </div>
    }
}

#[component]
pub fn NoteDetailPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params_map();
    let note_id = move || params.with(|p| p.get("id").unwrap_or_default());

    let note: RwSignal<Option<Note>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let liked: RwSignal<bool> = RwSignal::new(false);
    let liking: RwSignal<bool> = RwSignal::new(false);
    let likes: RwSignal<i64> = RwSignal::new(0);
    let request_id: RwSignal<u64> = RwSignal::new(0);

    // Only the id drives this; signing in later just refreshes the like state below.
    Effect::new(move |_| {
        let id = note_id();
        let client = app_state.0.client.get_untracked();
        let req_id = next_request_id(request_id);

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = open_note(&client, &id).await;
            if !is_current_request(request_id, req_id) {
                return;
            }
            match result {
                Ok(found) => {
                    likes.set(found.as_ref().map(|n| n.likes).unwrap_or_default());
                    note.set(found);
                }
                Err(e) => {
                    log::error!("Error fetching note {id}: {e}");
                    note.set(None);
                    error.set(Some("Failed to load note".to_string()));
                }
            }
            loading.set(false);
        });
    });

    Effect::new(move |_| {
        let user = app_state.0.user();
        let id = note.with(|n| n.as_ref().map(|n| n.id.clone()));
        let (Some(user), Some(id)) = (user, id) else {
            liked.set(false);
            return;
        };
        let client = app_state.0.client.get_untracked();
        spawn_local(async move {
            match has_liked(&client, &id, &user.id).await {
                Ok(v) => liked.set(v),
                Err(e) => log::warn!("Error checking like state: {e}"),
            }
        });
    });

    let on_like = move |_: leptos::ev::MouseEvent| {
        let Some(current) = note.get_untracked() else {
            return;
        };
        let user = app_state.0.user_untracked();
        if user.is_none() || liking.get_untracked() {
            return;
        }
        let client = app_state.0.client.get_untracked();
        liking.set(true);

        spawn_local(async move {
            match toggle_like(&client, &current, user.as_ref()).await {
                Ok(outcome) => {
                    // Untracked so the viewer iframe is not rebuilt on every like.
                    note.update_untracked(|n| {
                        if let Some(n) = n {
                            outcome.apply(n);
                            likes.set(n.likes);
                        }
                    });
                    if let Some(now_liked) = outcome.liked() {
                        liked.set(now_liked);
                    }
                }
                Err(e) => log::error!("Error toggling like: {e}"),
            }
            liking.set(false);
        });
    };

    let signed_in = move || app_state.0.auth.with(|a| a.is_signed_in());
    let is_owner = move || {
        let user = app_state.0.user();
        note.with(|n| n.as_ref().is_some_and(|n| n.is_owned_by(user.as_ref())))
    };

    view! {
        <AppLayout>
            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading note..." /> }>
                <Show
                    when=move || note.with(|n| n.is_some())
                    fallback=move || view! {
                        <div class="mx-auto max-w-md py-12 text-center">
                            <h2 class="mb-4 text-2xl font-bold">
                                {move || error.get().unwrap_or_else(|| "Note not found".to_string())}
                            </h2>
                            <Button href="/notes">"Back to Notes"</Button>
                        </div>
                    }
                >
                    {move || note.get().map(|n| {
                        let viewer = viewer_url(&n.file_url);
                        let file_url = n.file_url.clone();
                        let verified = n.is_verified;
                        view! {
                            <div class="flex flex-col gap-6">
                                <div class="flex flex-col gap-3">
                                    <a href="/notes" class="text-sm text-muted-foreground hover:text-foreground">"Back to Notes"</a>
                                    <div class="flex flex-wrap items-center gap-2">
                                        <h1 class="text-2xl font-bold">{n.title.clone()}</h1>
                                        <Show when=move || verified fallback=|| ().into_view()>
                                            <Badge variant=BadgeVariant::Verified>
                                                <Check />
                                                "Verified"
                                            </Badge>
                                        </Show>
                                    </div>
                                    <div class="flex flex-wrap items-center gap-2 text-sm text-muted-foreground">
                                        <Badge variant=BadgeVariant::Outline>{n.grade.to_string()}</Badge>
                                        <Badge>{n.subject.clone()}</Badge>
                                        <span>{format!("Uploaded {}", format_long_date(&n.created_at))}</span>
                                    </div>
                                    <p class="text-sm">{n.description.clone()}</p>
                                </div>

                                <Card>
                                    <CardContent class="flex flex-wrap items-center gap-3">
                                        {move || {
                                            let variant = if liked.get() {
                                                ButtonVariant::Liked
                                            } else {
                                                ButtonVariant::Outline
                                            };
                                            view! {
                                                <Button
                                                    size=ButtonSize::Sm
                                                    variant=variant
                                                    attr:disabled=move || !signed_in() || liking.get()
                                                    attr:title=move || if signed_in() { "Like this note" } else { "Sign in to like notes" }
                                                    on:click=on_like
                                                >
                                                    <Heart />
                                                    {move || likes.get()}
                                                </Button>
                                            }
                                        }}
                                        <span class="inline-flex items-center gap-1 text-sm text-muted-foreground">
                                            <Eye class="size-4" />
                                            {n.views}
                                            " views"
                                        </span>
                                        <Button size=ButtonSize::Sm variant=ButtonVariant::Outline href=file_url.clone() attr:target="_blank" attr:download="">
                                            <Download />
                                            "Download PDF"
                                        </Button>
                                        <a href=file_url class="text-sm text-primary underline-offset-4 hover:underline" target="_blank" rel="noopener">
                                            "Open in new tab"
                                        </a>
                                        <Show when=move || !signed_in() fallback=|| ().into_view()>
                                            <span class="text-xs text-muted-foreground">
                                                <a href="/login" class="text-primary underline underline-offset-4">"Sign in"</a>
                                                " to like or save this note"
                                            </span>
                                        </Show>
                                    </CardContent>
                                </Card>

                                <Show when=is_owner fallback=|| ().into_view()>
                                    <NoteActions note=note />
                                </Show>

                                <div class="overflow-hidden rounded-xl border">
                                    <iframe
                                        src=viewer
                                        title=n.title.clone()
                                        class="h-[80vh] w-full"
                                        allow="autoplay; fullscreen"
                                        prop:loading="lazy"
                                    ></iframe>
                                </div>
                            </div>
                        }
                    })}
                </Show>
            </Show>
        </AppLayout>
    }
}
