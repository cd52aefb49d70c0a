use crate::components::note_card::NoteCard;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, LoadingBlock, NativeSelect};
use crate::models::{Grade, Note, Subject};
use crate::notes::listing::{fetch_notes, sort_notes, NoteFilter, SortKey};
use crate::pages::{is_current_request, next_request_id, AppLayout};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::Display;

/// Which slice of notes a grid shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub(crate) enum GridMode {
    #[default]
    #[strum(serialize = "All Notes")]
    All,
    #[strum(serialize = "Verified Content")]
    Verified,
    #[strum(serialize = "My Uploads")]
    Mine,
    #[strum(serialize = "Saved Notes")]
    Saved,
}

impl GridMode {
    pub fn filter(self) -> NoteFilter {
        match self {
            GridMode::All => NoteFilter::default(),
            GridMode::Verified => NoteFilter::verified(),
            GridMode::Mine => NoteFilter::owned(),
            GridMode::Saved => NoteFilter::saved(),
        }
    }

    /// Signed-out visitors only get the public tabs.
    pub fn visible(signed_in: bool) -> Vec<GridMode> {
        if signed_in {
            vec![GridMode::All, GridMode::Verified, GridMode::Mine, GridMode::Saved]
        } else {
            vec![GridMode::All, GridMode::Verified]
        }
    }

    pub fn shows_filters(self) -> bool {
        matches!(self, GridMode::All | GridMode::Verified)
    }

    /// Heading and hint for an empty grid.
    pub fn empty_copy(self) -> (&'static str, &'static str) {
        match self {
            GridMode::Mine => (
                "You haven't uploaded any notes yet",
                "Share your knowledge by uploading your first note",
            ),
            GridMode::Saved => (
                "You haven't saved any notes yet",
                "Browse notes and save them to access them later",
            ),
            GridMode::All | GridMode::Verified => (
                "No notes found",
                "Try adjusting your filters or check back later",
            ),
        }
    }
}

/// Grade/subject select values into a filter. Empty means "all".
pub(crate) fn apply_selects(mut filter: NoteFilter, grade: &str, subject: &str) -> NoteFilter {
    filter.grade = Grade::parse(grade);
    filter.subject = subject.parse::<Subject>().ok();
    filter
}

fn grade_options() -> Vec<(String, String)> {
    Grade::all()
        .map(|g| (g.value().to_string(), g.to_string()))
        .collect()
}

fn subject_options() -> Vec<(String, String)> {
    Subject::all()
        .map(|s| (s.to_string(), s.to_string()))
        .collect()
}

#[component]
pub fn NoteGrid(mode: GridMode) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let request_id: RwSignal<u64> = RwSignal::new(0);
    let sort_key: RwSignal<SortKey> = RwSignal::new(SortKey::default());
    let grade: RwSignal<String> = RwSignal::new(String::new());
    let subject: RwSignal<String> = RwSignal::new(String::new());

    Effect::new(move |_| {
        let filter = apply_selects(mode.filter(), &grade.get(), &subject.get());
        let user = app_state.0.user();
        let client = app_state.0.client.get();

        let req_id = next_request_id(request_id);
        loading.set(true);

        spawn_local(async move {
            let result = fetch_notes(&client, &filter, user.as_ref()).await;

            // Ignore stale responses.
            if !is_current_request(request_id, req_id) {
                return;
            }
            notes.set(result);
            loading.set(false);
        });
    });

    let sorted = Memo::new(move |_| sort_notes(notes.get(), sort_key.get()));
    let (empty_title, empty_hint) = mode.empty_copy();

    view! {
        <div class="w-full">
            <Show when=move || mode.shows_filters() fallback=|| ().into_view()>
                <div class="mb-6 flex flex-col gap-3 md:flex-row md:items-center md:justify-between">
                    <div class="inline-flex rounded-lg bg-muted p-1">
                        {move || {
                            let current = sort_key.get();
                            SortKey::all()
                                .map(|key| {
                                    let variant = if current == key {
                                        ButtonVariant::Default
                                    } else {
                                        ButtonVariant::Ghost
                                    };
                                    view! {
                                        <Button size=ButtonSize::Sm variant=variant on:click=move |_| sort_key.set(key)>
                                            {key.to_string()}
                                        </Button>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                    <div class="flex gap-2">
                        <NativeSelect options=grade_options() bind_value=grade placeholder="All Grades" class="w-36" />
                        <NativeSelect options=subject_options() bind_value=subject placeholder="All Subjects" class="w-44" />
                    </div>
                </div>
            </Show>

            <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading notes..." /> }>
                <Show
                    when=move || !sorted.with(|n| n.is_empty())
                    fallback=move || view! {
                        <div class="mx-auto max-w-md rounded-xl border p-8 text-center">
                            <h3 class="mb-2 text-lg font-semibold">{empty_title}</h3>
                            <p class="mb-4 text-sm text-muted-foreground">{empty_hint}</p>
                            <Show when=move || mode == GridMode::Mine fallback=|| ().into_view()>
                                <Button href="/notes/create">"Upload Note"</Button>
                            </Show>
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 gap-6 md:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || sorted.get()
                            key=|n| n.id.clone()
                            children=|note| view! { <NoteCard note=note /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
pub fn NotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tab: RwSignal<GridMode> = RwSignal::new(GridMode::All);
    let signed_in = move || app_state.0.auth.with(|a| a.is_signed_in());

    // Falling back when the user signs out on a private tab.
    Effect::new(move |_| {
        if !GridMode::visible(signed_in()).contains(&tab.get()) {
            tab.set(GridMode::All);
        }
    });

    view! {
        <AppLayout>
            <div class="mb-6 flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Browse Notes"</h1>
                {move || {
                    let href = if signed_in() { "/notes/create" } else { "/login" };
                    view! { <Button href=href>"Upload Note"</Button> }
                }}
            </div>

            <div class="mb-6 inline-flex flex-wrap gap-1 rounded-lg bg-muted p-1">
                {move || {
                    let current = tab.get();
                    GridMode::visible(signed_in())
                        .into_iter()
                        .map(|mode| {
                            let variant = if current == mode {
                                ButtonVariant::Outline
                            } else {
                                ButtonVariant::Ghost
                            };
                            view! {
                                <Button size=ButtonSize::Sm variant=variant on:click=move |_| tab.set(mode)>
                                    {mode.to_string()}
                                </Button>
                            }
                        })
                        .collect_view()
                }}
            </div>

            // Re-created per tab so each grid keeps its own filters.
            {move || {
                let mode = tab.get();
                view! { <NoteGrid mode=mode /> }
            }}
        </AppLayout>
    }
}
