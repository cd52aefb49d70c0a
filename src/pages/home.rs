use crate::components::note_card::NoteCard;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Card, CardContent, LoadingBlock};
use crate::models::Note;
use crate::notes::listing::{fetch_notes, sort_notes, NoteFilter, SortKey};
use crate::pages::AppLayout;
use crate::state::AppContext;
use icons::{BadgeCheck, Search, Upload};
use leptos::prelude::*;
use leptos::task::spawn_local;

const FEATURED_COUNT: usize = 3;

/// A few of the most liked notes, for the landing page.
#[component]
fn FeaturedNotes() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);

    let client = app_state.0.client.get_untracked();
    spawn_local(async move {
        let filter = NoteFilter {
            limit: Some(FEATURED_COUNT),
            ..NoteFilter::default()
        };
        let fetched = fetch_notes(&client, &filter, None).await;
        notes.set(sort_notes(fetched, SortKey::MostLiked));
        loading.set(false);
    });

    view! {
        <section class="py-16">
            <div class="mx-auto max-w-5xl px-4">
                <h2 class="text-center text-3xl font-bold tracking-tight">"Featured Notes"</h2>
                <p class="mb-8 text-center text-muted-foreground">"Popular content from our community"</p>
                <Show when=move || !loading.get() fallback=|| view! { <LoadingBlock label="Loading notes..." /> }>
                    <Show
                        when=move || !notes.with(|n| n.is_empty())
                        fallback=|| view! {
                            <p class="text-center text-sm text-muted-foreground">"No notes have been shared yet."</p>
                        }
                    >
                        <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
                            <For
                                each=move || notes.get()
                                key=|n| n.id.clone()
                                children=|note| view! { <NoteCard note=note /> }
                            />
                        </div>
                    </Show>
                </Show>
                <div class="mt-8 text-center">
                    <Button variant=ButtonVariant::Outline href="/notes">"View All Notes"</Button>
                </div>
            </div>
        </section>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    view! {
        <AppLayout>
            <section class="bg-gradient-to-b from-background to-muted py-20 text-center">
                <div class="mx-auto max-w-3xl px-4">
                    <h1 class="mb-2 text-5xl font-bold tracking-tight">"NonNotes"</h1>
                    <h2 class="mb-6 text-2xl font-medium text-muted-foreground">
                        "Class notes sharing platform for students grades 6-12"
                    </h2>
                    <p class="mb-8 text-lg text-muted-foreground">
                        "Discover, share, and access class notes organized by subject and grade level. "
                        "Collaborate with peers and find verified content to help you succeed."
                    </p>
                    <div class="flex flex-col justify-center gap-4 sm:flex-row">
                        {move || {
                            let start = if app_state.0.user().is_some() { "/notes/create" } else { "/signup" };
                            view! { <Button size=ButtonSize::Lg href=start>"Start Sharing Notes"</Button> }
                        }}
                        <Button size=ButtonSize::Lg variant=ButtonVariant::Outline href="/notes">
                            "Browse Notes"
                        </Button>
                    </div>
                </div>
            </section>

            <section class="py-16 text-center">
                <div class="mx-auto max-w-5xl px-4">
                    <h2 class="text-3xl font-bold tracking-tight">"How It Works"</h2>
                    <p class="mb-10 text-muted-foreground">"Simple, intuitive, and designed for students"</p>
                    <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
                        <Card>
                            <CardContent class="flex flex-col items-center gap-3 pt-6">
                                <Search class="size-8 text-primary" />
                                <h3 class="text-lg font-semibold">"Discover Notes"</h3>
                                <p class="text-sm text-muted-foreground">
                                    "Browse through our clean feed interface with filtering options"
                                </p>
                            </CardContent>
                        </Card>
                        <Card>
                            <CardContent class="flex flex-col items-center gap-3 pt-6">
                                <Upload class="size-8 text-primary" />
                                <h3 class="text-lg font-semibold">"Share Your Notes"</h3>
                                <p class="text-sm text-muted-foreground">
                                    "Upload your class notes as PDFs with a title, grade and subject"
                                </p>
                            </CardContent>
                        </Card>
                        <Card>
                            <CardContent class="flex flex-col items-center gap-3 pt-6">
                                <BadgeCheck class="size-8 text-primary" />
                                <h3 class="text-lg font-semibold">"Verified Content"</h3>
                                <p class="text-sm text-muted-foreground">
                                    "Access admin-approved notes in our verified content section"
                                </p>
                            </CardContent>
                        </Card>
                    </div>
                </div>
            </section>

            <FeaturedNotes />
        </AppLayout>
    }
}
