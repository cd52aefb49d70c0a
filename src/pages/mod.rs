mod about;
mod auth;
mod create_note;
mod debug;
mod home;
mod layout;
mod note_detail;
mod notes;
mod profile;

pub use about::AboutPage;
pub use auth::{LoginPage, SignupPage};
pub use create_note::CreateNotePage;
pub use debug::DebugPage;
pub use home::HomePage;
pub use layout::AppLayout;
pub use note_detail::NoteDetailPage;
pub use notes::NotesPage;
pub use profile::ProfilePage;

use crate::components::ui::LoadingBlock;
use crate::state::AppContext;
use leptos::prelude::*;

/// Renders `children` for a signed-in user, the login page otherwise.
/// While the session is still being checked a spinner is shown instead.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let auth = app_state.0.auth;

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show
            when=move || !auth.with(|a| a.loading && a.user.is_none())
            fallback=|| view! { <LoadingBlock label="Checking session..." /> }
        >
            <Show when=move || auth.with(|a| a.is_signed_in()) fallback=move || view! { <LoginPage /> }>
                {move || children.with_value(|c| c())}
            </Show>
        </Show>
    }
}

/// Bumps and returns a page-local request counter; a response is applied only
/// if the counter still holds its id when it lands.
pub(crate) fn next_request_id(counter: RwSignal<u64>) -> u64 {
    let id = counter.get_untracked().saturating_add(1);
    counter.set(id);
    id
}

pub(crate) fn is_current_request(counter: RwSignal<u64>, id: u64) -> bool {
    counter.get_untracked() == id
}
