use crate::pages::{
    AboutPage, CreateNotePage, DebugPage, HomePage, LoginPage, NoteDetailPage, NotesPage,
    ProfilePage, SignupPage,
};
use crate::state::{resolve_session, AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppState::new();
    provide_context(AppContext(app_state));

    // Confirm the stored token once at startup. The cached user stays on
    // screen meanwhile; a rejected token clears everything.
    let client = app_state.client.get_untracked();
    let cached = app_state.user_untracked();
    spawn_local(async move {
        let resolved = resolve_session(&client, cached).await;
        // A sign-in that finished first wins.
        if app_state.client.with_untracked(|c| c.token != client.token) {
            return;
        }
        if resolved.is_signed_in() {
            app_state.auth.set(resolved);
        } else {
            app_state.clear_session();
        }
    });

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("signup") view=SignupPage />
                <Route path=path!("notes") view=NotesPage />
                <Route path=path!("notes/create") view=CreateNotePage />
                <Route path=path!("notes/:id") view=NoteDetailPage />
                <Route path=path!("profile") view=ProfilePage />
                <Route path=path!("about") view=AboutPage />
                <Route path=path!("debug") view=DebugPage />
                <Route path=path!("") view=HomePage />
            </Routes>
        </Router>
    }
}
