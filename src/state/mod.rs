use crate::backend::{AuthBackend, BackendError, SupabaseClient};
use crate::models::{Session, User};
use crate::storage::{load_user_from_storage, save_user_to_storage};
use leptos::prelude::*;

pub(crate) const SIGN_IN_FAILED: &str = "Invalid email or password";
pub(crate) const SIGN_UP_FAILED: &str = "Error creating account";

/// Who is signed in, and whether that is still being checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    /// Startup state: the cached user is shown while the session is checked.
    pub fn initializing(cached: Option<User>) -> Self {
        Self {
            user: cached,
            loading: true,
        }
    }

    pub fn resolved(user: Option<User>) -> Self {
        Self {
            user,
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::resolved(None)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Ask the auth service who the stored token belongs to.
///
/// A rejected token signs the user out. Any other failure keeps the cached
/// user so a flaky connection does not log anyone out.
pub(crate) async fn resolve_session<A: AuthBackend>(auth: &A, cached: Option<User>) -> AuthState {
    match auth.current_user().await {
        Ok(user) => AuthState::resolved(user),
        Err(BackendError::Unauthorized) => {
            log::warn!("Stored session was rejected; signing out");
            AuthState::signed_out()
        }
        Err(e) => {
            log::warn!("Could not check session: {e}");
            AuthState::resolved(cached)
        }
    }
}

pub(crate) async fn sign_in<A: AuthBackend>(
    auth: &A,
    email: &str,
    password: &str,
) -> Result<Session, String> {
    auth.sign_in(email.trim(), password).await.map_err(|e| {
        log::error!("Error signing in: {e}");
        SIGN_IN_FAILED.to_string()
    })
}

pub(crate) async fn sign_up<A: AuthBackend>(
    auth: &A,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<User, String> {
    auth.sign_up(email.trim(), password, full_name.trim())
        .await
        .map_err(|e| {
            log::error!("Error signing up: {e}");
            SIGN_UP_FAILED.to_string()
        })
}

/// Sign out remotely. The local session ends whatever the service says.
pub(crate) async fn end_session<A: AuthBackend>(auth: &A) -> AuthState {
    if let Err(e) = auth.sign_out().await {
        log::warn!("Error signing out: {e}");
    }
    AuthState::signed_out()
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub client: RwSignal<SupabaseClient>,
    pub auth: RwSignal<AuthState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            client: RwSignal::new(SupabaseClient::load_from_storage()),
            auth: RwSignal::new(AuthState::initializing(load_user_from_storage())),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.auth.with(|a| a.user.clone())
    }

    pub fn user_untracked(&self) -> Option<User> {
        self.auth.with_untracked(|a| a.user.clone())
    }

    pub fn apply_session(&self, session: Session) {
        let mut client = self.client.get_untracked();
        client.set_token(session.access_token);
        client.save_to_storage();
        save_user_to_storage(&session.user);

        self.client.set(client);
        self.auth.set(AuthState::resolved(Some(session.user)));
    }

    pub fn clear_session(&self) {
        self.client.update(|c| c.logout());
        self.auth.set(AuthState::signed_out());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;

    fn ada() -> User {
        User {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_initializing_keeps_cached_user() {
        let s = AuthState::initializing(Some(ada()));
        assert!(s.loading);
        assert!(s.is_signed_in());
        assert!(!AuthState::signed_out().is_signed_in());
    }

    #[tokio::test]
    async fn test_resolve_session_reads_current_user() {
        let b = MemoryBackend::new();
        b.set_user(Some(ada()));
        assert_eq!(
            resolve_session(&b, None).await,
            AuthState::resolved(Some(ada()))
        );

        b.set_user(None);
        assert_eq!(resolve_session(&b, Some(ada())).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_resolve_session_keeps_cache_on_network_error() {
        let b = MemoryBackend::new();
        b.fail_on("auth:current_user");
        assert_eq!(
            resolve_session(&b, Some(ada())).await,
            AuthState::resolved(Some(ada()))
        );
    }

    #[tokio::test]
    async fn test_sign_in_error_is_generic() {
        let b = MemoryBackend::new();
        assert_eq!(
            sign_in(&b, "ada@example.com", "").await,
            Err(SIGN_IN_FAILED.to_string())
        );

        let session = sign_in(&b, " ada@example.com ", "pw").await.expect("session");
        assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_sign_up_error_is_generic() {
        let b = MemoryBackend::new();
        b.fail_on("auth:sign_up");
        assert_eq!(
            sign_up(&b, "ada@example.com", "pw", "Ada").await,
            Err(SIGN_UP_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_end_session_signs_out_even_on_error() {
        let b = MemoryBackend::new();
        b.set_user(Some(ada()));
        b.fail_on("auth:sign_out");
        assert_eq!(end_session(&b).await, AuthState::signed_out());
        assert_eq!(b.calls(), vec!["auth:sign_out"]);
    }
}
