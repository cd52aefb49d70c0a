mod app;
mod backend;
mod components;
mod config;
mod models;
mod notes;
mod pages;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::backend::SupabaseClient;
    use crate::models::User;
    use crate::storage::{load_user_from_storage, save_user_to_storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_client_storage_roundtrip_token() {
        SupabaseClient::clear_storage();

        let mut c = SupabaseClient::load_from_storage();
        assert!(c.token.is_none());

        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = SupabaseClient::load_from_storage();
        assert_eq!(c2.token.as_deref(), Some("t1"));

        c2.clone().logout();
        let c3 = SupabaseClient::load_from_storage();
        assert!(c3.token.is_none());
        assert!(load_user_from_storage().is_none());
    }

    #[wasm_bindgen_test]
    fn test_user_storage_roundtrip() {
        let user = User {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            created_at: None,
        };
        save_user_to_storage(&user);
        let loaded = load_user_from_storage().expect("should load user from localStorage");
        assert_eq!(loaded, user);
        SupabaseClient::clear_storage();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Debug);
    mount_to_body(App);
}
