use crate::models::User;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "nonnotes_token";
pub(crate) const USER_KEY: &str = "nonnotes_user";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    decode_stored(&json)
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(key, &json);
            }
        }
        Err(e) => log::warn!("Could not encode {key} for storage: {e}"),
    }
}

/// Stored values written by an older build may not decode; treat them as absent.
pub(crate) fn decode_stored<T: for<'de> Deserialize<'de>>(json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring unreadable stored value: {e}");
            None
        }
    }
}

pub(crate) fn save_user_to_storage(user: &User) {
    save_json_to_storage(USER_KEY, user);
}

pub(crate) fn load_user_from_storage() -> Option<User> {
    load_json_from_storage(USER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stored_user() {
        let user: Option<User> =
            decode_stored(r#"{"id":"u1","email":"ada@example.com","created_at":null}"#);
        assert_eq!(user.map(|u| u.id), Some("u1".to_string()));
    }

    #[test]
    fn test_decode_stored_rejects_stale_shape() {
        let legacy: Option<User> = decode_stored(r#"{"extra":{"id":1}}"#);
        assert!(legacy.is_none());
        assert!(decode_stored::<User>("not json").is_none());
    }
}
