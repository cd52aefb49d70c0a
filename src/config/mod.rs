use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend.
///
/// Read from `window.ENV` at startup. Both `SUPABASE_URL` and the lower-case
/// `supabase_url` spelling are accepted, and the same goes for the API key.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

/// Whether each required setting is present. Shown on the debug page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ConfigPresence {
    pub url: bool,
    pub key: bool,
}

impl ConfigPresence {
    pub fn label(set: bool) -> &'static str {
        if set {
            "Set"
        } else {
            "Not set"
        }
    }
}

impl EnvConfig {
    pub fn new(supabase_url: impl Into<String>, supabase_anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into().trim().trim_end_matches('/').to_string(),
            supabase_anon_key: supabase_anon_key.into().trim().to_string(),
        }
    }

    pub fn from_window() -> Self {
        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return Self::default();
        };
        if env.is_undefined() || !env.is_object() {
            return Self::default();
        }

        let read = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| js_sys::Reflect::get(&env, &(*k).into()).ok()?.as_string())
                .unwrap_or_default()
        };

        Self::new(
            read(&["SUPABASE_URL", "supabase_url"]),
            read(&["SUPABASE_ANON_KEY", "supabase_anon_key"]),
        )
    }

    pub fn presence(&self) -> ConfigPresence {
        ConfigPresence {
            url: !self.supabase_url.is_empty(),
            key: !self.supabase_anon_key.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash_and_whitespace() {
        let cfg = EnvConfig::new(" https://demo.supabase.co/ ", " anon ");
        assert_eq!(cfg.supabase_url, "https://demo.supabase.co");
        assert_eq!(cfg.supabase_anon_key, "anon");
        assert_eq!(cfg.presence(), ConfigPresence { url: true, key: true });
    }

    #[test]
    fn test_presence_reports_each_setting() {
        let cfg = EnvConfig::new("https://demo.supabase.co", "");
        let p = cfg.presence();
        assert!(p.url);
        assert!(!p.key);
        assert_eq!(ConfigPresence::label(p.url), "Set");
        assert_eq!(ConfigPresence::label(p.key), "Not set");
    }

    #[test]
    fn test_default_is_unconfigured() {
        assert_eq!(
            EnvConfig::default().presence(),
            ConfigPresence { url: false, key: false }
        );
    }
}
