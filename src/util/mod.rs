use crate::notes::upload::{path_token, PATH_TOKEN_LEN};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Current time as an ISO-8601 UTC string, the format the tables store.
pub(crate) fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

/// Short base-36 token for storage object names.
pub(crate) fn random_token() -> String {
    let mut buf = [0u8; PATH_TOKEN_LEN];
    if let Err(e) = getrandom::getrandom(&mut buf) {
        log::warn!("getrandom unavailable, falling back to Math.random: {e}");
        for b in buf.iter_mut() {
            *b = (js_sys::Math::random() * 256.0) as u8;
        }
    }
    path_token(&buf)
}

/// Human-readable file size, e.g. "2.0 MB".
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }
}
