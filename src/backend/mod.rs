//! Boundaries to the hosted backend: auth, tables, object storage.
//!
//! Everything above this module talks to the traits, so pages get the
//! reqwest-backed [`SupabaseClient`] from context while tests plug in the
//! in-memory backend.

#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod query;
pub(crate) mod supabase;

pub(crate) use query::Query;
pub(crate) use supabase::SupabaseClient;

use crate::models::{Session, User};
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{AsRefStr, Display};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum BackendError {
    #[error("Backend is not configured")]
    NotConfigured,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Request failed ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl BackendError {
    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }
}

pub(crate) type BackendResult<T> = Result<T, BackendError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
pub(crate) enum Table {
    #[strum(serialize = "notes")]
    Notes,
    #[strum(serialize = "note_likes")]
    NoteLikes,
    #[strum(serialize = "saved_notes")]
    SavedNotes,
    #[strum(serialize = "deleted_notes")]
    DeletedNotes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
pub(crate) enum Bucket {
    #[strum(serialize = "notes")]
    Notes,
    #[strum(serialize = "trash")]
    Trash,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UploadOptions {
    pub cache_control: String,
    pub upsert: bool,
    pub content_type: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            upsert: false,
            content_type: None,
        }
    }
}

pub(crate) trait AuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session>;

    /// Creates the account. The user usually still has to confirm the email
    /// before signing in, so no session is returned.
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> BackendResult<User>;

    async fn sign_out(&self) -> BackendResult<()>;

    /// `Ok(None)` when there is no stored session.
    async fn current_user(&self) -> BackendResult<Option<User>>;
}

pub(crate) trait DataBackend {
    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>>;

    /// Returns the inserted rows as stored (server defaults filled in).
    async fn insert(&self, table: Table, row: Value) -> BackendResult<Vec<Value>>;

    async fn update(&self, table: Table, query: &Query, patch: Value) -> BackendResult<()>;

    async fn delete(&self, table: Table, query: &Query) -> BackendResult<()>;

    async fn rpc(&self, function: &str, args: Value) -> BackendResult<Value>;

    async fn select_as<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> BackendResult<Vec<T>> {
        decode_rows(self.select(table, query).await?)
    }

    /// Like [`DataBackend::select_as`], but a row that does not decode is
    /// logged and skipped instead of failing the whole read.
    async fn select_each<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> BackendResult<Vec<T>> {
        Ok(decode_rows_lossy(table, self.select(table, query).await?))
    }
}

pub(crate) trait StorageBackend {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> BackendResult<()>;

    fn public_url(&self, bucket: Bucket, path: &str) -> String;

    async fn download(&self, bucket: Bucket, path: &str) -> BackendResult<Vec<u8>>;

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> BackendResult<()>;
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> BackendResult<Vec<T>> {
    rows.into_iter()
        .map(|r| serde_json::from_value(r).map_err(BackendError::parse))
        .collect()
}

pub(crate) fn decode_rows_lossy<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|r| match serde_json::from_value(r) {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("Skipping malformed {table} row: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteLike;

    #[test]
    fn test_table_and_bucket_names() {
        assert_eq!(Table::NoteLikes.as_ref(), "note_likes");
        assert_eq!(Table::DeletedNotes.to_string(), "deleted_notes");
        assert_eq!(Bucket::Trash.as_ref(), "trash");
    }

    #[test]
    fn test_upload_options_default() {
        let o = UploadOptions::default();
        assert_eq!(o.cache_control, "3600");
        assert!(!o.upsert);
        assert!(o.content_type.is_none());
    }

    #[test]
    fn test_decode_rows_reports_bad_rows() {
        let ok: Vec<NoteLike> =
            decode_rows(vec![serde_json::json!({"note_id": "n1", "user_id": "u1"})])
                .expect("valid row");
        assert_eq!(ok[0].note_id, "n1");

        let err = decode_rows::<NoteLike>(vec![serde_json::json!({"note_id": 1})]).unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));

        let kept: Vec<NoteLike> = decode_rows_lossy(
            Table::NoteLikes,
            vec![
                serde_json::json!({"note_id": 1}),
                serde_json::json!({"note_id": "n2", "user_id": "u1"}),
            ],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].note_id, "n2");
    }

    #[test]
    fn test_error_display() {
        let e = BackendError::Http {
            status: 404,
            body: "Bucket not found".to_string(),
        };
        assert_eq!(e.to_string(), "Request failed (404): Bucket not found");
    }
}
