use crate::backend::{BackendError, BackendResult, DataBackend, Query, Table};
use crate::models::{Grade, Note, NoteLike, Subject, User};
use serde_json::json;

pub(crate) const INCREMENT_VIEWS_RPC: &str = "increment_note_views";

/// Best effort: a failed view bump is logged and otherwise ignored.
pub(crate) async fn record_view<D: DataBackend>(data: &D, note_id: &str) {
    if let Err(e) = data
        .rpc(INCREMENT_VIEWS_RPC, json!({ "note_uuid": note_id }))
        .await
    {
        log::warn!("Error incrementing views for {note_id}: {e}");
    }
}

pub(crate) async fn fetch_note<D: DataBackend>(data: &D, id: &str) -> BackendResult<Option<Note>> {
    let rows: Vec<Note> = data
        .select_as(Table::Notes, &Query::new().eq("id", id).limit(1))
        .await?;
    Ok(rows.into_iter().next())
}

/// What the detail page does on open: bump the view counter, then read the note.
pub(crate) async fn open_note<D: DataBackend>(data: &D, id: &str) -> BackendResult<Option<Note>> {
    if id.trim().is_empty() {
        return Ok(None);
    }
    record_view(data, id).await;
    fetch_note(data, id).await
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LikeToggle {
    /// Signed out: nothing was sent.
    Skipped,
    Liked { likes: i64 },
    Unliked { likes: i64 },
}

impl LikeToggle {
    /// Apply the outcome to the locally held note.
    pub fn apply(self, note: &mut Note) {
        match self {
            LikeToggle::Skipped => {}
            LikeToggle::Liked { likes } | LikeToggle::Unliked { likes } => note.likes = likes,
        }
    }

    /// Whether the user now likes the note; `None` when nothing was sent.
    pub fn liked(self) -> Option<bool> {
        match self {
            LikeToggle::Skipped => None,
            LikeToggle::Liked { .. } => Some(true),
            LikeToggle::Unliked { .. } => Some(false),
        }
    }
}

fn like_query(note_id: &str, user_id: &str) -> Query {
    Query::new().eq("note_id", note_id).eq("user_id", user_id)
}

async fn write_like_count<D: DataBackend>(data: &D, note_id: &str, likes: i64) -> BackendResult<()> {
    data.update(
        Table::Notes,
        &Query::new().eq("id", note_id),
        json!({ "likes": likes }),
    )
    .await
}

pub(crate) async fn has_liked<D: DataBackend>(data: &D, note_id: &str, user_id: &str) -> BackendResult<bool> {
    let rows = data
        .select(Table::NoteLikes, &like_query(note_id, user_id).limit(1))
        .await?;
    Ok(!rows.is_empty())
}

/// Like or unlike `note` as `user`.
///
/// The join row and the counter are two writes. When the counter write fails
/// the join-row write is undone before the error is returned.
pub(crate) async fn toggle_like<D: DataBackend>(
    data: &D,
    note: &Note,
    user: Option<&User>,
) -> BackendResult<LikeToggle> {
    let Some(user) = user else {
        return Ok(LikeToggle::Skipped);
    };

    let row = NoteLike {
        note_id: note.id.clone(),
        user_id: user.id.clone(),
    };
    let row_json = serde_json::to_value(&row).map_err(BackendError::parse)?;

    if has_liked(data, &note.id, &user.id).await? {
        data.delete(Table::NoteLikes, &like_query(&note.id, &user.id))
            .await?;

        let likes = (note.likes - 1).max(0);
        if let Err(e) = write_like_count(data, &note.id, likes).await {
            log::error!("Error updating like count for {}: {e}", note.id);
            if let Err(undo) = data.insert(Table::NoteLikes, row_json).await {
                log::error!("Could not restore like row for {}: {undo}", note.id);
            }
            return Err(e);
        }
        Ok(LikeToggle::Unliked { likes })
    } else {
        data.insert(Table::NoteLikes, row_json).await?;

        let likes = note.likes + 1;
        if let Err(e) = write_like_count(data, &note.id, likes).await {
            log::error!("Error updating like count for {}: {e}", note.id);
            if let Err(undo) = data
                .delete(Table::NoteLikes, &like_query(&note.id, &user.id))
                .await
            {
                log::error!("Could not remove like row for {}: {undo}", note.id);
            }
            return Err(e);
        }
        Ok(LikeToggle::Liked { likes })
    }
}

/// Owner edit of a note's descriptive fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteEdit {
    pub title: String,
    pub description: String,
    pub grade: Grade,
    pub subject: Subject,
}

pub(crate) async fn update_note<D: DataBackend>(
    data: &D,
    note_id: &str,
    edit: &NoteEdit,
    updated_at: &str,
) -> BackendResult<()> {
    data.update(
        Table::Notes,
        &Query::new().eq("id", note_id),
        json!({
            "title": edit.title.trim(),
            "description": edit.description,
            "grade": edit.grade.value(),
            "subject": edit.subject.to_string(),
            "updated_at": updated_at,
        }),
    )
    .await
}

/// URL for the embedded reader. Files on the backend's own storage embed as
/// is; anything else goes through the Google Docs viewer.
pub(crate) fn viewer_url(file_url: &str) -> String {
    if file_url.contains("supabase.co") {
        file_url.to_string()
    } else {
        format!(
            "https://docs.google.com/viewer?embedded=true&url={}",
            urlencoding::encode(file_url)
        )
    }
}
