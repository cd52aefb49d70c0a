use crate::backend::{BackendResult, Bucket, DataBackend, Query, StorageBackend, Table, UploadOptions};
use crate::models::{DeletedNote, Note, User};
use serde_json::json;

const PUBLIC_OBJECT_MARKER: &str = "storage/v1/object/public/";

/// Object path inside the `notes` bucket, from a public file URL.
pub(crate) fn object_path_from_public_url(file_url: &str) -> Option<String> {
    let (_, rest) = file_url.split_once(PUBLIC_OBJECT_MARKER)?;
    let (bucket, path) = rest.split_once('/')?;
    let path = path.split(['?', '#']).next().unwrap_or_default();
    (bucket == Bucket::Notes.as_ref() && !path.is_empty()).then(|| path.to_string())
}

/// Where a deleted note's file lives in the `trash` bucket.
///
/// Delete and purge both derive the key from here. URLs that are not our
/// public object URLs fall back to their last path segment.
pub(crate) fn trash_key(note_id: &str, file_url: &str) -> Option<String> {
    let path = object_path_from_public_url(file_url).or_else(|| {
        file_url
            .split(['?', '#'])
            .next()
            .and_then(|u| u.rsplit('/').next())
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .map(str::to_string)
    })?;
    Some(format!("{note_id}/{path}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FileOutcome {
    /// File copied to trash.
    Moved,
    /// The URL did not point at a stored object; nothing to copy.
    NotStored,
    /// Copy failed. The note row is already gone.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DeleteReport {
    pub note_id: String,
    pub file: FileOutcome,
}

impl DeleteReport {
    pub fn message(&self) -> &'static str {
        match self.file {
            FileOutcome::Moved | FileOutcome::NotStored => "Note deleted",
            FileOutcome::Failed(_) => "Note deleted, but its file could not be moved to trash",
        }
    }
}

/// Delete the note row, then copy its file into the trash bucket.
///
/// The row delete is authoritative; the file copy is best effort and its
/// outcome is reported, not raised. The source object is left in place.
/// No `deleted_notes` row is written here.
pub(crate) async fn delete_note<B: DataBackend + StorageBackend>(
    backend: &B,
    note: &Note,
) -> BackendResult<DeleteReport> {
    backend
        .delete(Table::Notes, &Query::new().eq("id", note.id.as_str()))
        .await?;

    let file = match (
        object_path_from_public_url(&note.file_url),
        trash_key(&note.id, &note.file_url),
    ) {
        (Some(source), Some(key)) => copy_to_trash(backend, &source, &key).await,
        _ => FileOutcome::NotStored,
    };

    if let FileOutcome::Failed(e) = &file {
        log::warn!("Note {} deleted but file was not moved to trash: {e}", note.id);
    }

    Ok(DeleteReport {
        note_id: note.id.clone(),
        file,
    })
}

async fn copy_to_trash<S: StorageBackend>(storage: &S, source: &str, key: &str) -> FileOutcome {
    let bytes = match storage.download(Bucket::Notes, source).await {
        Ok(b) => b,
        Err(e) => return FileOutcome::Failed(e.to_string()),
    };
    let options = UploadOptions {
        upsert: true,
        ..UploadOptions::default()
    };
    match storage.upload(Bucket::Trash, key, bytes, &options).await {
        Ok(()) => FileOutcome::Moved,
        Err(e) => FileOutcome::Failed(e.to_string()),
    }
}

pub(crate) async fn try_list_trash<D: DataBackend>(
    data: &D,
    user: &User,
) -> BackendResult<Vec<DeletedNote>> {
    data.select_each(
        Table::DeletedNotes,
        &Query::new()
            .eq("user_id", user.id.as_str())
            .order_by("deleted_at", false),
    )
    .await
}

/// The user's trashed notes, newest deletions first. Failures are logged and
/// come back as an empty list.
pub(crate) async fn list_trash<D: DataBackend>(data: &D, user: &User) -> Vec<DeletedNote> {
    match try_list_trash(data, user).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error fetching deleted notes: {e}");
            Vec::new()
        }
    }
}

/// Put a trashed note back under its original id, owned by `user`, then
/// drop the trash row.
///
/// If the trash row cannot be dropped the re-inserted note is removed again,
/// so the note is never in both places.
pub(crate) async fn restore_note<D: DataBackend>(
    data: &D,
    deleted: &DeletedNote,
    user: &User,
) -> BackendResult<()> {
    let row = json!({
        "id": deleted.original_id,
        "title": deleted.title,
        "description": deleted.description,
        "grade": deleted.grade.value(),
        "subject": deleted.subject,
        "file_url": deleted.file_url,
        "user_id": user.id,
        "created_at": deleted.created_at,
    });
    data.insert(Table::Notes, row).await?;

    if let Err(e) = data
        .delete(Table::DeletedNotes, &Query::new().eq("id", deleted.id.as_str()))
        .await
    {
        log::error!("Error clearing trash entry {}: {e}", deleted.id);
        if let Err(undo) = data
            .delete(
                Table::Notes,
                &Query::new().eq("id", deleted.original_id.as_str()),
            )
            .await
        {
            log::error!("Could not undo restore of {}: {undo}", deleted.original_id);
        }
        return Err(e);
    }
    Ok(())
}

/// Drop the trash row for good, then remove its file. The file removal is
/// best effort and only logged.
pub(crate) async fn purge_note<B: DataBackend + StorageBackend>(
    backend: &B,
    deleted: &DeletedNote,
) -> BackendResult<()> {
    backend
        .delete(
            Table::DeletedNotes,
            &Query::new().eq("id", deleted.id.as_str()),
        )
        .await?;

    if let Some(key) = trash_key(&deleted.original_id, &deleted.file_url) {
        if let Err(e) = backend.remove(Bucket::Trash, &[key]).await {
            log::warn!("Error removing trashed file for {}: {e}", deleted.id);
        }
    }
    Ok(())
}
