use crate::backend::{BackendError, Bucket, DataBackend, StorageBackend, Table, UploadOptions};
use crate::models::{Grade, Note, Subject, User};
use serde_json::json;

pub(crate) const PDF_MIME: &str = "application/pdf";
pub(crate) const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Length of the random part of a stored file name.
pub(crate) const PATH_TOKEN_LEN: usize = 13;

/// A file picked in the browser, already read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Why an upload failed after validation, by what the backend said.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum UploadFailure {
    #[error("Storage bucket not found. Please contact support.")]
    MissingBucket,
    #[error("You don't have permission to upload files. Please sign in again.")]
    PermissionDenied,
    #[error("Upload failed: {0}")]
    Other(String),
}

impl UploadFailure {
    /// Matching is case-insensitive; the storage API reports "Bucket not found".
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("bucket") {
            UploadFailure::MissingBucket
        } else if lower.contains("permission") {
            UploadFailure::PermissionDenied
        } else if message.trim().is_empty() {
            UploadFailure::Other("Please try again".to_string())
        } else {
            UploadFailure::Other(message.to_string())
        }
    }
}

impl From<BackendError> for UploadFailure {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Unauthorized => UploadFailure::PermissionDenied,
            other => UploadFailure::classify(&other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum UploadError {
    #[error("Only PDF files are supported")]
    NotPdf,
    #[error("File size must be less than 10MB")]
    TooLarge,
    #[error("You must be logged in to upload notes")]
    SignedOut,
    #[error("Please fill in all fields and upload a PDF file")]
    MissingFields,
    #[error(transparent)]
    Failed(#[from] UploadFailure),
}

pub(crate) fn validate_file(mime: &str, size: u64) -> Result<(), UploadError> {
    if mime != PDF_MIME {
        return Err(UploadError::NotPdf);
    }
    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}

/// Form state on the create page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct UploadForm {
    pub title: String,
    pub description: String,
    pub grade: Option<Grade>,
    pub subject: Option<Subject>,
    pub file: Option<SelectedFile>,
}

/// A form that passed validation, ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewNote<'a> {
    pub owner_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub grade: Grade,
    pub subject: Subject,
    pub file: &'a SelectedFile,
}

impl UploadForm {
    pub fn validate<'a>(&'a self, user: Option<&'a User>) -> Result<NewNote<'a>, UploadError> {
        let Some(user) = user else {
            return Err(UploadError::SignedOut);
        };

        let title = self.title.trim();
        let description = self.description.trim();
        let (Some(grade), Some(subject), Some(file)) = (self.grade, self.subject, &self.file)
        else {
            return Err(UploadError::MissingFields);
        };
        if title.is_empty() || description.is_empty() {
            return Err(UploadError::MissingFields);
        }
        validate_file(&file.mime, file.size())?;

        Ok(NewNote {
            owner_id: &user.id,
            title,
            description,
            grade,
            subject,
            file,
        })
    }
}

/// `{user_id}/{token}_{now_ms}.{ext}`, keeping the picked file's extension.
pub(crate) fn storage_path(user_id: &str, file_name: &str, token: &str, now_ms: i64) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("pdf");
    format!("{user_id}/{token}_{now_ms}.{ext}")
}

/// Lowercase base-36 characters, one per random byte.
pub(crate) fn path_token(random: &[u8]) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    random
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
        .collect()
}

/// Store the file, then insert the metadata row pointing at its public URL.
pub(crate) async fn upload_note<B: DataBackend + StorageBackend>(
    backend: &B,
    note: &NewNote<'_>,
    path: &str,
) -> Result<Note, UploadError> {
    let options = UploadOptions {
        cache_control: "3600".to_string(),
        upsert: true,
        content_type: Some(PDF_MIME.to_string()),
    };

    backend
        .upload(Bucket::Notes, path, note.file.bytes.clone(), &options)
        .await
        .map_err(|e| {
            log::error!("Error uploading note file: {e}");
            UploadFailure::from(e)
        })?;

    let file_url = backend.public_url(Bucket::Notes, path);

    let row = json!({
        "title": note.title,
        "description": note.description,
        "grade": note.grade.value(),
        "subject": note.subject.to_string(),
        "file_url": file_url,
        "user_id": note.owner_id,
        "likes": 0,
        "views": 0,
        "is_verified": false,
    });

    let inserted = backend.insert(Table::Notes, row).await.map_err(|e| {
        log::error!("Error inserting note row: {e}");
        UploadFailure::from(e)
    })?;

    let first = inserted
        .into_iter()
        .next()
        .ok_or_else(|| UploadFailure::Other("no note was returned".to_string()))?;
    serde_json::from_value(first).map_err(|e| UploadFailure::Other(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: None,
            created_at: None,
        }
    }

    fn pdf(size: usize) -> SelectedFile {
        SelectedFile {
            name: "algebra.pdf".to_string(),
            mime: PDF_MIME.to_string(),
            bytes: vec![0u8; size],
        }
    }

    fn algebra_form() -> UploadForm {
        UploadForm {
            title: "Algebra Basics".to_string(),
            description: "Linear equations and inequalities".to_string(),
            grade: Grade::new(9),
            subject: Some(Subject::Math),
            file: Some(pdf(2 * 1024 * 1024)),
        }
    }

    #[test]
    fn test_validate_file_type_and_size() {
        assert_eq!(validate_file(PDF_MIME, 1), Ok(()));
        assert_eq!(validate_file(PDF_MIME, MAX_FILE_BYTES), Ok(()));
        assert_eq!(
            validate_file(PDF_MIME, MAX_FILE_BYTES + 1),
            Err(UploadError::TooLarge)
        );
        for mime in ["image/png", "application/x-pdf", "", "APPLICATION/PDF", "text/plain"] {
            assert_eq!(validate_file(mime, 10), Err(UploadError::NotPdf), "{mime}");
        }
    }

    #[test]
    fn test_form_requires_user_then_fields() {
        let form = algebra_form();
        assert_eq!(form.validate(None), Err(UploadError::SignedOut));

        let u = user();
        let mut missing = form.clone();
        missing.description = "   ".to_string();
        assert_eq!(missing.validate(Some(&u)), Err(UploadError::MissingFields));

        let mut no_file = form.clone();
        no_file.file = None;
        assert_eq!(no_file.validate(Some(&u)), Err(UploadError::MissingFields));

        let mut no_grade = form.clone();
        no_grade.grade = None;
        assert_eq!(no_grade.validate(Some(&u)), Err(UploadError::MissingFields));

        let mut big = form.clone();
        big.file = Some(pdf(MAX_FILE_BYTES as usize + 1));
        assert_eq!(big.validate(Some(&u)), Err(UploadError::TooLarge));

        let ok = form.validate(Some(&u)).expect("valid");
        assert_eq!(ok.owner_id, "u1");
        assert_eq!(ok.title, "Algebra Basics");
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            UploadFailure::classify("Request failed (404): Bucket not found"),
            UploadFailure::MissingBucket
        );
        assert_eq!(
            UploadFailure::classify("new row violates row-level security: permission denied"),
            UploadFailure::PermissionDenied
        );
        assert_eq!(
            UploadFailure::classify("timeout").to_string(),
            "Upload failed: timeout"
        );
        assert_eq!(
            UploadFailure::from(BackendError::Unauthorized),
            UploadFailure::PermissionDenied
        );
    }

    #[test]
    fn test_storage_path_layout() {
        assert_eq!(
            storage_path("u1", "algebra.final.pdf", "k3j9x0a1b2c3d", 1700000000000),
            "u1/k3j9x0a1b2c3d_1700000000000.pdf"
        );
        assert_eq!(storage_path("u1", "noext", "t", 1), "u1/t_1.pdf");
    }

    #[test]
    fn test_path_token_alphabet() {
        let t = path_token(&[0, 35, 36, 255, 10]);
        assert_eq!(t, "0z03a");
        assert!(t.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_upload_creates_note_with_zeroed_counters() {
        let b = MemoryBackend::new();
        let u = user();
        let form = algebra_form();
        let new_note = form.validate(Some(&u)).expect("valid");
        let path = storage_path(&u.id, &form.file.as_ref().expect("file").name, "tok", 42);

        let note = upload_note(&b, &new_note, &path).await.expect("upload");

        assert_eq!(note.title, "Algebra Basics");
        assert_eq!(note.grade.value(), 9);
        assert_eq!(note.subject, "Math");
        assert_eq!(note.likes, 0);
        assert_eq!(note.views, 0);
        assert!(!note.is_verified);
        assert_eq!(note.user_id.as_deref(), Some("u1"));
        assert_eq!(
            note.file_url,
            "https://demo.supabase.co/storage/v1/object/public/notes/u1/tok_42.pdf"
        );

        let uploads = b.uploads();
        assert_eq!(uploads.len(), 1);
        let (bucket, stored_path, opts) = &uploads[0];
        assert_eq!(*bucket, Bucket::Notes);
        assert_eq!(stored_path, "u1/tok_42.pdf");
        assert!(opts.upsert);
        assert_eq!(opts.content_type.as_deref(), Some(PDF_MIME));
        assert_eq!(b.object(Bucket::Notes, "u1/tok_42.pdf").map(|v| v.len()), Some(2 * 1024 * 1024));

        let sent = b.inserts(Table::Notes);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["likes"], json!(0));
        assert_eq!(sent[0]["views"], json!(0));
        assert_eq!(sent[0]["is_verified"], json!(false));
        assert_eq!(sent[0]["user_id"], json!("u1"));
        assert_eq!(sent[0]["subject"], json!("Math"));
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_path() {
        let b = MemoryBackend::new();
        b.put_object(Bucket::Notes, "u1/tok_42.pdf", b"old");
        let u = user();
        let form = algebra_form();
        let new_note = form.validate(Some(&u)).expect("valid");
        assert!(upload_note(&b, &new_note, "u1/tok_42.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_skips_insert() {
        let b = MemoryBackend::new();
        b.fail_on("upload:notes");
        let u = user();
        let form = algebra_form();
        let new_note = form.validate(Some(&u)).expect("valid");

        let err = upload_note(&b, &new_note, "u1/x.pdf").await.unwrap_err();
        assert!(matches!(err, UploadError::Failed(UploadFailure::Other(_))));
        assert!(b.rows(Table::Notes).is_empty());
        assert_eq!(b.calls(), vec!["upload:notes"]);
    }
}
