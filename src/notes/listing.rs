use crate::backend::{BackendResult, DataBackend, Query, Table};
use crate::models::{parse_timestamp, Grade, Note, SavedNote, Subject, User};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Which notes a grid shows. Applied server-side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteFilter {
    pub verified_only: bool,
    /// Only the signed-in user's uploads. Ignored when signed out.
    pub owner_only: bool,
    /// Only notes the signed-in user saved. Ignored when signed out.
    pub saved_only: bool,
    pub grade: Option<Grade>,
    pub subject: Option<Subject>,
    pub limit: Option<usize>,
}

impl NoteFilter {
    pub fn verified() -> Self {
        Self {
            verified_only: true,
            ..Self::default()
        }
    }

    pub fn owned() -> Self {
        Self {
            owner_only: true,
            ..Self::default()
        }
    }

    pub fn saved() -> Self {
        Self {
            saved_only: true,
            ..Self::default()
        }
    }

    /// `saved_ids` is the resolved saved-note set when `saved_only` applies.
    pub fn to_query(&self, user: Option<&User>, saved_ids: Option<&[String]>) -> Query {
        let mut q = Query::new();

        if self.verified_only {
            q = q.eq("is_verified", true);
        }
        if let (true, Some(u)) = (self.owner_only, user) {
            q = q.eq("user_id", u.id.as_str());
        }
        if let Some(ids) = saved_ids {
            q = q.is_in("id", ids.iter().map(String::as_str));
        }
        if let Some(g) = self.grade {
            q = q.eq("grade", g.value());
        }
        if let Some(s) = self.subject {
            q = q.eq("subject", s.to_string());
        }
        if let Some(n) = self.limit {
            q = q.limit(n);
        }
        q
    }
}

/// Client-side display order, one per tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter)]
pub(crate) enum SortKey {
    #[default]
    #[strum(serialize = "Hot")]
    MostLiked,
    #[strum(serialize = "New")]
    MostRecent,
    #[strum(serialize = "Top")]
    MostViewed,
}

impl SortKey {
    pub fn all() -> impl Iterator<Item = SortKey> {
        Self::iter()
    }
}

/// Stable, descending. Notes whose timestamp does not parse sort last under
/// [`SortKey::MostRecent`].
pub(crate) fn sort_notes(mut notes: Vec<Note>, key: SortKey) -> Vec<Note> {
    match key {
        SortKey::MostLiked => notes.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::MostViewed => notes.sort_by(|a, b| b.views.cmp(&a.views)),
        SortKey::MostRecent => notes.sort_by_cached_key(|n| {
            std::cmp::Reverse(parse_timestamp(&n.created_at))
        }),
    }
    notes
}

pub(crate) async fn saved_note_ids<D: DataBackend>(
    data: &D,
    user_id: &str,
) -> BackendResult<Vec<String>> {
    let rows: Vec<SavedNote> = data
        .select_as(Table::SavedNotes, &Query::new().eq("user_id", user_id))
        .await?;
    Ok(rows.into_iter().map(|r| r.note_id).collect())
}

pub(crate) async fn try_fetch_notes<D: DataBackend>(
    data: &D,
    filter: &NoteFilter,
    user: Option<&User>,
) -> BackendResult<Vec<Note>> {
    let saved_ids = match (filter.saved_only, user) {
        (true, Some(u)) => {
            let ids = saved_note_ids(data, &u.id).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            Some(ids)
        }
        _ => None,
    };

    data.select_each(Table::Notes, &filter.to_query(user, saved_ids.as_deref()))
        .await
}

/// Failures are logged and come back as an empty list.
pub(crate) async fn fetch_notes<D: DataBackend>(
    data: &D,
    filter: &NoteFilter,
    user: Option<&User>,
) -> Vec<Note> {
    match try_fetch_notes(data, filter, user).await {
        Ok(notes) => notes,
        Err(e) => {
            log::error!("Error fetching notes: {e}");
            Vec::new()
        }
    }
}

/// The user's uploads, newest first.
pub(crate) async fn fetch_user_notes<D: DataBackend>(data: &D, user: &User) -> Vec<Note> {
    let q = Query::new()
        .eq("user_id", user.id.as_str())
        .order_by("created_at", false);
    match data.select_each(Table::Notes, &q).await {
        Ok(notes) => notes,
        Err(e) => {
            log::error!("Error fetching user notes: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use serde_json::json;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            created_at: None,
        }
    }

    fn note_row(id: &str, owner: &str, likes: i64, views: i64, created_at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Note {id}"),
            "description": "",
            "grade": 9,
            "subject": "Math",
            "file_url": format!("https://demo.supabase.co/storage/v1/object/public/notes/{owner}/{id}.pdf"),
            "is_verified": likes > 5,
            "likes": likes,
            "views": views,
            "user_id": owner,
            "created_at": created_at,
        })
    }

    fn note(id: &str, likes: i64, views: i64, created_at: &str) -> Note {
        serde_json::from_value(note_row(id, "u1", likes, views, created_at)).expect("note")
    }

    fn seeded() -> MemoryBackend {
        let b = MemoryBackend::new();
        b.seed(Table::Notes, note_row("n1", "u1", 10, 3, "2024-01-01T00:00:00Z"));
        b.seed(Table::Notes, note_row("n2", "u2", 2, 30, "2024-03-01T00:00:00Z"));
        b.seed(Table::Notes, note_row("n3", "u1", 7, 1, "2024-02-01T00:00:00Z"));
        let mut chem = note_row("n4", "u2", 0, 0, "2024-04-01T00:00:00Z");
        chem["subject"] = json!("Chemistry");
        chem["grade"] = json!(11);
        b.seed(Table::Notes, chem);
        b
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_to_query_builds_only_requested_clauses() {
        let u = user("u1");
        assert!(NoteFilter::default().to_query(Some(&u), None).filters.is_empty());

        let f = NoteFilter {
            verified_only: true,
            owner_only: true,
            grade: Grade::new(9),
            subject: Some(Subject::Math),
            limit: Some(3),
            ..NoteFilter::default()
        };
        let params = f.to_query(Some(&u), None).to_params();
        assert_eq!(
            params,
            vec![
                ("is_verified".to_string(), "eq.true".to_string()),
                ("user_id".to_string(), "eq.u1".to_string()),
                ("grade".to_string(), "eq.9".to_string()),
                ("subject".to_string(), "eq.Math".to_string()),
                ("limit".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_owner_filter_ignored_when_signed_out() {
        let q = NoteFilter::owned().to_query(None, None);
        assert!(q.filters.is_empty());
    }

    #[test]
    fn test_sort_most_recent_is_non_increasing() {
        let notes = vec![
            note("a", 0, 0, "2024-01-01T00:00:00Z"),
            note("b", 0, 0, "not a date"),
            note("c", 0, 0, "2024-05-01T08:30:00.123456+00:00"),
            note("d", 0, 0, "2024-03-01T00:00:00+02:00"),
        ];
        let sorted = sort_notes(notes, SortKey::MostRecent);
        assert_eq!(ids(&sorted), vec!["c", "d", "a", "b"]);

        let stamps: Vec<_> = sorted
            .iter()
            .filter_map(|n| parse_timestamp(&n.created_at))
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_counts_are_non_increasing_and_stable() {
        let notes = vec![
            note("a", 3, 9, "2024-01-01T00:00:00Z"),
            note("b", 8, 1, "2024-01-01T00:00:00Z"),
            note("c", 3, 4, "2024-01-01T00:00:00Z"),
        ];

        let liked = sort_notes(notes.clone(), SortKey::MostLiked);
        assert_eq!(ids(&liked), vec!["b", "a", "c"]);
        assert!(liked.windows(2).all(|w| w[0].likes >= w[1].likes));

        let viewed = sort_notes(notes, SortKey::MostViewed);
        assert_eq!(ids(&viewed), vec!["a", "c", "b"]);
        assert!(viewed.windows(2).all(|w| w[0].views >= w[1].views));
    }

    #[test]
    fn test_sort_key_tab_labels() {
        let labels: Vec<String> = SortKey::all().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["Hot", "New", "Top"]);
        assert_eq!(SortKey::default(), SortKey::MostLiked);
    }

    #[tokio::test]
    async fn test_fetch_applies_server_side_filters() {
        let b = seeded();
        let u = user("u1");

        let all = fetch_notes(&b, &NoteFilter::default(), None).await;
        assert_eq!(all.len(), 4);

        let verified = fetch_notes(&b, &NoteFilter::verified(), None).await;
        assert_eq!(ids(&verified), vec!["n1", "n3"]);

        let mine = fetch_notes(&b, &NoteFilter::owned(), Some(&u)).await;
        assert_eq!(ids(&mine), vec!["n1", "n3"]);

        let chem = NoteFilter {
            grade: Grade::new(11),
            subject: Some(Subject::Chemistry),
            ..NoteFilter::default()
        };
        assert_eq!(ids(&fetch_notes(&b, &chem, None).await), vec!["n4"]);

        let limited = NoteFilter {
            limit: Some(2),
            ..NoteFilter::default()
        };
        assert_eq!(fetch_notes(&b, &limited, None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_saved_only_with_no_saved_ids_skips_notes_query() {
        let b = seeded();
        let u = user("u1");

        let notes = fetch_notes(&b, &NoteFilter::saved(), Some(&u)).await;
        assert!(notes.is_empty());
        assert_eq!(b.calls(), vec!["select:saved_notes"]);
    }

    #[tokio::test]
    async fn test_saved_only_filters_by_saved_ids() {
        let b = seeded();
        let u = user("u1");
        b.seed(Table::SavedNotes, json!({"note_id": "n2", "user_id": "u1"}));
        b.seed(Table::SavedNotes, json!({"note_id": "n4", "user_id": "u1"}));
        b.seed(Table::SavedNotes, json!({"note_id": "n1", "user_id": "u9"}));

        let notes = fetch_notes(&b, &NoteFilter::saved(), Some(&u)).await;
        assert_eq!(ids(&notes), vec!["n2", "n4"]);
        assert_eq!(b.calls(), vec!["select:saved_notes", "select:notes"]);
    }

    #[tokio::test]
    async fn test_fetch_error_collapses_to_empty_list() {
        let b = seeded();
        b.fail_on("select:notes");
        assert!(fetch_notes(&b, &NoteFilter::default(), None).await.is_empty());
        assert!(try_fetch_notes(&b, &NoteFilter::default(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_null_and_malformed_rows_do_not_empty_the_feed() {
        let b = MemoryBackend::new();
        let mut sparse = note_row("n1", "u1", 0, 0, "2024-01-01T00:00:00Z");
        sparse["description"] = json!(null);
        sparse["likes"] = json!(null);
        b.seed(Table::Notes, sparse);
        b.seed(Table::Notes, note_row("n2", "u1", 4, 1, "2024-02-01T00:00:00Z"));
        let mut broken = note_row("n3", "u1", 1, 1, "2024-03-01T00:00:00Z");
        broken["title"] = json!(null);
        b.seed(Table::Notes, broken);

        let notes = try_fetch_notes(&b, &NoteFilter::default(), None)
            .await
            .expect("bad rows are skipped, not fatal");
        assert_eq!(ids(&notes), vec!["n1", "n2"]);
        assert_eq!(notes[0].description, "");
        assert_eq!(notes[0].likes, 0);

        assert_eq!(ids(&fetch_user_notes(&b, &user("u1")).await), vec!["n2", "n1"]);
    }

    #[tokio::test]
    async fn test_fetch_user_notes_newest_first() {
        let b = seeded();
        let notes = fetch_user_notes(&b, &user("u1")).await;
        assert_eq!(ids(&notes), vec!["n3", "n1"]);
    }
}
