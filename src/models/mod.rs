use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// School grade a note is written for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub(crate) struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 5;
    pub const MAX: u8 = 12;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }

    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u8>().ok().and_then(Self::new)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grade {}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub(crate) enum Subject {
    Math,
    Science,
    English,
    #[strum(serialize = "Social Science")]
    SocialScience,
    History,
    Biology,
    Chemistry,
    Physics,
}

impl Subject {
    pub fn all() -> impl Iterator<Item = Subject> {
        Self::iter()
    }
}

/// Columns come back as `null` as often as they go missing; both read as
/// the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A shared note as stored in the `notes` table.
///
/// `subject` stays a plain string so rows written with a subject outside
/// [`Subject`] still render.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub grade: Grade,
    pub subject: String,
    pub file_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Note {
    pub fn is_owned_by(&self, user: Option<&User>) -> bool {
        match (user, &self.user_id) {
            (Some(u), Some(owner)) => &u.id == owner,
            _ => false,
        }
    }
}

/// Row of the `deleted_notes` table, read by the trash bin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct DeletedNote {
    pub id: String,
    pub original_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub grade: Grade,
    pub subject: String,
    pub file_url: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted_at: String,
}

/// Join row: one user's like on one note.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteLike {
    pub note_id: String,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SavedNote {
    pub note_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Local part of the email, used as a display name.
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }

    pub fn initial(&self) -> String {
        self.email
            .as_deref()
            .and_then(|e| e.chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "U".to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub access_token: String,
    pub user: User,
}

pub(crate) fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s.trim(), &Rfc3339).ok()
}

/// "January 5, 2024". Falls back to the raw string when it does not parse.
pub(crate) fn format_long_date(s: &str) -> String {
    match parse_timestamp(s) {
        Some(t) => format!("{} {}, {}", t.month(), t.day(), t.year()),
        None => s.to_string(),
    }
}
