//! Note flows shared by the pages: listing, engagement, upload and trash.

pub(crate) mod engagement;
pub(crate) mod listing;
pub(crate) mod trash;
pub(crate) mod upload;
