pub mod note_card;
pub mod ui;
