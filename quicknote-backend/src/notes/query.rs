//! Visible-list projection: case-insensitive search filter, newest update first.

use note_types::Note;

/// Notes whose title or content contains `query` (case-insensitive; empty
/// matches all), ordered by `updated` descending.
///
/// `sort_by` is stable, so notes with equal `updated` keep their collection
/// order and do not swap places between renders.
pub fn visible_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.to_lowercase();
    let mut visible: Vec<&Note> = notes
        .iter()
        .filter(|note| note.matches_lowercase(&needle))
        .collect();
    visible.sort_by(|a, b| b.updated.cmp(&a.updated));
    visible
}
