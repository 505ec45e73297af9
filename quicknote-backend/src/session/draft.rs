//! Edit buffer holding the in-progress title/content until it is saved.

use note_types::{MAX_TITLE_LEN, Note, PLACEHOLDER_TITLE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub content: String,
}

impl EditBuffer {
    /// Buffer mirroring a stored note
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }

    /// Buffer for a freshly created note
    pub fn fresh() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            content: String::new(),
        }
    }

    /// Replace the title, cut to `MAX_TITLE_LEN` characters
    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(MAX_TITLE_LEN).collect();
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_bounded_by_characters() {
        let mut buf = EditBuffer::fresh();
        let long: String = "é".repeat(MAX_TITLE_LEN + 30);
        buf.set_title(&long);
        assert_eq!(buf.title.chars().count(), MAX_TITLE_LEN);

        buf.set_title("short");
        assert_eq!(buf.title, "short");
    }

    #[test]
    fn test_content_is_unbounded() {
        let mut buf = EditBuffer::fresh();
        let body = "line\n".repeat(10_000);
        buf.set_content(&body);
        assert_eq!(buf.content, body);
    }
}
