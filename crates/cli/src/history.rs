//! Conversation history and export.
//!
//! History is append-only for the lifetime of the session: display order is
//! most-recent-first, export order is chronological.

use ragchat_core::AppResult;
use std::path::{Path, PathBuf};

/// File name used for every history export.
pub const HISTORY_FILE_NAME: &str = "chat_history.txt";

/// One question/answer pair, appended in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

/// Append-only conversation history.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries are never reordered or removed.
    pub fn push(&mut self, question: &str, answer: &str) {
        self.entries.push(HistoryEntry {
            question: question.to_string(),
            answer: answer.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in chronological order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Render the history for display, most recent entry first.
    ///
    /// Numbering stays chronological, so the newest entry carries the
    /// highest number.
    pub fn render(&self) -> String {
        let mut output = String::new();

        for (idx, entry) in self.entries.iter().enumerate().rev() {
            output.push_str(&format!("Q{}: {}\n", idx + 1, entry.question));
            output.push_str(&format!("A{}: {}\n", idx + 1, entry.answer));
        }

        output
    }

    /// Serialize all entries in chronological order for export.
    ///
    /// Format per entry: `Q<n>:<question>`, `A<n>:<answer>`, blank line;
    /// 1-indexed. Repeated export with no new entries is byte-identical.
    fn serialize(&self) -> String {
        let mut output = String::new();

        for (idx, entry) in self.entries.iter().enumerate() {
            output.push_str(&format!("Q{}:{}\n", idx + 1, entry.question));
            output.push_str(&format!("A{}:{}\n", idx + 1, entry.answer));
            output.push('\n');
        }

        output
    }

    /// Write the history to `<output_dir>/chat_history.txt`.
    ///
    /// Creates the directory if absent and overwrites any prior file of the
    /// same name. Returns the path written.
    pub fn export(&self, output_dir: &Path) -> AppResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join(HISTORY_FILE_NAME);
        std::fs::write(&path, self.serialize())?;

        tracing::info!("Exported {} history entries to {:?}", self.len(), path);

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_history() -> History {
        let mut history = History::new();
        history.push("What is the capital of France?", "Paris.");
        history.push("Is it beautiful?", "Yes, Paris is beautiful.");
        history
    }

    #[test]
    fn test_display_order_is_reverse_of_insertion() {
        let history = sample_history();
        let rendered = history.render();

        let newest = rendered.find("Q2: Is it beautiful?").unwrap();
        let oldest = rendered.find("Q1: What is the capital of France?").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn test_export_order_is_chronological() {
        let history = sample_history();
        let temp = TempDir::new().unwrap();

        let path = history.export(temp.path()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert_eq!(
            contents,
            "Q1:What is the capital of France?\nA1:Paris.\n\nQ2:Is it beautiful?\nA2:Yes, Paris is beautiful.\n\n"
        );
    }

    #[test]
    fn test_export_is_idempotent() {
        let history = sample_history();
        let temp = TempDir::new().unwrap();

        let path = history.export(temp.path()).unwrap();
        let first = std::fs::read(&path).unwrap();

        history.export(temp.path()).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_export_creates_output_dir() {
        let history = sample_history();
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("response");

        let path = history.export(&nested).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), HISTORY_FILE_NAME);
    }

    #[test]
    fn test_export_empty_history() {
        let history = History::new();
        let temp = TempDir::new().unwrap();

        let path = history.export(temp.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
