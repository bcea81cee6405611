mod workflow;

pub use workflow::{download_at_cursor, Notifier, Outcome};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Zero-based position inside a document, column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub ch: usize,
}

/// A markdown note held in memory as lines, addressed the way editors
/// address text.
pub struct Document {
    path: PathBuf,
    lines: Vec<String>,
}

impl Document {
    pub async fn open(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read note {}", path.display()))?;
        Ok(Self::from_text(path, &text))
    }

    pub fn from_text(path: &Path, text: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Replaces the character span `[start, end)` of one line.
    pub fn replace_span(
        &mut self,
        line: usize,
        start: usize,
        end: usize,
        replacement: &str,
    ) -> Result<()> {
        let current = self
            .lines
            .get_mut(line)
            .with_context(|| format!("Line {} out of range", line))?;

        let byte_start = char_to_byte(current, start)?;
        let byte_end = char_to_byte(current, end)?;
        if byte_start > byte_end {
            return Err(anyhow::anyhow!("Reversed span {}..{}", start, end));
        }

        current.replace_range(byte_start..byte_end, replacement);
        Ok(())
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Saves via a sibling temp file renamed into place; an interrupted
    /// write can never leave the note truncated.
    pub async fn save(&self) -> Result<()> {
        let name = self
            .path
            .file_name()
            .with_context(|| format!("Note path {} has no filename", self.path.display()))?;
        let mut partial = name.to_os_string();
        partial.push(".tmp");
        let partial_path = self.path.with_file_name(partial);

        tokio::fs::write(&partial_path, self.text())
            .await
            .with_context(|| format!("Failed to write {}", partial_path.display()))?;
        tokio::fs::rename(&partial_path, &self.path)
            .await
            .with_context(|| format!("Failed to save note {}", self.path.display()))
    }
}

fn char_to_byte(s: &str, ch: usize) -> Result<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain([s.len()])
        .nth(ch)
        .with_context(|| format!("Offset {} past end of line", ch))
}
