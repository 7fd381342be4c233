//! Knowledge file loading and rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between rendered entries.
const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// Errors raised while loading the knowledge file.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The file could not be read.
    #[error("cannot read knowledge file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of entries.
    #[error("malformed knowledge file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result alias for knowledge loading.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// One block of reference material.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Section heading.
    pub category: String,
    /// Body text.
    pub text: String,
    /// Search keywords, kept in file order.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Read and parse the knowledge file.
///
/// # Errors
/// Returns an error if the file is missing, unreadable or not valid JSON.
pub fn load_knowledge(path: &Path) -> KnowledgeResult<Vec<KnowledgeEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| KnowledgeError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Render entries into one prompt-ready blob.
#[must_use]
pub fn render_knowledge(entries: &[KnowledgeEntry]) -> String {
    entries
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn render_entry(entry: &KnowledgeEntry) -> String {
    let mut out = String::with_capacity(entry.category.len() + entry.text.len() + 32);
    out.push_str("## ");
    out.push_str(&entry.category);
    out.push('\n');
    out.push_str(entry.text.trim());
    out.push_str("\nKeywords: ");
    out.push_str(&entry.keywords.join(", "));
    out
}

/// Load and render the knowledge file, degrading to an empty blob on failure.
#[must_use]
pub fn load_knowledge_blob(path: &Path) -> String {
    match load_knowledge(path) {
        Ok(entries) => {
            tracing::info!(
                path = %path.display(),
                entries = entries.len(),
                "knowledge base loaded"
            );
            render_knowledge(&entries)
        }
        Err(err) => {
            tracing::warn!("knowledge base unavailable, continuing without it: {err}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn entry(category: &str, text: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            category: category.to_string(),
            text: text.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_render_single_entry() {
        let rendered = render_knowledge(&[entry(
            "Services",
            "We offer counseling.",
            &["therapy", "counseling"],
        )]);
        assert_eq!(
            rendered,
            "## Services\nWe offer counseling.\nKeywords: therapy, counseling"
        );
    }

    #[test]
    fn test_render_joins_entries_in_order() {
        let rendered = render_knowledge(&[entry("A", "first", &[]), entry("B", "second", &["x"])]);
        let first = rendered.find("## A").unwrap_or(usize::MAX);
        let second = rendered.find("## B").unwrap_or(0);
        assert!(first < second);
        assert!(rendered.contains(ENTRY_SEPARATOR));
    }

    #[test]
    fn test_render_empty_is_empty() {
        assert!(render_knowledge(&[]).is_empty());
    }

    #[test]
    fn test_load_valid_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"category":"Hours","text":"Open weekdays.","keywords":["hours","open"]}},
               {{"category":"Location","text":"Downtown."}}]"#
        )?;

        let entries = load_knowledge(file.path())?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].keywords, vec!["hours", "open"]);
        assert!(entries[1].keywords.is_empty());
        Ok(())
    }

    #[test]
    fn test_bundled_knowledge_file_parses() -> KnowledgeResult<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/knowledge.json");
        let entries = load_knowledge(&path)?;
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| !e.category.is_empty() && !e.text.is_empty()));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_knowledge(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(KnowledgeError::Io { .. })));
        assert!(load_knowledge_blob(Path::new("does/not/exist.json")).is_empty());
    }

    #[test]
    fn test_malformed_file_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{ not json")?;

        assert!(matches!(
            load_knowledge(file.path()),
            Err(KnowledgeError::Parse { .. })
        ));
        assert!(load_knowledge_blob(file.path()).is_empty());
        Ok(())
    }
}
