use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

const CHAPTER_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Read a chapter file. Only plain text and markdown are accepted.
pub async fn read_chapter_file(path: &Path) -> Result<String> {
    check_chapter_extension(path)?;
    read_text(path).await
}

/// Read an optional context file (story so far, previous chapter, canned reply).
pub async fn read_optional(path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(path) => read_text(path).await.map(Some),
        None => Ok(None),
    }
}

async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .context(format!("Cannot read {}", path.display()))
}

fn check_chapter_extension(path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    anyhow::ensure!(
        CHAPTER_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(extension)),
        "Chapter must be a .txt or .md file: {}",
        path.display()
    );
    Ok(())
}

/// Title from the file name when none is given.
pub fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_markdown_chapter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter-01.md");
        std::fs::write(&path, "Mara left the village at dawn.").unwrap();

        let content = read_chapter_file(&path).await.unwrap();
        assert_eq!(content, "Mara left the village at dawn.");
        assert_eq!(default_title(&path), "chapter-01");
    }

    #[tokio::test]
    async fn test_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter-01.epub");
        std::fs::write(&path, "binary").unwrap();

        let err = read_chapter_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("must be a .txt or .md file"));
    }

    #[tokio::test]
    async fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Prologue.TXT");
        std::fs::write(&path, "The river froze early.").unwrap();

        assert_eq!(read_chapter_file(&path).await.unwrap(), "The river froze early.");
        assert!(read_chapter_file(&dir.path().join("prologue")).await.is_err());
    }

    #[tokio::test]
    async fn test_optional_file() {
        assert_eq!(read_optional(None).await.unwrap(), None);
        let err = read_optional(Some(Path::new("/nonexistent/story.txt"))).await.unwrap_err();
        assert!(err.to_string().contains("Cannot read /nonexistent/story.txt"));
    }
}
