//! Reading and writing whole text artifacts.
//!
//! I/O errors are returned unchanged so callers see the underlying cause.

use std::io;
use std::path::Path;
use tracing::info;

pub async fn read_artifact(path: &Path) -> io::Result<String> {
    let text = tokio::fs::read_to_string(path).await?;
    info!(path = %path.display(), bytes = text.len(), "read input artifact");
    Ok(text)
}

pub async fn write_artifact(path: &Path, text: &str) -> io::Result<()> {
    tokio::fs::write(path, text).await?;
    info!(path = %path.display(), bytes = text.len(), "wrote output artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_preserves_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.js");
        let text = "console.error(\"Token yenileme hatası:\", e);\n";
        write_artifact(&path, text).await.unwrap();
        assert_eq!(read_artifact(&path).await.unwrap(), text);
    }

    #[tokio::test]
    async fn missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(&dir.path().join("absent.js")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
