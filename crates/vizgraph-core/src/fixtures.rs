use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid fixture name {0:?}")]
    InvalidName(String),

    #[error("failed to read fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory of pre-shaped sample responses, addressed as `sample:<name>`.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    dir: PathBuf,
}

impl FixtureStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read `<dir>/<name>.json` and return its text unmodified.
    ///
    /// The content must parse as JSON; it is otherwise served verbatim.
    pub async fn load(&self, name: &str) -> Result<String, FixtureError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(FixtureError::InvalidName(name.to_string()));
        }

        let path = self.dir.join(format!("{}.json", name));
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FixtureError::Io { path: path.clone(), source })?;

        serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|source| FixtureError::Parse { path, source })?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_returns_literal_text() {
        let dir = tempfile::tempdir().unwrap();
        let content = "[\n  {\"id\": \"1\", \"label\": \"Demo\", \"properties\": {}, \"edges\": []}\n]\n";
        std::fs::write(dir.path().join("demo.json"), content).unwrap();

        let store = FixtureStore::new(dir.path());
        assert_eq!(store.load("demo").await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_missing_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let store = FixtureStore::new(dir.path());
        assert!(matches!(store.load("nope").await, Err(FixtureError::Io { .. })));
    }

    #[tokio::test]
    async fn test_unparseable_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[{").unwrap();

        let store = FixtureStore::new(dir.path());
        assert!(matches!(store.load("broken").await, Err(FixtureError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let store = FixtureStore::new("samples");
        for name in ["", "../secret", "a/b", r"a\b"] {
            assert!(matches!(store.load(name).await, Err(FixtureError::InvalidName(_))));
        }
    }
}
