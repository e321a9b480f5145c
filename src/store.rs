//! Loading the contribution history file.
//!
//! There is no cache: every call reads the file again, so a request always
//! sees whatever was on disk when it started. Failures never reach the
//! caller; they are logged and replaced by [`ContributionDocument::empty`].
//!
//! Only a missing, unreadable, or syntactically invalid file counts as a
//! failure. Any valid JSON is served as-is, whatever shape it has.

use std::path::Path;

use contrib_dashboard_core::models::ContributionDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {0}")]
    Missing(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse the document, reporting why it could not be loaded.
pub async fn read_document(path: &Path) -> Result<ContributionDocument, LoadError> {
    let display = path.display().to_string();

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::Missing(display));
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: display,
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: display,
        source,
    })
}

/// Load the document, substituting the empty document on any failure.
pub async fn load(path: &Path) -> ContributionDocument {
    match read_document(path).await {
        Ok(doc) => doc,
        Err(e @ LoadError::Missing(_)) => {
            tracing::debug!(error = %e, "serving empty document");
            ContributionDocument::empty()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error loading data file");
            ContributionDocument::empty()
        }
    }
}

/// Whether the data file exists right now.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_valid_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(
            &path,
            r#"{"stats": {"total_contributions": 1}, "contributions": [{"repository": "acme/a", "cycle": 2}]}"#,
        )
        .unwrap();

        let doc = load(&path).await;
        assert_eq!(doc.stats().unwrap()["total_contributions"], 1);
        assert_eq!(doc.contribution_count(), 1);
        assert_eq!(doc.contributions().next().unwrap().repository(), "acme/a");
        assert!(exists(&path).await);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.json");

        assert!(matches!(
            read_document(&path).await,
            Err(LoadError::Missing(_))
        ));
        let doc = load(&path).await;
        assert_eq!(doc.stats().unwrap()["total_contributions"], 0);
        assert_eq!(doc.contribution_count(), 0);
        assert!(!exists(&path).await);
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_document(&path).await,
            Err(LoadError::Parse { .. })
        ));
        let doc = load(&path).await;
        assert_eq!(doc.as_value()["schema_version"], "1.0.0");
        assert_eq!(doc.contribution_count(), 0);
    }

    #[tokio::test]
    async fn test_reload_sees_new_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(&path, r#"{"contributions": []}"#).unwrap();
        assert_eq!(load(&path).await.contribution_count(), 0);

        std::fs::write(&path, r#"{"contributions": [{"cycle": 1}]}"#).unwrap();
        assert_eq!(load(&path).await.contribution_count(), 1);
    }

    #[tokio::test]
    async fn test_off_type_fields_keep_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        let contents = serde_json::json!({
            "schema_version": 2,
            "languages_contributed": null,
            "stats": {"total_contributions": 7},
            "contributions": [{"repository": "acme/a", "cycle": 3.0}, null]
        });
        std::fs::write(&path, contents.to_string()).unwrap();

        let doc = read_document(&path).await.unwrap();
        assert_eq!(doc.as_value(), &contents);

        let doc = load(&path).await;
        assert_eq!(doc.stats().unwrap()["total_contributions"], 7);
        assert_eq!(doc.contribution_count(), 2);
        assert_eq!(doc.into_value(), contents);

        std::fs::write(&path, r#"{"stats": null, "contributions": [{"cycle": 1}]}"#).unwrap();
        let doc = load(&path).await;
        assert!(doc.stats().is_none());
        assert_eq!(doc.contribution_count(), 1);
    }
}
