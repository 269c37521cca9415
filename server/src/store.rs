use crate::{
    models::{Link, LinkMap},
    shortcode,
};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not hold a JSON object of short codes: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode links: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("short code already exists: {0}")]
    CodeTaken(String),

    #[error("no free short code after {0} attempts")]
    CodeSpaceExhausted(usize),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat-file store for the short_code -> url mapping.
///
/// The file is the only source of truth: every call re-reads it in full and
/// every mutation rewrites it in full. Mutations are serialized through
/// `gate`, so a load-insert-save cycle never races another one.
#[derive(Debug)]
pub struct LinkStore {
    path: PathBuf,
    gate: Mutex<()>,
}

impl LinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the current mapping, creating an empty link file if none exists.
    pub async fn load(&self) -> StoreResult<LinkMap> {
        if let Some(links) = self.read().await? {
            return Ok(links);
        }
        let _gate = self.gate.lock().await;
        self.load_or_create().await
    }

    /// Overwrite the link file with `links`.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn save(&self, links: &LinkMap) -> StoreResult<()> {
        let _gate = self.gate.lock().await;
        self.write(links).await
    }

    /// Add `original_url` under `requested_code`, or under a freshly generated
    /// code when none is requested.
    ///
    /// Fails with `CodeTaken` if the requested code is already mapped.
    pub async fn insert_new(
        &self,
        original_url: &str,
        requested_code: Option<&str>,
    ) -> StoreResult<Link> {
        let _gate = self.gate.lock().await;
        let mut links = self.load_or_create().await?;

        let short_code = match requested_code {
            Some(code) if links.contains_key(code) => {
                return Err(StoreError::CodeTaken(code.to_owned()));
            }
            Some(code) => code.to_owned(),
            None => shortcode::unique_code(&links)
                .ok_or(StoreError::CodeSpaceExhausted(shortcode::MAX_ATTEMPTS))?,
        };

        links.insert(short_code.clone(), original_url.to_owned());
        self.write(&links).await?;

        Ok(Link {
            short_code,
            original_url: original_url.to_owned(),
        })
    }

    // ── Internal helpers (callers hold the gate where it matters) ──────────

    /// Read and parse the file; `None` when it does not exist.
    async fn read(&self) -> StoreResult<Option<LinkMap>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Must be called with the gate held.
    async fn load_or_create(&self) -> StoreResult<LinkMap> {
        if let Some(links) = self.read().await? {
            return Ok(links);
        }
        let links = LinkMap::new();
        self.write(&links).await?;
        tracing::info!("Created empty link file at {}", self.path.display());
        Ok(links)
    }

    /// Write to a sibling temp file, then rename it over the real one so
    /// readers never see a partially written mapping. Must be called with the
    /// gate held.
    async fn write(&self, links: &LinkMap) -> StoreResult<()> {
        let bytes = serde_json::to_vec(links)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::debug!("Wrote {} link(s) to {}", links.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "links.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> LinkStore {
        LinkStore::new(dir.path().join("data").join("links.json"))
    }

    #[tokio::test]
    async fn load_creates_empty_file_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let links = store.load().await.unwrap();
        assert!(links.is_empty());

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, "{}");
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut links = LinkMap::new();
        links.insert("abc".into(), "https://a.com".into());
        links.insert("déjà vu".into(), "https://example.com/?q=\"quoted\"".into());
        store.save(&links).await.unwrap();

        assert_eq!(store.load().await.unwrap(), links);
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_an_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");

        // The broken file is left untouched for the operator.
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn non_string_values_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"abc": 5}"#).unwrap();

        assert!(matches!(
            store.load().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn insert_new_with_requested_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let link = store.insert_new("https://a.com", Some("abc")).await.unwrap();
        assert_eq!(link.short_code, "abc");
        assert_eq!(link.original_url, "https://a.com");
        assert_eq!(
            store.load().await.unwrap().get("abc").map(String::as_str),
            Some("https://a.com")
        );
    }

    #[tokio::test]
    async fn insert_new_rejects_taken_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.insert_new("https://a.com", Some("abc")).await.unwrap();
        let err = store
            .insert_new("https://b.com", Some("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CodeTaken(ref code) if code == "abc"));

        // The original target survives.
        assert_eq!(store.load().await.unwrap()["abc"], "https://a.com");
    }

    #[tokio::test]
    async fn insert_new_generates_hex_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let link = store.insert_new("https://example.com", None).await.unwrap();
        assert_eq!(link.short_code.len(), 8);
        assert!(link.short_code.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let code = format!("code{i}");
                    store
                        .insert_new(&format!("https://example.com/{i}"), Some(&code))
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let links = store.load().await.unwrap();
        assert_eq!(links.len(), 32);
        assert_eq!(links["code7"], "https://example.com/7");
    }
}
