use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::models::Document;

use super::migrate::migrate;

/// Owns the JSON data file, the last-seen copy of it, and the single write lock.
pub struct DataStore {
    path: PathBuf,
    cache: RwLock<Option<Document>>,
    write_lock: Mutex<()>,
}

enum DiskRead {
    Loaded(Document),
    /// Parsed, but migration changed it; must be written back so ids stay put.
    Repaired(Document),
    /// File was absent or unreadable as a document; defaults must be written.
    Fresh(Document),
}

impl DiskRead {
    fn into_document(self) -> Document {
        match self {
            DiskRead::Loaded(doc) | DiskRead::Repaired(doc) | DiskRead::Fresh(doc) => doc,
        }
    }
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the document, from the cache when `use_cache` is set and one exists.
    ///
    /// A missing file is created with defaults. A file that cannot be parsed is
    /// moved aside to `<name>.corrupt` and replaced with defaults. A file the
    /// migration had to repair is rewritten in its normalized form.
    pub async fn load(&self, use_cache: bool) -> Result<Document> {
        if use_cache {
            if let Some(doc) = self.cache.read().await.as_ref() {
                return Ok(doc.clone());
            }
        }

        // Classify and repair under the write lock, like `update`
        let _guard = self.write_lock.lock().await;
        match self.read_from_disk().await? {
            DiskRead::Loaded(doc) => {
                *self.cache.write().await = Some(doc.clone());
                Ok(doc)
            }
            DiskRead::Repaired(doc) | DiskRead::Fresh(doc) => {
                self.write_locked(&doc).await?;
                Ok(doc)
            }
        }
    }

    /// Replaces the file with `doc` and refreshes the cache.
    pub async fn save(&self, doc: &Document) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_locked(doc).await
    }

    /// Read-modify-write under the write lock, so concurrent updates in this
    /// process cannot overwrite each other.
    pub async fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Document) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_from_disk().await?.into_document();
        let result = f(&mut doc);
        self.write_locked(&doc).await?;
        Ok(result)
    }

    /// Caller must hold `write_lock`.
    async fn read_from_disk(&self) -> Result<DiskRead> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No data file at {}, creating defaults", self.path.display());
                return Ok(DiskRead::Fresh(Document::default()));
            }
            Err(e) => {
                tracing::error!("Failed to read {}: {}", self.path.display(), e);
                return Err(e.into());
            }
        };

        match migrate(&contents) {
            Ok(migration) => {
                if migration.repairs.is_empty() {
                    tracing::debug!("Loaded {}", self.path.display());
                    return Ok(DiskRead::Loaded(migration.document));
                }
                tracing::warn!(
                    "Normalized {} ({} repairs)",
                    self.path.display(),
                    migration.repairs.len()
                );
                for repair in &migration.repairs {
                    tracing::debug!("  {}", repair);
                }
                Ok(DiskRead::Repaired(migration.document))
            }
            Err(e) => {
                self.quarantine(&e).await?;
                Ok(DiskRead::Fresh(Document::default()))
            }
        }
    }

    async fn quarantine(&self, cause: &AppError) -> Result<()> {
        let aside = corrupt_path(&self.path);
        tracing::error!(
            "Data file {} is unreadable ({}), moving it to {}",
            self.path.display(),
            cause,
            aside.display()
        );
        tokio::fs::rename(&self.path, &aside)
            .await
            .map_err(|e| AppError::CorruptDocument {
                path: self.path.display().to_string(),
                reason: format!("{} (could not move aside: {})", cause, e),
            })
    }

    /// Caller must hold `write_lock`.
    async fn write_locked(&self, doc: &Document) -> Result<()> {
        let result = self.write_file(doc).await;
        match &result {
            Ok(()) => {
                *self.cache.write().await = Some(doc.clone());
                tracing::debug!(
                    "Saved {} schedules, {} tasks to {}",
                    doc.schedules.len(),
                    doc.tasks.len(),
                    self.path.display()
                );
            }
            Err(e) => tracing::error!("Failed to save {}: {}", self.path.display(), e),
        }
        result
    }

    async fn write_file(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;

        // Write next to the target and rename over it so readers never see half a file
        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, &buf).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn corrupt_path(path: &Path) -> PathBuf {
    with_suffix(path, ".corrupt")
}

fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}
