//! Shared storage registry

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use stock_storage::Database;

use crate::Result;

/// Folder name of the public Downloads collection, relative to the volume root.
pub const DOWNLOADS_FOLDER_NAME: &str = "Download";

/// Highest ` (n)` suffix tried before registration gives up.
const MAX_NAME_ATTEMPTS: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Metadata a new entry is registered with.
#[derive(Debug, Clone, Copy)]
pub struct NewEntry<'a> {
    pub display_name: &'a str,
    pub mime_type: &'a str,
    pub relative_path: &'a str,
}

pub type EntryWriter = Box<dyn Write + Send>;

/// Index mediating writes to user-visible shared storage.
pub trait SharedStorageRegistry: Send + Sync {
    /// Register a pending entry. `None` when the registry refuses it.
    fn insert(&self, entry: &NewEntry<'_>) -> Result<Option<EntryId>>;

    /// Write handle for a pending entry. `None` when the entry is gone or
    /// already published.
    fn open_writer(&self, id: &EntryId) -> Result<Option<EntryWriter>>;

    /// Mark the entry complete and visible.
    fn publish(&self, id: &EntryId, size: u64) -> Result<()>;

    /// Concrete on-disk path of the entry, if the registry knows one.
    fn resolve_path(&self, id: &EntryId) -> Result<Option<String>>;

    /// Drop the entry and whatever file it owns.
    fn delete(&self, id: &EntryId) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub id: EntryId,
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
    pub data: String,
    pub size: u64,
    pub is_pending: bool,
    pub date_added: DateTime<Utc>,
}

/// SQLite-backed registry. Files live under `volume_root/<relative_path>`.
pub struct MediaRegistry {
    db: Database,
    volume_root: PathBuf,
}

impl MediaRegistry {
    pub fn new(db: Database, volume_root: PathBuf) -> Self {
        Self { db, volume_root }
    }

    pub fn get_entry(&self, id: &EntryId) -> Result<Option<MediaEntry>> {
        let entry = self.db.with_connection(|conn| {
            let entry = conn
                .query_row(
                    "SELECT id, display_name, mime_type, relative_path, data, size,
                            is_pending, date_added
                     FROM media_entries WHERE id = ?1",
                    [id.as_str()],
                    row_to_entry,
                )
                .optional()?;
            Ok(entry)
        })?;

        Ok(entry)
    }

    /// Published entries in a collection, oldest first.
    pub fn list_entries(&self, relative_path: &str) -> Result<Vec<MediaEntry>> {
        let entries = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, display_name, mime_type, relative_path, data, size,
                        is_pending, date_added
                 FROM media_entries
                 WHERE relative_path = ?1 AND is_pending = 0
                 ORDER BY date_added",
            )?;

            let entries: Vec<MediaEntry> = stmt
                .query_map([relative_path], row_to_entry)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(entries)
        })?;

        Ok(entries)
    }

    fn pending_data_path(&self, id: &EntryId) -> Result<Option<String>> {
        Ok(self.db.with_connection(|conn| {
            let data = conn
                .query_row(
                    "SELECT data FROM media_entries WHERE id = ?1 AND is_pending = 1",
                    [id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(data)
        })?)
    }
}

impl SharedStorageRegistry for MediaRegistry {
    fn insert(&self, entry: &NewEntry<'_>) -> Result<Option<EntryId>> {
        let dir = self.volume_root.join(entry.relative_path);
        fs::create_dir_all(&dir)?;

        // The whole name search runs under one lock so concurrent inserts of
        // the same display name never pick the same data path.
        let mut reserved: Option<PathBuf> = None;
        let inserted = self.db.transaction(|conn| {
            for candidate in candidate_names(entry.display_name) {
                let data_path = dir.join(&candidate);
                let data = data_path.to_string_lossy().to_string();

                let owner: Option<String> = conn
                    .query_row(
                        "SELECT id FROM media_entries WHERE data = ?1",
                        [&data],
                        |row| row.get(0),
                    )
                    .optional()?;
                if let Some(stale_id) = owner {
                    if data_path.exists() {
                        continue;
                    }
                    // The file is gone from disk, so the name is free again
                    conn.execute("DELETE FROM media_entries WHERE id = ?1", [&stale_id])?;
                    tracing::debug!(entry_id = %stale_id, "Dropped stale media entry");
                }

                // Reserve the name on disk; a file we did not create is never reused.
                match OpenOptions::new().write(true).create_new(true).open(&data_path) {
                    Ok(_) => reserved = Some(data_path),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                    Err(e) => return Err(e.into()),
                }

                let id = EntryId::generate();
                conn.execute(
                    "INSERT INTO media_entries
                     (id, display_name, mime_type, relative_path, data, size, is_pending, date_added)
                     VALUES (?1, ?2, ?3, ?4, ?5, 0, 1, ?6)",
                    rusqlite::params![
                        id.as_str(),
                        candidate,
                        entry.mime_type,
                        entry.relative_path,
                        data,
                        Utc::now().to_rfc3339(),
                    ],
                )?;

                return Ok(Some((id, candidate)));
            }

            Ok(None)
        });

        let inserted = match inserted {
            Ok(inserted) => inserted,
            Err(e) => {
                // Row insert or commit failed; release the name we reserved
                if let Some(path) = reserved {
                    let _ = fs::remove_file(path);
                }
                return Err(e.into());
            }
        };

        match inserted {
            Some((id, display_name)) => {
                tracing::debug!(
                    entry_id = %id,
                    display_name = %display_name,
                    mime_type = entry.mime_type,
                    "Registered media entry"
                );
                Ok(Some(id))
            }
            None => {
                tracing::warn!(
                    display_name = entry.display_name,
                    "No free name left for media entry"
                );
                Ok(None)
            }
        }
    }

    fn open_writer(&self, id: &EntryId) -> Result<Option<EntryWriter>> {
        let Some(data) = self.pending_data_path(id)? else {
            return Ok(None);
        };

        let file = OpenOptions::new().write(true).truncate(true).open(&data)?;
        Ok(Some(Box::new(file)))
    }

    fn publish(&self, id: &EntryId, size: u64) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE media_entries SET is_pending = 0, size = ?2 WHERE id = ?1",
                rusqlite::params![id.as_str(), size as i64],
            )?;
            Ok(())
        })?)
    }

    fn resolve_path(&self, id: &EntryId) -> Result<Option<String>> {
        Ok(self.db.with_connection(|conn| {
            let data = conn
                .query_row(
                    "SELECT data FROM media_entries WHERE id = ?1",
                    [id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(data)
        })?)
    }

    fn delete(&self, id: &EntryId) -> Result<()> {
        let data: Option<String> = self.db.transaction(|conn| {
            let data = conn
                .query_row(
                    "SELECT data FROM media_entries WHERE id = ?1",
                    [id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            conn.execute("DELETE FROM media_entries WHERE id = ?1", [id.as_str()])?;
            Ok(data)
        })?;

        if let Some(data) = data {
            match fs::remove_file(&data) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::debug!(entry_id = %id, "Deleted media entry");
        Ok(())
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaEntry> {
    let date_str: String = row.get(7)?;
    let date_added = DateTime::parse_from_rfc3339(&date_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(MediaEntry {
        id: EntryId(row.get(0)?),
        display_name: row.get(1)?,
        mime_type: row.get(2)?,
        relative_path: row.get(3)?,
        data: row.get(4)?,
        size: row.get::<_, i64>(5)? as u64,
        is_pending: row.get::<_, i64>(6)? != 0,
        date_added,
    })
}

/// `name.ext`, `name (1).ext`, `name (2).ext`, ...
fn candidate_names(display_name: &str) -> impl Iterator<Item = String> + '_ {
    let path = Path::new(display_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(display_name);
    let extension = path.extension().and_then(|e| e.to_str());

    std::iter::once(display_name.to_string()).chain((1..=MAX_NAME_ATTEMPTS).map(
        move |n| match extension {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        },
    ))
}
