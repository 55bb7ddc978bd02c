//! Front-end side of the history: remote service with a local fallback.
//!
//! [`DurableHistory`] is the single capability a game front end needs. A write
//! goes to the HTTP service; if that fails for any reason (connection refused,
//! non-2xx status, malformed reply) the record is appended to a local JSON file
//! instead. Reads follow the same order. Callers learn which backend answered
//! only through [`Saved`] and [`HistorySource`], for display.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::constants::HISTORY_LIMIT;
use crate::error::{Error, Result};
use crate::types::{HistoryRecord, NewHistoryRecord};

/// Where a save ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Saved {
    Remote { id: i64 },
    Local,
}

/// Which backend answered a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistorySource {
    Remote,
    Local,
}

#[derive(Deserialize)]
struct InsertedId {
    id: i64,
}

/// Client for the `/api/history` endpoints of a running history service.
#[derive(Clone, Debug)]
pub struct RemoteHistory {
    endpoint: String,
    http: reqwest::Client,
}

impl RemoteHistory {
    /// `base_url` is the service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/history", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn save(&self, record: &NewHistoryRecord) -> Result<i64> {
        let resp = self.http.post(&self.endpoint).json(record).send().await?;
        if !resp.status().is_success() {
            return Err(Error::RemoteStatus {
                status: resp.status().as_u16(),
            });
        }
        let inserted: InsertedId = resp.json().await?;
        Ok(inserted.id)
    }

    pub async fn list(&self) -> Result<Vec<HistoryRecord>> {
        let resp = self.http.get(&self.endpoint).send().await?;
        if !resp.status().is_success() {
            return Err(Error::RemoteStatus {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }
}

/// Append-only record list in a JSON file.
#[derive(Clone, Debug)]
pub struct LocalHistory {
    path: PathBuf,
}

impl LocalHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<HistoryRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::io(
                    format!("read local history {}", self.path.display()),
                    e,
                ))
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Stamp `record` with the current time and append it.
    pub fn append(&self, record: &NewHistoryRecord) -> Result<()> {
        let mut all = self.load()?;
        all.push(record.clone().into_record(None, Utc::now()));
        let json = serde_json::to_string_pretty(&all)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::io(format!("create {}", dir.display()), e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| Error::io(format!("write {}", tmp.display()), e))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::io(format!("replace {}", self.path.display()), e))?;
        Ok(())
    }

    /// Newest first, at most [`HISTORY_LIMIT`] records.
    pub fn recent(&self) -> Result<Vec<HistoryRecord>> {
        let mut all = self.load()?;
        all.reverse();
        all.truncate(HISTORY_LIMIT);
        Ok(all)
    }
}

/// Remote-then-local history, exposed as one save/load capability.
#[derive(Clone, Debug)]
pub struct DurableHistory {
    remote: Option<RemoteHistory>,
    local: LocalHistory,
}

impl DurableHistory {
    pub fn new(remote: Option<RemoteHistory>, local: LocalHistory) -> Self {
        Self { remote, local }
    }

    /// Local file only.
    pub fn local_only(local: LocalHistory) -> Self {
        Self {
            remote: None,
            local,
        }
    }

    pub fn local(&self) -> &LocalHistory {
        &self.local
    }

    /// Save to the service, or locally if the service fails.
    ///
    /// Errors only when the local write fails as well.
    pub async fn save(&self, record: &NewHistoryRecord) -> Result<Saved> {
        if let Some(remote) = &self.remote {
            match remote.save(record).await {
                Ok(id) => {
                    debug!(id, username = %record.username, "history saved remotely");
                    return Ok(Saved::Remote { id });
                }
                Err(e) => warn!(error = %e, "history service unavailable, saving locally"),
            }
        }
        self.local.append(record)?;
        debug!(path = %self.local.path().display(), "history saved locally");
        Ok(Saved::Local)
    }

    /// Records from the service, or from the local file if the service fails.
    ///
    /// Never fails: an unreadable local file reads as empty.
    pub async fn load(&self) -> (HistorySource, Vec<HistoryRecord>) {
        if let Some(remote) = &self.remote {
            match remote.list().await {
                Ok(records) => return (HistorySource::Remote, records),
                Err(e) => warn!(error = %e, "history service unavailable, reading local history"),
            }
        }
        let records = self.local.recent().unwrap_or_else(|e| {
            warn!(error = %e, "local history unreadable");
            Vec::new()
        });
        (HistorySource::Local, records)
    }
}
