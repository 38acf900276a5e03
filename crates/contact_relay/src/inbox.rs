use std::{io, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::protocol::{ContactMessage, ContactReceipt};
use thiserror::Error;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};
use uuid::Uuid;

/// One accepted message, stored as a single JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxEntry {
    pub message_id: Uuid,
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub message: ContactMessage,
}

impl InboxEntry {
    fn receipt(&self) -> ContactReceipt {
        ContactReceipt {
            message_id: self.message_id,
            received_at: self.received_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("inbox io failure: {0}")]
    Io(#[from] io::Error),
    #[error("inbox entry encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only JSON lines file of accepted messages.
#[derive(Clone)]
pub struct Inbox {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl Inbox {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub async fn append(&self, message: ContactMessage) -> Result<ContactReceipt, InboxError> {
        let entry = InboxEntry {
            message_id: Uuid::new_v4(),
            received_at: Utc::now(),
            message,
        };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_ref())
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(entry.receipt())
    }

    /// Reads every stored entry. A missing file is an empty inbox.
    pub async fn entries(&self) -> Result<Vec<InboxEntry>, InboxError> {
        let raw = match tokio::fs::read_to_string(self.path.as_ref()).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(InboxError::from))
            .collect()
    }
}
