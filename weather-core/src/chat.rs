//! Append-only message log backing `/chat`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, path::PathBuf};
use tokio::sync::Mutex;

use crate::error::WeatherError;

pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait MessageStore: Send + Sync + Debug {
    /// Append a message stamped with the current time and return it.
    async fn append(&self, message: String) -> Result<ChatMessage, WeatherError>;

    /// All stored messages, oldest first.
    async fn read_all(&self) -> Result<Vec<ChatMessage>, WeatherError>;
}

fn validate(message: &str) -> Result<(), WeatherError> {
    if message.trim().is_empty() {
        return Err(WeatherError::InvalidMessage("Message must not be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(WeatherError::InvalidMessage(format!(
            "Message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

/// Stores the log as one JSON array in a file.
///
/// Appends within this process are serialized; a second process writing the
/// same file is not coordinated with.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<ChatMessage>, WeatherError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(WeatherError::Corrupt)
    }

    async fn store(&self, messages: &[ChatMessage]) -> Result<(), WeatherError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(messages).map_err(std::io::Error::other)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for JsonFileStore {
    async fn append(&self, message: String) -> Result<ChatMessage, WeatherError> {
        validate(&message)?;

        let _guard = self.write_lock.lock().await;

        let mut messages = self.load().await?;
        let entry = ChatMessage { message, timestamp: Utc::now() };
        messages.push(entry.clone());
        self.store(&messages).await?;

        log::debug!("chat log at {} now holds {} messages", self.path.display(), messages.len());
        Ok(entry)
    }

    async fn read_all(&self) -> Result<Vec<ChatMessage>, WeatherError> {
        self.load().await
    }
}
