//! Explicit per-session state.
//!
//! One interactive session owns one [`SessionContext`]: the authenticated
//! identity, the submitted brief, the current content record, the version
//! ledger and the revision chat transcript. Nothing here is shared across
//! sessions, and nothing survives a restart unless it was persisted through
//! the stores.

use serde::{Deserialize, Serialize};

use crate::models::brief::CampaignBrief;
use crate::models::content::{ContentRecord, MissingFieldError};
use crate::models::history::{HistoryError, ModificationHistoryEntry, VersionLedger};
use crate::services::engine::ModificationData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    /// Authenticated email, set by the login gate.
    user_email: Option<String>,
    /// Bearer token for the session.
    token: Option<String>,
    brief: Option<CampaignBrief>,
    current: Option<ContentRecord>,
    ledger: VersionLedger,
    messages: Vec<ChatMessage>,
    chat_enabled: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticate(&mut self, email: impl Into<String>, token: impl Into<String>) {
        self.user_email = Some(email.into());
        self.token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_email.is_some() && self.token.is_some()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn brief(&self) -> Option<&CampaignBrief> {
        self.brief.as_ref()
    }

    pub fn current(&self) -> Option<&ContentRecord> {
        self.current.as_ref()
    }

    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn chat_enabled(&self) -> bool {
        self.chat_enabled
    }

    /// Install a freshly generated record as version 1.
    ///
    /// Validation failure halts the flow before any state change — the
    /// ledger, current record and transcript stay as they were.
    pub fn accept_generation(
        &mut self,
        brief: CampaignBrief,
        record: ContentRecord,
    ) -> Result<(), SessionError> {
        record.validate_required()?;

        self.brief = Some(brief);
        self.ledger = VersionLedger::new();
        self.ledger.append(record.clone(), None);
        self.current = Some(record);
        self.messages.clear();
        self.chat_enabled = true;
        Ok(())
    }

    /// Assemble the `data` object for a `modify` webhook request from the
    /// ledger: the new instruction, the full history, and the original and
    /// current snapshots.
    pub fn build_modification(&self, request: &str) -> Result<ModificationData, SessionError> {
        let current = self.current.clone().ok_or(SessionError::NoContent)?;
        Ok(ModificationData {
            current_request: request.to_string(),
            modification_history: self.ledger.entries().to_vec(),
            original_content: self.ledger.original().map(|e| e.content.clone()),
            current_content: Some(current),
        })
    }

    /// Record a successful modification: appends a new ledger version and
    /// the chat exchange. The prior record is untouched in history.
    pub fn apply_modification(
        &mut self,
        record: ContentRecord,
        request: &str,
    ) -> Result<(), SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NoContent);
        }
        record.validate_required()?;

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: request.to_string(),
        });
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: "Revision applied.".to_string(),
        });
        self.ledger.append(record.clone(), Some(request.to_string()));
        self.current = Some(record);
        Ok(())
    }

    /// Read-only look at a past version.
    pub fn preview(&self, version: u32) -> Result<&ModificationHistoryEntry, HistoryError> {
        self.ledger.preview(version)
    }

    /// Bring a past version back as the newest one. History keeps growing.
    pub fn restore(&mut self, version: u32) -> Result<u32, HistoryError> {
        let entry = self.ledger.restore_as_new_version(version)?;
        let new_version = entry.version;
        self.current = Some(entry.content.clone());
        Ok(new_version)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("No generated content in this session yet")]
    NoContent,

    #[error(transparent)]
    History(#[from] HistoryError),
}
