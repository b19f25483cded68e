//! Audit trail
//!
//! One append-only stream per ticket. Entries are never mutated or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: UserId,
    pub action: AuditAction,
    pub details: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    TicketCreated,
    TicketUpdated,
    TicketAssigned,
    StatusChanged,
    TicketReopened,
    TicketClosed,
    TicketMerged,
    TicketsMerged,
    TicketCloned,
    ReplyAdded,
    MessageEdited,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TicketCreated => "Ticket Created",
            Self::TicketUpdated => "Ticket Updated",
            Self::TicketAssigned => "Ticket Assigned",
            Self::StatusChanged => "Status Changed",
            Self::TicketReopened => "Ticket Reopened",
            Self::TicketClosed => "Ticket Closed",
            Self::TicketMerged => "Ticket Merged",
            Self::TicketsMerged => "Tickets Merged",
            Self::TicketCloned => "Ticket Cloned",
            Self::ReplyAdded => "Reply Added",
            Self::MessageEdited => "Message Edited",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog(Vec<AuditEntry>);

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        timestamp: DateTime<Utc>,
        actor: &UserId,
        action: AuditAction,
        details: impl Into<String>,
    ) -> &AuditEntry {
        self.0.push(AuditEntry { timestamp, actor: actor.clone(), action, details: details.into() });
        &self.0[self.0.len() - 1]
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    /// Entries appended after the log had `len` entries.
    pub fn since(&self, len: usize) -> &[AuditEntry] {
        self.0.get(len..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_returns_appended_entries() {
        let mut log = AuditLog::new();
        let actor = UserId::new("agent@example.com");
        log.record(Utc::now(), &actor, AuditAction::TicketCreated, "Ticket TICK-001 created");
        let before = log.len();
        log.record(Utc::now(), &actor, AuditAction::TicketAssigned, "Assigned to agent@example.com");

        let appended = log.since(before);
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].action, AuditAction::TicketAssigned);
        assert!(log.since(10).is_empty());
    }
}
