//! Data Transfer Objects (DTOs)
//!
//! Objects for transferring data across boundaries.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::queries::{derive_awaiting_reply, is_overdue_after, AwaitingReply, DateRange};
use crate::domain::aggregates::{ReplyType, Ticket};
use crate::domain::services::BulkAction;
use crate::domain::value_objects::{
    Attachment, MainCategory, Priority, ReplyId, TicketId, TicketStatus,
};

// =============================================================================
// Ticket Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloseTicketCommand {
    pub ticket_id: TicketId,
    pub category: MainCategory,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloneTicketCommand {
    pub ticket_id: TicketId,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkEditCommand {
    pub ticket_ids: Vec<TicketId>,
    pub action: BulkAction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeTicketsCommand {
    pub main_id: TicketId,
    pub merged_ids: Vec<TicketId>,
}

// =============================================================================
// Reply Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddReplyCommand {
    pub ticket_id: TicketId,
    pub content: String,
    pub reply_type: ReplyType,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditReplyCommand {
    pub reply_id: ReplyId,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

/// One row of a ticket list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: TicketId,
    pub number: String,
    pub title: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub category: String,
    pub service: String,
    pub created_by: String,
    pub assigned_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub awaiting_reply: AwaitingReply,
    pub overdue: bool,
}

impl TicketSummary {
    pub fn from_ticket(ticket: &Ticket, now: DateTime<Utc>, overdue_after: Duration) -> Self {
        Self {
            id: ticket.id().clone(),
            number: ticket.number().to_string(),
            title: ticket.title().to_string(),
            priority: ticket.priority(),
            status: ticket.status(),
            category: category_label(ticket),
            service: ticket.service().to_string(),
            created_by: ticket.created_by().to_string(),
            assigned_agent: ticket.assigned_agent().map(|a| a.to_string()),
            created_at: ticket.created_at(),
            last_updated_at: ticket.last_updated_at(),
            awaiting_reply: derive_awaiting_reply(ticket),
            overdue: ticket.status().is_open() && is_overdue_after(ticket, now, overdue_after),
        }
    }
}

/// `Main - Sub`, or just `Main` when there is no sub-category
pub fn category_label(ticket: &Ticket) -> String {
    match ticket.sub_category() {
        Some(sub) => format!("{} - {}", ticket.main_category(), sub),
        None => ticket.main_category().to_string(),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditedTicket {
    pub ticket: Ticket,
    /// The ticket had been closed for longer than the stale threshold
    pub stale_closed_warning: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEditResult {
    pub updated: Vec<TicketId>,
    pub skipped: Vec<TicketId>,
    /// Merged tickets a status change did not touch
    pub read_only: Vec<TicketId>,
}

/// Calendar-day window of an export, inclusive on both ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ExportRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::from_days(self.start, self.end)
    }

    /// Suffix appended to the export file stem
    pub fn file_suffix(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("_{}_to_{}", start, end),
            (Some(start), None) => format!("_from_{}", start),
            (None, Some(end)) => format!("_until_{}", end),
            (None, None) => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
    pub row_count: usize,
}
