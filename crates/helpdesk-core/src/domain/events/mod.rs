//! Domain Events
//!
//! Raised by the ticket aggregate and drained by the application layer so the
//! persistence collaborator can store the delta.

use chrono::{DateTime, Utc};

use crate::domain::aggregates::ReplyType;
use crate::domain::value_objects::{
    MainCategory, Priority, ReplyId, TicketId, TicketNumber, TicketStatus, UserId,
};

/// All domain events in the helpdesk bounded context
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Ticket(TicketEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TicketEvent {
    Created {
        ticket_id: TicketId,
        number: TicketNumber,
        priority: Priority,
        created_at: DateTime<Utc>,
    },

    Updated {
        ticket_id: TicketId,
        priority: Priority,
    },

    Assigned {
        ticket_id: TicketId,
        agent: UserId,
    },

    StatusChanged {
        ticket_id: TicketId,
        from: TicketStatus,
        to: TicketStatus,
    },

    Reopened {
        ticket_id: TicketId,
        reason: String,
    },

    Closed {
        ticket_id: TicketId,
        category: MainCategory,
        reason: String,
    },

    ReplyAdded {
        ticket_id: TicketId,
        reply_id: ReplyId,
        reply_type: ReplyType,
    },

    ReplyEdited {
        ticket_id: TicketId,
        reply_id: ReplyId,
    },

    Merged {
        ticket_id: TicketId,
        into: TicketId,
    },

    Absorbed {
        ticket_id: TicketId,
        merged: Vec<TicketNumber>,
    },

    Cloned {
        ticket_id: TicketId,
        clone_id: TicketId,
    },

    Deleted {
        ticket_id: TicketId,
        number: TicketNumber,
    },
}

impl DomainEvent {
    /// Get the aggregate ID this event belongs to
    pub fn aggregate_id(&self) -> &TicketId {
        match self {
            DomainEvent::Ticket(e) => match e {
                TicketEvent::Created { ticket_id, .. }
                | TicketEvent::Updated { ticket_id, .. }
                | TicketEvent::Assigned { ticket_id, .. }
                | TicketEvent::StatusChanged { ticket_id, .. }
                | TicketEvent::Reopened { ticket_id, .. }
                | TicketEvent::Closed { ticket_id, .. }
                | TicketEvent::ReplyAdded { ticket_id, .. }
                | TicketEvent::ReplyEdited { ticket_id, .. }
                | TicketEvent::Merged { ticket_id, .. }
                | TicketEvent::Absorbed { ticket_id, .. }
                | TicketEvent::Cloned { ticket_id, .. }
                | TicketEvent::Deleted { ticket_id, .. } => ticket_id,
            },
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Ticket(e) => match e {
                TicketEvent::Created { .. } => "ticket.created",
                TicketEvent::Updated { .. } => "ticket.updated",
                TicketEvent::Assigned { .. } => "ticket.assigned",
                TicketEvent::StatusChanged { .. } => "ticket.status_changed",
                TicketEvent::Reopened { .. } => "ticket.reopened",
                TicketEvent::Closed { .. } => "ticket.closed",
                TicketEvent::ReplyAdded { .. } => "ticket.reply_added",
                TicketEvent::ReplyEdited { .. } => "ticket.reply_edited",
                TicketEvent::Merged { .. } => "ticket.merged",
                TicketEvent::Absorbed { .. } => "ticket.absorbed",
                TicketEvent::Cloned { .. } => "ticket.cloned",
                TicketEvent::Deleted { .. } => "ticket.deleted",
            },
        }
    }
}
