//! Derived list flags: who owes a reply, and which tickets have gone quiet.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::aggregates::Ticket;

/// Default quiet period before a ticket counts as overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 3;

/// Which side of the conversation is expected to answer next
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwaitingReply {
    None,
    Agent,
    User,
}

impl fmt::Display for AwaitingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Agent => "Agent",
            Self::User => "User",
        };
        f.write_str(label)
    }
}

/// A ticket with no replies yet is waiting on an agent: the submission itself
/// is the creator's message. Merged tickets follow the same reply rule.
pub fn derive_awaiting_reply(ticket: &Ticket) -> AwaitingReply {
    if ticket.status().is_closed_or_resolved() {
        return AwaitingReply::None;
    }
    match ticket.last_reply_by() {
        Some(author) if author != ticket.created_by() => AwaitingReply::User,
        _ => AwaitingReply::Agent,
    }
}

pub fn is_overdue(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    is_overdue_after(ticket, now, Duration::days(OVERDUE_AFTER_DAYS))
}

pub fn is_overdue_after(ticket: &Ticket, now: DateTime<Utc>, threshold: Duration) -> bool {
    now - ticket.last_updated_at() > threshold
}
