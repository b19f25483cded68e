//! Bulk and merge operations
//!
//! Each operation clones the input snapshot, applies the change to the clone
//! and hands it back only if every step succeeded. The caller's collection is
//! never observed half-updated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::aggregates::{AuditEntry, Reply, ReplyType, Ticket, User};
use crate::domain::events::{DomainEvent, TicketEvent};
use crate::domain::value_objects::{TicketId, TicketNumber, TicketStatus};
use crate::error::{require_text, TicketError, TicketResult};

/// Action applied to every selected ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkAction {
    ChangeStatus(TicketStatus),
    SendMessage(String),
}

impl BulkAction {
    /// Build an action from the `(action, value)` pair a list view submits.
    pub fn parse(action: &str, value: &str) -> TicketResult<Self> {
        match action.trim() {
            "changeStatus" | "change_status" => TicketStatus::from_legacy(value)
                .map(Self::ChangeStatus)
                .ok_or_else(|| TicketError::validation(format!("unknown status: {value}"))),
            "sendMessage" | "send_message" => {
                require_text("message", value)?;
                Ok(Self::SendMessage(value.trim().to_string()))
            }
            other => Err(TicketError::validation(format!("unknown bulk action: {other}"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BulkOutcome {
    /// Full collection after the action
    pub tickets: Vec<Ticket>,
    pub updated: Vec<TicketId>,
    pub replies: Vec<Reply>,
    pub audit: Vec<(TicketId, AuditEntry)>,
    /// Selected ids with no matching ticket
    pub skipped: Vec<TicketId>,
    /// Merged tickets left out of a status change
    pub read_only: Vec<TicketId>,
}

impl BulkOutcome {
    pub fn updated_tickets(&self) -> Vec<Ticket> {
        pick(&self.tickets, &self.updated)
    }
}

#[derive(Clone, Debug)]
pub struct MergeOutcome {
    pub tickets: Vec<Ticket>,
    pub main: TicketId,
    pub merged: Vec<TicketId>,
    pub audit: Vec<(TicketId, AuditEntry)>,
}

impl MergeOutcome {
    /// Main ticket followed by the merged ones
    pub fn touched_tickets(&self) -> Vec<Ticket> {
        let mut ids = Vec::with_capacity(self.merged.len() + 1);
        ids.push(self.main.clone());
        ids.extend(self.merged.iter().cloned());
        pick(&self.tickets, &ids)
    }
}

#[derive(Clone, Debug)]
pub struct DeleteOutcome {
    pub tickets: Vec<Ticket>,
    pub removed: Ticket,
    pub event: DomainEvent,
}

/// Multi-ticket operations driven by one user action
pub struct BulkOperator;

impl BulkOperator {
    pub fn apply(
        tickets: &[Ticket],
        ids: &[TicketId],
        action: &BulkAction,
        actor: &User,
    ) -> TicketResult<BulkOutcome> {
        let mut snapshot = tickets.to_vec();
        let mut outcome_updated = Vec::new();
        let mut replies = Vec::new();
        let mut audit = Vec::new();
        let mut skipped = Vec::new();
        let mut read_only = Vec::new();

        for id in distinct(ids) {
            let Some(ticket) = snapshot.iter_mut().find(|t| t.id() == &id) else {
                tracing::debug!(ticket_id = %id, "Skipping unknown ticket in bulk selection");
                skipped.push(id);
                continue;
            };
            if ticket.is_merged() && matches!(action, BulkAction::ChangeStatus(_)) {
                tracing::debug!(ticket_id = %id, "Leaving merged ticket out of bulk status change");
                read_only.push(id);
                continue;
            }

            let before = ticket.audit_log().len();
            match action {
                BulkAction::ChangeStatus(status) => ticket.change_status(actor, *status)?,
                BulkAction::SendMessage(message) => {
                    let reply = ticket.add_reply(actor, message, ReplyType::SystemMessage, vec![])?;
                    replies.push(reply);
                }
            }
            audit.extend(ticket.audit_log().since(before).iter().map(|e| (id.clone(), e.clone())));
            outcome_updated.push(id);
        }

        tracing::info!(
            updated = outcome_updated.len(),
            skipped = skipped.len(),
            read_only = read_only.len(),
            "Applied bulk action {:?}",
            action
        );

        Ok(BulkOutcome { tickets: snapshot, updated: outcome_updated, replies, audit, skipped, read_only })
    }

    /// Merge `merged_ids` into `main_id`.
    ///
    /// Merged tickets keep their history and replies; only their status and
    /// back-reference change. The main ticket's status is left alone.
    pub fn merge(
        tickets: &[Ticket],
        main_id: &TicketId,
        merged_ids: &[TicketId],
        actor: &User,
    ) -> TicketResult<MergeOutcome> {
        let merged_ids = distinct(merged_ids);
        if merged_ids.is_empty() {
            return Err(TicketError::validation("select at least one ticket to merge"));
        }
        if merged_ids.contains(main_id) {
            return Err(TicketError::validation("a ticket cannot be merged into itself"));
        }

        let main = tickets
            .iter()
            .find(|t| t.id() == main_id)
            .ok_or_else(|| TicketError::not_found(format!("ticket {main_id}")))?;
        if main.is_merged() {
            return Err(TicketError::validation(format!(
                "{} has already been merged and cannot receive merges",
                main.number()
            )));
        }
        let main_number = main.number();
        if let Some(missing) = merged_ids.iter().find(|id| !tickets.iter().any(|t| t.id() == *id)) {
            return Err(TicketError::not_found(format!("ticket {missing}")));
        }

        let mut snapshot = tickets.to_vec();
        let mut audit = Vec::new();
        let mut numbers: Vec<TicketNumber> = Vec::with_capacity(merged_ids.len());

        for ticket in snapshot.iter_mut().filter(|t| merged_ids.contains(t.id())) {
            let before = ticket.audit_log().len();
            ticket.mark_merged(actor, main_id, main_number)?;
            numbers.push(ticket.number());
            audit.extend(ticket.audit_log().since(before).iter().map(|e| (ticket.id().clone(), e.clone())));
        }
        numbers.sort();

        if let Some(main) = snapshot.iter_mut().find(|t| t.id() == main_id) {
            let before = main.audit_log().len();
            main.record_absorbed(actor, &numbers);
            audit.extend(main.audit_log().since(before).iter().map(|e| (main_id.clone(), e.clone())));
        }

        tracing::info!(
            main = %main_number,
            merged = numbers.len(),
            "Merged tickets into {}",
            main_number
        );

        Ok(MergeOutcome { tickets: snapshot, main: main_id.clone(), merged: merged_ids, audit })
    }

    pub fn delete(tickets: &[Ticket], id: &TicketId) -> TicketResult<DeleteOutcome> {
        let position = tickets
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| TicketError::not_found(format!("ticket {id}")))?;

        let mut remaining = tickets.to_vec();
        let removed = remaining.remove(position);
        let event = DomainEvent::Ticket(TicketEvent::Deleted {
            ticket_id: removed.id().clone(),
            number: removed.number(),
        });

        tracing::info!("Deleted ticket {}", removed.number());
        Ok(DeleteOutcome { tickets: remaining, removed, event })
    }
}

fn distinct(ids: &[TicketId]) -> Vec<TicketId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert((*id).clone())).cloned().collect()
}

fn pick(tickets: &[Ticket], ids: &[TicketId]) -> Vec<Ticket> {
    ids.iter()
        .filter_map(|id| tickets.iter().find(|t| t.id() == id).cloned())
        .collect()
}
