//! Ticket Aggregate
//!
//! Rich aggregate root for the ticket lifecycle. Priority is derived from
//! severity and impact on every mutation that touches them, and the
//! sub-category is always kept inside the current main category's
//! sub-taxonomy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::audit::{AuditAction, AuditLog};
use crate::domain::aggregates::reply::{Reply, ReplyDraft, ReplyType};
use crate::domain::aggregates::user::User;
use crate::domain::events::{DomainEvent, TicketEvent};
use crate::domain::services::PriorityCalculator;
use crate::domain::value_objects::{
    distinct_identities, Attachment, Impact, MainCategory, Priority, Service, Severity,
    SubCategory, TicketId, TicketNumber, TicketStatus, UserId,
};
use crate::error::{require_text, TicketError, TicketResult};

/// A closed ticket untouched for longer than this is flagged when edited.
pub const STALE_CLOSED_AFTER_DAYS: i64 = 30;

/// Submission form for a new ticket
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub impact: Impact,
    pub main_category: MainCategory,
    #[serde(default)]
    pub sub_category: Option<SubCategory>,
    pub service: String,
    #[serde(default)]
    pub cc: Vec<UserId>,
    #[serde(default)]
    pub bcc: Vec<UserId>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl NewTicket {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        impact: Impact,
        main_category: MainCategory,
        service: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            impact,
            main_category,
            sub_category: None,
            service: service.into(),
            cc: vec![],
            bcc: vec![],
            attachments: vec![],
        }
    }

    pub fn with_sub_category(mut self, sub_category: SubCategory) -> Self {
        self.sub_category = Some(sub_category);
        self
    }

    pub fn with_cc(mut self, cc: Vec<UserId>) -> Self {
        self.cc = cc;
        self
    }

    pub fn with_bcc(mut self, bcc: Vec<UserId>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Field set for an in-place edit. Absent fields are left untouched.
///
/// Priority follows severity and impact and cannot be set here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub impact: Option<Impact>,
    pub main_category: Option<MainCategory>,
    /// `Some(None)` clears the sub-category
    pub sub_category: Option<Option<SubCategory>>,
    pub status: Option<TicketStatus>,
    pub service: Option<String>,
    pub cc: Option<Vec<UserId>>,
    pub bcc: Option<Vec<UserId>>,
}

impl TicketEdit {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn main_category(mut self, main_category: MainCategory) -> Self {
        self.main_category = Some(main_category);
        self
    }

    pub fn sub_category(mut self, sub_category: Option<SubCategory>) -> Self {
        self.sub_category = Some(sub_category);
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.impact.is_none()
            && self.main_category.is_none()
            && self.sub_category.is_none()
            && self.status.is_none()
            && self.service.is_none()
            && self.cc.is_none()
            && self.bcc.is_none()
    }
}

/// Ticket aggregate root
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "TicketRecord", into = "TicketRecord")]
pub struct Ticket {
    id: TicketId,
    number: TicketNumber,
    title: String,
    description: String,
    severity: Severity,
    impact: Impact,
    priority: Priority,
    main_category: MainCategory,
    sub_category: Option<SubCategory>,
    status: TicketStatus,
    created_by: UserId,
    assigned_agent: Option<UserId>,
    service: Service,
    cc: Vec<UserId>,
    bcc: Vec<UserId>,
    attachments: Vec<Attachment>,
    close_reason: Option<String>,
    merged_into: Option<TicketId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    last_reply_at: Option<DateTime<Utc>>,
    last_reply_by: Option<UserId>,
    closed_at: Option<DateTime<Utc>>,
    audit_log: AuditLog,
    events: Vec<DomainEvent>,
}

impl Ticket {
    /// Create a new ticket from a submission (factory method)
    pub fn create(number: TicketNumber, creator: &UserId, form: NewTicket) -> TicketResult<Self> {
        require_text("title", &form.title)?;
        require_text("description", &form.description)?;
        let service = Service::new(form.service)?;
        if let Some(sub) = form.sub_category {
            if !sub.belongs_to(form.main_category) {
                return Err(TicketError::validation(format!(
                    "sub-category {} does not belong to {}",
                    sub, form.main_category
                )));
            }
        }

        let now = Utc::now();
        let id = TicketId::new();
        let priority = PriorityCalculator::calculate(form.severity, form.impact);

        let mut ticket = Self {
            id: id.clone(),
            number,
            title: form.title.trim().to_string(),
            description: form.description,
            severity: form.severity,
            impact: form.impact,
            priority,
            main_category: form.main_category,
            sub_category: form.sub_category,
            status: TicketStatus::New,
            created_by: creator.clone(),
            assigned_agent: None,
            service,
            cc: distinct_identities(form.cc),
            bcc: distinct_identities(form.bcc),
            attachments: form.attachments,
            close_reason: None,
            merged_into: None,
            created_at: now,
            updated_at: now,
            last_updated_at: now,
            last_reply_at: None,
            last_reply_by: None,
            closed_at: None,
            audit_log: AuditLog::new(),
            events: vec![],
        };

        ticket.audit_log.record(
            now,
            creator,
            AuditAction::TicketCreated,
            format!("Ticket {} created", number),
        );
        ticket.raise_event(DomainEvent::Ticket(TicketEvent::Created {
            ticket_id: id,
            number,
            priority,
            created_at: now,
        }));

        Ok(ticket)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &TicketId { &self.id }
    pub fn number(&self) -> TicketNumber { self.number }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn severity(&self) -> Severity { self.severity }
    pub fn impact(&self) -> Impact { self.impact }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn main_category(&self) -> MainCategory { self.main_category }
    pub fn sub_category(&self) -> Option<SubCategory> { self.sub_category }
    pub fn status(&self) -> TicketStatus { self.status }
    pub fn created_by(&self) -> &UserId { &self.created_by }
    pub fn assigned_agent(&self) -> Option<&UserId> { self.assigned_agent.as_ref() }
    pub fn service(&self) -> &Service { &self.service }
    pub fn cc(&self) -> &[UserId] { &self.cc }
    pub fn bcc(&self) -> &[UserId] { &self.bcc }
    pub fn attachments(&self) -> &[Attachment] { &self.attachments }
    pub fn close_reason(&self) -> Option<&str> { self.close_reason.as_deref() }
    pub fn merged_into(&self) -> Option<&TicketId> { self.merged_into.as_ref() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn last_updated_at(&self) -> DateTime<Utc> { self.last_updated_at }
    pub fn last_reply_at(&self) -> Option<DateTime<Utc>> { self.last_reply_at }
    pub fn last_reply_by(&self) -> Option<&UserId> { self.last_reply_by.as_ref() }
    pub fn closed_at(&self) -> Option<DateTime<Utc>> { self.closed_at }
    pub fn audit_log(&self) -> &AuditLog { &self.audit_log }
    pub fn is_merged(&self) -> bool { self.status == TicketStatus::Merged }

    /// Closed for longer than the default threshold. Editing such a ticket is
    /// allowed but should be surfaced as a warning.
    pub fn is_stale_closed(&self, now: DateTime<Utc>) -> bool {
        self.is_stale_closed_after(now, Duration::days(STALE_CLOSED_AFTER_DAYS))
    }

    pub fn is_stale_closed_after(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        if self.status != TicketStatus::Closed {
            return false;
        }
        let closed_at = self.closed_at.unwrap_or(self.updated_at);
        now - closed_at > threshold
    }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Apply an in-place edit.
    ///
    /// All inputs are validated before anything is written, so a rejected edit
    /// leaves the ticket untouched.
    pub fn edit(&mut self, actor: &User, edit: TicketEdit) -> TicketResult<()> {
        self.ensure_editable()?;
        if let Some(title) = &edit.title {
            require_text("title", title)?;
        }
        if let Some(description) = &edit.description {
            require_text("description", description)?;
        }
        if edit.status == Some(TicketStatus::Merged) {
            return Err(TicketError::validation("tickets only become Merged through a merge"));
        }
        let service = edit.service.map(Service::new).transpose()?;

        let main_category = edit.main_category.unwrap_or(self.main_category);
        let sub_category = match edit.sub_category {
            Some(Some(sub)) if !sub.belongs_to(main_category) => {
                return Err(TicketError::validation(format!(
                    "sub-category {} does not belong to {}",
                    sub, main_category
                )));
            }
            Some(requested) => requested,
            None if main_category != self.main_category => None,
            None => self.sub_category,
        };

        let now = Utc::now();
        if let Some(title) = edit.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(severity) = edit.severity {
            self.severity = severity;
        }
        if let Some(impact) = edit.impact {
            self.impact = impact;
        }
        if let Some(service) = service {
            self.service = service;
        }
        if let Some(cc) = edit.cc {
            self.cc = distinct_identities(cc);
        }
        if let Some(bcc) = edit.bcc {
            self.bcc = distinct_identities(bcc);
        }
        self.main_category = main_category;
        self.sub_category = sub_category;
        self.priority = PriorityCalculator::calculate(self.severity, self.impact);
        if let Some(status) = edit.status {
            self.apply_status(status, now);
        }
        self.touch(now);

        self.audit_log.record(now, &actor.id, AuditAction::TicketUpdated, "Ticket details were edited");
        self.raise_event(DomainEvent::Ticket(TicketEvent::Updated {
            ticket_id: self.id.clone(),
            priority: self.priority,
        }));

        Ok(())
    }

    /// Assign an agent. Status is left as it is.
    pub fn assign(&mut self, actor: &User, agent: UserId) -> TicketResult<()> {
        require_text("agent", agent.as_str())?;
        let now = Utc::now();
        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::TicketAssigned,
            format!("Assigned to {}", agent),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::Assigned {
            ticket_id: self.id.clone(),
            agent: agent.clone(),
        }));
        self.assigned_agent = Some(agent);
        self.touch(now);
        Ok(())
    }

    /// Set the status directly (bulk edits, workflow buttons).
    pub fn change_status(&mut self, actor: &User, status: TicketStatus) -> TicketResult<()> {
        self.ensure_editable()?;
        if status == TicketStatus::Merged {
            return Err(TicketError::validation("tickets only become Merged through a merge"));
        }
        let now = Utc::now();
        let from = self.status;
        self.apply_status(status, now);
        self.touch(now);

        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::StatusChanged,
            format!("Status changed from {} to {}", from, status),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::StatusChanged {
            ticket_id: self.id.clone(),
            from,
            to: status,
        }));
        Ok(())
    }

    /// Reopen a closed ticket. Returns the system message recording why.
    pub fn reopen(&mut self, actor: &User, reason: &str) -> TicketResult<Reply> {
        if self.status != TicketStatus::Closed {
            return Err(TicketError::validation(format!(
                "only closed tickets can be reopened ({} is {})",
                self.number, self.status
            )));
        }
        require_text("reopen reason", reason)?;

        let now = Utc::now();
        let reason = reason.trim().to_string();
        let reply = Reply::new(
            self.id.clone(),
            actor.id.clone(),
            reason.clone(),
            ReplyType::SystemMessage,
            vec![],
            now,
        );
        self.note_reply(&reply);
        self.status = TicketStatus::ReOpened;
        self.closed_at = None;

        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::TicketReopened,
            format!("Ticket reopened. Reason: {}", reason),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::Reopened {
            ticket_id: self.id.clone(),
            reason,
        }));

        Ok(reply)
    }

    /// Close with a closing category and reason.
    ///
    /// The closing category replaces the main category; a sub-category that no
    /// longer fits is cleared.
    pub fn close(&mut self, actor: &User, category: MainCategory, reason: &str) -> TicketResult<Reply> {
        self.ensure_editable()?;
        require_text("close reason", reason)?;

        let now = Utc::now();
        let reason = reason.trim().to_string();
        let details = format!("Ticket closed. Category: {}, Reason: {}", category, reason);
        let reply = Reply::new(
            self.id.clone(),
            actor.id.clone(),
            details.clone(),
            ReplyType::SystemMessage,
            vec![],
            now,
        );

        self.main_category = category;
        self.sub_category = self.sub_category.filter(|sub| sub.belongs_to(category));
        self.close_reason = Some(reason.clone());
        self.apply_status(TicketStatus::Closed, now);
        self.note_reply(&reply);

        self.audit_log.record(now, &actor.id, AuditAction::TicketClosed, details);
        self.raise_event(DomainEvent::Ticket(TicketEvent::Closed {
            ticket_id: self.id.clone(),
            category,
            reason,
        }));

        Ok(reply)
    }

    /// Append a reply to the conversation.
    pub fn add_reply(
        &mut self,
        author: &User,
        content: &str,
        reply_type: ReplyType,
        attachments: Vec<Attachment>,
    ) -> TicketResult<Reply> {
        require_text("reply content", content)?;
        if reply_type.requires_agent() && !author.is_agent() {
            return Err(TicketError::permission(format!(
                "only agents can add a {}",
                reply_type
            )));
        }

        let reply = Reply::new(
            self.id.clone(),
            author.id.clone(),
            content.to_string(),
            reply_type,
            attachments,
            Utc::now(),
        );
        self.note_reply(&reply);

        self.audit_log.record(
            reply.created_at(),
            &author.id,
            AuditAction::ReplyAdded,
            format!("{} added to the ticket", reply_type),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::ReplyAdded {
            ticket_id: self.id.clone(),
            reply_id: reply.id().clone(),
            reply_type,
        }));

        Ok(reply)
    }

    /// Replace a reply's content and attachments. Only its author may do so.
    pub fn edit_reply(
        &mut self,
        reply: &mut Reply,
        editor: &User,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> TicketResult<()> {
        if reply.ticket_id() != &self.id {
            return Err(TicketError::not_found(format!(
                "reply {} on ticket {}",
                reply.id(),
                self.number
            )));
        }
        if reply.author() != &editor.id {
            return Err(TicketError::permission(format!(
                "only {} can edit this message",
                reply.author()
            )));
        }
        self.ensure_editable()?;
        let content = content.into();
        require_text("reply content", &content)?;

        let now = Utc::now();
        reply.replace(content, attachments, now);
        self.touch(now);

        self.audit_log.record(
            now,
            &editor.id,
            AuditAction::MessageEdited,
            format!("Message {} was edited", reply.id()),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::ReplyEdited {
            ticket_id: self.id.clone(),
            reply_id: reply.id().clone(),
        }));
        Ok(())
    }

    /// Make an edit buffer durable.
    pub fn commit_draft(&mut self, reply: &mut Reply, editor: &User, draft: ReplyDraft) -> TicketResult<()> {
        let (reply_id, content, attachments) = draft.into_parts();
        if &reply_id != reply.id() {
            return Err(TicketError::validation(format!(
                "draft for {} cannot be applied to {}",
                reply_id,
                reply.id()
            )));
        }
        self.edit_reply(reply, editor, content, attachments)
    }

    /// Open a new ticket carrying this one's classification and routing, with
    /// `message` as its description.
    pub fn clone_with_message(&mut self, number: TicketNumber, actor: &User, message: &str) -> TicketResult<Ticket> {
        require_text("clone message", message)?;

        let form = NewTicket {
            title: self.title.clone(),
            description: message.trim().to_string(),
            severity: self.severity,
            impact: self.impact,
            main_category: self.main_category,
            sub_category: self.sub_category,
            service: self.service.as_str().to_string(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            attachments: vec![],
        };
        let clone = Ticket::create(number, &actor.id, form)?;

        let now = Utc::now();
        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::TicketCloned,
            format!("Ticket cloned to {}. Reason: {}", number, message.trim()),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::Cloned {
            ticket_id: self.id.clone(),
            clone_id: clone.id().clone(),
        }));

        Ok(clone)
    }

    /// Absorb this ticket into `main`. History and replies are kept.
    pub(crate) fn mark_merged(&mut self, actor: &User, main_id: &TicketId, main_number: TicketNumber) -> TicketResult<()> {
        if self.is_merged() {
            return Err(TicketError::validation(format!("{} is already merged", self.number)));
        }
        let now = Utc::now();
        self.apply_status(TicketStatus::Merged, now);
        self.merged_into = Some(main_id.clone());
        self.touch(now);

        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::TicketMerged,
            format!("Merged into {}", main_number),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::Merged {
            ticket_id: self.id.clone(),
            into: main_id.clone(),
        }));
        Ok(())
    }

    /// Record on the main ticket which tickets were merged into it.
    pub(crate) fn record_absorbed(&mut self, actor: &User, merged: &[TicketNumber]) {
        let now = Utc::now();
        let numbers: Vec<String> = merged.iter().map(|n| n.to_string()).collect();
        self.touch(now);

        self.audit_log.record(
            now,
            &actor.id,
            AuditAction::TicketsMerged,
            format!("Merged tickets {} into this ticket", numbers.join(", ")),
        );
        self.raise_event(DomainEvent::Ticket(TicketEvent::Absorbed {
            ticket_id: self.id.clone(),
            merged: merged.to_vec(),
        }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Private
    // =========================================================================

    fn ensure_editable(&self) -> TicketResult<()> {
        if self.is_merged() {
            return Err(TicketError::validation(format!(
                "{} has been merged and is read-only",
                self.number
            )));
        }
        Ok(())
    }

    fn apply_status(&mut self, status: TicketStatus, now: DateTime<Utc>) {
        if status == TicketStatus::Closed && self.status != TicketStatus::Closed {
            self.closed_at = Some(now);
        } else if status != TicketStatus::Closed {
            self.closed_at = None;
        }
        self.status = status;
    }

    fn note_reply(&mut self, reply: &Reply) {
        self.last_reply_by = Some(reply.author().clone());
        self.last_reply_at = Some(reply.created_at());
        self.touch(reply.created_at());
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.last_updated_at = now;
    }
}

/// Storage shape of a ticket.
///
/// Loading a record never trusts the stored priority or sub-category: both are
/// re-derived so a stale row cannot break the aggregate's invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub number: TicketNumber,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub impact: Impact,
    pub priority: Priority,
    pub main_category: MainCategory,
    pub sub_category: Option<SubCategory>,
    pub status: TicketStatus,
    pub created_by: UserId,
    pub assigned_agent: Option<UserId>,
    pub service: Service,
    #[serde(default)]
    pub cc: Vec<UserId>,
    #[serde(default)]
    pub bcc: Vec<UserId>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub close_reason: Option<String>,
    #[serde(default)]
    pub merged_into: Option<TicketId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_reply_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_reply_by: Option<UserId>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub audit_log: AuditLog,
}

impl From<TicketRecord> for Ticket {
    fn from(record: TicketRecord) -> Self {
        let main_category = record.main_category;
        Self {
            id: record.id,
            number: record.number,
            title: record.title,
            description: record.description,
            severity: record.severity,
            impact: record.impact,
            priority: PriorityCalculator::calculate(record.severity, record.impact),
            main_category,
            sub_category: record.sub_category.filter(|sub| sub.belongs_to(main_category)),
            status: record.status,
            created_by: record.created_by,
            assigned_agent: record.assigned_agent,
            service: record.service,
            cc: distinct_identities(record.cc),
            bcc: distinct_identities(record.bcc),
            attachments: record.attachments,
            close_reason: record.close_reason,
            merged_into: record.merged_into,
            created_at: record.created_at,
            updated_at: record.updated_at,
            last_updated_at: record.last_updated_at,
            last_reply_at: record.last_reply_at,
            last_reply_by: record.last_reply_by,
            closed_at: record.closed_at,
            audit_log: record.audit_log,
            events: vec![],
        }
    }
}

impl From<Ticket> for TicketRecord {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            number: ticket.number,
            title: ticket.title,
            description: ticket.description,
            severity: ticket.severity,
            impact: ticket.impact,
            priority: ticket.priority,
            main_category: ticket.main_category,
            sub_category: ticket.sub_category,
            status: ticket.status,
            created_by: ticket.created_by,
            assigned_agent: ticket.assigned_agent,
            service: ticket.service,
            cc: ticket.cc,
            bcc: ticket.bcc,
            attachments: ticket.attachments,
            close_reason: ticket.close_reason,
            merged_into: ticket.merged_into,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            last_updated_at: ticket.last_updated_at,
            last_reply_at: ticket.last_reply_at,
            last_reply_by: ticket.last_reply_by,
            closed_at: ticket.closed_at,
            audit_log: ticket.audit_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{BridgelinkTopic, ItSupportTopic};

    fn agent() -> User {
        User::agent("Agent One", "agent1@example.com")
    }

    fn requester() -> User {
        User::end_user("Pat User", "user@example.com")
    }

    fn create_test_ticket() -> Ticket {
        let form = NewTicket::new(
            "Cannot access email",
            "I am unable to access my email account.",
            Severity::High,
            Impact::Department,
            MainCategory::ItSystemSupport,
            "Silver Bridge School",
        )
        .with_sub_category(SubCategory::ItSystemSupport(ItSupportTopic::Microsoft))
        .with_cc(vec![UserId::new("user2@example.com"), UserId::new("user2@example.com")]);
        Ticket::create(TicketNumber::new(1), &requester().id, form).unwrap()
    }

    fn closed_ticket() -> Ticket {
        let mut ticket = create_test_ticket();
        ticket.close(&agent(), MainCategory::ItSystemSupport, "Password reset").unwrap();
        ticket
    }

    #[test]
    fn test_ticket_creation() {
        let ticket = create_test_ticket();
        assert_eq!(ticket.number().to_string(), "TICK-001");
        assert_eq!(ticket.status(), TicketStatus::New);
        assert_eq!(ticket.priority(), Priority::Medium);
        assert_eq!(ticket.cc().len(), 1);
        assert!(ticket.last_reply_by().is_none());

        let seeded = ticket.audit_log().entries();
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].action, AuditAction::TicketCreated);
        assert_eq!(seeded[0].actor, UserId::new("user@example.com"));
    }

    #[test]
    fn test_creation_requires_fields() {
        let blank_title = NewTicket::new(" ", "desc", Severity::Low, Impact::Individual, MainCategory::Training, "Valley Bridge School");
        assert!(matches!(
            Ticket::create(TicketNumber::new(2), &requester().id, blank_title),
            Err(TicketError::Validation(_))
        ));

        let no_service = NewTicket::new("Title", "desc", Severity::Low, Impact::Individual, MainCategory::Training, "");
        assert!(Ticket::create(TicketNumber::new(2), &requester().id, no_service).is_err());
    }

    #[test]
    fn test_creation_rejects_foreign_sub_category() {
        let form = NewTicket::new("Title", "desc", Severity::Low, Impact::Individual, MainCategory::Training, "Valley Bridge School")
            .with_sub_category(SubCategory::Bridgelink(BridgelinkTopic::Admissions));
        assert!(matches!(
            Ticket::create(TicketNumber::new(3), &requester().id, form),
            Err(TicketError::Validation(_))
        ));
    }

    #[test]
    fn test_severity_edit_recomputes_priority() {
        let mut ticket = create_test_ticket();
        ticket.edit(&agent(), TicketEdit::default().severity(Severity::Critical)).unwrap();
        assert_eq!(ticket.priority(), Priority::High);

        ticket.edit(&agent(), TicketEdit::default().impact(Impact::EntireOrganization)).unwrap();
        assert_eq!(ticket.priority(), Priority::Urgent);
    }

    #[test]
    fn test_title_edit_keeps_priority() {
        let mut ticket = create_test_ticket();
        let before = ticket.priority();
        ticket.edit(&agent(), TicketEdit::default().title("Email login loop")).unwrap();
        assert_eq!(ticket.priority(), before);
        assert_eq!(ticket.title(), "Email login loop");
        assert_eq!(ticket.audit_log().last().unwrap().action, AuditAction::TicketUpdated);
    }

    #[test]
    fn test_main_category_change_clears_sub_category() {
        let mut ticket = create_test_ticket();
        ticket.edit(&agent(), TicketEdit::default().main_category(MainCategory::Development)).unwrap();
        assert_eq!(ticket.main_category(), MainCategory::Development);
        assert_eq!(ticket.sub_category(), None);
    }

    #[test]
    fn test_rejected_edit_leaves_ticket_untouched() {
        let mut ticket = create_test_ticket();
        let edit = TicketEdit::default()
            .title("New title")
            .sub_category(Some(SubCategory::Bridgelink(BridgelinkTopic::Groups)));
        assert!(ticket.edit(&agent(), edit).is_err());
        assert_eq!(ticket.title(), "Cannot access email");
        assert_eq!(ticket.audit_log().len(), 1);
    }

    #[test]
    fn test_assign_keeps_status() {
        let mut ticket = create_test_ticket();
        ticket.assign(&agent(), UserId::new("agent2@example.com")).unwrap();
        assert_eq!(ticket.assigned_agent(), Some(&UserId::new("agent2@example.com")));
        assert_eq!(ticket.status(), TicketStatus::New);
    }

    #[test]
    fn test_close_records_category_and_reason() {
        let mut ticket = create_test_ticket();
        let reply = ticket.close(&agent(), MainCategory::Bridgelink, "Duplicate of an access request").unwrap();

        assert_eq!(ticket.status(), TicketStatus::Closed);
        assert_eq!(ticket.main_category(), MainCategory::Bridgelink);
        assert_eq!(ticket.sub_category(), None);
        assert_eq!(ticket.close_reason(), Some("Duplicate of an access request"));
        assert!(ticket.closed_at().is_some());
        assert_eq!(reply.reply_type(), ReplyType::SystemMessage);
        assert_eq!(ticket.audit_log().last().unwrap().action, AuditAction::TicketClosed);
    }

    #[test]
    fn test_close_requires_reason() {
        let mut ticket = create_test_ticket();
        assert!(ticket.close(&agent(), MainCategory::Training, "   ").is_err());
        assert_eq!(ticket.status(), TicketStatus::New);
    }

    #[test]
    fn test_reopen_only_from_closed() {
        let mut ticket = create_test_ticket();
        assert!(matches!(ticket.reopen(&requester(), "still broken"), Err(TicketError::Validation(_))));

        let mut ticket = closed_ticket();
        assert!(ticket.reopen(&requester(), "").is_err());
        assert_eq!(ticket.status(), TicketStatus::Closed);

        let audit_before = ticket.audit_log().len();
        let reply = ticket.reopen(&requester(), "Still cannot log in").unwrap();
        assert_eq!(ticket.status(), TicketStatus::ReOpened);
        assert_eq!(reply.content(), "Still cannot log in");
        assert_eq!(reply.reply_type(), ReplyType::SystemMessage);
        assert_eq!(ticket.last_reply_by(), Some(&requester().id));
        assert_eq!(ticket.audit_log().len(), audit_before + 1);
        assert!(ticket.closed_at().is_none());
    }

    #[test]
    fn test_add_reply_updates_last_reply() {
        let mut ticket = create_test_ticket();
        let reply = ticket.add_reply(&agent(), "Can you share a screenshot?", ReplyType::RequestInfo, vec![]).unwrap();
        assert_eq!(ticket.last_reply_by(), Some(&agent().id));
        assert_eq!(ticket.last_reply_at(), Some(reply.created_at()));
        let entry = ticket.audit_log().last().unwrap();
        assert_eq!(entry.action, AuditAction::ReplyAdded);
        assert_eq!(entry.details, "Request Info added to the ticket");
    }

    #[test]
    fn test_add_reply_rejects_blank_content() {
        let mut ticket = create_test_ticket();
        assert!(matches!(
            ticket.add_reply(&agent(), " \n ", ReplyType::AgentReply, vec![]),
            Err(TicketError::Validation(_))
        ));
        assert!(ticket.last_reply_by().is_none());
    }

    #[test]
    fn test_internal_comment_requires_agent() {
        let mut ticket = create_test_ticket();
        assert!(matches!(
            ticket.add_reply(&requester(), "note to self", ReplyType::InternalComment, vec![]),
            Err(TicketError::Permission(_))
        ));
        assert!(ticket.add_reply(&agent(), "check server logs", ReplyType::InternalComment, vec![]).is_ok());
    }

    #[test]
    fn test_edit_reply_by_non_author_is_denied() {
        let mut ticket = create_test_ticket();
        let mut reply = ticket.add_reply(&agent(), "Original answer", ReplyType::AgentReply, vec![]).unwrap();
        let intruder = User::agent("Agent Two", "agent2@example.com");

        let result = ticket.edit_reply(&mut reply, &intruder, "Rewritten", vec![]);
        assert!(matches!(result, Err(TicketError::Permission(_))));
        assert_eq!(reply.content(), "Original answer");
        assert!(!reply.is_edited());
    }

    #[test]
    fn test_edit_reply_by_author() {
        let mut ticket = create_test_ticket();
        let mut reply = ticket
            .add_reply(&agent(), "Try again", ReplyType::AgentReply, vec![Attachment::new("a.txt", 10, "text/plain")])
            .unwrap();
        let created_at = reply.created_at();

        let mut draft = ReplyDraft::begin(&reply);
        draft.content = "Try again after clearing the cache".into();
        draft.remove_attachment(0).unwrap();
        ticket.commit_draft(&mut reply, &agent(), draft).unwrap();

        assert_eq!(reply.content(), "Try again after clearing the cache");
        assert!(reply.attachments().is_empty());
        assert_eq!(reply.created_at(), created_at);
        assert_eq!(ticket.audit_log().last().unwrap().action, AuditAction::MessageEdited);
    }

    #[test]
    fn test_merged_ticket_is_read_only() {
        let mut ticket = create_test_ticket();
        let main = TicketId::new();
        ticket.mark_merged(&agent(), &main, TicketNumber::new(9)).unwrap();

        assert!(ticket.edit(&agent(), TicketEdit::default().title("x")).is_err());
        assert!(ticket.close(&agent(), MainCategory::Training, "done").is_err());
        assert!(ticket.mark_merged(&agent(), &main, TicketNumber::new(9)).is_err());
        assert_eq!(ticket.merged_into(), Some(&main));
        assert_eq!(ticket.audit_log().last().unwrap().details, "Merged into TICK-009");
    }

    #[test]
    fn test_merging_closed_ticket_clears_closed_at() {
        let mut ticket = closed_ticket();
        assert!(ticket.closed_at().is_some());

        ticket.mark_merged(&agent(), &TicketId::new(), TicketNumber::new(9)).unwrap();
        assert_eq!(ticket.status(), TicketStatus::Merged);
        assert!(ticket.closed_at().is_none());
        assert!(!ticket.is_stale_closed(Utc::now() + Duration::days(60)));
    }

    #[test]
    fn test_change_status_cannot_merge() {
        let mut ticket = create_test_ticket();
        assert!(ticket.change_status(&agent(), TicketStatus::Merged).is_err());
        ticket.change_status(&agent(), TicketStatus::UnderInvestigation).unwrap();
        assert_eq!(ticket.status(), TicketStatus::UnderInvestigation);
        assert_eq!(
            ticket.audit_log().last().unwrap().details,
            "Status changed from New to Under Investigation"
        );
    }

    #[test]
    fn test_stale_closed_detection() {
        let now = Utc::now();
        let ticket = closed_ticket();
        assert!(!ticket.is_stale_closed(now));
        assert!(ticket.is_stale_closed(now + Duration::days(31)));

        let mut record = TicketRecord::from(closed_ticket());
        record.closed_at = Some(now - Duration::days(45));
        let old = Ticket::from(record);
        assert!(old.is_stale_closed(now));

        let mut still_open = create_test_ticket();
        assert!(!still_open.is_stale_closed(now + Duration::days(90)));
        still_open.edit(&agent(), TicketEdit::default().title("still fine")).unwrap();
    }

    #[test]
    fn test_record_load_restores_invariants() {
        let mut record = TicketRecord::from(create_test_ticket());
        record.priority = Priority::Low;
        record.main_category = MainCategory::AssetRegister;

        let ticket = Ticket::from(record);
        assert_eq!(ticket.priority(), Priority::Medium);
        assert_eq!(ticket.sub_category(), None);
    }

    #[test]
    fn test_serde_goes_through_record() {
        let ticket = create_test_ticket();
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), ticket.id());
        assert_eq!(back.audit_log().len(), 1);
    }

    #[test]
    fn test_clone_with_message() {
        let mut source = create_test_ticket();
        let clone = source.clone_with_message(TicketNumber::new(5), &agent(), "Same problem at Chapel Bridge").unwrap();

        assert_eq!(clone.number(), TicketNumber::new(5));
        assert_eq!(clone.title(), source.title());
        assert_eq!(clone.description(), "Same problem at Chapel Bridge");
        assert_eq!(clone.created_by(), &agent().id);
        assert_eq!(clone.sub_category(), source.sub_category());
        assert_eq!(source.audit_log().last().unwrap().action, AuditAction::TicketCloned);
        assert!(source.clone_with_message(TicketNumber::new(6), &agent(), " ").is_err());
    }

    #[test]
    fn test_take_events_drains() {
        let mut ticket = create_test_ticket();
        ticket.assign(&agent(), UserId::new("agent1@example.com")).unwrap();
        let events = ticket.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "ticket.created");
        assert_eq!(events[1].event_type(), "ticket.assigned");
        assert!(ticket.take_events().is_empty());
    }
}
