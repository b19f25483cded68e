//! Reply entity
//!
//! Replies reference their ticket by id. They are append-only; an edit
//! replaces content and attachments in place and leaves `created_at` alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Attachment, ReplyId, TicketId, UserId};
use crate::error::{TicketError, TicketResult};

labelled_enum! {
    ReplyType {
        UserReply => "User Reply",
        AgentReply => "Agent Reply",
        InternalComment => "Internal Comment",
        ExternalComment => "External Comment",
        DevelopmentComment => "Development Comment",
        SuggestSolution => "Suggest Solution",
        RequestInfo => "Request Info",
        SystemMessage => "System Message",
    }
}

impl ReplyType {
    /// Internal notes are only visible to, and writable by, agents.
    pub fn requires_agent(&self) -> bool {
        matches!(self, Self::InternalComment | Self::DevelopmentComment)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    id: ReplyId,
    ticket_id: TicketId,
    author: UserId,
    content: String,
    reply_type: ReplyType,
    attachments: Vec<Attachment>,
    created_at: DateTime<Utc>,
    edited_at: Option<DateTime<Utc>>,
}

impl Reply {
    pub(crate) fn new(
        ticket_id: TicketId,
        author: UserId,
        content: String,
        reply_type: ReplyType,
        attachments: Vec<Attachment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReplyId::new(),
            ticket_id,
            author,
            content,
            reply_type,
            attachments,
            created_at,
            edited_at: None,
        }
    }

    /// Rebuild a reply that already exists elsewhere, keeping its identity.
    pub(crate) fn restore(
        id: ReplyId,
        ticket_id: TicketId,
        author: UserId,
        content: String,
        reply_type: ReplyType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { id, ticket_id, author, content, reply_type, attachments: vec![], created_at, edited_at: None }
    }

    pub fn id(&self) -> &ReplyId { &self.id }
    pub fn ticket_id(&self) -> &TicketId { &self.ticket_id }
    pub fn author(&self) -> &UserId { &self.author }
    pub fn content(&self) -> &str { &self.content }
    pub fn reply_type(&self) -> ReplyType { self.reply_type }
    pub fn attachments(&self) -> &[Attachment] { &self.attachments }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn edited_at(&self) -> Option<DateTime<Utc>> { self.edited_at }
    pub fn is_edited(&self) -> bool { self.edited_at.is_some() }

    pub(crate) fn replace(&mut self, content: String, attachments: Vec<Attachment>, at: DateTime<Utc>) {
        self.content = content;
        self.attachments = attachments;
        self.edited_at = Some(at);
    }
}

/// In-progress edit of a reply.
///
/// Changes stay local to the draft until it is committed with
/// `Ticket::edit_reply`; dropping the draft discards them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyDraft {
    reply_id: ReplyId,
    pub content: String,
    attachments: Vec<Attachment>,
}

impl ReplyDraft {
    pub fn begin(reply: &Reply) -> Self {
        Self {
            reply_id: reply.id.clone(),
            content: reply.content.clone(),
            attachments: reply.attachments.clone(),
        }
    }

    pub fn reply_id(&self) -> &ReplyId {
        &self.reply_id
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn remove_attachment(&mut self, index: usize) -> TicketResult<Attachment> {
        if index >= self.attachments.len() {
            return Err(TicketError::validation(format!(
                "attachment index {index} out of bounds ({} attachments)",
                self.attachments.len()
            )));
        }
        Ok(self.attachments.remove(index))
    }

    pub(crate) fn into_parts(self) -> (ReplyId, String, Vec<Attachment>) {
        (self.reply_id, self.content, self.attachments)
    }
}
