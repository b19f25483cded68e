//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::*;
use crate::application::queries::{TicketQuery, TicketStats};
use crate::domain::aggregates::{NewTicket, Reply, Ticket, TicketEdit, User};
use crate::domain::value_objects::{TicketId, UserId};
use crate::error::TicketError;
use crate::ports::outbound::RepositoryError;

/// Ticket lifecycle use cases
#[async_trait]
pub trait TicketUseCases: Send + Sync {
    /// Open a new ticket
    async fn create_ticket(&self, actor: &User, ticket: NewTicket) -> Result<Ticket, UseCaseError>;

    /// Edit ticket fields in place
    async fn edit_ticket(&self, actor: &User, id: &TicketId, edit: TicketEdit) -> Result<EditedTicket, UseCaseError>;

    /// Assign an agent
    async fn assign_ticket(&self, actor: &User, id: &TicketId, agent: UserId) -> Result<Ticket, UseCaseError>;

    /// Reopen a closed ticket
    async fn reopen_ticket(&self, actor: &User, id: &TicketId, reason: &str) -> Result<Ticket, UseCaseError>;

    /// Close with a category and reason
    async fn close_ticket(&self, actor: &User, command: CloseTicketCommand) -> Result<Ticket, UseCaseError>;

    /// Open a copy of a ticket
    async fn clone_ticket(&self, actor: &User, command: CloneTicketCommand) -> Result<Ticket, UseCaseError>;

    /// Add a reply to a ticket's conversation
    async fn add_reply(&self, actor: &User, command: AddReplyCommand) -> Result<Reply, UseCaseError>;

    /// Edit a reply (author only)
    async fn edit_reply(&self, actor: &User, command: EditReplyCommand) -> Result<Reply, UseCaseError>;

    /// Apply one action to many tickets
    async fn bulk_edit(&self, actor: &User, command: BulkEditCommand) -> Result<BulkEditResult, UseCaseError>;

    /// Merge tickets into a main ticket
    async fn merge_tickets(&self, actor: &User, command: MergeTicketsCommand) -> Result<Ticket, UseCaseError>;

    /// Delete a ticket and its replies
    async fn delete_ticket(&self, actor: &User, id: &TicketId) -> Result<(), UseCaseError>;

    /// Get ticket by ID
    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, UseCaseError>;

    /// Replies on a ticket, oldest first
    async fn get_conversation(&self, id: &TicketId) -> Result<Vec<Reply>, UseCaseError>;

    /// Filtered, sorted ticket list
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<TicketSummary>, UseCaseError>;

    /// Dashboard counters over all tickets
    async fn ticket_stats(&self) -> Result<TicketStats, UseCaseError>;

    /// CSV export of a filtered list
    async fn export_tickets(&self, query: &TicketQuery, range: ExportRange) -> Result<CsvExport, UseCaseError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    #[error(transparent)]
    Domain(#[from] TicketError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("export failed: {0}")]
    Export(String),
}

impl UseCaseError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Domain(TicketError::not_found(what))
    }
}
