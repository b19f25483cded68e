//! Outbound ports (Repository traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure must implement.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{Reply, Ticket};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{ReplyId, TicketId, TicketNumber};

/// Ticket repository port
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Find ticket by ID
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, RepositoryError>;

    /// Find ticket by its human-facing number
    async fn find_by_number(&self, number: TicketNumber) -> Result<Option<Ticket>, RepositoryError>;

    /// Every stored ticket, in number order
    async fn find_all(&self) -> Result<Vec<Ticket>, RepositoryError>;

    /// Save ticket (insert or update)
    async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError>;

    /// Save several tickets as one unit: either all are stored or none are
    async fn save_all(&self, tickets: &[Ticket]) -> Result<(), RepositoryError>;

    /// Delete ticket
    async fn delete(&self, id: &TicketId) -> Result<(), RepositoryError>;

    /// Issue the next ticket number. Numbers are never reused.
    async fn next_number(&self) -> Result<TicketNumber, RepositoryError>;
}

/// Reply repository port
#[async_trait]
pub trait ReplyRepository: Send + Sync {
    async fn find_by_id(&self, id: &ReplyId) -> Result<Option<Reply>, RepositoryError>;

    /// Replies on a ticket in creation order
    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Vec<Reply>, RepositoryError>;

    async fn save(&self, reply: &Reply) -> Result<(), RepositoryError>;

    async fn save_all(&self, replies: &[Reply]) -> Result<(), RepositoryError>;

    async fn delete_by_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}
