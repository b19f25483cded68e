//! OpenSASE Helpdesk Engine
//!
//! Support-ticket lifecycle and query engine for a school-group helpdesk,
//! following Domain-Driven Design (DDD) and hexagonal architecture.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Ticket and reply aggregates, classification, priority triage, domain events
//! - **Application Layer**: Use case orchestration, the query engine, DTOs
//! - **Ports Layer**: Hexagonal architecture interfaces
//! - **Infrastructure Layer**: In-memory repositories, CSV export, legacy import
//!
//! ## Key Aggregates
//!
//! - **Ticket**: Numbered support request with status lifecycle and audit trail
//! - **Reply**: One message in a ticket's conversation
//!
//! ## Features
//!
//! - Priority derived from severity and impact
//! - Reopen, close, clone, merge and bulk actions with audit history
//! - Filtering, sorting and awaiting-reply/overdue flags for list views
//! - CSV export over a date window
//! - Known-issues board shared across readers

pub mod error;
pub mod config;
pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;

// Re-exports for convenience
pub use error::{TicketError, TicketResult};
pub use config::{ConfigError, EngineConfig, KnownIssues};
pub use domain::aggregates::{NewTicket, Reply, ReplyDraft, ReplyType, Ticket, TicketEdit, User, UserRole};
pub use domain::value_objects::{
    Attachment, Impact, MainCategory, Priority, ReplyId, Severity, SubCategory, TicketId, TicketNumber, TicketStatus,
    UserId,
};
pub use domain::events::{DomainEvent, TicketEvent};
pub use domain::services::{BulkAction, BulkOperator, PriorityCalculator};
pub use application::HelpdeskService;
pub use application::queries::{AwaitingReply, SortDirection, SortKey, SortState, TicketFilter, TicketQuery, TicketStats};
pub use ports::inbound::{TicketUseCases, UseCaseError};
pub use ports::outbound::{EventPublisher, ReplyRepository, RepositoryError, TicketRepository};
