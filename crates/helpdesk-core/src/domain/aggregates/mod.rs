//! Aggregates module

pub mod audit;
pub mod reply;
pub mod ticket;
pub mod user;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use reply::{Reply, ReplyDraft, ReplyType};
pub use ticket::{NewTicket, Ticket, TicketEdit, TicketRecord, STALE_CLOSED_AFTER_DAYS};
pub use user::{User, UserRole};
