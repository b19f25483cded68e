//! Infrastructure layer
//!
//! Concrete adapters behind the ports: storage, legacy import, export.

pub mod acl;
pub mod export;
pub mod fixtures;
pub mod persistence;

pub use export::CsvExporter;
pub use fixtures::{SampleFixtures, TicketFixtures};
pub use persistence::{
    InMemoryReplyRepository, InMemoryTicketRepository, NoOpEventPublisher, RecordingEventPublisher,
};
