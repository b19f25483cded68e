//! In-memory repository implementations
//!
//! Used by tests and demos. Batch writes take the write lock once, so a
//! `save_all` is observed either entirely or not at all.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::domain::aggregates::{Reply, Ticket};
use crate::domain::value_objects::{NumberSequence, ReplyId, TicketId, TicketNumber};
use crate::domain::DomainEvent;
use crate::ports::outbound::{EventPublisher, ReplyRepository, RepositoryError, TicketRepository};

#[derive(Default)]
struct TicketStore {
    tickets: HashMap<TicketId, Ticket>,
    sequence: NumberSequence,
}

impl TicketStore {
    fn check_number(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
        let clash = self
            .tickets
            .values()
            .any(|stored| stored.number() == ticket.number() && stored.id() != ticket.id());
        if clash {
            return Err(RepositoryError::Conflict(format!(
                "{} is already used by another ticket",
                ticket.number()
            )));
        }
        Ok(())
    }

    fn put(&mut self, ticket: &Ticket) {
        self.sequence.observe(ticket.number());
        self.tickets.insert(ticket.id().clone(), ticket.clone());
    }
}

/// In-memory ticket repository
#[derive(Default)]
pub struct InMemoryTicketRepository {
    store: RwLock<TicketStore>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate, e.g. from fixtures. Later numbers continue after the
    /// highest seeded one.
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.store.write();
            for ticket in tickets {
                store.put(&ticket);
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.store.read().tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().tickets.is_empty()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, RepositoryError> {
        Ok(self.store.read().tickets.get(id).cloned())
    }

    async fn find_by_number(&self, number: TicketNumber) -> Result<Option<Ticket>, RepositoryError> {
        let store = self.store.read();
        Ok(store.tickets.values().find(|t| t.number() == number).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, RepositoryError> {
        let store = self.store.read();
        let mut tickets: Vec<Ticket> = store.tickets.values().cloned().collect();
        tickets.sort_by_key(|t| t.number());
        Ok(tickets)
    }

    async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError> {
        let mut store = self.store.write();
        store.check_number(ticket)?;
        store.put(ticket);
        Ok(())
    }

    async fn save_all(&self, tickets: &[Ticket]) -> Result<(), RepositoryError> {
        let mut store = self.store.write();
        for ticket in tickets {
            store.check_number(ticket)?;
        }
        for ticket in tickets {
            store.put(ticket);
        }
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<(), RepositoryError> {
        let mut store = self.store.write();
        store
            .tickets
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("ticket {id}")))
    }

    async fn next_number(&self) -> Result<TicketNumber, RepositoryError> {
        Ok(self.store.write().sequence.next())
    }
}

/// In-memory reply repository
#[derive(Default)]
pub struct InMemoryReplyRepository {
    replies: RwLock<Vec<Reply>>,
}

impl InMemoryReplyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self { replies: RwLock::new(replies.into_iter().collect()) }
    }

    fn upsert(replies: &mut Vec<Reply>, reply: &Reply) {
        match replies.iter_mut().find(|r| r.id() == reply.id()) {
            Some(existing) => *existing = reply.clone(),
            None => replies.push(reply.clone()),
        }
    }
}

#[async_trait]
impl ReplyRepository for InMemoryReplyRepository {
    async fn find_by_id(&self, id: &ReplyId) -> Result<Option<Reply>, RepositoryError> {
        Ok(self.replies.read().iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Vec<Reply>, RepositoryError> {
        let replies = self.replies.read();
        let mut thread: Vec<Reply> = replies.iter().filter(|r| r.ticket_id() == ticket_id).cloned().collect();
        thread.sort_by_key(|r| r.created_at());
        Ok(thread)
    }

    async fn save(&self, reply: &Reply) -> Result<(), RepositoryError> {
        Self::upsert(&mut self.replies.write(), reply);
        Ok(())
    }

    async fn save_all(&self, replies: &[Reply]) -> Result<(), RepositoryError> {
        let mut stored = self.replies.write();
        for reply in replies {
            Self::upsert(&mut stored, reply);
        }
        Ok(())
    }

    async fn delete_by_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError> {
        self.replies.write().retain(|r| r.ticket_id() != ticket_id);
        Ok(())
    }
}

/// No-op event publisher
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in &events {
            tracing::debug!("Event published: {}", event.event_type());
        }
        Ok(())
    }
}

/// Keeps every published event, for assertions
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.event_type()).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events.lock().extend(events);
        Ok(())
    }
}
