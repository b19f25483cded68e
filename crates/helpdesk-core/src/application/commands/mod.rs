//! Command handlers
//!
//! Application service that orchestrates the ticket use cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::dto::*;
use crate::application::queries::{TicketQuery, TicketStats};
use crate::config::EngineConfig;
use crate::domain::aggregates::{NewTicket, Reply, Ticket, TicketEdit, User};
use crate::domain::services::BulkOperator;
use crate::domain::value_objects::{TicketId, UserId};
use crate::domain::DomainEvent;
use crate::error::TicketResult;
use crate::infrastructure::export::CsvExporter;
use crate::infrastructure::fixtures::TicketFixtures;
use crate::infrastructure::persistence::{InMemoryReplyRepository, InMemoryTicketRepository, NoOpEventPublisher};
use crate::ports::inbound::{TicketUseCases, UseCaseError};
use crate::ports::outbound::{EventPublisher, ReplyRepository, TicketRepository};

/// Helpdesk application service
pub struct HelpdeskService {
    ticket_repo: Arc<dyn TicketRepository>,
    reply_repo: Arc<dyn ReplyRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    exporter: CsvExporter,
    config: EngineConfig,
}

impl HelpdeskService {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        reply_repo: Arc<dyn ReplyRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ticket_repo,
            reply_repo,
            event_publisher,
            exporter: CsvExporter::new(config.export_file_stem.clone()),
            config,
        }
    }

    /// In-memory service pre-loaded from `fixtures`
    pub fn seeded(fixtures: &dyn TicketFixtures, config: EngineConfig) -> TicketResult<Self> {
        let tickets = InMemoryTicketRepository::with_tickets(fixtures.tickets()?);
        let replies = InMemoryReplyRepository::with_replies(fixtures.replies()?);
        Ok(Self::new(Arc::new(tickets), Arc::new(replies), Arc::new(NoOpEventPublisher), config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn load(&self, id: &TicketId) -> Result<Ticket, UseCaseError> {
        self.ticket_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(format!("ticket {id}")))
    }

    /// Store changed tickets, then their new or edited replies, then publish.
    ///
    /// If the replies cannot be stored the tickets are put back to
    /// `originals`, so a failed operation leaves no partial state behind.
    async fn commit(
        &self,
        originals: &[Ticket],
        changed: &mut [Ticket],
        replies: &[Reply],
    ) -> Result<(), UseCaseError> {
        let events: Vec<DomainEvent> = changed.iter_mut().flat_map(|t| t.take_events()).collect();

        self.ticket_repo.save_all(changed).await?;
        if !replies.is_empty() {
            if let Err(e) = self.reply_repo.save_all(replies).await {
                tracing::warn!("Reply save failed, restoring {} ticket(s): {}", originals.len(), e);
                self.ticket_repo.save_all(originals).await?;
                return Err(e.into());
            }
        }

        if let Err(e) = self.event_publisher.publish(events).await {
            tracing::warn!("Event publishing failed after commit: {}", e);
        }
        Ok(())
    }
}

#[async_trait]
impl TicketUseCases for HelpdeskService {
    async fn create_ticket(&self, actor: &User, ticket: NewTicket) -> Result<Ticket, UseCaseError> {
        let number = self.ticket_repo.next_number().await?;
        let ticket = Ticket::create(number, &actor.id, ticket)?;

        let mut changed = [ticket];
        self.commit(&[], &mut changed, &[]).await?;
        let [ticket] = changed;

        tracing::info!(priority = %ticket.priority(), "Ticket {} created by {}", ticket.number(), actor.id);
        Ok(ticket)
    }

    async fn edit_ticket(&self, actor: &User, id: &TicketId, edit: TicketEdit) -> Result<EditedTicket, UseCaseError> {
        let mut ticket = self.load(id).await?;
        let original = ticket.clone();

        let stale = ticket.is_stale_closed_after(Utc::now(), self.config.stale_closed_after());
        if stale {
            tracing::warn!("Editing {} which has been closed for over {} days", ticket.number(), self.config.stale_closed_after_days);
        }
        ticket.edit(actor, edit)?;

        let mut changed = [ticket];
        self.commit(&[original], &mut changed, &[]).await?;
        let [ticket] = changed;

        tracing::info!("Ticket {} edited by {}", ticket.number(), actor.id);
        Ok(EditedTicket { ticket, stale_closed_warning: stale })
    }

    async fn assign_ticket(&self, actor: &User, id: &TicketId, agent: UserId) -> Result<Ticket, UseCaseError> {
        let mut ticket = self.load(id).await?;
        let original = ticket.clone();
        ticket.assign(actor, agent)?;

        let mut changed = [ticket];
        self.commit(&[original], &mut changed, &[]).await?;
        let [ticket] = changed;
        Ok(ticket)
    }

    async fn reopen_ticket(&self, actor: &User, id: &TicketId, reason: &str) -> Result<Ticket, UseCaseError> {
        let mut ticket = self.load(id).await?;
        let original = ticket.clone();
        let reply = ticket.reopen(actor, reason)?;

        let mut changed = [ticket];
        self.commit(&[original], &mut changed, &[reply]).await?;
        let [ticket] = changed;

        tracing::info!("Ticket {} reopened by {}", ticket.number(), actor.id);
        Ok(ticket)
    }

    async fn close_ticket(&self, actor: &User, command: CloseTicketCommand) -> Result<Ticket, UseCaseError> {
        let mut ticket = self.load(&command.ticket_id).await?;
        let original = ticket.clone();
        let reply = ticket.close(actor, command.category, &command.reason)?;

        let mut changed = [ticket];
        self.commit(&[original], &mut changed, &[reply]).await?;
        let [ticket] = changed;

        tracing::info!(category = %command.category, "Ticket {} closed by {}", ticket.number(), actor.id);
        Ok(ticket)
    }

    async fn clone_ticket(&self, actor: &User, command: CloneTicketCommand) -> Result<Ticket, UseCaseError> {
        let mut source = self.load(&command.ticket_id).await?;
        let original = source.clone();
        let number = self.ticket_repo.next_number().await?;
        let clone = source.clone_with_message(number, actor, &command.message)?;

        let mut changed = [source, clone];
        self.commit(&[original], &mut changed, &[]).await?;
        let [source, clone] = changed;

        tracing::info!("Ticket {} cloned to {}", source.number(), clone.number());
        Ok(clone)
    }

    async fn add_reply(&self, actor: &User, command: AddReplyCommand) -> Result<Reply, UseCaseError> {
        let mut ticket = self.load(&command.ticket_id).await?;
        let original = ticket.clone();
        let reply = ticket.add_reply(actor, &command.content, command.reply_type, command.attachments)?;

        self.commit(&[original], &mut [ticket], std::slice::from_ref(&reply)).await?;
        tracing::debug!(reply_type = %reply.reply_type(), "Reply added to ticket {}", command.ticket_id);
        Ok(reply)
    }

    async fn edit_reply(&self, actor: &User, command: EditReplyCommand) -> Result<Reply, UseCaseError> {
        let mut reply = self
            .reply_repo
            .find_by_id(&command.reply_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(format!("reply {}", command.reply_id)))?;
        let mut ticket = self.load(reply.ticket_id()).await?;
        let original = ticket.clone();

        ticket.edit_reply(&mut reply, actor, command.content, command.attachments)?;

        self.commit(&[original], &mut [ticket], std::slice::from_ref(&reply)).await?;
        Ok(reply)
    }

    async fn bulk_edit(&self, actor: &User, command: BulkEditCommand) -> Result<BulkEditResult, UseCaseError> {
        let all = self.ticket_repo.find_all().await?;
        let outcome = BulkOperator::apply(&all, &command.ticket_ids, &command.action, actor)?;

        let originals: Vec<Ticket> = all.iter().filter(|t| outcome.updated.contains(t.id())).cloned().collect();
        let mut changed = outcome.updated_tickets();
        self.commit(&originals, &mut changed, &outcome.replies).await?;

        Ok(BulkEditResult { updated: outcome.updated, skipped: outcome.skipped, read_only: outcome.read_only })
    }

    async fn merge_tickets(&self, actor: &User, command: MergeTicketsCommand) -> Result<Ticket, UseCaseError> {
        let all = self.ticket_repo.find_all().await?;
        let outcome = BulkOperator::merge(&all, &command.main_id, &command.merged_ids, actor)?;

        let mut changed = outcome.touched_tickets();
        self.commit(&[], &mut changed, &[]).await?;

        changed
            .into_iter()
            .find(|t| t.id() == &outcome.main)
            .ok_or_else(|| UseCaseError::not_found(format!("ticket {}", outcome.main)))
    }

    async fn delete_ticket(&self, actor: &User, id: &TicketId) -> Result<(), UseCaseError> {
        let ticket = self.load(id).await?;
        let outcome = BulkOperator::delete(std::slice::from_ref(&ticket), id)?;

        // a failed reply cleanup leaves the ticket in place
        self.reply_repo.delete_by_ticket(id).await?;
        self.ticket_repo.delete(id).await?;
        if let Err(e) = self.event_publisher.publish(vec![outcome.event]).await {
            tracing::warn!("Event publishing failed after delete: {}", e);
        }

        tracing::info!("Ticket {} deleted by {}", outcome.removed.number(), actor.id);
        Ok(())
    }

    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, UseCaseError> {
        Ok(self.ticket_repo.find_by_id(id).await?)
    }

    async fn get_conversation(&self, id: &TicketId) -> Result<Vec<Reply>, UseCaseError> {
        Ok(self.reply_repo.find_by_ticket(id).await?)
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<TicketSummary>, UseCaseError> {
        let all = self.ticket_repo.find_all().await?;
        let now = Utc::now();
        let overdue_after = self.config.overdue_after();
        Ok(query
            .run(&all)
            .into_iter()
            .map(|t| TicketSummary::from_ticket(t, now, overdue_after))
            .collect())
    }

    async fn ticket_stats(&self) -> Result<TicketStats, UseCaseError> {
        let all = self.ticket_repo.find_all().await?;
        Ok(TicketStats::collect(&all, Utc::now(), self.config.overdue_after()))
    }

    async fn export_tickets(&self, query: &TicketQuery, range: ExportRange) -> Result<CsvExport, UseCaseError> {
        let all = self.ticket_repo.find_all().await?;
        let mut query = query.clone();
        let window = range.date_range();
        if !window.is_unbounded() {
            query.filter.created = window;
        }

        let export = self.exporter.export(query.run(&all), &range)?;
        tracing::info!(rows = export.row_count, "Exported tickets to {}", export.file_name);
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::{AwaitingReply, SortKey, SortState, TicketFilter};
    use crate::domain::aggregates::{AuditAction, ReplyType, TicketRecord};
    use crate::domain::services::BulkAction;
    use crate::domain::value_objects::{Impact, MainCategory, Priority, ReplyId, Severity, TicketNumber, TicketStatus};
    use crate::infrastructure::fixtures::SampleFixtures;
    use crate::infrastructure::persistence::RecordingEventPublisher;
    use crate::ports::outbound::RepositoryError;
    use crate::error::TicketError;
    use chrono::Duration;

    struct Harness {
        service: HelpdeskService,
        tickets: Arc<InMemoryTicketRepository>,
        events: Arc<RecordingEventPublisher>,
    }

    fn harness() -> Harness {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let events = Arc::new(RecordingEventPublisher::new());
        let service = HelpdeskService::new(
            tickets.clone(),
            Arc::new(InMemoryReplyRepository::new()),
            events.clone(),
            EngineConfig::default(),
        );
        Harness { service, tickets, events }
    }

    fn requester() -> User {
        User::end_user("John Doe", "user@example.com")
    }

    fn agent() -> User {
        User::agent("Agent One", "agent1@example.com")
    }

    fn form(title: &str) -> NewTicket {
        NewTicket::new(title, "Details", Severity::High, Impact::Department, MainCategory::ItSystemSupport, "Silver Bridge School")
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() {
        let h = harness();
        let first = h.service.create_ticket(&requester(), form("One")).await.unwrap();
        let second = h.service.create_ticket(&requester(), form("Two")).await.unwrap();

        assert_eq!(first.number(), TicketNumber::new(1));
        assert_eq!(second.number(), TicketNumber::new(2));
        assert_eq!(first.priority(), Priority::Medium);
        assert_eq!(h.events.event_types(), vec!["ticket.created", "ticket.created"]);
    }

    #[tokio::test]
    async fn test_deleted_numbers_are_not_reused() {
        let h = harness();
        let first = h.service.create_ticket(&requester(), form("One")).await.unwrap();
        h.service.delete_ticket(&agent(), first.id()).await.unwrap();

        assert!(h.service.get_ticket(first.id()).await.unwrap().is_none());
        let next = h.service.create_ticket(&requester(), form("Two")).await.unwrap();
        assert_eq!(next.number(), TicketNumber::new(2));
        assert!(h.events.event_types().contains(&"ticket.deleted"));

        assert!(matches!(
            h.service.delete_ticket(&agent(), first.id()).await,
            Err(UseCaseError::Domain(TicketError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_reply_flow_and_awaiting_reply() {
        let h = harness();
        let ticket = h.service.create_ticket(&requester(), form("Email")).await.unwrap();

        h.service
            .add_reply(&agent(), AddReplyCommand {
                ticket_id: ticket.id().clone(),
                content: "Please clear your cache".into(),
                reply_type: ReplyType::AgentReply,
                attachments: vec![],
            })
            .await
            .unwrap();

        let rows = h.service.list_tickets(&TicketQuery::default()).await.unwrap();
        assert_eq!(rows[0].awaiting_reply, AwaitingReply::User);
        assert_eq!(h.service.get_conversation(ticket.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_reply_by_other_user_is_denied() {
        let h = harness();
        let ticket = h.service.create_ticket(&requester(), form("Email")).await.unwrap();
        let reply = h
            .service
            .add_reply(&requester(), AddReplyCommand {
                ticket_id: ticket.id().clone(),
                content: "Still broken".into(),
                reply_type: ReplyType::UserReply,
                attachments: vec![],
            })
            .await
            .unwrap();

        let denied = h
            .service
            .edit_reply(&agent(), EditReplyCommand { reply_id: reply.id().clone(), content: "Fixed".into(), attachments: vec![] })
            .await;
        assert!(matches!(denied, Err(UseCaseError::Domain(TicketError::Permission(_)))));

        let stored = h.service.get_conversation(ticket.id()).await.unwrap();
        assert_eq!(stored[0].content(), "Still broken");

        let edited = h
            .service
            .edit_reply(&requester(), EditReplyCommand { reply_id: reply.id().clone(), content: "Still broken after restart".into(), attachments: vec![] })
            .await
            .unwrap();
        assert!(edited.is_edited());
        let audit = h.service.get_ticket(ticket.id()).await.unwrap().unwrap();
        assert_eq!(audit.audit_log().last().unwrap().action, AuditAction::MessageEdited);
    }

    #[tokio::test]
    async fn test_edit_reply_unknown() {
        let h = harness();
        let result = h
            .service
            .edit_reply(&agent(), EditReplyCommand { reply_id: ReplyId::from_string("nope"), content: "x".into(), attachments: vec![] })
            .await;
        assert!(matches!(result, Err(UseCaseError::Domain(TicketError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_close_and_reopen() {
        let h = harness();
        let ticket = h.service.create_ticket(&requester(), form("Printer")).await.unwrap();

        let closed = h
            .service
            .close_ticket(&agent(), CloseTicketCommand {
                ticket_id: ticket.id().clone(),
                category: MainCategory::AssetRegister,
                reason: "Replaced".into(),
            })
            .await
            .unwrap();
        assert_eq!(closed.status(), TicketStatus::Closed);
        assert_eq!(closed.main_category(), MainCategory::AssetRegister);

        let reopened = h.service.reopen_ticket(&requester(), ticket.id(), "It broke again").await.unwrap();
        assert_eq!(reopened.status(), TicketStatus::ReOpened);

        let conversation = h.service.get_conversation(ticket.id()).await.unwrap();
        assert_eq!(conversation.len(), 2);
        assert!(conversation.iter().all(|r| r.reply_type() == ReplyType::SystemMessage));
    }

    #[tokio::test]
    async fn test_edit_stale_closed_ticket_warns() {
        let h = harness();
        let ticket = h.service.create_ticket(&requester(), form("Old")).await.unwrap();
        let mut closed = ticket.clone();
        closed.close(&agent(), MainCategory::Training, "Done").unwrap();
        let mut record = TicketRecord::from(closed);
        record.closed_at = Some(Utc::now() - Duration::days(40));
        h.tickets.save(&Ticket::from(record)).await.unwrap();

        let edited = h
            .service
            .edit_ticket(&agent(), ticket.id(), TicketEdit::default().title("Old, revisited"))
            .await
            .unwrap();
        assert!(edited.stale_closed_warning);
        assert_eq!(edited.ticket.title(), "Old, revisited");

        let fresh = h.service.create_ticket(&requester(), form("New")).await.unwrap();
        let edited = h
            .service
            .edit_ticket(&agent(), fresh.id(), TicketEdit::default().severity(Severity::Critical))
            .await
            .unwrap();
        assert!(!edited.stale_closed_warning);
        assert_eq!(edited.ticket.priority(), Priority::High);
    }

    #[tokio::test]
    async fn test_bulk_close_and_merge() {
        let h = harness();
        let a = h.service.create_ticket(&requester(), form("A")).await.unwrap();
        let b = h.service.create_ticket(&requester(), form("B")).await.unwrap();
        let c = h.service.create_ticket(&requester(), form("C")).await.unwrap();

        let result = h
            .service
            .bulk_edit(&agent(), BulkEditCommand {
                ticket_ids: vec![a.id().clone(), TicketId::from_string("gone")],
                action: BulkAction::ChangeStatus(TicketStatus::Closed),
            })
            .await
            .unwrap();
        assert_eq!(result.updated, vec![a.id().clone()]);
        assert_eq!(result.skipped, vec![TicketId::from_string("gone")]);

        let main = h
            .service
            .merge_tickets(&agent(), MergeTicketsCommand { main_id: b.id().clone(), merged_ids: vec![c.id().clone()] })
            .await
            .unwrap();
        assert_eq!(main.status(), TicketStatus::New);
        assert_eq!(main.audit_log().last().unwrap().action, AuditAction::TicketsMerged);

        let merged = h.service.get_ticket(c.id()).await.unwrap().unwrap();
        assert_eq!(merged.status(), TicketStatus::Merged);
        assert_eq!(merged.merged_into(), Some(b.id()));

        let self_merge = h
            .service
            .merge_tickets(&agent(), MergeTicketsCommand { main_id: b.id().clone(), merged_ids: vec![b.id().clone()] })
            .await;
        assert!(matches!(self_merge, Err(UseCaseError::Domain(TicketError::Validation(_)))));
    }

    #[tokio::test]
    async fn test_select_all_status_change_skips_merged() {
        let h = harness();
        let a = h.service.create_ticket(&requester(), form("A")).await.unwrap();
        let b = h.service.create_ticket(&requester(), form("B")).await.unwrap();
        let c = h.service.create_ticket(&requester(), form("C")).await.unwrap();
        h.service
            .merge_tickets(&agent(), MergeTicketsCommand { main_id: a.id().clone(), merged_ids: vec![c.id().clone()] })
            .await
            .unwrap();

        let visible: Vec<TicketId> =
            h.service.list_tickets(&TicketQuery::default()).await.unwrap().into_iter().map(|row| row.id).collect();
        assert_eq!(visible.len(), 3);

        let result = h
            .service
            .bulk_edit(&agent(), BulkEditCommand {
                ticket_ids: visible,
                action: BulkAction::ChangeStatus(TicketStatus::Resolved),
            })
            .await
            .unwrap();
        assert_eq!(result.updated.len(), 2);
        assert_eq!(result.read_only, vec![c.id().clone()]);

        let b = h.service.get_ticket(b.id()).await.unwrap().unwrap();
        assert_eq!(b.status(), TicketStatus::Resolved);
        let c = h.service.get_ticket(c.id()).await.unwrap().unwrap();
        assert_eq!(c.status(), TicketStatus::Merged);
    }

    #[tokio::test]
    async fn test_clone_ticket() {
        let h = harness();
        let source = h.service.create_ticket(&requester(), form("Wifi down")).await.unwrap();
        let clone = h
            .service
            .clone_ticket(&agent(), CloneTicketCommand { ticket_id: source.id().clone(), message: "Also at Chapel Bridge".into() })
            .await
            .unwrap();
        assert_eq!(clone.number(), TicketNumber::new(2));
        let source = h.service.get_ticket(source.id()).await.unwrap().unwrap();
        assert_eq!(source.audit_log().last().unwrap().action, AuditAction::TicketCloned);
    }

    #[tokio::test]
    async fn test_list_stats_and_export_from_fixtures() {
        let service = HelpdeskService::seeded(&SampleFixtures, EngineConfig::default()).unwrap();

        let query = TicketQuery::new(TicketFilter { search: Some("information".into()), ..Default::default() })
            .sorted_by(SortState::ascending(SortKey::Number));
        let rows = service.list_tickets(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number, "TICK-003");
        assert!(rows[0].overdue);

        let stats = service.ticket_stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 3);

        let range = ExportRange::new(chrono::NaiveDate::from_ymd_opt(2023, 6, 2), None);
        let export = service.export_tickets(&TicketQuery::default(), range).await.unwrap();
        assert_eq!(export.row_count, 2);
        assert_eq!(export.file_name, "tickets_export_from_2023-06-02.csv");

        let created = service.create_ticket(&requester(), form("After fixtures")).await.unwrap();
        assert_eq!(created.number(), TicketNumber::new(4));
    }

    struct FailingReplyRepository;

    #[async_trait]
    impl ReplyRepository for FailingReplyRepository {
        async fn find_by_id(&self, _id: &ReplyId) -> Result<Option<Reply>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_ticket(&self, _ticket_id: &TicketId) -> Result<Vec<Reply>, RepositoryError> {
            Ok(vec![])
        }

        async fn save(&self, _reply: &Reply) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("disk full".into()))
        }

        async fn save_all(&self, _replies: &[Reply]) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("disk full".into()))
        }

        async fn delete_by_ticket(&self, _ticket_id: &TicketId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("disk full".into()))
        }
    }

    #[tokio::test]
    async fn test_failed_reply_save_restores_ticket() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let service = HelpdeskService::new(
            tickets.clone(),
            Arc::new(FailingReplyRepository),
            Arc::new(NoOpEventPublisher),
            EngineConfig::default(),
        );
        let ticket = service.create_ticket(&requester(), form("Email")).await.unwrap();

        let result = service
            .close_ticket(&agent(), CloseTicketCommand {
                ticket_id: ticket.id().clone(),
                category: MainCategory::ItSystemSupport,
                reason: "Fixed".into(),
            })
            .await;
        assert!(matches!(result, Err(UseCaseError::Repository(RepositoryError::Storage(_)))));

        let stored = tickets.find_by_id(ticket.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), TicketStatus::New);
        assert_eq!(stored.audit_log().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reply_cleanup_keeps_ticket() {
        let tickets = Arc::new(InMemoryTicketRepository::new());
        let service = HelpdeskService::new(
            tickets.clone(),
            Arc::new(FailingReplyRepository),
            Arc::new(NoOpEventPublisher),
            EngineConfig::default(),
        );
        let ticket = service.create_ticket(&requester(), form("Email")).await.unwrap();

        let result = service.delete_ticket(&agent(), ticket.id()).await;
        assert!(matches!(result, Err(UseCaseError::Repository(RepositoryError::Storage(_)))));
        assert!(tickets.find_by_id(ticket.id()).await.unwrap().is_some());
    }
}
