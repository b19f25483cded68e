//! Demo data
//!
//! Sample tickets are expressed in the legacy export format and go through
//! the ACL like any other import.

use crate::domain::aggregates::{Reply, Ticket, User, UserRole};
use crate::error::TicketResult;
use crate::infrastructure::acl::{LegacyReplyRecord, LegacyTicketAdapter, LegacyTicketRecord};

/// Source of seed data for demos and tests
pub trait TicketFixtures: Send + Sync {
    fn tickets(&self) -> TicketResult<Vec<Ticket>>;

    fn replies(&self) -> TicketResult<Vec<Reply>>;

    fn users(&self) -> Vec<User>;

    fn known_issues(&self) -> Vec<String> {
        vec![]
    }
}

/// Three tickets across three schools, with a short conversation on the first
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleFixtures;

impl SampleFixtures {
    fn ticket_records() -> Vec<LegacyTicketRecord> {
        vec![
            legacy_ticket(
                "1", "TICK-001", "High", "IT/System Support", Some("Microsoft"),
                "Cannot access email", "I am unable to access my email account.", "Open",
                "user@example.com", Some("agent1@example.com"),
                ("2023-06-01T10:00:00", "2023-06-01T12:00:00"),
                Some("agent1@example.com"),
                "Silver Bridge School",
            ),
            legacy_ticket(
                "2", "TICK-002", "Medium", "Bridgelink", Some("Admissions"),
                "Incorrect charge on invoice", "The amount on my latest invoice is incorrect.", "In Progress",
                "customer@example.com", Some("agent2@example.com"),
                ("2023-06-02T14:30:00", "2023-06-02T15:30:00"),
                Some("agent2@example.com"),
                "Preston Bridge School",
            ),
            legacy_ticket(
                "3", "TICK-003", "Low", "General Inquiries", None,
                "Update account information", "I need to update my account information.", "Open",
                "newuser@example.com", None,
                ("2023-06-03T09:15:00", "2023-06-03T09:15:00"),
                None,
                "Heather Bridge School",
            ),
        ]
    }

    fn reply_records() -> Vec<LegacyReplyRecord> {
        vec![
            LegacyReplyRecord {
                id: "1".into(),
                ticket_id: "1".into(),
                user_id: "user@example.com".into(),
                content: "I am still unable to access my email. Can you please help?".into(),
                created_at: "2023-06-01T11:30:00".into(),
                reply_type: "UserReply".into(),
            },
            LegacyReplyRecord {
                id: "2".into(),
                ticket_id: "1".into(),
                user_id: "agent1@example.com".into(),
                content: "I'm looking into this issue. Can you please try clearing your browser cache and cookies?".into(),
                created_at: "2023-06-01T12:00:00".into(),
                reply_type: "AgentReply".into(),
            },
        ]
    }
}

impl TicketFixtures for SampleFixtures {
    fn tickets(&self) -> TicketResult<Vec<Ticket>> {
        let adapter = LegacyTicketAdapter::new();
        Self::ticket_records().into_iter().map(|r| adapter.translate_ticket(r)).collect()
    }

    fn replies(&self) -> TicketResult<Vec<Reply>> {
        let adapter = LegacyTicketAdapter::new();
        Self::reply_records().into_iter().map(|r| adapter.translate_reply(r)).collect()
    }

    fn users(&self) -> Vec<User> {
        vec![
            User::new("John Doe", "user@example.com", UserRole::EndUser),
            User::new("Agent One", "agent1@example.com", UserRole::Agent),
            User::new("Agent Two", "agent2@example.com", UserRole::Agent),
            User::new("Sam Senior", "senior@example.com", UserRole::SeniorAgent),
        ]
    }

    fn known_issues(&self) -> Vec<String> {
        vec!["Email delivery to external addresses is delayed".to_string()]
    }
}

#[allow(clippy::too_many_arguments)]
fn legacy_ticket(
    id: &str,
    number: &str,
    priority: &str,
    main_category: &str,
    sub_category: Option<&str>,
    title: &str,
    description: &str,
    status: &str,
    created_by: &str,
    assigned_agent: Option<&str>,
    (created_at, last_updated_at): (&str, &str),
    last_reply_by: Option<&str>,
    service: &str,
) -> LegacyTicketRecord {
    LegacyTicketRecord {
        id: id.into(),
        number: number.into(),
        priority: Some(priority.into()),
        severity: None,
        impact: None,
        main_category: main_category.into(),
        sub_category: sub_category.map(String::from),
        title: title.into(),
        description: description.into(),
        status: status.into(),
        created_by: created_by.into(),
        assigned_agent: assigned_agent.map(String::from),
        created_at: created_at.into(),
        updated_at: last_updated_at.into(),
        last_reply_by: last_reply_by.map(String::from),
        last_reply_at: last_reply_by.map(|_| last_updated_at.to_string()),
        last_updated_at: last_updated_at.into(),
        cc: vec![],
        bcc: vec![],
        service: service.into(),
    }
}
