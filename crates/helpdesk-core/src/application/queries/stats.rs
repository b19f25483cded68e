//! Dashboard counters

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::application::queries::flags::{derive_awaiting_reply, is_overdue_after, AwaitingReply};
use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::{MainCategory, Priority, TicketStatus};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub by_status: BTreeMap<TicketStatus, usize>,
    pub by_category: BTreeMap<MainCategory, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub awaiting_agent: usize,
    pub awaiting_user: usize,
    /// Open tickets quiet for longer than the overdue threshold
    pub overdue: usize,
}

impl TicketStats {
    pub fn collect<'a, I>(tickets: I, now: DateTime<Utc>, overdue_after: Duration) -> Self
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let mut stats = Self::default();
        for ticket in tickets {
            stats.total += 1;
            *stats.by_status.entry(ticket.status()).or_default() += 1;
            *stats.by_category.entry(ticket.main_category()).or_default() += 1;
            *stats.by_priority.entry(ticket.priority()).or_default() += 1;

            match derive_awaiting_reply(ticket) {
                AwaitingReply::Agent => stats.awaiting_agent += 1,
                AwaitingReply::User => stats.awaiting_user += 1,
                AwaitingReply::None => {}
            }
            if ticket.status().is_open() {
                stats.open += 1;
                if is_overdue_after(ticket, now, overdue_after) {
                    stats.overdue += 1;
                }
            }
        }
        stats
    }

    pub fn count_status(&self, status: TicketStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{NewTicket, ReplyType, User};
    use crate::domain::value_objects::{Impact, Severity, TicketNumber};

    #[test]
    fn test_collect_counts() {
        let requester = User::end_user("Pat User", "user@example.com");
        let agent = User::agent("Agent One", "agent1@example.com");
        let make = |n: u64, category: MainCategory| {
            let form = NewTicket::new("Title", "Body", Severity::High, Impact::Individual, category, "Silver Bridge School");
            Ticket::create(TicketNumber::new(n), &requester.id, form).unwrap()
        };

        let mut tickets = vec![make(1, MainCategory::Bridgelink), make(2, MainCategory::Bridgelink), make(3, MainCategory::Training)];
        tickets[1].add_reply(&agent, "On it", ReplyType::AgentReply, vec![]).unwrap();
        tickets[2].close(&agent, MainCategory::Training, "Done").unwrap();

        let now = Utc::now();
        let stats = TicketStats::collect(&tickets, now, Duration::days(3));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.by_category.get(&MainCategory::Bridgelink), Some(&2));
        assert_eq!(stats.count_status(TicketStatus::Closed), 1);
        assert_eq!(stats.awaiting_agent, 1);
        assert_eq!(stats.awaiting_user, 1);
        assert_eq!(stats.overdue, 0);

        let later = TicketStats::collect(&tickets, now + Duration::days(5), Duration::days(3));
        assert_eq!(later.overdue, 2);
    }
}
