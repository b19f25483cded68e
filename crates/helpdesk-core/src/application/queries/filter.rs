//! Ticket list filtering
//!
//! Every predicate is optional and predicates combine with AND. Text fields
//! match case-insensitively by substring; blank text counts as absent.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::application::queries::flags::{derive_awaiting_reply, AwaitingReply};
use crate::domain::aggregates::Ticket;
use crate::domain::value_objects::{MainCategory, Priority, SubCategory, TicketStatus};

/// Service value meaning "every service"
pub const ALL_SERVICES: &str = "all";

/// Inclusive bounds on `created_at`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Calendar-day bounds: `end` covers its whole day.
    pub fn from_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let start = start
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive));
        let end = end
            .and_then(|day| day.and_hms_nano_opt(23, 59, 59, 999_999_999))
            .map(|naive| Utc.from_utc_datetime(&naive));
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFilter {
    pub ticket_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub assigned_agent: Option<String>,
    /// Free text over number, title and description
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    pub main_category: Option<MainCategory>,
    pub sub_category: Option<SubCategory>,
    pub service: Option<String>,
    pub created: DateRange,
    /// `false` hides `Closed` tickets
    pub show_closed: bool,
    pub awaiting_reply: Option<AwaitingReply>,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self {
            ticket_number: None,
            title: None,
            description: None,
            created_by: None,
            assigned_agent: None,
            search: None,
            priority: None,
            status: None,
            main_category: None,
            sub_category: None,
            service: None,
            created: DateRange::default(),
            show_closed: true,
            awaiting_reply: None,
        }
    }
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !self.show_closed && ticket.status() == TicketStatus::Closed {
            return false;
        }

        let number = ticket.number().to_string();
        let text_ok = substring(&number, self.ticket_number.as_deref())
            && substring(ticket.title(), self.title.as_deref())
            && substring(ticket.description(), self.description.as_deref())
            && substring(ticket.created_by().as_str(), self.created_by.as_deref())
            && optional_substring(ticket.assigned_agent().map(|a| a.as_str()), self.assigned_agent.as_deref());
        if !text_ok {
            return false;
        }

        if let Some(needle) = active(self.search.as_deref()) {
            let hit = [number.as_str(), ticket.title(), ticket.description()]
                .iter()
                .any(|field| substring(field, Some(needle)));
            if !hit {
                return false;
            }
        }

        self.priority.map_or(true, |p| ticket.priority() == p)
            && self.status.map_or(true, |s| ticket.status() == s)
            && self.main_category.map_or(true, |c| ticket.main_category() == c)
            && self.sub_category.map_or(true, |c| ticket.sub_category() == Some(c))
            && self.service_matches(ticket)
            && self.created.contains(ticket.created_at())
            && self.awaiting_reply.map_or(true, |a| derive_awaiting_reply(ticket) == a)
    }

    fn service_matches(&self, ticket: &Ticket) -> bool {
        match active(self.service.as_deref()) {
            Some(service) if !service.eq_ignore_ascii_case(ALL_SERVICES) => ticket.service().as_str() == service,
            _ => true,
        }
    }
}

/// Keep tickets matching `filter`, preserving input order.
pub fn filter<'a, I>(tickets: I, filter: &TicketFilter) -> Vec<&'a Ticket>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    tickets.into_iter().filter(|t| filter.matches(t)).collect()
}

fn active(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn substring(haystack: &str, needle: Option<&str>) -> bool {
    match active(needle) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn optional_substring(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (active(needle), haystack) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(_), Some(haystack)) => substring(haystack, needle),
    }
}
