//! Query Engine
//!
//! Read-side views over a ticket collection: filtering, sorting, derived
//! flags and dashboard counters. Nothing here mutates a ticket.

pub mod filter;
pub mod flags;
pub mod sort;
pub mod stats;

pub use filter::{DateRange, TicketFilter, ALL_SERVICES};
pub use flags::{derive_awaiting_reply, is_overdue, is_overdue_after, AwaitingReply, OVERDUE_AFTER_DAYS};
pub use sort::{SortDirection, SortKey, SortState};
pub use stats::TicketStats;

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Ticket;

/// A list view: filter, then optionally sort.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketQuery {
    pub filter: TicketFilter,
    pub sort: Option<SortState>,
}

impl TicketQuery {
    pub fn new(filter: TicketFilter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sorted_by(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn run<'a, I>(&self, tickets: I) -> Vec<&'a Ticket>
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let view = filter::filter(tickets, &self.filter);
        match self.sort {
            Some(state) => sort::sorted(view, state),
            None => view,
        }
    }
}
