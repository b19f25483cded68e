//! Column sorting for ticket lists

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::aggregates::Ticket;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Number,
    Priority,
    Title,
    Status,
    MainCategory,
    CreatedBy,
    AssignedAgent,
    Service,
    CreatedAt,
    UpdatedAt,
    LastUpdatedAt,
    LastReplyAt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        Self { key, direction: SortDirection::Ascending }
    }

    pub fn descending(key: SortKey) -> Self {
        Self { key, direction: SortDirection::Descending }
    }

    /// Column-header click: the same key flips ascending to descending,
    /// anything else starts over ascending.
    pub fn select(previous: Option<SortState>, key: SortKey) -> Self {
        match previous {
            Some(prev) if prev.key == key && prev.direction == SortDirection::Ascending => Self::descending(key),
            _ => Self::ascending(key),
        }
    }
}

/// Total order on one column. Missing values sort first.
pub fn compare(a: &Ticket, b: &Ticket, key: SortKey) -> Ordering {
    match key {
        SortKey::Number => a.number().cmp(&b.number()),
        SortKey::Priority => a.priority().cmp(&b.priority()),
        SortKey::Title => a.title().cmp(b.title()),
        SortKey::Status => a.status().label().cmp(b.status().label()),
        SortKey::MainCategory => a.main_category().label().cmp(b.main_category().label()),
        SortKey::CreatedBy => a.created_by().cmp(b.created_by()),
        SortKey::AssignedAgent => a.assigned_agent().cmp(&b.assigned_agent()),
        SortKey::Service => a.service().cmp(b.service()),
        SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        SortKey::LastUpdatedAt => a.last_updated_at().cmp(&b.last_updated_at()),
        SortKey::LastReplyAt => a.last_reply_at().cmp(&b.last_reply_at()),
    }
}

/// Stable sort in place; ties keep their input order in both directions.
pub fn sort(tickets: &mut [&Ticket], state: SortState) {
    match state.direction {
        SortDirection::Ascending => tickets.sort_by(|a, b| compare(a, b, state.key)),
        SortDirection::Descending => tickets.sort_by(|a, b| compare(b, a, state.key)),
    }
}

pub fn sorted(mut tickets: Vec<&Ticket>, state: SortState) -> Vec<&Ticket> {
    sort(&mut tickets, state);
    tickets
}
