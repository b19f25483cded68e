//! Priority calculation

use crate::domain::value_objects::{Impact, Priority, Severity};

/// Maps severity and impact to a priority.
///
/// Priority is never set directly; every code path that changes severity or
/// impact goes through here.
pub struct PriorityCalculator;

impl PriorityCalculator {
    pub const URGENT_THRESHOLD: u8 = 12;
    pub const HIGH_THRESHOLD: u8 = 8;
    pub const MEDIUM_THRESHOLD: u8 = 4;

    /// Raw triage score in `1..=16`
    pub fn score(severity: Severity, impact: Impact) -> u8 {
        severity.score() * impact.score()
    }

    pub fn calculate(severity: Severity, impact: Impact) -> Priority {
        match Self::score(severity, impact) {
            s if s >= Self::URGENT_THRESHOLD => Priority::Urgent,
            s if s >= Self::HIGH_THRESHOLD => Priority::High,
            s if s >= Self::MEDIUM_THRESHOLD => Priority::Medium,
            _ => Priority::Low,
        }
    }
}
