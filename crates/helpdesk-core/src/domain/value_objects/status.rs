//! Ticket status
//!
//! One closed vocabulary covering both the simple `Open / In Progress /
//! Resolved / Closed` workflow and the finer-grained agent workflow.

labelled_enum! {
    TicketStatus {
        New => "New",
        NeedsMoreInfo => "Needs more info",
        UnderInvestigation => "Under Investigation",
        AwaitingInternalAssistance => "Awaiting Internal Assistance",
        Awaiting3rdPartyFeedback => "Awaiting 3rd Party feedback",
        Resolved => "Resolved",
        ReOpened => "Re-Opened",
        Assigned => "Assigned",
        SuggestedSolution => "Suggested Solution",
        ContactReplied => "Contact replied",
        Merged => "Merged",
        Closed => "Closed",
        Open => "Open",
        InProgress => "In Progress",
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self::New
    }
}

impl TicketStatus {
    /// Parse a status label coming from an older system.
    ///
    /// Accepts everything `from_label` does plus spellings seen in legacy
    /// exports (`Reopened`, `In-Progress`).
    pub fn from_legacy(label: &str) -> Option<Self> {
        if let Some(status) = Self::from_label(label) {
            return Some(status);
        }
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "reopened" => Some(Self::ReOpened),
            "inprogress" => Some(Self::InProgress),
            "needsmoreinfo" => Some(Self::NeedsMoreInfo),
            "contactreplied" => Some(Self::ContactReplied),
            _ => None,
        }
    }

    /// No further work is expected: `Closed` or `Merged`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Merged)
    }

    pub fn is_closed_or_resolved(&self) -> bool {
        matches!(self, Self::Closed | Self::Resolved)
    }

    /// Still in someone's queue.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed | Self::Resolved | Self::Merged)
    }
}
