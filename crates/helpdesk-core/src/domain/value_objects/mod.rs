//! Value Objects module
//!
//! Immutable, validated domain primitives.

/// Closed enum with a human-facing label per variant.
///
/// Parsing accepts either the label or the variant name, case-insensitively.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let wanted = label.trim();
                Self::ALL.iter().copied().find(|candidate| {
                    candidate.label().eq_ignore_ascii_case(wanted)
                        || format!("{:?}", candidate).eq_ignore_ascii_case(wanted)
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::TicketError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s).ok_or_else(|| {
                    $crate::error::TicketError::validation(format!(
                        "unknown {}: {}",
                        stringify!($name),
                        s
                    ))
                })
            }
        }
    };
}

pub mod classification;
pub mod status;

pub use classification::{
    BridgelinkTopic, Impact, ItSupportTopic, MainCategory, Priority, Severity, SubCategory,
    TrainingTopic,
};
pub use status::TicketStatus;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{require_text, TicketError, TicketResult};

/// Opaque, stable ticket identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reply identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyId(String);

impl ReplyId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReplyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing sequential ticket number, rendered as `TICK-NNN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketNumber(u64);

impl TicketNumber {
    pub const PREFIX: &'static str = "TICK-";

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", Self::PREFIX, self.0)
    }
}

impl FromStr for TicketNumber {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..Self::PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(Self::PREFIX) => &trimmed[Self::PREFIX.len()..],
            _ => trimmed,
        };
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TicketError::validation(format!("invalid ticket number: {s}")))
    }
}

/// Monotonic issuer of ticket numbers.
///
/// Numbers are never handed out twice, even when tickets are deleted or
/// merged; `observe` moves the sequence past numbers that were ingested from
/// elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSequence {
    last_issued: u64,
}

impl NumberSequence {
    pub fn starting_after(last_issued: u64) -> Self {
        Self { last_issued }
    }

    pub fn next(&mut self) -> TicketNumber {
        self.last_issued += 1;
        TicketNumber(self.last_issued)
    }

    pub fn observe(&mut self, number: TicketNumber) {
        self.last_issued = self.last_issued.max(number.value());
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }
}

/// Identity of a person acting on tickets (an email address in practice).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    const SYSTEM: &'static str = "System";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn system() -> Self {
        Self(Self::SYSTEM.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Organizational unit a ticket belongs to
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Service(String);

impl Service {
    pub fn new(name: impl Into<String>) -> TicketResult<Self> {
        let name = name.into();
        require_text("service", &name)?;
        Ok(Self(name.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque attachment metadata; file contents live outside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub media_type: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, size: u64, media_type: impl Into<String>) -> Self {
        Self { name: name.into(), size, media_type: media_type.into() }
    }
}

/// Drop blank and repeated identities while keeping display order.
pub(crate) fn distinct_identities(identities: Vec<UserId>) -> Vec<UserId> {
    let mut out: Vec<UserId> = Vec::with_capacity(identities.len());
    for id in identities {
        if !id.as_str().is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
