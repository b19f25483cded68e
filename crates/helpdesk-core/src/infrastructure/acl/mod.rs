//! Anti-Corruption Layer (ACL)
//!
//! Translates loosely-typed records from the previous helpdesk into domain
//! tickets and replies. Everything that enters the domain through here has
//! its priority recomputed and its vocabulary mapped onto the closed enums.

pub mod legacy;

pub use legacy::{LegacyReplyRecord, LegacyTicketAdapter, LegacyTicketRecord};
