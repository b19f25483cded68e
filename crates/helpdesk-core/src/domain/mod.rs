//! Domain module
//!
//! Ticket lifecycle rules. Everything here is synchronous and works on
//! in-memory snapshots; persistence happens behind the outbound ports.

#[macro_use]
pub mod value_objects;
pub mod aggregates;
pub mod events;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
