//! Acting user
//!
//! Users are owned by the identity provider; the engine only reads the role.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    EndUser,
    Agent,
    SeniorAgent,
}

impl UserRole {
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent | Self::SeniorAgent)
    }
}

impl User {
    /// Build a user whose identity is their email address.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        let email = email.into();
        Self { id: UserId::new(email.clone()), name: name.into(), email, role }
    }

    pub fn end_user(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, UserRole::EndUser)
    }

    pub fn agent(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, UserRole::Agent)
    }

    pub fn is_agent(&self) -> bool {
        self.role.is_agent()
    }
}
