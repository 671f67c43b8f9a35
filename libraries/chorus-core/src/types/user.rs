//! User types
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// A registered listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    /// Denormalized in-edge count, maintained by the follow graph
    pub followers_count: i64,
}

/// Data for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
}
