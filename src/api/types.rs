use serde::Serialize;

use crate::models::user::{Name, UserRecord};

/// Failure body: always a JSON object with an `error` field, never a raw
/// stack trace.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub results: Vec<UserRecord>,
}

/// Partial projection served for a single-user lookup: the fields the edit
/// form consumes.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub gender: String,
    pub name: Name,
    pub email: String,
    pub phone: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            gender: record.gender,
            name: record.name,
            email: record.email,
            phone: record.phone,
        }
    }
}
