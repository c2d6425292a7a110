use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application-level user profile.
///
/// Keyed primarily by the provider uid, secondarily discoverable by phone
/// number. Created once by the registration workflow; the core never updates
/// or deletes it. Field names follow the persisted document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub username: String,
    pub full_name: String,
    /// Local format with the leading "0", exactly as the registration form
    /// collected it - not E.164.
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Credential provider that created the account ("email").
    pub provider: String,
}
