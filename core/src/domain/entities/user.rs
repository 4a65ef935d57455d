//! Identity of an authenticated user as seen by the token pipeline.

use serde::{Deserialize, Serialize};

/// The user facts embedded into an access token
///
/// Produced by the (external) credential check and consumed by issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Unique identifier for the user
    pub user_id: String,

    pub email: String,

    pub role: String,

    /// Tenant (school) the session is scoped to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl UserIdentity {
    /// Creates an identity without a tenant scope
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role: role.into(),
            school_id: None,
        }
    }

    /// Scope the identity to a tenant
    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }
}
