//! User models.
//!
//! A user is the role-tagged identity every other entity references. Student
//! enrollment detail (class, grade, parent link) lives in
//! [`crate::students`]; the user row itself carries only profile fields and
//! the role.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;
use crate::roles::Role;

/// A user in the system. The password hash is never part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// User projection embedded in report-card listing responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
}
