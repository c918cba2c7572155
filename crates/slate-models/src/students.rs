//! Student enrollment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassId, GradeId, StudentId, UserId};

/// A student's enrollment: exactly one class and grade, optionally linked to
/// a parent user. The row id matches the student's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub class_id: ClassId,
    pub grade_id: GradeId,
    pub parent_id: Option<UserId>,
    pub admission_number: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A linked child as returned to parent callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfo {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub admission_number: String,
    pub grade_level: i32,
}
