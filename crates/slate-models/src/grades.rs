//! Grade (cohort level) models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::GradeId;

/// A grade: one cohort level (e.g. level 6 through 13), unique per level.
///
/// Classes and exams both hang off a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub level: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Grade projection embedded in listing responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GradeInfo {
    pub id: GradeId,
    pub level: i32,
}
