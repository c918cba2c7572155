//! Report card and generation-batch models.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::classes::ClassInfo;
use crate::grades::GradeInfo;
use crate::ids::{ClassId, ExamId, GenerationId, GradeId, ReportCardId, StudentId, UserId};
use crate::users::StudentRef;

/// Visibility gate of a report card. Only `PUBLISHED` cards are exposed to
/// student and parent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCardStatus {
    Draft,
    Published,
}

impl ReportCardStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportCardStatus::Draft => "DRAFT",
            ReportCardStatus::Published => "PUBLISHED",
        }
    }
}

impl Type<sqlx::Postgres> for ReportCardStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for ReportCardStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for ReportCardStatus {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        match <&str as Decode<'r, sqlx::Postgres>>::decode(value)? {
            "DRAFT" => Ok(ReportCardStatus::Draft),
            "PUBLISHED" => Ok(ReportCardStatus::Published),
            other => Err(format!("unknown report card status: {other}").into()),
        }
    }
}

/// A single report card, owned by a generation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportCard {
    pub id: ReportCardId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub exam_id: ExamId,
    pub generation_id: GenerationId,
    pub status: ReportCardStatus,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// A generation batch: one invocation of the report-card-producing workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportCardGeneration {
    pub id: GenerationId,
    pub teacher_id: UserId,
    pub exam_id: ExamId,
    pub class_id: ClassId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Generation batch with its card count, for staff listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationWithCount {
    pub id: GenerationId,
    pub teacher_id: UserId,
    pub exam_id: ExamId,
    pub class_id: ClassId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub report_card_count: i64,
}

/// Flat row produced by the scope-bound report-card listing queries.
#[derive(Debug, Clone, FromRow)]
pub struct ReportCardRow {
    pub id: ReportCardId,
    pub student_id: StudentId,
    pub generation_id: GenerationId,
    pub status: ReportCardStatus,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub exam_id: ExamId,
    pub exam_title: String,
    pub exam_year: i32,
    pub exam_term: i32,
    pub grade_id: GradeId,
    pub grade_level: i32,
    pub class_id: ClassId,
    pub class_name: String,
    pub student_first_name: String,
    pub student_last_name: String,
}

/// Exam projection embedded in report-card listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExamRef {
    pub id: ExamId,
    pub title: String,
    pub year: i32,
    pub term: i32,
}

/// A report card with its display joins, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardView {
    pub id: ReportCardId,
    pub generation_id: GenerationId,
    pub status: ReportCardStatus,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub exam: ExamRef,
    pub grade: GradeInfo,
    pub class: ClassInfo,
    pub student: StudentRef,
}

impl From<ReportCardRow> for ReportCardView {
    fn from(row: ReportCardRow) -> Self {
        Self {
            id: row.id,
            generation_id: row.generation_id,
            status: row.status,
            generated_at: row.generated_at,
            exam: ExamRef {
                id: row.exam_id,
                title: row.exam_title,
                year: row.exam_year,
                term: row.exam_term,
            },
            grade: GradeInfo {
                id: row.grade_id,
                level: row.grade_level,
            },
            class: ClassInfo {
                id: row.class_id,
                name: row.class_name,
            },
            student: StudentRef {
                id: row.student_id.into_inner().into(),
                first_name: row.student_first_name,
                last_name: row.student_last_name,
            },
        }
    }
}

/// Request body for creating a generation batch.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenerationDto {
    pub exam_id: ExamId,
    pub class_id: ClassId,
}

/// Query parameters for the generation listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFilterParams {
    /// Restrict to batches for one exam.
    #[serde(default, deserialize_with = "slate_core::serde::deserialize_optional_uuid")]
    pub exam_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: slate_core::pagination::PaginationParams,
}
