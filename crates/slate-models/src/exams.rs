//! Exam, result, and summary models.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use utoipa::ToSchema;

use crate::grades::GradeInfo;
use crate::ids::{
    ClassId, ExamId, ExamResultId, ExamSubjectId, ExamSummaryId, GradeId, StudentId, SubjectId,
};
use crate::roles::Role;

/// The kind of exam within a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Opener,
    Midterm,
    Endterm,
}

impl ExamType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExamType::Opener => "opener",
            ExamType::Midterm => "midterm",
            ExamType::Endterm => "endterm",
        }
    }
}

impl Type<sqlx::Postgres> for ExamType {
    fn type_info() -> PgTypeInfo {
        <&str as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for ExamType {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for ExamType {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        match <&str as Decode<'r, sqlx::Postgres>>::decode(value)? {
            "opener" => Ok(ExamType::Opener),
            "midterm" => Ok(ExamType::Midterm),
            "endterm" => Ok(ExamType::Endterm),
            other => Err(format!("unknown exam type: {other}").into()),
        }
    }
}

/// An exam owned by a grade, optionally scoped to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub term: i32,
    pub year: i32,
    pub exam_type: ExamType,
    pub exam_date: chrono::NaiveDate,
    pub grade_id: GradeId,
    pub class_id: Option<ClassId>,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// One subject examined within an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamSubject {
    pub id: ExamSubjectId,
    pub exam_id: ExamId,
    pub subject_id: SubjectId,
    pub max_marks: i32,
    pub marks_entered: bool,
}

/// One student's score for one exam subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub id: ExamResultId,
    pub student_id: StudentId,
    pub exam_subject_id: ExamSubjectId,
    pub score: f64,
    pub grade: String,
}

/// Precomputed per-student rollup over one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: ExamSummaryId,
    pub student_id: StudentId,
    pub exam_id: ExamId,
    pub total_score: f64,
    pub mean_score: f64,
    pub mean_grade: String,
    pub subject_count: i32,
}

/// Derived completion status of an exam for a given caller. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Completed,
    Pending,
}

impl From<&str> for ExamStatus {
    fn from(s: &str) -> Self {
        if s == "completed" {
            ExamStatus::Completed
        } else {
            ExamStatus::Pending
        }
    }
}

/// Flat row produced by the scope-bound exam listing queries. Each query
/// computes `status` in SQL so the derivation lives next to the predicate.
#[derive(Debug, Clone, FromRow)]
pub struct ExamWithStatusRow {
    pub id: ExamId,
    pub title: String,
    pub year: i32,
    pub term: i32,
    pub exam_date: chrono::NaiveDate,
    pub grade_id: GradeId,
    pub grade_level: i32,
    pub status: String,
}

/// An exam with its derived status, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamWithStatus {
    pub id: ExamId,
    pub title: String,
    pub year: i32,
    pub term: i32,
    pub exam_date: chrono::NaiveDate,
    pub status: ExamStatus,
    pub grade: GradeInfo,
}

impl From<ExamWithStatusRow> for ExamWithStatus {
    fn from(row: ExamWithStatusRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            year: row.year,
            term: row.term,
            exam_date: row.exam_date,
            status: ExamStatus::from(row.status.as_str()),
            grade: GradeInfo {
                id: row.grade_id,
                level: row.grade_level,
            },
        }
    }
}

/// Response for the exam listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyExamsResponse {
    pub success: bool,
    pub role: Role,
    pub exams: Vec<ExamWithStatus>,
}
