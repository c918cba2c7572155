use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::report_cards::controller::{
    CreateGenerationResponse, DeleteGenerationResponse, GenerationsResponse,
    ParentReportCardsResponse, PublishGenerationResponse, StudentReportCardsResponse,
};
use slate_core::pagination::{PaginationMeta, PaginationParams};
use slate_models::classes::{Class, ClassInfo};
use slate_models::exams::{
    Exam, ExamResult, ExamStatus, ExamSubject, ExamSummary, ExamType, ExamWithStatus,
    MyExamsResponse,
};
use slate_models::grades::{Grade, GradeInfo};
use slate_models::report_cards::{
    CreateGenerationDto, ExamRef, GenerationWithCount, ReportCard, ReportCardGeneration,
    ReportCardStatus, ReportCardView,
};
use slate_models::roles::Role;
use slate_models::students::{ChildInfo, Student};
use slate_models::users::{StudentRef, User};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::exams::controller::my_exams,
        crate::modules::report_cards::controller::student_report_cards,
        crate::modules::report_cards::controller::parent_report_cards,
        crate::modules::report_cards::controller::list_generations,
        crate::modules::report_cards::controller::create_generation,
        crate::modules::report_cards::controller::publish_generation,
        crate::modules::report_cards::controller::delete_generation,
    ),
    components(
        schemas(
            User,
            Role,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            Grade,
            GradeInfo,
            Class,
            ClassInfo,
            Student,
            StudentRef,
            ChildInfo,
            Exam,
            ExamType,
            ExamSubject,
            ExamResult,
            ExamStatus,
            ExamWithStatus,
            ExamSummary,
            MyExamsResponse,
            ExamRef,
            ReportCard,
            ReportCardGeneration,
            ReportCardStatus,
            ReportCardView,
            GenerationWithCount,
            CreateGenerationDto,
            StudentReportCardsResponse,
            ParentReportCardsResponse,
            GenerationsResponse,
            CreateGenerationResponse,
            PublishGenerationResponse,
            DeleteGenerationResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User authentication endpoints"),
        (name = "Exams", description = "Role-scoped exam listings"),
        (name = "Report Cards", description = "Report card listings and generation lifecycle")
    ),
    info(
        title = "Slate API",
        version = "0.1.0",
        description = "Role-scoped exam results and report-card API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
