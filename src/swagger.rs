use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::LessonStatus;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::student::list_students,
        handlers::student::create_student,
        handlers::student::update_student,
        handlers::student::delete_student,
        handlers::lesson::list_lessons,
        handlers::lesson::book_lesson,
        handlers::lesson::update_lesson,
        handlers::lesson::mark_lesson_done,
        handlers::lesson::delete_lesson,
        handlers::plan::list_plans,
        handlers::plan::record_payment,
        handlers::plan::adjust_quota,
        handlers::statistics::dashboard,
        handlers::statistics::monthly,
        handlers::statistics::lessons,
    ),
    components(
        schemas(
            ApiError,
            UserResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            StudentResponse,
            CreateStudentRequest,
            UpdateStudentRequest,
            StudentIdResponse,
            LessonStatus,
            LessonResponse,
            BookLessonRequest,
            UpdateLessonRequest,
            LessonIdResponse,
            MonthlyPlanResponse,
            RecordPaymentRequest,
            AdjustQuotaRequest,
            StudentPaymentInfo,
            DashboardStats,
            MonthlyStats,
            LessonStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "student", description = "Student management API"),
        (name = "lesson", description = "Lesson scheduling API"),
        (name = "plan", description = "Monthly plan and payment API"),
        (name = "statistics", description = "Analytics API"),
    ),
    info(
        title = "TutorDesk Backend API",
        version = "1.0.0",
        description = "Tutoring business management REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
