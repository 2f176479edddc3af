use crate::models::*;
use crate::services::{PlanService, ScheduleService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/lessons",
    tag = "lesson",
    params(("month" = Option<String>, Query, description = "可选的 YYYY-MM 过滤")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "课程列表（日历视图）", body = [LessonResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_lessons(
    schedule_service: web::Data<ScheduleService>,
    query: web::Query<LessonQuery>,
) -> Result<HttpResponse> {
    match schedule_service.list_lessons(&query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lessons",
    tag = "lesson",
    request_body = BookLessonRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "预约成功", body = LessonIdResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "当月没有计划"),
        (status = 409, description = "时间冲突或配额已满"),
        (status = 401, description = "未授权")
    )
)]
pub async fn book_lesson(
    schedule_service: web::Data<ScheduleService>,
    request: web::Json<BookLessonRequest>,
) -> Result<HttpResponse> {
    match schedule_service.book_lesson(request.into_inner()).await {
        Ok(lesson) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": lesson.id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/lessons/{id}",
    tag = "lesson",
    request_body = UpdateLessonRequest,
    params(("id" = Uuid, Path, description = "课程 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功", body = LessonIdResponse),
        (status = 404, description = "课程不存在"),
        (status = 409, description = "时间冲突"),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_lesson(
    schedule_service: web::Data<ScheduleService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateLessonRequest>,
) -> Result<HttpResponse> {
    match schedule_service
        .update_lesson(path.into_inner(), request.into_inner())
        .await
    {
        Ok(lesson) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": lesson.id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lessons/{id}/done",
    tag = "lesson",
    params(("id" = Uuid, Path, description = "课程 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "标记完成；重复标记是空操作"),
        (status = 404, description = "课程不存在"),
        (status = 401, description = "未授权")
    )
)]
pub async fn mark_lesson_done(
    plan_service: web::Data<PlanService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match plan_service.record_completion(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    tag = "lesson",
    params(("id" = Uuid, Path, description = "课程 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "课程不存在"),
        (status = 401, description = "未授权")
    )
)]
pub async fn delete_lesson(
    schedule_service: web::Data<ScheduleService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match schedule_service.delete_lesson(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lesson_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lessons")
            .route("", web::get().to(list_lessons))
            .route("", web::post().to(book_lesson))
            .route("/{id}", web::patch().to(update_lesson))
            .route("/{id}/done", web::post().to(mark_lesson_done))
            .route("/{id}", web::delete().to(delete_lesson)),
    );
}
