use crate::models::*;
use crate::services::StatisticsService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/statistics",
    tag = "statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "仪表盘总览", body = DashboardStats),
        (status = 401, description = "未授权")
    )
)]
pub async fn dashboard(stats_service: web::Data<StatisticsService>) -> Result<HttpResponse> {
    match stats_service.dashboard().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/monthly",
    tag = "statistics",
    params(("month" = Option<String>, Query, description = "可选的 YYYY-MM 过滤")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "按月收入统计", body = [MonthlyStats]),
        (status = 401, description = "未授权")
    )
)]
pub async fn monthly(
    stats_service: web::Data<StatisticsService>,
    query: web::Query<PlanQuery>,
) -> Result<HttpResponse> {
    match stats_service.monthly_stats(query.month.as_deref()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/lessons",
    tag = "statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "每个学生的课程状态统计", body = [LessonStats]),
        (status = 401, description = "未授权")
    )
)]
pub async fn lessons(stats_service: web::Data<StatisticsService>) -> Result<HttpResponse> {
    match stats_service.lesson_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn statistics_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .route("", web::get().to(dashboard))
            .route("/monthly", web::get().to(monthly))
            .route("/lessons", web::get().to(lessons)),
    );
}
