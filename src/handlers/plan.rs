use crate::models::*;
use crate::services::PlanService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/plans",
    tag = "plan",
    params(("month" = Option<String>, Query, description = "可选的 YYYY-MM 过滤")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "付款视图的计划列表", body = [StudentPaymentInfo]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_plans(
    plan_service: web::Data<PlanService>,
    query: web::Query<PlanQuery>,
) -> Result<HttpResponse> {
    match plan_service.list_plans(&query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/plans/payment",
    tag = "plan",
    request_body = RecordPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "记录付款成功；计划不存在时自动创建", body = MonthlyPlanResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权")
    )
)]
pub async fn record_payment(
    plan_service: web::Data<PlanService>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse> {
    match plan_service.upsert_payment(request.into_inner()).await {
        Ok(plan) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": MonthlyPlanResponse::from(plan)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/plans/quota",
    tag = "plan",
    request_body = AdjustQuotaRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "调整当月配额成功", body = MonthlyPlanResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权")
    )
)]
pub async fn adjust_quota(
    plan_service: web::Data<PlanService>,
    request: web::Json<AdjustQuotaRequest>,
) -> Result<HttpResponse> {
    match plan_service.adjust_quota(request.into_inner()).await {
        Ok(plan) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": MonthlyPlanResponse::from(plan)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plan_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/plans")
            .route("", web::get().to(list_plans))
            .route("/payment", web::post().to(record_payment))
            .route("/quota", web::post().to(adjust_quota)),
    );
}
