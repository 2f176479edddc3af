use crate::models::*;
use crate::services::StudentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/students",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "学生列表", body = [StudentResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_students(student_service: web::Data<StudentService>) -> Result<HttpResponse> {
    match student_service.list_students().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "student",
    request_body = CreateStudentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建学生成功", body = StudentIdResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权")
    )
)]
pub async fn create_student(
    student_service: web::Data<StudentService>,
    request: web::Json<CreateStudentRequest>,
) -> Result<HttpResponse> {
    match student_service.create_student(request.into_inner()).await {
        Ok(student) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": student.id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "student",
    request_body = UpdateStudentRequest,
    params(("id" = Uuid, Path, description = "学生 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新学生成功", body = StudentResponse),
        (status = 404, description = "学生不存在"),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_student(
    student_service: web::Data<StudentService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStudentRequest>,
) -> Result<HttpResponse> {
    match student_service
        .update_student(path.into_inner(), request.into_inner())
        .await
    {
        Ok(student) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": StudentResponse::from(student)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "student",
    params(("id" = Uuid, Path, description = "学生 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除学生成功"),
        (status = 404, description = "学生不存在"),
        (status = 401, description = "未授权")
    )
)]
pub async fn delete_student(
    student_service: web::Data<StudentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match student_service.delete_student(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn student_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(list_students))
            .route("", web::post().to(create_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}", web::delete().to(delete_student)),
    );
}
