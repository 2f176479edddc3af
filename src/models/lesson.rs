use crate::entities::LessonStatus;
use crate::entities::lesson_entity as lessons;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookLessonRequest {
    pub student_id: Uuid,
    #[schema(example = "2024-05-20T10:00:00Z")]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2024-05-20T11:00:00Z")]
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLessonRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<LessonStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonIdResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    /// 日历视图需要学生名字
    pub student_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub status: LessonStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LessonResponse {
    pub fn from_model(lesson: lessons::Model, student_name: String) -> Self {
        Self {
            id: lesson.id,
            student_id: lesson.student_id,
            student_name,
            start_time: lesson.start_time,
            end_time: lesson.end_time,
            duration_hours: lesson.duration_hours,
            status: lesson.status,
            notes: lesson.notes,
            created_at: lesson.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LessonQuery {
    /// 可选的 YYYY-MM 过滤
    pub month: Option<String>,
}
