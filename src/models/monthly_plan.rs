use crate::entities::monthly_plan_entity as plans;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPlanResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub month: String,
    pub total_lessons: i32,
    pub used_lessons: i32,
    pub price_total: i64,
    pub paid_amount: i64,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<plans::Model> for MonthlyPlanResponse {
    fn from(p: plans::Model) -> Self {
        Self {
            id: p.id,
            student_id: p.student_id,
            month: p.month,
            total_lessons: p.total_lessons,
            used_lessons: p.used_lessons,
            price_total: p.price_total,
            paid_amount: p.paid_amount,
            is_paid: p.is_paid,
            created_at: p.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub student_id: Uuid,
    #[schema(example = "2024-05")]
    pub month: String,
    pub paid_amount: i64,
    pub price_total: i64,
    pub total_lessons: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjustQuotaRequest {
    pub student_id: Uuid,
    /// 当月新的课时配额
    pub total_lessons: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlanQuery {
    pub month: Option<String>,
}
