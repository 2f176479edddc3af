use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub scheduled_lessons: i64,
    pub cancelled_lessons: i64,
    pub expected_income: i64,
    pub paid_amount: i64,
    pub remaining_unpaid: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyStats {
    pub month: String,
    pub expected_income: i64,
    pub paid_amount: i64,
    pub remaining_unpaid: i64,
    pub total_plans: i64,
    pub paid_plans: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentPaymentInfo {
    pub student_id: Uuid,
    pub student_name: String,
    pub month: String,
    pub price_total: i64,
    pub paid_amount: i64,
    pub is_paid: bool,
    pub used_lessons: i32,
    pub total_lessons: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonStats {
    pub student_id: Uuid,
    pub student_name: String,
    pub completed_lessons: i64,
    pub scheduled_lessons: i64,
    pub cancelled_lessons: i64,
}
