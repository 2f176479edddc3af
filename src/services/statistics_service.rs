use crate::entities::{
    LessonStatus, lesson_entity as lessons, monthly_plan_entity as plans,
    student_entity as students,
};
use crate::error::AppResult;
use crate::models::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct StatisticsService {
    pool: DatabaseConnection,
}

impl StatisticsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 仪表盘总览
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let total_students = students::Entity::find().count(&self.pool).await? as i64;
        let all_lessons = lessons::Entity::find().all(&self.pool).await?;
        let all_plans = plans::Entity::find().all(&self.pool).await?;

        let completed = all_lessons
            .iter()
            .filter(|l| l.status == LessonStatus::Done)
            .count() as i64;
        let scheduled = all_lessons
            .iter()
            .filter(|l| l.status == LessonStatus::Scheduled)
            .count() as i64;
        let cancelled = all_lessons
            .iter()
            .filter(|l| l.status == LessonStatus::Cancelled)
            .count() as i64;

        let expected_income: i64 = all_plans.iter().map(|p| p.price_total).sum();
        let paid_amount: i64 = all_plans.iter().map(|p| p.paid_amount).sum();

        Ok(DashboardStats {
            total_students,
            total_lessons: all_lessons.len() as i64,
            completed_lessons: completed,
            scheduled_lessons: scheduled,
            cancelled_lessons: cancelled,
            expected_income,
            paid_amount,
            remaining_unpaid: expected_income - paid_amount,
        })
    }

    /// 按月聚合收入；可选只看一个月
    pub async fn monthly_stats(&self, month: Option<&str>) -> AppResult<Vec<MonthlyStats>> {
        let mut finder = plans::Entity::find();
        if let Some(month) = month {
            finder = finder.filter(plans::Column::Month.eq(month));
        }
        let rows = finder.all(&self.pool).await?;

        let mut by_month: BTreeMap<String, MonthlyStats> = BTreeMap::new();
        for plan in rows {
            let entry = by_month
                .entry(plan.month.clone())
                .or_insert_with(|| MonthlyStats {
                    month: plan.month.clone(),
                    expected_income: 0,
                    paid_amount: 0,
                    remaining_unpaid: 0,
                    total_plans: 0,
                    paid_plans: 0,
                });
            entry.expected_income += plan.price_total;
            entry.paid_amount += plan.paid_amount;
            entry.remaining_unpaid += plan.price_total - plan.paid_amount;
            entry.total_plans += 1;
            if plan.is_paid {
                entry.paid_plans += 1;
            }
        }

        // BTreeMap 已按月份键排序
        Ok(by_month.into_values().collect())
    }

    /// 每个学生的课程状态统计，按学生名排序
    pub async fn lesson_stats(&self) -> AppResult<Vec<LessonStats>> {
        let rows = lessons::Entity::find()
            .find_also_related(students::Entity)
            .all(&self.pool)
            .await?;

        let mut by_student: BTreeMap<(String, Uuid), LessonStats> = BTreeMap::new();
        for (lesson, student) in rows {
            let name = student.map(|s| s.name).unwrap_or_default();
            let entry = by_student
                .entry((name.clone(), lesson.student_id))
                .or_insert_with(|| LessonStats {
                    student_id: lesson.student_id,
                    student_name: name,
                    completed_lessons: 0,
                    scheduled_lessons: 0,
                    cancelled_lessons: 0,
                });
            match lesson.status {
                LessonStatus::Done => entry.completed_lessons += 1,
                LessonStatus::Cancelled => entry.cancelled_lessons += 1,
                LessonStatus::Scheduled => entry.scheduled_lessons += 1,
            }
        }

        Ok(by_student.into_values().collect())
    }
}
