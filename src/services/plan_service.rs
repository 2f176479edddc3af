use crate::entities::{
    LessonStatus, lesson_entity as lessons, monthly_plan_entity as plans,
    student_entity as students,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{month_key, validate_month};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

/// 付款是否覆盖了月度总价
pub fn derive_is_paid(paid_amount: i64, price_total: i64) -> bool {
    paid_amount >= price_total
}

/// 预约时的配额检查：已用 >= 总量 即拒绝（严格 >=）
pub fn quota_reached(used_lessons: i32, total_lessons: i32) -> bool {
    used_lessons >= total_lessons
}

/// 配额下调时把已用课时夹到新总量，只降不升
pub fn clamp_used(used_lessons: i32, new_total_lessons: i32) -> i32 {
    used_lessons.min(new_total_lessons)
}

#[derive(Clone)]
pub struct PlanService {
    pool: DatabaseConnection,
}

impl PlanService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 完成课程：状态翻转和计数自增在同一个事务里，要么都生效要么都不生效。
    /// 已经 done 的课程是幂等空操作。计划按课程开始时间所在月份定位，
    /// 不是当前月份；找不到计划时只翻转状态（自增影响零行）。
    pub async fn record_completion(&self, lesson_id: Uuid) -> AppResult<()> {
        let txn = self.pool.begin().await?;

        let lesson = lessons::Entity::find_by_id(lesson_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

        if lesson.status == LessonStatus::Done {
            txn.commit().await?;
            return Ok(());
        }

        let student_id = lesson.student_id;
        let month = month_key(&lesson.start_time);

        let mut am = lesson.into_active_model();
        am.status = Set(LessonStatus::Done);
        am.update(&txn).await?;

        // 完成时不检查配额上限，上限只在预约时生效；
        // 直接补录历史课程可能把 used 推过 total，属预期行为
        if let Some(plan) = plans::Entity::find()
            .filter(plans::Column::StudentId.eq(student_id))
            .filter(plans::Column::Month.eq(month))
            .one(&txn)
            .await?
        {
            let used = plan.used_lessons + 1;
            let mut pam = plan.into_active_model();
            pam.used_lessons = Set(used);
            pam.update(&txn).await?;
        }

        txn.commit().await?;
        log::info!("Lesson {lesson_id} marked done");
        Ok(())
    }

    /// 记录付款：没有计划则创建（used_lessons 从 0 开始），
    /// 有则更新配额/价格/已付并重算 is_paid。
    /// used_lessons 永远不被这条路径改动。
    pub async fn upsert_payment(&self, req: RecordPaymentRequest) -> AppResult<plans::Model> {
        validate_month(&req.month)?;
        if req.total_lessons <= 0 {
            return Err(AppError::ValidationError(
                "Total lessons must be positive".to_string(),
            ));
        }
        if req.price_total <= 0 {
            return Err(AppError::ValidationError(
                "Price total must be positive".to_string(),
            ));
        }
        if req.paid_amount < 0 {
            return Err(AppError::ValidationError(
                "Paid amount must be non-negative".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let existing = plans::Entity::find()
            .filter(plans::Column::StudentId.eq(req.student_id))
            .filter(plans::Column::Month.eq(req.month.clone()))
            .one(&txn)
            .await?;

        let plan = match existing {
            Some(plan) => {
                let mut am = plan.into_active_model();
                am.total_lessons = Set(req.total_lessons);
                am.price_total = Set(req.price_total);
                am.paid_amount = Set(req.paid_amount);
                am.is_paid = Set(derive_is_paid(req.paid_amount, req.price_total));
                am.update(&txn).await?
            }
            None => {
                plans::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(req.student_id),
                    month: Set(req.month.clone()),
                    total_lessons: Set(req.total_lessons),
                    used_lessons: Set(0),
                    price_total: Set(req.price_total),
                    paid_amount: Set(req.paid_amount),
                    is_paid: Set(derive_is_paid(req.paid_amount, req.price_total)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;
        log::info!(
            "Recorded payment for student {} month {}: paid {} of {}",
            plan.student_id,
            plan.month,
            plan.paid_amount,
            plan.price_total
        );
        Ok(plan)
    }

    /// 管理员调整当月配额；used 超过新配额时夹下来，绝不上调。
    /// 当月还没有计划时自动创建一个空计划。
    pub async fn adjust_quota(&self, req: AdjustQuotaRequest) -> AppResult<plans::Model> {
        if req.total_lessons <= 0 {
            return Err(AppError::ValidationError(
                "Total lessons must be positive".to_string(),
            ));
        }

        let month = month_key(&Utc::now());
        let txn = self.pool.begin().await?;

        let existing = plans::Entity::find()
            .filter(plans::Column::StudentId.eq(req.student_id))
            .filter(plans::Column::Month.eq(month.clone()))
            .one(&txn)
            .await?;

        let plan = match existing {
            Some(plan) => {
                let clamped = clamp_used(plan.used_lessons, req.total_lessons);
                let mut am = plan.into_active_model();
                am.total_lessons = Set(req.total_lessons);
                am.used_lessons = Set(clamped);
                am.update(&txn).await?
            }
            None => {
                plans::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(req.student_id),
                    month: Set(month),
                    total_lessons: Set(req.total_lessons),
                    used_lessons: Set(0),
                    price_total: Set(0),
                    paid_amount: Set(0),
                    is_paid: Set(false),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;
        Ok(plan)
    }

    /// 付款视图：计划列表带学生名字，按月份倒序、学生名正序
    pub async fn list_plans(&self, query: &PlanQuery) -> AppResult<Vec<StudentPaymentInfo>> {
        if let Some(month) = &query.month {
            validate_month(month)?;
        }

        let mut finder = plans::Entity::find()
            .find_also_related(students::Entity)
            .order_by_desc(plans::Column::Month);
        if let Some(month) = &query.month {
            finder = finder.filter(plans::Column::Month.eq(month.clone()));
        }
        let mut rows = finder.all(&self.pool).await?;

        rows.sort_by(|(pa, sa), (pb, sb)| {
            pb.month.cmp(&pa.month).then_with(|| {
                let na = sa.as_ref().map(|s| s.name.as_str()).unwrap_or("");
                let nb = sb.as_ref().map(|s| s.name.as_str()).unwrap_or("");
                na.cmp(nb)
            })
        });

        Ok(rows
            .into_iter()
            .map(|(plan, student)| StudentPaymentInfo {
                student_id: plan.student_id,
                student_name: student.map(|s| s.name).unwrap_or_default(),
                month: plan.month,
                price_total: plan.price_total,
                paid_amount: plan.paid_amount,
                is_paid: plan.is_paid,
                used_lessons: plan.used_lessons,
                total_lessons: plan.total_lessons,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_paid_boundary() {
        assert!(derive_is_paid(500, 500));
        assert!(derive_is_paid(501, 500));
        assert!(!derive_is_paid(499, 500));
        assert!(!derive_is_paid(0, 1));
    }

    #[test]
    fn test_quota_reached_is_strict_gte() {
        // 配额 N 允许预约到 used < N 为止
        assert!(!quota_reached(3, 4));
        assert!(quota_reached(4, 4));
        // 补录完成把 used 推过 total 后，后续预约同样被拒
        assert!(quota_reached(6, 5));
    }

    #[test]
    fn test_clamp_used_only_lowers() {
        assert_eq!(clamp_used(10, 8), 8);
        assert_eq!(clamp_used(5, 8), 5);
        assert_eq!(clamp_used(0, 8), 0);
        // 配额上调时 used 保持不变
        assert_eq!(clamp_used(10, 12), 10);
    }
}
