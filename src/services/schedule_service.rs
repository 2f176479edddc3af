use crate::entities::{
    LessonStatus, lesson_entity as lessons, monthly_plan_entity as plans,
    student_entity as students,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{duration_hours, format_time_range, month_key, validate_month};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

/// 半开区间 [start1,end1) 与 [start2,end2) 是否重叠；端点相接不算
pub fn overlaps(
    start1: &DateTime<Utc>,
    end1: &DateTime<Utc>,
    start2: &DateTime<Utc>,
    end2: &DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

/// 在全部课程里找第一个与候选时间段冲突的课程。
/// 冲突检查是全局的（单导师日历），不按学生划分；
/// 编辑已有课程时用 excluding 排除自身。
pub fn find_conflict<'a>(
    existing: &'a [lessons::Model],
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    excluding: Option<Uuid>,
) -> Option<&'a lessons::Model> {
    existing
        .iter()
        .filter(|l| excluding != Some(l.id))
        .find(|l| overlaps(&l.start_time, &l.end_time, start, end))
}

#[derive(Clone)]
pub struct ScheduleService {
    pool: DatabaseConnection,
}

impl ScheduleService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 预约课程。冲突扫描 + 配额检查 + 插入跑在一个可串行化事务里，
    /// 两个并发的重叠预约最多成功一个；数据库排它约束兜底。
    pub async fn book_lesson(&self, req: BookLessonRequest) -> AppResult<lessons::Model> {
        if req.end_time <= req.start_time {
            return Err(AppError::ValidationError(
                "End time must be after start time".to_string(),
            ));
        }

        let txn = self
            .pool
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        self.check_conflict(&txn, &req.start_time, &req.end_time, None)
            .await?;

        // 预约要求该学生当月已有计划；没有计划直接拒绝，不自动创建
        // （与记录付款的自动创建不对称，这是业务规则）
        let month = month_key(&req.start_time);
        let plan = plans::Entity::find()
            .filter(plans::Column::StudentId.eq(req.student_id))
            .filter(plans::Column::Month.eq(month.clone()))
            .one(&txn)
            .await?
            .ok_or(AppError::PlanNotFound(month))?;

        if plan.used_lessons >= plan.total_lessons {
            return Err(AppError::QuotaExceeded {
                used: plan.used_lessons,
                total: plan.total_lessons,
            });
        }

        let lesson = lessons::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(req.student_id),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            duration_hours: Set(duration_hours(&req.start_time, &req.end_time)),
            status: Set(LessonStatus::Scheduled),
            notes: Set(req.notes.filter(|s| !s.is_empty())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Booked lesson {} for student {} at {}",
            lesson.id,
            lesson.student_id,
            lesson.start_time
        );
        Ok(lesson)
    }

    /// 编辑课程；时间变动时重新做冲突扫描，排除课程自身
    pub async fn update_lesson(
        &self,
        lesson_id: Uuid,
        req: UpdateLessonRequest,
    ) -> AppResult<lessons::Model> {
        let txn = self
            .pool
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let current = lessons::Entity::find_by_id(lesson_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

        let times_changed = req.start_time.is_some() || req.end_time.is_some();
        let new_start = req.start_time.unwrap_or(current.start_time);
        let new_end = req.end_time.unwrap_or(current.end_time);

        if new_end <= new_start {
            return Err(AppError::ValidationError(
                "End time must be after start time".to_string(),
            ));
        }

        if times_changed {
            self.check_conflict(&txn, &new_start, &new_end, Some(lesson_id))
                .await?;
        }

        let mut am = current.into_active_model();
        if times_changed {
            am.start_time = Set(new_start);
            am.end_time = Set(new_end);
            am.duration_hours = Set(duration_hours(&new_start, &new_end));
        }
        if let Some(status) = req.status {
            am.status = Set(status);
        }
        if let Some(notes) = req.notes {
            am.notes = Set(Some(notes).filter(|s| !s.is_empty()));
        }

        let lesson = am.update(&txn).await?;
        txn.commit().await?;
        Ok(lesson)
    }

    pub async fn delete_lesson(&self, lesson_id: Uuid) -> AppResult<()> {
        let res = lessons::Entity::delete_by_id(lesson_id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Lesson not found".to_string()));
        }
        Ok(())
    }

    /// 日历视图：全部课程带学生名字，按开始时间排序，可按月过滤
    pub async fn list_lessons(&self, query: &LessonQuery) -> AppResult<Vec<LessonResponse>> {
        if let Some(month) = &query.month {
            validate_month(month)?;
        }

        let rows = lessons::Entity::find()
            .find_also_related(students::Entity)
            .order_by_asc(lessons::Column::StartTime)
            .all(&self.pool)
            .await?;

        let list = rows
            .into_iter()
            .filter(|(lesson, _)| match &query.month {
                Some(month) => &month_key(&lesson.start_time) == month,
                None => true,
            })
            .map(|(lesson, student)| {
                let name = student.map(|s| s.name).unwrap_or_default();
                LessonResponse::from_model(lesson, name)
            })
            .collect();

        Ok(list)
    }

    async fn check_conflict(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
        excluding: Option<Uuid>,
    ) -> AppResult<()> {
        let existing = lessons::Entity::find()
            .order_by_asc(lessons::Column::StartTime)
            .all(txn)
            .await?;

        if let Some(blocker) = find_conflict(&existing, start, end, excluding) {
            let student = students::Entity::find_by_id(blocker.student_id)
                .one(txn)
                .await?;
            let name = student.map(|s| s.name).unwrap_or_default();
            return Err(AppError::ScheduleConflict(format!(
                "You are busy at this time. Student: {}, Time: {}",
                name,
                format_time_range(&blocker.start_time, &blocker.end_time)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, h, m, 0).unwrap()
    }

    fn lesson(id: u128, start: DateTime<Utc>, end: DateTime<Utc>) -> lessons::Model {
        lessons::Model {
            id: Uuid::from_u128(id),
            student_id: Uuid::from_u128(1000 + id),
            start_time: start,
            end_time: end,
            duration_hours: duration_hours(&start, &end),
            status: LessonStatus::Scheduled,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_overlaps_symmetry() {
        let cases = [
            (at(10, 0), at(11, 0), at(10, 30), at(11, 30)),
            (at(10, 0), at(11, 0), at(11, 0), at(12, 0)),
            (at(10, 0), at(12, 0), at(10, 30), at(11, 0)),
            (at(10, 0), at(11, 0), at(14, 0), at(15, 0)),
        ];
        for (s1, e1, s2, e2) in cases {
            assert_eq!(overlaps(&s1, &e1, &s2, &e2), overlaps(&s2, &e2, &s1, &e1));
        }
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        // [10:00,11:00) 和 [11:00,12:00) 相接不冲突
        assert!(!overlaps(&at(10, 0), &at(11, 0), &at(11, 0), &at(12, 0)));
        assert!(!overlaps(&at(11, 0), &at(12, 0), &at(10, 0), &at(11, 0)));
    }

    #[test]
    fn test_overlap_detected() {
        assert!(overlaps(&at(10, 0), &at(11, 0), &at(10, 30), &at(11, 30)));
        // 包含关系也算冲突
        assert!(overlaps(&at(10, 0), &at(12, 0), &at(10, 30), &at(11, 0)));
        // 完全相同
        assert!(overlaps(&at(10, 0), &at(11, 0), &at(10, 0), &at(11, 0)));
    }

    #[test]
    fn test_find_conflict_reports_first_blocker() {
        let existing = vec![
            lesson(1, at(10, 0), at(11, 0)),
            lesson(2, at(11, 0), at(12, 0)),
        ];
        let blocker = find_conflict(&existing, &at(10, 30), &at(11, 30), None).unwrap();
        assert_eq!(blocker.id, Uuid::from_u128(1));
    }

    #[test]
    fn test_find_conflict_no_conflict_on_adjacent_slot() {
        let existing = vec![lesson(1, at(10, 0), at(11, 0))];
        assert!(find_conflict(&existing, &at(11, 0), &at(12, 0), None).is_none());
        assert!(find_conflict(&existing, &at(9, 0), &at(10, 0), None).is_none());
    }

    #[test]
    fn test_find_conflict_excludes_edited_lesson() {
        let existing = vec![lesson(1, at(10, 0), at(11, 0))];
        // 编辑 1 号课程自身的时间不应和自己冲突
        assert!(
            find_conflict(&existing, &at(10, 15), &at(11, 15), Some(Uuid::from_u128(1))).is_none()
        );
        // 但别的课程编辑到这个时段仍然冲突
        assert!(
            find_conflict(&existing, &at(10, 15), &at(11, 15), Some(Uuid::from_u128(2))).is_some()
        );
    }

    #[test]
    fn test_find_conflict_is_global_across_students() {
        // 冲突检查不看学生归属：占用时段的课程属于谁都会挡住候选时段
        let mut other = lesson(1, at(10, 0), at(11, 0));
        other.student_id = Uuid::from_u128(42);
        let existing = vec![other];
        assert!(find_conflict(&existing, &at(10, 30), &at(11, 30), None).is_some());
    }
}
