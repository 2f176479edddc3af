//! 需要可用的 Postgres 实例：设置 DATABASE_URL 后
//! `cargo test -- --ignored` 运行。

use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tutordesk_backend::entities::{
    LessonStatus, lesson_entity as lessons, monthly_plan_entity as plans,
    student_entity as students,
};
use tutordesk_backend::error::AppError;
use tutordesk_backend::models::{AdjustQuotaRequest, BookLessonRequest, RecordPaymentRequest};
use tutordesk_backend::services::{PlanService, ScheduleService};

async fn connect() -> DatabaseConnection {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for DB tests");
    let pool = sea_orm::Database::connect(url).await.expect("connect");
    Migrator::up(&pool, None).await.expect("migrate");
    pool
}

async fn create_student(pool: &DatabaseConnection, name: &str) -> Uuid {
    let student = students::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(None),
        phone: Set(None),
        github_link: Set(None),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("insert student");
    student.id
}

async fn create_plan(
    pool: &DatabaseConnection,
    student_id: Uuid,
    month: &str,
    total: i32,
    used: i32,
    price: i64,
    paid: i64,
) -> Uuid {
    let plan = plans::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        month: Set(month.to_string()),
        total_lessons: Set(total),
        used_lessons: Set(used),
        price_total: Set(price),
        paid_amount: Set(paid),
        is_paid: Set(paid >= price),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("insert plan");
    plan.id
}

fn at(y: i32, mo: u32, d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, m, 0).unwrap()
}

async fn find_plan(pool: &DatabaseConnection, student_id: Uuid, month: &str) -> plans::Model {
    use sea_orm::{ColumnTrait, QueryFilter};
    plans::Entity::find()
        .filter(plans::Column::StudentId.eq(student_id))
        .filter(plans::Column::Month.eq(month))
        .one(pool)
        .await
        .expect("query plan")
        .expect("plan must exist")
}

/// 级联删除学生，释放课程占用的时间段，让测试可以重复跑
async fn cleanup_student(pool: &DatabaseConnection, student_id: Uuid) {
    students::Entity::delete_by_id(student_id)
        .exec(pool)
        .await
        .expect("cleanup student");
}

/// 完整闭环：3/4 已用 → 预约成功 → 标记完成 → 4/4 → 再预约被配额拒绝
#[tokio::test]
#[ignore]
async fn test_book_complete_then_quota_rejects() {
    let pool = connect().await;
    let schedule = ScheduleService::new(pool.clone());
    let ledger = PlanService::new(pool.clone());

    let student_id = create_student(&pool, "e2e-quota-student").await;
    create_plan(&pool, student_id, "2030-05", 4, 3, 1000, 1000).await;

    let lesson = schedule
        .book_lesson(BookLessonRequest {
            student_id,
            start_time: at(2030, 5, 20, 10, 0),
            end_time: at(2030, 5, 20, 11, 0),
            notes: None,
        })
        .await
        .expect("booking with 3/4 used must succeed");

    ledger.record_completion(lesson.id).await.expect("mark done");

    // 重新查计划，used 必须是 4
    let plan = find_plan(&pool, student_id, "2030-05").await;
    assert_eq!(plan.used_lessons, 4);

    // 幂等：再次标记不再自增
    ledger.record_completion(lesson.id).await.expect("re-mark");
    let plan = find_plan(&pool, student_id, "2030-05").await;
    assert_eq!(plan.used_lessons, 4);

    let err = schedule
        .book_lesson(BookLessonRequest {
            student_id,
            start_time: at(2030, 5, 21, 10, 0),
            end_time: at(2030, 5, 21, 11, 0),
            notes: None,
        })
        .await
        .expect_err("4/4 used must reject booking");
    assert!(matches!(err, AppError::QuotaExceeded { used: 4, total: 4 }));

    cleanup_student(&pool, student_id).await;
}

/// 两个并发的重叠预约最多成功一个
#[tokio::test]
#[ignore]
async fn test_concurrent_overlapping_bookings_single_winner() {
    let pool = connect().await;
    let schedule = ScheduleService::new(pool.clone());

    let student_id = create_student(&pool, "race-student").await;
    create_plan(&pool, student_id, "2031-03", 10, 0, 1000, 1000).await;

    let req = || BookLessonRequest {
        student_id,
        start_time: at(2031, 3, 10, 10, 0),
        end_time: at(2031, 3, 10, 11, 0),
        notes: None,
    };

    let (a, b) = tokio::join!(schedule.book_lesson(req()), schedule.book_lesson(req()));
    let successes = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
    // 输家要么撞上冲突扫描，要么被可串行化/排它约束打回
    assert_eq!(successes, 1, "exactly one of two overlapping bookings may win");

    cleanup_student(&pool, student_id).await;
}

/// 记录付款绝不重置已用课时
#[tokio::test]
#[ignore]
async fn test_payment_upsert_leaves_usage_untouched() {
    let pool = connect().await;
    let ledger = PlanService::new(pool.clone());

    let student_id = create_student(&pool, "payment-student").await;
    let plan_id = create_plan(&pool, student_id, "2032-01", 12, 7, 2000, 0).await;

    let updated = ledger
        .upsert_payment(RecordPaymentRequest {
            student_id,
            month: "2032-01".to_string(),
            paid_amount: 2000,
            price_total: 2000,
            total_lessons: 12,
        })
        .await
        .expect("upsert payment");

    assert_eq!(updated.id, plan_id);
    assert_eq!(updated.used_lessons, 7);
    assert!(updated.is_paid);

    // 部分付款 → is_paid 翻回 false，used 仍然不动
    let updated = ledger
        .upsert_payment(RecordPaymentRequest {
            student_id,
            month: "2032-01".to_string(),
            paid_amount: 1999,
            price_total: 2000,
            total_lessons: 12,
        })
        .await
        .expect("second upsert");
    assert_eq!(updated.used_lessons, 7);
    assert!(!updated.is_paid);

    cleanup_student(&pool, student_id).await;
}

/// 配额下调把 used 夹下来；完成补录可以把 used 推过 total
#[tokio::test]
#[ignore]
async fn test_quota_clamp_and_completion_asymmetry() {
    let pool = connect().await;
    let ledger = PlanService::new(pool.clone());

    // adjust_quota 针对当前月份
    let month = Utc::now().format("%Y-%m").to_string();
    let student_id = create_student(&pool, "clamp-student").await;
    create_plan(&pool, student_id, &month, 12, 10, 0, 0).await;

    let plan = ledger
        .adjust_quota(AdjustQuotaRequest {
            student_id,
            total_lessons: 8,
        })
        .await
        .expect("adjust quota");
    assert_eq!(plan.total_lessons, 8);
    assert_eq!(plan.used_lessons, 8, "used must be clamped down to the new total");

    // 上限只在预约时生效：对 1/1 的计划直接补录完成，used 被推到 2
    let far_start = at(2033, 7, 1, 9, 0);
    let far_end = at(2033, 7, 1, 10, 0);
    let lesson = lessons::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        start_time: Set(far_start),
        end_time: Set(far_end),
        duration_hours: Set(1.0),
        status: Set(LessonStatus::Scheduled),
        notes: Set(None),
        ..Default::default()
    }
    .insert(&pool)
    .await
    .expect("insert lesson");
    create_plan(&pool, student_id, "2033-07", 1, 1, 0, 0).await;

    ledger.record_completion(lesson.id).await.expect("completion");
    let plan = find_plan(&pool, student_id, "2033-07").await;
    assert_eq!(plan.used_lessons, 2, "ledger does not enforce the cap at completion time");

    cleanup_student(&pool, student_id).await;
}
