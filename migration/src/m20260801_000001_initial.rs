use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    Name,
    Email,
    Phone,
    GithubLink,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    StudentId,
    StartTime,
    EndTime,
    DurationHours,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MonthlyPlans {
    Table,
    Id,
    StudentId,
    Month,
    TotalLessons,
    UsedLessons,
    PriceTotal,
    PaidAmount,
    IsPaid,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // enums
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("lesson_status"))
                    .values(vec![
                        Alias::new("scheduled"),
                        Alias::new("done"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(200).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Students::Email).string_len(255).null())
                    .col(ColumnDef::new(Students::Phone).string_len(50).null())
                    .col(ColumnDef::new(Students::GithubLink).string_len(500).null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lessons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lessons::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(Lessons::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lessons::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lessons::DurationHours)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lessons::Status)
                            .custom(Alias::new("lesson_status"))
                            .not_null()
                            .default(Expr::cust("'scheduled'::lesson_status")),
                    )
                    .col(ColumnDef::new(Lessons::Notes).text().null())
                    .col(
                        ColumnDef::new(Lessons::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Lessons::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_student")
                            .from(Lessons::Table, Lessons::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_student")
                    .table(Lessons::Table)
                    .col(Lessons::StudentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_start_time")
                    .table(Lessons::Table)
                    .col(Lessons::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyPlans::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(MonthlyPlans::Month)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::TotalLessons)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::UsedLessons)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::PriceTotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::PaidAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_plans_student")
                            .from(MonthlyPlans::Table, MonthlyPlans::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (student_id, month) 唯一，一个学生每个月只有一个计划
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_monthly_plans_student_month")
                    .table(MonthlyPlans::Table)
                    .col(MonthlyPlans::StudentId)
                    .col(MonthlyPlans::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 时间约束走原生 SQL：sea-query 不支持排它约束
        // 排它约束兜底并发插入，半开区间 [) 相接不算冲突
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "ALTER TABLE lessons ADD CONSTRAINT chk_lessons_time_order CHECK (end_time > start_time)",
        )
        .await?;
        conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gist")
            .await?;
        conn.execute_unprepared(
            "ALTER TABLE lessons ADD CONSTRAINT excl_lessons_no_overlap \
             EXCLUDE USING gist (tstzrange(start_time, end_time) WITH &&)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("lesson_status")).to_owned())
            .await?;
        Ok(())
    }
}
