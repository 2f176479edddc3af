use crate::entities::student_entity as students;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct StudentService {
    pool: DatabaseConnection,
}

impl StudentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_students(&self) -> AppResult<Vec<StudentResponse>> {
        let list = students::Entity::find()
            .order_by_asc(students::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(StudentResponse::from).collect())
    }

    pub async fn create_student(&self, req: CreateStudentRequest) -> AppResult<students::Model> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }

        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            email: Set(req.email.filter(|s| !s.is_empty())),
            phone: Set(req.phone.filter(|s| !s.is_empty())),
            github_link: Set(req.github_link.filter(|s| !s.is_empty())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn update_student(
        &self,
        student_id: Uuid,
        req: UpdateStudentRequest,
    ) -> AppResult<students::Model> {
        let current = students::Entity::find_by_id(student_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let mut am = current.into_active_model();
        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::ValidationError("Name is required".to_string()));
            }
            am.name = Set(name.trim().to_string());
        }
        if let Some(email) = req.email {
            am.email = Set(Some(email).filter(|s| !s.is_empty()));
        }
        if let Some(phone) = req.phone {
            am.phone = Set(Some(phone).filter(|s| !s.is_empty()));
        }
        if let Some(link) = req.github_link {
            am.github_link = Set(Some(link).filter(|s| !s.is_empty()));
        }

        let student = am.update(&self.pool).await?;
        Ok(student)
    }

    /// 删除学生；课程和月度计划由数据库级联删除
    pub async fn delete_student(&self, student_id: Uuid) -> AppResult<()> {
        let res = students::Entity::delete_by_id(student_id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }
        log::info!("Deleted student {student_id}");
        Ok(())
    }
}
