use async_trait::async_trait;
use chrono::Utc;
use entity::employees::{self, Gender, Model};
use platform_db::DbPool;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    EntityTrait,
};

/// Candidate record handed to the lifecycle service before persistence.
/// `active` carries whatever the caller supplied; creation overrides it.
#[derive(Clone, Debug)]
pub struct EmployeeDraft {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub salary: f64,
    pub active: bool,
}

/// Record store contract. Identity assignment and storage belong here;
/// admissibility decisions do not.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get_all(&self) -> anyhow::Result<Vec<Model>>;
    async fn get_employee_by_id(&self, id: i32) -> anyhow::Result<Option<Model>>;
    async fn add_employee(&self, draft: EmployeeDraft) -> anyhow::Result<Model>;
    async fn update_employee(&self, id: i32, draft: EmployeeDraft) -> anyhow::Result<Model>;
}

pub struct OrmEmployeeStore {
    pool: DbPool,
}

impl OrmEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for OrmEmployeeStore {
    async fn get_all(&self) -> anyhow::Result<Vec<Model>> {
        employees::Entity::find()
            .all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn get_employee_by_id(&self, id: i32) -> anyhow::Result<Option<Model>> {
        employees::Entity::find_by_id(id)
            .one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn add_employee(&self, draft: EmployeeDraft) -> anyhow::Result<Model> {
        let now = Utc::now();
        let record = employees::ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            age: Set(draft.age),
            gender: Set(draft.gender),
            salary: Set(draft.salary),
            active: Set(draft.active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        record.insert(&self.pool).await.map_err(Into::into)
    }

    async fn update_employee(&self, id: i32, draft: EmployeeDraft) -> anyhow::Result<Model> {
        // The lifecycle flag is not writable through the update path.
        let record = employees::ActiveModel {
            id: Set(id),
            name: Set(draft.name),
            age: Set(draft.age),
            gender: Set(draft.gender),
            salary: Set(draft.salary),
            active: NotSet,
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };
        record.update(&self.pool).await.map_err(Into::into)
    }
}
