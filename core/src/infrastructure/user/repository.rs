use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        user::{entities::User, ports::UserRepository},
    },
    entity::users::{ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity},
};

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pub db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: UserColumn, value: String) -> Result<Option<User>, CoreError> {
        let user = UserEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to look up user: {}", e);
                CoreError::InternalServerError
            })?
            .map(User::from);

        Ok(user)
    }
}

impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, CoreError> {
        let model = UserActiveModel::try_from(&user)?;

        let created = UserEntity::insert(model)
            .exec_with_returning(&self.db)
            .await
            .map(User::from)
            .map_err(|e| {
                error!("Failed to create user: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, CoreError> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get user by id: {}", e);
                CoreError::InternalServerError
            })?
            .map(User::from);

        Ok(user)
    }

    async fn find_by_google_id(&self, google_id: String) -> Result<Option<User>, CoreError> {
        self.find_one(UserColumn::GoogleId, google_id).await
    }

    async fn find_by_email(&self, email: String) -> Result<Option<User>, CoreError> {
        self.find_one(UserColumn::Email, email).await
    }

    async fn update(&self, mut user: User) -> Result<User, CoreError> {
        user.updated_at = Utc::now();
        let model = UserActiveModel::try_from(&user)?;

        let updated = model.update(&self.db).await.map_err(|e| {
            error!("Failed to update user: {}", e);
            CoreError::InternalServerError
        })?;

        Ok(User::from(updated))
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), CoreError> {
        UserEntity::update_many()
            .col_expr(UserColumn::LastLogin, Expr::value(at.fixed_offset()))
            .filter(UserColumn::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to update last login: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(())
    }
}
