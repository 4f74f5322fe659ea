use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tokio::task;

use crate::credentials;
use crate::entities::admin_users::{self, AdminRole, AdminStatus};

/// Admin data returned from the repository (without credential material).
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub status: AdminStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<admin_users::Model> for AdminUser {
    fn from(model: admin_users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        admin_users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count admin accounts")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        let admin = admin_users::Entity::find()
            .filter(admin_users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin by email")?;

        Ok(admin.map(AdminUser::from))
    }

    /// Creates an admin account with a freshly derived credential.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser> {
        let password = password.to_string();
        // Key derivation is CPU-intensive; keep it off the async runtime.
        let credential = task::spawn_blocking(move || credentials::derive(&password))
            .await
            .context("Password hashing task panicked")?;

        let now = chrono::Utc::now();
        let active = admin_users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(credential.hash),
            password_salt: Set(credential.salt),
            role: Set(role),
            status: Set(AdminStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin account")?;

        Ok(AdminUser::from(model))
    }

    /// Verifies an email/password pair and returns the account when valid.
    ///
    /// Returns `None` for unknown emails, wrong passwords, and disabled
    /// accounts alike; callers never learn which check failed.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<Option<AdminUser>> {
        let admin = admin_users::Entity::find()
            .filter(admin_users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin for login")?;

        let Some(admin) = admin else {
            return Ok(None);
        };

        if admin.status == AdminStatus::Disabled {
            return Ok(None);
        }

        let password = password.to_string();
        let salt = admin.password_salt.clone();
        let hash = admin.password_hash.clone();

        let is_valid = task::spawn_blocking(move || credentials::verify(&password, &salt, &hash))
            .await
            .context("Password verification task panicked")?;

        Ok(is_valid.then(|| AdminUser::from(admin)))
    }
}
