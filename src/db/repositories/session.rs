use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::admin::AdminUser;
use crate::credentials;
use crate::entities::admin_sessions;

/// Fixed validity window; sessions are never extended in place.
const SESSION_VALIDITY_DAYS: i64 = 7;

/// A newly issued session, returned to the transport layer which owns the
/// cookie details.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issues an opaque bearer token bound to the admin identity.
    ///
    /// Collisions are not checked here; the unique index on `token` is the
    /// backstop and the probability is treated as negligible.
    pub async fn issue(&self, admin_user_id: i32) -> Result<IssuedSession> {
        let token = credentials::generate_token();
        let now = chrono::Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_VALIDITY_DAYS);

        let active = admin_sessions::ActiveModel {
            admin_user_id: Set(admin_user_id),
            token: Set(token.clone()),
            expires_at: Set(expires_at),
            created_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to persist session")?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolves a token to its owning admin if a non-expired session exists.
    ///
    /// Absent and expired sessions are indistinguishable to the caller: both
    /// come back as `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<AdminUser>> {
        let now = chrono::Utc::now();

        let found = admin_sessions::Entity::find()
            .filter(admin_sessions::Column::Token.eq(token))
            .filter(admin_sessions::Column::ExpiresAt.gt(now))
            .find_also_related(crate::entities::admin_users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to resolve session token")?;

        Ok(found.and_then(|(_, admin)| admin).map(AdminUser::from))
    }

    /// Deletes the session matching the token. Revoking an unknown token is
    /// a no-op, not an error.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        admin_sessions::Entity::delete_many()
            .filter(admin_sessions::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to revoke session")?;

        Ok(())
    }
}
