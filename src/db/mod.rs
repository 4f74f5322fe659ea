use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{books, words};
use crate::ingest::WordRecord;

pub mod migrator;
pub mod repositories;

pub use repositories::admin::AdminUser;
pub use repositories::session::IssuedSession;

use crate::entities::admin_users::AdminRole;

/// Explicitly constructed storage handle: opened once at process/service
/// start and cloned into whatever needs it. No process-wide singleton.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn word_repo(&self) -> repositories::word::WordRepository {
        repositories::word::WordRepository::new(self.conn.clone())
    }

    fn book_repo(&self) -> repositories::book::BookRepository {
        repositories::book::BookRepository::new(self.conn.clone())
    }

    // ========== Admin accounts ==========

    pub async fn count_admins(&self) -> Result<u64> {
        self.admin_repo().count().await
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        self.admin_repo().get_by_email(email).await
    }

    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser> {
        self.admin_repo().create(name, email, password, role).await
    }

    pub async fn verify_admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AdminUser>> {
        self.admin_repo().verify_login(email, password).await
    }

    // ========== Sessions ==========

    pub async fn issue_session(&self, admin_user_id: i32) -> Result<IssuedSession> {
        self.session_repo().issue(admin_user_id).await
    }

    pub async fn resolve_session(&self, token: &str) -> Result<Option<AdminUser>> {
        self.session_repo().resolve(token).await
    }

    pub async fn revoke_session(&self, token: &str) -> Result<()> {
        self.session_repo().revoke(token).await
    }

    // ========== Words ==========

    pub async fn upsert_words(&self, records: &[WordRecord]) -> Result<()> {
        self.word_repo().upsert_batch(records).await
    }

    pub async fn get_word(&self, word_id: &str) -> Result<Option<words::Model>> {
        self.word_repo().get_by_word_id(word_id).await
    }

    pub async fn count_words(&self) -> Result<u64> {
        self.word_repo().count().await
    }

    pub async fn count_words_for_book(&self, book_id: &str) -> Result<u64> {
        self.word_repo().count_for_book(book_id).await
    }

    // ========== Books ==========

    pub async fn list_books(&self) -> Result<Vec<books::Model>> {
        self.book_repo().list().await
    }

    pub async fn get_book(&self, book_id: &str) -> Result<Option<books::Model>> {
        self.book_repo().get_by_book_id(book_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrator::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
    use crate::entities::admin_sessions;
    use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

    async fn store() -> Store {
        Store::new("sqlite::memory:").await.expect("in-memory store")
    }

    #[tokio::test]
    async fn migration_seeds_a_system_admin() {
        let store = store().await;
        store.ping().await.unwrap();
        assert_eq!(store.count_admins().await.unwrap(), 1);

        let admin = store
            .get_admin_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("seeded admin");
        assert_eq!(admin.role, AdminRole::System);
    }

    #[tokio::test]
    async fn login_verifies_the_seeded_credential() {
        let store = store().await;

        let admin = store
            .verify_admin_login(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(admin.is_some());

        let wrong = store
            .verify_admin_login(DEFAULT_ADMIN_EMAIL, "wrong-password")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = store
            .verify_admin_login("nobody@localhost", DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn duplicate_admin_email_is_rejected() {
        let store = store().await;

        store
            .create_admin("First", "dup@localhost", "password-1", AdminRole::Admin)
            .await
            .unwrap();

        let second = store
            .create_admin("Second", "dup@localhost", "password-2", AdminRole::Admin)
            .await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn session_roundtrip_and_revocation() {
        let store = store().await;
        let admin = store
            .get_admin_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();

        let issued = store.issue_session(admin.id).await.unwrap();
        assert_eq!(issued.token.len(), 64);

        let resolved = store.resolve_session(&issued.token).await.unwrap();
        assert_eq!(resolved.unwrap().id, admin.id);

        store.revoke_session(&issued.token).await.unwrap();
        assert!(store.resolve_session(&issued.token).await.unwrap().is_none());

        // Revoking again (or revoking garbage) is a no-op, not an error.
        store.revoke_session(&issued.token).await.unwrap();
        store.revoke_session("no-such-token").await.unwrap();
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_none() {
        let store = store().await;
        let admin = store
            .get_admin_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();

        let issued = store.issue_session(admin.id).await.unwrap();

        // Validity window is fixed at issue time: 7 days out.
        let lifetime = issued.expires_at - chrono::Utc::now();
        assert!(lifetime > chrono::Duration::days(6));
        assert!(lifetime <= chrono::Duration::days(7));

        // One second before expiry the session still resolves.
        set_expiry(&store, &issued.token, chrono::Utc::now() + chrono::Duration::seconds(1)).await;
        assert!(store.resolve_session(&issued.token).await.unwrap().is_some());

        // One second past expiry it is indistinguishable from absent.
        set_expiry(&store, &issued.token, chrono::Utc::now() - chrono::Duration::seconds(1)).await;
        assert!(store.resolve_session(&issued.token).await.unwrap().is_none());
    }

    async fn set_expiry(store: &Store, token: &str, expires_at: chrono::DateTime<chrono::Utc>) {
        let session = admin_sessions::Entity::find()
            .filter(admin_sessions::Column::Token.eq(token))
            .one(&store.conn)
            .await
            .unwrap()
            .unwrap();

        let mut active: admin_sessions::ActiveModel = session.into();
        active.expires_at = Set(expires_at);
        active.update(&store.conn).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_an_admin_cascades_to_sessions() {
        let store = store().await;
        let admin = store
            .create_admin("Temp", "temp@localhost", "password-x", AdminRole::Admin)
            .await
            .unwrap();

        let issued = store.issue_session(admin.id).await.unwrap();
        assert!(store.resolve_session(&issued.token).await.unwrap().is_some());

        crate::entities::admin_users::Entity::delete_by_id(admin.id)
            .exec(&store.conn)
            .await
            .unwrap();

        assert!(store.resolve_session(&issued.token).await.unwrap().is_none());
    }
}
