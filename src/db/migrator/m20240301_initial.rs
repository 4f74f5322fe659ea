use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap account created on first run; rotate the password immediately.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
pub const DEFAULT_ADMIN_PASSWORD: &str = "wordvault-change-me";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(AdminUsers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AdminSessions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Books)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Words)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the first-run system admin so the console is reachable before
        // any other account exists.
        let credential = crate::credentials::derive(DEFAULT_ADMIN_PASSWORD);
        let now = chrono::Utc::now();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(AdminUsers)
            .columns([
                crate::entities::admin_users::Column::Name,
                crate::entities::admin_users::Column::Email,
                crate::entities::admin_users::Column::PasswordHash,
                crate::entities::admin_users::Column::PasswordSalt,
                crate::entities::admin_users::Column::Role,
                crate::entities::admin_users::Column::Status,
                crate::entities::admin_users::Column::CreatedAt,
                crate::entities::admin_users::Column::UpdatedAt,
            ])
            .values_panic([
                "Administrator".into(),
                DEFAULT_ADMIN_EMAIL.into(),
                credential.hash.into(),
                credential.salt.into(),
                "system".into(),
                "active".into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Words).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminSessions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminUsers).to_owned())
            .await?;

        Ok(())
    }
}
