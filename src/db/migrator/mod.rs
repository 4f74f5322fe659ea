use sea_orm_migration::prelude::*;

mod m20240301_initial;

pub use m20240301_initial::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240301_initial::Migration)]
    }
}
