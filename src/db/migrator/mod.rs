use sea_orm_migration::prelude::*;

mod m20251101_initial;
mod m20251108_catalog_indexes;

pub use m20251101_initial::DEFAULT_ADMIN_API_KEY;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_initial::Migration),
            Box::new(m20251108_catalog_indexes::Migration),
        ]
    }
}
