pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_user_table;
mod m20220102_000001_create_admin_user;
mod m20240201_000001_create_catalog_tables;
mod m20240201_000002_create_sop_tables;
mod m20240202_000001_create_schedule_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_user_table::Migration),
            Box::new(m20220102_000001_create_admin_user::Migration),
            Box::new(m20240201_000001_create_catalog_tables::Migration),
            Box::new(m20240201_000002_create_sop_tables::Migration),
            Box::new(m20240202_000001_create_schedule_tables::Migration),
        ]
    }
}
