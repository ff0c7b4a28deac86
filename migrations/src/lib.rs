use sea_orm_migration::prelude::*;

mod m20240405_000001_create_follows_table;
mod m20240406_000001_add_follows_unique_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
	fn migrations() -> Vec<Box<dyn MigrationTrait>> {
		vec![
			Box::new(m20240405_000001_create_follows_table::Migration),
			Box::new(m20240406_000001_add_follows_unique_index::Migration),
		]
	}
}

pub use sea_orm_migration::MigratorTrait;
