use sea_orm_migration::prelude::*;

use super::m20240405_000001_create_follows_table::Follows;

// tables holding duplicate rows must be cleaned with `cli dedup` before this can apply

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_index(
				Index::create()
					.unique()
					.name("index-follows-follower-target")
					.table(Follows::Table)
					.col(Follows::Follower)
					.col(Follows::TargetKind)
					.col(Follows::TargetId)
					.to_owned()
				)
			.await?;
		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_index(Index::drop().name("index-follows-follower-target").table(Follows::Table).to_owned())
			.await?;
		Ok(())
	}
}
