use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Follows {
	Table,
	Internal,
	Follower,
	TargetKind,
	TargetId,
	Created,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Follows::Table)
					.comment("users following arbitrary records, pointed at by kind tag and id")
					.col(
						ColumnDef::new(Follows::Internal)
							.big_integer()
							.not_null()
							.primary_key()
							.auto_increment()
					)
					.col(ColumnDef::new(Follows::Follower).string().not_null())
					.col(ColumnDef::new(Follows::TargetKind).string().not_null())
					// string so that any key scheme fits, numeric or not
					.col(ColumnDef::new(Follows::TargetId).string_len(255).not_null())
					.col(ColumnDef::new(Follows::Created).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
					.to_owned()
			)
			.await?;

		manager
			.create_index(Index::create().name("index-follows-follower").table(Follows::Table).col(Follows::Follower).to_owned())
			.await?;

		manager
			.create_index(
				Index::create()
					.name("index-follows-target")
					.table(Follows::Table)
					.col(Follows::TargetKind)
					.col(Follows::TargetId)
					.to_owned()
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Follows::Table).to_owned())
			.await?;

		Ok(())
	}
}
