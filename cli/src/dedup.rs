use follow::{Context, Resolver};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

/// deletes every relation repeating an older one, keeping the oldest; returns how many were (or would be) removed
pub async fn dedup<R: Resolver>(ctx: Context<R>, for_real: bool) -> Result<u64, sea_orm::DbErr> {
	let duplicates = follow::model::follow::Entity::duplicates(ctx.db()).await?;

	if duplicates.is_empty() {
		tracing::info!("no duplicate relations found");
		return Ok(0);
	}

	if !for_real {
		tracing::info!("would remove {} duplicate relations, run again with --for-real to delete them", duplicates.len());
		return Ok(duplicates.len() as u64);
	}

	let mut removed = 0;
	for chunk in duplicates.chunks(500) {
		removed += follow::model::follow::Entity::delete_many()
			.filter(follow::model::follow::Column::Internal.is_in(chunk.iter().copied()))
			.exec(ctx.db())
			.await?
			.rows_affected;
	}

	tracing::info!("removed {removed} duplicate relations");
	Ok(removed)
}
