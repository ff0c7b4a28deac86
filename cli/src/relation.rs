use follow::{Context, Identity, Resolver};

#[derive(Debug, thiserror::Error)]
#[error("no record of kind '{kind}' with id '{id}'")]
pub struct RecordNotFound {
	pub kind: String,
	pub id: String,
}

async fn record<R: Resolver>(ctx: &Context<R>, kind: String, id: String) -> Result<R::Record, Box<dyn std::error::Error>> {
	match ctx.follows().resolve(&kind, &id).await? {
		Some(record) => Ok(record),
		None => Err(RecordNotFound { kind, id }.into()),
	}
}

pub async fn follow<R: Resolver>(ctx: Context<R>, user: String, kind: String, id: String) -> Result<(), Box<dyn std::error::Error>> {
	let record = record(&ctx, kind, id).await?;
	ctx.follows().follow(&Identity::user(&user), &record).await?;
	let target = ctx.follows().resolver().target(&record);
	match follow::model::follow::Entity::find_one(&user, &target, ctx.db()).await? {
		Some(relation) => tracing::info!("{relation} since {}", relation.created),
		None => tracing::warn!("{user} should follow {target} but no relation is stored"),
	}
	Ok(())
}

pub async fn unfollow<R: Resolver>(ctx: Context<R>, user: String, kind: String, id: String) -> Result<(), Box<dyn std::error::Error>> {
	let record = record(&ctx, kind, id).await?;
	ctx.follows().unfollow(&Identity::user(&user), &record).await?;
	tracing::info!("{user} doesn't follow {}", ctx.follows().resolver().target(&record));
	Ok(())
}

pub async fn list<R: Resolver>(ctx: Context<R>, user: String) -> Result<(), Box<dyn std::error::Error>> {
	let stored = follow::model::follow::Entity::count_for(&user, ctx.db()).await?;
	let followed = ctx.follows().list_followed(&Identity::user(&user)).await?;

	for record in &followed {
		println!("{}", ctx.follows().resolver().target(record));
	}

	if stored as usize != followed.len() {
		tracing::warn!("{user} has {stored} stored relations but only {} resolve", followed.len());
	}

	Ok(())
}
