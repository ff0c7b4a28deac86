use std::collections::HashSet;

use sea_orm::DatabaseConnection;

use crate::{model, Identity, Resolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	Follow,
	Unfollow,
}

impl Action {
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Follow => "follow",
			Action::Unfollow => "unfollow",
		}
	}
}

impl std::fmt::Display for Action {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The only way to create, remove and query follow relations.
///
/// Holds a handle to the database storing the `follows` table and a [Resolver] translating host
/// records to and from their kind tag and id. Cloning is cheap as long as the resolver is.
#[derive(Clone)]
pub struct FollowService<R: Resolver> {
	db: DatabaseConnection,
	resolver: R,
}

impl<R: Resolver> FollowService<R> {
	pub fn new(db: DatabaseConnection, resolver: R) -> Self {
		FollowService { db, resolver }
	}

	pub fn db(&self) -> &DatabaseConnection {
		&self.db
	}

	pub fn resolver(&self) -> &R {
		&self.resolver
	}

	pub async fn resolve(&self, kind: &str, id: &str) -> crate::Result<Option<R::Record>> {
		Ok(self.resolver.resolve(kind, id).await?)
	}

	/// make identity follow record, following twice is fine and changes nothing
	pub async fn follow(&self, identity: &Identity, record: &R::Record) -> crate::Result<()> {
		let Identity::Authenticated { id: follower } = identity else {
			return Err(crate::Error::AnonymousNotAllowed);
		};
		let target = self.resolver.target(record);

		let created = model::follow::Entity::insert_relation(follower, &target, chrono::Utc::now(), &self.db).await?;
		if created > 0 {
			tracing::info!("{follower} now follows {target}");
		} else {
			tracing::debug!("{follower} already follows {target}");
		}

		Ok(())
	}

	/// stop following record, unfollowing something never followed is fine and changes nothing
	pub async fn unfollow(&self, identity: &Identity, record: &R::Record) -> crate::Result<()> {
		let Some(follower) = identity.my_id() else {
			return Ok(()); // anonymous users can't own any relation
		};
		let target = self.resolver.target(record);

		let removed = model::follow::Entity::delete_relation(follower, &target, &self.db).await?;
		if removed > 0 {
			tracing::info!("{follower} stopped following {target}");
		}

		Ok(())
	}

	pub async fn is_following(&self, identity: &Identity, record: &R::Record) -> crate::Result<bool> {
		let Some(follower) = identity.my_id() else { return Ok(false) };
		let target = self.resolver.target(record);
		Ok(model::follow::Entity::exists(follower, &target, &self.db).await?)
	}

	/// every record identity follows, most recently followed first
	pub async fn list_followed(&self, identity: &Identity) -> crate::Result<Vec<R::Record>> {
		let Some(follower) = identity.my_id() else { return Ok(Vec::new()) };

		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for relation in model::follow::Entity::list_for(follower, &self.db).await? {
			let target = relation.target();
			if !seen.insert(target.clone()) {
				tracing::warn!("duplicate follow relation found: {relation}");
				continue;
			}
			match self.resolver.resolve(&target.kind, &target.id).await? {
				Some(record) => out.push(record),
				None => tracing::warn!("skipping dangling follow relation: {relation}"),
			}
		}

		Ok(out)
	}
}
