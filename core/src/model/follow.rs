use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue::{NotSet, Set}, QueryOrder, QuerySelect, SelectColumns};

use crate::resolver::Target;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "follows")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub internal: i64,
	pub follower: String,
	pub target_kind: String,
	pub target_id: String,
	pub created: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	pub fn target(&self) -> Target {
		Target::new(&self.target_kind, &self.target_id)
	}
}

impl std::fmt::Display for Model {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} follows {}", self.follower, self.target())
	}
}

impl Entity {
	fn find_relation(follower: &str, target: &Target) -> Select<Entity> {
		Entity::find()
			.filter(Column::Follower.eq(follower))
			.filter(Column::TargetKind.eq(target.kind.as_str()))
			.filter(Column::TargetId.eq(target.id.as_str()))
	}

	/// inserts a relation unless it already exists, returns how many rows got created (0 or 1)
	pub async fn insert_relation(
		follower: &str,
		target: &Target,
		created: ChronoDateTimeUtc,
		db: &impl ConnectionTrait,
	) -> Result<u64, DbErr> {
		let model = ActiveModel {
			internal: NotSet,
			follower: Set(follower.to_string()),
			target_kind: Set(target.kind.clone()),
			target_id: Set(target.id.clone()),
			created: Set(created),
		};

		Entity::insert(model)
			.on_conflict(
				OnConflict::columns([Column::Follower, Column::TargetKind, Column::TargetId])
					.do_nothing()
					.to_owned()
			)
			.exec_without_returning(db)
			.await
	}

	pub async fn find_one(follower: &str, target: &Target, db: &impl ConnectionTrait) -> Result<Option<Model>, DbErr> {
		Entity::find_relation(follower, target)
			.one(db)
			.await
	}

	pub async fn exists(follower: &str, target: &Target, db: &impl ConnectionTrait) -> Result<bool, DbErr> {
		Ok(
			Entity::find_relation(follower, target)
				.select_only()
				.select_column(Column::Internal)
				.into_tuple::<i64>()
				.one(db)
				.await?
				.is_some()
		)
	}

	/// removes matching relations, returns rows affected; deleting nothing is fine
	pub async fn delete_relation(follower: &str, target: &Target, db: &impl ConnectionTrait) -> Result<u64, DbErr> {
		Ok(
			Entity::delete_many()
				.filter(Column::Follower.eq(follower))
				.filter(Column::TargetKind.eq(target.kind.as_str()))
				.filter(Column::TargetId.eq(target.id.as_str()))
				.exec(db)
				.await?
				.rows_affected
		)
	}

	/// most recent follow first
	pub async fn list_for(follower: &str, db: &impl ConnectionTrait) -> Result<Vec<Model>, DbErr> {
		Entity::find()
			.filter(Column::Follower.eq(follower))
			.order_by_desc(Column::Created)
			.order_by_desc(Column::Internal)
			.all(db)
			.await
	}

	pub async fn count_for(follower: &str, db: &impl ConnectionTrait) -> Result<u64, DbErr> {
		Entity::find()
			.filter(Column::Follower.eq(follower))
			.count(db)
			.await
	}

	/// internal ids of rows repeating an older (follower, kind, id) triple
	pub async fn duplicates(db: &impl ConnectionTrait) -> Result<Vec<i64>, DbErr> {
		let rows = Entity::find()
			.select_only()
			.select_column(Column::Internal)
			.select_column(Column::Follower)
			.select_column(Column::TargetKind)
			.select_column(Column::TargetId)
			.order_by_asc(Column::Follower)
			.order_by_asc(Column::TargetKind)
			.order_by_asc(Column::TargetId)
			.order_by_asc(Column::Created)
			.order_by_asc(Column::Internal)
			.into_tuple::<(i64, String, String, String)>()
			.all(db)
			.await?;

		let mut out = Vec::new();
		let mut previous : Option<(String, String, String)> = None;
		for (internal, follower, kind, id) in rows {
			let key = (follower, kind, id);
			if previous.as_ref() == Some(&key) {
				out.push(internal);
			}
			previous = Some(key);
		}

		Ok(out)
	}
}
