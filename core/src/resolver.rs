use sea_orm::{sea_query::{Alias, Expr, Query}, ConnectionTrait, DatabaseConnection, DbErr};

use crate::config::{KeyType, KindConfig};

/// polymorphic pointer to any followable record: kind tag plus id within that kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Target {
	pub kind: String,
	pub id: String,
}

impl Target {
	pub fn new(kind: impl ToString, id: impl ToString) -> Self {
		Target { kind: kind.to_string(), id: id.to_string() }
	}
}

impl std::fmt::Display for Target {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.kind, self.id)
	}
}

/// maps kind tags and ids onto concrete records of the host application, and back
#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
	type Record: Send + Sync;

	/// Ok(None) means there is no such record (or no such kind)
	async fn resolve(&self, kind: &str, id: &str) -> Result<Option<Self::Record>, DbErr>;

	fn target(&self, record: &Self::Record) -> Target;
}

/// resolves kinds configured as (table, key column) pairs living in the same database
#[derive(Clone)]
pub struct TableResolver {
	db: DatabaseConnection,
	kinds: Vec<KindConfig>,
}

impl TableResolver {
	pub fn new(db: DatabaseConnection, kinds: Vec<KindConfig>) -> Self {
		TableResolver { db, kinds }
	}

	pub fn kinds(&self) -> impl Iterator<Item = &str> {
		self.kinds.iter().map(|k| k.name.as_str())
	}
}

#[async_trait::async_trait]
impl Resolver for TableResolver {
	type Record = Target;

	async fn resolve(&self, kind: &str, id: &str) -> Result<Option<Target>, DbErr> {
		let Some(cfg) = self.kinds.iter().find(|k| k.name == kind) else {
			tracing::debug!("refusing to resolve unconfigured kind '{kind}'");
			return Ok(None);
		};

		// never cast the key column, lookups must stay on its index
		let (value, id) : (sea_orm::Value, String) = match cfg.key_type {
			KeyType::Text => (id.into(), id.to_string()),
			KeyType::Integer => match id.parse::<i64>() {
				Ok(x) => (x.into(), x.to_string()),
				Err(_) => return Ok(None),
			},
		};

		let select = Query::select()
			.expr(Expr::val(1))
			.from(Alias::new(&cfg.table))
			.and_where(Expr::col(Alias::new(&cfg.key)).eq(value))
			.limit(1)
			.to_owned();

		let found = self.db
			.query_one(self.db.get_database_backend().build(&select))
			.await?
			.is_some();

		Ok(found.then(|| Target::new(kind, id)))
	}

	fn target(&self, record: &Target) -> Target {
		record.clone()
	}
}
