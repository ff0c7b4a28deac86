use follow_migrations::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use crate::{resolver::Target, Resolver};

/// fresh in-memory sqlite with every migration applied
pub async fn database() -> DatabaseConnection {
	migrated(None).await
}

/// fresh in-memory sqlite with only the first `steps` migrations applied, like legacy databases
pub async fn migrated(steps: Option<u32>) -> DatabaseConnection {
	let mut opts = ConnectOptions::new("sqlite::memory:");
	// one connection, every pooled connection would get its own in-memory db otherwise
	opts
		.max_connections(1)
		.min_connections(1)
		.sqlx_logging(false);

	let db = Database::connect(opts)
		.await.expect("could not open in-memory sqlite");

	follow_migrations::Migrator::up(&db, steps)
		.await.expect("could not apply migrations");

	db
}

pub async fn articles(db: &DatabaseConnection, ids: &[i64]) {
	db.execute_unprepared("CREATE TABLE articles (id integer PRIMARY KEY, title text)")
		.await.expect("could not create articles table");
	for id in ids {
		db.execute_unprepared(&format!("INSERT INTO articles (id, title) VALUES ({id}, 'article {id}')"))
			.await.expect("could not insert article");
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
	pub id: String,
	pub title: String,
}

impl Article {
	pub fn new(id: &str) -> Self {
		Article { id: id.to_string(), title: format!("article {id}") }
	}
}

/// resolver over a fixed set of articles, kept in memory
pub struct Articles(pub Vec<Article>);

#[async_trait::async_trait]
impl Resolver for Articles {
	type Record = Article;

	async fn resolve(&self, kind: &str, id: &str) -> Result<Option<Article>, sea_orm::DbErr> {
		if kind != "Article" {
			return Ok(None);
		}
		Ok(self.0.iter().find(|a| a.id == id).cloned())
	}

	fn target(&self, record: &Article) -> Target {
		Target::new("Article", &record.id)
	}
}
