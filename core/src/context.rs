use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::Config, Action, FollowService, Resolver, Target};

pub struct Context<R: Resolver>(Arc<ContextInner<R>>);
struct ContextInner<R: Resolver> {
	config: Config,
	base_url: String,
	follows: FollowService<R>,
}

impl<R: Resolver> Clone for Context<R> {
	fn clone(&self) -> Self {
		Context(self.0.clone())
	}
}

impl<R: Resolver> Context<R> {
	pub fn new(db: DatabaseConnection, resolver: R, config: Config) -> Self {
		let mut base_url = config.http.base_url.clone();
		while base_url.ends_with('/') {
			base_url.pop();
		}

		Context(Arc::new(ContextInner {
			follows: FollowService::new(db, resolver),
			base_url, config,
		}))
	}

	pub fn follows(&self) -> &FollowService<R> {
		&self.0.follows
	}

	pub fn db(&self) -> &DatabaseConnection {
		self.0.follows.db()
	}

	pub fn cfg(&self) -> &Config {
		&self.0.config
	}

	/// configured url prefix, never ending with a slash
	pub fn base(&self) -> &str {
		&self.0.base_url
	}

	/// link to the endpoint processing given action on given record
	pub fn process_url(&self, action: Action, record: &R::Record) -> String {
		self.target_url(action, &self.follows().resolver().target(record))
	}

	pub fn target_url(&self, action: Action, target: &Target) -> String {
		format!(
			"{}/{action}/{}/{}",
			self.base(),
			urlencoding::encode(&target.kind),
			urlencoding::encode(&target.id),
		)
	}
}
