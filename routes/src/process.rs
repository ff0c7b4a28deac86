use std::collections::HashMap;

use axum::{extract::{OriginalUri, Path, Query, State}, http::HeaderMap, response::{IntoResponse, Redirect, Response}, Json};
use follow::{Context, Identity, Resolver, Target};

use crate::{ApiError, ApiResult, AuthIdentity};

fn login_required<R: Resolver>(ctx: &Context<R>, identity: &Identity, uri: &OriginalUri) -> ApiResult<()> {
	if !identity.is_anon() {
		return Ok(());
	}
	match ctx.cfg().http.login_url {
		None => Err(ApiError::unauthorized()),
		Some(ref login) => Err(ApiError::Redirect(format!(
			"{login}?{}={}",
			ctx.cfg().http.redirect_field,
			urlencoding::encode(&uri.0.to_string()),
		))),
	}
}

fn is_xhr(headers: &HeaderMap) -> bool {
	headers
		.get("X-Requested-With")
		.is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"XMLHttpRequest"))
}

/// only redirect within this site: a path, but not a protocol-relative url
fn is_local(next: &str) -> bool {
	next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\")
}

pub async fn process<R: Resolver + 'static, const FOLLOW: bool>(
	State(ctx): State<Context<R>>,
	AuthIdentity(identity): AuthIdentity,
	Path((kind, id)): Path<(String, String)>,
	Query(query): Query<HashMap<String, String>>,
	uri: OriginalUri,
	headers: HeaderMap,
) -> ApiResult<Response> {
	login_required(&ctx, &identity, &uri)?;

	let record = ctx.follows()
		.resolve(&kind, &id)
		.await?
		.ok_or_else(ApiError::not_found)?;

	if FOLLOW {
		ctx.follows().follow(&identity, &record).await?;
	} else {
		ctx.follows().unfollow(&identity, &record).await?;
	}

	match query.get(&ctx.cfg().http.redirect_field).filter(|x| !x.is_empty()) {
		Some(next) if !is_local(next) => tracing::debug!("refusing to redirect off-site to '{next}'"),
		Some(next) if !is_xhr(&headers) => return Ok(Redirect::to(next).into_response()),
		_ => {},
	}

	Ok("1".into_response())
}

pub async fn status<R: Resolver + 'static>(
	State(ctx): State<Context<R>>,
	AuthIdentity(identity): AuthIdentity,
	Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
	let record = ctx.follows()
		.resolve(&kind, &id)
		.await?
		.ok_or_else(ApiError::not_found)?;

	let following = ctx.follows().is_following(&identity, &record).await?;

	Ok(Json(serde_json::json!({ "following": following })))
}

pub async fn following<R: Resolver + 'static>(
	State(ctx): State<Context<R>>,
	AuthIdentity(identity): AuthIdentity,
	uri: OriginalUri,
) -> ApiResult<Json<Vec<Target>>> {
	login_required(&ctx, &identity, &uri)?;

	let targets = ctx.follows()
		.list_followed(&identity)
		.await?
		.iter()
		.map(|record| ctx.follows().resolver().target(record))
		.collect();

	Ok(Json(targets))
}

#[cfg(test)]
mod test {
	use axum::{body::Body, http::{header, Request, StatusCode}, Router};
	use follow::{config::{KeyType, KindConfig}, Action, Config, Context, Identity, TableResolver, Target};
	use follow_migrations::MigratorTrait;
	use sea_orm::{ConnectOptions, ConnectionTrait, Database};
	use tower::ServiceExt;

	use crate::FollowRouter;

	async fn context(login_url: Option<&str>) -> Context<TableResolver> {
		let mut opts = ConnectOptions::new("sqlite::memory:");
		opts.max_connections(1).min_connections(1).sqlx_logging(false);
		let db = Database::connect(opts).await.unwrap();
		follow_migrations::Migrator::up(&db, None).await.unwrap();
		db.execute_unprepared("CREATE TABLE articles (id integer PRIMARY KEY, title text)").await.unwrap();
		db.execute_unprepared("INSERT INTO articles (id, title) VALUES (42, 'hello'), (7, 'world')").await.unwrap();

		let mut config = Config::default();
		config.http.login_url = login_url.map(|x| x.to_string());
		config.kinds = vec![KindConfig { name: "Article".into(), table: "articles".into(), key: "id".into(), key_type: KeyType::Integer }];
		let resolver = TableResolver::new(db.clone(), config.kinds.clone());
		Context::new(db, resolver, config)
	}

	fn router(ctx: &Context<TableResolver>) -> Router {
		Router::<Context<TableResolver>>::new()
			.follow_routes()
			.with_state(ctx.clone())
	}

	fn get(uri: &str, user: Option<&str>) -> Request<Body> {
		let mut req = Request::get(uri);
		if let Some(user) = user {
			req = req.header("x-remote-user", user);
		}
		req.body(Body::empty()).unwrap()
	}

	async fn body(res: axum::response::Response) -> String {
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	async fn is_following(ctx: &Context<TableResolver>, user: &str, id: &str) -> bool {
		ctx.follows().is_following(&Identity::user(user), &Target::new("Article", id)).await.unwrap()
	}

	#[tokio::test]
	async fn follow_then_unfollow() {
		let ctx = context(None).await;

		let res = router(&ctx).oneshot(get("/follow/Article/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert_eq!(body(res).await, "1");
		assert!(is_following(&ctx, "test", "42").await);

		let res = router(&ctx).oneshot(get("/unfollow/Article/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert!(!is_following(&ctx, "test", "42").await);
	}

	#[tokio::test]
	async fn post_works_too() {
		let ctx = context(None).await;
		let req = Request::post("/follow/Article/7")
			.header("x-remote-user", "test")
			.body(Body::empty())
			.unwrap();

		let res = router(&ctx).oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert!(is_following(&ctx, "test", "7").await);
	}

	#[tokio::test]
	async fn unknown_records_and_kinds_are_not_found() {
		let ctx = context(None).await;

		let res = router(&ctx).oneshot(get("/follow/Article/000000000000000000000000", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::NOT_FOUND);

		let res = router(&ctx).oneshot(get("/unfollow/000000000000000000000000/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::NOT_FOUND);

		let res = router(&ctx).oneshot(get("/subscribe/Article/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn redirects_to_next_unless_xhr() {
		let ctx = context(None).await;

		let res = router(&ctx).oneshot(get("/follow/Article/42?next=/", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::SEE_OTHER);
		assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");
		assert!(is_following(&ctx, "test", "42").await);

		let req = Request::get("/unfollow/Article/42?next=/")
			.header("x-remote-user", "test")
			.header("X-Requested-With", "XMLHttpRequest")
			.body(Body::empty())
			.unwrap();
		let res = router(&ctx).oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert_eq!(body(res).await, "1");
		assert!(!is_following(&ctx, "test", "42").await);
	}

	#[tokio::test]
	async fn never_redirects_off_site() {
		let ctx = context(None).await;

		for next in ["https://evil.example/", "//evil.example/", "/%5Cevil.example/", "javascript:alert(1)"] {
			let res = router(&ctx).oneshot(get(&format!("/follow/Article/42?next={next}"), Some("test"))).await.unwrap();
			assert_eq!(res.status(), StatusCode::OK, "redirected to {next}");
			assert!(res.headers().get(header::LOCATION).is_none());
			assert_eq!(body(res).await, "1");
		}

		let res = router(&ctx).oneshot(get("/follow/Article/42?next=/articles/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::SEE_OTHER);
		assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/articles/42");
	}

	#[tokio::test]
	async fn anonymous_users_must_log_in() {
		let ctx = context(None).await;
		let res = router(&ctx).oneshot(get("/follow/Article/42", None)).await.unwrap();
		assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

		let ctx = context(Some("/login")).await;
		let res = router(&ctx).oneshot(get("/follow/Article/42", None)).await.unwrap();
		assert_eq!(res.status(), StatusCode::SEE_OTHER);
		assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login?next=%2Ffollow%2FArticle%2F42");
	}

	#[tokio::test]
	async fn identity_from_extensions_wins_over_header() {
		let ctx = context(None).await;
		let mut req = get("/follow/Article/42", Some("header-user"));
		req.extensions_mut().insert(Identity::user("host-user"));

		let res = router(&ctx).oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert!(is_following(&ctx, "host-user", "42").await);
		assert!(!is_following(&ctx, "header-user", "42").await);
	}

	#[tokio::test]
	async fn generated_urls_hit_the_endpoint() {
		let ctx = context(None).await;
		let target = Target::new("Article", "7");

		let res = router(&ctx).oneshot(get(&ctx.process_url(Action::Follow, &target), Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert!(is_following(&ctx, "test", "7").await);

		let res = router(&ctx).oneshot(get(&ctx.process_url(Action::Unfollow, &target), Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert!(!is_following(&ctx, "test", "7").await);
	}

	#[tokio::test]
	async fn status_and_listing() {
		let ctx = context(None).await;
		router(&ctx).oneshot(get("/follow/Article/42", Some("test"))).await.unwrap();
		router(&ctx).oneshot(get("/follow/Article/7", Some("test"))).await.unwrap();

		let res = router(&ctx).oneshot(get("/status/Article/42", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		let status : serde_json::Value = serde_json::from_str(&body(res).await).unwrap();
		assert_eq!(status, serde_json::json!({ "following": true }));

		let res = router(&ctx).oneshot(get("/status/Article/42", None)).await.unwrap();
		let status : serde_json::Value = serde_json::from_str(&body(res).await).unwrap();
		assert_eq!(status, serde_json::json!({ "following": false }));

		let res = router(&ctx).oneshot(get("/following", Some("test"))).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		let listed : Vec<Target> = serde_json::from_str(&body(res).await).unwrap();
		assert_eq!(listed, vec![Target::new("Article", "7"), Target::new("Article", "42")]);

		let res = router(&ctx).oneshot(get("/following", None)).await.unwrap();
		assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
	}
}
