use axum::{routing::get, Router};
use follow::{Context, Resolver};
use tower_http::classify::{SharedClassifier, StatusInRangeAsFailures};

pub mod auth;
pub use auth::AuthIdentity;

pub mod error;
pub use error::{ApiError, ApiResult};

pub mod process;


pub trait FollowRouter {
	fn follow_routes(self) -> Self;
}

impl<R: Resolver + 'static> FollowRouter for Router<Context<R>> {
	fn follow_routes(self) -> Self {
		use crate::process;

		self
			.route("/follow/{kind}/{id}", get(process::process::<R, true>).post(process::process::<R, true>))
			.route("/unfollow/{kind}/{id}", get(process::process::<R, false>).post(process::process::<R, false>))
			.route("/status/{kind}/{id}", get(process::status::<R>))
			.route("/following", get(process::following::<R>))
	}
}

/// path component of configured base url, which is where routes get mounted
pub fn mount_path(base: &str) -> &str {
	let path = match base.split_once("://") {
		None => base,
		Some((_scheme, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
	};
	path.trim_end_matches('/')
}

pub async fn serve<R: Resolver + 'static>(ctx: Context<R>, bind: String, shutdown: impl ShutdownToken) -> Result<(), std::io::Error> {
	use tower_http::{cors::CorsLayer, trace::TraceLayer};

	let routes = Router::<Context<R>>::new().follow_routes();
	let mount = mount_path(ctx.base()).to_string();
	let routes = if mount.is_empty() { routes } else { Router::new().nest(&mount, routes) };

	let router = routes
		.layer(
			TraceLayer::new(SharedClassifier::new(StatusInRangeAsFailures::new(400..=999)))
				.make_span_with(|req: &axum::http::Request<_>| {
					tracing::span!(
						tracing::Level::INFO,
						"request",
						method = %req.method(),
						uri = %req.uri(),
						status_code = tracing::field::Empty,
					)
				})
		)
		.layer(CorsLayer::permissive())
		.with_state(ctx);

	tracing::info!("serving follow routes on {bind} under '{mount}/'");

	let listener = tokio::net::TcpListener::bind(bind).await?;
	axum::serve(listener, router)
		.with_graceful_shutdown(shutdown.event())
		.await?;

	Ok(())
}


pub trait ShutdownToken: Sync + Send + 'static {
	fn event(self) -> impl std::future::Future<Output = ()> + std::marker::Send;
}
