use axum::{extract::FromRequestParts, http::request::Parts};
use follow::{Context, Identity, Resolver};

use crate::ApiError;

/// Identity of whoever sent the request.
///
/// Host applications doing their own authentication can insert an [Identity] into request
/// extensions with a middleware, which always wins. Otherwise the user id is taken from the header
/// configured as `http.user_header`, which must be set by a trusted reverse proxy. Requests with
/// neither are anonymous.
pub struct AuthIdentity(pub Identity);

impl<R: Resolver + 'static> FromRequestParts<Context<R>> for AuthIdentity {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, ctx: &Context<R>) -> Result<Self, Self::Rejection> {
		if let Some(identity) = parts.extensions.get::<Identity>() {
			return Ok(AuthIdentity(identity.clone()));
		}

		let user = parts
			.headers
			.get(ctx.cfg().http.user_header.as_str())
			.map(|v| v.to_str().unwrap_or("").trim())
			.unwrap_or("");

		if user.is_empty() {
			return Ok(AuthIdentity(Identity::Anonymous));
		}

		tracing::debug!("authenticated '{user}' from trusted header");
		Ok(AuthIdentity(Identity::user(user)))
	}
}
