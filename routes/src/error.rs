use axum::{http::StatusCode, response::Redirect};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("database error: {0:?}")]
	Database(#[from] sea_orm::DbErr),

	// wrapper error to return arbitrary status codes
	#[error("{0}")]
	Status(StatusCode),

	// not really an error, but anonymous users get bounced to the login page from deep inside handlers
	#[error("redirecting to {0}")]
	Redirect(String),
}

impl ApiError {
	pub fn not_found() -> Self {
		Self::Status(axum::http::StatusCode::NOT_FOUND)
	}

	pub fn unauthorized() -> Self {
		Self::Status(axum::http::StatusCode::UNAUTHORIZED)
	}
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<axum::http::StatusCode> for ApiError {
	fn from(value: axum::http::StatusCode) -> Self {
		ApiError::Status(value)
	}
}

impl From<follow::Error> for ApiError {
	fn from(value: follow::Error) -> Self {
		match value {
			follow::Error::AnonymousNotAllowed => ApiError::unauthorized(),
			follow::Error::Database(e) => ApiError::Database(e),
		}
	}
}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		tracing::debug!("emitting error response: {self:?}");
		let descr = self.to_string();
		match self {
			ApiError::Redirect(to) => Redirect::to(&to).into_response(),
			ApiError::Status(status) => status.into_response(),
			ApiError::Database(e) => (
				StatusCode::SERVICE_UNAVAILABLE,
				axum::Json(serde_json::json!({
					"error": "database",
					"description": descr,
					"inner": format!("{e:#?}"),
				}))
			).into_response(),
		}
	}
}
