#[derive(Debug, thiserror::Error)]
pub enum FollowError {
	#[error("anonymous users aren't allowed to follow")]
	AnonymousNotAllowed,

	#[error("database error: {0}")]
	Database(#[from] sea_orm::DbErr),
}

pub type FollowResult<T> = Result<T, FollowError>;
