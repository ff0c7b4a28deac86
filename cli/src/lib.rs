use follow::{Context, Resolver};

mod relation;
pub use relation::*;

mod dedup;
pub use dedup::*;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum CliCommand {
	/// make a user follow a record
	Follow {
		/// id of the user which will follow
		user: String,

		/// kind tag of the record to follow
		kind: String,

		/// id of the record to follow, within its kind
		id: String,
	},

	/// make a user stop following a record
	Unfollow {
		/// id of the user which will stop following
		user: String,

		/// kind tag of the record to unfollow
		kind: String,

		/// id of the record to unfollow, within its kind
		id: String,
	},

	/// list everything a user follows, most recent first
	List {
		/// id of the user to list follows of
		user: String,
	},

	/// remove duplicate follow relations left over from old databases
	Dedup {
		/// unless this is set, dedup will be a dry run
		#[arg(long, default_value_t = false)]
		for_real: bool,
	},
}

pub async fn run<R: Resolver>(ctx: Context<R>, command: CliCommand) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!("running cli task: {command:?}");
	match command {
		CliCommand::Follow { user, kind, id } =>
			Ok(follow(ctx, user, kind, id).await?),
		CliCommand::Unfollow { user, kind, id } =>
			Ok(unfollow(ctx, user, kind, id).await?),
		CliCommand::List { user } =>
			Ok(list(ctx, user).await?),
		CliCommand::Dedup { for_real } => {
			dedup(ctx, for_real).await?;
			Ok(())
		},
	}
}
