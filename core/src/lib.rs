pub mod config;
pub mod errors;
pub mod ext;
pub mod context;
pub mod identity;
pub mod model;
pub mod resolver;
pub mod service;

pub use context::Context;
pub use config::Config;
pub use identity::Identity;
pub use resolver::{Resolver, TableResolver, Target};
pub use service::{Action, FollowService};
pub use errors::FollowResult as Result;
pub use errors::FollowError as Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub(crate) mod testing;
